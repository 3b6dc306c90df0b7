//! OCR adapter. Turns an uploaded image into plain text.
//!
//! The adapter never fails: engine errors are logged and collapse to an empty
//! string, which the proxy then treats as "no message provided".

use finguard_core::{
    analysis::ImageUpload,
    config::{OcrConfig, OcrEngineKind},
    traits::OcrEngine,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{ocr_space::OcrSpaceEngine, tesseract::TesseractEngine};

/// Wraps an [`OcrEngine`] with a fixed recognition language.
#[derive(Clone)]
pub struct OcrAdapter {
    engine: Arc<dyn OcrEngine>,
    language: String,
}

impl OcrAdapter {
    pub fn new(engine: Arc<dyn OcrEngine>, language: impl Into<String>) -> Self {
        Self {
            engine,
            language: language.into(),
        }
    }

    /// Build the engine selected in config.
    pub fn from_config(cfg: &OcrConfig) -> Self {
        let engine: Arc<dyn OcrEngine> = match cfg.engine {
            OcrEngineKind::Tesseract => Arc::new(TesseractEngine::new(cfg.tesseract_path.clone())),
            OcrEngineKind::OcrSpace => Arc::new(OcrSpaceEngine::new(
                reqwest::Client::new(),
                cfg.endpoint.clone(),
                cfg.api_key.clone(),
            )),
        };
        Self::new(engine, cfg.language.clone())
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub async fn is_available(&self) -> bool {
        self.engine.is_available().await
    }

    /// Extract trimmed text from `image`. Empty on any engine failure.
    pub async fn extract_text(&self, image: &ImageUpload) -> String {
        debug!(
            "ocr: {} bytes ({}) via {} lang={}",
            image.len(),
            image.content_type,
            self.engine.name(),
            self.language
        );
        match self.engine.recognize(image, &self.language).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("ocr: {} failed: {e}", self.engine.name());
                String::new()
            }
        }
    }
}

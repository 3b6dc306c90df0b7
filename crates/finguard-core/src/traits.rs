use crate::{
    analysis::{AnalysisRequest, ImageUpload},
    error::FinguardError,
};
use async_trait::async_trait;
use bytes::Bytes;

/// External analysis backend that scores messages.
///
/// Implementations send one request and hand back the raw JSON body so the
/// proxy can relay it untouched.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Submit a message for analysis.
    ///
    /// A non-success HTTP status must surface as
    /// [`FinguardError::Upstream`]; every other failure as any other variant.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Bytes, FinguardError>;
}

/// Optical character recognition engine.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Human-readable engine name.
    fn name(&self) -> &str;

    /// Recognize text in `image` using a single recognition language
    /// (e.g. `eng`).
    async fn recognize(&self, image: &ImageUpload, language: &str)
        -> Result<String, FinguardError>;

    /// Check if the engine is reachable/installed.
    async fn is_available(&self) -> bool {
        true
    }
}

//! Local Tesseract OCR via the `tesseract` CLI.
//!
//! Image bytes are piped to `tesseract stdin stdout -l <lang>`.

use async_trait::async_trait;
use finguard_core::{analysis::ImageUpload, error::FinguardError, traits::OcrEngine};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Upper bound for one recognition run.
const TESSERACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Tesseract engine backed by a local binary.
pub struct TesseractEngine {
    binary: String,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: TESSERACT_TIMEOUT,
        }
    }

    /// Arguments for reading from stdin and writing text to stdout.
    fn args(language: &str) -> [&str; 4] {
        ["stdin", "stdout", "-l", language]
    }

    async fn run(&self, image: &ImageUpload, language: &str) -> Result<String, FinguardError> {
        let mut child = Command::new(&self.binary)
            .args(Self::args(language))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FinguardError::Ocr(format!("failed to run {}: {e}", self.binary)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&image.bytes).await?;
            // Close stdin so tesseract sees EOF.
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FinguardError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(
        &self,
        image: &ImageUpload,
        language: &str,
    ) -> Result<String, FinguardError> {
        tokio::time::timeout(self.timeout, self.run(image, language))
            .await
            .map_err(|_| {
                FinguardError::Ocr(format!(
                    "tesseract timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

use thiserror::Error;

/// Top-level error type for FinGuard.
#[derive(Debug, Error)]
pub enum FinguardError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// OCR engine error.
    #[error("ocr error: {0}")]
    Ocr(String),

    /// Transport or decoding failure talking to the analysis backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// The analysis backend answered with a non-success status.
    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

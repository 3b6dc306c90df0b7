use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language used when the caller does not pick one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Largest image the client surfaces will upload (10 MB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Number of remediation steps shown to the user. Display policy only.
pub const MAX_DISPLAYED_STEPS: usize = 3;

/// Outbound payload sent to the analysis backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub message: String,
    pub language: String,
}

impl AnalysisRequest {
    pub fn new(message: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            language: language.into(),
        }
    }

    /// Whether the message carries anything besides whitespace.
    pub fn has_message(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

/// Categorical scam likelihood, as returned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskScore {
    Low,
    Medium,
    High,
}

impl RiskScore {
    pub const ALL: [RiskScore; 3] = [RiskScore::Low, RiskScore::Medium, RiskScore::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-provided translation of the explanation and steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub language: String,
    pub explanation: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Assessment returned by the analysis backend.
///
/// The proxy never decodes into this type; it relays the raw body.
/// Only client surfaces decode it for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub risk_score: RiskScore,
    #[serde(default)]
    pub scam_type: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Translation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl AnalysisResponse {
    /// Explanation to show: the translated one when present and non-empty.
    pub fn preferred_explanation(&self) -> &str {
        match &self.translation {
            Some(tr) if !tr.explanation.is_empty() => &tr.explanation,
            _ => &self.explanation,
        }
    }

    /// Steps to show: translated steps when a translation exists, capped
    /// at [`MAX_DISPLAYED_STEPS`].
    pub fn preferred_steps(&self) -> &[String] {
        let steps = match &self.translation {
            Some(tr) => &tr.steps,
            None => &self.steps,
        };
        &steps[..steps.len().min(MAX_DISPLAYED_STEPS)]
    }

    /// Untranslated steps capped at [`MAX_DISPLAYED_STEPS`].
    pub fn displayed_steps(&self) -> &[String] {
        &self.steps[..self.steps.len().min(MAX_DISPLAYED_STEPS)]
    }
}

/// An uploaded image waiting for text extraction.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    /// Declared MIME type, e.g. `image/png`.
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode as `data:<mime>;base64,<payload>`.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, BASE64.encode(&self.bytes))
    }
}

/// Guess an image MIME type from a file extension. Falls back to
/// `application/octet-stream`.
pub fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

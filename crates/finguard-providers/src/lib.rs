//! # finguard-providers
//!
//! External collaborators for FinGuard: the analysis backend, OCR engines,
//! and the proxy client used by the command-line surfaces.

pub mod backend;
pub mod ocr;
pub mod ocr_space;
pub mod proxy_client;
pub mod tesseract;

//! # finguard-core
//!
//! Core types, traits, configuration, and error handling for FinGuard.

pub mod analysis;
pub mod config;
pub mod error;
pub mod traits;

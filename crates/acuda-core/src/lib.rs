//! Acuda Core Library
//!
//! This crate provides the domain models, error types, configuration and locale helpers
//! shared by every Acuda component.

pub mod config;
pub mod error;
pub mod locale;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, DocumentServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};

//! Gala Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! continuation-cursor encoding shared across all Gala components.

pub mod config;
pub mod cursor;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, MetadataBackend, StorageBackend};
pub use cursor::ScanPosition;
pub use error::{AppError, ErrorMetadata, LogLevel};

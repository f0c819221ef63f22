//! Gala Storage Library
//!
//! This crate provides the object-store abstraction and implementations for
//! Gala: presigned upload/download URLs for S3, and an in-memory backend for
//! tests and local runs.
//!
//! # Storage key format
//!
//! Keys are derived deterministically at intent time:
//!
//! - `uploads/{upload-date}/{media_id}-{file_name}`
//!
//! The date component groups objects by UTC calendar day for operational
//! browsing; the media id makes the key unique. Keys must not contain `..`
//! or a leading `/`. Key generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod memory;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::upload_key;
pub use memory::MemoryStorage;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};

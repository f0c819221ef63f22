//! Domain models shared across the Gala services.

pub mod guest;
pub mod media;
pub mod upload;

pub use guest::GuestRecord;
pub use media::{MediaKind, MediaPage, MediaRecord, MediaStatus, MediaView};
pub use upload::{
    CompleteUploadRequest, CompleteUploadResponse, UploadIntentRequest, UploadIntentResponse,
};

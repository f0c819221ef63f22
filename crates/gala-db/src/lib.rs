//! Metadata stores for the Gala data access layer.
//!
//! Two logical tables back the upload protocol: Media (point lookups by id,
//! paginated scans of completed records) and Guests (point lookups by id,
//! lookups by display name). Both are expressed as capability traits with a
//! Postgres implementation for production and an in-memory implementation
//! for tests and local runs.

pub mod memory;
pub mod postgres;
pub mod traits;

// Re-export commonly used types
pub use memory::{MemoryGuestStore, MemoryMediaStore};
pub use postgres::{PgGuestStore, PgMediaStore};
pub use traits::{CompletionOutcome, GuestStore, MediaScanPage, MediaStore};

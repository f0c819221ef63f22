//! Postgres-backed metadata stores.

pub mod guests;
pub mod media;

pub use guests::PgGuestStore;
pub use media::PgMediaStore;

//! Service layer: the upload/listing protocol behind the HTTP surface.
//!
//! Services are stateless, dependency-injected objects taking store clients
//! as constructor arguments - no ambient globals. Handlers hold them via
//! `AppState` and call through.

pub mod guest_resolver;
pub mod media_listing;
pub mod upload_completion;
pub mod upload_intent;

pub use guest_resolver::{GuestResolver, ResolvedGuest};
pub use media_listing::MediaListingService;
pub use upload_completion::UploadCompletionService;
pub use upload_intent::{IntentCreated, SideEffect, UploadIntentService};

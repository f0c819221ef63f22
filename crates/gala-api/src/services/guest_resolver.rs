//! Guest identity resolution.

use gala_db::GuestStore;
use std::sync::Arc;
use uuid::Uuid;

/// Result of resolving a display name to a guest identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGuest {
    pub guest_id: Uuid,
    /// Whether the id belongs to an already-persisted guest. When false the
    /// caller is responsible for persisting the new GuestRecord.
    pub existing: bool,
}

/// Resolves a display name to a stable guest id.
///
/// Lookup failures degrade to "always create a new guest" instead of failing
/// the upload: availability over consistency. The duplicate row this can
/// produce is accepted; media records denormalize the name, so the gallery
/// is unaffected.
#[derive(Clone)]
pub struct GuestResolver {
    guests: Arc<dyn GuestStore>,
}

impl GuestResolver {
    pub fn new(guests: Arc<dyn GuestStore>) -> Self {
        Self { guests }
    }

    #[tracing::instrument(skip(self), fields(operation = "resolve_guest"))]
    pub async fn resolve(&self, name: &str) -> ResolvedGuest {
        match self.guests.find_by_name(name).await {
            Ok(Some(guest)) => {
                tracing::debug!(guest_id = %guest.id, "Resolved existing guest");
                ResolvedGuest {
                    guest_id: guest.id,
                    existing: true,
                }
            }
            Ok(None) => ResolvedGuest {
                guest_id: Uuid::new_v4(),
                existing: false,
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    guest_name = %name,
                    "Guest lookup unavailable, creating new guest"
                );
                ResolvedGuest {
                    guest_id: Uuid::new_v4(),
                    existing: false,
                }
            }
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guest identity as persisted in the metadata store.
///
/// `name` is the resolution key but is not unique at the storage layer:
/// concurrent first uploads under the same new name can race and create two
/// rows. The resolver treats the oldest row as canonical; media records
/// denormalize the name, so the gallery is unaffected either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every upload intent, best-effort.
    pub last_upload: DateTime<Utc>,
}

impl GuestRecord {
    /// A brand-new guest, first seen now.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        GuestRecord {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            last_upload: now,
        }
    }
}

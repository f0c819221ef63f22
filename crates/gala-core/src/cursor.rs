//! Continuation cursors for paginated media scans.
//!
//! A cursor is the base64-encoded JSON of the last-evaluated scan position.
//! Consumers must treat the token as opaque and round-trip it unmodified;
//! the scan key is the composite `(uploaded_at, id)` pair so pages have a
//! stable newest-first total order.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Last-evaluated position of a media scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPosition {
    pub uploaded_at: DateTime<Utc>,
    pub id: Uuid,
}

impl ScanPosition {
    /// Encode this position as an opaque continuation token.
    pub fn encode(&self) -> String {
        // Serialization of this struct cannot fail; both fields are plain values.
        let json = serde_json::to_vec(self).expect("scan position serializes");
        STANDARD.encode(json)
    }

    /// Decode a continuation token previously produced by `encode`.
    ///
    /// A token that is not valid base64 or does not decode to a scan
    /// position is rejected as invalid input, never treated as "start over".
    pub fn decode(token: &str) -> Result<Self, AppError> {
        let raw = STANDARD
            .decode(token)
            .map_err(|_| AppError::InvalidInput("Malformed continuation cursor".to_string()))?;
        serde_json::from_slice(&raw)
            .map_err(|_| AppError::InvalidInput("Malformed continuation cursor".to_string()))
    }
}

//! Published asset record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tiervault_core::{AssetId, UserId};

use crate::Tier;
use crate::user::lenient_tier;

/// A published asset as held by the record store.
///
/// Assets are immutable once created: there is no edit or delete path. The
/// required tier is written from the closed enum, but read leniently: a
/// malformed stored value (`tier: None`) denies access to everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub description: String,
    /// Minimum subscription tier required to view/download.
    #[serde(default, deserialize_with = "lenient_tier")]
    pub tier: Option<Tier>,
    /// Opaque path of the binary payload in the blob store.
    pub file_path: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    /// Optional preview payload path (publicly renderable).
    pub preview_path: Option<String>,
    pub uploader_id: UserId,
    pub created_at: DateTime<Utc>,
}

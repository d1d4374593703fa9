//! Insert/patch shapes accepted by the record store.

use serde::{Deserialize, Serialize};

use tiervault_access::{Role, Tier};
use tiervault_core::UserId;

/// Fields for inserting a new user profile.
///
/// New profiles always carry a concrete role and tier; the lenient `Option`
/// on [`tiervault_access::User`] exists only for values read back from
/// user-editable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub identity_key: String,
    pub username: String,
    pub role: Role,
    pub tier: Tier,
}

impl NewUser {
    /// A first-login profile: role USER, tier Creator (lowest).
    pub fn with_defaults(identity_key: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            username: username.into(),
            role: Role::User,
            tier: Tier::Creator,
        }
    }
}

/// Partial update of a user profile. Absent fields are left untouched.
///
/// Patches are last-write-wins at the store; there is no optimistic
/// concurrency control on user records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

impl UserPatch {
    pub fn username(name: impl Into<String>) -> Self {
        Self {
            username: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    pub fn tier(tier: Tier) -> Self {
        Self {
            tier: Some(tier),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.role.is_none() && self.tier.is_none()
    }
}

/// Fields for inserting a new asset record.
///
/// The blob payload must already be in the blob store: `file_path` (and
/// `preview_path`, if any) reference uploaded objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    pub name: String,
    pub description: String,
    pub tier: Tier,
    pub file_path: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub preview_path: Option<String>,
    pub uploader_id: UserId,
}

//! User profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use tiervault_core::UserId;

use crate::{Role, Tier};

/// A user profile as held by the record store.
///
/// The gateway-side record is authoritative; sessions hold a cached copy.
/// `role`/`tier` are `None` when the stored value was unrecognized; the
/// record store is reachable by user-editable tooling, and a malformed value
/// must deny rather than fail the fetch or widen access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Stable lookup key: the external auth id (delegated variant) or the
    /// username itself (self-asserted variant). Never rewritten.
    pub identity_key: String,
    /// Display name. May be refreshed best-effort on delegated login.
    pub username: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "lenient_tier")]
    pub tier: Option<Tier>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

/// Deserialize a role field, mapping unknown/missing values to `None`.
pub(crate) fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Role::parse))
}

/// Deserialize a tier field, mapping unknown/missing values to `None`.
pub(crate) fn lenient_tier<'de, D>(deserializer: D) -> Result<Option<Tier>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Tier::parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(role: &str, tier: &str) -> String {
        format!(
            r#"{{
                "id": "018f2d6e-6a7b-7c8d-9e0f-0123456789ab",
                "identity_key": "discord:42",
                "username": "mara",
                "role": {role},
                "tier": {tier},
                "created_at": "2026-01-10T12:00:00Z"
            }}"#
        )
    }

    #[test]
    fn deserializes_known_role_and_tier() {
        let user: User = serde_json::from_str(&record_json("\"ADMIN\"", "\"Creator++\"")).unwrap();
        assert_eq!(user.role, Some(Role::Admin));
        assert_eq!(user.tier, Some(Tier::CreatorPlusPlus));
    }

    #[test]
    fn unknown_values_become_none_instead_of_failing() {
        let user: User = serde_json::from_str(&record_json("\"SUPERADMIN\"", "\"Gold\"")).unwrap();
        assert_eq!(user.role, None);
        assert_eq!(user.tier, None);
    }

    #[test]
    fn null_values_become_none() {
        let user: User = serde_json::from_str(&record_json("null", "null")).unwrap();
        assert_eq!(user.role, None);
        assert_eq!(user.tier, None);
    }
}

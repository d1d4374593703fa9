//! Role matrix: which actions each role may perform.
//!
//! Roles gate *actions* (publish, administer); tiers gate *content*. The two
//! are independently settable by an admin.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tiervault_core::DomainError;

/// Capability class of a user. Wire form is the uppercase string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "UPLOAD")]
    Upload,
    #[serde(rename = "ADMIN")]
    Admin,
}

/// An action a role may be permitted to perform.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// View and download tier-gated assets (subject to the tier hierarchy).
    ViewGatedAssets,
    /// Publish new assets into the vault.
    PublishAsset,
    /// Change other users' roles and tiers.
    AdministerUsers,
}

impl Role {
    /// All roles. This is the closed set admin selectors offer.
    pub const ALL: [Role; 3] = [Role::User, Role::Upload, Role::Admin];

    /// The static capability set of this role.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::User => &[Capability::ViewGatedAssets],
            Role::Upload => &[Capability::ViewGatedAssets, Capability::PublishAsset],
            Role::Admin => &[
                Capability::ViewGatedAssets,
                Capability::PublishAsset,
                Capability::AdministerUsers,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Upload => "UPLOAD",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse a stored role value. Unknown values yield `None` (deny).
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "USER" => Some(Role::User),
            "UPLOAD" => Some(Role::Upload),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| DomainError::validation(format!("unknown role '{s}'")))
    }
}

/// Whether a role holds a capability. `None` (absent or unrecognized role in
/// storage) holds nothing. Total, no side effects.
pub fn role_has_capability(role: Option<Role>, capability: Capability) -> bool {
    match role {
        Some(role) => role.capabilities().contains(&capability),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_may_only_view() {
        assert!(role_has_capability(Some(Role::User), Capability::ViewGatedAssets));
        assert!(!role_has_capability(Some(Role::User), Capability::PublishAsset));
        assert!(!role_has_capability(Some(Role::User), Capability::AdministerUsers));
    }

    #[test]
    fn upload_may_view_and_publish() {
        assert!(role_has_capability(Some(Role::Upload), Capability::ViewGatedAssets));
        assert!(role_has_capability(Some(Role::Upload), Capability::PublishAsset));
        assert!(!role_has_capability(Some(Role::Upload), Capability::AdministerUsers));
    }

    #[test]
    fn only_admin_may_administer() {
        for role in Role::ALL {
            let expected = role == Role::Admin;
            assert_eq!(
                role_has_capability(Some(role), Capability::AdministerUsers),
                expected,
                "{role}"
            );
        }
        assert!(!role_has_capability(None, Capability::AdministerUsers));
    }

    #[test]
    fn unknown_role_holds_nothing() {
        for capability in [
            Capability::ViewGatedAssets,
            Capability::PublishAsset,
            Capability::AdministerUsers,
        ] {
            assert!(!role_has_capability(None, capability));
        }
    }

    #[test]
    fn parse_round_trips_and_rejects_unknown() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("CREATOR"), None);
        assert_eq!(Role::parse("admin"), None);
    }
}

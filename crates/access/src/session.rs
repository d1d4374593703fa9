//! Session value: the current context's cached copy of a user profile.

use serde::{Deserialize, Serialize};

use tiervault_core::UserId;

use crate::{Role, Tier, User};

/// The subset of user state held for the current browser context, plus an
/// optional bearer credential.
///
/// A session is a *cache*: the gateway-side record is authoritative, and a
/// refresh replaces the whole value (never a field-by-field merge). Exactly
/// one session is active per context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    /// Opaque bearer token, present in the delegated-auth variant.
    pub token: Option<String>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user, token: None }
    }

    pub fn with_token(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: Some(token.into()),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn role(&self) -> Option<Role> {
        self.user.role
    }

    pub fn tier(&self) -> Option<Tier> {
        self.user.tier
    }

    /// Replace the cached user record, keeping the credential.
    pub fn with_user(self, user: User) -> Self {
        Self { user, ..self }
    }
}

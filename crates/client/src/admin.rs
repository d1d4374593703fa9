//! Admin mutation controller.
//!
//! Role/tier changes to arbitrary users, gated on the ADMIN role. The entry
//! point that lists users and the mutation itself check `can_administer`
//! independently (defense in depth: hiding the admin panel is not the
//! enforcement).

use std::sync::Arc;

use tracing::info;

use tiervault_access::{Role, Session, Tier, User, can_administer};
use tiervault_core::{DomainError, UserId};
use tiervault_gateway::{UserPatch, VaultGateway};
use tiervault_identity::{SessionBackend, SessionStore};

use crate::error::{ClientError, ClientResult};

/// A validated role-or-tier change. Construction from selector strings goes
/// through [`FieldPatch::parse`], which rejects anything outside the closed
/// enums.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldPatch {
    Role(Role),
    Tier(Tier),
}

impl FieldPatch {
    /// Parse a `(field, value)` pair coming from an admin selector.
    pub fn parse(field: &str, value: &str) -> Result<Self, DomainError> {
        match field {
            "role" => Ok(Self::Role(value.parse()?)),
            "tier" => Ok(Self::Tier(value.parse()?)),
            other => Err(DomainError::validation(format!(
                "unknown user field '{other}'"
            ))),
        }
    }

    fn into_user_patch(self) -> UserPatch {
        match self {
            Self::Role(role) => UserPatch::role(role),
            Self::Tier(tier) => UserPatch::tier(tier),
        }
    }
}

/// Applies admin mutations through the gateway.
pub struct AdminController {
    gateway: Arc<dyn VaultGateway>,
}

impl AdminController {
    pub fn new(gateway: Arc<dyn VaultGateway>) -> Self {
        Self { gateway }
    }

    /// All user profiles, most recently created first. Admin-only.
    pub async fn list_all_users(&self, acting: Option<&Session>) -> ClientResult<Vec<User>> {
        if !can_administer(acting) {
            return Err(ClientError::permission_denied(
                "admin role required to list users",
            ));
        }
        Ok(self.gateway.list_users().await?)
    }

    /// Set one user's role or tier.
    ///
    /// Fails `PermissionDenied` unless the acting session holds ADMIN; the
    /// value is already enum-validated by [`FieldPatch`]. If the admin edited
    /// themselves, the session store entry is replaced with the fresh record
    /// so the UI never shows stale privileges.
    pub async fn set_user_field<B: SessionBackend>(
        &self,
        acting: Option<&Session>,
        target: UserId,
        patch: FieldPatch,
        sessions: &SessionStore<B>,
    ) -> ClientResult<User> {
        if !can_administer(acting) {
            return Err(ClientError::permission_denied(
                "admin role required to assign roles or tiers",
            ));
        }

        let updated = self
            .gateway
            .patch_user(target, patch.into_user_patch())
            .await?;
        info!(target = %updated.id, ?patch, "user field updated");

        if let Some(acting) = acting {
            if acting.user_id() == updated.id {
                sessions.set(Some(acting.clone().with_user(updated.clone())));
            }
        }
        Ok(updated)
    }
}

//! Identity resolver: authentication evidence → canonical user profile.

use std::sync::Arc;

use tracing::{debug, warn};

use tiervault_access::User;
use tiervault_gateway::{GatewayError, GatewayResult, NewUser, UserPatch, VaultGateway};

/// Evidence produced by an authentication entry point.
///
/// Both supported shapes resolve through the same path; no shape ever carries
/// a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvidence {
    /// Delegated OAuth-style completion: an opaque external identity plus an
    /// optional human display-name hint from provider metadata.
    Delegated {
        external_id: String,
        display_name: Option<String>,
    },
    /// Bare self-asserted username; no credential check.
    Asserted { username: String },
}

impl AuthEvidence {
    /// The stable key a profile is looked up by. Never rewritten after the
    /// profile is created.
    pub fn identity_key(&self) -> &str {
        match self {
            AuthEvidence::Delegated { external_id, .. } => external_id,
            AuthEvidence::Asserted { username } => username,
        }
    }

    /// The display name to use for a newly created profile.
    pub fn display_name(&self) -> String {
        match self {
            AuthEvidence::Delegated {
                external_id,
                display_name,
            } => match display_name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("user-{}", external_id.chars().take(6).collect::<String>()),
            },
            AuthEvidence::Asserted { username } => username.trim().to_string(),
        }
    }
}

/// Resolves authentication evidence to the canonical gateway-side profile,
/// creating one on first login.
pub struct IdentityResolver {
    gateway: Arc<dyn VaultGateway>,
}

impl IdentityResolver {
    pub fn new(gateway: Arc<dyn VaultGateway>) -> Self {
        Self { gateway }
    }

    /// Logical get-or-create by the stable identity key.
    ///
    /// Resolving the same evidence twice yields the same profile; a second
    /// record is never created. If an insert races another context and loses,
    /// the winner's record is re-fetched and returned.
    pub async fn resolve_profile(&self, evidence: &AuthEvidence) -> GatewayResult<User> {
        let key = evidence.identity_key();

        if let Some(existing) = self.gateway.find_user_by_key(key).await? {
            return Ok(self.reconcile_display_name(existing, evidence).await);
        }

        debug!(identity_key = key, "creating profile on first login");
        let new_user = NewUser::with_defaults(key, evidence.display_name());
        match self.gateway.insert_user(new_user).await {
            Ok(user) => Ok(user),
            Err(GatewayError::Conflict(_)) => {
                // Lost a get-or-create race; the committed record wins.
                self.gateway
                    .find_user_by_key(key)
                    .await?
                    .ok_or(GatewayError::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Best-effort rename when the delegated provider supplies a fresher
    /// display name. Failures are logged and swallowed: a rename conflict
    /// must never block login.
    async fn reconcile_display_name(&self, user: User, evidence: &AuthEvidence) -> User {
        let AuthEvidence::Delegated {
            display_name: Some(name),
            ..
        } = evidence
        else {
            return user;
        };
        let name = name.trim();
        if name.is_empty() || name == user.username {
            return user;
        }

        match self
            .gateway
            .patch_user(user.id, UserPatch::username(name))
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "display-name refresh failed; keeping stored name");
                user
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tiervault_access::{Asset, Role, Tier};
    use tiervault_core::UserId;
    use tiervault_gateway::{InMemoryGateway, NewAsset};

    use super::*;

    fn delegated(id: &str, name: Option<&str>) -> AuthEvidence {
        AuthEvidence::Delegated {
            external_id: id.to_string(),
            display_name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn first_login_creates_profile_with_defaults() {
        let gateway = Arc::new(InMemoryGateway::new());
        let resolver = IdentityResolver::new(gateway);

        let user = resolver
            .resolve_profile(&delegated("discord:42", Some("Mara")))
            .await
            .unwrap();

        assert_eq!(user.identity_key, "discord:42");
        assert_eq!(user.username, "Mara");
        assert_eq!(user.role, Some(Role::User));
        assert_eq!(user.tier, Some(Tier::Creator));
    }

    #[tokio::test]
    async fn resolution_is_idempotent() {
        let gateway = Arc::new(InMemoryGateway::new());
        let resolver = IdentityResolver::new(gateway.clone());
        let evidence = delegated("discord:42", Some("Mara"));

        let first = resolver.resolve_profile(&evidence).await.unwrap();
        let second = resolver.resolve_profile(&evidence).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.role, second.role);
        assert_eq!(first.tier, second.tier);
        assert_eq!(gateway.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn asserted_username_is_both_key_and_display_name() {
        let gateway = Arc::new(InMemoryGateway::new());
        let resolver = IdentityResolver::new(gateway);

        let user = resolver
            .resolve_profile(&AuthEvidence::Asserted {
                username: "lo-fi-kay".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.identity_key, "lo-fi-kay");
        assert_eq!(user.username, "lo-fi-kay");
    }

    #[tokio::test]
    async fn missing_display_name_hint_falls_back_to_id_prefix() {
        let gateway = Arc::new(InMemoryGateway::new());
        let resolver = IdentityResolver::new(gateway);

        let user = resolver
            .resolve_profile(&delegated("abcdef123456", None))
            .await
            .unwrap();
        assert_eq!(user.username, "user-abcdef");
    }

    #[tokio::test]
    async fn fresher_display_name_is_applied_on_next_login() {
        let gateway = Arc::new(InMemoryGateway::new());
        let resolver = IdentityResolver::new(gateway);

        resolver
            .resolve_profile(&delegated("discord:42", Some("Mara")))
            .await
            .unwrap();
        let renamed = resolver
            .resolve_profile(&delegated("discord:42", Some("Mara V")))
            .await
            .unwrap();
        assert_eq!(renamed.username, "Mara V");
    }

    /// Gateway whose `patch_user` always fails; everything else delegates.
    struct RenameFailingGateway {
        inner: InMemoryGateway,
        patch_attempts: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl VaultGateway for RenameFailingGateway {
        async fn find_user_by_key(&self, key: &str) -> GatewayResult<Option<User>> {
            self.inner.find_user_by_key(key).await
        }
        async fn insert_user(&self, user: NewUser) -> GatewayResult<User> {
            self.inner.insert_user(user).await
        }
        async fn patch_user(&self, _id: UserId, _patch: UserPatch) -> GatewayResult<User> {
            self.patch_attempts.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::conflict("username already taken"))
        }
        async fn list_users(&self) -> GatewayResult<Vec<User>> {
            self.inner.list_users().await
        }
        async fn list_assets(&self) -> GatewayResult<Vec<Asset>> {
            self.inner.list_assets().await
        }
        async fn insert_asset(&self, asset: NewAsset) -> GatewayResult<Asset> {
            self.inner.insert_asset(asset).await
        }
        async fn put_blob(
            &self,
            bucket: &str,
            path_hint: &str,
            content_type: &str,
            bytes: Vec<u8>,
        ) -> GatewayResult<String> {
            self.inner.put_blob(bucket, path_hint, content_type, bytes).await
        }
        async fn get_blob(&self, bucket: &str, path: &str) -> GatewayResult<Vec<u8>> {
            self.inner.get_blob(bucket, path).await
        }
    }

    #[tokio::test]
    async fn rename_conflict_is_swallowed_and_never_blocks_login() {
        let gateway = Arc::new(RenameFailingGateway {
            inner: InMemoryGateway::new(),
            patch_attempts: AtomicUsize::new(0),
        });
        let resolver = IdentityResolver::new(gateway.clone());

        resolver
            .resolve_profile(&delegated("discord:42", Some("Mara")))
            .await
            .unwrap();
        let user = resolver
            .resolve_profile(&delegated("discord:42", Some("Mara V")))
            .await
            .unwrap();

        assert_eq!(gateway.patch_attempts.load(Ordering::SeqCst), 1);
        assert_eq!(user.username, "Mara", "stored name is kept on conflict");
    }
}

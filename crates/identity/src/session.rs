//! Session store: the injectable holder of the current context's session.
//!
//! The store never merges: a refresh *replaces* the cached session with a
//! value re-derived from authoritative state, and a gateway failure leaves
//! the cached session untouched.

use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use tracing::{debug, warn};

use tiervault_access::Session;
use tiervault_gateway::GatewayResult;

use crate::resolver::{AuthEvidence, IdentityResolver};

/// External authentication state, as observed at page load or after an auth
/// event: the evidence to resolve plus the bearer credential, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub evidence: AuthEvidence,
    pub token: Option<String>,
}

impl AuthState {
    pub fn new(evidence: AuthEvidence) -> Self {
        Self {
            evidence,
            token: None,
        }
    }

    pub fn with_token(evidence: AuthEvidence, token: impl Into<String>) -> Self {
        Self {
            evidence,
            token: Some(token.into()),
        }
    }
}

/// Where the session record persists between page loads.
///
/// `store` failures degrade persistence only: the in-memory session stays
/// consistent and the failure is logged by the caller.
pub trait SessionBackend: Send + Sync {
    /// Load the persisted session, if any. Missing or malformed ⇒ `None`.
    fn load(&self) -> Option<Session>;

    /// Persist (or clear, on `None`) the session record.
    fn store(&self, session: Option<&Session>) -> std::io::Result<()>;
}

/// Non-persisting backend for the credential-derived variant: the session is
/// re-fetched from the gateway on every page load.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<Session>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for MemoryBackend {
    fn load(&self) -> Option<Session> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn store(&self, session: Option<&Session>) -> std::io::Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = session.cloned();
        }
        Ok(())
    }
}

/// File-persisted backend for the fully-local variant: the session survives
/// restarts until explicit logout.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionBackend for JsonFileBackend {
    fn load(&self) -> Option<Session> {
        let bytes = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed session file");
                None
            }
        }
    }

    fn store(&self, session: Option<&Session>) -> std::io::Result<()> {
        match session {
            Some(session) => {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let json = serde_json::to_vec_pretty(session)
                    .map_err(|e| std::io::Error::other(e.to_string()))?;
                std::fs::write(&self.path, json)
            }
            None => match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e),
            },
        }
    }
}

/// Holder of the (at most one) active session per context.
///
/// An injectable value passed to controllers, not module-level state. All
/// writes are atomic replaces.
pub struct SessionStore<B: SessionBackend> {
    backend: B,
    current: RwLock<Option<Session>>,
}

impl<B: SessionBackend> SessionStore<B> {
    /// Create a store, loading any persisted session from the backend.
    pub fn new(backend: B) -> Self {
        let current = backend.load();
        Self {
            backend,
            current: RwLock::new(current),
        }
    }

    /// The current session, if any.
    pub fn get(&self) -> Option<Session> {
        self.current
            .read()
            .ok()
            .and_then(|current| current.clone())
    }

    /// Replace the session wholesale and persist it.
    pub fn set(&self, session: Option<Session>) {
        if let Err(e) = self.backend.store(session.as_ref()) {
            warn!(error = %e, "session persistence failed; keeping in-memory session");
        }
        if let Ok(mut current) = self.current.write() {
            *current = session;
        }
    }

    /// Re-derive the session from external authentication state.
    ///
    /// `Some(auth)` re-resolves the identity against the gateway and replaces
    /// the cached session entirely (never a field merge). `None` means no
    /// external auth state exists: the session is cleared. On gateway failure
    /// the cached session is left unchanged and the error is surfaced.
    pub async fn refresh(
        &self,
        resolver: &IdentityResolver,
        auth: Option<&AuthState>,
    ) -> GatewayResult<Option<Session>> {
        let Some(auth) = auth else {
            self.set(None);
            return Ok(None);
        };

        let user = resolver.resolve_profile(&auth.evidence).await?;
        let session = Session {
            user,
            token: auth.token.clone(),
        };
        debug!(user_id = %session.user_id(), "session refreshed");
        self.set(Some(session.clone()));
        Ok(Some(session))
    }

    /// Re-read the persisted session (the fully-local variant's page-load
    /// re-derivation).
    pub fn reload(&self) -> Option<Session> {
        let loaded = self.backend.load();
        if let Ok(mut current) = self.current.write() {
            *current = loaded.clone();
        }
        loaded
    }

    /// Clear the session unconditionally. No other side effects: logout never
    /// touches gateway records.
    pub fn logout(&self) {
        self.set(None);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use tiervault_access::{Role, Tier, User};
    use tiervault_core::UserId;
    use tiervault_gateway::{GatewayError, InMemoryGateway, UserPatch, VaultGateway};

    use super::*;

    fn stale_session() -> Session {
        Session::new(User {
            id: UserId::new(),
            identity_key: "discord:42".to_string(),
            username: "stale".to_string(),
            role: Some(Role::User),
            tier: Some(Tier::Creator),
            created_at: Utc::now(),
        })
    }

    fn delegated_auth(token: Option<&str>) -> AuthState {
        AuthState {
            evidence: AuthEvidence::Delegated {
                external_id: "discord:42".to_string(),
                display_name: Some("Mara".to_string()),
            },
            token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn refresh_replaces_the_whole_session() {
        let gateway = Arc::new(InMemoryGateway::new());
        let resolver = IdentityResolver::new(gateway.clone());
        let store = SessionStore::new(MemoryBackend::new());

        // Authoritative record, then upgrade it behind the cached session's back.
        let user = resolver
            .resolve_profile(&delegated_auth(None).evidence)
            .await
            .unwrap();
        gateway
            .patch_user(user.id, UserPatch::tier(Tier::CreatorPlusPlus))
            .await
            .unwrap();
        store.set(Some(stale_session()));

        let refreshed = store
            .refresh(&resolver, Some(&delegated_auth(Some("tok"))))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(refreshed.tier(), Some(Tier::CreatorPlusPlus));
        assert_eq!(refreshed.token.as_deref(), Some("tok"));
        assert_eq!(store.get().unwrap().user.username, "Mara");
    }

    #[tokio::test]
    async fn refresh_without_auth_state_clears_the_session() {
        let gateway = Arc::new(InMemoryGateway::new());
        let resolver = IdentityResolver::new(gateway);
        let store = SessionStore::new(MemoryBackend::new());
        store.set(Some(stale_session()));

        let refreshed = store.refresh(&resolver, None).await.unwrap();
        assert!(refreshed.is_none());
        assert!(store.get().is_none());
    }

    /// Gateway that fails every call.
    struct DownGateway;

    #[async_trait::async_trait]
    impl VaultGateway for DownGateway {
        async fn find_user_by_key(
            &self,
            _key: &str,
        ) -> tiervault_gateway::GatewayResult<Option<User>> {
            Err(GatewayError::unavailable("connection refused"))
        }
        async fn insert_user(
            &self,
            _user: tiervault_gateway::NewUser,
        ) -> tiervault_gateway::GatewayResult<User> {
            Err(GatewayError::unavailable("connection refused"))
        }
        async fn patch_user(
            &self,
            _id: UserId,
            _patch: UserPatch,
        ) -> tiervault_gateway::GatewayResult<User> {
            Err(GatewayError::unavailable("connection refused"))
        }
        async fn list_users(&self) -> tiervault_gateway::GatewayResult<Vec<User>> {
            Err(GatewayError::unavailable("connection refused"))
        }
        async fn list_assets(
            &self,
        ) -> tiervault_gateway::GatewayResult<Vec<tiervault_access::Asset>> {
            Err(GatewayError::unavailable("connection refused"))
        }
        async fn insert_asset(
            &self,
            _asset: tiervault_gateway::NewAsset,
        ) -> tiervault_gateway::GatewayResult<tiervault_access::Asset> {
            Err(GatewayError::unavailable("connection refused"))
        }
        async fn put_blob(
            &self,
            _bucket: &str,
            _path_hint: &str,
            _content_type: &str,
            _bytes: Vec<u8>,
        ) -> tiervault_gateway::GatewayResult<String> {
            Err(GatewayError::unavailable("connection refused"))
        }
        async fn get_blob(
            &self,
            _bucket: &str,
            _path: &str,
        ) -> tiervault_gateway::GatewayResult<Vec<u8>> {
            Err(GatewayError::unavailable("connection refused"))
        }
    }

    #[tokio::test]
    async fn gateway_failure_leaves_the_session_unchanged() {
        let resolver = IdentityResolver::new(Arc::new(DownGateway));
        let store = SessionStore::new(MemoryBackend::new());
        let cached = stale_session();
        store.set(Some(cached.clone()));

        let err = store
            .refresh(&resolver, Some(&delegated_auth(None)))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert_eq!(store.get(), Some(cached));
    }

    #[tokio::test]
    async fn logout_clears_unconditionally() {
        let store = SessionStore::new(MemoryBackend::new());
        store.set(Some(stale_session()));
        store.logout();
        assert!(store.get().is_none());
    }

    #[test]
    fn file_backend_survives_a_reload() {
        let path = std::env::temp_dir().join(format!(
            "tiervault-session-{}.json",
            uuid::Uuid::now_v7()
        ));
        let session = stale_session();

        let store = SessionStore::new(JsonFileBackend::new(&path));
        store.set(Some(session.clone()));

        // A new store over the same path models a browser restart.
        let restarted = SessionStore::new(JsonFileBackend::new(&path));
        assert_eq!(restarted.get(), Some(session));

        restarted.logout();
        let after_logout = SessionStore::new(JsonFileBackend::new(&path));
        assert!(after_logout.get().is_none());

        let _ = std::fs::remove_file(path);
    }
}

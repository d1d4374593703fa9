//! Self-service plan change (simulated, no payment processing).

use tracing::info;

use tiervault_access::{Session, Tier};
use tiervault_gateway::{UserPatch, VaultGateway};
use tiervault_identity::{SessionBackend, SessionStore};

use crate::error::{ClientError, ClientResult};

/// Change the current user's own subscription tier.
///
/// Requires a session. The patched record returned by the gateway replaces
/// the cached session (credential preserved) so the new tier applies without
/// a reload. On gateway failure the session is left unchanged.
pub async fn change_plan<B: SessionBackend>(
    gateway: &dyn VaultGateway,
    sessions: &SessionStore<B>,
    tier: Tier,
) -> ClientResult<Session> {
    let session = sessions
        .get()
        .ok_or_else(|| ClientError::permission_denied("login required to activate a plan"))?;

    let updated = gateway
        .patch_user(session.user_id(), UserPatch::tier(tier))
        .await?;

    info!(user_id = %updated.id, %tier, "plan changed");
    let session = session.with_user(updated);
    sessions.set(Some(session.clone()));
    Ok(session)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tiervault_gateway::{InMemoryGateway, NewUser};
    use tiervault_identity::MemoryBackend;

    use super::*;

    #[tokio::test]
    async fn plan_change_applies_to_the_session_immediately() {
        let gateway = Arc::new(InMemoryGateway::new());
        let user = gateway
            .insert_user(NewUser::with_defaults("kay", "kay"))
            .await
            .unwrap();
        let sessions = SessionStore::new(MemoryBackend::new());
        sessions.set(Some(Session::with_token(user, "tok")));

        let session = change_plan(gateway.as_ref(), &sessions, Tier::CreatorPlus)
            .await
            .unwrap();

        assert_eq!(session.tier(), Some(Tier::CreatorPlus));
        assert_eq!(session.token.as_deref(), Some("tok"), "credential preserved");
        assert_eq!(sessions.get().unwrap().tier(), Some(Tier::CreatorPlus));
    }

    #[tokio::test]
    async fn anonymous_plan_change_is_denied() {
        let gateway = InMemoryGateway::new();
        let sessions = SessionStore::new(MemoryBackend::new());

        let err = change_plan(&gateway, &sessions, Tier::CreatorPlus)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::PermissionDenied(_)));
    }
}

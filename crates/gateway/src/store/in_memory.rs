use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use tiervault_access::{Asset, User};
use tiervault_core::{AssetId, UserId};

use crate::error::{GatewayError, GatewayResult};
use crate::records::{NewAsset, NewUser, UserPatch};

use super::r#trait::{VaultGateway, object_path};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    assets: Vec<Asset>,
    blobs: HashMap<(String, String), Vec<u8>>,
}

/// In-memory gateway.
///
/// Intended for tests/dev. Records are kept in insertion order; listings are
/// returned most recent first.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    state: RwLock<State>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs (test observability).
    pub fn blob_count(&self) -> usize {
        self.state.read().map(|state| state.blobs.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl VaultGateway for InMemoryGateway {
    async fn find_user_by_key(&self, key: &str) -> GatewayResult<Option<User>> {
        let state = self
            .state
            .read()
            .map_err(|_| GatewayError::unavailable("state lock poisoned"))?;
        Ok(state.users.iter().find(|u| u.identity_key == key).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> GatewayResult<User> {
        let mut state = self
            .state
            .write()
            .map_err(|_| GatewayError::unavailable("state lock poisoned"))?;

        if state.users.iter().any(|u| u.identity_key == user.identity_key) {
            return Err(GatewayError::conflict(format!(
                "duplicate identity key '{}'",
                user.identity_key
            )));
        }

        let record = User {
            id: UserId::new(),
            identity_key: user.identity_key,
            username: user.username,
            role: Some(user.role),
            tier: Some(user.tier),
            created_at: Utc::now(),
        };
        state.users.push(record.clone());
        Ok(record)
    }

    async fn patch_user(&self, id: UserId, patch: UserPatch) -> GatewayResult<User> {
        let mut state = self
            .state
            .write()
            .map_err(|_| GatewayError::unavailable("state lock poisoned"))?;

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(GatewayError::NotFound)?;

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(role) = patch.role {
            user.role = Some(role);
        }
        if let Some(tier) = patch.tier {
            user.tier = Some(tier);
        }
        Ok(user.clone())
    }

    async fn list_users(&self) -> GatewayResult<Vec<User>> {
        let state = self
            .state
            .read()
            .map_err(|_| GatewayError::unavailable("state lock poisoned"))?;
        Ok(state.users.iter().rev().cloned().collect())
    }

    async fn list_assets(&self) -> GatewayResult<Vec<Asset>> {
        let state = self
            .state
            .read()
            .map_err(|_| GatewayError::unavailable("state lock poisoned"))?;
        Ok(state.assets.iter().rev().cloned().collect())
    }

    async fn insert_asset(&self, asset: NewAsset) -> GatewayResult<Asset> {
        let mut state = self
            .state
            .write()
            .map_err(|_| GatewayError::unavailable("state lock poisoned"))?;

        let record = Asset {
            id: AssetId::new(),
            name: asset.name,
            description: asset.description,
            tier: Some(asset.tier),
            file_path: asset.file_path,
            file_name: asset.file_name,
            file_type: asset.file_type,
            file_size: asset.file_size,
            preview_path: asset.preview_path,
            uploader_id: asset.uploader_id,
            created_at: Utc::now(),
        };
        state.assets.push(record.clone());
        Ok(record)
    }

    async fn put_blob(
        &self,
        bucket: &str,
        path_hint: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> GatewayResult<String> {
        let path = object_path(path_hint);
        let mut state = self
            .state
            .write()
            .map_err(|_| GatewayError::unavailable("state lock poisoned"))?;
        state
            .blobs
            .insert((bucket.to_string(), path.clone()), bytes);
        Ok(path)
    }

    async fn get_blob(&self, bucket: &str, path: &str) -> GatewayResult<Vec<u8>> {
        let state = self
            .state
            .read()
            .map_err(|_| GatewayError::unavailable("state lock poisoned"))?;
        state
            .blobs
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
            .ok_or(GatewayError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_list_orders_most_recent_first() {
        let gateway = InMemoryGateway::new();
        gateway
            .insert_user(NewUser::with_defaults("a", "alice"))
            .await
            .unwrap();
        gateway
            .insert_user(NewUser::with_defaults("b", "bo"))
            .await
            .unwrap();

        let users = gateway.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "bo");
        assert_eq!(users[1].username, "alice");
    }

    #[tokio::test]
    async fn duplicate_identity_key_is_a_conflict() {
        let gateway = InMemoryGateway::new();
        gateway
            .insert_user(NewUser::with_defaults("a", "alice"))
            .await
            .unwrap();
        let err = gateway
            .insert_user(NewUser::with_defaults("a", "alice2"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Conflict(_)));
    }

    #[tokio::test]
    async fn patch_unknown_user_is_not_found() {
        let gateway = InMemoryGateway::new();
        let err = gateway
            .patch_user(UserId::new(), UserPatch::username("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound));
    }

    #[tokio::test]
    async fn blob_round_trip() {
        let gateway = InMemoryGateway::new();
        let path = gateway
            .put_blob("assets", "users/1/kit.zip", "application/zip", vec![1, 2, 3])
            .await
            .unwrap();
        let bytes = gateway.get_blob("assets", &path).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);

        let missing = gateway.get_blob("previews", &path).await.unwrap_err();
        assert!(matches!(missing, GatewayError::NotFound));
    }
}

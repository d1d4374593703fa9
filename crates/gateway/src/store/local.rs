use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use tiervault_access::{Asset, User};
use tiervault_core::{AssetId, UserId};

use crate::error::{GatewayError, GatewayResult};
use crate::records::{NewAsset, NewUser, UserPatch};

use super::r#trait::{VaultGateway, object_path};

const RECORDS_FILE: &str = "records.json";
const BLOBS_DIR: &str = "blobs";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Records {
    users: Vec<User>,
    assets: Vec<Asset>,
}

/// JSON-file-backed gateway for the fully-local deployment variant.
///
/// User/asset records live in a single `records.json` under the root
/// directory; blob payloads live as files under `blobs/<bucket>/<path>`.
/// Records are rewritten after every mutation; the whole store is assumed
/// single-writer (one active context), matching the system's concurrency
/// model.
#[derive(Debug)]
pub struct LocalGateway {
    root: PathBuf,
    records: RwLock<Records>,
}

impl LocalGateway {
    /// Open (or initialize) a local store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> GatewayResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(root.join(BLOBS_DIR))
            .await
            .map_err(|e| GatewayError::unavailable(format!("create store root: {e}")))?;

        let records_path = root.join(RECORDS_FILE);
        let records = match tokio::fs::read(&records_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| GatewayError::unavailable(format!("corrupt records file: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Records::default(),
            Err(e) => return Err(GatewayError::unavailable(format!("read records file: {e}"))),
        };

        Ok(Self {
            root,
            records: RwLock::new(records),
        })
    }

    fn blob_path(&self, bucket: &str, path: &str) -> PathBuf {
        self.root.join(BLOBS_DIR).join(bucket).join(path)
    }

    async fn persist(&self) -> GatewayResult<()> {
        // Serialize under the lock, write after releasing it.
        let json = {
            let records = self
                .records
                .read()
                .map_err(|_| GatewayError::unavailable("records lock poisoned"))?;
            serde_json::to_vec_pretty(&*records)
                .map_err(|e| GatewayError::unavailable(format!("encode records: {e}")))?
        };
        tokio::fs::write(self.root.join(RECORDS_FILE), json)
            .await
            .map_err(|e| GatewayError::unavailable(format!("write records file: {e}")))
    }
}

#[async_trait::async_trait]
impl VaultGateway for LocalGateway {
    async fn find_user_by_key(&self, key: &str) -> GatewayResult<Option<User>> {
        let records = self
            .records
            .read()
            .map_err(|_| GatewayError::unavailable("records lock poisoned"))?;
        Ok(records.users.iter().find(|u| u.identity_key == key).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> GatewayResult<User> {
        let record = {
            let mut records = self
                .records
                .write()
                .map_err(|_| GatewayError::unavailable("records lock poisoned"))?;

            if records.users.iter().any(|u| u.identity_key == user.identity_key) {
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
            records.users.push(record.clone());
            record
        };
        self.persist().await?;
        Ok(record)
    }

    async fn patch_user(&self, id: UserId, patch: UserPatch) -> GatewayResult<User> {
        let record = {
            let mut records = self
                .records
                .write()
                .map_err(|_| GatewayError::unavailable("records lock poisoned"))?;

            let user = records
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
            user.clone()
        };
        self.persist().await?;
        Ok(record)
    }

    async fn list_users(&self) -> GatewayResult<Vec<User>> {
        let records = self
            .records
            .read()
            .map_err(|_| GatewayError::unavailable("records lock poisoned"))?;
        Ok(records.users.iter().rev().cloned().collect())
    }

    async fn list_assets(&self) -> GatewayResult<Vec<Asset>> {
        let records = self
            .records
            .read()
            .map_err(|_| GatewayError::unavailable("records lock poisoned"))?;
        Ok(records.assets.iter().rev().cloned().collect())
    }

    async fn insert_asset(&self, asset: NewAsset) -> GatewayResult<Asset> {
        let record = {
            let mut records = self
                .records
                .write()
                .map_err(|_| GatewayError::unavailable("records lock poisoned"))?;

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
            records.assets.push(record.clone());
            record
        };
        self.persist().await?;
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
        let file = self.blob_path(bucket, &path);
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GatewayError::unavailable(format!("create blob dir: {e}")))?;
        }
        tokio::fs::write(&file, bytes)
            .await
            .map_err(|e| GatewayError::unavailable(format!("write blob: {e}")))?;
        Ok(path)
    }

    async fn get_blob(&self, bucket: &str, path: &str) -> GatewayResult<Vec<u8>> {
        match tokio::fs::read(self.blob_path(bucket, path)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(GatewayError::NotFound),
            Err(e) => Err(GatewayError::unavailable(format!("read blob: {e}"))),
        }
    }
}

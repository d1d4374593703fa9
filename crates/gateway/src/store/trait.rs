use async_trait::async_trait;
use uuid::Uuid;

use tiervault_access::{Asset, User};
use tiervault_core::UserId;

use crate::error::GatewayResult;
use crate::records::{NewAsset, NewUser, UserPatch};

/// The sole path through which user and asset records and binary payloads are
/// read or written.
///
/// ## Design principles
///
/// - **No policy**: access decisions belong to `tiervault-access`; the
///   gateway is pure transport/persistence.
/// - **No storage assumptions**: works with an in-memory implementation
///   (tests/dev), a local JSON-file store, or a remote REST store.
/// - **Every call may fail**: callers must surface a generic unavailable
///   condition and leave local session state untouched on failure.
/// - **Last-write-wins**: no optimistic concurrency on user or asset records;
///   a superseding action may race and the last write wins.
///
/// Listings are ordered by creation time, most recent first.
#[async_trait]
pub trait VaultGateway: Send + Sync {
    /// Look up a user by the stable identity key (external auth id or
    /// username, depending on the authentication shape in use).
    async fn find_user_by_key(&self, key: &str) -> GatewayResult<Option<User>>;

    /// Insert a new user profile. Implementations reject a duplicate
    /// identity key with `Conflict`.
    async fn insert_user(&self, user: NewUser) -> GatewayResult<User>;

    /// Apply a partial update and return the updated record.
    async fn patch_user(&self, id: UserId, patch: UserPatch) -> GatewayResult<User>;

    /// All user profiles, most recently created first.
    async fn list_users(&self) -> GatewayResult<Vec<User>>;

    /// All assets, most recently created first.
    async fn list_assets(&self) -> GatewayResult<Vec<Asset>>;

    /// Insert a new asset record. Asset records are immutable once created.
    async fn insert_asset(&self, asset: NewAsset) -> GatewayResult<Asset>;

    /// Store a binary payload and return its opaque path. `path_hint` carries
    /// the caller's namespace and original file name; implementations derive
    /// a collision-free object path from it.
    async fn put_blob(
        &self,
        bucket: &str,
        path_hint: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> GatewayResult<String>;

    /// Fetch a binary payload by its opaque path.
    async fn get_blob(&self, bucket: &str, path: &str) -> GatewayResult<Vec<u8>>;
}

/// Derive a collision-free object path from a caller-supplied hint.
///
/// Directory components of the hint are kept (uploader namespacing); the
/// final segment is replaced by a UUIDv7 name that preserves the extension.
pub(crate) fn object_path(path_hint: &str) -> String {
    let (prefix, file_name) = match path_hint.rsplit_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, path_hint),
    };
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("bin");
    let name = format!("{}.{}", Uuid::now_v7(), ext);
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{name}"),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_keeps_prefix_and_extension() {
        let path = object_path("users/42/drum kit.zip");
        assert!(path.starts_with("users/42/"));
        assert!(path.ends_with(".zip"));
        assert!(!path.contains(' '));
    }

    #[test]
    fn object_path_defaults_missing_extension() {
        assert!(object_path("users/42/README").ends_with(".bin"));
        assert!(object_path("noprefix").ends_with(".bin"));
    }

    #[test]
    fn object_paths_do_not_collide() {
        assert_ne!(object_path("a/x.zip"), object_path("a/x.zip"));
    }
}

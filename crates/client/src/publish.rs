//! Publish (upload) flow.

use tracing::info;

use tiervault_access::{Asset, Session, Tier, can_upload};
use tiervault_gateway::{Buckets, NewAsset, VaultGateway};

use crate::error::{ClientError, ClientResult};

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A publish submission: required metadata, the primary payload, and an
/// optional preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub name: String,
    pub description: String,
    pub tier: Tier,
    pub file: FileUpload,
    pub preview: Option<FileUpload>,
}

impl PublishRequest {
    /// Field validation, performed before any gateway call.
    fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::validation("asset name is required"));
        }
        if self.description.trim().is_empty() {
            return Err(ClientError::validation("asset description is required"));
        }
        if self.file.file_name.trim().is_empty() {
            return Err(ClientError::validation("asset file is required"));
        }
        Ok(())
    }
}

/// Publish a new asset.
///
/// Order of operations is fixed: permission check, then field validation
/// (both local, so rejection causes no gateway traffic), then payload upload,
/// optional preview upload, then the record insert. The insert is never
/// attempted if an upload failed.
pub async fn publish_asset(
    gateway: &dyn VaultGateway,
    buckets: &Buckets,
    session: Option<&Session>,
    request: PublishRequest,
) -> ClientResult<Asset> {
    if !can_upload(session) {
        return Err(ClientError::permission_denied(
            "upload role required to publish assets",
        ));
    }
    request.validate()?;

    // can_upload implies a session.
    let uploader = session
        .ok_or_else(|| ClientError::permission_denied("login required"))?
        .user_id();
    let namespace = format!("users/{uploader}");

    let file_size = request.file.bytes.len() as u64;
    let content_type = if request.file.content_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        request.file.content_type.clone()
    };

    let file_path = gateway
        .put_blob(
            &buckets.assets,
            &format!("{namespace}/{}", request.file.file_name),
            &content_type,
            request.file.bytes,
        )
        .await?;

    let preview_path = match request.preview {
        Some(preview) => Some(
            gateway
                .put_blob(
                    &buckets.previews,
                    &format!("{namespace}/{}", preview.file_name),
                    &preview.content_type,
                    preview.bytes,
                )
                .await?,
        ),
        None => None,
    };

    let asset = gateway
        .insert_asset(NewAsset {
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            tier: request.tier,
            file_path,
            file_name: request.file.file_name,
            file_type: content_type,
            file_size,
            preview_path,
            uploader_id: uploader,
        })
        .await?;

    info!(asset_id = %asset.id, uploader = %uploader, "asset published");
    Ok(asset)
}

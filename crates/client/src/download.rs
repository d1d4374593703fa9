//! Download flow.

use tracing::debug;

use tiervault_access::{Asset, Session, can_download};
use tiervault_gateway::{Buckets, VaultGateway};

use crate::error::{ClientError, ClientResult};

/// A fetched payload ready for a local save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedAsset {
    pub file_name: String,
    pub file_type: String,
    pub bytes: Vec<u8>,
}

/// Download an asset's payload.
///
/// Access is re-checked here, at the point of action: if access was lost
/// since the listing rendered (tier downgraded, logout), the request is
/// rejected before any blob fetch is attempted.
pub async fn download_asset(
    gateway: &dyn VaultGateway,
    buckets: &Buckets,
    session: Option<&Session>,
    asset: &Asset,
) -> ClientResult<DownloadedAsset> {
    if !can_download(session, asset) {
        return Err(ClientError::permission_denied(format!(
            "tier does not grant access to '{}'",
            asset.name
        )));
    }

    debug!(asset_id = %asset.id, "download authorized");
    let bytes = gateway.get_blob(&buckets.assets, &asset.file_path).await?;
    Ok(DownloadedAsset {
        file_name: asset.file_name.clone(),
        file_type: asset.file_type.clone(),
        bytes,
    })
}

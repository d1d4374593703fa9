//! Asset listing view model.
//!
//! The listing shows every asset to everyone; only the *affordance* is gated.
//! Gate states are derived exclusively from the access evaluator so the
//! rendered state can never disagree with the download check.

use tiervault_access::{Asset, Session, can_view};
use tiervault_gateway::VaultGateway;

use crate::error::ClientResult;

/// The download affordance state of one listed asset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessGate {
    /// The session's tier grants access.
    Download,
    /// No session: login is required before any tier applies.
    LoginRequired,
    /// Logged in but the tier does not contain the asset's tier.
    UpgradeRequired,
}

/// One asset row as the listing renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCard {
    pub asset: Asset,
    pub gate: AccessGate,
}

impl AssetCard {
    pub fn downloadable(&self) -> bool {
        self.gate == AccessGate::Download
    }
}

/// Compute gate states for a page of assets.
pub fn build_asset_listing(session: Option<&Session>, assets: Vec<Asset>) -> Vec<AssetCard> {
    assets
        .into_iter()
        .map(|asset| {
            let gate = if can_view(session, &asset) {
                AccessGate::Download
            } else if session.is_none() {
                AccessGate::LoginRequired
            } else {
                AccessGate::UpgradeRequired
            };
            AssetCard { asset, gate }
        })
        .collect()
}

/// Fetch the asset listing (most recent first) and gate it for the session.
pub async fn load_asset_listing(
    gateway: &dyn VaultGateway,
    session: Option<&Session>,
) -> ClientResult<Vec<AssetCard>> {
    let assets = gateway.list_assets().await?;
    Ok(build_asset_listing(session, assets))
}

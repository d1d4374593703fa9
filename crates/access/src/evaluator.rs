//! Access evaluator: the only place gating decisions are computed.
//!
//! Every render and every action consults these predicates; downstream code
//! must not re-derive tier or role logic. Centralizing the checks keeps "can
//! render" and "can download" from drifting apart, and guarantees that any
//! uncertainty (no session, unrecognized role or tier) denies silently.
//!
//! - No IO
//! - No panics
//! - No errors (uncertainty returns `false`)

use crate::role::{Capability, role_has_capability};
use crate::tier::tier_grants_access;
use crate::{Asset, Session};

/// Whether the session may view (and download) the asset.
///
/// Requires a session whose tier contains the asset's tier. An asset with a
/// malformed stored tier is visible to no one.
pub fn can_view(session: Option<&Session>, asset: &Asset) -> bool {
    let Some(session) = session else {
        return false;
    };
    match asset.tier {
        Some(asset_tier) => tier_grants_access(session.tier(), asset_tier),
        None => false,
    }
}

/// Whether the session may download the asset's payload.
///
/// Identical to [`can_view`] by design: the affordance shown at render time
/// and the check at the point of action must agree.
pub fn can_download(session: Option<&Session>, asset: &Asset) -> bool {
    can_view(session, asset)
}

/// Whether the session may publish new assets.
pub fn can_upload(session: Option<&Session>) -> bool {
    match session {
        Some(session) => role_has_capability(session.role(), Capability::PublishAsset),
        None => false,
    }
}

/// Whether the session may administer other users' roles and tiers.
pub fn can_administer(session: Option<&Session>) -> bool {
    match session {
        Some(session) => role_has_capability(session.role(), Capability::AdministerUsers),
        None => false,
    }
}

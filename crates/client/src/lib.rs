//! `tiervault-client`: application flows over the access policy and gateway.
//!
//! Each flow takes the current session as an explicit value (no hidden
//! global state) and consults the `tiervault-access` evaluator for every
//! gating decision. Flows re-check permissions at the point of action, not
//! just at render time.

pub mod account;
pub mod admin;
pub mod download;
pub mod error;
pub mod listing;
pub mod publish;

pub use account::change_plan;
pub use admin::{AdminController, FieldPatch};
pub use download::{DownloadedAsset, download_asset};
pub use error::{ClientError, ClientResult};
pub use listing::{AccessGate, AssetCard, build_asset_listing, load_asset_listing};
pub use publish::{FileUpload, PublishRequest, publish_asset};

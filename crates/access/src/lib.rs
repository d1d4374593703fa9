//! `tiervault-access`: tier/role policy and the access evaluator.
//!
//! This crate is intentionally decoupled from transport and storage: it holds
//! the closed tier and role enums, the user/asset/session value types, and the
//! pure predicates every gating decision goes through. Policy lives here
//! exactly once; callers must not re-derive tier or role logic.

pub mod asset;
pub mod evaluator;
pub mod role;
pub mod session;
pub mod tier;
pub mod user;

pub use asset::Asset;
pub use evaluator::{can_administer, can_download, can_upload, can_view};
pub use role::{Capability, Role, role_has_capability};
pub use session::Session;
pub use tier::{Tier, tier_grants_access};
pub use user::User;

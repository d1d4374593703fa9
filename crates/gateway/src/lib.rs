//! `tiervault-gateway`: the persistence/transport boundary for user and
//! asset records and binary payloads.
//!
//! The gateway enforces **no policy**: gating decisions belong to
//! `tiervault-access`. Every operation here may fail (network, remote store),
//! and callers must treat failures as a generic "gateway unavailable"
//! condition without corrupting local session state.

pub mod config;
pub mod error;
pub mod records;
pub mod store;

pub use config::{Buckets, GatewayConfig};
pub use error::{GatewayError, GatewayResult};
pub use records::{NewAsset, NewUser, UserPatch};
pub use store::{InMemoryGateway, LocalGateway, RestGateway, VaultGateway};

//! `tiervault-core`: shared domain primitives.
//!
//! This crate contains **pure domain** building blocks (ids, error model) with
//! no policy and no infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AssetId, UserId};

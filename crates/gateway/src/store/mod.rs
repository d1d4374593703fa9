//! Record/blob store boundary.
//!
//! This module defines the storage-agnostic gateway contract and its three
//! implementations: in-memory (tests/dev), JSON-file-backed (the fully-local
//! variant), and PostgREST/storage over HTTP (the delegated-auth variant).

pub mod in_memory;
pub mod local;
pub mod rest;
pub mod r#trait;

pub use in_memory::InMemoryGateway;
pub use local::LocalGateway;
pub use rest::RestGateway;
pub use r#trait::VaultGateway;

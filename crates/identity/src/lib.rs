//! `tiervault-identity`: identity resolution and the session store.
//!
//! Turns authentication evidence (a delegated OAuth completion or a bare
//! self-asserted username) into a canonical user profile, and holds the
//! current context's cached session. The authentication shape is pluggable;
//! the tier/role policy itself lives once in `tiervault-access`.

pub mod resolver;
pub mod session;

pub use resolver::{AuthEvidence, IdentityResolver};
pub use session::{AuthState, JsonFileBackend, MemoryBackend, SessionBackend, SessionStore};

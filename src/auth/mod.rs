//! Authentication module
//!
//! Supports: Bearer, Session login, JWT service accounts, AWS SigV4
//!
//! The `Authenticator` handles all auth types and manages token caching
//! for auth types that require token refresh.

mod authenticator;
mod sigv4;
mod types;

pub use authenticator::{extract_jsonpath, Authenticator, SignableRequest};
pub use sigv4::{sign_request, signing_key, SigV4Credentials};
pub use types::{AuthConfig, CachedToken};

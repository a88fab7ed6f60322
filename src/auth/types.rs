//! Auth configuration types
//!
//! Each warehouse client resolves its credentials into one of these before
//! building its HTTP client.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Static bearer token (Databricks personal access tokens)
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Session-based authentication (login endpoint)
    Session {
        /// Login endpoint URL
        login_url: String,
        /// Login request body
        login_body: Value,
        /// Dotted path to the token in the login response
        token_path: String,
        /// Header name to use for the token
        token_header: String,
        /// Header value template, `{token}` is replaced by the token
        token_format: String,
        /// Dotted path to the token lifetime in seconds
        expires_in_path: Option<String>,
    },

    /// Signed JWT exchanged for an access token (service account style)
    Jwt {
        /// Token issuer (iss claim)
        issuer: String,
        /// Token subject (sub claim, optional)
        subject: Option<String>,
        /// Token audience (aud claim)
        audience: String,
        /// RSA private key for RS256 signing (PEM format)
        private_key: String,
        /// Token lifetime in seconds
        token_lifetime_seconds: u64,
        /// Additional claims such as `scope`
        claims: HashMap<String, String>,
        /// Token endpoint for the jwt-bearer exchange; when absent the JWT itself is sent
        token_url: Option<String>,
    },

    /// AWS Signature Version 4 request signing
    AwsSigV4 {
        /// Access key id
        access_key_id: String,
        /// Secret access key
        secret_access_key: String,
        /// Session token for temporary credentials
        session_token: Option<String>,
        /// Region, e.g. `us-west-2`
        region: String,
        /// Signing service name, e.g. `redshift-data`
        service: String,
    },
}

impl AuthConfig {
    /// Whether this config fetches tokens that need caching
    pub fn uses_token(&self) -> bool {
        matches!(self, AuthConfig::Session { .. } | AuthConfig::Jwt { .. })
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}

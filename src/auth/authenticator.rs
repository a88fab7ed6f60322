//! Authenticator implementation
//!
//! Handles applying authentication to requests and managing token refresh.

use super::sigv4::{sign_request, SigV4Credentials};
use super::types::{AuthConfig, CachedToken};
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// The parts of an outgoing request that request signing needs
#[derive(Debug)]
pub struct SignableRequest<'a> {
    /// HTTP method
    pub method: &'a Method,
    /// Absolute URL including query
    pub url: &'a Url,
    /// Request-specific headers
    pub headers: &'a HashMap<String, String>,
    /// Serialized body (empty when there is none)
    pub body: &'a [u8],
}

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Cached token for Session/JWT auth
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(
        &self,
        req: RequestBuilder,
        request: &SignableRequest<'_>,
    ) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),

            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),

            AuthConfig::Session {
                token_header,
                token_format,
                ..
            } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.header(token_header.as_str(), token_format.replace("{token}", &token)))
            }

            AuthConfig::Jwt { .. } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.bearer_auth(token))
            }

            AuthConfig::AwsSigV4 {
                access_key_id,
                secret_access_key,
                session_token,
                region,
                service,
            } => {
                let credentials = SigV4Credentials {
                    access_key_id,
                    secret_access_key,
                    session_token: session_token.as_deref(),
                    region,
                    service,
                };
                let headers: Vec<(String, String)> = request
                    .headers
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                let signed = sign_request(
                    &credentials,
                    request.method.as_str(),
                    request.url,
                    &headers,
                    request.body,
                    Utc::now(),
                )?;

                let mut req = req;
                for (key, value) in signed {
                    req = req.header(key, value);
                }
                Ok(req)
            }
        }
    }

    /// Get a valid token, refreshing if necessary
    pub async fn get_or_refresh_token(&self) -> Result<String> {
        // Check if we have a valid cached token
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        // Need to refresh - acquire write lock
        let mut cached = self.cached_token.write().await;

        // Double-check after acquiring write lock (another task might have refreshed)
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch a new token based on auth type
    async fn fetch_new_token(&self) -> Result<CachedToken> {
        match &self.config {
            AuthConfig::Session {
                login_url,
                login_body,
                token_path,
                expires_in_path,
                ..
            } => {
                self.fetch_session_token(login_url, login_body, token_path, expires_in_path.as_deref())
                    .await
            }

            AuthConfig::Jwt {
                issuer,
                subject,
                audience,
                private_key,
                token_lifetime_seconds,
                claims,
                token_url,
            } => {
                let assertion = JwtAssertion {
                    issuer,
                    subject: subject.as_deref(),
                    audience,
                    private_key,
                    lifetime_seconds: *token_lifetime_seconds,
                    extra_claims: claims,
                };
                self.generate_jwt(&assertion, token_url.as_deref()).await
            }

            _ => Err(Error::auth(
                "Token refresh not supported for this auth type",
            )),
        }
    }

    /// Fetch session token by logging in
    async fn fetch_session_token(
        &self,
        login_url: &str,
        login_body: &Value,
        token_path: &str,
        expires_in_path: Option<&str>,
    ) -> Result<CachedToken> {
        debug!("Logging in at {}", login_url);
        let response = self
            .http_client
            .post(login_url)
            .json(login_body)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth {
                message: format!("Login request failed with status {status}: {body}"),
            });
        }

        let body: Value = response.json().await.map_err(Error::Http)?;

        let token = extract_jsonpath(&body, token_path).ok_or_else(|| {
            let reason = extract_jsonpath(&body, "message")
                .unwrap_or_else(|| format!("Could not extract token from path: {token_path}"));
            Error::Auth { message: reason }
        })?;

        let expires_at = expires_in_path
            .and_then(|path| extract_jsonpath(&body, path))
            .and_then(|v| v.parse::<i64>().ok())
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs));

        Ok(CachedToken::new(token, expires_at))
    }

    /// Generate a JWT and optionally exchange it for an access token
    async fn generate_jwt(
        &self,
        assertion: &JwtAssertion<'_>,
        token_url: Option<&str>,
    ) -> Result<CachedToken> {
        let jwt = assertion.encode()?;

        // Exchange the JWT for an access token when a token endpoint is given
        let Some(url) = token_url else {
            #[allow(clippy::cast_possible_wrap)]
            return Ok(CachedToken::expires_in(
                jwt,
                assertion.lifetime_seconds as i64,
            ));
        };

        let form = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];

        let response = self
            .http_client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::JwtGeneration {
                message: format!("JWT token exchange failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        Ok(token_response.into_cached_token())
    }

    /// Clear the cached token (useful for testing or forced refresh)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

/// Inputs for a signed RS256 assertion
struct JwtAssertion<'a> {
    issuer: &'a str,
    subject: Option<&'a str>,
    audience: &'a str,
    private_key: &'a str,
    lifetime_seconds: u64,
    extra_claims: &'a HashMap<String, String>,
}

impl JwtAssertion<'_> {
    fn encode(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        #[allow(clippy::cast_possible_wrap)]
        let exp = now + self.lifetime_seconds as i64;

        let claims = JwtClaims {
            iss: self.issuer.to_string(),
            sub: self.subject.map(String::from),
            aud: self.audience.to_string(),
            iat: now,
            exp,
            extra: self.extra_claims.clone(),
        };

        let encoding_key =
            EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
                Error::JwtGeneration {
                    message: format!("Invalid private key: {e}"),
                }
            })?;

        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key).map_err(|e| {
            Error::JwtGeneration {
                message: format!("Failed to encode JWT: {e}"),
            }
        })
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    aud: String,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    extra: HashMap<String, String>,
}

/// Extract a value from JSON using a simple dotted path
/// Supports paths like "$.data.token" or "data.token"
pub fn extract_jsonpath(value: &Value, path: &str) -> Option<String> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

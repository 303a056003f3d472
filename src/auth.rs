//! Request credentials
//!
//! Two independent checks live here. The dispatcher gate is
//! [`verify_shared_secret`]: a constant-time comparison of the `X-MCP-Secret`
//! header against the configured value. Bearer-token verification against the
//! identity provider is a separate capability ([`IdentityClient`]) offered to
//! collaborating services; nothing in the dispatch path calls it.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Header carrying the shared secret for the dispatch surface.
pub const MCP_SECRET_HEADER: &str = "x-mcp-secret";

/// Check a caller-supplied shared secret against the configured value.
///
/// A missing header never matches. The comparison is constant-time to
/// prevent timing attacks.
pub fn verify_shared_secret(provided: Option<&str>, expected: &str) -> bool {
    match provided {
        Some(value) => constant_time_compare(value, expected),
        None => false,
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Extract the token from a `Bearer <token>` authorization header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Outcome of an identity check: the verified user object, or a short
/// caller-safe denial reason. Exactly one side is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthResult {
    /// Verified user object as returned by the identity provider
    pub user: Option<Value>,
    /// Denial reason when verification failed
    pub error: Option<String>,
}

impl AuthResult {
    fn authenticated(user: Value) -> Self {
        AuthResult {
            user: Some(user),
            error: None,
        }
    }

    fn denied(reason: &str) -> Self {
        AuthResult {
            user: None,
            error: Some(reason.to_string()),
        }
    }
}

/// Client for the identity provider's user-verification endpoint.
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl IdentityClient {
    /// Create a client for the given provider base URL and service key.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        IdentityClient {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    /// Verify the bearer credential from an `Authorization` header value.
    ///
    /// A missing header is reported as such; every other failure mode
    /// (malformed header, rejected token, unreachable provider) is collapsed
    /// into `Invalid token` so callers learn nothing about the cause.
    pub async fn authenticate_request(&self, authorization: Option<&str>) -> AuthResult {
        let Some(header) = authorization else {
            return AuthResult::denied("Missing Authorization header");
        };
        let token = bearer_token(header).unwrap_or(header);
        self.authenticate(token).await
    }

    /// Verify a raw token against the provider.
    pub async fn authenticate(&self, token: &str) -> AuthResult {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = match self
            .client
            .get(url)
            .bearer_auth(token)
            .header("apikey", &self.service_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!("identity provider unreachable: {err}");
                return AuthResult::denied("Invalid token");
            }
        };

        if !response.status().is_success() {
            debug!("identity provider rejected token: {}", response.status());
            return AuthResult::denied("Invalid token");
        }

        match response.json::<Value>().await {
            Ok(user) => AuthResult::authenticated(user),
            Err(err) => {
                debug!("identity provider returned malformed user: {err}");
                AuthResult::denied("Invalid token")
            }
        }
    }
}

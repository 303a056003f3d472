//! CORS configuration for the HTTP surface
//!
//! The dispatch endpoint is gated by a shared secret, not by origin, so the
//! default layer accepts any origin and relies on the secret check for access
//! control. Deployments that front the server with a known web client can pin
//! origins with [`cors_layer_with_origins`].
//!
//! # Policy
//!
//! - **Allowed Methods**: GET, POST, OPTIONS (preflight)
//! - **Allowed Headers**: Content-Type, Authorization, X-MCP-Secret
//! - **Max Age**: 3600 seconds (1 hour) for preflight caching
//!
//! Preflight OPTIONS requests are answered by the layer before the secret
//! check runs; the browser never sends credentials on a preflight.

use std::time::Duration;

use http::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// The shared-secret header, allowed through CORS so browser-based MCP
/// clients can present it.
pub const MCP_SECRET_HEADER_NAME: HeaderName = HeaderName::from_static("x-mcp-secret");

/// Headers a caller may send to the dispatch endpoint.
pub const ALLOWED_HEADERS: [HeaderName; 3] = [CONTENT_TYPE, AUTHORIZATION, MCP_SECRET_HEADER_NAME];

/// Methods accepted on the HTTP surface.
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Default max age for preflight cache (1 hour)
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// Default CORS layer: any origin, the fixed header and method allow-lists.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}

/// CORS layer restricted to an explicit origin list.
///
/// Same headers, methods, and preflight cache as [`cors_layer`]; only the
/// origin policy changes.
pub fn cors_layer_with_origins(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_header_is_allowed() {
        assert!(ALLOWED_HEADERS
            .iter()
            .any(|h| h.as_str() == "x-mcp-secret"));
    }

    #[test]
    fn test_standard_headers_are_allowed() {
        assert!(ALLOWED_HEADERS.contains(&CONTENT_TYPE));
        assert!(ALLOWED_HEADERS.contains(&AUTHORIZATION));
    }

    #[test]
    fn test_methods_cover_preflight() {
        assert!(ALLOWED_METHODS.contains(&Method::GET));
        assert!(ALLOWED_METHODS.contains(&Method::POST));
        assert!(ALLOWED_METHODS.contains(&Method::OPTIONS));
        assert!(!ALLOWED_METHODS.contains(&Method::DELETE));
    }

    #[test]
    fn test_layers_build() {
        let _ = cors_layer();
        let _ = cors_layer_with_origins(vec![HeaderValue::from_static(
            "https://app.simplestep.example",
        )]);
    }
}

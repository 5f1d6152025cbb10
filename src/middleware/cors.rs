//! CORS policy for the portal.
//!
//! The dashboard is served same-origin, so CORS only matters for the
//! occasional browser client on another origin (e.g. the mobile web build).
//!
//! - Development: any origin, no credentials.
//! - Production: exact-match allowlist from `CORS_ALLOWED_ORIGINS`, no credentials.
//!   An empty allowlist emits no CORS headers at all.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;

fn production_origins(config: &Config) -> AllowOrigin {
    let allowed: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::predicate(move |origin: &HeaderValue, _parts| allowed.contains(origin))
}

pub fn apply(router: Router, config: &Config) -> Router {
    let base = if config.app_env.is_production() {
        CorsLayer::new().allow_origin(production_origins(config))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    // Never pair `Any` with allow_credentials(true).
    let cors = base
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .max_age(Duration::from_secs(600));

    router.layer(cors)
}

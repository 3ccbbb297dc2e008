//! # CORS
//!
//! Cross-origin policy for browser clients.

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Build the CORS layer.
///
/// With a frontend URL only that origin is allowed; without one any origin is.
pub fn build_cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let Some(url) = frontend_url else {
        return layer.allow_origin(Any);
    };

    // Origins never carry a trailing slash
    match HeaderValue::from_str(url.trim().trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!("Ignoring invalid FRONTEND_URL {:?}, allowing any origin", url);
            layer.allow_origin(Any)
        }
    }
}

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use super::config::CorsConfig;

/// Build a CORS layer from config. Returns None when CORS is disabled.
pub fn build_cors_layer(cfg: &CorsConfig) -> Option<CorsLayer> {
    if !cfg.enabled {
        return None;
    }

    let mut layer = CorsLayer::new();

    // Allowed origins
    let any_origin = cfg.allowed_origins.iter().any(|o| o == "*");
    if any_origin {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        if !origins.is_empty() {
            layer = layer.allow_origin(origins);
        }
    }

    // Methods
    let any_method = cfg.allowed_methods.iter().any(|m| m == "*");
    if any_method {
        layer = layer.allow_methods(Any);
    } else {
        let methods: Vec<Method> = cfg
            .allowed_methods
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        if !methods.is_empty() {
            layer = layer.allow_methods(methods);
        }
    }

    // Headers
    let any_header = cfg.allowed_headers.iter().any(|h| h == "*");
    if any_header {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cfg
            .allowed_headers
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        if !headers.is_empty() {
            layer = layer.allow_headers(headers);
        }
    }

    // Credentials cannot be combined with wildcards
    if cfg.allow_credentials {
        if any_origin || any_method || any_header {
            tracing::warn!("cors.allow_credentials ignored: not allowed together with '*'");
        } else {
            layer = layer.allow_credentials(true);
        }
    }

    if cfg.max_age_seconds > 0 {
        layer = layer.max_age(std::time::Duration::from_secs(cfg.max_age_seconds));
    }

    Some(layer)
}

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Builds a CORS layer from config.
///
/// Entries that do not parse are skipped with a warning. The wildcard with
/// credentials combination is rejected earlier by `AppConfig::validate`.
#[must_use]
pub fn build_cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    if cfg.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = parse_all(&cfg.allowed_origins, "origin", |s| {
            HeaderValue::from_str(s).ok()
        });
        if !origins.is_empty() {
            layer = layer.allow_origin(origins);
        }
    }

    if cfg.allowed_methods.iter().any(|m| m == "*") {
        layer = layer.allow_methods(Any);
    } else {
        let methods: Vec<Method> = parse_all(&cfg.allowed_methods, "method", |s| s.parse().ok());
        if !methods.is_empty() {
            layer = layer.allow_methods(methods);
        }
    }

    if cfg.allowed_headers.iter().any(|h| h == "*") {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = parse_all(&cfg.allowed_headers, "header", |s| s.parse().ok());
        if !headers.is_empty() {
            layer = layer.allow_headers(headers);
        }
    }

    if cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    if cfg.max_age_seconds > 0 {
        layer = layer.max_age(std::time::Duration::from_secs(cfg.max_age_seconds));
    }

    layer
}

fn parse_all<T>(raw: &[String], kind: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    raw.iter()
        .filter_map(|s| {
            let parsed = parse(s);
            if parsed.is_none() {
                warn!(kind, value = %s, "ignoring unparsable CORS entry");
            }
            parsed
        })
        .collect()
}

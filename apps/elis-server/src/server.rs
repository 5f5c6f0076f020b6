//! HTTP router, middleware stack and the serve loop.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, OriginalUri};
use axum::http::{Request, Response, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use ordering::OrderingModule;
use ordering::api::rest::error::route_not_found;
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::AppConfig;
use crate::cors;
use crate::shutdown;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// Builds the application router.
///
/// Requests pass, outermost first: set request id, propagate request id,
/// trace, timeout, body limit, CORS, routes.
pub fn build_router(config: &AppConfig, module: &OrderingModule) -> Router {
    let mut router = module
        .register_routes(Router::new())
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .fallback(|OriginalUri(uri): OriginalUri| async move { route_not_found(uri.path()) });

    if config.cors.enabled {
        router = router.layer(cors::build_cors_layer(&config.cors));
    }

    router = router
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes));

    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        config.server.request_timeout,
    ));

    router = apply_trace_layer(router);

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<axum::body::Body>| {
                let request_id = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request_id,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &Response<axum::body::Body>, latency: Duration, span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::debug!("response sent");
                },
            ),
    )
}

/// Binds the configured address and serves until a shutdown signal.
///
/// # Errors
/// Fails when the address cannot be bound or the server stops abnormally.
pub async fn serve(config: &AppConfig, router: Router) -> Result<()> {
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "signal handling failed, shutting down");
            }
        })
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use ordering::OrderingConfig;
    use record_store::{AirtableClient, RecordStoreConfig};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt as _;

    fn app(config: &AppConfig) -> Router {
        let client = AirtableClient::new(&RecordStoreConfig::default()).unwrap();
        let module = OrderingModule::new(Arc::new(client), OrderingConfig::default());
        build_router(config, &module)
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_ok_with_request_id() {
        let response = app(&AppConfig::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(body_json(response).await, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_echoed() {
        let response = app(&AppConfig::default())
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
    }

    #[tokio::test]
    async fn test_unknown_route_is_problem() {
        let response = app(&AppConfig::default())
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"],
            "application/problem+json"
        );
        let json = body_json(response).await;
        assert_eq!(json["code"], "ROUTE_NOT_FOUND");
        assert_eq!(json["instance"], "/nope");
    }

    #[tokio::test]
    async fn test_ordering_routes_are_mounted() {
        // A reversed range is answered without calling the store.
        let response = app(&AppConfig::default())
            .oneshot(
                Request::get("/1001/orders?dayFrom=2020-12-07&dayTo=2020-12-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let response = app(&AppConfig::default())
            .oneshot(
                Request::get("/health")
                    .header("origin", "https://shop.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_cors_can_be_disabled() {
        let mut config = AppConfig::default();
        config.cors.enabled = false;
        let response = app(&config)
            .oneshot(
                Request::get("/health")
                    .header("origin", "https://shop.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = AppConfig::default();
        config.server.body_limit_bytes = 16;
        let body = r#"{"itemCode": 1, "orderDate": "2020-12-01", "pcs": 1}"#;
        let response = app(&config)
            .oneshot(
                Request::post("/1001/orders")
                    .header("content-type", "application/json")
                    .header("content-length", body.len().to_string())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}

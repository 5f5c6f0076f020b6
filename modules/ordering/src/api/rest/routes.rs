use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use super::handlers;
use crate::domain::service::Service;

/// Mounts the ordering endpoints on `router`.
#[must_use]
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let ordering = Router::new()
        .route(
            "/{org_code}/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route("/{org_code}/items", get(handlers::list_items))
        .layer(Extension(service));

    router.merge(ordering)
}

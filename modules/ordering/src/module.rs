//! Wiring of the ordering module: repository, service and routes.

use std::sync::Arc;

use axum::Router;
use record_store::RecordStore;

use crate::api::rest::routes;
use crate::config::OrderingConfig;
use crate::domain::repo::OrderingRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::infra::store_repo::RecordStoreRepository;

/// The ordering module, bound to one record store.
#[derive(Clone)]
pub struct OrderingModule {
    service: Arc<Service>,
}

impl OrderingModule {
    /// Builds the module over `store` with the table layout from `config`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: OrderingConfig) -> Self {
        let repo = Arc::new(RecordStoreRepository::new(store, config.schema));
        Self::with_repository(
            repo,
            ServiceConfig {
                max_pcs_per_order: config.max_pcs_per_order,
            },
        )
    }

    /// Builds the module over any repository implementation.
    #[must_use]
    pub fn with_repository(repo: Arc<dyn OrderingRepository>, config: ServiceConfig) -> Self {
        Self {
            service: Arc::new(Service::new(repo, config)),
        }
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// Adds `/{orgCode}/orders` and `/{orgCode}/items` to `router`.
    #[must_use]
    pub fn register_routes(&self, router: Router) -> Router {
        routes::register_routes(router, self.service())
    }
}

//! HTTP API server with observability for the storefront pipeline.
//!
//! Provides REST endpoints for catalog and order management, with
//! structured logging (tracing) and Prometheus metrics. The event recorder
//! runs as a detached consumer over the event bus.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use domain::{OrderRepository, ProductRepository};
use entity_store::{EntityStore, InMemoryEntityStore};
use events::{
    AuditBus, EventBus, EventRecorder, EventType, InMemoryAuditBus, InMemoryEventBus,
};
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::{OrderService, ProductAdminService, ProductReader};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<S: EntityStore, B, A> {
    pub product_admin: ProductAdminService<S, B>,
    pub product_reader: ProductReader<S>,
    pub order_service: OrderService<S, B, A>,
}

/// Creates the Axum application router with all routes and shared state.
///
/// Anything outside the known method/resource combinations falls through
/// to a 400 `"Bad request"` response.
pub fn create_app<S, B, A>(
    state: Arc<AppState<S, B, A>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/products",
            get(routes::products::list::<S, B, A>).post(routes::products::create::<S, B, A>),
        )
        .route(
            "/products/{id}",
            get(routes::products::get::<S, B, A>)
                .put(routes::products::update::<S, B, A>)
                .delete(routes::products::remove::<S, B, A>),
        )
        .route(
            "/orders",
            get(routes::orders::list::<S, B, A>)
                .post(routes::orders::create::<S, B, A>)
                .delete(routes::orders::remove::<S, B, A>),
        )
        .with_state(state)
        .merge(metrics_router)
        .fallback(routes::bad_request)
        .method_not_allowed_fallback(routes::bad_request)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over in-memory collaborators and
/// spawns the event recorder.
///
/// The recorder subscribes to product events before any publish can
/// happen; order events are published but never recorded.
pub fn create_default_state(
    store: InMemoryEntityStore,
    config: &Config,
) -> (
    Arc<AppState<InMemoryEntityStore, InMemoryEventBus, InMemoryAuditBus>>,
    InMemoryEventBus,
    InMemoryAuditBus,
) {
    let bus = InMemoryEventBus::new();
    let audit = InMemoryAuditBus::new(config.audit_bus_name.as_str());

    let recorder_rx = bus.subscribe(&[
        EventType::ProductCreated,
        EventType::ProductUpdated,
        EventType::ProductDeleted,
    ]);
    EventRecorder::new(
        store.clone(),
        config.events_table.as_str(),
        Duration::from_secs(config.event_ttl_secs),
    )
    .spawn(recorder_rx);

    let product_admin = ProductAdminService::new(
        ProductRepository::new(store.clone(), config.products_table.as_str()),
        bus.clone(),
    );
    let product_reader = ProductReader::new(ProductRepository::new(
        store.clone(),
        config.products_table.as_str(),
    ));
    let order_service = OrderService::new(
        OrderRepository::new(store.clone(), config.orders_table.as_str()),
        ProductRepository::new(store.clone(), config.products_table.as_str()),
        bus.clone(),
        audit.clone(),
    );

    let state = Arc::new(AppState {
        product_admin,
        product_reader,
        order_service,
    });

    (state, bus, audit)
}

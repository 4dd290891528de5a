//! HTTP API server with observability for the checkout pipeline.
//!
//! Provides REST endpoints for cart management, checkout, and order
//! lifecycle, with structured logging (tracing) and Prometheus metrics.
//! The buyer account is identified by the `x-account-id` header; a
//! session layer in front of this service is expected to set it.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use checkout::{
    CartService, CheckoutService, InMemoryCatalog, InMemoryPaymentGateway, NotificationFanout,
    RecordingMailer, RecordingPublisher, SignatureVerifier,
};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// The checkout service as wired by [`create_default_state`]: real
/// store, in-memory collaborators.
pub type DefaultCheckout<S> =
    CheckoutService<S, InMemoryPaymentGateway, RecordingMailer, RecordingPublisher>;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub carts: CartService<S, InMemoryCatalog>,
    pub checkout: DefaultCheckout<S>,
    pub store: S,
}

/// Handles to the in-memory collaborators behind the state, used by
/// tests to seed the catalog and inspect outbound notifications.
pub struct Collaborators {
    pub catalog: InMemoryCatalog,
    pub gateway: InMemoryPaymentGateway,
    pub mailer: RecordingMailer,
    pub publisher: RecordingPublisher,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart", get(routes::cart::get::<S>))
        .route("/cart/lines", post(routes::cart::add_line::<S>))
        .route("/cart/lines/{id}", delete(routes::cart::remove_line::<S>))
        .route("/checkout/session", post(routes::checkout::create_session::<S>))
        .route("/checkout/verify", post(routes::checkout::verify::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}/cancel", put(routes::orders::cancel::<S>))
        .route("/orders/{id}/ship", post(routes::orders::ship::<S>))
        .route("/orders/{id}/deliver", post(routes::orders::deliver::<S>))
        .route(
            "/admin/rates",
            get(routes::admin::get_rates::<S>).put(routes::admin::set_rates::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: the given store plus
/// in-memory collaborators for catalog, gateway, mail, and events.
pub fn create_default_state<S: Store + Clone + 'static>(
    store: S,
    config: &Config,
) -> (Arc<AppState<S>>, Collaborators) {
    let catalog = InMemoryCatalog::new();
    let gateway = InMemoryPaymentGateway::new();
    let mailer = RecordingMailer::new();
    let publisher = RecordingPublisher::new();

    let verifier = SignatureVerifier::new(config.payment_secret.clone());
    let fanout = NotificationFanout::new(
        mailer.clone(),
        publisher.clone(),
        config.operator_email.clone(),
    );
    let checkout = CheckoutService::new(
        store.clone(),
        gateway.clone(),
        verifier,
        fanout,
        config.currency.clone(),
    );
    let carts = CartService::new(store.clone(), catalog.clone());

    let state = Arc::new(AppState {
        carts,
        checkout,
        store,
    });

    (
        state,
        Collaborators {
            catalog,
            gateway,
            mailer,
            publisher,
        },
    )
}

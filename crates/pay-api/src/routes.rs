//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::cors::build_cors_layer;
use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Prefix all payment routes are mounted under
pub const API_PREFIX: &str = "/api/v1/payment";

/// Create the main application router
///
/// Routes:
/// - POST /api/v1/payment/create-intent - Create payment intent
/// - GET  /api/v1/payment/{payment_id} - Payment intent status
/// - POST /api/v1/payment/webhook - Stripe webhook handler
/// - GET  /health - Health check
///
/// Error answers are JSON too:
/// - unmatched path: 404 `{"error": "Not Found"}`
/// - payment path with the wrong method: 405 `{"error": "Method Not Allowed"}`
/// - panicking handler: 500 `{"error": "Internal Server Error"}`
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.config.frontend_url.as_deref());

    let payment_routes = Router::new()
        .route("/create-intent", post(handlers::create_intent))
        .route("/webhook", post(handlers::stripe_webhook))
        .route("/{payment_id}", get(handlers::get_payment_status))
        .method_not_allowed_fallback(handlers::method_not_allowed);

    Router::new()
        .route("/health", get(handlers::health))
        .nest(API_PREFIX, payment_routes)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CatchPanicLayer::custom(handlers::handle_panic)),
        )
        .with_state(state)
}

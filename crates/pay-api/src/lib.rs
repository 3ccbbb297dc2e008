//! # pay-api
//!
//! HTTP API layer for the payment intents service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for creating and inspecting payment intents
//! - Webhook handler for Stripe payment events
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/payment/create-intent` | Create payment intent |
//! | GET | `/api/v1/payment/{payment_id}` | Payment intent status |
//! | POST | `/api/v1/payment/webhook` | Stripe webhook |

pub mod cors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};

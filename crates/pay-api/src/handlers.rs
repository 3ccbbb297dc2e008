//! # Request Handlers
//!
//! Axum request handlers for the payment API.
//! Each handler validates, calls the gateway once, and maps the outcome to JSON.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pay_core::{IntentStatus, PaymentError, PaymentIntentRequest};
use pay_stripe::{dispatch_webhook_event, SIGNATURE_HEADER};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::{error, info, instrument};

const INTERNAL_ERROR: &str = "Internal server error";
const WEBHOOK_FAILED: &str = "Webhook processing failed";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment intent response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    /// Token the browser confirms the payment with
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
}

/// Payment status response
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub status: IntentStatus,
    pub amount: i64,
    pub currency: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a gateway error to a response.
///
/// Errors the caller can act on keep their message; anything else is logged
/// and replaced by `fallback`.
fn payment_error_to_response(err: PaymentError, fallback: &str) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match err.public_message() {
        Some(message) => {
            error!("Payment request failed: {}", err);
            message
        }
        None => {
            error!("Server error: {}", err);
            fallback.to_string()
        }
    };

    (status, Json(ErrorResponse::new(message)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payment-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a payment intent
#[instrument(skip(state, payload))]
pub async fn create_intent(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateIntentResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "Invalid JSON body: {}",
                rejection.body_text()
            ))),
        )
    })?;

    let new_intent = PaymentIntentRequest::from_json(body)
        .and_then(PaymentIntentRequest::validate)
        .map_err(|e| payment_error_to_response(e, INTERNAL_ERROR))?;

    let intent = state
        .gateway
        .create_intent(&new_intent)
        .await
        .map_err(|e| payment_error_to_response(e, INTERNAL_ERROR))?;

    info!("Created payment intent: {}", intent.id);

    Ok(Json(CreateIntentResponse {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
    }))
}

/// Get the current status of a payment intent
#[instrument(skip(state))]
pub async fn get_payment_status(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let intent = state
        .gateway
        .retrieve_intent(&payment_id)
        .await
        .map_err(|e| payment_error_to_response(e, INTERNAL_ERROR))?;

    Ok(Json(PaymentStatusResponse {
        status: intent.status,
        amount: intent.amount,
        currency: intent.currency,
    }))
}

/// Handle Stripe webhook
///
/// The body is taken as raw bytes: the signature covers them verbatim.
#[instrument(skip(state, headers, body))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    // A missing header fails verification like any other bad signature
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let event = state
        .gateway
        .verify_webhook(&body, signature)
        .map_err(|e| payment_error_to_response(e, WEBHOOK_FAILED))?;

    info!(
        event_id = ?event.event_id,
        "Received webhook: type={}",
        event.event_type.name()
    );

    dispatch_webhook_event(&*state.webhook_handler, &event).map_err(|e| {
        error!("Webhook error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(WEBHOOK_FAILED)),
        )
    })?;

    Ok(Json(serde_json::json!({ "status": "success" })))
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not Found")))
}

/// Fallback for a known path hit with the wrong method
pub async fn method_not_allowed() -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method Not Allowed")),
    )
}

/// Response for a panic caught while handling a request
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal Server Error")),
    )
        .into_response()
}

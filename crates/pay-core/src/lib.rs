//! # pay-core
//!
//! Core types and traits for the payment intents service.
//!
//! This crate provides:
//! - `PaymentGateway` trait implemented by the payment provider
//! - `PaymentIntentRequest`, `NewPaymentIntent` and `PaymentIntent` for the intent flow
//! - `WebhookEvent` for verified provider notifications
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{PaymentGateway, PaymentIntentRequest};
//!
//! let request = PaymentIntentRequest::from_json(serde_json::from_slice(body)?)?;
//! let intent = gateway.create_intent(&request.validate()?).await?;
//!
//! // Hand intent.client_secret to the browser
//! ```

pub mod error;
pub mod event;
pub mod gateway;
pub mod intent;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use event::{WebhookEvent, WebhookEventType};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use intent::{IntentStatus, NewPaymentIntent, PaymentIntent, PaymentIntentRequest};

//! # pay-stripe
//!
//! Stripe gateway for the payment intents service.
//!
//! - **StripeGateway** - Payment Intents API (create, retrieve) and webhook verification
//! - **signature** - `Stripe-Signature` header parsing and HMAC-SHA256 checks
//! - **webhook** - dispatch of verified events to a `WebhookHandler`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeGateway;
//! use pay_core::{PaymentGateway, PaymentIntentRequest};
//!
//! // Create gateway from environment
//! let gateway = StripeGateway::from_env()?;
//!
//! let intent = gateway.create_intent(&request.validate()?).await?;
//!
//! // Hand intent.client_secret to the browser
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_stripe::{dispatch_webhook_event, LoggingWebhookHandler};
//!
//! // In your webhook endpoint, with the body exactly as received:
//! let event = gateway.verify_webhook(&body, signature)?;
//! dispatch_webhook_event(&LoggingWebhookHandler, &event)?;
//! ```

pub mod config;
pub mod intents;
pub mod signature;
pub mod webhook;

// Re-exports
pub use config::StripeConfig;
pub use intents::StripeGateway;
pub use signature::{sign_payload, verify_signature, SignatureError, SIGNATURE_HEADER};
pub use webhook::{dispatch_webhook_event, LoggingWebhookHandler, WebhookHandler};

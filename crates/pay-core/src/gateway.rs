//! # Payment Gateway Trait
//!
//! The seam between the HTTP layer and the payment provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentGateway (trait)                   │
//! │  ├── create_intent()                                        │
//! │  ├── retrieve_intent()                                      │
//! │  ├── verify_webhook()                                       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │ StripeGateway │
//!                    └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::event::WebhookEvent;
use crate::intent::{NewPaymentIntent, PaymentIntent};
use async_trait::async_trait;
use std::sync::Arc;

/// Operations the service needs from a payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent.
    ///
    /// # Returns
    /// The provider's intent, including the client secret.
    async fn create_intent(&self, intent: &NewPaymentIntent) -> PaymentResult<PaymentIntent>;

    /// Look up an existing payment intent by its provider ID.
    async fn retrieve_intent(&self, intent_id: &str) -> PaymentResult<PaymentIntent>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes, exactly as received
    /// * `signature` - Signature header from the request
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

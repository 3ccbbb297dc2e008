//! # Stripe Webhook Handling
//!
//! Dispatch of verified webhook events.
//! Only payment outcome events are acted on; every other event type is
//! acknowledged so Stripe stops retrying delivery.

use pay_core::{PaymentError, PaymentResult, WebhookEvent, WebhookEventType};
use tracing::{debug, error, info};

/// Webhook event handler trait
///
/// Implement this trait to react to payment outcomes.
pub trait WebhookHandler: Send + Sync {
    /// Called when a payment intent succeeds
    fn on_payment_succeeded(&self, intent_id: &str, event: &WebhookEvent) -> PaymentResult<()> {
        info!(event_id = ?event.event_id, "Payment succeeded for intent: {}", intent_id);
        Ok(())
    }

    /// Called when a payment attempt fails
    fn on_payment_failed(&self, intent_id: &str, event: &WebhookEvent) -> PaymentResult<()> {
        error!(event_id = ?event.event_id, "Payment failed for intent: {}", intent_id);
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unknown_event(&self, event: &WebhookEvent) -> PaymentResult<()> {
        debug!("Unhandled webhook event: {}", event.event_type.name());
        Ok(())
    }
}

/// Default webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a webhook event to the appropriate handler method
pub fn dispatch_webhook_event(handler: &dyn WebhookHandler, event: &WebhookEvent) -> PaymentResult<()> {
    match &event.event_type {
        WebhookEventType::PaymentSucceeded => {
            handler.on_payment_succeeded(payment_intent_id(event)?, event)
        }
        WebhookEventType::PaymentFailed => {
            handler.on_payment_failed(payment_intent_id(event)?, event)
        }
        WebhookEventType::Unknown(_) => handler.on_unknown_event(event),
    }
}

fn payment_intent_id(event: &WebhookEvent) -> PaymentResult<&str> {
    event.object_id().ok_or_else(|| {
        PaymentError::WebhookParseError(format!(
            "{} event {} has no data.object.id",
            event.event_type.name(),
            event.event_id.as_deref().unwrap_or("without id")
        ))
    })
}

//! # Webhook Event Types
//!
//! Provider-agnostic view of an asynchronous notification that has already
//! passed signature verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// `payment_intent.succeeded`
    PaymentSucceeded,
    /// `payment_intent.payment_failed`
    PaymentFailed,
    /// Any other event (acknowledged, not acted on)
    Unknown(String),
}

impl WebhookEventType {
    /// Map a provider event name onto a known type
    pub fn from_name(name: &str) -> Self {
        match name {
            "payment_intent.succeeded" => WebhookEventType::PaymentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentFailed,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            WebhookEventType::PaymentSucceeded => "payment_intent.succeeded",
            WebhookEventType::PaymentFailed => "payment_intent.payment_failed",
            WebhookEventType::Unknown(name) => name,
        }
    }
}

/// A verified webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider (evt_...)
    pub event_id: Option<String>,

    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// `data.object` of the event, untouched
    pub object: Map<String, Value>,

    /// When the provider created the event
    pub created_at: Option<DateTime<Utc>>,
}

impl WebhookEvent {
    /// `id` of the object the event is about, if it has one
    pub fn object_id(&self) -> Option<&str> {
        self.object.get("id").and_then(Value::as_str)
    }
}

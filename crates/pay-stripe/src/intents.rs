//! # Stripe Payment Intents
//!
//! Implementation of the Stripe Payment Intents API.
//! Intents are created server-side; the browser confirms them with the
//! returned client secret.

use crate::config::StripeConfig;
use crate::signature::verify_signature;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pay_core::{
    NewPaymentIntent, PaymentError, PaymentGateway, PaymentIntent, PaymentResult, WebhookEvent,
    WebhookEventType,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe gateway backed by the Payment Intents REST API
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build an API URL from path segments, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> PaymentResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| {
            PaymentError::Configuration(format!(
                "Invalid Stripe API base URL {:?}: {}",
                self.config.api_base_url, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                PaymentError::Configuration(format!(
                    "Stripe API base URL cannot carry a path: {}",
                    self.config.api_base_url
                ))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(segments);

        Ok(url)
    }

    /// Form parameters for `POST /v1/payment_intents`
    fn create_params(intent: &NewPaymentIntent) -> Vec<(String, String)> {
        let mut params = vec![
            ("amount".to_string(), form_value(&intent.amount)),
            ("currency".to_string(), form_value(&intent.currency)),
        ];

        if intent.automatic_payment_methods {
            params.push((
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ));
        }

        for (key, value) in &intent.metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }

        params
    }

    /// Send an authenticated request and decode a payment intent
    async fn execute(&self, request: RequestBuilder) -> PaymentResult<PaymentIntent> {
        let response = request
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, intent))]
    async fn create_intent(&self, intent: &NewPaymentIntent) -> PaymentResult<PaymentIntent> {
        let url = self.endpoint(&["payment_intents"])?;
        let params = Self::create_params(intent);

        debug!("Creating Stripe payment intent: {} params", params.len());

        let created = self.execute(self.client.post(url).form(&params)).await?;

        info!(
            "Created Stripe payment intent: id={}, status={}",
            created.id, created.status
        );

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn retrieve_intent(&self, intent_id: &str) -> PaymentResult<PaymentIntent> {
        let url = self.endpoint(&["payment_intents", intent_id])?;
        let intent = self.execute(self.client.get(url)).await?;

        debug!(
            "Retrieved Stripe payment intent: id={}, status={}",
            intent.id, intent.status
        );

        Ok(intent)
    }

    #[instrument(skip(self, payload, signature), fields(bytes = payload.len()))]
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent> {
        let secret = self.config.require_webhook_secret()?;

        verify_signature(
            signature,
            payload,
            secret,
            self.config.webhook_tolerance_secs,
            Utc::now().timestamp(),
        )?;

        // Parse the event
        let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e))
        })?;

        debug!("Verified Stripe webhook: type={}", event.event_type);

        Ok(WebhookEvent {
            event_type: WebhookEventType::from_name(&event.event_type),
            created_at: event
                .created
                .as_ref()
                .and_then(Value::as_i64)
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            object: event_object(event.data),
            event_id: event.id,
            provider: PROVIDER.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

fn transport_error(err: reqwest::Error) -> PaymentError {
    if err.is_timeout() {
        PaymentError::Timeout(err.to_string())
    } else {
        PaymentError::NetworkError(err.to_string())
    }
}

/// `data.object` of an event envelope; anything but an object reads as empty
fn event_object(data: Option<Value>) -> Map<String, Value> {
    match data {
        Some(Value::Object(mut data)) => match data.remove("object") {
            Some(Value::Object(object)) => object,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// Render a JSON value as a form field, strings without quotes
fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

/// Event envelope. Only `type` is required; the rest is read leniently so
/// that events this service ignores are still acknowledged.
#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    created: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

//! # Payment Intent Types
//!
//! Request and response shapes for creating and looking up payment intents.
//! Nothing here is persisted; the provider owns the intent lifecycle.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Metadata tag attached to every intent created by this service
pub const INTEGRATION_CHECK_KEY: &str = "integration_check";
pub const INTEGRATION_CHECK_VALUE: &str = "payment_processing_api";

const MISSING_FIELDS: &str = "Missing required fields";

/// Inbound body of `POST /create-intent`.
///
/// Fields are kept as raw JSON so that values of the wrong type reach the
/// provider untouched and are rejected there.
#[derive(Debug, Clone, Default)]
pub struct PaymentIntentRequest {
    /// Amount in the currency's minor unit
    pub amount: Option<Value>,
    /// ISO 4217 code, lowercase
    pub currency: Option<Value>,
}

impl PaymentIntentRequest {
    /// Read the fields out of a decoded JSON body.
    ///
    /// Only a JSON object carries named fields; any other body (array,
    /// string, number, null) is treated as missing them.
    pub fn from_json(body: Value) -> PaymentResult<Self> {
        let Value::Object(mut fields) = body else {
            return Err(PaymentError::InvalidRequest(MISSING_FIELDS.to_string()));
        };

        Ok(Self {
            amount: fields.remove("amount"),
            currency: fields.remove("currency"),
        })
    }

    /// Check that both required fields are present.
    pub fn validate(self) -> PaymentResult<NewPaymentIntent> {
        match (self.amount, self.currency) {
            (Some(amount), Some(currency)) if !amount.is_null() && !currency.is_null() => {
                Ok(NewPaymentIntent::new(amount, currency))
            }
            _ => Err(PaymentError::InvalidRequest(MISSING_FIELDS.to_string())),
        }
    }
}

/// A validated intent ready to be sent to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct NewPaymentIntent {
    pub amount: Value,
    pub currency: Value,
    /// Let the provider pick eligible payment methods
    pub automatic_payment_methods: bool,
    pub metadata: BTreeMap<String, String>,
}

impl NewPaymentIntent {
    pub fn new(amount: Value, currency: Value) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            INTEGRATION_CHECK_KEY.to_string(),
            INTEGRATION_CHECK_VALUE.to_string(),
        );

        Self {
            amount,
            currency,
            automatic_payment_methods: true,
            metadata,
        }
    }
}

/// Lifecycle status of a payment intent as reported by the provider.
///
/// Statuses this service does not know about are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    Other(String),
}

impl IntentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            IntentStatus::RequiresPaymentMethod => "requires_payment_method",
            IntentStatus::RequiresConfirmation => "requires_confirmation",
            IntentStatus::RequiresAction => "requires_action",
            IntentStatus::Processing => "processing",
            IntentStatus::RequiresCapture => "requires_capture",
            IntentStatus::Canceled => "canceled",
            IntentStatus::Succeeded => "succeeded",
            IntentStatus::Other(status) => status,
        }
    }
}

impl From<String> for IntentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "requires_payment_method" => IntentStatus::RequiresPaymentMethod,
            "requires_confirmation" => IntentStatus::RequiresConfirmation,
            "requires_action" => IntentStatus::RequiresAction,
            "processing" => IntentStatus::Processing,
            "requires_capture" => IntentStatus::RequiresCapture,
            "canceled" => IntentStatus::Canceled,
            "succeeded" => IntentStatus::Succeeded,
            _ => IntentStatus::Other(value),
        }
    }
}

impl From<IntentStatus> for String {
    fn from(value: IntentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment intent as returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider-assigned identifier (pi_...)
    pub id: String,

    /// Token the client uses to confirm payment
    #[serde(default)]
    pub client_secret: Option<String>,

    pub status: IntentStatus,

    /// Amount in the currency's minor unit
    pub amount: i64,

    pub currency: String,
}

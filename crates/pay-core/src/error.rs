//! # Payment Error Types
//!
//! Typed error handling for the payment intents service.
//! All gateway operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, unusable client settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request rejected locally before reaching the provider
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error reported by the payment provider's API
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider did not answer within the configured timeout
    #[error("Provider timed out: {0}")]
    Timeout(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error (after the signature was accepted)
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Anything the provider (or the caller) got wrong is a 400; local faults
    /// are a 500 and never carry detail back to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::ProviderError { .. } => 400,
            PaymentError::WebhookVerificationFailed(_) => 400,
            PaymentError::Timeout(_) => 504,
            PaymentError::Configuration(_)
            | PaymentError::NetworkError(_)
            | PaymentError::WebhookParseError(_)
            | PaymentError::Serialization(_) => 500,
        }
    }

    /// Message that may be shown to the API caller, if any
    pub fn public_message(&self) -> Option<String> {
        match self {
            PaymentError::InvalidRequest(message) => Some(message.clone()),
            PaymentError::ProviderError { message, .. } => Some(message.clone()),
            PaymentError::WebhookVerificationFailed(_) => Some("Invalid signature".to_string()),
            PaymentError::Timeout(_) => Some("Payment provider timed out".to_string()),
            _ => None,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! All secrets are loaded from environment variables.

use pay_core::PaymentError;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
pub const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Maximum age of a signed webhook, matching Stripe's own libraries
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Webhook signing secret (whsec_...), only needed by the webhook endpoint
    pub webhook_secret: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Upper bound on a single API call
    pub timeout: Duration,

    /// Accepted clock skew for webhook timestamps, in seconds
    pub webhook_tolerance_secs: i64,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    ///
    /// Optional:
    /// - `STRIPE_WEBHOOK_SECRET`
    /// - `STRIPE_API_BASE`
    /// - `STRIPE_API_VERSION`
    /// - `STRIPE_TIMEOUT_SECS`
    /// - `STRIPE_WEBHOOK_TOLERANCE_SECS`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("STRIPE_SECRET_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PaymentError::Configuration(
                    "Missing required environment variables: STRIPE_SECRET_KEY".to_string(),
                )
            })?;

        let webhook_secret = lookup("STRIPE_WEBHOOK_SECRET").filter(|s| !s.trim().is_empty());

        let timeout_secs = match lookup("STRIPE_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                PaymentError::Configuration(format!(
                    "STRIPE_TIMEOUT_SECS must be a positive integer, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let webhook_tolerance_secs = match lookup("STRIPE_WEBHOOK_TOLERANCE_SECS") {
            Some(raw) => raw.parse::<i64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                PaymentError::Configuration(format!(
                    "STRIPE_WEBHOOK_TOLERANCE_SECS must be a positive integer, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_WEBHOOK_TOLERANCE_SECS,
        };

        Ok(Self {
            secret_key,
            webhook_secret,
            api_base_url: lookup("STRIPE_API_BASE")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_version: lookup("STRIPE_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            webhook_tolerance_secs,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: Some(webhook_secret.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Webhook secret, or a configuration error if it was never set
    pub fn require_webhook_secret(&self) -> Result<&str, PaymentError> {
        self.webhook_secret.as_deref().ok_or_else(|| {
            PaymentError::Configuration("STRIPE_WEBHOOK_SECRET not set".to_string())
        })
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: drop the webhook secret
    pub fn without_webhook_secret(mut self) -> Self {
        self.webhook_secret = None;
        self
    }
}

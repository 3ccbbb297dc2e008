//! # Application State
//!
//! Shared state for the Axum application.
//! Built once at startup and read-only afterwards.

use pay_core::BoxedPaymentGateway;
use pay_stripe::{LoggingWebhookHandler, StripeGateway, WebhookHandler};
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Browser origin allowed by CORS; any origin when unset
    pub frontend_url: Option<String>,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            frontend_url: lookup("FRONTEND_URL").filter(|url| !url.trim().is_empty()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Address to bind the listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            frontend_url: None,
            environment: "development".to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub gateway: BoxedPaymentGateway,
    /// Receiver of verified webhook events
    pub webhook_handler: Arc<dyn WebhookHandler>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe, failing fast on missing credentials
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let gateway = StripeGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        if gateway.config().is_test_mode() {
            info!("Stripe mode: test");
        } else {
            info!("Stripe mode: live");
        }

        if gateway.config().webhook_secret.is_none() {
            warn!("STRIPE_WEBHOOK_SECRET not set, webhook deliveries will be rejected");
        }

        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    /// Create state around an existing gateway
    pub fn with_gateway(config: AppConfig, gateway: BoxedPaymentGateway) -> Self {
        Self {
            gateway,
            webhook_handler: Arc::new(LoggingWebhookHandler),
            config,
        }
    }

    /// Builder: replace the webhook handler
    pub fn with_webhook_handler(mut self, handler: Arc<dyn WebhookHandler>) -> Self {
        self.webhook_handler = handler;
        self
    }
}

//! # Payment API
//!
//! Payment intents service backed by Stripe.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export FRONTEND_URL=http://localhost:3000   # optional
//!
//! # Run the server
//! payment-api
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging(std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false));

    // Fails fast when STRIPE_SECRET_KEY is missing
    let state = AppState::new()?;

    let addr = state.config.bind_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.gateway.provider_name());
    match &state.config.frontend_url {
        Some(origin) => info!("CORS origin: {}", origin),
        None => info!("CORS origin: any"),
    }

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Payment API v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);

    if !is_prod {
        info!("Create intent: POST http://{}{}/create-intent", addr, routes::API_PREFIX);
        info!("Status: GET http://{}{}/{{payment_id}}", addr, routes::API_PREFIX);
        info!("Webhook: POST http://{}{}/webhook", addr, routes::API_PREFIX);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Payment API stopped");
    Ok(())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

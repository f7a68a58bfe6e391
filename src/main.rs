//! Folio API server.
//!
//! Configuration comes from `FOLIO__*` environment variables (see
//! `folio::config`).

use std::sync::Arc;

use secrecy::SecretString;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use folio::adapters::auth::JwtSessionValidator;
use folio::adapters::email::{LoggingEmailSender, ResendEmailSender};
use folio::adapters::http::{build_router, AppState, Repositories};
use folio::adapters::object_storage::LocalObjectStorage;
use folio::adapters::postgres::run_migrations;
use folio::adapters::razorpay::{RazorpayConfig, RazorpayGateway};
use folio::config::AppConfig;
use folio::domain::commerce::PaymentSignatureVerifier;
use folio::ports::EmailSender;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        gateway_configured = config.payment.is_configured(),
        gateway_test_mode = config.payment.is_test_mode(),
        "Starting Folio"
    );

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    tracing::info!("Connected to database");
    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }

    let state = build_state(&config, Repositories::postgres(pool));
    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// JSON lines in production, human-readable output elsewhere. `RUST_LOG`
/// overrides the configured filter.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.as_str()));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_state(config: &AppConfig, repos: Repositories) -> AppState {
    let key_secret = config.payment.razorpay_key_secret.clone().map(SecretString::new);

    let gateway = RazorpayGateway::new(
        RazorpayConfig::new(config.payment.razorpay_key_id.clone(), key_secret.clone())
            .with_base_url(config.payment.api_base_url.clone()),
    );
    let signature_verifier = key_secret
        .filter(|_| config.payment.is_configured())
        .map(PaymentSignatureVerifier::new);

    let email: Arc<dyn EmailSender> = match config.email.api_key() {
        Some(key) => Arc::new(ResendEmailSender::new(
            SecretString::new(key.to_string()),
            config.email.from_header(),
        )),
        None => {
            tracing::warn!("No email API key configured; confirmation emails will only be logged");
            Arc::new(LoggingEmailSender)
        }
    };

    let sessions = JwtSessionValidator::new(
        &SecretString::new(config.auth.jwt_secret.clone()),
        config.auth.jwt_issuer.clone(),
        i64::try_from(config.auth.token_ttl_secs).unwrap_or(i64::MAX),
        repos.users.clone(),
    );

    AppState {
        gateway: Arc::new(gateway),
        email,
        storage: Arc::new(LocalObjectStorage::new(
            config.storage.root_dir.clone(),
            config.storage.public_base_url.clone(),
        )),
        sessions: Arc::new(sessions),
        signature_verifier,
        currency: config.payment.currency.clone(),
        repos,
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

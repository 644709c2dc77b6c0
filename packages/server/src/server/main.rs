// Main entry point for the auth server

use std::sync::Arc;

use anyhow::{Context, Result};
use auth_core::domains::auth::{InMemoryPresenceCache, JwtService};
use auth_core::kernel::{
    NatsClientPublisher, OtpIssuedListener, OtpRequester, PostgresEventStore,
    PostgresProfileStore, ServerDeps,
};
use auth_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,auth_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting auth server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        token_expiry_minutes = config.token_expiry_minutes,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Connect to NATS
    tracing::info!(url = %config.nats_url, "Connecting to NATS...");
    let nats = async_nats::connect(&config.nats_url)
        .await
        .context("Failed to connect to NATS")?;
    tracing::info!("NATS connected");

    let profiles = Arc::new(PostgresProfileStore::new(pool.clone()));
    let deps = ServerDeps::new(
        profiles.clone(),
        Arc::new(PostgresEventStore::new(pool.clone())),
        Arc::new(OtpRequester::new(
            Arc::new(NatsClientPublisher::new(nats.clone())),
            config.otp_request_subject.clone(),
        )),
        Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            chrono::Duration::minutes(config.token_expiry_minutes),
        )),
        Arc::new(InMemoryPresenceCache::new()),
    );

    // OTP fulfillment listener
    let shutdown = CancellationToken::new();
    let issued = OtpIssuedListener::subscribe(
        &nats,
        &config.otp_issued_subject,
        &config.otp_issued_queue_group,
    )
    .await?;
    let listener = OtpIssuedListener::new(profiles);
    let listener_shutdown = shutdown.clone();
    let listener_handle = tokio::spawn(async move {
        listener.run(issued, listener_shutdown).await;
    });

    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let tcp_listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("HTTP server stopped, stopping OTP listener");
    shutdown.cancel();
    if let Err(e) = listener_handle.await {
        tracing::error!(error = %e, "OTP listener task failed");
    }

    if let Err(e) = nats.flush().await {
        tracing::warn!(error = %e, "Failed to flush NATS client");
    }
    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

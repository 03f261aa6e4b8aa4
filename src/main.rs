//!
//! Gaming-lounge POS core service.
//! Reads configuration from TOML file (~/.config/gamelounge-pos/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use gamelounge_pos::application::ports::SimulatedMobileMoney;
use gamelounge_pos::application::services::{
    DailyStatsService, PaymentReconciler, SessionLedger, StationRegistry,
};
use gamelounge_pos::config::AppConfig;
use gamelounge_pos::domain::RepositoryProvider;
use gamelounge_pos::infrastructure::database::migrator::Migrator;
use gamelounge_pos::shared::{listen_for_shutdown_signals, ActivityLog, ShutdownSignal};
use gamelounge_pos::{
    create_api_router, create_event_bus, default_config_path, init_database, ApiContext,
    DatabaseConfig, SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("POS_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Gamelounge POS core service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Repository provider over the shared connection pool
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // Event bus for real-time notifications
    let event_bus = create_event_bus();
    info!("Event bus initialized for real-time notifications");

    // Activity log ring buffer, injected into every service
    let activity = Arc::new(ActivityLog::new());

    // Mobile-money provider. The in-repo implementation simulates the
    // provider; swap here for a live integration.
    let provider = Arc::new(SimulatedMobileMoney::new());

    // ── Services ───────────────────────────────────────────────
    let stats = Arc::new(DailyStatsService::new(repos.clone()));
    let registry = Arc::new(StationRegistry::new(
        repos.clone(),
        event_bus.clone(),
        activity.clone(),
    ));
    let ledger = Arc::new(SessionLedger::new(
        repos.clone(),
        stats.clone(),
        event_bus.clone(),
        activity.clone(),
    ));
    let reconciler = Arc::new(PaymentReconciler::new(
        repos.clone(),
        provider,
        event_bus.clone(),
        activity.clone(),
        app_cfg.payments.poll_config(),
    ));

    // Ensure today's stats row exists so dashboards have a baseline.
    if let Err(e) = stats.get_or_create_today().await {
        warn!("Could not seed today's stats row: {}", e);
    }

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(ApiContext {
        repos,
        registry,
        ledger,
        reconciler,
        stats,
        event_bus,
        activity,
        prometheus: prometheus_handle,
    });

    let api_addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown.clone();
    axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    // Perform final cleanup
    info!("Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Gamelounge POS shutdown complete");
    Ok(())
}

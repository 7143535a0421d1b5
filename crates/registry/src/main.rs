//! Patient Registry Server
//!
//! Serves the patient registry API over a SQLite database.

use clap::Parser;
use registry_rest::{ServerConfig, init_logging};
use tracing::info;

#[cfg(feature = "sqlite")]
use registry_persistence::backends::sqlite::SqliteBackend;

/// Opens the SQLite database named in the configuration and waits until it answers.
#[cfg(feature = "sqlite")]
async fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    use registry_persistence::core::Backend;
    use registry_persistence::startup::{RetryPolicy, wait_until_ready};

    let db_path = config.database_path.as_str();
    info!(database = %db_path, "Initializing SQLite backend");

    let backend = if db_path == ":memory:" {
        SqliteBackend::in_memory()?
    } else {
        SqliteBackend::open(db_path)?
    };

    let policy = RetryPolicy::new(config.startup_attempts, config.startup_delay());
    wait_until_ready(&backend, policy).await?;
    backend.initialize().await?;

    Ok(backend)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        database = %config.database_path,
        "Starting patient registry"
    );

    start_sqlite(config).await
}

/// Starts the server with the SQLite backend.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig) -> anyhow::Result<()> {
    use std::sync::Arc;

    use registry_persistence::startup::seed;
    use registry_rest::create_app_with_shared;
    use tracing::warn;

    let backend = Arc::new(create_sqlite_backend(&config).await?);

    match seed(backend.as_ref(), config.seed_sample_patients).await {
        Ok(report) => info!(
            identification_types = report.identification_types,
            patients = report.patients,
            "Seeding finished"
        ),
        Err(e) => warn!(error = %e, "Seeding failed, continuing without reference data"),
    }

    let app = create_app_with_shared(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p patient-registry --features sqlite"
    )
}

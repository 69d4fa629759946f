//! # Tunebox Server
//!
//! Small HTTP service for audio tracks and albums.
//!
//! Track metadata and albums live in PostgreSQL; audio payloads are stored
//! as files under a configurable storage root.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunebox_core::{
    blob::FsBlobStore,
    database::PostgresDatabase,
    services::{AlbumService, TrackService},
};
use tunebox_server::{
    AppState, create_app,
    infra::config::{Config, ConfigLoad, ConfigLoader},
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "tunebox-server")]
#[command(about = "HTTP service for audio tracks and albums")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, env = "TUNEBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a dotenv file (defaults to ./.env)
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        let config = load_runtime_config(&cli.serve)?;
        let db = connect(&config).await?;
        db.initialize_schema()
            .await
            .context("database migration failed")?;
        info!("Database migrations applied successfully");
        return Ok(());
    }

    run_server(cli.serve).await
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &args.env_file {
        loader = loader.with_env_file(path);
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

async fn connect(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let url = config.database.url.as_deref().context(
        "no database configured; set DATABASE_URL or DATABASE_HOST, DATABASE_USER and DATABASE_NAME",
    )?;
    PostgresDatabase::connect(url, &config.database.pool_settings())
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(&args)?;

    config
        .ensure_directories()
        .with_context(|| {
            format!(
                "failed to create storage root {}",
                config.storage_root().display()
            )
        })?;

    let db = connect(&config).await?;
    db.initialize_schema()
        .await
        .context("database migration failed")?;

    let blobs = Arc::new(FsBlobStore::new(config.storage_root()));
    let tracks = TrackService::new(Arc::new(db.tracks().clone()), blobs);
    let albums = AlbumService::new(Arc::new(db.albums().clone()), tracks.clone());

    let addr = config.bind_address();
    let state = AppState::new(tracks, albums, config);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(address = %addr, "Starting Tunebox server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! FAQ Updater - surfaces the most frequent key phrases from inbound messages
//!
//! Serves the ingestion and FAQ endpoints, and runs the key-phrase
//! aggregation pipeline on a schedule or on demand.

use anyhow::Result;
use clap::{Parser, Subcommand};
use faq_updater::{
    analytics::Pipeline,
    api::build_app,
    config::{FaqUpdaterConfig, StorageBackend},
    extraction::{HttpKeyPhraseService, KeyPhraseService},
    scheduler::AnalyticsScheduler,
    storage::{FileStore, MemoryStore, MessageStore, PhraseStore},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "faq-updater")]
#[command(version)]
#[command(about = "Surfaces the most frequent key phrases from inbound text messages")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FAQ_UPDATER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API and the analytics scheduler
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Do not run the pipeline on a schedule
        #[arg(long)]
        no_schedule: bool,
    },

    /// Run the aggregation pipeline once and print the outcome
    Run,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let config = match &cli.config {
        Some(path) => FaqUpdaterConfig::load(path)?,
        None => FaqUpdaterConfig::default(),
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_schedule,
        } => {
            serve(config, host, port, !no_schedule).await?;
        }
        Commands::Run => {
            let success = run_once(config).await?;
            if !success {
                std::process::exit(1);
            }
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("faq_updater={},tower_http=info", log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Open the configured stores. One object backs both interfaces.
async fn open_stores(
    config: &FaqUpdaterConfig,
) -> Result<(Arc<dyn MessageStore>, Arc<dyn PhraseStore>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            let store = Arc::new(MemoryStore::new(config.storage.page_size));
            let messages: Arc<dyn MessageStore> = store.clone();
            let phrases: Arc<dyn PhraseStore> = store;
            Ok((messages, phrases))
        }
        StorageBackend::File => {
            let store = Arc::new(
                FileStore::open(config.storage.data_dir.clone(), config.storage.page_size).await?,
            );
            tracing::info!(dir = %config.storage.data_dir.display(), "Opened file storage");
            let messages: Arc<dyn MessageStore> = store.clone();
            let phrases: Arc<dyn PhraseStore> = store;
            Ok((messages, phrases))
        }
    }
}

fn build_pipeline(
    config: &FaqUpdaterConfig,
    messages: Arc<dyn MessageStore>,
    phrases: Arc<dyn PhraseStore>,
) -> Result<Arc<Pipeline>> {
    let service: Arc<dyn KeyPhraseService> =
        Arc::new(HttpKeyPhraseService::from_config(&config.extraction)?);
    Ok(Arc::new(Pipeline::from_config(
        config, messages, phrases, service,
    )))
}

async fn serve(
    mut config: FaqUpdaterConfig,
    host: Option<String>,
    port: Option<u16>,
    schedule: bool,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let (messages, phrases) = open_stores(&config).await?;
    let pipeline = build_pipeline(&config, messages.clone(), phrases.clone())?;

    let scheduler = if schedule && config.analytics.interval_secs > 0 {
        let scheduler = AnalyticsScheduler::new(
            pipeline.clone(),
            Duration::from_secs(config.analytics.interval_secs),
        );
        scheduler.start();
        Some(scheduler)
    } else {
        tracing::info!("Analytics scheduler disabled");
        None
    };

    let app = build_app(messages, phrases, pipeline, &config.server.cors_origins);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("FAQ Updater listening on {}. Press Ctrl+C to stop.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    if let Some(scheduler) = scheduler {
        scheduler.stop();
    }
    Ok(())
}

/// Run the pipeline once; returns whether the outcome was `ok` or `no-op`
async fn run_once(config: FaqUpdaterConfig) -> Result<bool> {
    let (messages, phrases) = open_stores(&config).await?;
    let pipeline = build_pipeline(&config, messages, phrases)?;

    let outcome = pipeline.run().await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(outcome.is_success())
}

fn show_config(config: Option<&FaqUpdaterConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}

use clap::{Parser, Subcommand};
use leadline_channels::WhatsAppChannel;
use leadline_core::{display_phone, LogEvent};
use leadline_engine::SessionEngine;
use leadline_gateway::{AppState, Dispatcher, GatewayServer};
use leadline_session::FileSessionStore;
use leadline_sink::{EventSink, FileEventSink, SheetsSink};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Capacity of the webhook event buffer between gateway and dispatcher.
const EVENT_BUFFER: usize = 256;
/// Capacity of each per-sender work queue.
const QUEUE_CAPACITY: usize = 32;

#[derive(Parser)]
#[command(name = "leadline", about = "Leadline — WhatsApp lead capture bot")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "leadline.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Inspect captured leads
    Leads {
        #[command(subcommand)]
        action: LeadsAction,
    },
}

#[derive(Subcommand)]
enum LeadsAction {
    /// List leads recorded by the file sink
    List,
}

#[derive(Deserialize)]
struct LeadlineConfig {
    whatsapp: WhatsAppConfig,
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    sink: SinkConfig,
    #[serde(default)]
    engine: EngineConfig,
}

#[derive(Deserialize)]
struct WhatsAppConfig {
    access_token: String,
    phone_number_id: String,
    verify_token: String,
    #[serde(default)]
    app_secret: Option<String>,
    #[serde(default)]
    api_base: Option<String>,
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SinkConfig {
    File,
    Sheets {
        access_token: String,
        spreadsheet_id: String,
        #[serde(default = "default_sheet_range")]
        range: String,
    },
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::File
    }
}

#[derive(Deserialize)]
struct EngineConfig {
    #[serde(default = "default_io_timeout_secs")]
    io_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            io_timeout_secs: default_io_timeout_secs(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_sheet_range() -> String {
    "Sheet1!A:F".to_string()
}
fn default_io_timeout_secs() -> u64 {
    10
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    // Load config
    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: LeadlineConfig = toml::from_str(&config_str)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            info!("Starting leadline gateway on {}:{}", host, port);

            let store =
                Arc::new(FileSessionStore::new(config.data_dir.join("sessions")).await?);

            let sink: Arc<dyn EventSink> = match config.sink {
                SinkConfig::File => {
                    Arc::new(FileEventSink::new(config.data_dir.join("leads")).await?)
                }
                SinkConfig::Sheets {
                    access_token,
                    spreadsheet_id,
                    range,
                } => {
                    info!(spreadsheet = %spreadsheet_id, "Recording leads to Google Sheets");
                    Arc::new(SheetsSink::new(access_token, spreadsheet_id, range))
                }
            };

            let mut channel = WhatsAppChannel::new(
                config.whatsapp.access_token,
                config.whatsapp.phone_number_id,
                EVENT_BUFFER,
            );
            if let Some(base) = config.whatsapp.api_base {
                channel = channel.with_api_base(base);
            }
            let events = channel
                .take_event_receiver()
                .ok_or_else(|| anyhow::anyhow!("event receiver already taken"))?;
            let channel = Arc::new(channel);

            let engine = Arc::new(SessionEngine::new(
                store,
                channel.clone(),
                sink,
                Duration::from_secs(config.engine.io_timeout_secs),
            )?);

            let dispatcher = Dispatcher::new(engine, QUEUE_CAPACITY);
            let dispatcher_task = tokio::spawn(async move { dispatcher.run(events).await });

            if config.whatsapp.app_secret.is_some() {
                info!("Webhook signature verification enabled");
            }

            let state = Arc::new(AppState {
                channel: channel.clone(),
                verify_token: config.whatsapp.verify_token,
                app_secret: config.whatsapp.app_secret,
            });
            let app = GatewayServer::build(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Leadline gateway listening on {}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            // Serve has stopped accepting webhooks. Close the inbound stream
            // so the dispatcher drains its workers before the process exits.
            channel.close_events().await;
            if let Err(e) = dispatcher_task.await {
                warn!("Dispatcher task failed during drain: {}", e);
            }
            info!("Shutdown complete");
        }
        Commands::Leads { action } => match action {
            LeadsAction::List => {
                let sink = FileEventSink::new(config.data_dir.join("leads")).await?;
                let contents = match tokio::fs::read_to_string(sink.path()).await {
                    Ok(contents) => contents,
                    Err(_) => {
                        println!("No leads captured yet.");
                        return Ok(());
                    }
                };

                let mut total = 0;
                println!("Captured leads:");
                for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                    let event: LogEvent = serde_json::from_str(line)?;
                    let name = event.display_name.as_deref().unwrap_or("Unknown");
                    println!(
                        "  {} — {} [{}] {}",
                        display_phone(&event.sender),
                        name,
                        event.status,
                        event.choice_label
                    );
                    total += 1;
                }
                println!("\nTotal: {total} lead(s)");
            }
        },
    }

    Ok(())
}

/// Completes when the process receives ctrl-c.
///
/// If the signal handler cannot be installed the future never resolves,
/// so the serve loop keeps running.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received; draining in-flight conversations");
}

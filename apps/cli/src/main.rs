use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use passclip_broker::{
    BrokerEvent, Capability, ChannelEventSink, ClipboardBroker, CopyContext, Ownership, PolicyGate,
};
use passclip_clipboard::DefaultClipboard;
use passclip_core::{AppConfig, Payload};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Receiver;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Copy secrets to the clipboard and clean up after them", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy text, wait, then clear it if nobody replaced it
    Copy {
        text: String,
        /// Treat as a secret record field (policy gated, not described in events)
        #[arg(long)]
        sensitive: bool,
        /// Seconds before clearing; overrides the config
        #[arg(long)]
        clear_after: Option<u64>,
    },
    /// Copy a file's bytes under a custom clipboard format
    CopyData {
        #[arg(short, long)]
        format: String,
        file: PathBuf,
        #[arg(long)]
        sensitive: bool,
        #[arg(long)]
        clear_after: Option<u64>,
    },
    /// Clear the clipboard regardless of who wrote it
    Clear,
}

/// Applies the `policy` section of the config.
struct ConfigPolicy {
    copy_to_clipboard: bool,
}

impl PolicyGate for ConfigPolicy {
    fn try_authorize(&self, capability: Capability) -> bool {
        match capability {
            Capability::CopyToClipboard => self.copy_to_clipboard,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let (events, mut event_rx) = ChannelEventSink::channel(100);
    let broker = ClipboardBroker::new(Arc::new(DefaultClipboard::new()), &config)
        .with_policy(ConfigPolicy { copy_to_clipboard: config.policy.copy_to_clipboard })
        .with_events(events);

    let result = match cli.command {
        Commands::Copy { text, sensitive, clear_after } => {
            let delay = clear_delay(clear_after, &config);
            run_copy(&broker, Payload::text(text), sensitive, delay, &mut event_rx).await
        }
        Commands::CopyData { format, file, sensitive, clear_after } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let delay = clear_delay(clear_after, &config);
            run_copy(&broker, Payload::data(format, bytes), sensitive, delay, &mut event_rx).await
        }
        Commands::Clear => {
            let outcome = broker.clear();
            info!(?outcome, "Clipboard cleared");
            Ok(())
        }
    };

    drain_events(&mut event_rx);
    result
}

/// Command-line value wins; `0` means wait for Ctrl-C.
fn clear_delay(flag: Option<u64>, config: &AppConfig) -> Option<Duration> {
    flag.or(config.security.clear_after_secs)
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
}

async fn run_copy(
    broker: &ClipboardBroker,
    payload: Payload,
    sensitive: bool,
    delay: Option<Duration>,
    event_rx: &mut Receiver<BrokerEvent>,
) -> Result<()> {
    if !broker.copy(&payload, sensitive, CopyContext::default())? {
        bail!("Copy to clipboard failed or was denied");
    }
    drain_events(event_rx);

    match delay {
        Some(delay) => {
            info!("Copied. Clearing in {}s (Ctrl-C clears now)", delay.as_secs());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                    }
                }
            }
        }
        None => {
            info!("Copied. Press Ctrl-C to clear");
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
        }
    }

    match broker.clear_if_owner() {
        Ownership::Match => info!("Clipboard cleared"),
        Ownership::Mismatch => info!("Clipboard changed since copy, left untouched"),
        other => warn!(?other, "Clipboard left untouched"),
    }
    Ok(())
}

fn drain_events(rx: &mut Receiver<BrokerEvent>) {
    while let Ok(event) = rx.try_recv() {
        info!("{}", event_summary(&event));
    }
}

// Descriptions may hold copied text; only their length is logged.
fn event_summary(event: &BrokerEvent) -> String {
    format!("Event {:?} ({} bytes described)", event.kind, event.description.len())
}

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use typeahead::typeahead_core::config::Config;
use typeahead::typeahead_core::{FileStore, KvStore, MemoryStore};
use typeahead::typeahead_remote::HttpLookup;

#[derive(Parser)]
#[command(name = "typeahead", about = "Typeahead — terminal search box with remote suggestions")]
struct Cli {
    /// Write debug logs to /tmp/typeahead-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the search box (the default).
    Run {
        /// Override `[lookup] endpoint` from config.toml.
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Serve the built-in disease dataset as a lookup service.
    Serve {
        #[arg(long, default_value = "127.0.0.1:4000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run { endpoint: None }) {
        Command::Run { endpoint } => {
            if cli.debug {
                init_file_logging()?;
            }
            run(endpoint).await
        }
        Command::Serve { addr } => {
            // No TUI on screen, so log straight to stderr.
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(if cli.debug { "debug" } else { "info" }))
                .init();
            typeahead::mock_server::serve(addr).await
        }
    }
}

async fn run(endpoint: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        Config::defaults()
    });
    if let Some(endpoint) = endpoint {
        config.lookup.endpoint = endpoint;
    }

    let lookup = Arc::new(HttpLookup::new(config.lookup.endpoint.clone())?);

    let path = config.cache.resolved_store_path();
    let quota = config.cache.quota_bytes;
    let store: Arc<dyn KvStore> = match FileStore::open(&path, Some(quota)) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            // Recent searches just won't survive a restart.
            tracing::warn!(path = %path.display(), error = %e, "store unavailable, keeping history in memory");
            Arc::new(MemoryStore::with_quota(quota))
        }
    };

    typeahead::typeahead_tui::run(config, lookup, store).await
}

fn init_file_logging() -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/typeahead-debug.log")?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(env_filter("debug"))
        .init();
    tracing::info!("typeahead debug log started — tail -f /tmp/typeahead-debug.log");
    Ok(())
}

fn env_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

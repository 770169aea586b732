use anyhow::Context;
use clap::{Parser, Subcommand};
use custsearch::server::{self, AppState};
use custsearch_core::{config::Config, Dataset, InMemoryStore, Matcher};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "custsearch", about = "Incremental customer search")]
struct Cli {
    /// Verbose logging. In `tui` mode, writes to /tmp/custsearch-debug.log
    /// (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP search service.
    Serve {
        /// Address to bind, e.g. 127.0.0.1:5175.
        #[arg(long)]
        bind: Option<String>,
        /// JSON dataset to serve instead of the built-in demo customers.
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Run the terminal autocomplete client.
    Tui {
        /// API base URL, e.g. http://127.0.0.1:5175/api.
        #[arg(long)]
        url: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, data } => {
            init_stderr_logging(cli.debug);
            let config = load_config();
            serve(config, bind, data)
        }
        Command::Tui { url } => {
            if cli.debug {
                init_file_logging()?;
            }
            let config = load_config();
            custsearch_tui::run(config, url)
        }
    }
}

fn serve(config: Config, bind: Option<String>, data: Option<PathBuf>) -> anyhow::Result<()> {
    let store = match data {
        Some(path) => {
            let dataset = Dataset::from_json_file(&path)
                .with_context(|| format!("reading dataset {}", path.display()))?;
            InMemoryStore::from_dataset(dataset)
                .with_context(|| format!("loading dataset {}", path.display()))?
        }
        None => InMemoryStore::seeded(),
    };
    tracing::info!(customers = store.len(), "store ready");

    let state = AppState::new(Arc::new(store), Matcher::from_config(&config.search));
    let bind = bind.unwrap_or(config.server.bind);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(&bind, state))
}

fn load_config() -> Config {
    Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "config unreadable; using defaults");
        Config::defaults()
    })
}

fn init_stderr_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn init_file_logging() -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/custsearch-debug.log")?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();
    tracing::info!("custsearch debug log started; tail -f /tmp/custsearch-debug.log");
    Ok(())
}

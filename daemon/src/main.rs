//! Eden delegates daemon: serves and queries delegation chains.

use anyhow::Context;
use clap::Parser;
use eden_delegates::{CachedStore, DelegationChainResolver};
use eden_rpc::{AppState, RpcServer, ServerConfig, ShutdownController};
use eden_store::SnapshotStore;
use eden_types::AccountName;
use eden_utils::LogFormat;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "eden-daemon", about = "Eden delegation chain service")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// environment variables and CLI flags override them.
    #[arg(long, env = "EDEN_CONFIG")]
    config: Option<PathBuf>,

    /// JSON snapshot of members and election state.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Host to bind the API server to.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind the API server to.
    #[arg(long)]
    port: Option<u16>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the HTTP API server.
    Serve,
    /// Print the delegation chain above an account as JSON.
    Chain {
        /// Account to start the walk from.
        account: String,
    },
    /// Print the head delegate of the latest election.
    Head,
    /// Print the chief delegates of the latest election.
    Chiefs,
}

fn load_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    apply_cli(&mut config, cli);
    Ok(config)
}

/// CLI flags are the last configuration layer.
fn apply_cli(config: &mut ServerConfig, cli: &Cli) {
    if let Some(ref snapshot) = cli.snapshot {
        config.snapshot_path = Some(snapshot.clone());
    }
    if let Some(ref host) = cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
}

fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<CachedStore<SnapshotStore>>> {
    let path = config
        .snapshot_path
        .as_ref()
        .context("no snapshot configured; pass --snapshot or set EDEN_SNAPSHOT")?;
    let store = SnapshotStore::from_file(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    Ok(Arc::new(CachedStore::new(store, &config.cache)))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    eden_utils::init_logging(config.log_format, &config.log_level);

    let store = open_store(&config)?;
    let resolver = DelegationChainResolver::new(store.clone(), store.clone(), config.chain.clone());

    match cli.command {
        Command::Serve => {
            tracing::info!(
                "Starting {} {} ({}) on {}",
                config.app_name,
                config.app_version,
                config.env,
                config.bind_addr()
            );
            let stats_store = store.clone();
            let state = AppState::new(config, resolver).with_cache_stats(move || stats_store.stats());
            let server = RpcServer::new(state);

            let shutdown = Arc::new(ShutdownController::new());
            let signal_task = {
                let shutdown = shutdown.clone();
                tokio::spawn(async move { shutdown.watch_signals().await })
            };

            server.start(shutdown.listener()).await?;
            signal_task.abort();
            tracing::info!("Eden daemon exited cleanly");
        }
        Command::Chain { account } => {
            let account = AccountName::parse(&account)?;
            let chain = resolver.resolve_chain(Some(account.as_str())).await?;
            print_json(&chain)?;
        }
        Command::Head => {
            print_json(&resolver.head_delegate().await)?;
        }
        Command::Chiefs => {
            print_json(&resolver.chief_delegates().await)?;
        }
    }

    Ok(())
}

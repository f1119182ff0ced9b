/*
[INPUT]:  CLI arguments, YAML configuration file, DRITAN_* environment, OS shutdown signals
[OUTPUT]: Command results on stdout, logs on stderr
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use dritan_cli::commands::{self, Command};
use dritan_cli::config::{CliConfig, ConfigOverrides};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "dritan", version, about = "Dritan Solana market data, wallet analytics and swap client")]
struct Cli {
    /// Config file (defaults to <config dir>/dritan/config.yaml when present)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    /// Tracing filter; falls back to RUST_LOG, then the config file
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    #[command(flatten)]
    overrides: ConfigOverrides,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut config = CliConfig::load(args.config_path.as_deref()).context("load config")?;
    config.apply_env();
    config.apply_overrides(&args.overrides);

    init_tracing(args.log_level.as_deref(), config.log_level.as_deref())?;
    debug!(
        config_path = ?args.config_path,
        has_api_key = config.api_key.is_some(),
        "configuration resolved"
    );

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    commands::run(args.command, &config, shutdown).await
}

fn init_tracing(flag: Option<&str>, configured: Option<&str>) -> Result<()> {
    let filter = match flag {
        Some(level) => EnvFilter::try_new(level).context("invalid log level")?,
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(configured.unwrap_or(DEFAULT_LOG_LEVEL))
                .context("invalid log level in config")?,
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}

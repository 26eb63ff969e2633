// src/main.rs

mod cli;
mod config;
mod domain;
mod errors;
mod listing;
mod locale;
mod services;
mod task;
mod text;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, LogLevelCli};
use config::{Config, LoggingConfig, APP_NAME};
use tui::tracing_layer::TuiLogCollectorLayer;
use tui::{run_tui, UILogEntry};

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = Cli::parse();
    let launch_tui = cli_args.command.is_none() && !cli_args.headless;

    // Tracing needs the configured level, so the config is read first and
    // any load failure is reported once the subscriber is up.
    let loaded = Config::load(cli_args.config.as_deref());
    let logging = match &loaded {
        Ok(cfg) => cfg.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };

    let (log_sender, log_receiver) = mpsc::unbounded_channel::<UILogEntry>();
    let _log_guard = init_tracing(cli_args.log_level, &logging, launch_tui.then_some(log_sender))?;

    info!("Starting {} {}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            if cli_args.config.is_some() {
                return Err(e);
            }
            warn!("Proceeding with default configuration");
            Arc::new(Config::default())
        }
    };
    match &config.source_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("Using built-in default configuration"),
    }
    debug!("Loaded app config: {:?}", config);

    if let Some(command) = cli_args.command {
        cli::handle_command(command, &config).await?;
    } else if launch_tui {
        info!("No subcommand provided and not headless, launching TUI...");
        run_tui(Arc::clone(&config), log_receiver).await?;
    } else {
        println!("{} running in headless mode. No command given. Exiting.", APP_NAME);
    }

    info!("{} shutting down.", APP_NAME);
    Ok(())
}

/// Level precedence: RUST_LOG, then --log-level, then `logging.level`.
///
/// In TUI mode events go to the log view instead of stderr. With
/// `file_logging` on they are also written as JSON lines to a daily file;
/// the returned guard flushes that file and must outlive the program.
fn init_tracing(
    cli_level: Option<LogLevelCli>,
    logging: &LoggingConfig,
    tui_sender: Option<mpsc::UnboundedSender<UILogEntry>>,
) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = cli_level.map(LogLevelCli::as_filter).unwrap_or(logging.level.as_str());
        EnvFilter::new(format!("{}={}", APP_NAME, level))
    });

    let (file_layer, guard) = if logging.file_logging {
        match file_appender(logging) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (Some(fmt::layer().json().with_writer(writer)), Some(guard))
            }
            Err(e) => {
                // The subscriber is not up yet, so stderr is the only outlet.
                eprintln!("File logging disabled: {:#}", e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let stderr_layer = tui_sender
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));
    let tui_layer = tui_sender.map(TuiLogCollectorLayer::new);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .with(tui_layer)
        .try_init()
        .context("Setting default tracing subscriber failed")?;
    Ok(guard)
}

fn file_appender(logging: &LoggingConfig) -> Result<RollingFileAppender> {
    let dir = logging.expanded_log_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(APP_NAME)
        .filename_suffix("log")
        .build(&dir)
        .with_context(|| format!("Failed to open a log file in {}", dir.display()))
}

// viewgen - dispatch layer for chat message components
//
// The library routes interactions (button clicks, select choices, modal
// submissions) to the callbacks registered on views. This binary wraps it
// with configuration management and a scripted demo session.
//
// Architecture:
// - Config: TOML file + env overrides (viewgen::config)
// - Logging: tracing to stderr, optional rotating JSON file, in-memory capture
// - Demo: views, router and a recording host (viewgen::demo)

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use viewgen::config::{Config, LoggingConfig};
use viewgen::logging::{CaptureLayer, LogBuffer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Demo { json: false }) {
        // Config commands run before logging is set up
        Commands::Config { show, reset, path } => cli::handle_config(show, reset, path),
        Commands::Demo { json } => run_demo(json).await,
    }
}

async fn run_demo(json: bool) -> Result<()> {
    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            // A broken config file is fatal: fix it rather than debug defaults
            eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
            eprintln!("║  CONFIG ERROR - Failed to load configuration file           ║");
            eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
            eprintln!("  Error: {:#}\n", e);
            eprintln!("  To reset, run: viewgen config --reset\n");
            std::process::exit(1);
        }
    };

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, &log_buffer);

    tracing::info!("viewgen {} demo starting", viewgen::config::VERSION);
    let report = viewgen::demo::run_demo(&config).await?;
    cli::print_demo_report(&report, &log_buffer, json)
}

/// Initialize tracing: stderr output, in-memory capture for the demo
/// summary, and optional rolling JSON files.
///
/// Precedence: RUST_LOG env var > config file > default "info".
/// The returned guard must be kept alive so file logs flush.
fn init_tracing(
    config: &Config,
    log_buffer: &LogBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logging = &config.logging;
    let directive = logging.filter_directive(std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Warning: Ignoring log filter {:?}: {}", directive, e);
        EnvFilter::new(LoggingConfig::fallback_directive())
    });

    let (file_writer, guard) = match logging.file.as_ref().map(|file| (file, file.appender())) {
        Some((_, Ok(appender))) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (Some(non_blocking), Some(guard))
        }
        Some((file, Err(e))) => {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}. File logging disabled.",
                file.dir, e
            );
            (None, None)
        }
        None => (None, None),
    };

    // File layer uses JSON format for structured log parsing
    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(CaptureLayer::with_max_level(
            log_buffer.clone(),
            logging.capture,
        ))
        .with(file_layer)
        .init();

    guard
}

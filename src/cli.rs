// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - demo: Run the scripted dispatch session against the recording host
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --path: Print the config file location

use clap::{Parser, Subcommand};
use std::io::Write;
use viewgen::config::{Config, VERSION};
use viewgen::demo::DemoReport;
use viewgen::logging::LogBuffer;

/// viewgen - dispatch layer for chat message components
#[derive(Parser)]
#[command(name = "viewgen")]
#[command(version = VERSION)]
#[command(about = "Buttons, selects and modals for chat bots", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scripted session and print what the router did
    Demo {
        /// Print host calls as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Handle `config [--show|--reset|--path]`
pub fn handle_config(show: bool, reset: bool, path: bool) -> anyhow::Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else if reset {
        handle_config_reset()
    } else {
        // No flag provided, show help
        println!("Usage: viewgen config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
        Ok(())
    }
}

fn handle_config_path() -> anyhow::Result<()> {
    let path = Config::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config path"))?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> anyhow::Result<()> {
    let config = Config::load()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> anyhow::Result<()> {
    let path = Config::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config path"))?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Write the default config (using Config's single source of truth)
    std::fs::write(&path, Config::default().to_toml())?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

/// Print a finished demo run
pub fn print_demo_report(report: &DemoReport, logs: &LogBuffer, json: bool) -> anyhow::Result<()> {
    println!("Steps:");
    for (i, step) in report.steps.iter().enumerate() {
        println!("  {}. {:<34} {:?}", i + 1, step.label, step.outcome);
    }

    println!();
    println!("Host calls:");
    for call in &report.host_calls {
        if json {
            println!("{}", serde_json::to_string(call)?);
        } else {
            println!("  {}", call.name());
        }
    }

    // The capture layer only keeps entries at or above the configured level
    let captured = logs.get_all();
    if !captured.is_empty() {
        println!();
        println!("Captured log entries:");
        for entry in &captured {
            println!(
                "  [{}] {:<5} {}",
                entry.timestamp.format("%H:%M:%S%.3f"),
                entry.level.as_str(),
                entry.message
            );
        }
    }
    Ok(())
}

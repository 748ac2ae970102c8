//! Trackpad CLI: use a touchscreen as a laptop-style trackpad.
//!
//! Usage:
//!   trackpad run [OPTIONS]      Emulate a trackpad until interrupted
//!   trackpad check              Check system capabilities
//!   trackpad events [OPTIONS]   Print decoded touchscreen events
//!   trackpad replay <PATH>      Print the actions a recorded trace produces
//!   trackpad toggle --enabled   Enable or disable the touchscreen in Hyprland

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use trackpad_common::config::{AppConfig, RoutingMode};
use trackpad_common::logging::{init_logging, level_for_verbosity};

mod commands;

use commands::GestureOverrides;

#[derive(Parser)]
#[command(
    name = "trackpad",
    about = "Turn a touchscreen into a trackpad with tap, scroll, and drag gestures",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emulate a trackpad until Ctrl+C
    Run {
        /// Touchscreen device node (auto-detected when omitted)
        #[arg(short, long)]
        device: Option<PathBuf>,

        #[command(flatten)]
        gesture: GestureOverrides,

        /// How the raw touchscreen is hidden: hyprctl|grab|none
        #[arg(long)]
        routing: Option<RoutingMode>,

        /// Also record decoded events to a JSONL trace
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Check system capabilities
    Check,

    /// Print decoded touchscreen events until Ctrl+C
    Events {
        /// Touchscreen device node (auto-detected when omitted)
        #[arg(short, long)]
        device: Option<PathBuf>,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        /// Also record events to a JSONL trace
        #[arg(long)]
        record: Option<PathBuf>,

        /// Orientation stored in the trace header (defaults to the configured one)
        #[arg(long)]
        rotate: Option<u16>,
    },

    /// Replay a recorded trace and print the resulting pointer actions
    Replay {
        /// Path to the trace file
        path: PathBuf,

        /// Print actions as JSON lines
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        gesture: GestureOverrides,
    },

    /// Enable or disable the touchscreen in Hyprland
    Toggle {
        /// 1 to enable, 0 to disable
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
        enabled: u8,

        /// Touchscreen device node (auto-detected when omitted)
        #[arg(short, long)]
        device: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    logging.level = level_for_verbosity(cli.verbose, &logging.level);
    init_logging(&logging);

    match cli.command {
        Commands::Run {
            device,
            gesture,
            routing,
            record,
        } => commands::run::run(config, device, gesture, routing, record).await,
        Commands::Check => commands::check::run(&config),
        Commands::Events {
            device,
            json,
            record,
            rotate,
        } => {
            let orientation =
                commands::events::recording_orientation(rotate, config.gesture.orientation)?;
            commands::events::run(device.or(config.device), json, record, orientation).await
        }
        Commands::Replay {
            path,
            json,
            gesture,
        } => commands::replay::run(path, json, gesture, config.gesture).await,
        Commands::Toggle { enabled, device } => {
            commands::toggle::run(enabled == 1, device.or(config.device))
        }
    }
}

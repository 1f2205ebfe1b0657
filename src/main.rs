#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod daemon;
mod errors;
pub mod executor;
pub mod resolver;
pub mod scanner;
pub mod session;
pub mod types;
pub mod webdriver;
mod webdriver_manager;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const _EXIT_COMMAND_ERROR: i32 = 1;
const _EXIT_RESOLVE_FAILED: i32 = 2;
const _EXIT_TARGET_NOT_FOUND: i32 = 3;
const _EXIT_WEBDRIVER_FAILED: i32 = 4;
const _EXIT_EXECUTION_FAILED: i32 = 5;
const _EXIT_NO_ACTIVE_TAB: i32 = 6;

use crate::commands::daemon::DaemonCommands;
use types::OutputFormat;

#[derive(Parser)]
#[command(name = "webpilot")]
#[command(about = "Execute natural-language instructions against a live web page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a page for interactive elements and store the result
    Scan {
        /// URL to open before scanning; re-scans the current page if omitted
        url: Option<String>,

        /// Named session to scan in (defaults to "main")
        #[arg(long)]
        tab: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,
    },

    /// Resolve an instruction against the latest scan and execute it
    Do {
        /// The instruction, e.g. "click 'Login'" or "fill email with \"a@b.com\""
        query: String,

        /// Navigate and re-scan before resolving
        #[arg(long)]
        url: Option<String>,

        /// Named session to act in (defaults to the active one)
        #[arg(long)]
        tab: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,
    },

    /// Print the stored element list of a session
    Elements {
        /// Named session (defaults to the active one)
        #[arg(long)]
        tab: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,
    },

    /// Close a session and its browser
    Close {
        /// Named session (defaults to the active one)
        #[arg(long)]
        tab: Option<String>,
    },

    /// Show daemon and session status
    Status,

    /// Daemon management
    Daemon {
        #[command(subcommand)]
        command: DaemonCommands,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Always clean up WebDriver processes before exiting
    webdriver_manager::GLOBAL_WEBDRIVER_MANAGER.stop_all();

    // Handle exit codes based on error type
    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            let webpilot_err: errors::WebpilotError = match err.downcast::<errors::WebpilotError>()
            {
                Ok(e) => e,
                Err(e) => errors::WebpilotError::Other(e),
            };

            // JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "kind": webpilot_err.kind(),
                "message": webpilot_err.to_string(),
                "exit_code": webpilot_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", webpilot_err);
            std::process::exit(webpilot_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webpilot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { url, tab, format } => {
            commands::scan::handle_scan(url, tab, format).await?
        }

        Commands::Do {
            query,
            url,
            tab,
            format,
        } => commands::r#do::handle_do(query, url, tab, format).await?,

        Commands::Elements { tab, format } => {
            commands::elements::handle_elements(tab, format).await?
        }

        Commands::Close { tab } => commands::close::handle_close(tab).await?,

        Commands::Status => commands::status::handle_status().await?,

        Commands::Daemon { command } => commands::daemon::handle_daemon(command).await?,
    }

    Ok(())
}

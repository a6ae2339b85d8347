//! Walkin - Interactive front-desk console for the walk-in queue
//!
//! Reads one command per line from stdin and renders the queue after each
//! operation. Type `help` for the command list.

mod commands;
mod logging;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use walkin_core::application::{CallPolicy, Capabilities, FrontDesk};
use walkin_core::domain::ServiceRegistry;
use walkin_core::port::id_provider::UuidProvider;
use walkin_core::port::time_provider::SystemTimeProvider;
use walkin_core::port::Announcer;
use walkin_infra_system::{CommandAnnouncer, FallbackAnnouncer, LogAnnouncer, SheetMarketingExport};

use commands::{Flow, Line};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = "walkin> ";

#[derive(Parser)]
#[command(name = "walkin")]
#[command(about = "Walk-in queue front desk", long_about = None)]
#[command(version)]
struct Cli {
    /// Service/counter registry JSON file (built-in defaults when absent)
    #[arg(long, env = "WALKIN_REGISTRY")]
    registry: Option<String>,

    /// Marketing sheet URL for consenting customers
    #[arg(long, env = "WALKIN_MARKETING_SHEET_URL")]
    sheet_url: Option<String>,

    /// Text-to-speech command (e.g. "espeak -s 140"); logs only when unset
    #[arg(long, env = "WALKIN_TTS_COMMAND")]
    tts_command: Option<String>,

    /// Check-in without choosing a service
    #[arg(long)]
    no_service_selection: bool,

    /// Do not offer the marketing opt-in
    #[arg(long)]
    no_marketing: bool,

    /// Disable manager controls (counters, services)
    #[arg(long)]
    no_manager: bool,

    /// Advance the queue before the announcement finishes
    #[arg(long)]
    announce_after: bool,

    /// Log format: pretty or json
    #[arg(long, env = "WALKIN_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

impl Cli {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            with_service_selection: !self.no_service_selection,
            with_marketing_consent: !self.no_marketing,
            with_manager_controls: !self.no_manager,
        }
    }

    fn call_policy(&self) -> CallPolicy {
        if self.announce_after {
            CallPolicy::AdvanceThenAnnounce
        } else {
            CallPolicy::AnnounceThenAdvance
        }
    }
}

fn load_registry(path: Option<&str>) -> Result<ServiceRegistry> {
    let Some(path) = path else {
        return Ok(ServiceRegistry::default());
    };

    let path = shellexpand::tilde(path).into_owned();
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read registry file {}", path))?;
    let registry = ServiceRegistry::from_json(&json)
        .with_context(|| format!("Invalid registry file {}", path))?;

    info!(
        path = %path,
        services = registry.services().len(),
        counters = registry.counters().len(),
        "Registry loaded"
    );
    Ok(registry)
}

fn build_announcer(tts_command: Option<&str>) -> Result<Arc<dyn Announcer>> {
    match tts_command {
        Some(command_line) => {
            let speech = CommandAnnouncer::new(
                command_line,
                vec!["PATH".to_string(), "HOME".to_string(), "DISPLAY".to_string()],
            )
            .map_err(|e| anyhow::anyhow!("Invalid speech command: {}", e))?;
            Ok(Arc::new(FallbackAnnouncer::new(
                Arc::new(speech),
                Arc::new(LogAnnouncer),
            )))
        }
        None => Ok(Arc::new(LogAnnouncer)),
    }
}

fn prompt() -> Result<()> {
    print!("{}", PROMPT.bold());
    std::io::stdout().flush().context("Failed to flush stdout")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    logging::init(&cli.log_format)?;
    info!("Walkin front desk v{} starting...", VERSION);

    // 2. Setup dependencies (DI wiring)
    let registry = load_registry(cli.registry.as_deref())?;
    let announcer = build_announcer(cli.tts_command.as_deref())?;
    let exporter = Arc::new(SheetMarketingExport::new(cli.sheet_url.clone()));

    let mut desk = FrontDesk::new(
        registry,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        announcer,
        exporter,
    )
    .with_capabilities(cli.capabilities())
    .with_call_policy(cli.call_policy());

    println!("{}", "Queue Management System".cyan().bold());
    println!("Type {} for the list of commands.", "help".bold());

    // 3. Command loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let words = commands::split_args(&line);
        if !words.is_empty() {
            match Line::try_parse_from(words) {
                Ok(parsed) => {
                    if commands::run(&mut desk, parsed.command).await? == Flow::Quit {
                        break;
                    }
                }
                // Includes `help` output
                Err(e) => println!("{}", e),
            }
        }
        prompt()?;
    }

    info!(waiting = desk.customers().len(), "Front desk closed");
    Ok(())
}

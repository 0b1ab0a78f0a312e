mod commands;
mod db;
mod error;
mod models;
mod services;
mod utils;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

use crate::commands::form::FieldEdits;
use crate::models::Settings;
use crate::services::audit::{ChannelNotifier, DEFAULT_AUDIT_DELAY};
use crate::services::simulation::SimulationClient;
use crate::services::state::FormController;

#[derive(Parser, Debug)]
#[command(name = "creditsim", about = "French amortization simulator client")]
struct Cli {
    /// Base URL of the simulation service
    #[arg(long, env = "CREDITSIM_API_URL", default_value = "http://127.0.0.1:8000")]
    api_url: String,

    /// Delay before the risk audit status is checked
    #[arg(long, env = "CREDITSIM_AUDIT_DELAY_MS", default_value_t = DEFAULT_AUDIT_DELAY.as_millis() as u64)]
    audit_delay_ms: u64,

    /// SQLite file holding the last-entered form values
    #[arg(long, env = "CREDITSIM_DB", default_value = "creditsim.sqlite")]
    db: String,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored form values
    Show,
    /// Edit form values
    Set(FieldEdits),
    /// Submit the form and print the amortization schedule
    Simulate(FieldEdits),
    /// Fetch the risk audit status of a simulation
    Audit { simulation_id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = load_settings(&cli);

    let client = SimulationClient::new(&settings.api_base_url);
    if let Command::Audit { simulation_id } = &cli.command {
        return commands::audit::show_status(&client, simulation_id).await;
    }

    let db = db::Database::new(PathBuf::from(&settings.db_path))
        .map_err(|e| anyhow!("Open {}: {}", settings.db_path, e))?;
    let (notifier, mut notifications) = ChannelNotifier::new();
    let mut controller = FormController::new(
        Box::new(db),
        client,
        Arc::new(notifier),
        settings.audit_delay,
    );

    match &cli.command {
        Command::Show => commands::form::show(&controller),
        Command::Set(edits) => {
            commands::form::apply_edits(&mut controller, edits);
            commands::form::show(&controller);
        }
        Command::Simulate(edits) => {
            commands::form::apply_edits(&mut controller, edits);
            commands::simulate::run(&mut controller, &mut notifications).await?;
        }
        Command::Audit { .. } => {}
    }

    controller.teardown();
    Ok(())
}

fn load_settings(cli: &Cli) -> Settings {
    Settings {
        api_base_url: cli.api_url.clone(),
        audit_delay: Duration::from_millis(cli.audit_delay_ms),
        db_path: cli.db.clone(),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

pub mod config;
pub mod engine;
pub mod log;
pub mod model;
pub mod obligations;
pub mod summary;
pub mod ui;

use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub enum AppCommand {
    Summary,
    Loans,
}

pub fn run_command(command: AppCommand, ledger_path: Option<&str>) -> Result<()> {
    info!("Household Ledger starting...");

    let ledger = match ledger_path {
        Some(path) => config::Ledger::load_from_path(path)?,
        None => config::Ledger::load()?,
    };
    debug!("Loaded ledger: {ledger:#?}");

    match command {
        AppCommand::Summary => summary::generate_and_display_summary(&ledger),
        AppCommand::Loans => obligations::generate_and_display_report(&ledger),
    }
}

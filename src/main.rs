use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use nestworth::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional ledger file
    #[arg(short, long, global = true)]
    ledger_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for nestworth::AppCommand {
    fn from(cmd: Commands) -> nestworth::AppCommand {
        match cmd {
            Commands::Summary => nestworth::AppCommand::Summary,
            Commands::Loans => nestworth::AppCommand::Loans,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default ledger file
    Setup,
    /// Display household net worth summary
    Summary,
    /// Display open loan obligations
    Loans,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => nestworth::run_command(cmd.into(), cli.ledger_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = nestworth::config::Ledger::default_ledger_path()?;

    if path.exists() {
        anyhow::bail!("Ledger file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_ledger = r#"---
members:
  - id: "me"
    name: "Me"

accounts:
  - id: "checking"
    name: "Checking account"
    member_id: "me"

fixed_assets: []

# Append-only: add a new record to update a value, never edit old ones.
account_valuations: []
asset_valuations: []

# 1 unit of quote_currency = rate units of base_currency
quotes: []

loans: []

base_currency: "USD"
"#;

    std::fs::write(&path, default_ledger)
        .with_context(|| format!("Failed to write ledger file to {}", path.display()))?;

    tracing::info!("Created default ledger at {}", path.display());
    Ok(())
}

mod catalog;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use strata_config::{AppConfig, ConfigLoader};
use strata_migrate::{CommandTokens, JsonFileLedger, MigrationRunner, SeederRunner};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Run schema migrations and seeders.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about)]
struct Args {
    /// Comma-separated tokens. The first one is the command: `migrate`
    /// (optionally followed by `<name>=up` / `<name>=down`), `seed` followed
    /// by seeder names, or `status`.
    tokens: String,

    /// Configuration file (yml, yaml, toml or json).
    #[arg(short, long, env = "STRATA_CONFIG", default_value = "config/database.yml")]
    config: PathBuf,

    /// Override the database path from the config file.
    #[arg(long, env = "STRATA_DATABASE")]
    database: Option<PathBuf>,

    /// Override the ledger path from the config file.
    #[arg(long, env = "STRATA_LEDGER")]
    ledger: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Migrate,
    Seed,
    Status,
}

impl Command {
    fn from_token(token: &str) -> Result<Self> {
        match token {
            "migrate" => Ok(Command::Migrate),
            "seed" | "seeders" => Ok(Command::Seed),
            "status" => Ok(Command::Status),
            other => bail!("unknown command {other:?}: expected migrate, seed or status"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("strata=info,strata_db=info,strata_migrate=info,strata_config=info")
            }),
        )
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("[database] error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every migration or seeder that ran succeeded.
async fn run(args: Args) -> Result<bool> {
    let tokens = CommandTokens::parse(&args.tokens)?;
    let command = Command::from_token(tokens.command())?;
    let config = load_config(&args)?;

    let provider = strata_db::open_provider(&config.database)
        .with_context(|| format!("failed to open {}", config.database.path.display()))?;
    let ledger = Arc::new(JsonFileLedger::new(&config.migrations.ledger_path));

    match command {
        Command::Migrate => {
            let registry = catalog::migrations()?;
            let runner = MigrationRunner::new(provider, ledger, tokens);
            let report = runner.run_all(&registry).await?;
            report::print_migration_report(&report);
            Ok(!report.has_failures())
        }
        Command::Seed => {
            let registry = catalog::seeders()?;
            let runner = SeederRunner::new(provider, tokens);
            let report = runner.run_all(&registry).await;
            report::print_seeder_report(&report);
            Ok(!report.has_failures())
        }
        Command::Status => {
            let registry = catalog::migrations()?;
            let runner = MigrationRunner::new(provider, ledger, tokens);
            report::print_status(&runner.status(&registry)?);
            Ok(true)
        }
    }
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = ConfigLoader::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    if let Some(path) = &args.database {
        config.database.path = path.clone();
    }
    if let Some(path) = &args.ledger {
        config.migrations.ledger_path = path.clone();
    }
    config.validate()?;

    info!(
        "database {} ({:?}), ledger {}",
        config.database.path.display(),
        config.database.provider,
        config.migrations.ledger_path.display()
    );
    Ok(config)
}

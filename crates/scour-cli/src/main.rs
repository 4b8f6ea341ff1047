//! scour CLI: find and purge orphaned Postgres columns.
//!
//! `scour find` lists candidates; `scour purge` asks for confirmation and
//! drops them, committing after each column so an interrupted run can be
//! resumed safely.

mod config;
mod manifest;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use scour::{Candidate, PgSession, PurgeLedger, PurgeRules, find_orphans, purge_columns};

use crate::manifest::ManifestRegistry;

type BoxError = Box<dyn std::error::Error>;

/// Find and purge orphaned Postgres columns.
#[derive(Parser, Debug)]
#[command(name = "scour", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List orphaned columns without touching the schema
    Find {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    /// Find orphaned columns, confirm, and drop them
    Purge {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Path to the model manifest
    #[arg(long)]
    models: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Find { connection } => cmd_find(connection).await,
        Commands::Purge { connection, yes } => cmd_purge(connection, yes).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Everything a command needs: connection URL, registry snapshot, rules.
struct Setup {
    database_url: String,
    registry: ManifestRegistry,
    rules: PurgeRules,
}

fn setup(connection: ConnectionArgs) -> Result<Setup, BoxError> {
    let (file, config_path) = match config::load() {
        Ok((config, path)) => (config, Some(path)),
        Err(config::ConfigError::NotFound) => (config::Config::default(), None),
        Err(e) => return Err(e.into()),
    };

    let database_url = connection
        .database_url
        .or(file.database_url)
        .ok_or("no database URL: pass --database-url or set DATABASE_URL")?;

    // A manifest path from the config file is relative to the directory
    // holding .config/.
    let models = connection.models.or_else(|| {
        file.models.map(|p| match &config_path {
            Some(config_path) => config_path
                .parent()
                .and_then(|dot_config| dot_config.parent())
                .map(|root| root.join(&p))
                .unwrap_or(p),
            None => p,
        })
    });
    let models = models.ok_or("no model manifest: pass --models or set `models` in config")?;

    Ok(Setup {
        database_url,
        registry: ManifestRegistry::load(&models)?,
        rules: file.rules.to_rules(),
    })
}

async fn cmd_find(connection: ConnectionArgs) -> Result<(), BoxError> {
    let setup = setup(connection)?;
    let session = PgSession::connect(&setup.database_url).await?;

    match find_orphans(&session, &setup.registry, &setup.rules).await {
        Ok(candidates) => {
            print_candidates(&candidates);
            Ok(())
        }
        Err(e) if e.is_nothing_to_do() => {
            println!("Nothing to do: no orphaned columns found.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_purge(connection: ConnectionArgs, yes: bool) -> Result<(), BoxError> {
    let setup = setup(connection)?;
    let mut session = PgSession::connect(&setup.database_url).await?;

    let candidates = match find_orphans(&session, &setup.registry, &setup.rules).await {
        Ok(candidates) => candidates,
        Err(e) if e.is_nothing_to_do() => {
            println!("Nothing to do: no orphaned columns found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_candidates(&candidates);
    println!();

    if !yes && !confirm(candidates.len())? {
        println!("Aborted. No columns were dropped.");
        return Ok(());
    }

    session.ensure_ledger().await?;
    let records = session.record_candidates(&candidates).await?;
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();

    let report = purge_columns(&mut session, &ids).await?;

    println!(
        "Purged {} column(s).",
        report.purged.len().to_string().green().bold()
    );
    if !report.missing.is_empty() {
        println!(
            "{} column(s) were already gone and were skipped.",
            report.missing.len().to_string().yellow()
        );
    }
    if !report.already_purged.is_empty() {
        println!(
            "{} record(s) had been purged by an earlier run.",
            report.already_purged.len().to_string().dimmed()
        );
    }

    Ok(())
}

fn print_candidates(candidates: &[Candidate]) {
    println!("{}", "Purge columns".bold());
    println!();
    println!("Orphaned columns ({}):", candidates.len());
    for candidate in candidates {
        println!("  {} {}", "-".red(), candidate);
    }
}

/// The confirmation boundary: a human approves the candidate list.
fn confirm(count: usize) -> Result<bool, BoxError> {
    print!(
        "Drop {} column(s)? This cannot be undone. [y/N] ",
        count.to_string().red().bold()
    );
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

//! MiNote journal tool (minote) - Main entry point
//!
//! Treats a journal CSV file as the record store: commands load it,
//! operate on it, and write it back atomically.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use minote_common::config::{self, TomlConfig};
use minote_common::time;
use minote_sync::stats::record_line;
use minote_sync::transfer::{default_export_file_name, read_import_file, write_export_file};
use minote_sync::{ImportExportEngine, Journal, MemoryStore, RecordStore};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for minote
#[derive(Parser, Debug)]
#[command(name = "minote")]
#[command(about = "Mood journal import/export and duplicate-aware merge")]
#[command(version)]
struct Args {
    /// Config file (overrides MINOTE_CONFIG and the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the journal as a normalized, chronological CSV
    Export {
        #[arg(short, long)]
        journal: PathBuf,
        /// Output file (default: 心情记录_<today>.csv in the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Merge CSV/TXT exports into the journal, skipping duplicates
    Import {
        #[arg(short, long)]
        journal: PathBuf,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Also treat near-time, similar-note records as duplicates
        #[arg(long)]
        loose: bool,
        /// Report without writing the journal back
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print every record, oldest first
    List {
        #[arg(short, long)]
        journal: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Record counts and total time
    Stats {
        #[arg(short, long)]
        journal: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a config file with default values
    Init {
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

/// Per-file import summary
#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    imported: usize,
    skipped: usize,
    malformed: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref());
    let config =
        config::load_config(config_path.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config)?;

    match args.command {
        Command::Export { journal, out } => export(&config, &journal, out).await,
        Command::Import {
            journal,
            files,
            loose,
            dry_run,
            json,
        } => {
            let mut config = config;
            if loose {
                config.duplicates.loose_tier_enabled = true;
            }
            import(&config, &journal, &files, dry_run, json).await
        }
        Command::List { journal, json } => list(&config, &journal, json).await,
        Command::Stats { journal, json } => stats(&config, &journal, json).await,
        Command::Config { action } => match action {
            ConfigAction::Init { path, force } => config_init(args.config.as_deref(), path, force),
            ConfigAction::Show => {
                let text = toml::to_string_pretty(&config)
                    .context("Failed to serialize configuration")?;
                print!("{}", text);
                Ok(())
            }
        },
    }
}

fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let level = &config.logging.level;
            format!("minote={0},minote_sync={0},minote_common={0}", level).into()
        });

    let file_layer = match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

/// Load the journal file into an in-memory store (a missing file is an empty journal)
async fn open_journal(config: &TomlConfig, path: &Path) -> Result<Journal<MemoryStore>> {
    let records = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read journal {}", path.display()))?;
        let loaded = ImportExportEngine::default().import_with_duplicate_check(&text, &[]);
        if loaded.malformed > 0 {
            tracing::warn!(
                malformed = loaded.malformed,
                "Journal {} has unreadable rows",
                path.display()
            );
        }
        loaded.imported
    } else {
        info!("Journal {} does not exist yet, starting empty", path.display());
        Vec::new()
    };

    Ok(Journal::new(MemoryStore::with_records(records), config))
}

async fn export(config: &TomlConfig, journal_path: &Path, out: Option<PathBuf>) -> Result<()> {
    let journal = open_journal(config, journal_path).await?;
    let out = out.unwrap_or_else(|| PathBuf::from(default_export_file_name(&time::now().date())));

    let content = journal.export_csv().await?;
    write_export_file(&out, &content)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("{}", out.display());
    Ok(())
}

async fn import(
    config: &TomlConfig,
    journal_path: &Path,
    files: &[PathBuf],
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let journal = open_journal(config, journal_path).await?;
    let mut reports = Vec::with_capacity(files.len());

    for file in files {
        let text = read_import_file(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let outcome = journal.import_csv(&text).await?;
        reports.push(FileReport {
            file: file.clone(),
            imported: outcome.imported.len(),
            skipped: outcome.skipped,
            malformed: outcome.malformed,
        });
    }

    if dry_run {
        info!("Dry run, journal left unchanged");
    } else {
        let content = journal.export_csv().await?;
        write_export_file(journal_path, &content)
            .with_context(|| format!("Failed to write journal {}", journal_path.display()))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for r in &reports {
            println!(
                "{}: imported {}, skipped {} duplicates, {} unreadable",
                r.file.display(),
                r.imported,
                r.skipped,
                r.malformed
            );
        }
    }
    Ok(())
}

async fn list(config: &TomlConfig, journal_path: &Path, json: bool) -> Result<()> {
    let journal = open_journal(config, journal_path).await?;
    let records = journal.store().all().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}", record_line(record));
        }
    }
    Ok(())
}

async fn stats(config: &TomlConfig, journal_path: &Path, json: bool) -> Result<()> {
    let journal = open_journal(config, journal_path).await?;
    let stats = journal.stats().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", stats);
    }
    Ok(())
}

fn config_init(global: Option<&Path>, path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path
        .or_else(|| config::resolve_config_path(global))
        .or_else(config::default_config_path)
        .context("No config path given and no platform config directory available")?;

    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    config::write_toml_config(&TomlConfig::default(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

//! Valence CLI - command-line interface for the validation engine
//!
//! Architecture: Application Layer - the CLI translates user commands into engine operations
//! and handles external concerns (file I/O, process exit codes, terminal output); all domain
//! logic lives in the library crate (§1, §10).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use valence::cli_files;
use valence::config::DocumentLoader;
use valence::engine::Engine;
use valence::overrides::{OverrideRecord, OverrideStore};
use valence::plugins::PluginLoader;
use valence::report::{ReportFormat, ReportGenerator};
use valence::Result;

/// Valence - architecture-conformance validation engine.
#[derive(Parser)]
#[command(name = "valence")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validates source files against declaratively-defined architecture rules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding validators/ and profiles/ documents
    #[arg(long, global = true, default_value = "valence")]
    documents: PathBuf,

    /// Directory plugin namespaces are discovered under
    #[arg(long, global = true, default_value = "valence/plugins")]
    plugins: PathBuf,

    /// Override store file path
    #[arg(long, global = true, default_value = "valence/overrides.json")]
    overrides: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate paths against a named profile
    Validate {
        /// Profile name to run
        profile: String,

        /// Paths to validate (files or directories)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the fingerprint-based override store
    Override {
        #[command(subcommand)]
        action: OverrideCommands,
    },
}

#[derive(Subcommand)]
enum OverrideCommands {
    /// Suppress a violation identified by its constituent fields
    Add {
        #[arg(long)]
        rule: String,
        #[arg(long = "file")]
        file_path: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        line: Option<u32>,
        #[arg(long)]
        reason: String,
        #[arg(long = "by", default_value = "unknown")]
        added_by: String,
    },

    /// Remove a suppression
    Remove { fingerprint: String },

    /// List every suppressed fingerprint
    List,

    /// Import overrides from an exported file
    Import {
        path: PathBuf,

        /// Merge into the current store instead of replacing it
        #[arg(long, default_value_t = true)]
        merge: bool,
    },

    /// Export the current override set to a file
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_command(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

async fn run_command(cli: Cli) -> Result<i32> {
    let documents = DocumentLoader::new(&cli.documents);
    let plugins = PluginLoader::empty(&cli.plugins);
    let overrides = OverrideStore::new(&cli.overrides);
    let mut engine = Engine::new(documents, plugins, overrides)?;

    match cli.command {
        Commands::Validate { profile, paths, format, output } => {
            run_validate(&mut engine, &profile, paths, &format, output).await
        }
        Commands::Override { action } => run_override(&mut engine, action),
    }
}

async fn run_validate(
    engine: &mut Engine,
    profile: &str,
    paths: Vec<PathBuf>,
    format: &str,
    output: Option<PathBuf>,
) -> Result<i32> {
    let format: ReportFormat = format
        .parse()
        .map_err(|e: String| valence::ValenceError::config(e))?;

    let expanded = cli_files::expand(&paths)?;
    let files = cli_files::load(&expanded)?;

    let report = engine.run(profile, &files)?;
    let rendered = ReportGenerator::render(&report, format)?;

    match output {
        Some(path) => std::fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }

    Ok(if report.passed() { 0 } else { 1 })
}

fn run_override(engine: &mut Engine, action: OverrideCommands) -> Result<i32> {
    match action {
        OverrideCommands::Add { rule, file_path, message, line, reason, added_by } => {
            let mut synthetic =
                valence::model::Violation::synthesize(&rule, Some(file_path.clone()), &message);
            if let Some(line) = line {
                synthetic = synthetic.with_position(line, 0);
            }
            let fingerprint = valence::model::fingerprint(&synthetic, &file_path);
            let record = OverrideRecord::new(
                fingerprint.clone(),
                rule,
                file_path,
                line,
                message,
                reason,
                added_by,
                None,
            );
            engine.overrides_mut().add_record(record);
            engine.save_overrides()?;
            println!("added override {fingerprint}");
            Ok(0)
        }
        OverrideCommands::Remove { fingerprint } => {
            let removed = engine.overrides_mut().remove(&fingerprint);
            engine.save_overrides()?;
            Ok(if removed { 0 } else { 1 })
        }
        OverrideCommands::List => {
            let stats = engine.overrides_mut().stats();
            println!("{} override(s) recorded", stats.total);
            Ok(0)
        }
        OverrideCommands::Import { path, merge } => {
            let count = engine.overrides_mut().import(&path, merge)?;
            engine.save_overrides()?;
            println!("imported {count} override(s)");
            Ok(0)
        }
        OverrideCommands::Export { path } => {
            engine.overrides_mut().export_to_file(&path)?;
            Ok(0)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();
}

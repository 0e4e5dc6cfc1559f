//! # treemirror CLI - keep a folder mirrored and verified
//!
//! ## Usage
//! ```bash
//! # Mirror every 10 minutes, logging to ./sync_log.txt
//! treemirror --source ~/work --destination /mnt/backup/work --interval 600
//!
//! # Ask for anything not given on the command line
//! treemirror
//!
//! # Run one cycle and print the outcome as JSON
//! treemirror -s ~/work -d /mnt/backup/work -i 1 --once --json
//! ```

use clap::Parser;
use colored::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use treemirror::logging::{init_logging, LogOptions, DEFAULT_LOG_FILE};
use treemirror::prompt::Prompter;
use treemirror::{CycleOutcome, Result, Scheduler, SyncConfig, SyncEngine, SyncError, TracingReporter};

/// Exit status for a cycle that ran but failed
const EXIT_CYCLE_FAILED: i32 = 2;

/// treemirror - periodically mirror a directory and verify the copy
#[derive(Parser)]
#[command(name = "treemirror")]
#[command(version)]
#[command(about = "Periodically mirror a directory tree and verify the copy byte-for-byte")]
#[command(long_about = None)]
struct Cli {
    /// Folder to mirror (prompted for when omitted)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Folder to overwrite with the mirror (prompted for when omitted)
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Seconds to wait after a cycle finishes before the next one starts
    #[arg(short, long, value_name = "SECONDS")]
    interval: Option<u64>,

    /// Log file to append to
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log to the console only
    #[arg(long)]
    no_log_file: bool,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,

    /// Run a single cycle and exit with its status
    #[arg(long)]
    once: bool,

    /// With --once, print the cycle outcome as JSON
    #[arg(long, requires = "once")]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e.user_message());
            std::process::exit(1);
        }
    }
}

/// Main command runner
fn run(cli: Cli) -> Result<i32> {
    init_logging(&LogOptions {
        log_file: (!cli.no_log_file).then(|| cli.log_file.clone()),
        verbose: cli.verbose,
    })?;

    let config = Arc::new(resolve_config(&cli)?);
    let engine = Arc::new(SyncEngine::new(config, Arc::new(TracingReporter)));
    let scheduler = Scheduler::new(engine);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    if cli.once {
        let outcomes = runtime.block_on(scheduler.run_cycles(1));
        let outcome = outcomes
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::internal("no cycle was run"))?;
        print_outcome(&outcome, cli.json)?;
        return Ok(if outcome.is_success() { 0 } else { EXIT_CYCLE_FAILED });
    }

    runtime.block_on(scheduler.run());
    Ok(0)
}

/// Combine flags with prompts for anything missing
fn resolve_config(cli: &Cli) -> Result<SyncConfig> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let source = match &cli.source {
        Some(path) => path.clone(),
        None => prompter.source(cli.destination.as_deref())?,
    };
    let destination = match &cli.destination {
        Some(path) => path.clone(),
        None => prompter.destination(&source)?,
    };
    let interval = match cli.interval {
        Some(seconds) => seconds,
        None => prompter.interval()?,
    };

    SyncConfig::new(source, destination, interval)
}

fn print_outcome(outcome: &CycleOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    println!("\n{}", "Cycle Report:".bold());
    println!(
        "  Replace: {}",
        if outcome.replace_ok { "✓ Done".green() } else { "✗ Failed".red() }
    );
    if let Some(error) = &outcome.replace_error {
        println!("    {}", error.red());
    }
    if let Some(stats) = &outcome.replace_stats {
        println!("  Copied: {} files", stats.files_copied.to_string().cyan());
    }

    match &outcome.verification {
        Some(result) if result.overall_success => {
            println!("  Verification: {} ({} files)", "✓ Valid".green(), result.files_checked);
        }
        Some(result) => {
            println!(
                "  Verification: {} ({}/{} files failed)",
                "✗ Invalid".red(),
                result.failures.len(),
                result.files_checked
            );
            for failure in &result.failures {
                println!("    - {}", failure.to_string().yellow());
            }
        }
        None => println!("  Verification: {}", "skipped".dimmed()),
    }

    Ok(())
}

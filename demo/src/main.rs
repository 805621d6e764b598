//! Agent Inbox Reference Runtime: Demo CLI
//!
//! Runs one or all of the scripted review scenarios against the in-memory
//! resume service, or prints the studio link for a session config.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- edit-email
//!   cargo run -p demo -- studio-url --config inbox.toml

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use inbox_contracts::error::InboxResult;
use inbox_ref::{
    scenarios::{authorize, edit_email, respond_issue, studio_link, superseded_tweet},
    CollectingWarnings,
};
use inbox_studio::{StudioConfig, StudioLinker};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Agent inbox: human review of interrupted agent runs.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Agent inbox reference runtime demo",
    long_about = "Runs agent inbox review scenarios showing method selection, argument\n\
                  validation, submission lifecycle, and studio deep links."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five review scenarios in sequence.
    RunAll,
    /// Scenario 1: Edit Email (schema-checked argument edit).
    EditEmail,
    /// Scenario 2: Authorize Tool (accept-only, retry after transport failure).
    Authorize,
    /// Scenario 3: Respond to Issue (edit and response in one payload).
    RespondIssue,
    /// Scenario 4: Superseded Tweet (late events for a replaced interrupt).
    SupersededTweet,
    /// Scenario 5: Studio Link (bundled config and missing deployment URL).
    StudioLink,
    /// Print the studio link for a session config.
    StudioUrl {
        /// TOML session config with `deployment_url` and `thread_id`.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overrides `deployment_url` from the config.
        #[arg(long)]
        deployment_url: Option<String>,
        /// Overrides `thread_id` from the config.
        #[arg(long)]
        thread_id: Option<String>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::StudioUrl {
            config,
            deployment_url,
            thread_id,
        } => studio_url(config, deployment_url, thread_id),
        command => {
            print_banner();
            run_scenarios(command)
        }
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_scenarios(command: Command) -> InboxResult<()> {
    match command {
        Command::RunAll => run_all()?,
        Command::EditEmail => edit_email::run_scenario()?,
        Command::Authorize => authorize::run_scenario()?,
        Command::RespondIssue => respond_issue::run_scenario()?,
        Command::SupersededTweet => superseded_tweet::run_scenario()?,
        Command::StudioLink => studio_link::run_scenario()?,
        Command::StudioUrl { .. } => {}
    }
    println!("All selected scenarios completed successfully.");
    Ok(())
}

fn run_all() -> InboxResult<()> {
    edit_email::run_scenario()?;
    authorize::run_scenario()?;
    respond_issue::run_scenario()?;
    superseded_tweet::run_scenario()?;
    studio_link::run_scenario()?;
    Ok(())
}

// ── Studio link ───────────────────────────────────────────────────────────────

fn studio_url(
    path: Option<PathBuf>,
    deployment_url: Option<String>,
    thread_id: Option<String>,
) -> InboxResult<()> {
    let mut config = match &path {
        Some(path) => StudioConfig::from_file(path)?,
        None => StudioConfig::default(),
    };
    if deployment_url.is_some() {
        config.deployment_url = deployment_url;
    }
    if thread_id.is_some() {
        config.thread_id = thread_id;
    }
    info!(config = ?path, "resolving studio link");

    let warnings = CollectingWarnings::new();
    match StudioLinker::from_config(&config).open(&config, &warnings) {
        Some(url) => println!("{}", url),
        None => {
            for warning in warnings.warnings() {
                eprintln!("{}: {}", warning.title, warning.message);
            }
            std::process::exit(2);
        }
    }
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Agent Inbox Reference Runtime");
    println!("=============================");
    println!();
    println!("Submission pipeline per interrupt:");
    println!("  [1] Lifecycle guard: only idle or failed interrupts may submit");
    println!("  [2] Selected method must be permitted by the interrupt config");
    println!("  [3] Payload built from method and draft (edit needs a change, respond needs text)");
    println!("  [4] Edited arguments checked against args_schema and registered rules");
    println!("  [5] Dispatch, then stream events drive submitting -> streaming -> finished");
    println!();
}

// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Credchain CLI
//!
//! Issues credentials on the ledger and reads them back for verification.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "credchain",
    version,
    about = "Issue and verify credentials on the ledger.",
    long_about = "Issues one-of-one credential tokens (through a deployed credential program, or directly when none is deployed), moves them to students and verifies them. Calls are signed outside this tool: every unsigned call is printed as base64 and the signed bytes are read back from stdin."
)]
struct Cli {
    /// Configuration file. Defaults to ./credchain.toml when present.
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv). RUST_LOG takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print Prometheus metrics after the command finishes.
    #[clap(long, global = true)]
    metrics: bool,

    /// Print results as JSON.
    #[clap(long, global = true)]
    json: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // --- Issuance ---
    /// Issue a credential whose metadata is already uploaded.
    Issue(issue::IssueArgs),

    /// Upload a credential document and its metadata, then issue the credential.
    IssueDocument(issue::IssueDocumentArgs),

    /// Opt an account in to holding a credential token.
    OptIn(transfer::OptInArgs),

    /// Move a credential token to its holder.
    Transfer(transfer::TransferArgs),

    // --- Reads ---
    /// Ask the deployed credential program for its verdict on a token.
    Verify(query::TokenArgs),

    /// Report the best available verification status of a token.
    Status(query::TokenArgs),

    /// Show the credential recorded under a token id.
    Lookup(query::TokenArgs),

    /// List the credentials created by an account.
    List(query::ListArgs),

    /// Show the deployed credential program and its global state.
    ProgramInfo,

    // --- Tools ---
    /// Generate configuration files.
    Config(config::ConfigCmdArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    credchain_telemetry::init::init_tracing(&credchain_telemetry::init::filter_for_verbosity(
        cli.verbose,
    ))?;
    if cli.metrics {
        credchain_telemetry::prometheus::install().context("installing metrics")?;
    }

    let out = Output { json: cli.json };
    let config_path = cli.config.as_deref();
    match cli.command {
        // --- Config needs no node ---
        Commands::Config(args) => config::run(args)?,

        // --- Issuance ---
        Commands::Issue(args) => issue::run(config_path, args, &out).await?,
        Commands::IssueDocument(args) => issue::run_document(config_path, args, &out).await?,
        Commands::OptIn(args) => transfer::run_opt_in(config_path, args, &out).await?,
        Commands::Transfer(args) => transfer::run_transfer(config_path, args, &out).await?,

        // --- Reads ---
        Commands::Verify(args) => query::verify(config_path, args, &out).await?,
        Commands::Status(args) => query::status(config_path, args, &out).await?,
        Commands::Lookup(args) => query::lookup(config_path, args, &out).await?,
        Commands::List(args) => query::list(config_path, args, &out).await?,
        Commands::ProgramInfo => query::program_info(config_path, &out).await?,
    }

    if cli.metrics {
        print!(
            "{}",
            credchain_telemetry::prometheus::render().context("rendering metrics")?
        );
    }
    Ok(())
}

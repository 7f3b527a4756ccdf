// Path: crates/cli/src/commands/config.rs

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use credchain_cli::context::DEFAULT_CONFIG_FILE;
use credchain_types::config::CredchainConfig;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct ConfigCmdArgs {
    #[clap(subcommand)]
    pub command: ConfigSubCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubCommands {
    /// Write a credchain.toml with every default spelled out.
    New {
        #[clap(long, default_value = ".")]
        out_dir: PathBuf,
        /// Deployed credential program, 0 for none.
        #[clap(long, default_value = "0")]
        program_id: u64,
        /// Overwrite an existing file.
        #[clap(long)]
        force: bool,
    },
}

pub fn run(args: ConfigCmdArgs) -> Result<()> {
    match args.command {
        ConfigSubCommands::New {
            out_dir,
            program_id,
            force,
        } => {
            fs::create_dir_all(&out_dir)?;
            let path = out_dir.join(DEFAULT_CONFIG_FILE);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }

            let mut cfg = CredchainConfig::default();
            cfg.deployment.program_id = program_id;
            fs::write(&path, toml::to_string_pretty(&cfg)?)?;

            println!("Generated {}", path.display());
            println!("Set content_store.api_key and api_secret (or CREDCHAIN_PINATA_KEY / CREDCHAIN_PINATA_SECRET) before issue-document.");
        }
    }
    Ok(())
}

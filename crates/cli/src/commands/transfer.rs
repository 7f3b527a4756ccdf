// Path: crates/cli/src/commands/transfer.rs

use super::Output;
use anyhow::Result;
use clap::Parser;
use credchain_cli::{AppContext, PromptSigner};
use credchain_client::ConfirmedCall;
use credchain_types::app::TokenId;
use serde_json::json;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct OptInArgs {
    /// The account that will hold the credential.
    #[clap(long)]
    pub account: String,
    /// The credential token.
    pub token_id: TokenId,
}

#[derive(Parser, Debug)]
pub struct TransferArgs {
    /// The current holder, normally the issuer.
    #[clap(long)]
    pub sender: String,
    /// The receiving account. It must have opted in.
    #[clap(long)]
    pub receiver: String,
    /// The credential token.
    pub token_id: TokenId,
}

fn print_confirmed(out: &Output, action: &str, confirmed: &ConfirmedCall) -> Result<()> {
    let value = json!({
        "call_id": confirmed.call_id,
        "confirmed_round": confirmed.result.confirmed_round,
    });
    out.emit(&value, || {
        format!(
            "{} confirmed in round {}\n  Call: {}",
            action, confirmed.result.confirmed_round, confirmed.call_id
        )
    })
}

pub async fn run_opt_in(config: Option<&Path>, args: OptInArgs, out: &Output) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let signer = PromptSigner::stdio();
    let confirmed = ctx
        .orchestrator()
        .opt_in(&args.account, args.token_id, &signer)
        .await?;
    print_confirmed(out, "Opt-in", &confirmed)
}

pub async fn run_transfer(config: Option<&Path>, args: TransferArgs, out: &Output) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let signer = PromptSigner::stdio();
    let confirmed = ctx
        .orchestrator()
        .transfer(&args.sender, &args.receiver, args.token_id, &signer)
        .await?;
    print_confirmed(out, "Transfer", &confirmed)
}

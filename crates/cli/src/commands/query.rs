// Path: crates/cli/src/commands/query.rs

use super::Output;
use anyhow::{Context, Result};
use clap::Parser;
use credchain_api::content::gateway_url;
use credchain_cli::AppContext;
use credchain_types::app::{decode_address, CredentialRecord, TokenId};
use serde_json::json;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct TokenArgs {
    /// The credential token.
    pub token_id: TokenId,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// The account whose created credentials are listed.
    pub address: String,
}

fn describe(record: &CredentialRecord, gateway: &str) -> String {
    format!(
        "Credential {}\n  Name:     {}\n  Unit:     {}\n  Creator:  {}\n  Supply:   {}\n  Metadata: {}\n  Gateway:  {}",
        record.token_id,
        record.display_name,
        record.unit_label,
        record.creator_address,
        record.total_supply,
        record.content_url,
        gateway_url(&record.content_url, gateway)
    )
}

pub async fn verify(config: Option<&Path>, args: TokenArgs, out: &Output) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let verdict = ctx.verifier().verify_on_chain(args.token_id).await?;
    out.emit(
        &json!({ "token_id": args.token_id, "verdict": verdict }),
        || format!("Token {}: {}", args.token_id, verdict),
    )
}

pub async fn status(config: Option<&Path>, args: TokenArgs, out: &Output) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let status = ctx.verifier().verification_status(args.token_id).await?;
    out.emit(
        &json!({ "token_id": args.token_id, "status": status }),
        || format!("Token {}: {}", args.token_id, status),
    )
}

pub async fn lookup(config: Option<&Path>, args: TokenArgs, out: &Output) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let gateway = &ctx.config.content_store.gateway_url;
    match ctx.verifier().lookup_by_token_id(args.token_id).await? {
        Some(record) => out.emit(&record, || describe(&record, gateway)),
        None => out.emit(&json!(null), || {
            format!("Token {} not found.", args.token_id)
        }),
    }
}

pub async fn list(config: Option<&Path>, args: ListArgs, out: &Output) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let address = decode_address(args.address.trim()).context("invalid address")?;
    let records = ctx.verifier().credentials_of(&address).await?;
    let gateway = &ctx.config.content_store.gateway_url;
    out.emit(&records, || {
        if records.is_empty() {
            return format!("No credentials created by {}.", address);
        }
        records
            .iter()
            .map(|record| describe(record, gateway))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

pub async fn program_info(config: Option<&Path>, out: &Output) -> Result<()> {
    let ctx = AppContext::load(config)?;
    match ctx.verifier().program_info().await? {
        Some(info) => out.emit(&info, || {
            let mut text = format!(
                "Program {}\n  Address: {}\n  Global state:",
                info.program_id, info.program_address
            );
            for (key, value) in &info.global_state {
                text.push_str(&format!("\n    {} = {}", key, value));
            }
            text
        }),
        None => out.emit(&json!(null), || {
            "No credential program deployed (or the node does not know it). Credentials are issued as direct tokens.".to_string()
        }),
    }
}

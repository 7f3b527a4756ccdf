// Path: crates/cli/src/commands/issue.rs

use super::Output;
use anyhow::{Context, Result};
use clap::Parser;
use credchain_cli::{AppContext, PromptSigner};
use credchain_services::DocumentIssuanceRequest;
use credchain_types::app::IssuanceOutcome;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

#[derive(Parser, Debug)]
pub struct IssueArgs {
    /// Address of the issuing institution (the signer).
    #[clap(long)]
    pub issuer: String,
    /// Address of the student receiving the credential.
    #[clap(long)]
    pub student: String,
    /// Credential name, e.g. the course. Truncated to 32 bytes on direct issuance.
    #[clap(long)]
    pub name: String,
    /// URL of the already uploaded metadata document.
    #[clap(long)]
    pub metadata_url: String,
}

#[derive(Parser, Debug)]
pub struct IssueDocumentArgs {
    /// Address of the issuing institution (the signer).
    #[clap(long)]
    pub issuer: String,
    /// Address of the student receiving the credential.
    #[clap(long)]
    pub student_wallet: String,
    /// The student's name.
    #[clap(long, default_value = "")]
    pub student_name: String,
    /// The course the credential certifies.
    #[clap(long)]
    pub course: String,
    /// The grade awarded.
    #[clap(long, default_value = "")]
    pub grade: String,
    /// The kind of credential.
    #[clap(long, default_value = "Certificate")]
    pub credential_type: String,
    /// Issue date as YYYY-MM-DD. Defaults to today (UTC).
    #[clap(long)]
    pub issue_date: Option<String>,
    /// The credential document to upload.
    pub file: PathBuf,
}

fn format_issue_date(date: Date) -> Result<String> {
    date.format(format_description!("[year]-[month]-[day]"))
        .context("formatting issue date")
}

fn today() -> Result<String> {
    format_issue_date(OffsetDateTime::now_utc().date())
}

fn print_outcome(out: &Output, outcome: &IssuanceOutcome) -> Result<()> {
    out.emit(outcome, || {
        let token = outcome
            .token_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown (confirmed, but the token id could not be determined)".into());
        format!(
            "Credential issued\n  Token:  {}\n  Call:   {}\n  Path:   {}",
            token, outcome.call_id, outcome.path
        )
    })
}

pub async fn run(config: Option<&Path>, args: IssueArgs, out: &Output) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let signer = PromptSigner::stdio();
    let outcome = ctx
        .orchestrator()
        .issue(
            &args.issuer,
            &args.student,
            &args.name,
            &args.metadata_url,
            &signer,
        )
        .await?;
    print_outcome(out, &outcome)
}

pub async fn run_document(
    config: Option<&Path>,
    args: IssueDocumentArgs,
    out: &Output,
) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let document = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "credential".to_string());
    let issue_date = match args.issue_date {
        Some(date) => date,
        None => today()?,
    };
    let request = DocumentIssuanceRequest {
        issuer: args.issuer,
        student_wallet: args.student_wallet,
        student_name: args.student_name,
        course: args.course,
        grade: args.grade,
        credential_type: args.credential_type,
        issue_date,
        file_name,
        document,
    };

    let signer = PromptSigner::stdio();
    let outcome = ctx
        .orchestrator_with_store()?
        .issue_document(&request, &signer)
        .await?;
    print_outcome(out, &outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn test_issue_date_is_zero_padded() {
        let date = Date::from_calendar_date(2024, Month::March, 7).unwrap();
        assert_eq!(format_issue_date(date).unwrap(), "2024-03-07");
    }
}

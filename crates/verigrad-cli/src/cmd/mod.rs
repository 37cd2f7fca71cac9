use anyhow::{anyhow, Result};
use serde::Serialize;
use verigrad_core::model::{IssueMode, PartialIssuance};
use verigrad_core::{FailureKind, VerigradError};
use verigrad_solana_client::IssuePath;

use crate::args::{Cli, Command};
use crate::config::Settings;
use crate::output;

mod doctor;
mod idl;
mod issue;
mod list;
mod show;
mod verify;

pub async fn dispatch(cli: Cli) -> Result<()> {
    if let Command::Idl = cli.command {
        return idl::run();
    }
    let settings = Settings::resolve(&cli)?;

    match cli.command {
        Command::Issue {
            form,
            split,
            with_metadata,
        } => {
            let mode = IssueMode::new(split, with_metadata);
            issue::run(&settings, &form, IssuePath::Token(mode)).await
        }
        Command::Record { form } => issue::run(&settings, &form, IssuePath::ProgramRecord).await,
        Command::Show { address } => show::run(&settings, &address).await,
        Command::List { student, issuer } => {
            list::run(&settings, student.as_deref(), issuer.as_deref()).await
        }
        Command::Verify { mint, holder } => verify::run(&settings, &mint, &holder).await,
        Command::Idl => idl::run(),
        Command::Doctor => doctor::run(&settings).await,
    }
}

#[derive(Debug, Serialize)]
struct FailureOut<'a> {
    ok: bool,
    kind: FailureKind,
    message: &'a str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    partial: Option<&'a PartialIssuance>,
}

/// Report a library failure with a user-facing `message` and turn it into the
/// command's error.
pub(crate) fn fail(err: VerigradError, message: &str) -> anyhow::Error {
    if output::is_json() {
        let out = FailureOut {
            ok: false,
            kind: err.kind(),
            message,
            detail: err.detail(),
            partial: err.partial(),
        };
        if let Err(e) = output::print(&out) {
            return e;
        }
    } else {
        output::status(false, message);
        if let Some(p) = err.partial() {
            output::eprintln_line(&format!(
                "confirmed before the failure: {} ({})",
                p.steps.join(", "),
                p.signatures.join(", ")
            ));
        }
    }
    anyhow!(err)
}

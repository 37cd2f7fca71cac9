//! Issuance form controller.
//!
//! Holds the issuer's form, validates it, drives one submission at a time
//! through either the token path or the program record path, and turns every
//! outcome into a status line a person can read.

use std::cell::{Cell, RefCell};

use solana_program::pubkey::Pubkey;
use verigrad_core::config::ClientConfig;
use verigrad_core::model::{DiplomaMetadata, IssuanceResult, IssueMode, RecordReceipt};
use verigrad_core::{FailureKind, VerigradError, VerigradResult};

use crate::issuer::{DiplomaIssuer, IssueRequest};
use crate::pda::parse_pubkey;
use crate::program_client::{IssueDiplomaArgs, ProgramClient};
use crate::rpc::LedgerRpc;
use crate::wallet::Wallet;

pub const PREPARING: &str = "Preparing transaction...";
pub const SENDING: &str = "Sending transaction...";

const FAILED: &str = "Failed to issue diploma.";

/// Degree types offered by the form.
pub const DEGREE_TYPES: [&str; 5] = ["BSc", "MSc", "PhD", "BA", "MA"];

pub fn current_year() -> u16 {
    u16::try_from(time::OffsetDateTime::now_utc().year()).unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueForm {
    pub student_name: String,
    /// Base-58 address; empty means the issuing wallet.
    pub student_wallet: String,
    pub degree_program: String,
    pub degree_type: String,
    pub graduation_year: u16,
    pub institution: String,
    pub gpa: String,
    pub honors: String,
}

impl Default for IssueForm {
    fn default() -> Self {
        Self {
            student_name: String::new(),
            student_wallet: String::new(),
            degree_program: String::new(),
            degree_type: String::new(),
            graduation_year: current_year(),
            institution: String::new(),
            gpa: String::new(),
            honors: String::new(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl IssueForm {
    /// `"<degreeType> in <degreeProgram>"`, the degree text stored on-chain.
    pub fn degree(&self) -> String {
        format!("{} in {}", self.degree_type.trim(), self.degree_program.trim())
    }

    /// Required fields left empty for `path`, in form order.
    pub fn missing_fields(&self, path: IssuePath) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.student_name.trim().is_empty() {
            missing.push("studentName");
        }
        if self.degree_program.trim().is_empty() {
            missing.push("degreeProgram");
        }
        if self.degree_type.trim().is_empty() {
            missing.push("degreeType");
        }
        if self.graduation_year == 0 {
            missing.push("graduationYear");
        }
        if matches!(path, IssuePath::Token(_)) && self.institution.trim().is_empty() {
            missing.push("institution");
        }
        missing
    }

    pub fn student(&self) -> VerigradResult<Option<Pubkey>> {
        match non_empty(&self.student_wallet) {
            Some(s) => parse_pubkey("student wallet", &s).map(Some),
            None => Ok(None),
        }
    }

    pub fn to_metadata(&self) -> DiplomaMetadata {
        let mut m = DiplomaMetadata::new(
            self.student_name.trim(),
            self.degree(),
            self.graduation_year,
            self.institution.trim(),
        );
        m.gpa = non_empty(&self.gpa);
        m.honors = non_empty(&self.honors);
        m
    }
}

/// Which on-chain artifact a submission produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuePath {
    Token(IssueMode),
    ProgramRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    Token(IssuanceResult),
    Record(RecordReceipt),
}

/// User-facing text for a failure.
pub fn user_message(err: &VerigradError) -> String {
    let base = match err.kind() {
        FailureKind::SignerMissing => return "Please connect your wallet first.".to_string(),
        FailureKind::MissingFields => return "Please fill in all required fields.".to_string(),
        FailureKind::UserRejected => format!("{FAILED} Transaction was rejected."),
        FailureKind::InsufficientFunds => {
            format!("{FAILED} Insufficient SOL for transaction fees.")
        }
        FailureKind::StaleBlockhash | FailureKind::Network => {
            format!("{FAILED} Network error. Please try again.")
        }
        FailureKind::InvalidInput | FailureKind::Program | FailureKind::Unknown => {
            format!("{FAILED} {}", err.detail())
        }
    };
    match err.partial() {
        Some(p) => format!("{base} Mint {} was created but no token was minted.", p.mint),
        None => base,
    }
}

struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct FormController {
    form: RefCell<IssueForm>,
    path: IssuePath,
    in_flight: Cell<bool>,
    status: RefCell<Option<Status>>,
}

impl FormController {
    pub fn new(path: IssuePath) -> Self {
        Self::with_form(IssueForm::default(), path)
    }

    pub fn with_form(form: IssueForm, path: IssuePath) -> Self {
        Self {
            form: RefCell::new(form),
            path,
            in_flight: Cell::new(false),
            status: RefCell::new(None),
        }
    }

    pub fn form(&self) -> IssueForm {
        self.form.borrow().clone()
    }

    pub fn edit(&self, f: impl FnOnce(&mut IssueForm)) {
        f(&mut self.form.borrow_mut());
    }

    pub fn path(&self) -> IssuePath {
        self.path
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    pub fn status(&self) -> Option<Status> {
        self.status.borrow().clone()
    }

    fn emit<F: FnMut(&Status)>(&self, status: Status, on_status: &mut F) {
        on_status(&status);
        *self.status.borrow_mut() = Some(status);
    }

    /// Submit the current form. Refused while another submission is running.
    pub async fn submit<R, F>(
        &self,
        rpc: &R,
        config: &ClientConfig,
        wallet: &Wallet,
        mut on_status: F,
    ) -> VerigradResult<IssueOutcome>
    where
        R: LedgerRpc,
        F: FnMut(&Status),
    {
        if self.in_flight.replace(true) {
            return Err(VerigradError::invalid_argument(
                "a submission is already in progress",
            ));
        }
        let _guard = InFlight(&self.in_flight);

        let result = self.run(rpc, config, wallet, &mut on_status).await;
        match &result {
            Ok(outcome) => {
                let message = match outcome {
                    IssueOutcome::Token(r) => format!("Diploma token issued! Mint: {}", r.mint),
                    IssueOutcome::Record(r) => format!(
                        "Diploma issued successfully! Transaction: {}...",
                        r.signature.get(..8).unwrap_or(&r.signature)
                    ),
                };
                self.emit(Status::new(StatusKind::Success, message), &mut on_status);
                *self.form.borrow_mut() = IssueForm::default();
            }
            Err(err) => {
                tracing::warn!(kind = %err.kind(), error = %err, "diploma submission failed");
                self.emit(Status::new(StatusKind::Error, user_message(err)), &mut on_status);
            }
        }
        result
    }

    async fn run<R, F>(
        &self,
        rpc: &R,
        config: &ClientConfig,
        wallet: &Wallet,
        on_status: &mut F,
    ) -> VerigradResult<IssueOutcome>
    where
        R: LedgerRpc,
        F: FnMut(&Status),
    {
        if !wallet.is_connected() {
            return Err(VerigradError::SignerMissing);
        }
        let form = self.form();
        let missing = form.missing_fields(self.path);
        if !missing.is_empty() {
            return Err(VerigradError::MissingFields(missing));
        }
        let student = form.student()?;

        self.emit(Status::new(StatusKind::Info, PREPARING), on_status);

        match self.path {
            IssuePath::Token(mode) => {
                let request = IssueRequest {
                    diploma: form.to_metadata(),
                    recipient: student,
                    mode,
                };
                let result = DiplomaIssuer::new(rpc, config)
                    .issue(wallet, &request, |text| {
                        self.emit(Status::new(StatusKind::Info, text), on_status)
                    })
                    .await?;
                Ok(IssueOutcome::Token(result))
            }
            IssuePath::ProgramRecord => {
                let client = ProgramClient::from_config(config)?;
                let args = IssueDiplomaArgs::new(
                    form.student_name.trim(),
                    form.degree(),
                    form.graduation_year,
                );
                self.emit(Status::new(StatusKind::Info, SENDING), on_status);
                let receipt = client.issue_diploma(rpc, wallet, student, &args).await?;
                Ok(IssueOutcome::Record(receipt))
            }
        }
    }
}

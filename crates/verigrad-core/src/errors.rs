//! Error types for VeriGrad.
//!
//! Every failure surfaced by the libraries carries a [`FailureKind`] so callers
//! can switch on the category instead of parsing message text. The kind is
//! decided once, where the failure is produced (validation, signing, RPC), and
//! the original diagnostic text travels alongside it.

use std::fmt;

use serde::Serialize;

use crate::model::PartialIssuance;

pub type VerigradResult<T> = Result<T, VerigradError>;

/// Closed set of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No wallet/signer was connected. Raised before any network activity.
    SignerMissing,
    /// One or more required form fields were empty.
    MissingFields,
    /// Malformed input (bad address, oversize envelope, inconsistent config).
    InvalidInput,
    /// The signer refused to sign.
    UserRejected,
    /// The fee payer cannot cover fees or rent.
    InsufficientFunds,
    /// The referenced blockhash expired or was unknown to the cluster.
    StaleBlockhash,
    /// Transport-level failure talking to the RPC endpoint.
    Network,
    /// A program rejected the transaction or account data was not as expected.
    Program,
    Unknown,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignerMissing => "signer_missing",
            Self::MissingFields => "missing_fields",
            Self::InvalidInput => "invalid_input",
            Self::UserRejected => "user_rejected",
            Self::InsufficientFunds => "insufficient_funds",
            Self::StaleBlockhash => "stale_blockhash",
            Self::Network => "network",
            Self::Program => "program",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerigradError {
    #[error("wallet not connected")]
    SignerMissing,

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A failure reported by the signer or the RPC layer.
    #[error("{kind}: {detail}")]
    Submission { kind: FailureKind, detail: String },

    /// Account data did not match the expected layout.
    #[error("decode error: {0}")]
    Decode(String),

    /// A later envelope failed after earlier envelopes were confirmed.
    ///
    /// Confirmed work is not rolled back; `completed` describes what exists
    /// on-chain.
    #[error("issuance incomplete ({} envelope(s) confirmed): {source}", .completed.signatures.len())]
    Incomplete {
        completed: PartialIssuance,
        #[source]
        source: Box<VerigradError>,
    },
}

impl VerigradError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn submission(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Submission {
            kind,
            detail: detail.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Category of this failure. Incomplete issuances report the kind of the
    /// underlying cause.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SignerMissing => FailureKind::SignerMissing,
            Self::MissingFields(_) => FailureKind::MissingFields,
            Self::InvalidArgument(_) => FailureKind::InvalidInput,
            Self::Submission { kind, .. } => *kind,
            Self::Decode(_) => FailureKind::Program,
            Self::Incomplete { source, .. } => source.kind(),
        }
    }

    /// Raw diagnostic text without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Submission { detail, .. } => detail.clone(),
            Self::Incomplete { source, .. } => source.detail(),
            other => other.to_string(),
        }
    }

    /// Work that was already confirmed when this failure happened, if any.
    pub fn partial(&self) -> Option<&PartialIssuance> {
        match self {
            Self::Incomplete { completed, .. } => Some(completed),
            _ => None,
        }
    }
}

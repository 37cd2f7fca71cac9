//! VeriGrad data models.
//!
//! Models are plain data. Identifiers are kept as base-58 text so they can be
//! shown, logged and serialized without pulling Solana types into this crate;
//! the client crate converts at its boundary.
//!
//! - [`DiplomaMetadata`]: issuer input handed to the builder.
//! - [`IssueMode`]: which instruction layout to build.
//! - [`IssuanceResult`] / [`PartialIssuance`]: what exists on-chain afterwards.
//! - [`DiplomaRecord`] / [`TokenVerification`]: read-side views.

use serde::{Deserialize, Serialize};

pub mod identifier;

pub use identifier::{is_address, is_signature};

/// Descriptive data of one diploma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomaMetadata {
    pub student_name: String,
    pub degree: String,
    pub graduation_year: u16,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honors: Option<String>,
}

impl DiplomaMetadata {
    pub fn new(
        student_name: impl Into<String>,
        degree: impl Into<String>,
        graduation_year: u16,
        institution: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            degree: degree.into(),
            graduation_year,
            institution: institution.into(),
            gpa: None,
            honors: None,
        }
    }

    pub fn with_gpa(mut self, gpa: impl Into<String>) -> Self {
        self.gpa = Some(gpa.into());
        self
    }

    pub fn with_honors(mut self, honors: impl Into<String>) -> Self {
        self.honors = Some(honors.into());
        self
    }

    /// Names of required fields that are empty (whitespace counts as empty).
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.student_name.trim().is_empty() {
            missing.push("studentName");
        }
        if self.degree.trim().is_empty() {
            missing.push("degree");
        }
        if self.graduation_year == 0 {
            missing.push("graduationYear");
        }
        if self.institution.trim().is_empty() {
            missing.push("institution");
        }
        missing
    }
}

/// How the instruction sequence is split into envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeMode {
    /// Everything in one transaction.
    Single,
    /// Mint creation first, then token account + mint-to once the mint is confirmed.
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataMode {
    Attach,
    Omit,
}

/// Builder mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueMode {
    pub envelopes: EnvelopeMode,
    pub metadata: MetadataMode,
}

impl IssueMode {
    pub const SINGLE: Self = Self {
        envelopes: EnvelopeMode::Single,
        metadata: MetadataMode::Omit,
    };
    pub const SINGLE_WITH_METADATA: Self = Self {
        envelopes: EnvelopeMode::Single,
        metadata: MetadataMode::Attach,
    };
    pub const SPLIT: Self = Self {
        envelopes: EnvelopeMode::Split,
        metadata: MetadataMode::Omit,
    };
    pub const SPLIT_WITH_METADATA: Self = Self {
        envelopes: EnvelopeMode::Split,
        metadata: MetadataMode::Attach,
    };

    pub fn new(split: bool, with_metadata: bool) -> Self {
        Self {
            envelopes: if split {
                EnvelopeMode::Split
            } else {
                EnvelopeMode::Single
            },
            metadata: if with_metadata {
                MetadataMode::Attach
            } else {
                MetadataMode::Omit
            },
        }
    }

    pub fn is_split(&self) -> bool {
        self.envelopes == EnvelopeMode::Split
    }

    pub fn attaches_metadata(&self) -> bool {
        self.metadata == MetadataMode::Attach
    }
}

impl Default for IssueMode {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Outcome of a successful token issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceResult {
    pub mint: String,
    pub token_account: String,
    /// One signature per envelope, in submission order.
    pub signatures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_account: Option<String>,
    pub mode: IssueMode,
    pub diploma: DiplomaMetadata,
}

impl IssuanceResult {
    /// Signature of the envelope that minted the token.
    pub fn mint_signature(&self) -> Option<&str> {
        self.signatures.last().map(String::as_str)
    }
}

/// Confirmed work left behind by a failed multi-envelope issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialIssuance {
    pub mint: String,
    pub token_account: String,
    pub signatures: Vec<String>,
    /// Labels of the confirmed envelopes.
    pub steps: Vec<String>,
}

/// Outcome of a program `issueDiploma` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReceipt {
    pub diploma: String,
    pub signature: String,
}

/// A decoded `Diploma` account of the VeriGrad program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomaRecord {
    pub address: String,
    pub issuer: String,
    pub student: String,
    pub student_name: String,
    pub degree: String,
    pub graduation_year: u16,
    /// Unix seconds.
    pub issued_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Authentic,
    NotHeld,
    NotUnique,
    Divisible,
    Freezable,
}

impl Verdict {
    pub fn is_authentic(&self) -> bool {
        matches!(self, Self::Authentic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentic => "authentic",
            Self::NotHeld => "not_held",
            Self::NotUnique => "not_unique",
            Self::Divisible => "divisible",
            Self::Freezable => "freezable",
        }
    }
}

/// Verifier view over a diploma token mint and a holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenVerification {
    pub mint: String,
    pub holder: String,
    pub token_account: String,
    pub decimals: u8,
    pub supply: u64,
    pub holder_balance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_authority: Option<String>,
    pub verdict: Verdict,
}

impl TokenVerification {
    /// Derive the verdict from the observed token state. Checks run in a fixed
    /// order and the first failing one wins.
    pub fn judge(decimals: u8, supply: u64, holder_balance: u64, freezable: bool) -> Verdict {
        if decimals != 0 {
            Verdict::Divisible
        } else if supply != 1 {
            Verdict::NotUnique
        } else if holder_balance != 1 {
            Verdict::NotHeld
        } else if freezable {
            Verdict::Freezable
        } else {
            Verdict::Authentic
        }
    }
}

//! The VeriGrad program interface.
//!
//! The program's Anchor IDL is embedded at build time and checked against the
//! shape this client encodes by hand: the `issueDiploma` instruction and the
//! `Diploma` account. Discriminators follow the Anchor convention
//! (`sha256("global:<ix>")[..8]`, `sha256("account:<Type>")[..8]`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use verigrad_core::{VerigradError, VerigradResult};

use crate::constants::{DIPLOMA_ACCOUNT, ISSUE_DIPLOMA_IX};

pub const VERIGRAD_IDL_JSON: &str = include_str!("../idl/verigrad.json");

pub type Discriminator = [u8; 8];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idl {
    pub version: String,
    pub name: String,
    pub instructions: Vec<IdlInstruction>,
    #[serde(default)]
    pub accounts: Vec<IdlAccountDef>,
    #[serde(default)]
    pub metadata: Option<IdlMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlMetadata {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    pub accounts: Vec<IdlAccountItem>,
    pub args: Vec<IdlField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdlAccountItem {
    pub name: String,
    pub is_mut: bool,
    pub is_signer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Value,
}

impl IdlField {
    /// Primitive type name; `None` for composite types.
    pub fn type_name(&self) -> Option<&str> {
        self.ty.as_str()
    }

    fn describe(&self) -> String {
        match self.type_name() {
            Some(t) => format!("{}: {t}", self.name),
            None => format!("{}: {}", self.name, self.ty),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlAccountDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlTypeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlTypeDef {
    pub kind: String,
    #[serde(default)]
    pub fields: Vec<IdlField>,
}

const ISSUE_DIPLOMA_ARGS: [(&str, &str); 3] = [
    ("studentName", "string"),
    ("degree", "string"),
    ("graduationYear", "u16"),
];

// (name, writable, signer)
const ISSUE_DIPLOMA_ACCOUNTS: [(&str, bool, bool); 4] = [
    ("diploma", true, true),
    ("issuer", true, true),
    ("student", false, false),
    ("systemProgram", false, false),
];

const DIPLOMA_FIELDS: [(&str, &str); 6] = [
    ("issuer", "publicKey"),
    ("student", "publicKey"),
    ("studentName", "string"),
    ("degree", "string"),
    ("graduationYear", "u16"),
    ("issuedAt", "i64"),
];

impl Idl {
    pub fn parse(json: &str) -> VerigradResult<Self> {
        serde_json::from_str(json).map_err(|e| VerigradError::decode(format!("idl: {e}")))
    }

    pub fn embedded() -> VerigradResult<Self> {
        Self::parse(VERIGRAD_IDL_JSON)
    }

    pub fn instruction(&self, name: &str) -> Option<&IdlInstruction> {
        self.instructions.iter().find(|i| i.name == name)
    }

    pub fn account(&self, name: &str) -> Option<&IdlAccountDef> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn address(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.address.as_str())
    }

    /// Fail unless the IDL declares exactly the `issueDiploma` instruction and
    /// `Diploma` layout this client encodes.
    pub fn check_diploma_interface(&self) -> VerigradResult<()> {
        let ix_name = camel_case(ISSUE_DIPLOMA_IX);
        let ix = self
            .instruction(&ix_name)
            .ok_or_else(|| VerigradError::decode(format!("idl has no `{ix_name}` instruction")))?;

        let args: Vec<(&str, Option<&str>)> =
            ix.args.iter().map(|a| (a.name.as_str(), a.type_name())).collect();
        let expected: Vec<(&str, Option<&str>)> =
            ISSUE_DIPLOMA_ARGS.iter().map(|(n, t)| (*n, Some(*t))).collect();
        if args != expected {
            return Err(VerigradError::decode(format!(
                "`{ix_name}` args {args:?} do not match {expected:?}"
            )));
        }

        let accounts: Vec<(&str, bool, bool)> = ix
            .accounts
            .iter()
            .map(|a| (a.name.as_str(), a.is_mut, a.is_signer))
            .collect();
        if accounts != ISSUE_DIPLOMA_ACCOUNTS {
            return Err(VerigradError::decode(format!(
                "`{ix_name}` accounts {accounts:?} do not match {ISSUE_DIPLOMA_ACCOUNTS:?}"
            )));
        }

        let account = self.account(DIPLOMA_ACCOUNT).ok_or_else(|| {
            VerigradError::decode(format!("idl has no `{DIPLOMA_ACCOUNT}` account"))
        })?;
        let fields: Vec<(&str, Option<&str>)> = account
            .ty
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name()))
            .collect();
        let expected: Vec<(&str, Option<&str>)> =
            DIPLOMA_FIELDS.iter().map(|(n, t)| (*n, Some(*t))).collect();
        if account.ty.kind != "struct" || fields != expected {
            return Err(VerigradError::decode(format!(
                "`{DIPLOMA_ACCOUNT}` layout {fields:?} does not match {expected:?}"
            )));
        }

        Ok(())
    }

    pub fn summary(&self) -> IdlSummary {
        IdlSummary {
            name: self.name.clone(),
            version: self.version.clone(),
            address: self.address().map(str::to_string),
            instructions: self
                .instructions
                .iter()
                .map(|ix| EntrySummary {
                    name: ix.name.clone(),
                    discriminator: instruction_discriminator(&snake_case(&ix.name)),
                    fields: ix.args.iter().map(IdlField::describe).collect(),
                })
                .collect(),
            accounts: self
                .accounts
                .iter()
                .map(|acc| EntrySummary {
                    name: acc.name.clone(),
                    discriminator: account_discriminator(&acc.name),
                    fields: acc.ty.fields.iter().map(IdlField::describe).collect(),
                })
                .collect(),
        }
    }
}

/// Printable view of the interface with derived discriminators.
#[derive(Debug, Clone, Serialize)]
pub struct IdlSummary {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub instructions: Vec<EntrySummary>,
    pub accounts: Vec<EntrySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub name: String,
    pub discriminator: Discriminator,
    pub fields: Vec<String>,
}

fn sighash(namespace: &str, name: &str) -> Discriminator {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// `sha256("global:<name>")[..8]`; `name` is the snake_case method name.
pub fn instruction_discriminator(name: &str) -> Discriminator {
    sighash("global", name)
}

/// `sha256("account:<Name>")[..8]`.
pub fn account_discriminator(name: &str) -> Discriminator {
    sighash("account", name)
}

pub(crate) fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub(crate) fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_idl_matches_client_encoding() {
        let idl = Idl::embedded().unwrap();
        idl.check_diploma_interface().unwrap();
        assert_eq!(
            idl.address(),
            Some(verigrad_core::config::DEFAULT_PROGRAM_ID)
        );
    }

    #[test]
    fn discriminators_follow_anchor_sighash() {
        let expected = Sha256::digest(b"global:issue_diploma");
        assert_eq!(&instruction_discriminator("issue_diploma")[..], &expected[..8]);
        let expected = Sha256::digest(b"account:Diploma");
        assert_eq!(&account_discriminator("Diploma")[..], &expected[..8]);
        assert_ne!(
            instruction_discriminator("issue_diploma"),
            account_discriminator("Diploma")
        );
    }

    #[test]
    fn case_conversion() {
        assert_eq!(snake_case("issueDiploma"), "issue_diploma");
        assert_eq!(camel_case("issue_diploma"), "issueDiploma");
        assert_eq!(snake_case("graduationYear"), "graduation_year");
    }

    #[test]
    fn reordered_args_are_rejected() {
        let mut idl = Idl::embedded().unwrap();
        idl.instructions[0].args.swap(1, 2);
        let err = idl.check_diploma_interface().unwrap_err();
        assert!(err.to_string().contains("args"));
    }

    #[test]
    fn missing_account_type_is_rejected() {
        let mut idl = Idl::embedded().unwrap();
        idl.accounts.clear();
        let err = idl.check_diploma_interface().unwrap_err();
        assert!(err.to_string().contains("Diploma"));
    }

    #[test]
    fn summary_lists_discriminators() {
        let summary = Idl::embedded().unwrap().summary();
        assert_eq!(summary.instructions[0].name, "issueDiploma");
        assert_eq!(
            summary.instructions[0].discriminator,
            instruction_discriminator("issue_diploma")
        );
        assert_eq!(summary.accounts[0].fields[5], "issuedAt: i64");
    }
}

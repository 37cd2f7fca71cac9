//! verigrad-solana-client
//!
//! Solana side of VeriGrad:
//! - address derivation and instruction constructors for diploma tokens
//! - a mode-driven transaction builder and the issuer that submits its plans
//! - the `issueDiploma` program client bound to the embedded IDL
//! - record reader and token verifier
//! - the issuance form controller
//!
//! Network access goes through [`rpc::LedgerRpc`]; [`rpc::RpcGateway`] is the
//! JSON-RPC implementation.

pub mod builder;
pub mod constants;
pub mod form;
pub mod idl;
pub mod instructions;
pub mod issuer;
pub mod pda;
pub mod program_client;
pub mod records;
pub mod rpc;
pub mod verify;
pub mod wallet;

pub use builder::{DiplomaTokenBuilder, EnvelopePlan, Step, TokenPlan};
pub use form::{FormController, IssueForm, IssueOutcome, IssuePath, Status, StatusKind};
pub use issuer::{DiplomaIssuer, IssueRequest};
pub use program_client::{IssueDiplomaArgs, ProgramClient};
pub use records::{DiplomaAccount, DiplomaReader};
pub use rpc::{LedgerRpc, MemcmpFilter, RpcGateway};
pub use verify::verify_diploma_token;
pub use wallet::Wallet;

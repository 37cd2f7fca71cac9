//! verigrad-core
//!
//! Core primitives for VeriGrad:
//! - diploma metadata and issuance result models
//! - builder mode selector
//! - client configuration (explicit, never read from the environment here)
//! - the closed failure taxonomy shared by every layer
//! - the off-chain token metadata document
//!
//! This crate performs no network or filesystem I/O.

pub mod config;
pub mod errors;
pub mod metadata;
pub mod model;

pub use crate::errors::{FailureKind, VerigradError, VerigradResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{validate_config, ClientConfig, Commitment, MetadataConfig};
    pub use crate::metadata::TokenMetadataDocument;
    pub use crate::model::{
        DiplomaMetadata, DiplomaRecord, EnvelopeMode, IssuanceResult, IssueMode, MetadataMode,
        PartialIssuance, RecordReceipt, TokenVerification, Verdict,
    };
    pub use crate::{FailureKind, VerigradError, VerigradResult};
}

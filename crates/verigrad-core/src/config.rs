//! Configuration structures for VeriGrad clients.
//!
//! A [`ClientConfig`] is built by the caller (CLI, service, test) and passed
//! explicitly into every builder and client call. This crate never reads
//! environment variables; the CLI maps its environment onto these fields.

use url::Url;

use crate::errors::{VerigradError, VerigradResult};

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Deployed VeriGrad program on devnet.
pub const DEFAULT_PROGRAM_ID: &str = "BstGvvP7WHFodit1KdrzkyEoqQRyT5LfRzKxL6wmw6N6";

/// Token Metadata program.
pub const DEFAULT_METADATA_PROGRAM_ID: &str = "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s";

/// Everything a request needs to reach the cluster and the programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub commitment: Commitment,
    pub program_id: String,
    pub metadata_program_id: String,
    pub metadata: MetadataConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: Commitment::Processed,
            program_id: DEFAULT_PROGRAM_ID.to_string(),
            metadata_program_id: DEFAULT_METADATA_PROGRAM_ID.to_string(),
            metadata: MetadataConfig::default(),
        }
    }
}

/// Metadata publishing options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataConfig {
    /// Where metadata documents are hosted. `None` inlines them as `data:` URIs.
    pub base_uri: Option<String>,
}

/// Confirmation level requested from the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn parse(s: &str) -> VerigradResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            other => Err(VerigradError::invalid_argument(format!(
                "unsupported commitment: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &ClientConfig) -> VerigradResult<()> {
    let url = Url::parse(&cfg.rpc_url)
        .map_err(|e| VerigradError::invalid_argument(format!("rpc url: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(VerigradError::invalid_argument(
            "rpc url must use http or https",
        ));
    }

    if !crate::model::is_address(&cfg.program_id) {
        return Err(VerigradError::invalid_argument(
            "program id must be a base-58 address",
        ));
    }

    if !crate::model::is_address(&cfg.metadata_program_id) {
        return Err(VerigradError::invalid_argument(
            "metadata program id must be a base-58 address",
        ));
    }

    if let Some(base) = &cfg.metadata.base_uri {
        Url::parse(base)
            .map_err(|e| VerigradError::invalid_argument(format!("metadata base uri: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = ClientConfig::default();
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn non_http_endpoint_detected() {
        let cfg = ClientConfig {
            rpc_url: "ws://localhost:8900".to_string(),
            ..ClientConfig::default()
        };
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn bad_program_id_detected() {
        let cfg = ClientConfig {
            program_id: "not-a-key".to_string(),
            ..ClientConfig::default()
        };
        let err = validate_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("program id"));
    }

    #[test]
    fn commitment_parsing() {
        assert_eq!(Commitment::parse("Confirmed").unwrap(), Commitment::Confirmed);
        assert_eq!(Commitment::Finalized.as_str(), "finalized");
        assert!(Commitment::parse("max").is_err());
    }
}

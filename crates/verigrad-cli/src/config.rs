//! Environment and flag resolution.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use verigrad_core::config::{validate_config, ClientConfig, Commitment, MetadataConfig};
use verigrad_solana_client::Wallet;

use crate::args::Cli;

pub const DEFAULT_KEYPAIR: &str = "~/.config/solana/id.json";

#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub keypair_path: PathBuf,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Environment first, then flags on top.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let defaults = ClientConfig::default();

        let commitment = match env_var("VERIGRAD_COMMITMENT") {
            Some(c) => Commitment::parse(&c).map_err(|e| anyhow!("VERIGRAD_COMMITMENT: {e}"))?,
            None => defaults.commitment,
        };

        let client = ClientConfig {
            rpc_url: cli
                .rpc_url
                .clone()
                .or_else(|| env_var("VERIGRAD_RPC_URL"))
                .unwrap_or(defaults.rpc_url),
            commitment,
            program_id: cli
                .program_id
                .clone()
                .or_else(|| env_var("VERIGRAD_PROGRAM_ID"))
                .unwrap_or(defaults.program_id),
            metadata_program_id: defaults.metadata_program_id,
            metadata: MetadataConfig {
                base_uri: env_var("VERIGRAD_METADATA_BASE_URI"),
            },
        };
        validate_config(&client).context("invalid configuration")?;

        let keypair = cli
            .keypair
            .clone()
            .or_else(|| env_var("VERIGRAD_KEYPAIR"))
            .unwrap_or_else(|| DEFAULT_KEYPAIR.to_string());
        let keypair_path = PathBuf::from(shellexpand::tilde(&keypair).to_string());

        Ok(Self {
            client,
            keypair_path,
        })
    }

    pub fn wallet(&self) -> Result<Wallet> {
        Ok(Wallet::from_file(&self.keypair_path)?)
    }
}

//! Cluster access.
//!
//! [`LedgerRpc`] is the narrow surface the issuer, program client and record
//! reader need. [`RpcGateway`] implements it over the nonblocking
//! `RpcClient`; tests substitute an in-memory ledger.
//!
//! Every RPC failure is classified here, once, into a [`FailureKind`].

use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcProgramAccountsConfig;
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_program::hash::Hash;
use solana_program::pubkey::Pubkey;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use solana_sdk::signer::SignerError;
use solana_sdk::transaction::{Transaction, TransactionError};
use verigrad_core::config::{ClientConfig, Commitment};
use verigrad_core::{FailureKind, VerigradError, VerigradResult};

/// Byte-equality filter at a fixed account data offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcmpFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl MemcmpFilter {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }
}

/// Ledger operations used by VeriGrad.
#[allow(async_fn_in_trait)]
pub trait LedgerRpc {
    async fn latest_blockhash(&self) -> VerigradResult<Hash>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> VerigradResult<u64>;

    /// Submit a signed transaction and wait for the configured commitment.
    async fn send_and_confirm(&self, tx: &Transaction) -> VerigradResult<Signature>;

    /// Raw account data, `None` when the account does not exist.
    async fn account_data(&self, address: &Pubkey) -> VerigradResult<Option<Vec<u8>>>;

    /// All accounts of `program` whose data matches every filter.
    async fn program_accounts(
        &self,
        program: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> VerigradResult<Vec<(Pubkey, Vec<u8>)>>;
}

pub fn commitment_config(c: Commitment) -> CommitmentConfig {
    match c {
        Commitment::Processed => CommitmentConfig::processed(),
        Commitment::Confirmed => CommitmentConfig::confirmed(),
        Commitment::Finalized => CommitmentConfig::finalized(),
    }
}

/// [`LedgerRpc`] over a JSON-RPC endpoint.
pub struct RpcGateway {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcGateway {
    pub fn new(rpc_url: &str, commitment: Commitment) -> Self {
        let commitment = commitment_config(commitment);
        Self {
            client: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
            commitment,
        }
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(&cfg.rpc_url, cfg.commitment)
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    /// Node software version, used as a reachability probe.
    pub async fn version(&self) -> VerigradResult<String> {
        self.client
            .get_version()
            .await
            .map(|v| v.solana_core)
            .map_err(|e| client_failure("get_version", &e))
    }

    pub async fn balance(&self, address: &Pubkey) -> VerigradResult<u64> {
        self.client
            .get_balance(address)
            .await
            .map_err(|e| client_failure("get_balance", &e))
    }
}

impl LedgerRpc for RpcGateway {
    async fn latest_blockhash(&self) -> VerigradResult<Hash> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| client_failure("get_latest_blockhash", &e))
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> VerigradResult<u64> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| client_failure("get_minimum_balance_for_rent_exemption", &e))
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> VerigradResult<Signature> {
        tracing::debug!(
            signatures = tx.signatures.len(),
            instructions = tx.message.instructions.len(),
            "sending transaction"
        );
        let sig = self
            .client
            .send_and_confirm_transaction(tx)
            .await
            .map_err(|e| client_failure("send_and_confirm_transaction", &e))?;
        tracing::info!(%sig, "transaction confirmed");
        Ok(sig)
    }

    async fn account_data(&self, address: &Pubkey) -> VerigradResult<Option<Vec<u8>>> {
        let resp = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| client_failure("get_account", &e))?;
        Ok(resp.value.map(|a| a.data))
    }

    async fn program_accounts(
        &self,
        program: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> VerigradResult<Vec<(Pubkey, Vec<u8>)>> {
        let filters = filters
            .iter()
            .map(|f| RpcFilterType::Memcmp(Memcmp::new_base58_encoded(f.offset, &f.bytes)))
            .collect();
        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = self
            .client
            .get_program_accounts_with_config(program, config)
            .await
            .map_err(|e| client_failure("get_program_accounts", &e))?;
        tracing::debug!(%program, count = accounts.len(), "program accounts fetched");
        Ok(accounts.into_iter().map(|(k, a)| (k, a.data)).collect())
    }
}

fn client_failure(op: &str, err: &ClientError) -> VerigradError {
    let kind = classify_client_error(err);
    tracing::warn!(op, %kind, error = %err, "rpc call failed");
    VerigradError::submission(kind, err.to_string())
}

/// Map an RPC client error onto the failure taxonomy.
pub fn classify_client_error(err: &ClientError) -> FailureKind {
    if let ClientErrorKind::SigningError(e) = err.kind() {
        return classify_signer_error(e);
    }
    if let Some(tx_err) = err.get_transaction_error() {
        return classify_transaction_error(&tx_err);
    }
    match err.kind() {
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => FailureKind::Network,
        _ => FailureKind::Unknown,
    }
}

pub fn classify_transaction_error(err: &TransactionError) -> FailureKind {
    match err {
        TransactionError::InsufficientFundsForFee
        | TransactionError::InsufficientFundsForRent { .. }
        | TransactionError::AccountNotFound => FailureKind::InsufficientFunds,
        TransactionError::BlockhashNotFound => FailureKind::StaleBlockhash,
        _ => FailureKind::Program,
    }
}

pub fn classify_signer_error(err: &SignerError) -> FailureKind {
    match err {
        SignerError::UserCancel(_) => FailureKind::UserRejected,
        SignerError::KeypairPubkeyMismatch
        | SignerError::NotEnoughSigners
        | SignerError::TooManySigners
        | SignerError::InvalidInput(_) => FailureKind::InvalidInput,
        SignerError::Connection(_) => FailureKind::Network,
        _ => FailureKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_error(kind: ClientErrorKind) -> ClientError {
        ClientError::from(kind)
    }

    #[test]
    fn user_cancel_is_rejection() {
        let err = client_error(ClientErrorKind::SigningError(SignerError::UserCancel(
            "declined".to_string(),
        )));
        assert_eq!(classify_client_error(&err), FailureKind::UserRejected);
    }

    #[test]
    fn fee_shortfall_is_insufficient_funds() {
        let err = client_error(ClientErrorKind::TransactionError(
            TransactionError::InsufficientFundsForFee,
        ));
        assert_eq!(classify_client_error(&err), FailureKind::InsufficientFunds);
        assert_eq!(
            classify_transaction_error(&TransactionError::InsufficientFundsForRent {
                account_index: 1
            }),
            FailureKind::InsufficientFunds
        );
    }

    #[test]
    fn unknown_blockhash_is_stale() {
        let err = client_error(ClientErrorKind::TransactionError(
            TransactionError::BlockhashNotFound,
        ));
        assert_eq!(classify_client_error(&err), FailureKind::StaleBlockhash);
    }

    #[test]
    fn io_failure_is_network() {
        let err = client_error(ClientErrorKind::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert_eq!(classify_client_error(&err), FailureKind::Network);
    }

    #[test]
    fn other_transaction_errors_are_program_failures() {
        assert_eq!(
            classify_transaction_error(&TransactionError::AlreadyProcessed),
            FailureKind::Program
        );
        let err = client_error(ClientErrorKind::Custom("weird".to_string()));
        assert_eq!(classify_client_error(&err), FailureKind::Unknown);
    }

    #[test]
    fn commitment_mapping() {
        assert_eq!(
            commitment_config(Commitment::Finalized),
            CommitmentConfig::finalized()
        );
    }
}

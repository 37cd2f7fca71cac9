//! Diploma token issuance.
//!
//! Runs a [`TokenPlan`] against a [`LedgerRpc`]: local checks first, then rent
//! and a size check of every envelope, then each envelope in order
//! (blockhash, sign, send, confirm). A failure aborts the remaining envelopes.
//! Envelopes that already confirmed stay on-chain and are reported through
//! [`VerigradError::Incomplete`].

use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use verigrad_core::config::ClientConfig;
use verigrad_core::metadata::TokenMetadataDocument;
use verigrad_core::model::{DiplomaMetadata, IssuanceResult, IssueMode, PartialIssuance};
use verigrad_core::{VerigradError, VerigradResult};

use crate::builder::{DiplomaTokenBuilder, EnvelopePlan, TokenPlan};
use crate::instructions::{MetadataTriple, MINT_ACCOUNT_LEN};
use crate::pda::parse_pubkey;
use crate::rpc::{classify_signer_error, LedgerRpc};
use crate::wallet::Wallet;

/// Progress text emitted after the last envelope confirms.
pub const ISSUED_PROGRESS: &str = "Diploma token created";

/// What to issue and to whom.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub diploma: DiplomaMetadata,
    /// Token holder; the issuing wallet when `None`.
    pub recipient: Option<Pubkey>,
    pub mode: IssueMode,
}

pub struct DiplomaIssuer<'a, R> {
    rpc: &'a R,
    config: &'a ClientConfig,
}

impl<'a, R: LedgerRpc> DiplomaIssuer<'a, R> {
    pub fn new(rpc: &'a R, config: &'a ClientConfig) -> Self {
        Self { rpc, config }
    }

    /// Issue one diploma token. `progress` receives status text before each
    /// envelope is sent and once after the final confirmation.
    pub async fn issue<F>(
        &self,
        wallet: &Wallet,
        request: &IssueRequest,
        mut progress: F,
    ) -> VerigradResult<IssuanceResult>
    where
        F: FnMut(&str),
    {
        let signer = wallet.signer()?;
        let missing = request.diploma.missing_fields();
        if !missing.is_empty() {
            return Err(VerigradError::MissingFields(missing));
        }

        let payer = signer.pubkey();
        let recipient = request.recipient.unwrap_or(payer);
        let metadata_program_id =
            parse_pubkey("metadata program", &self.config.metadata_program_id)?;
        let mint = Keypair::new();

        let triple = if request.mode.attaches_metadata() {
            Some(self.metadata_triple(&request.diploma, &mint.pubkey())?)
        } else {
            None
        };

        let rent = self
            .rpc
            .minimum_balance_for_rent_exemption(MINT_ACCOUNT_LEN)
            .await?;
        let plan = DiplomaTokenBuilder::new(payer, recipient, metadata_program_id, request.mode)
            .plan(mint.pubkey(), rent, triple.as_ref())?;
        // Every envelope must fit before the first one spends rent on the mint.
        plan.check_sizes(&payer)?;

        tracing::info!(
            mint = %mint.pubkey(),
            %recipient,
            envelopes = plan.envelopes.len(),
            split = request.mode.is_split(),
            metadata = request.mode.attaches_metadata(),
            "issuing diploma token"
        );

        let signatures = self.submit(signer, &mint, &plan, &mut progress).await?;
        progress(ISSUED_PROGRESS);

        Ok(IssuanceResult {
            mint: plan.addresses.mint.to_string(),
            token_account: plan.addresses.token_account.to_string(),
            signatures,
            metadata_account: plan.addresses.metadata.map(|(k, _)| k.to_string()),
            mode: request.mode,
            diploma: request.diploma.clone(),
        })
    }

    fn metadata_triple(
        &self,
        diploma: &DiplomaMetadata,
        mint: &Pubkey,
    ) -> VerigradResult<MetadataTriple> {
        let doc = TokenMetadataDocument::for_diploma(diploma)?;
        let uri = doc.uri(self.config.metadata.base_uri.as_deref(), &mint.to_string())?;
        MetadataTriple::new(&doc.name, &doc.symbol, &uri)
    }

    async fn submit<F>(
        &self,
        signer: &dyn Signer,
        mint: &Keypair,
        plan: &TokenPlan,
        progress: &mut F,
    ) -> VerigradResult<Vec<String>>
    where
        F: FnMut(&str),
    {
        let mut signatures = Vec::with_capacity(plan.envelopes.len());
        let mut confirmed_steps = Vec::new();

        for envelope in &plan.envelopes {
            progress(envelope.progress);

            let sent = self.send_envelope(signer, mint, envelope).await;

            match sent {
                Ok(sig) => {
                    tracing::info!(step = %envelope.label(), %sig, "envelope confirmed");
                    signatures.push(sig.to_string());
                    confirmed_steps.push(envelope.label());
                }
                Err(err) if signatures.is_empty() => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        mint = %plan.addresses.mint,
                        confirmed = signatures.len(),
                        error = %err,
                        "issuance stopped after partial confirmation"
                    );
                    return Err(VerigradError::Incomplete {
                        completed: PartialIssuance {
                            mint: plan.addresses.mint.to_string(),
                            token_account: plan.addresses.token_account.to_string(),
                            signatures,
                            steps: confirmed_steps,
                        },
                        source: Box::new(err),
                    });
                }
            }
        }

        Ok(signatures)
    }

    async fn send_envelope(
        &self,
        signer: &dyn Signer,
        mint: &Keypair,
        envelope: &EnvelopePlan,
    ) -> VerigradResult<Signature> {
        let blockhash = self.rpc.latest_blockhash().await?;
        let mut tx = envelope.to_transaction(&signer.pubkey(), blockhash);

        let mut signers: Vec<&dyn Signer> = vec![signer];
        if envelope.mint_signs {
            signers.push(mint);
        }
        tx.try_sign(&signers, blockhash)
            .map_err(|e| VerigradError::submission(classify_signer_error(&e), e.to_string()))?;

        self.rpc.send_and_confirm(&tx).await
    }
}

//! Diploma token transaction builder.
//!
//! One builder covers every layout through [`IssueMode`]:
//!
//! - single: A = create, init, token account, mint
//! - single + metadata: A = create, init, token account, mint, metadata
//! - split: A = create, init; B = token account, mint
//! - split + metadata: A = create, init; B = token account, mint, metadata
//!
//! Planning is pure: no RPC, no signing. The issuer fetches rent and blockhashes
//! and signs each envelope, after [`TokenPlan::check_sizes`] has passed.

use solana_program::hash::Hash;
use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;
use verigrad_core::model::IssueMode;
use verigrad_core::{VerigradError, VerigradResult};

use crate::constants::MAX_ENVELOPE_BYTES;
use crate::instructions::{self, MetadataTriple};
use crate::pda::{addresses_for_mint, TokenAddresses};

/// One instruction of the diploma token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateMintAccount,
    InitializeMint,
    CreateTokenAccount,
    MintOne,
    AttachMetadata,
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateMintAccount => "create mint account",
            Self::InitializeMint => "initialize mint",
            Self::CreateTokenAccount => "create token account",
            Self::MintOne => "mint diploma token",
            Self::AttachMetadata => "attach metadata",
        }
    }
}

/// An envelope ready to be stamped with a blockhash and signed.
#[derive(Debug, Clone)]
pub struct EnvelopePlan {
    /// Progress text announced before the envelope is sent.
    pub progress: &'static str,
    pub steps: Vec<Step>,
    pub instructions: Vec<Instruction>,
    /// Whether the fresh mint key must co-sign (only when the mint is allocated).
    pub mint_signs: bool,
}

impl EnvelopePlan {
    fn new(progress: &'static str, mint_signs: bool) -> Self {
        Self {
            progress,
            steps: Vec::new(),
            instructions: Vec::new(),
            mint_signs,
        }
    }

    fn push(&mut self, step: Step, ix: Instruction) {
        self.steps.push(step);
        self.instructions.push(ix);
    }

    pub fn label(&self) -> String {
        self.steps
            .iter()
            .map(Step::label)
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// Unsigned transaction with `payer` as fee payer.
    pub fn to_transaction(&self, payer: &Pubkey, blockhash: Hash) -> Transaction {
        let mut tx = Transaction::new_with_payer(&self.instructions, Some(payer));
        tx.message.recent_blockhash = blockhash;
        tx
    }
}

/// The complete plan for one diploma token.
#[derive(Debug, Clone)]
pub struct TokenPlan {
    pub mode: IssueMode,
    pub addresses: TokenAddresses,
    pub envelopes: Vec<EnvelopePlan>,
}

impl TokenPlan {
    pub fn instruction_count(&self) -> usize {
        self.envelopes.iter().map(|e| e.instructions.len()).sum()
    }

    /// Fails when any envelope would not fit in one packet.
    ///
    /// Signature slots are allocated unsigned and the blockhash has a fixed
    /// width, so the size is known before anything is fetched or signed.
    pub fn check_sizes(&self, payer: &Pubkey) -> VerigradResult<()> {
        for (i, envelope) in self.envelopes.iter().enumerate() {
            let size = envelope_size(&envelope.to_transaction(payer, Hash::default()))?;
            if size > MAX_ENVELOPE_BYTES {
                let hint = if self.mode.is_split() {
                    "shorten the metadata"
                } else {
                    "use split mode"
                };
                return Err(VerigradError::invalid_argument(format!(
                    "envelope {} ({}) is {size} bytes, limit is {MAX_ENVELOPE_BYTES}; {hint}",
                    i + 1,
                    envelope.label()
                )));
            }
        }
        Ok(())
    }
}

/// Builds [`TokenPlan`]s for a payer/recipient pair.
#[derive(Debug, Clone)]
pub struct DiplomaTokenBuilder {
    pub payer: Pubkey,
    pub recipient: Pubkey,
    pub metadata_program_id: Pubkey,
    pub mode: IssueMode,
}

impl DiplomaTokenBuilder {
    pub fn new(
        payer: Pubkey,
        recipient: Pubkey,
        metadata_program_id: Pubkey,
        mode: IssueMode,
    ) -> Self {
        Self {
            payer,
            recipient,
            metadata_program_id,
            mode,
        }
    }

    /// Lay out the instruction sequence for `mint`.
    ///
    /// `metadata` is required exactly when the mode attaches metadata.
    pub fn plan(
        &self,
        mint: Pubkey,
        rent_lamports: u64,
        metadata: Option<&MetadataTriple>,
    ) -> VerigradResult<TokenPlan> {
        let triple = match (self.mode.attaches_metadata(), metadata) {
            (true, Some(t)) => Some(t),
            (true, None) => {
                return Err(VerigradError::invalid_argument(
                    "metadata mode requires a name/symbol/uri triple",
                ))
            }
            (false, _) => None,
        };

        let addresses = addresses_for_mint(
            mint,
            &self.recipient,
            triple.map(|_| &self.metadata_program_id),
        );
        let payer = &self.payer;

        let mut first = EnvelopePlan::new(
            if self.mode.is_split() {
                "Creating mint account..."
            } else {
                "Creating diploma token..."
            },
            true,
        );
        first.push(
            Step::CreateMintAccount,
            instructions::create_mint_account(payer, &mint, rent_lamports),
        );
        first.push(Step::InitializeMint, instructions::initialize_mint(&mint, payer)?);

        let mut second = EnvelopePlan::new("Creating token account and minting diploma...", false);
        let delivery = if self.mode.is_split() {
            &mut second
        } else {
            &mut first
        };
        delivery.push(
            Step::CreateTokenAccount,
            instructions::create_token_account(payer, &self.recipient, &mint),
        );
        delivery.push(
            Step::MintOne,
            instructions::mint_one(&mint, &addresses.token_account, payer)?,
        );
        if let (Some(triple), Some((metadata_account, _))) = (triple, addresses.metadata) {
            delivery.push(
                Step::AttachMetadata,
                instructions::create_metadata_account(
                    &self.metadata_program_id,
                    &metadata_account,
                    &mint,
                    payer,
                    triple,
                )?,
            );
        }

        let mut envelopes = vec![first];
        if self.mode.is_split() {
            envelopes.push(second);
        }

        Ok(TokenPlan {
            mode: self.mode,
            addresses,
            envelopes,
        })
    }
}

/// Serialized wire size of `tx`.
pub fn envelope_size(tx: &Transaction) -> VerigradResult<usize> {
    let size = bincode::serialized_size(tx)
        .map_err(|e| VerigradError::invalid_argument(format!("envelope size: {e}")))?;
    Ok(size as usize)
}

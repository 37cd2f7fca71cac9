//! Client for the VeriGrad program's `issueDiploma` instruction.
//!
//! Each call creates a fresh `Diploma` account keyed by a new keypair, so the
//! diploma key co-signs with the issuer.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use verigrad_core::config::ClientConfig;
use verigrad_core::model::RecordReceipt;
use verigrad_core::{VerigradError, VerigradResult};

use crate::constants::{DIPLOMA_STRINGS_SPACE, ISSUE_DIPLOMA_IX};
use crate::idl::{instruction_discriminator, Idl};
use crate::pda::parse_pubkey;
use crate::rpc::{classify_signer_error, LedgerRpc};
use crate::wallet::Wallet;

/// Arguments of `issueDiploma`, in IDL order.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct IssueDiplomaArgs {
    pub student_name: String,
    pub degree: String,
    pub graduation_year: u16,
}

impl IssueDiplomaArgs {
    pub fn new(
        student_name: impl Into<String>,
        degree: impl Into<String>,
        graduation_year: u16,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            degree: degree.into(),
            graduation_year,
        }
    }

    fn check(&self) -> VerigradResult<()> {
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
        if !missing.is_empty() {
            return Err(VerigradError::MissingFields(missing));
        }

        let used = 4 + self.student_name.len() + 4 + self.degree.len();
        if used > DIPLOMA_STRINGS_SPACE {
            return Err(VerigradError::invalid_argument(format!(
                "studentName and degree need {used} bytes, the diploma account holds {DIPLOMA_STRINGS_SPACE}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProgramClient {
    program_id: Pubkey,
    idl: Idl,
}

impl ProgramClient {
    /// Bind the embedded IDL to `program_id`, checking the interface first.
    pub fn new(program_id: Pubkey) -> VerigradResult<Self> {
        let idl = Idl::embedded()?;
        idl.check_diploma_interface()?;
        if let Some(addr) = idl.address() {
            if addr != program_id.to_string() {
                tracing::warn!(
                    %program_id,
                    idl_address = addr,
                    "program id differs from idl address"
                );
            }
        }
        Ok(Self { program_id, idl })
    }

    pub fn from_config(cfg: &ClientConfig) -> VerigradResult<Self> {
        Self::new(parse_pubkey("program", &cfg.program_id)?)
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn idl(&self) -> &Idl {
        &self.idl
    }

    /// Instruction data and accounts for one `issueDiploma` call.
    pub fn issue_diploma_ix(
        &self,
        diploma: &Pubkey,
        issuer: &Pubkey,
        student: &Pubkey,
        args: &IssueDiplomaArgs,
    ) -> VerigradResult<Instruction> {
        let mut data = instruction_discriminator(ISSUE_DIPLOMA_IX).to_vec();
        args.serialize(&mut data)
            .map_err(|e| VerigradError::invalid_argument(format!("issueDiploma args: {e}")))?;

        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*diploma, true),
                AccountMeta::new(*issuer, true),
                AccountMeta::new_readonly(*student, false),
                AccountMeta::new_readonly(solana_program::system_program::id(), false),
            ],
            data,
        })
    }

    /// Record a diploma on-chain. `student` defaults to the issuing wallet.
    pub async fn issue_diploma<R: LedgerRpc>(
        &self,
        rpc: &R,
        wallet: &Wallet,
        student: Option<Pubkey>,
        args: &IssueDiplomaArgs,
    ) -> VerigradResult<RecordReceipt> {
        let signer = wallet.signer()?;
        args.check()?;

        let issuer = signer.pubkey();
        let student = student.unwrap_or(issuer);
        let diploma = Keypair::new();
        let ix = self.issue_diploma_ix(&diploma.pubkey(), &issuer, &student, args)?;

        let blockhash = rpc.latest_blockhash().await?;
        let mut tx = Transaction::new_with_payer(&[ix], Some(&issuer));
        let signers: Vec<&dyn Signer> = vec![signer, &diploma];
        tx.try_sign(&signers, blockhash)
            .map_err(|e| VerigradError::submission(classify_signer_error(&e), e.to_string()))?;

        let sig = rpc.send_and_confirm(&tx).await?;
        tracing::info!(diploma = %diploma.pubkey(), %student, %sig, "diploma recorded");

        Ok(RecordReceipt {
            diploma: diploma.pubkey().to_string(),
            signature: sig.to_string(),
        })
    }
}

//! Read side of the VeriGrad program: decode `Diploma` accounts and list them
//! per student or per issuer straight from the program's accounts.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;
use verigrad_core::model::DiplomaRecord;
use verigrad_core::{VerigradError, VerigradResult};

use crate::constants::{DIPLOMA_ACCOUNT, DIPLOMA_ISSUER_OFFSET, DIPLOMA_STUDENT_OFFSET};
use crate::idl::account_discriminator;
use crate::rpc::{LedgerRpc, MemcmpFilter};

/// Borsh layout of a `Diploma` account after its discriminator.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DiplomaAccount {
    pub issuer: [u8; 32],
    pub student: [u8; 32],
    pub student_name: String,
    pub degree: String,
    pub graduation_year: u16,
    pub issued_at: i64,
}

impl DiplomaAccount {
    /// Decode raw account data. Trailing allocation padding is ignored.
    pub fn decode(data: &[u8]) -> VerigradResult<Self> {
        let disc = account_discriminator(DIPLOMA_ACCOUNT);
        if data.len() < disc.len() || data[..8] != disc {
            return Err(VerigradError::decode("not a Diploma account"));
        }
        let mut rest = &data[8..];
        Self::deserialize(&mut rest).map_err(|e| VerigradError::decode(format!("diploma: {e}")))
    }

    /// Discriminator followed by the borsh body, as the program writes it.
    pub fn encode(&self) -> VerigradResult<Vec<u8>> {
        let mut out = account_discriminator(DIPLOMA_ACCOUNT).to_vec();
        self.serialize(&mut out)
            .map_err(|e| VerigradError::invalid_argument(format!("diploma: {e}")))?;
        Ok(out)
    }

    pub fn into_record(self, address: &Pubkey) -> DiplomaRecord {
        DiplomaRecord {
            address: address.to_string(),
            issuer: Pubkey::new_from_array(self.issuer).to_string(),
            student: Pubkey::new_from_array(self.student).to_string(),
            student_name: self.student_name,
            degree: self.degree,
            graduation_year: self.graduation_year,
            issued_at: self.issued_at,
        }
    }
}

pub struct DiplomaReader<'a, R> {
    rpc: &'a R,
    program_id: Pubkey,
}

impl<'a, R: LedgerRpc> DiplomaReader<'a, R> {
    pub fn new(rpc: &'a R, program_id: Pubkey) -> Self {
        Self { rpc, program_id }
    }

    /// One diploma by account address; `None` when no account exists there.
    pub async fn fetch_diploma(&self, address: &Pubkey) -> VerigradResult<Option<DiplomaRecord>> {
        match self.rpc.account_data(address).await? {
            Some(data) => Ok(Some(DiplomaAccount::decode(&data)?.into_record(address))),
            None => Ok(None),
        }
    }

    /// Diplomas held by `student`, newest first.
    pub async fn diplomas_for_student(
        &self,
        student: &Pubkey,
    ) -> VerigradResult<Vec<DiplomaRecord>> {
        self.scan(DIPLOMA_STUDENT_OFFSET, student).await
    }

    /// Diplomas issued by `issuer`, newest first.
    pub async fn diplomas_by_issuer(&self, issuer: &Pubkey) -> VerigradResult<Vec<DiplomaRecord>> {
        self.scan(DIPLOMA_ISSUER_OFFSET, issuer).await
    }

    async fn scan(&self, offset: usize, key: &Pubkey) -> VerigradResult<Vec<DiplomaRecord>> {
        let filters = [
            MemcmpFilter::new(0, account_discriminator(DIPLOMA_ACCOUNT)),
            MemcmpFilter::new(offset, key.to_bytes()),
        ];
        let accounts = self.rpc.program_accounts(&self.program_id, &filters).await?;

        let mut records = Vec::with_capacity(accounts.len());
        for (address, data) in accounts {
            match DiplomaAccount::decode(&data) {
                Ok(d) => records.push(d.into_record(&address)),
                Err(e) => tracing::warn!(%address, error = %e, "skipping undecodable diploma"),
            }
        }
        records.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(records)
    }
}

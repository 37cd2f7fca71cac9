//! In-memory ledger used by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use solana_program::hash::Hash;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;
use verigrad_core::config::ClientConfig;
use verigrad_core::{FailureKind, VerigradError, VerigradResult};
use verigrad_solana_client::rpc::{LedgerRpc, MemcmpFilter};
use verigrad_solana_client::Wallet;

pub const RENT: u64 = 1_461_600;

#[derive(Default)]
pub struct MockLedger {
    /// Names of the calls made, in order.
    pub calls: RefCell<Vec<&'static str>>,
    pub sent: RefCell<Vec<Transaction>>,
    /// Fail the n-th send (0-based) with the given kind.
    pub fail_send: Cell<Option<(usize, FailureKind)>>,
    /// Yield once inside the rent query, so concurrent callers interleave.
    pub yield_on_rent: Cell<bool>,
    pub accounts: RefCell<BTreeMap<Pubkey, Vec<u8>>>,
    pub program_accounts: RefCell<Vec<(Pubkey, Pubkey, Vec<u8>)>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_send(index: usize, kind: FailureKind) -> Self {
        let ledger = Self::default();
        ledger.fail_send.set(Some((index, kind)));
        ledger
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn add_program_account(&self, program: Pubkey, address: Pubkey, data: Vec<u8>) {
        self.program_accounts.borrow_mut().push((program, address, data));
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.borrow_mut().insert(address, data);
    }
}

impl LedgerRpc for MockLedger {
    async fn latest_blockhash(&self) -> VerigradResult<Hash> {
        self.calls.borrow_mut().push("latest_blockhash");
        Ok(Hash::new_unique())
    }

    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> VerigradResult<u64> {
        self.calls.borrow_mut().push("rent");
        if self.yield_on_rent.get() {
            tokio::task::yield_now().await;
        }
        Ok(RENT)
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> VerigradResult<Signature> {
        self.calls.borrow_mut().push("send_and_confirm");
        let index = self.sent.borrow().len();
        self.sent.borrow_mut().push(tx.clone());
        if let Some((n, kind)) = self.fail_send.get() {
            if n == index {
                return Err(VerigradError::submission(kind, "injected failure"));
            }
        }
        tx.verify()
            .map_err(|e| VerigradError::submission(FailureKind::Program, e.to_string()))?;
        Ok(tx.signatures[0])
    }

    async fn account_data(&self, address: &Pubkey) -> VerigradResult<Option<Vec<u8>>> {
        self.calls.borrow_mut().push("account_data");
        Ok(self.accounts.borrow().get(address).cloned())
    }

    async fn program_accounts(
        &self,
        program: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> VerigradResult<Vec<(Pubkey, Vec<u8>)>> {
        self.calls.borrow_mut().push("program_accounts");
        Ok(self
            .program_accounts
            .borrow()
            .iter()
            .filter(|(owner, _, data)| {
                owner == program
                    && filters
                        .iter()
                        .all(|f| data.get(f.offset..f.offset + f.bytes.len()) == Some(&f.bytes[..]))
            })
            .map(|(_, address, data)| (*address, data.clone()))
            .collect())
    }
}

pub fn wallet() -> (Wallet, Pubkey) {
    let kp = Keypair::new();
    let pk = solana_sdk::signature::Signer::pubkey(&kp);
    (Wallet::from_keypair(kp), pk)
}

pub fn config() -> ClientConfig {
    ClientConfig::default()
}

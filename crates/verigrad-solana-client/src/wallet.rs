//! The issuing wallet.
//!
//! A wallet may be disconnected; every operation that needs a signature checks
//! for that first and fails with [`VerigradError::SignerMissing`] before
//! touching the network.

use std::path::Path;

use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signer};
use verigrad_core::{VerigradError, VerigradResult};

pub struct Wallet {
    signer: Option<Box<dyn Signer>>,
}

impl Wallet {
    pub fn disconnected() -> Self {
        Self { signer: None }
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self::from_signer(Box::new(keypair))
    }

    pub fn from_signer(signer: Box<dyn Signer>) -> Self {
        Self {
            signer: Some(signer),
        }
    }

    /// Load a JSON keypair file. A missing file yields a disconnected wallet;
    /// an unreadable one is an error.
    pub fn from_file(path: &Path) -> VerigradResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no keypair file, wallet disconnected");
            return Ok(Self::disconnected());
        }
        let kp = read_keypair_file(path).map_err(|e| {
            VerigradError::invalid_argument(format!("keypair {}: {e}", path.display()))
        })?;
        Ok(Self::from_keypair(kp))
    }

    pub fn is_connected(&self) -> bool {
        self.signer.is_some()
    }

    pub fn pubkey(&self) -> Option<Pubkey> {
        self.signer.as_ref().map(|s| s.pubkey())
    }

    /// The connected signer, or `SignerMissing`.
    pub fn signer(&self) -> VerigradResult<&(dyn Signer + 'static)> {
        self.signer.as_deref().ok_or(VerigradError::SignerMissing)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("pubkey", &self.pubkey())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use solana_sdk::signature::write_keypair_file;

    #[test]
    fn disconnected_wallet_refuses_to_sign() {
        let w = Wallet::disconnected();
        assert!(!w.is_connected());
        assert!(w.pubkey().is_none());
        assert_matches!(w.signer(), Err(VerigradError::SignerMissing));
    }

    #[test]
    fn missing_file_means_disconnected() {
        let w = Wallet::from_file(Path::new("/definitely/not/here/id.json")).unwrap();
        assert!(!w.is_connected());
    }

    #[test]
    fn keypair_file_round_trips() {
        let kp = Keypair::new();
        let expected = kp.pubkey();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.json");
        write_keypair_file(&kp, &path).unwrap();
        let w = Wallet::from_file(&path).unwrap();
        assert_eq!(w.pubkey(), Some(expected));
    }
}

//! Address derivation helpers.
//!
//! Diploma tokens touch two derived addresses per mint: the recipient's
//! associated token account and the Token Metadata PDA. Both are derived, never
//! allocated with a fresh key.

use solana_program::pubkey::Pubkey;
use verigrad_core::{VerigradError, VerigradResult};

use crate::constants::SEED_METADATA;

/// Addresses involved in one diploma token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAddresses {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub metadata: Option<(Pubkey, u8)>,
}

/// Parse a base-58 address, naming the offending field on failure.
pub fn parse_pubkey(label: &str, s: &str) -> VerigradResult<Pubkey> {
    s.trim()
        .parse()
        .map_err(|_| VerigradError::invalid_argument(format!("invalid {label} address: {s}")))
}

/// Derive the associated token account of `owner` for `mint`.
pub fn derive_token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}

/// Derive the Token Metadata PDA for `mint`.
///
/// Seeds: `["metadata", metadata_program_id, mint]`.
pub fn derive_metadata_account(metadata_program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[SEED_METADATA, metadata_program_id.as_ref(), mint.as_ref()],
        metadata_program_id,
    )
}

/// Collect the addresses used by a diploma token flow.
pub fn addresses_for_mint(
    mint: Pubkey,
    recipient: &Pubkey,
    metadata_program_id: Option<&Pubkey>,
) -> TokenAddresses {
    TokenAddresses {
        mint,
        token_account: derive_token_account(recipient, &mint),
        metadata: metadata_program_id.map(|p| derive_metadata_account(p, &mint)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reports_label() {
        let err = parse_pubkey("recipient", "0xdeadbeef").unwrap_err();
        assert!(err.to_string().contains("invalid recipient address"));
        assert!(parse_pubkey("program", " 11111111111111111111111111111111 ").is_ok());
    }

    #[test]
    fn token_account_is_stable_per_owner_and_mint() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert_eq!(
            derive_token_account(&owner, &mint),
            derive_token_account(&owner, &mint)
        );
        assert_ne!(
            derive_token_account(&owner, &mint),
            derive_token_account(&Pubkey::new_unique(), &mint)
        );
    }

    #[test]
    fn metadata_pda_is_mint_specific() {
        let program = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (pda, _) = derive_metadata_account(&program, &mint);
        assert_eq!(pda, derive_metadata_account(&program, &mint).0);
        assert_ne!(pda, derive_metadata_account(&program, &Pubkey::new_unique()).0);
    }

    #[test]
    fn addresses_skip_metadata_when_not_requested() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let a = addresses_for_mint(mint, &owner, None);
        assert!(a.metadata.is_none());
        assert_eq!(a.token_account, derive_token_account(&owner, &mint));
    }
}

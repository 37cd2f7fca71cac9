//! Instruction constructors for the diploma token steps.
//!
//! Token and associated-account instructions come from the SPL crates. The
//! Token Metadata instruction is assembled by hand from its documented layout
//! (tag byte + borsh `CreateMetadataAccountArgsV3`) because no typed client is
//! pulled in for it.

use borsh::BorshSerialize;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::program_pack::Pack;
use solana_program::pubkey::Pubkey;
use solana_sdk::system_instruction;
use spl_token::state::Mint;
use verigrad_core::metadata::truncate_utf8;
use verigrad_core::{VerigradError, VerigradResult};

use crate::constants::{
    CREATE_METADATA_ACCOUNT_V3, MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH, MAX_URI_LENGTH,
};

/// Byte length of an SPL mint account.
pub const MINT_ACCOUNT_LEN: usize = Mint::LEN;

/// Step 1: allocate the mint account, owned by the token program.
pub fn create_mint_account(payer: &Pubkey, mint: &Pubkey, rent_lamports: u64) -> Instruction {
    system_instruction::create_account(
        payer,
        mint,
        rent_lamports,
        MINT_ACCOUNT_LEN as u64,
        &spl_token::id(),
    )
}

/// Step 2: zero-decimal mint, `authority` mints, nobody can freeze.
pub fn initialize_mint(mint: &Pubkey, authority: &Pubkey) -> VerigradResult<Instruction> {
    spl_token::instruction::initialize_mint(&spl_token::id(), mint, authority, None, 0)
        .map_err(|e| VerigradError::invalid_argument(format!("initialize_mint: {e}")))
}

/// Step 3: create `owner`'s associated token account for `mint`, paid by `payer`.
pub fn create_token_account(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account(
        payer,
        owner,
        mint,
        &spl_token::id(),
    )
}

/// Step 4: mint exactly one unit into `token_account`.
pub fn mint_one(
    mint: &Pubkey,
    token_account: &Pubkey,
    authority: &Pubkey,
) -> VerigradResult<Instruction> {
    spl_token::instruction::mint_to(&spl_token::id(), mint, token_account, authority, &[], 1)
        .map_err(|e| VerigradError::invalid_argument(format!("mint_to: {e}")))
}

#[derive(BorshSerialize)]
struct Creator {
    address: [u8; 32],
    verified: bool,
    share: u8,
}

// `collection`, `uses` and `collection_details` are always absent for diplomas.
// Any `Option::None` encodes as the single zero byte the program expects.
#[derive(BorshSerialize)]
struct DataV2 {
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    creators: Option<Vec<Creator>>,
    collection: Option<u8>,
    uses: Option<u8>,
}

#[derive(BorshSerialize)]
struct CreateMetadataAccountArgsV3 {
    data: DataV2,
    is_mutable: bool,
    collection_details: Option<u8>,
}

/// Name/symbol/URI triple stored on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTriple {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl MetadataTriple {
    /// Clamp name and symbol to the program limits. A URI over the limit is
    /// refused: truncating it would point at a different document.
    pub fn new(name: &str, symbol: &str, uri: &str) -> VerigradResult<Self> {
        if uri.len() > MAX_URI_LENGTH {
            return Err(VerigradError::invalid_argument(format!(
                "metadata uri is {} bytes, limit is {MAX_URI_LENGTH}; configure a metadata base uri",
                uri.len()
            )));
        }
        Ok(Self {
            name: truncate_utf8(name, MAX_NAME_LENGTH).to_string(),
            symbol: truncate_utf8(symbol, MAX_SYMBOL_LENGTH).to_string(),
            uri: uri.to_string(),
        })
    }
}

/// Step 5: `CreateMetadataAccountV3` with `authority` as mint authority,
/// payer, update authority and sole verified creator.
pub fn create_metadata_account(
    metadata_program_id: &Pubkey,
    metadata_account: &Pubkey,
    mint: &Pubkey,
    authority: &Pubkey,
    triple: &MetadataTriple,
) -> VerigradResult<Instruction> {
    let args = CreateMetadataAccountArgsV3 {
        data: DataV2 {
            name: triple.name.clone(),
            symbol: triple.symbol.clone(),
            uri: triple.uri.clone(),
            seller_fee_basis_points: 0,
            creators: Some(vec![Creator {
                address: authority.to_bytes(),
                verified: true,
                share: 100,
            }]),
            collection: None,
            uses: None,
        },
        is_mutable: true,
        collection_details: None,
    };

    let mut data = vec![CREATE_METADATA_ACCOUNT_V3];
    args.serialize(&mut data)
        .map_err(|e| VerigradError::invalid_argument(format!("metadata args: {e}")))?;

    Ok(Instruction {
        program_id: *metadata_program_id,
        accounts: vec![
            AccountMeta::new(*metadata_account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(solana_program::system_program::id(), false),
        ],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_account_is_owned_by_token_program() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = create_mint_account(&payer, &mint, 1_461_600);
        assert_eq!(ix.program_id, solana_program::system_program::id());
        assert!(ix.accounts[0].is_signer && ix.accounts[1].is_signer);
        assert_eq!(MINT_ACCOUNT_LEN, 82);
    }

    #[test]
    fn mint_has_no_freeze_authority() {
        let mint = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let ix = initialize_mint(&mint, &authority).unwrap();
        assert_eq!(ix.program_id, spl_token::id());
        match spl_token::instruction::TokenInstruction::unpack(&ix.data).unwrap() {
            spl_token::instruction::TokenInstruction::InitializeMint {
                decimals,
                mint_authority,
                freeze_authority,
            } => {
                assert_eq!(decimals, 0);
                assert_eq!(mint_authority, authority);
                assert!(freeze_authority.is_none());
            }
            other => panic!("unexpected instruction {other:?}"),
        }
    }

    #[test]
    fn mints_exactly_one() {
        let ix = mint_one(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
        )
        .unwrap();
        match spl_token::instruction::TokenInstruction::unpack(&ix.data).unwrap() {
            spl_token::instruction::TokenInstruction::MintTo { amount } => assert_eq!(amount, 1),
            other => panic!("unexpected instruction {other:?}"),
        }
    }

    #[test]
    fn metadata_payload_layout() {
        let program = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let triple = MetadataTriple::new("BSc - Jane", "DIPLOMA", "https://x.y/m.json").unwrap();
        let ix = create_metadata_account(
            &program,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &authority,
            &triple,
        )
        .unwrap();

        assert_eq!(ix.data[0], CREATE_METADATA_ACCOUNT_V3);
        // name: u32 little-endian length prefix, then bytes
        assert_eq!(&ix.data[1..5], &10u32.to_le_bytes());
        assert_eq!(&ix.data[5..15], b"BSc - Jane");

        // tail: seller fee, creators(Some, len 1, key, verified, share),
        // collection None, uses None, is_mutable, collection_details None
        let tail = &ix.data[ix.data.len() - (2 + 1 + 4 + 32 + 1 + 1 + 1 + 1 + 1 + 1)..];
        assert_eq!(&tail[0..2], &[0, 0]);
        assert_eq!(tail[2], 1);
        assert_eq!(&tail[3..7], &1u32.to_le_bytes());
        assert_eq!(&tail[7..39], authority.as_ref());
        assert_eq!(&tail[39..], &[1, 100, 0, 0, 1, 0]);
        assert_eq!(ix.accounts.len(), 6);
    }

    #[test]
    fn names_are_clamped() {
        let long = "x".repeat(50);
        let t = MetadataTriple::new(&long, "DIPLOMA-TOKEN", "u").unwrap();
        assert_eq!(t.name.len(), MAX_NAME_LENGTH);
        assert_eq!(t.symbol, "DIPLOMA-TO");
    }

    #[test]
    fn uri_over_limit_is_refused() {
        let at_limit = "u".repeat(MAX_URI_LENGTH);
        assert!(MetadataTriple::new("n", "s", &at_limit).is_ok());

        let inline = format!("data:application/json;base64,{}", "A".repeat(800));
        let err = MetadataTriple::new("n", "s", &inline).unwrap_err();
        assert_eq!(err.kind(), verigrad_core::FailureKind::InvalidInput);
        assert!(err.to_string().contains("configure a metadata base uri"));
    }
}

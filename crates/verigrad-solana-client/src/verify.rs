//! Verifier view over a diploma token.

use solana_program::program_option::COption;
use solana_program::program_pack::Pack;
use solana_program::pubkey::Pubkey;
use spl_token::state::{Account as TokenAccount, Mint};
use verigrad_core::model::TokenVerification;
use verigrad_core::{VerigradError, VerigradResult};

use crate::pda::derive_token_account;
use crate::rpc::LedgerRpc;

fn optional_key(k: COption<Pubkey>) -> Option<String> {
    match k {
        COption::Some(k) => Some(k.to_string()),
        COption::None => None,
    }
}

/// Inspect `mint` and the balance `holder` keeps in its associated token
/// account, and judge whether this is an authentic one-of-one diploma token.
pub async fn verify_diploma_token<R: LedgerRpc>(
    rpc: &R,
    mint: &Pubkey,
    holder: &Pubkey,
) -> VerigradResult<TokenVerification> {
    let mint_data = rpc
        .account_data(mint)
        .await?
        .ok_or_else(|| VerigradError::invalid_argument(format!("mint {mint} not found")))?;
    let mint_state = Mint::unpack(&mint_data)
        .map_err(|e| VerigradError::decode(format!("mint {mint}: {e}")))?;

    let token_account = derive_token_account(holder, mint);
    let holder_balance = match rpc.account_data(&token_account).await? {
        Some(data) => {
            let acc = TokenAccount::unpack(&data)
                .map_err(|e| VerigradError::decode(format!("token account {token_account}: {e}")))?;
            if acc.mint == *mint && acc.owner == *holder {
                acc.amount
            } else {
                0
            }
        }
        None => 0,
    };

    let freezable = mint_state.freeze_authority.is_some();
    let verdict = TokenVerification::judge(
        mint_state.decimals,
        mint_state.supply,
        holder_balance,
        freezable,
    );
    tracing::debug!(%mint, %holder, ?verdict, "diploma token checked");

    Ok(TokenVerification {
        mint: mint.to_string(),
        holder: holder.to_string(),
        token_account: token_account.to_string(),
        decimals: mint_state.decimals,
        supply: mint_state.supply,
        holder_balance,
        mint_authority: optional_key(mint_state.mint_authority),
        freeze_authority: optional_key(mint_state.freeze_authority),
        verdict,
    })
}

use anyhow::Result;
use verigrad_solana_client::pda::parse_pubkey;
use verigrad_solana_client::{verify_diploma_token, RpcGateway};

use crate::config::Settings;
use crate::output;

pub async fn run(settings: &Settings, mint: &str, holder: &str) -> Result<()> {
    let mint = parse_pubkey("mint", mint)?;
    let holder = parse_pubkey("holder", holder)?;
    let rpc = RpcGateway::from_config(&settings.client);

    let pb = output::spinner();
    pb.set_message("reading mint and token account");
    let verification = verify_diploma_token(&rpc, &mint, &holder).await;
    pb.finish_and_clear();
    let verification = verification?;

    let verdict = verification.verdict;
    output::status(
        verdict.is_authentic(),
        &format!("verdict: {}", verdict.as_str()),
    );
    output::print(&verification)
}

use anyhow::{anyhow, Result};
use verigrad_solana_client::pda::parse_pubkey;
use verigrad_solana_client::{DiplomaReader, RpcGateway};

use crate::config::Settings;
use crate::output;

pub async fn run(settings: &Settings, address: &str) -> Result<()> {
    let address = parse_pubkey("diploma", address)?;
    let program_id = parse_pubkey("program", &settings.client.program_id)?;
    let rpc = RpcGateway::from_config(&settings.client);

    let pb = output::spinner();
    pb.set_message("fetching diploma");
    let record = DiplomaReader::new(&rpc, program_id)
        .fetch_diploma(&address)
        .await;
    pb.finish_and_clear();

    match record? {
        Some(r) => output::print(&r),
        None => Err(anyhow!("no diploma account at {address}")),
    }
}

use anyhow::{anyhow, Result};
use serde::Serialize;
use verigrad_core::model::DiplomaRecord;
use verigrad_solana_client::pda::parse_pubkey;
use verigrad_solana_client::{DiplomaReader, RpcGateway};

use crate::config::Settings;
use crate::output;

#[derive(Debug, Serialize)]
pub struct ListOut {
    pub view: &'static str,
    pub key: String,
    pub count: usize,
    pub diplomas: Vec<DiplomaRecord>,
}

pub async fn run(settings: &Settings, student: Option<&str>, issuer: Option<&str>) -> Result<()> {
    let program_id = parse_pubkey("program", &settings.client.program_id)?;
    let rpc = RpcGateway::from_config(&settings.client);
    let reader = DiplomaReader::new(&rpc, program_id);

    let pb = output::spinner();
    pb.set_message("scanning diploma accounts");
    let (view, key, diplomas) = match (student, issuer) {
        (Some(s), _) => {
            let key = parse_pubkey("student", s)?;
            ("student", key, reader.diplomas_for_student(&key).await)
        }
        (None, Some(i)) => {
            let key = parse_pubkey("issuer", i)?;
            ("issuer", key, reader.diplomas_by_issuer(&key).await)
        }
        (None, None) => return Err(anyhow!("pass --student or --issuer")),
    };
    pb.finish_and_clear();
    let diplomas = diplomas?;

    output::print(&ListOut {
        view,
        key: key.to_string(),
        count: diplomas.len(),
        diplomas,
    })
}

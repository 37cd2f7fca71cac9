use anyhow::Result;
use serde::Serialize;
use verigrad_solana_client::idl::Idl;
use verigrad_solana_client::pda::parse_pubkey;
use verigrad_solana_client::{LedgerRpc, RpcGateway};

use crate::config::Settings;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl Check {
    fn new(name: &str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            ok,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub rpc_url: String,
    pub commitment: &'static str,
    pub checks: Vec<Check>,
}

pub async fn run(settings: &Settings) -> Result<()> {
    let cfg = &settings.client;
    let mut checks = Vec::new();

    checks.push(match Idl::embedded().and_then(|idl| idl.check_diploma_interface()) {
        Ok(()) => Check::new("idl", true, "issueDiploma and Diploma layout match"),
        Err(e) => Check::new("idl", false, e.to_string()),
    });

    let wallet = settings.wallet();
    let issuer = match &wallet {
        Ok(w) => match w.pubkey() {
            Some(pk) => {
                checks.push(Check::new("keypair", true, pk.to_string()));
                Some(pk)
            }
            None => {
                checks.push(Check::new(
                    "keypair",
                    false,
                    format!("no keypair at {}", settings.keypair_path.display()),
                ));
                None
            }
        },
        Err(e) => {
            checks.push(Check::new("keypair", false, e.to_string()));
            None
        }
    };

    let rpc = RpcGateway::from_config(cfg);
    let pb = output::spinner();
    pb.set_message("contacting rpc endpoint");
    let reachable = match rpc.version().await {
        Ok(v) => {
            checks.push(Check::new("rpc", true, format!("solana-core {v}")));
            true
        }
        Err(e) => {
            checks.push(Check::new("rpc", false, e.to_string()));
            false
        }
    };

    if reachable {
        for (name, id) in [
            ("program", cfg.program_id.as_str()),
            ("metadata_program", cfg.metadata_program_id.as_str()),
        ] {
            pb.set_message(format!("looking up {name}"));
            let check = match parse_pubkey(name, id) {
                Ok(key) => match rpc.account_data(&key).await {
                    Ok(Some(_)) => Check::new(name, true, format!("{key} deployed")),
                    Ok(None) => Check::new(name, false, format!("{key} not found on this cluster")),
                    Err(e) => Check::new(name, false, e.to_string()),
                },
                Err(e) => Check::new(name, false, e.to_string()),
            };
            checks.push(check);
        }

        if let Some(pk) = issuer {
            pb.set_message("reading issuer balance");
            checks.push(match rpc.balance(&pk).await {
                Ok(0) => Check::new("balance", false, "issuer has no SOL for fees"),
                Ok(lamports) => Check::new("balance", true, format!("{lamports} lamports")),
                Err(e) => Check::new("balance", false, e.to_string()),
            });
        }
    }
    pb.finish_and_clear();

    let ok = checks.iter().all(|c| c.ok);
    output::print(&DoctorOut {
        ok,
        rpc_url: cfg.rpc_url.clone(),
        commitment: cfg.commitment.as_str(),
        checks,
    })
}

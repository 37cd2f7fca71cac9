use anyhow::Result;
use verigrad_solana_client::idl::Idl;

use crate::output;

pub fn run() -> Result<()> {
    let idl = Idl::embedded()?;
    idl.check_diploma_interface()?;
    output::print(&idl.summary())
}

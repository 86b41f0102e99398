//! Validate command - Check parameters and show the derived fragments.

use anyhow::Result;
use clap::Args;
use tracing::info;

use winsetup_core::variables::keys;
use winsetup_core::RenderOrchestrator;

use super::ParamsArgs;

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    params: ParamsArgs,

    /// Print the full variable set as JSON instead of the fragments
    #[arg(long)]
    variables: bool,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let params = args.params.build()?;

    let variables = RenderOrchestrator::prepare(&params)?;
    info!("Parameters are valid ({} template variables)", variables.len());

    if args.variables {
        println!("{}", serde_json::to_string_pretty(&variables)?);
        return Ok(());
    }

    println!("✅ Parameters are valid");
    println!();
    println!("Image selector:");
    println!("{}", variables.get(keys::FROM_IMAGE_XML_CODE).unwrap_or_default());

    let network = variables.get(keys::STATIC_IP_XML_CODE).unwrap_or_default();
    if network.is_empty() {
        println!();
        println!("Network: DHCP (no static IP configuration)");
    } else {
        println!();
        println!("Static network components:");
        println!("{}", network);
    }

    Ok(())
}

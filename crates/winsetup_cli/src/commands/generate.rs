//! Generate command - Write the setup files.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use winsetup_core::RenderOrchestrator;
use winsetup_templates::{FsFileWriter, FsTemplateRenderer, TemplateStore};

use super::ParamsArgs;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    params: ParamsArgs,

    /// Directory with template overrides (autounattend.xml, start.ps1, main.cs)
    #[arg(long, env = "WINSETUP_TEMPLATES_DIR")]
    templates_dir: Option<PathBuf>,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let params = args.params.build()?;

    let store = match &args.templates_dir {
        Some(dir) => {
            info!("Using template overrides from {:?}", dir);
            TemplateStore::with_overrides(dir)
                .with_context(|| format!("Failed to load templates from {:?}", dir))?
        }
        None => TemplateStore::builtin(),
    };

    let orchestrator = RenderOrchestrator::new(
        Arc::new(FsTemplateRenderer::new(store)),
        Arc::new(FsFileWriter::new()),
    );
    let outcome = orchestrator.run(&params);

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.is_success() {
        anyhow::bail!("{}", outcome.msg);
    }
    Ok(())
}

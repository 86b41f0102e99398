//! CLI command definitions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use winsetup_core::{BuildParameters, ParamKey};

pub mod generate;
pub mod validate;

/// winsetup - unattended Windows setup file generator
#[derive(Parser)]
#[command(name = "winsetup")]
#[command(version, about = "Generate unattended Windows setup files")]
#[command(long_about = r#"
winsetup turns a set of build parameters into the files an unattended Windows
install needs: autounattend.xml, start.ps1, main.cs and install.json.

COMMANDS:
  generate  → Validate parameters and write all setup files
  validate  → Validate parameters and print the derived answer-file fragments

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the setup files
    Generate(generate::GenerateArgs),

    /// Check parameters without writing anything
    Validate(validate::ValidateArgs),
}

/// Parameter sources shared by all commands.
#[derive(Args)]
pub struct ParamsArgs {
    /// Parameter file (JSON, YAML or TOML, by extension)
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Set a parameter, overriding the parameter file
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(ParamKey, String)>,

    /// Output directory, overriding config_output_dir
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl ParamsArgs {
    /// Load the parameter file, then apply overrides in order.
    pub fn build(&self) -> Result<BuildParameters> {
        let mut params = match &self.params {
            Some(path) => BuildParameters::load(path)
                .with_context(|| format!("Failed to read {:?}", path))?,
            None => BuildParameters::new(),
        };

        for (key, value) in &self.overrides {
            params
                .set(*key, &Value::String(value.clone()))
                .with_context(|| format!("Invalid --set value for {}", key))?;
        }

        if let Some(dir) = &self.output_dir {
            params.config_output_dir = Some(dir.clone());
        }

        Ok(params)
    }
}

/// Parse a `KEY=VALUE` override.
pub fn parse_override(s: &str) -> std::result::Result<(ParamKey, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;
    let key = ParamKey::from_name(name.trim())
        .ok_or_else(|| format!("unrecognized parameter `{}`", name.trim()))?;
    Ok((key, value.to_string()))
}

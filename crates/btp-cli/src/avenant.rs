//! # Avenant Subcommand
//!
//! Computes and renders a contract amendment.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use btp_core::{AvenantInput, Config};

use crate::{read_input, write_output, OutputFormat};

/// Arguments for the avenant subcommand.
#[derive(Args, Debug)]
pub struct AvenantArgs {
    /// Path to the amendment snapshot (JSON, or YAML by extension).
    pub input: PathBuf,

    /// Write the result to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

/// Execute the avenant subcommand.
pub fn run_avenant(args: &AvenantArgs, config: &Config) -> Result<u8> {
    let input: AvenantInput = read_input(&args.input)?;
    tracing::info!(
        numero = ?input.avenant.numero,
        input = %args.input.display(),
        "rendering amendment"
    );
    let rendered = btp_document::render_avenant(&input, config);
    write_output(&rendered, args.format, args.out.as_deref())
}

//! # Situation Subcommand
//!
//! Computes and renders the payment certificate of one period.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use btp_core::{Config, SituationInput};

use crate::{read_input, write_output, OutputFormat};

/// Arguments for the situation subcommand.
#[derive(Args, Debug)]
pub struct SituationArgs {
    /// Path to the certificate snapshot (JSON, or YAML by extension).
    pub input: PathBuf,

    /// Write the result to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

/// Execute the situation subcommand.
pub fn run_situation(args: &SituationArgs, config: &Config) -> Result<u8> {
    let input: SituationInput = read_input(&args.input)?;
    tracing::info!(
        numero = ?input.situation.numero,
        input = %args.input.display(),
        "rendering payment certificate"
    );
    let rendered = btp_document::render_situation(&input, config);
    write_output(&rendered, args.format, args.out.as_deref())
}

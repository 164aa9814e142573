//! # btp-cli: Progress-Billing Command-Line Interface
//!
//! Thin front end over the domain crates: reads a snapshot file, runs the
//! calculator and renderer, writes the result.
//!
//! ## Subcommands
//!
//! - `situation`: payment certificate for one period
//! - `avenant`: contract amendment document
//! - `config`: print the effective configuration
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live in one module per
//!   subcommand.
//! - Handlers delegate to `btp-situation` and `btp-document`; no figures are
//!   computed here.

pub mod avenant;
pub mod situation;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use btp_core::{Config, Payload};
use btp_document::RenderedDocument;

/// What a rendering subcommand writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML page.
    #[default]
    Html,
    /// Document tree as JSON.
    Json,
    /// Computed figures as JSON.
    Figures,
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        tracing::debug!("no configuration file, using defaults");
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = Config::from_yaml_str(&content)
        .with_context(|| format!("invalid config: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Read a snapshot file: YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn read_input<T: Payload>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input: {}", path.display()))?;
    let value = if is_yaml(path) {
        T::from_yaml(&content)
            .with_context(|| format!("invalid YAML snapshot: {}", path.display()))?
    } else {
        T::from_json(&content)
            .with_context(|| format!("invalid JSON snapshot: {}", path.display()))?
    };
    Ok(value)
}

/// The output text for a rendered document in the requested format.
pub fn format_output<F: Serialize>(
    rendered: &RenderedDocument<F>,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Html => rendered.html.clone(),
        OutputFormat::Json => serde_json::to_string_pretty(&rendered.document)?,
        OutputFormat::Figures => serde_json::to_string_pretty(&rendered.figures)?,
    })
}

/// Write a rendered document to `out`, or stdout when absent.
pub fn write_output<F: Serialize>(
    rendered: &RenderedDocument<F>,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<u8> {
    let text = format_output(rendered, format)?;
    match out {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                digest = %rendered.digest,
                "document written"
            );
        }
        None => println!("{text}"),
    }
    Ok(0)
}

/// Print the effective configuration as YAML.
pub fn run_config(config: &Config) -> Result<u8> {
    print!("{}", config.to_yaml_string()?);
    Ok(0)
}

//! # Rate and Rendering Configuration
//!
//! The certificate arithmetic depends on a handful of rates that French
//! public and private works contracts fix by regulation: 5 % retained
//! guarantee, a 3 % provision and a 20 % standard VAT rate. They are carried
//! here as explicit parameters so alternate rates can be exercised without
//! touching the calculator.
//!
//! Every field has a default; a YAML file only needs the keys it changes.
//!
//! ```yaml
//! rates:
//!   default_vat_rate: 10
//!   penalty_match: case_insensitive
//! render:
//!   max_subcontractor_rows: 3
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BtpError, ConfigError};

/// How an applied penalty's type is matched against the job-site catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyMatch {
    /// Case-sensitive equality after trimming surrounding whitespace.
    #[default]
    Exact,
    /// Equality after trimming and Unicode lowercasing.
    CaseInsensitive,
}

impl PenaltyMatch {
    /// Whether an applied penalty type matches a catalogue type.
    pub fn matches(self, catalogue: &str, applied: &str) -> bool {
        let (a, b) = (catalogue.trim(), applied.trim());
        match self {
            Self::Exact => a == b,
            Self::CaseInsensitive => a.to_lowercase() == b.to_lowercase(),
        }
    }
}

/// Rates used by the financial calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// VAT rate in percent applied when neither the input nor the contract
    /// specifies one.
    pub default_vat_rate: f64,
    /// Retained-guarantee rate as a fraction, applied when the contract has
    /// no bank guarantee.
    pub retention_rate: f64,
    /// Provision rate as a fraction of each column's HT amount.
    pub provision_rate: f64,
    /// Proportional share used in place of `ht / contract` when the contract
    /// total (amendments included) is zero.
    pub zero_contract_share: f64,
    /// Penalty type matching mode.
    pub penalty_match: PenaltyMatch,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            default_vat_rate: 20.0,
            retention_rate: 0.05,
            provision_rate: 0.03,
            zero_contract_share: 0.0,
            penalty_match: PenaltyMatch::Exact,
        }
    }
}

impl RateConfig {
    /// Check that every rate is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRate` for negative or non-finite rates and
    /// `ConfigError::RateAboveOne` for fractional rates above 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("default_vat_rate", self.default_vat_rate)?;
        check_fraction("retention_rate", self.retention_rate)?;
        check_fraction("provision_rate", self.provision_rate)?;
        check_rate("zero_contract_share", self.zero_contract_share)?;
        Ok(())
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidRate { name, value });
    }
    Ok(())
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    check_rate(name, value)?;
    if value > 1.0 {
        return Err(ConfigError::RateAboveOne { name, value });
    }
    Ok(())
}

/// Settings for document assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum number of subcontractor payment rows printed. The total
    /// always covers every payment.
    pub max_subcontractor_rows: usize,
    /// Text of the badge printed when a logo URL is missing.
    pub logo_placeholder: String,
    /// Title of the payment-certificate document.
    pub situation_title: String,
    /// Title of the amendment document.
    pub avenant_title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_subcontractor_rows: 2,
            logo_placeholder: "LOGO".to_string(),
            situation_title: "SITUATION DE TRAVAUX".to_string(),
            avenant_title: "AVENANT AU MARCHÉ".to_string(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rates: RateConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Parse and validate a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns `BtpError::Serialization` for malformed YAML and
    /// `BtpError::Config` for rejected rates.
    pub fn from_yaml_str(s: &str) -> Result<Self, BtpError> {
        let config: Config = serde_yaml::from_str(s)?;
        config.rates.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, BtpError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

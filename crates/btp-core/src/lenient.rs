//! # Fail-Soft Field Decoding
//!
//! Snapshots arrive from a hosted backend whose columns are loosely typed:
//! amounts may be numbers, numeric strings, `null` or missing altogether,
//! booleans may be `"true"` or `1`. A certificate must still render in that
//! case, so the decoders in this module coalesce instead of failing.
//!
//! ## Coercion Rules
//!
//! | Input                         | `Montant` | optional rate | flag    |
//! |-------------------------------|-----------|---------------|---------|
//! | missing / `null`              | 0         | `None`        | `false` |
//! | finite number                 | value     | `Some(value)` | `!= 0`  |
//! | numeric string (`"1 234,5"`)  | parsed    | `Some(parsed)`| n/a     |
//! | unparseable string            | 0 (warn)  | `None` (warn) | `false` |
//! | bool / array / object         | 0 (warn)  | `None` (warn) | bool    |
//!
//! Non-finite results (`NaN`, `inf`) always coalesce to zero / `None`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A monetary amount in euros, excluding or including tax depending on the
/// field it sits in.
///
/// Always finite. Deserialization never fails: anything that is not a
/// usable number becomes zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Montant(f64);

impl Montant {
    /// The zero amount.
    pub const ZERO: Montant = Montant(0.0);

    /// Create an amount, coalescing non-finite values to zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    /// The amount as a raw float, at full precision.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Montant {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Montant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(Self(value.as_ref().map(coerce_amount).unwrap_or(0.0)))
    }
}

/// Coerce an arbitrary JSON value into a finite amount, zero on failure.
pub fn coerce_amount(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_amount(s).unwrap_or_else(|| {
            if !s.trim().is_empty() {
                tracing::warn!(raw = %s, "unparseable amount, treating as zero");
            }
            0.0
        }),
        other => {
            tracing::warn!(raw = %other, "non-numeric amount, treating as zero");
            0.0
        }
    }
}

/// Parse a numeric string as written by a person or a spreadsheet export.
///
/// Spaces (including the no-break variants used as French thousands
/// separators) are removed and a decimal comma is accepted. Returns `None`
/// for empty or unparseable input and for non-finite results.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Deserialize an optional rate (e.g. a VAT percentage).
///
/// Missing, `null`, negative and unusable values all yield `None` so the
/// caller can fall back to a configured default.
pub fn de_opt_rate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let rate = match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => {
            let parsed = parse_amount(&s);
            if parsed.is_none() && !s.trim().is_empty() {
                tracing::warn!(raw = %s, "unparseable rate, using default");
            }
            parsed
        }
        Some(other) => {
            tracing::warn!(raw = %other, "non-numeric rate, using default");
            None
        }
    };
    Ok(rate.filter(|&v| {
        if v < 0.0 {
            tracing::warn!(rate = v, "negative rate, using default");
        }
        v >= 0.0
    }))
}

/// Deserialize a flag stored as a bool, a number or a string.
pub fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "oui" | "yes"
        ),
        Some(other) => {
            tracing::warn!(raw = %other, "unrecognised flag value, treating as false");
            false
        }
    })
}

/// Deserialize an optional sequence number stored as a number or a string.
pub fn de_opt_numero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

/// Deserialize optional display text, stringifying numbers (SIRET and
/// phone columns are sometimes stored numerically).
pub fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Deserialize display text where `null` or a missing value means empty.
pub fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(de_opt_text(deserializer)?.unwrap_or_default())
}

/// Deserialize a list where `null` means empty.
pub fn de_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

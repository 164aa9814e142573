//! # Document Dates
//!
//! Defines `DateDocument`, the calendar date printed on certificates and
//! amendments.
//!
//! Backends store these columns either as a plain date (`2024-03-31`) or as
//! a full RFC 3339 timestamp (`2024-03-31T00:00:00+02:00`). Both are
//! accepted; a timestamp keeps the calendar date of its own offset, so a
//! midnight timestamp in Paris never slides back to the previous day. The
//! French form `31/03/2024` is accepted as well.
//!
//! Display always uses the French day/month/year form `31/03/2024`.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::BtpError;

/// A calendar date without time or timezone.
///
/// Serializes as ISO 8601 (`YYYY-MM-DD`). Displays as `DD/MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DateDocument(NaiveDate);

impl DateDocument {
    /// Build from year, month and day. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse an ISO date, an RFC 3339 timestamp, or a French `DD/MM/YYYY`.
    ///
    /// # Errors
    ///
    /// Returns `BtpError::Input` if none of the accepted forms match.
    pub fn parse(s: &str) -> Result<Self, BtpError> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.date_naive()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
            return Ok(Self(date));
        }
        Err(BtpError::Input(format!("unrecognised date {s:?}")))
    }

    /// Render as `DD/MM/YYYY`.
    pub fn to_french(&self) -> String {
        self.0.format("%d/%m/%Y").to_string()
    }
}

impl std::fmt::Display for DateDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_french())
    }
}

impl<'de> Deserialize<'de> for DateDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Deserialize an optional document date, dropping unparseable values.
pub fn de_opt_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateDocument>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => match DateDocument::parse(&s) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!(error = %e, "dropping unparseable date");
                None
            }
        },
        _ => None,
    })
}

//! # French Display Formatting
//!
//! Display rules shared by every document. Documents are compared against
//! a paper form, so these outputs are part of the document contract:
//!
//! | Kind              | Example            |
//! |-------------------|--------------------|
//! | amount            | `1 234 567,89`     |
//! | final amount      | `10 890,00 €`      |
//! | rate              | `5.0%`             |
//! | advancement       | `30.00%`           |
//! | date              | `31/03/2024`       |
//!
//! Amounts group thousands with U+202F (narrow no-break space), the fr-FR
//! group separator, and use a decimal comma. Rates and advancement keep a
//! decimal point. Rounding to two decimals happens here and only here.

use crate::temporal::DateDocument;

/// Thousands separator for amounts (narrow no-break space).
pub const SEPARATEUR_MILLIERS: char = '\u{202f}';

/// Suffix appended to final payable amounts.
pub const SUFFIXE_EURO: &str = " €";

/// Format an amount with grouped thousands, a decimal comma and exactly two
/// decimals.
///
/// Non-finite values print as zero. Values that round to zero never carry a
/// minus sign.
pub fn format_montant(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.2}", value.abs());
    let (entier, decimales) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negatif = value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));

    let mut out = String::with_capacity(fixed.len() + entier.len() / 3 * 3 + 1);
    if negatif {
        out.push('-');
    }
    let len = entier.len();
    for (i, c) in entier.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(SEPARATEUR_MILLIERS);
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(decimales);
    out
}

/// Format a final payable amount: [`format_montant`] followed by ` €`.
pub fn format_montant_euro(value: f64) -> String {
    let mut out = format_montant(value);
    out.push_str(SUFFIXE_EURO);
    out
}

/// Format a fractional rate (`0.05`) as a percentage with one decimal
/// (`5.0%`).
pub fn format_taux(fraction: f64) -> String {
    let pct = if fraction.is_finite() { fraction * 100.0 } else { 0.0 };
    format!("{pct:.1}%")
}

/// Format a percentage value (`30.0`) with two decimals (`30.00%`).
pub fn format_pourcentage(pct: f64) -> String {
    let pct = if pct.is_finite() { pct } else { 0.0 };
    format!("{pct:.2}%")
}

/// Format an optional date as `DD/MM/YYYY`, empty when absent.
pub fn format_date(date: Option<&DateDocument>) -> String {
    date.map(DateDocument::to_french).unwrap_or_default()
}

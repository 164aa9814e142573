//! # Three-Column Figures
//!
//! Every line of a certificate's works statement carries three figures:
//! cumulative since the start of the contract, the part already certified
//! by earlier certificates, and the part certified this month.

use serde::Serialize;

/// One figure per statement column.
///
/// Field order is the printed column order: cumulative, precedent, month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Colonnes {
    /// Cumulative since the start of the contract.
    pub cumule: f64,
    /// Already certified by earlier certificates.
    pub precedent: f64,
    /// Certified this month.
    pub mois: f64,
}

impl Colonnes {
    /// Build from the three figures in printed order.
    pub fn new(cumule: f64, precedent: f64, mois: f64) -> Self {
        Self {
            cumule,
            precedent,
            mois,
        }
    }

    /// Apply `f` to each column independently.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            cumule: f(self.cumule),
            precedent: f(self.precedent),
            mois: f(self.mois),
        }
    }

    /// Combine two column sets column by column.
    pub fn zip_with(self, other: Colonnes, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            cumule: f(self.cumule, other.cumule),
            precedent: f(self.precedent, other.precedent),
            mois: f(self.mois, other.mois),
        }
    }

    /// The figures in printed order.
    pub fn as_array(&self) -> [f64; 3] {
        [self.cumule, self.precedent, self.mois]
    }
}

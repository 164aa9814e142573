//! # btp-situation: Certificate and Amendment Calculator
//!
//! Pure arithmetic over the snapshots defined in `btp-core`. No I/O, no
//! state kept between calls: the same input and rates always give the same
//! figures, bit for bit.
//!
//! ## Architecture
//!
//! - **Décompte** (`decompte.rs`): the payment-certificate statement. HT,
//!   retained guarantee (base and amendment portions), provision, VAT and
//!   TTC for the cumulative, precedent and month columns, advancement, and
//!   the net payable after penalties.
//!
//! - **Pénalités** (`penalites.rs`): one row per job-site catalogue entry,
//!   matched against applied penalties by type.
//!
//! - **Avenant** (`avenant.rs`): contract amounts before and after an
//!   amendment, variation against the base contract, and VAT.
//!
//! - **Colonnes** (`colonnes.rs`): the three-column figure used by every
//!   statement line.
//!
//! Figures keep full `f64` precision. Rounding to the cent is a display
//! concern handled by `btp_core::format`.

pub mod avenant;
pub mod colonnes;
pub mod decompte;
pub mod penalites;

pub use avenant::{compute_avenant, DecompteAvenant};
pub use colonnes::Colonnes;
pub use decompte::{compute, resolve_taux_tva, Decompte};
pub use penalites::LignePenalite;

//! # btp-core: Foundational Types for Payment Certificates
//!
//! This crate defines the read-only snapshots consumed by the certificate
//! calculator and document renderer, plus the shared rules both depend on.
//! Every other crate in the workspace depends on `btp-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Fail-soft amounts.** Monetary fields are `Montant`, whose deserializer
//!    coalesces missing, `null`, or non-numeric values to zero instead of
//!    rejecting the whole record. A reporting document must still print when
//!    one field upstream is malformed.
//!
//! 2. **Explicit rates.** VAT default, retention rate, provision rate and the
//!    zero-contract fallback live in `RateConfig`. Nothing downstream
//!    hardcodes them.
//!
//! 3. **One formatting module.** Currency, percentage and date display rules
//!    are defined once in `format` so every document renders figures
//!    identically.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `btp-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod format;
pub mod lenient;
pub mod model;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use config::{Config, PenaltyMatch, RateConfig, RenderConfig};
pub use error::{BtpError, ConfigError};
pub use lenient::Montant;
pub use model::{
    Avenant, AvenantInput, Chantier, InfosEntreprise, Marche, PaiementSousTraitant, Partenaire,
    Partie, Payload, PenaliteAppliquee, Situation, SituationInput, SituationPrecedente, TypePenalite,
};
pub use temporal::DateDocument;

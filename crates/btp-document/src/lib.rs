//! # btp-document: Fixed-Layout Certificate Documents
//!
//! Turns computed figures into printable documents in two stages:
//!
//! 1. **Build** (`situation.rs`, `avenant.rs`): map the snapshot and figures
//!    onto a typed [`Document`] tree with frozen section, column and row
//!    order.
//! 2. **Serialize** (`html.rs`): write the tree as one self-contained HTML
//!    page for the print/export collaborator.
//!
//! [`render_situation`] and [`render_avenant`] chain calculation, building,
//! serialization and digest in one call.
//!
//! ## Crate Policy
//!
//! - Rendering never fails: absent fields print as empty strings and
//!   absent logos as a text badge.
//! - No I/O.

pub mod avenant;
pub mod digest;
pub mod html;
pub mod situation;
pub mod tree;

pub use avenant::build_avenant;
pub use digest::DocumentDigest;
pub use situation::build_situation;
pub use tree::{Document, Section, Valeur};

use serde::Serialize;

use btp_core::{AvenantInput, Config, SituationInput};
use btp_situation::{Decompte, DecompteAvenant};

/// A rendered document with the figures it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument<F> {
    pub figures: F,
    pub document: Document,
    pub html: String,
    pub digest: DocumentDigest,
}

impl<F> RenderedDocument<F> {
    fn new(figures: F, document: Document) -> Self {
        let html = html::to_html(&document);
        let digest = DocumentDigest::of(&html);
        tracing::debug!(titre = %document.titre, %digest, bytes = html.len(), "document rendered");
        Self {
            figures,
            document,
            html,
            digest,
        }
    }
}

/// Compute, build and serialize a payment certificate.
pub fn render_situation(input: &SituationInput, config: &Config) -> RenderedDocument<Decompte> {
    let decompte = btp_situation::compute(input, &config.rates);
    let document = build_situation(input, &decompte, &config.render);
    RenderedDocument::new(decompte, document)
}

/// Compute, build and serialize an amendment document.
pub fn render_avenant(input: &AvenantInput, config: &Config) -> RenderedDocument<DecompteAvenant> {
    let decompte = btp_situation::compute_avenant(input, &config.rates);
    let document = build_avenant(input, &decompte, &config.render);
    RenderedDocument::new(decompte, document)
}

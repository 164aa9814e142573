//! # Input Snapshots
//!
//! Read-only records handed to the calculator and renderer for one render
//! call. They are assembled by the data-access layer; this crate only
//! defines their shape and how they are decoded.
//!
//! Field names follow the backend columns (`montant_ht`, `a_caution`, ...)
//! so a row fetched from the backend deserializes without renaming.
//!
//! Every field except the certificate itself is optional. Monetary fields
//! use [`Montant`] and decode fail-soft; see [`crate::lenient`].

use serde::{Deserialize, Serialize};

use crate::error::BtpError;
use crate::lenient::{
    de_flag, de_list, de_opt_numero, de_opt_rate, de_opt_text, de_text, Montant,
};
use crate::temporal::{de_opt_date, DateDocument};

// ─── Parties ─────────────────────────────────────────────────────────

/// A client (maître d'ouvrage) or a contractor company (entreprise).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partie {
    /// Legal name.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub nom: Option<String>,
    /// Postal address, possibly multi-line.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub adresse: Option<String>,
    /// SIRET registration number.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub siret: Option<String>,
    /// Phone number.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub telephone: Option<String>,
    /// Contact email.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub email: Option<String>,
}

/// Details of the company issuing the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfosEntreprise {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub nom: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub adresse: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub siret: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub telephone: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub email: Option<String>,
    /// URL of the issuer's logo.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub logo_url: Option<String>,
}

// ─── Job site ────────────────────────────────────────────────────────

/// A partner on the job site (architect, engineering office, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partenaire {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub nom: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub role: Option<String>,
}

/// An entry of the job site's penalty catalogue.
///
/// `type_penalite` is free text entered on the job site; applied penalties
/// reference it by the same string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypePenalite {
    #[serde(default, deserialize_with = "de_text")]
    pub type_penalite: String,
    /// Optional human-readable description, printed instead of the type
    /// when present.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub description: Option<String>,
}

impl TypePenalite {
    /// Label printed on the penalty row.
    pub fn libelle(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => &self.type_penalite,
        }
    }
}

/// The job site (chantier) a certificate belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chantier {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub nom: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub adresse: Option<String>,
    /// URL of the client's logo shown on documents for this job site.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub logo_client_url: Option<String>,
    #[serde(default, deserialize_with = "de_list")]
    pub partenaires: Vec<Partenaire>,
    /// Penalty catalogue. Penalty rows are printed in this order.
    #[serde(default, deserialize_with = "de_list")]
    pub penalites: Vec<TypePenalite>,
}

// ─── Contract ────────────────────────────────────────────────────────

/// The works contract (marché) for one lot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marche {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub numero_marche: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub numero_lot: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub objet: Option<String>,
    /// Base contract amount, excluding tax.
    #[serde(default)]
    pub montant: Montant,
    /// A bank guarantee (caution) replaces the retained guarantee.
    #[serde(default, deserialize_with = "de_flag")]
    pub a_caution: bool,
    /// VAT rate in percent, when the contract fixes one.
    #[serde(default, deserialize_with = "de_opt_rate")]
    pub taux_tva: Option<f64>,
}

/// A signed amendment (avenant) adding to the contract value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Avenant {
    #[serde(default, deserialize_with = "de_opt_numero")]
    pub numero: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub objet: Option<String>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub date_avenant: Option<DateDocument>,
    #[serde(default)]
    pub montant_total_ht: Montant,
}

// ─── Certificates ────────────────────────────────────────────────────

/// The payment certificate (situation de travaux) being rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    /// Sequence number, unique per company.
    #[serde(default, deserialize_with = "de_opt_numero")]
    pub numero: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub date_situation: Option<DateDocument>,
    /// Works certified this month, excluding tax.
    #[serde(default)]
    pub montant_ht: Montant,
}

/// A certificate of an earlier period on the same contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SituationPrecedente {
    #[serde(default, deserialize_with = "de_opt_numero")]
    pub numero: Option<u32>,
    #[serde(default)]
    pub montant_ht: Montant,
}

/// A penalty applied on the certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PenaliteAppliquee {
    /// References `TypePenalite::type_penalite` of the job site catalogue.
    #[serde(default, deserialize_with = "de_text")]
    pub type_penalite: String,
    #[serde(default)]
    pub montant_calcule: Montant,
}

/// A direct payment to a subcontractor, listed for information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaiementSousTraitant {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub sous_traitant: Option<String>,
    #[serde(default)]
    pub montant_ht: Montant,
}

// ─── Aggregates ──────────────────────────────────────────────────────

/// Everything needed to compute and render one payment certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SituationInput {
    /// The certificate being rendered. The only mandatory entry.
    pub situation: Situation,
    #[serde(default)]
    pub chantier: Option<Chantier>,
    #[serde(default)]
    pub client: Option<Partie>,
    #[serde(default)]
    pub entreprise: Option<Partie>,
    #[serde(default)]
    pub marche: Option<Marche>,
    #[serde(default, deserialize_with = "de_list")]
    pub situations_precedentes: Vec<SituationPrecedente>,
    #[serde(default, deserialize_with = "de_list")]
    pub avenants: Vec<Avenant>,
    #[serde(default, deserialize_with = "de_list")]
    pub paiements_sous_traitants: Vec<PaiementSousTraitant>,
    #[serde(default, deserialize_with = "de_list")]
    pub penalites: Vec<PenaliteAppliquee>,
    #[serde(default)]
    pub infos_entreprise: Option<InfosEntreprise>,
    /// VAT rate in percent. Overrides the contract's rate.
    #[serde(default, deserialize_with = "de_opt_rate")]
    pub taux_tva: Option<f64>,
}

/// Everything needed to compute and render one amendment document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvenantInput {
    /// The amendment being rendered.
    pub avenant: Avenant,
    #[serde(default)]
    pub marche: Option<Marche>,
    /// Amendments signed before this one on the same contract.
    #[serde(default, deserialize_with = "de_list")]
    pub avenants_precedents: Vec<Avenant>,
    #[serde(default)]
    pub chantier: Option<Chantier>,
    #[serde(default)]
    pub client: Option<Partie>,
    #[serde(default)]
    pub entreprise: Option<Partie>,
    #[serde(default)]
    pub infos_entreprise: Option<InfosEntreprise>,
    #[serde(default, deserialize_with = "de_opt_rate")]
    pub taux_tva: Option<f64>,
}

/// A snapshot that can be decoded from a JSON or YAML document.
pub trait Payload: Sized {
    fn from_json(s: &str) -> Result<Self, BtpError>;
    fn from_yaml(s: &str) -> Result<Self, BtpError>;
}

macro_rules! impl_payload {
    ($ty:ty, $what:literal) => {
        impl $ty {
            /// Decode from JSON.
            ///
            /// # Errors
            ///
            /// Returns `BtpError::Input` when the payload is not valid JSON or
            /// lacks the mandatory record.
            pub fn from_json(s: &str) -> Result<Self, BtpError> {
                serde_json::from_str(s)
                    .map_err(|e| BtpError::Input(format!("invalid {} payload: {e}", $what)))
            }

            /// Decode from YAML.
            ///
            /// # Errors
            ///
            /// Returns `BtpError::Input` when the payload is not valid YAML or
            /// lacks the mandatory record.
            pub fn from_yaml(s: &str) -> Result<Self, BtpError> {
                serde_yaml::from_str(s)
                    .map_err(|e| BtpError::Input(format!("invalid {} payload: {e}", $what)))
            }
        }

        impl Payload for $ty {
            fn from_json(s: &str) -> Result<Self, BtpError> {
                <$ty>::from_json(s)
            }

            fn from_yaml(s: &str) -> Result<Self, BtpError> {
                <$ty>::from_yaml(s)
            }
        }
    };
}

impl_payload!(SituationInput, "certificate");
impl_payload!(AvenantInput, "amendment");

//! # Document Tree
//!
//! Intermediate representation between computed figures and markup. The
//! builders (`situation.rs`, `avenant.rs`) decide what goes where; the HTML
//! serializer (`html.rs`) decides how it looks. Values stay typed until
//! serialization, so the tree can be inspected and tested without parsing
//! markup.

use serde::Serialize;

use btp_core::format::{format_montant, format_montant_euro, format_pourcentage, format_taux};

/// A printed value. Formatting happens at serialization time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "valeur", rename_all = "snake_case")]
pub enum Valeur {
    /// Free text, printed as is (escaped).
    Texte(String),
    /// Amount without currency symbol.
    Montant(f64),
    /// Final payable amount, with ` €`.
    MontantEuro(f64),
    /// Fractional rate printed with one decimal (`0.05` → `5.0%`).
    Taux(f64),
    /// Percentage printed with two decimals (`30.0` → `30.00%`).
    Pourcentage(f64),
}

impl Valeur {
    /// Text from an optional field; absent becomes empty.
    pub fn texte(value: Option<&str>) -> Self {
        Self::Texte(value.unwrap_or_default().to_string())
    }

    /// The display string of this value.
    pub fn afficher(&self) -> String {
        match self {
            Self::Texte(s) => s.clone(),
            Self::Montant(v) => format_montant(*v),
            Self::MontantEuro(v) => format_montant_euro(*v),
            Self::Taux(v) => format_taux(*v),
            Self::Pourcentage(v) => format_pourcentage(*v),
        }
    }

    /// Whether the value is numeric (right-aligned when printed).
    pub fn est_numerique(&self) -> bool {
        !matches!(self, Self::Texte(_))
    }
}

/// A label/value pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Champ {
    pub libelle: String,
    pub valeur: Valeur,
}

impl Champ {
    pub fn new(libelle: impl Into<String>, valeur: Valeur) -> Self {
        Self {
            libelle: libelle.into(),
            valeur,
        }
    }

    /// A text field from an optional value.
    pub fn texte(libelle: impl Into<String>, valeur: Option<&str>) -> Self {
        Self::new(libelle, Valeur::texte(valeur))
    }
}

/// A logo slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Logo {
    /// Remote image reference.
    Image { url: String },
    /// Textual badge shown when no logo is available.
    Substitut { texte: String },
}

impl Logo {
    /// An image when `url` is present and non-blank, otherwise the badge.
    pub fn depuis(url: Option<&str>, substitut: &str) -> Self {
        match url.map(str::trim) {
            Some(u) if !u.is_empty() => Self::Image { url: u.to_string() },
            _ => Self::Substitut {
                texte: substitut.to_string(),
            },
        }
    }
}

/// Document header: logos, issuer, title and reference fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnTete {
    pub logo_emetteur: Logo,
    pub emetteur: Vec<Champ>,
    pub titre: String,
    pub reference: Vec<Champ>,
    pub logo_client: Logo,
}

/// A titled group of fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bloc {
    pub titre: String,
    pub champs: Vec<Champ>,
}

/// Visual weight of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleLigne {
    Normal,
    /// Amount withheld from the row above.
    Deduction,
    SousTotal,
    Total,
}

impl StyleLigne {
    /// CSS class of the row.
    pub fn classe(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Deduction => "deduction",
            Self::SousTotal => "sous-total",
            Self::Total => "total",
        }
    }
}

/// One table row: a label and one value per value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ligne {
    pub libelle: String,
    pub valeurs: Vec<Valeur>,
    pub style: StyleLigne,
}

impl Ligne {
    pub fn new(libelle: impl Into<String>, valeurs: Vec<Valeur>, style: StyleLigne) -> Self {
        Self {
            libelle: libelle.into(),
            valeurs,
            style,
        }
    }
}

/// A titled table. `entetes` includes the label column header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tableau {
    pub titre: String,
    pub entetes: Vec<String>,
    pub lignes: Vec<Ligne>,
    /// Note printed under the table.
    pub remarque: Option<String>,
}

/// A top-level section, in printed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Section {
    EnTete(EnTete),
    Blocs { blocs: Vec<Bloc> },
    Tableau(Tableau),
    Signatures { roles: Vec<String> },
}

/// A complete document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Title used for the page `<title>`.
    pub titre: String,
    pub sections: Vec<Section>,
}

impl Document {
    /// The table with the given title, if any.
    pub fn tableau(&self, titre: &str) -> Option<&Tableau> {
        self.sections.iter().find_map(|s| match s {
            Section::Tableau(t) if t.titre == titre => Some(t),
            _ => None,
        })
    }
}

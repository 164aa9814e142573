//! # Amendment Layout
//!
//! ```text
//! EN-TÊTE      issuer, title, amendment number/date, client logo
//! PARTIES      maître d'ouvrage | entreprise
//! CHANTIER     job site | contract and amendment subject
//! MONTANTS     contract before, amendment, contract after, variations
//! TVA          Présent avenant | Nouveau montant
//! SIGNATURES
//! ```

use btp_core::format::format_date;
use btp_core::{AvenantInput, RenderConfig};
use btp_situation::DecompteAvenant;

use crate::situation::{bloc_chantier, bloc_emetteur, bloc_partie};
use crate::tree::{Bloc, Champ, Document, EnTete, Ligne, Logo, Section, StyleLigne, Tableau, Valeur};

pub const TITRE_MONTANTS: &str = "MONTANTS DU MARCHÉ";
pub const TITRE_TVA: &str = "INCIDENCE TTC";

/// Build the amendment document tree.
pub fn build_avenant(input: &AvenantInput, d: &DecompteAvenant, render: &RenderConfig) -> Document {
    let numero = input.avenant.numero.map(|n| n.to_string());
    let titre = match &numero {
        Some(n) => format!("{} N° {n}", render.avenant_title),
        None => render.avenant_title.clone(),
    };
    let marche = input.marche.as_ref();

    let en_tete = EnTete {
        logo_emetteur: Logo::depuis(
            input.infos_entreprise.as_ref().and_then(|i| i.logo_url.as_deref()),
            &render.logo_placeholder,
        ),
        emetteur: bloc_emetteur(input.infos_entreprise.as_ref()),
        titre: render.avenant_title.clone(),
        reference: vec![
            Champ::texte("Avenant n°", numero.as_deref()),
            Champ::texte(
                "Date",
                Some(&format_date(input.avenant.date_avenant.as_ref())),
            ),
        ],
        logo_client: Logo::depuis(
            input.chantier.as_ref().and_then(|c| c.logo_client_url.as_deref()),
            &render.logo_placeholder,
        ),
    };

    let bloc_marche = Bloc {
        titre: "Marché".to_string(),
        champs: vec![
            Champ::texte("N° de marché", marche.and_then(|m| m.numero_marche.as_deref())),
            Champ::texte("N° de lot", marche.and_then(|m| m.numero_lot.as_deref())),
            Champ::texte("Objet du marché", marche.and_then(|m| m.objet.as_deref())),
            Champ::texte("Objet de l'avenant", input.avenant.objet.as_deref()),
        ],
    };

    let montants = Tableau {
        titre: TITRE_MONTANTS.to_string(),
        entetes: vec!["Désignation".to_string(), "Montant HT".to_string()],
        lignes: vec![
            Ligne::new(
                "Montant initial du marché",
                vec![Valeur::Montant(d.montant_marche_base)],
                StyleLigne::Normal,
            ),
            Ligne::new(
                "Avenants précédents",
                vec![Valeur::Montant(d.avenants_precedents)],
                StyleLigne::Normal,
            ),
            Ligne::new(
                "Montant avant le présent avenant",
                vec![Valeur::Montant(d.montant_avant)],
                StyleLigne::SousTotal,
            ),
            Ligne::new(
                "Montant du présent avenant",
                vec![Valeur::Montant(d.montant_avenant)],
                StyleLigne::Normal,
            ),
            Ligne::new(
                "Nouveau montant du marché",
                vec![Valeur::Montant(d.montant_apres)],
                StyleLigne::Total,
            ),
            Ligne::new(
                "Variation du présent avenant",
                vec![Valeur::Pourcentage(d.variation)],
                StyleLigne::Normal,
            ),
            Ligne::new(
                "Variation cumulée des avenants",
                vec![Valeur::Pourcentage(d.variation_cumulee)],
                StyleLigne::Normal,
            ),
        ],
        remarque: None,
    };

    let tva = Tableau {
        titre: TITRE_TVA.to_string(),
        entetes: vec![
            String::new(),
            "Présent avenant".to_string(),
            "Nouveau montant".to_string(),
        ],
        lignes: vec![
            Ligne::new(
                "Montant HT",
                vec![Valeur::Montant(d.montant_avenant), Valeur::Montant(d.montant_apres)],
                StyleLigne::Normal,
            ),
            Ligne::new(
                format!("TVA ({})", btp_core::format::format_taux(d.taux_tva / 100.0)),
                vec![Valeur::Montant(d.tva_avenant), Valeur::Montant(d.tva_apres)],
                StyleLigne::Normal,
            ),
            Ligne::new(
                "Montant TTC",
                vec![Valeur::MontantEuro(d.ttc_avenant), Valeur::MontantEuro(d.ttc_apres)],
                StyleLigne::Total,
            ),
        ],
        remarque: None,
    };

    Document {
        titre,
        sections: vec![
            Section::EnTete(en_tete),
            Section::Blocs {
                blocs: vec![
                    bloc_partie("Maître d'ouvrage", input.client.as_ref()),
                    bloc_partie("Entreprise", input.entreprise.as_ref()),
                ],
            },
            Section::Blocs {
                blocs: vec![bloc_chantier(input.chantier.as_ref()), bloc_marche],
            },
            Section::Tableau(montants),
            Section::Tableau(tva),
            Section::Signatures {
                roles: vec!["L'Entreprise".to_string(), "Le Maître d'ouvrage".to_string()],
            },
        ],
    }
}

//! # Payment-Certificate Layout
//!
//! Maps a certificate snapshot and its computed statement onto the fixed
//! paper layout:
//!
//! ```text
//! EN-TÊTE        issuer, title, number/date, client logo
//! PARTIES        maître d'ouvrage | entreprise
//! CHANTIER       job site + partners | contract figures
//! TRAVAUX        Cumulé | Précédent | Mois
//! PÉNALITÉS      one row per catalogue entry, then total
//! SOUS-TRAITANTS direct payments (capped), then total
//! NET À PAYER    month TTC, penalties, net payable (with €)
//! SIGNATURES
//! ```
//!
//! Section order, column order and row order are part of the document
//! contract and must not change.

use btp_core::{Chantier, InfosEntreprise, Marche, Partie, RenderConfig, SituationInput};
use btp_situation::{Colonnes, Decompte};

use crate::tree::{Bloc, Champ, Document, EnTete, Ligne, Logo, Section, StyleLigne, Tableau, Valeur};

pub const TITRE_TRAVAUX: &str = "TRAVAUX";
pub const TITRE_PENALITES: &str = "PÉNALITÉS";
pub const TITRE_SOUS_TRAITANTS: &str = "PAIEMENTS DIRECTS AUX SOUS-TRAITANTS";
pub const TITRE_NET: &str = "NET À PAYER";

/// Column headers of the works table, in printed order.
pub const COLONNES_TRAVAUX: [&str; 3] = ["Cumulé", "Précédent", "Mois"];

/// Build the payment-certificate document tree.
pub fn build_situation(
    input: &SituationInput,
    decompte: &Decompte,
    render: &RenderConfig,
) -> Document {
    let numero = input.situation.numero.map(|n| n.to_string());
    let titre = match &numero {
        Some(n) => format!("{} N° {n}", render.situation_title),
        None => render.situation_title.clone(),
    };

    let en_tete = EnTete {
        logo_emetteur: Logo::depuis(
            input.infos_entreprise.as_ref().and_then(|i| i.logo_url.as_deref()),
            &render.logo_placeholder,
        ),
        emetteur: bloc_emetteur(input.infos_entreprise.as_ref()),
        titre: render.situation_title.clone(),
        reference: vec![
            Champ::texte("Situation n°", numero.as_deref()),
            Champ::texte(
                "Date",
                Some(&btp_core::format::format_date(
                    input.situation.date_situation.as_ref(),
                )),
            ),
        ],
        logo_client: Logo::depuis(
            input.chantier.as_ref().and_then(|c| c.logo_client_url.as_deref()),
            &render.logo_placeholder,
        ),
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
                blocs: vec![
                    bloc_chantier(input.chantier.as_ref()),
                    bloc_marche(input.marche.as_ref(), decompte),
                ],
            },
            Section::Tableau(tableau_travaux(decompte)),
            Section::Tableau(tableau_penalites(decompte)),
            Section::Tableau(tableau_sous_traitants(input, decompte, render)),
            Section::Tableau(tableau_net(decompte)),
            Section::Signatures {
                roles: vec![
                    "L'Entreprise".to_string(),
                    "Le Maître d'œuvre".to_string(),
                    "Le Maître d'ouvrage".to_string(),
                ],
            },
        ],
    }
}

pub(crate) fn bloc_emetteur(infos: Option<&InfosEntreprise>) -> Vec<Champ> {
    let infos = infos.cloned().unwrap_or_default();
    vec![
        Champ::texte("Nom", infos.nom.as_deref()),
        Champ::texte("Adresse", infos.adresse.as_deref()),
        Champ::texte("SIRET", infos.siret.as_deref()),
        Champ::texte("Téléphone", infos.telephone.as_deref()),
        Champ::texte("Email", infos.email.as_deref()),
    ]
}

pub(crate) fn bloc_partie(titre: &str, partie: Option<&Partie>) -> Bloc {
    let partie = partie.cloned().unwrap_or_default();
    Bloc {
        titre: titre.to_string(),
        champs: vec![
            Champ::texte("Nom", partie.nom.as_deref()),
            Champ::texte("Adresse", partie.adresse.as_deref()),
            Champ::texte("SIRET", partie.siret.as_deref()),
            Champ::texte("Téléphone", partie.telephone.as_deref()),
        ],
    }
}

pub(crate) fn bloc_chantier(chantier: Option<&Chantier>) -> Bloc {
    let mut champs = vec![
        Champ::texte("Chantier", chantier.and_then(|c| c.nom.as_deref())),
        Champ::texte("Adresse", chantier.and_then(|c| c.adresse.as_deref())),
    ];
    for p in chantier.map(|c| c.partenaires.as_slice()).unwrap_or(&[]) {
        let role = p.role.as_deref().filter(|r| !r.trim().is_empty());
        champs.push(Champ::texte(role.unwrap_or("Partenaire"), p.nom.as_deref()));
    }
    Bloc {
        titre: "Chantier".to_string(),
        champs,
    }
}

fn bloc_marche(marche: Option<&Marche>, d: &Decompte) -> Bloc {
    let retenue = if marche.is_some_and(|m| m.a_caution) {
        Valeur::Texte("Caution bancaire".to_string())
    } else {
        Valeur::Taux(d.taux_retenue)
    };
    Bloc {
        titre: "Marché".to_string(),
        champs: vec![
            Champ::texte("N° de marché", marche.and_then(|m| m.numero_marche.as_deref())),
            Champ::texte("N° de lot", marche.and_then(|m| m.numero_lot.as_deref())),
            Champ::new("Montant initial HT", Valeur::Montant(d.montant_marche_base)),
            Champ::new("Montant des avenants HT", Valeur::Montant(d.total_avenants)),
            Champ::new(
                "Montant total HT",
                Valeur::Montant(d.montant_marche_avec_avenants),
            ),
            Champ::new("Avancement", Valeur::Pourcentage(d.avancement)),
            Champ::new("Retenue de garantie", retenue),
        ],
    }
}

fn montants(c: Colonnes) -> Vec<Valeur> {
    c.as_array().into_iter().map(Valeur::Montant).collect()
}

fn tableau_travaux(d: &Decompte) -> Tableau {
    let taux_retenue = btp_core::format::format_taux(d.taux_retenue);
    let lignes = vec![
        Ligne::new("Montant des travaux HT", montants(d.ht), StyleLigne::Normal),
        Ligne::new(
            format!("Retenue de garantie sur marché ({taux_retenue})"),
            montants(d.retenue_marche),
            StyleLigne::Deduction,
        ),
        Ligne::new(
            format!("Retenue de garantie sur avenants ({taux_retenue})"),
            montants(d.retenue_avenants),
            StyleLigne::Deduction,
        ),
        Ligne::new(
            "Total retenue de garantie",
            montants(d.retenue),
            StyleLigne::SousTotal,
        ),
        Ligne::new(
            format!(
                "Provision ({})",
                btp_core::format::format_taux(d.taux_provision)
            ),
            montants(d.provision),
            StyleLigne::Deduction,
        ),
        Ligne::new("Total HT", montants(d.total_ht), StyleLigne::SousTotal),
        Ligne::new(
            format!("TVA ({})", btp_core::format::format_taux(d.taux_tva / 100.0)),
            montants(d.tva),
            StyleLigne::Normal,
        ),
        Ligne::new("Total TTC", montants(d.ttc), StyleLigne::Total),
    ];
    Tableau {
        titre: TITRE_TRAVAUX.to_string(),
        entetes: std::iter::once("Désignation")
            .chain(COLONNES_TRAVAUX)
            .map(String::from)
            .collect(),
        lignes,
        remarque: None,
    }
}

fn tableau_penalites(d: &Decompte) -> Tableau {
    let mut lignes: Vec<Ligne> = d
        .penalites
        .iter()
        .map(|p| {
            Ligne::new(
                p.libelle.clone(),
                vec![Valeur::Montant(p.montant)],
                StyleLigne::Normal,
            )
        })
        .collect();
    lignes.push(Ligne::new(
        "Total pénalités",
        vec![Valeur::Montant(d.total_penalites)],
        StyleLigne::SousTotal,
    ));
    Tableau {
        titre: TITRE_PENALITES.to_string(),
        entetes: vec!["Pénalité".to_string(), "Montant".to_string()],
        lignes,
        remarque: None,
    }
}

fn tableau_sous_traitants(input: &SituationInput, d: &Decompte, render: &RenderConfig) -> Tableau {
    let paiements = &input.paiements_sous_traitants;
    let mut lignes: Vec<Ligne> = paiements
        .iter()
        .take(render.max_subcontractor_rows)
        .map(|p| {
            Ligne::new(
                p.sous_traitant.clone().unwrap_or_default(),
                vec![Valeur::Montant(p.montant_ht.value())],
                StyleLigne::Normal,
            )
        })
        .collect();
    lignes.push(Ligne::new(
        "Total paiements directs HT",
        vec![Valeur::Montant(d.total_paiements_sous_traitants)],
        StyleLigne::SousTotal,
    ));
    let masques = paiements.len().saturating_sub(render.max_subcontractor_rows);
    Tableau {
        titre: TITRE_SOUS_TRAITANTS.to_string(),
        entetes: vec!["Sous-traitant".to_string(), "Montant HT".to_string()],
        lignes,
        remarque: (masques > 0)
            .then(|| format!("{masques} autre(s) paiement(s) inclus dans le total")),
    }
}

fn tableau_net(d: &Decompte) -> Tableau {
    Tableau {
        titre: TITRE_NET.to_string(),
        entetes: vec![String::new(), "Montant".to_string()],
        lignes: vec![
            Ligne::new(
                "Montant TTC du mois",
                vec![Valeur::MontantEuro(d.ttc.mois)],
                StyleLigne::Normal,
            ),
            Ligne::new(
                "Pénalités",
                vec![Valeur::MontantEuro(d.total_penalites)],
                StyleLigne::Deduction,
            ),
            Ligne::new(
                "Net à payer",
                vec![Valeur::MontantEuro(d.net_a_payer)],
                StyleLigne::Total,
            ),
        ],
        remarque: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btp_core::{
        Montant, PaiementSousTraitant, Partenaire, PenaliteAppliquee, RateConfig, Situation,
        TypePenalite,
    };

    fn input() -> SituationInput {
        SituationInput {
            situation: Situation {
                numero: Some(3),
                date_situation: btp_core::DateDocument::from_ymd(2024, 3, 31),
                montant_ht: Montant::new(10_000.0),
            },
            marche: Some(Marche {
                montant: Montant::new(100_000.0),
                ..Marche::default()
            }),
            chantier: Some(Chantier {
                nom: Some("Groupe scolaire".into()),
                partenaires: vec![
                    Partenaire {
                        nom: Some("Atelier Archi".into()),
                        role: Some("Architecte".into()),
                    },
                    Partenaire {
                        nom: Some("BET Structure".into()),
                        role: None,
                    },
                ],
                penalites: vec![
                    TypePenalite {
                        type_penalite: "Retard".into(),
                        description: None,
                    },
                    TypePenalite {
                        type_penalite: "Propreté".into(),
                        description: None,
                    },
                ],
                ..Chantier::default()
            }),
            penalites: vec![PenaliteAppliquee {
                type_penalite: "Propreté".into(),
                montant_calcule: Montant::new(75.0),
            }],
            ..SituationInput::default()
        }
    }

    fn build(input: &SituationInput) -> Document {
        let d = btp_situation::compute(input, &RateConfig::default());
        build_situation(input, &d, &RenderConfig::default())
    }

    #[test]
    fn test_section_order() {
        let doc = build(&input());
        let kinds: Vec<&str> = doc
            .sections
            .iter()
            .map(|s| match s {
                Section::EnTete(_) => "en_tete",
                Section::Blocs { .. } => "blocs",
                Section::Tableau(t) => t.titre.as_str(),
                Section::Signatures { .. } => "signatures",
            })
            .collect();
        assert_eq!(
            kinds,
            [
                "en_tete",
                "blocs",
                "blocs",
                TITRE_TRAVAUX,
                TITRE_PENALITES,
                TITRE_SOUS_TRAITANTS,
                TITRE_NET,
                "signatures"
            ]
        );
    }

    #[test]
    fn test_title_carries_number() {
        assert_eq!(build(&input()).titre, "SITUATION DE TRAVAUX N° 3");
        let mut i = input();
        i.situation.numero = None;
        assert_eq!(build(&i).titre, "SITUATION DE TRAVAUX");
    }

    #[test]
    fn test_works_table_layout() {
        let doc = build(&input());
        let t = doc.tableau(TITRE_TRAVAUX).unwrap();
        assert_eq!(t.entetes, ["Désignation", "Cumulé", "Précédent", "Mois"]);
        let labels: Vec<&str> = t.lignes.iter().map(|l| l.libelle.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Montant des travaux HT",
                "Retenue de garantie sur marché (5.0%)",
                "Retenue de garantie sur avenants (5.0%)",
                "Total retenue de garantie",
                "Provision (3.0%)",
                "Total HT",
                "TVA (20.0%)",
                "Total TTC",
            ]
        );
        assert!(t.lignes.iter().all(|l| l.valeurs.len() == 3));
    }

    #[test]
    fn test_penalty_rows_follow_catalogue() {
        let doc = build(&input());
        let t = doc.tableau(TITRE_PENALITES).unwrap();
        assert_eq!(t.lignes.len(), 3);
        assert_eq!(t.lignes[0].libelle, "Retard");
        assert_eq!(t.lignes[0].valeurs, [Valeur::Montant(0.0)]);
        assert_eq!(t.lignes[1].libelle, "Propreté");
        assert_eq!(t.lignes[1].valeurs, [Valeur::Montant(75.0)]);
        assert_eq!(t.lignes[2].libelle, "Total pénalités");
    }

    #[test]
    fn test_subcontractor_rows_capped() {
        let mut i = input();
        i.paiements_sous_traitants = (1..=4)
            .map(|n| PaiementSousTraitant {
                sous_traitant: Some(format!("ST {n}")),
                montant_ht: Montant::new(100.0),
            })
            .collect();
        let doc = build(&i);
        let t = doc.tableau(TITRE_SOUS_TRAITANTS).unwrap();
        assert_eq!(t.lignes.len(), 3);
        assert_eq!(t.lignes[2].valeurs, [Valeur::Montant(400.0)]);
        assert_eq!(
            t.remarque.as_deref(),
            Some("2 autre(s) paiement(s) inclus dans le total")
        );
    }

    #[test]
    fn test_partners_listed_under_job_site() {
        let doc = build(&input());
        let Section::Blocs { blocs } = &doc.sections[2] else {
            panic!("expected blocks");
        };
        let chantier = &blocs[0];
        assert_eq!(chantier.champs[2], Champ::texte("Architecte", Some("Atelier Archi")));
        assert_eq!(chantier.champs[3], Champ::texte("Partenaire", Some("BET Structure")));
    }

    #[test]
    fn test_bank_guarantee_shown_in_contract_block() {
        let mut i = input();
        i.marche.as_mut().unwrap().a_caution = true;
        let doc = build(&i);
        let Section::Blocs { blocs } = &doc.sections[2] else {
            panic!("expected blocks");
        };
        let retenue = blocs[1].champs.last().unwrap();
        assert_eq!(retenue.valeur, Valeur::Texte("Caution bancaire".into()));
    }

    #[test]
    fn test_missing_entities_render_empty() {
        let i = SituationInput::default();
        let doc = build(&i);
        let Section::EnTete(en_tete) = &doc.sections[0] else {
            panic!("expected header");
        };
        assert!(matches!(en_tete.logo_client, Logo::Substitut { .. }));
        assert!(en_tete.emetteur.iter().all(|c| c.valeur == Valeur::Texte(String::new())));
        assert_eq!(en_tete.reference[1].valeur, Valeur::Texte(String::new()));
    }
}

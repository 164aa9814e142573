//! # Certificate Statement (Décompte)
//!
//! Computes every figure of a payment certificate from the input snapshot.
//!
//! ## Step Order
//!
//! The steps run in a fixed order so that two runs on the same input are
//! bit-identical, and so that the figures match the paper statement:
//!
//! 1. Σ prior-certificate HT → precedent column.
//! 2. precedent + month HT → cumulative column.
//! 3. contract with amendments = base + Σ amendment HT.
//! 4. advancement = cumulative / contract × 100.
//! 5. retention rate: 0 with a bank guarantee, else the configured rate.
//! 6. month retention, base and amendment portions separately, each
//!    `amount × rate × (month HT / contract)`.
//! 7. cumulative and precedent retention, same formula.
//! 8. provision = HT × provision rate, per column.
//! 9. total HT = HT − retention − provision, per column.
//! 10. VAT = total HT × VAT rate / 100; TTC = total HT + VAT, per column.
//! 11. Σ applied penalties (outside VAT).
//! 12. net payable = month TTC − penalties.
//!
//! ## Zero Contract Total
//!
//! A fresh contract may have no signed amount yet. When the contract total
//! is exactly zero, the proportional share `ht / contract` is replaced by
//! `RateConfig::zero_contract_share` (0 by default, so no retention) and
//! the advancement is 0.

use serde::Serialize;

use btp_core::{Marche, RateConfig, SituationInput};

use crate::colonnes::Colonnes;
use crate::penalites::{hors_catalogue, lignes_penalites, LignePenalite};

/// Every computed figure of one payment certificate, at full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decompte {
    /// Base contract amount HT.
    pub montant_marche_base: f64,
    /// Σ amendment HT.
    pub total_avenants: f64,
    /// Base contract plus amendments.
    pub montant_marche_avec_avenants: f64,

    /// Works HT per column.
    pub ht: Colonnes,
    /// Cumulative works as a percentage of the contract with amendments.
    pub avancement: f64,

    /// Retention rate actually applied (0 with a bank guarantee).
    pub taux_retenue: f64,
    /// Retention on the base-contract portion.
    pub retenue_marche: Colonnes,
    /// Retention on the amendment portion.
    pub retenue_avenants: Colonnes,
    /// Total retention.
    pub retenue: Colonnes,

    pub taux_provision: f64,
    pub provision: Colonnes,

    /// HT after retention and provision.
    pub total_ht: Colonnes,
    /// VAT rate in percent.
    pub taux_tva: f64,
    pub tva: Colonnes,
    pub ttc: Colonnes,

    /// One row per job-site catalogue entry.
    pub penalites: Vec<LignePenalite>,
    /// Σ applied penalties, catalogued or not.
    pub total_penalites: f64,
    /// Σ subcontractor payments HT.
    pub total_paiements_sous_traitants: f64,
    /// Month TTC minus penalties.
    pub net_a_payer: f64,
}

/// Resolve the VAT rate: snapshot override, then contract, then default.
pub fn resolve_taux_tva(
    taux_saisi: Option<f64>,
    marche: Option<&Marche>,
    rates: &RateConfig,
) -> f64 {
    taux_saisi
        .or_else(|| marche.and_then(|m| m.taux_tva))
        .unwrap_or(rates.default_vat_rate)
}

/// `ht / contract`, or the configured fallback when the contract is zero.
pub(crate) fn prorata(ht: f64, contrat: f64, rates: &RateConfig) -> f64 {
    if contrat == 0.0 {
        rates.zero_contract_share
    } else {
        ht / contrat
    }
}

/// Compute the certificate statement.
pub fn compute(input: &SituationInput, rates: &RateConfig) -> Decompte {
    let marche = input.marche.as_ref();
    let montant_mois = input.situation.montant_ht.value();

    // 1-2
    let precedent = input
        .situations_precedentes
        .iter()
        .fold(0.0, |acc, s| acc + s.montant_ht.value());
    let cumule = precedent + montant_mois;
    let ht = Colonnes::new(cumule, precedent, montant_mois);

    // 3
    let montant_marche_base = marche.map(|m| m.montant.value()).unwrap_or(0.0);
    let total_avenants = input
        .avenants
        .iter()
        .fold(0.0, |acc, a| acc + a.montant_total_ht.value());
    let contrat = montant_marche_base + total_avenants;

    // 4
    let avancement = if contrat == 0.0 {
        tracing::debug!("contract total is zero, advancement falls back to 0");
        0.0
    } else {
        cumule / contrat * 100.0
    };

    // 5
    let a_caution = marche.is_some_and(|m| m.a_caution);
    let taux_retenue = if a_caution { 0.0 } else { rates.retention_rate };

    // 6-7
    let part = |montant: f64| ht.map(|v| montant * taux_retenue * prorata(v, contrat, rates));
    let retenue_marche = part(montant_marche_base);
    let retenue_avenants = part(total_avenants);
    let retenue = retenue_marche.zip_with(retenue_avenants, |a, b| a + b);

    // 8
    let taux_provision = rates.provision_rate;
    let provision = ht.map(|v| v * taux_provision);

    // 9
    let total_ht = Colonnes::new(
        ht.cumule - retenue.cumule - provision.cumule,
        ht.precedent - retenue.precedent - provision.precedent,
        ht.mois - retenue.mois - provision.mois,
    );

    // 10
    let taux_tva = resolve_taux_tva(input.taux_tva, marche, rates);
    let tva = total_ht.map(|v| v * taux_tva / 100.0);
    let ttc = total_ht.zip_with(tva, |h, t| h + t);

    // 11
    let catalogue = input
        .chantier
        .as_ref()
        .map(|c| c.penalites.as_slice())
        .unwrap_or(&[]);
    let penalites = lignes_penalites(catalogue, &input.penalites, rates.penalty_match);
    for orpheline in hors_catalogue(catalogue, &input.penalites, rates.penalty_match) {
        tracing::warn!(
            type_penalite = %orpheline.type_penalite,
            montant = orpheline.montant_calcule.value(),
            "applied penalty has no catalogue entry; counted in total without a row"
        );
    }
    let total_penalites = input
        .penalites
        .iter()
        .fold(0.0, |acc, p| acc + p.montant_calcule.value());

    // 12
    let net_a_payer = ttc.mois - total_penalites;

    let total_paiements_sous_traitants = input
        .paiements_sous_traitants
        .iter()
        .fold(0.0, |acc, p| acc + p.montant_ht.value());

    tracing::debug!(
        numero = ?input.situation.numero,
        cumule,
        avancement,
        net_a_payer,
        "certificate statement computed"
    );

    Decompte {
        montant_marche_base,
        total_avenants,
        montant_marche_avec_avenants: contrat,
        ht,
        avancement,
        taux_retenue,
        retenue_marche,
        retenue_avenants,
        retenue,
        taux_provision,
        provision,
        total_ht,
        taux_tva,
        tva,
        ttc,
        penalites,
        total_penalites,
        total_paiements_sous_traitants,
        net_a_payer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btp_core::{
        Avenant, Chantier, Marche, Montant, PaiementSousTraitant, PenaliteAppliquee, PenaltyMatch,
        Situation, SituationPrecedente, TypePenalite,
    };

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS * b.abs().max(1.0)
    }

    /// Base contract 100 000, one prior certificate of 20 000, 10 000 this
    /// month, no amendment, 20 % VAT.
    fn reference(a_caution: bool) -> SituationInput {
        SituationInput {
            situation: Situation {
                numero: Some(2),
                date_situation: None,
                montant_ht: Montant::new(10_000.0),
            },
            marche: Some(Marche {
                montant: Montant::new(100_000.0),
                a_caution,
                taux_tva: Some(20.0),
                ..Marche::default()
            }),
            situations_precedentes: vec![SituationPrecedente {
                numero: Some(1),
                montant_ht: Montant::new(20_000.0),
            }],
            ..SituationInput::default()
        }
    }

    #[test]
    fn test_reference_scenario() {
        let d = compute(&reference(false), &RateConfig::default());
        assert!(close(d.ht.cumule, 30_000.0));
        assert!(close(d.ht.precedent, 20_000.0));
        assert!(close(d.ht.mois, 10_000.0));
        assert!(close(d.montant_marche_avec_avenants, 100_000.0));
        assert!(close(d.avancement, 30.0));
        assert!(close(d.taux_retenue, 0.05));
        assert!(close(d.retenue.mois, 500.0));
        assert!(close(d.retenue_marche.mois, 500.0));
        assert_eq!(d.retenue_avenants.mois, 0.0);
        assert!(close(d.provision.mois, 300.0));
        assert!(close(d.total_ht.mois, 9_200.0));
        assert!(close(d.tva.mois, 1_840.0));
        assert!(close(d.ttc.mois, 11_040.0));
        assert!(close(d.net_a_payer, 11_040.0));
    }

    #[test]
    fn test_reference_cumulative_and_precedent_columns() {
        let d = compute(&reference(false), &RateConfig::default());
        assert!(close(d.retenue.cumule, 1_500.0));
        assert!(close(d.retenue.precedent, 1_000.0));
        assert!(close(d.provision.cumule, 900.0));
        assert!(close(d.provision.precedent, 600.0));
        assert!(close(d.total_ht.cumule, 27_600.0));
        assert!(close(d.total_ht.precedent, 18_400.0));
        assert!(close(d.ttc.cumule, 33_120.0));
        assert!(close(d.ttc.precedent, 22_080.0));
    }

    #[test]
    fn test_bank_guarantee_removes_retention() {
        let d = compute(&reference(true), &RateConfig::default());
        assert_eq!(d.taux_retenue, 0.0);
        for col in [d.retenue, d.retenue_marche, d.retenue_avenants] {
            assert_eq!(col.as_array(), [0.0, 0.0, 0.0]);
        }
        assert!(close(d.total_ht.mois, 9_700.0));
    }

    #[test]
    fn test_penalty_deducted_from_net() {
        let mut input = reference(false);
        input.chantier = Some(Chantier {
            penalites: vec![TypePenalite {
                type_penalite: "Retard".into(),
                description: None,
            }],
            ..Chantier::default()
        });
        input.penalites = vec![PenaliteAppliquee {
            type_penalite: "Retard".into(),
            montant_calcule: Montant::new(150.0),
        }];
        let d = compute(&input, &RateConfig::default());
        assert!(close(d.total_penalites, 150.0));
        assert!(close(d.net_a_payer, 10_890.0));
        assert_eq!(d.penalites.len(), 1);
        assert!(close(d.penalites[0].montant, 150.0));
        // Penalties stay outside VAT.
        assert!(close(d.tva.mois, 1_840.0));
    }

    #[test]
    fn test_uncatalogued_penalty_still_deducted() {
        let mut input = reference(false);
        input.penalites = vec![PenaliteAppliquee {
            type_penalite: "Inconnue".into(),
            montant_calcule: Montant::new(40.0),
        }];
        let d = compute(&input, &RateConfig::default());
        assert!(d.penalites.is_empty());
        assert!(close(d.net_a_payer, 11_000.0));
    }

    #[test]
    fn test_penalty_rows_match_deducted_total() {
        let mut input = reference(false);
        input.chantier = Some(Chantier {
            penalites: ["Retard", "RETARD", "Propreté"]
                .into_iter()
                .map(|t| TypePenalite {
                    type_penalite: t.into(),
                    description: None,
                })
                .collect(),
            ..Chantier::default()
        });
        input.penalites = [("retard", 150.0), ("Propreté", 30.0), ("Inconnue", 20.0)]
            .into_iter()
            .map(|(t, m)| PenaliteAppliquee {
                type_penalite: t.into(),
                montant_calcule: Montant::new(m),
            })
            .collect();
        let rates = RateConfig {
            penalty_match: PenaltyMatch::CaseInsensitive,
            ..RateConfig::default()
        };
        let d = compute(&input, &rates);
        let rows: Vec<f64> = d.penalites.iter().map(|l| l.montant).collect();
        assert_eq!(rows, [150.0, 0.0, 30.0]);
        assert!(close(d.total_penalites, 200.0));
        assert!(close(rows.iter().sum::<f64>(), d.total_penalites - 20.0));
        assert!(close(d.net_a_payer, 10_840.0));
    }

    #[test]
    fn test_amendment_portion() {
        let mut input = reference(false);
        input.avenants = vec![Avenant {
            montant_total_ht: Montant::new(25_000.0),
            ..Avenant::default()
        }];
        let d = compute(&input, &RateConfig::default());
        assert!(close(d.montant_marche_avec_avenants, 125_000.0));
        assert!(close(d.avancement, 24.0));
        // 100 000 × 5 % × 10 000 / 125 000 and 25 000 × 5 % × 10 000 / 125 000
        assert!(close(d.retenue_marche.mois, 400.0));
        assert!(close(d.retenue_avenants.mois, 100.0));
        assert!(close(d.retenue.mois, 500.0));
    }

    #[test]
    fn test_zero_contract_falls_back() {
        let mut input = reference(false);
        input.marche = None;
        let d = compute(&input, &RateConfig::default());
        assert_eq!(d.montant_marche_avec_avenants, 0.0);
        assert_eq!(d.avancement, 0.0);
        assert_eq!(d.retenue.as_array(), [0.0, 0.0, 0.0]);
        assert!(d.ttc.mois.is_finite());
        assert!(close(d.total_ht.mois, 9_700.0));
    }

    #[test]
    fn test_zero_contract_share_is_configurable() {
        let mut input = reference(false);
        input.marche = Some(Marche::default());
        input.avenants = vec![Avenant {
            montant_total_ht: Montant::new(0.0),
            ..Avenant::default()
        }];
        let rates = RateConfig {
            zero_contract_share: 1.0,
            ..RateConfig::default()
        };
        let d = compute(&input, &rates);
        // Amount bases are zero, so retention stays zero even with share 1.
        assert_eq!(d.retenue.mois, 0.0);
        assert_eq!(d.avancement, 0.0);
    }

    #[test]
    fn test_vat_resolution_order() {
        let rates = RateConfig::default();
        let mut input = reference(false);
        assert_eq!(resolve_taux_tva(input.taux_tva, input.marche.as_ref(), &rates), 20.0);
        input.marche.as_mut().unwrap().taux_tva = Some(10.0);
        assert_eq!(resolve_taux_tva(input.taux_tva, input.marche.as_ref(), &rates), 10.0);
        input.taux_tva = Some(5.5);
        assert_eq!(resolve_taux_tva(input.taux_tva, input.marche.as_ref(), &rates), 5.5);
        input.taux_tva = None;
        input.marche.as_mut().unwrap().taux_tva = None;
        let rates = RateConfig {
            default_vat_rate: 8.5,
            ..rates
        };
        assert_eq!(resolve_taux_tva(input.taux_tva, input.marche.as_ref(), &rates), 8.5);
    }

    #[test]
    fn test_alternate_rates() {
        let rates = RateConfig {
            retention_rate: 0.10,
            provision_rate: 0.0,
            ..RateConfig::default()
        };
        let d = compute(&reference(false), &rates);
        assert!(close(d.retenue.mois, 1_000.0));
        assert_eq!(d.provision.mois, 0.0);
        assert!(close(d.total_ht.mois, 9_000.0));
    }

    #[test]
    fn test_subcontractor_total() {
        let mut input = reference(false);
        input.paiements_sous_traitants = vec![
            PaiementSousTraitant {
                sous_traitant: Some("Elec".into()),
                montant_ht: Montant::new(1_200.0),
            },
            PaiementSousTraitant {
                sous_traitant: None,
                montant_ht: Montant::new(300.5),
            },
        ];
        let d = compute(&input, &RateConfig::default());
        assert!(close(d.total_paiements_sous_traitants, 1_500.5));
        // Informational only.
        assert!(close(d.net_a_payer, 11_040.0));
    }

    #[test]
    fn test_empty_input() {
        let d = compute(&SituationInput::default(), &RateConfig::default());
        assert_eq!(d.ttc.as_array(), [0.0, 0.0, 0.0]);
        assert_eq!(d.net_a_payer, 0.0);
        assert_eq!(d.taux_tva, 20.0);
    }

    #[test]
    fn test_from_backend_json() {
        let input: SituationInput = serde_json::from_str(
            r#"{
                "situation": {"montant_ht": "10000"},
                "marche": {"montant": "100000", "a_caution": null, "taux_tva": 20},
                "situations_precedentes": [{"montant_ht": 20000}, {"montant_ht": "n/a"}]
            }"#,
        )
        .unwrap();
        let d = compute(&input, &RateConfig::default());
        assert!(close(d.ttc.mois, 11_040.0));
    }
}

//! # Penalty Rows
//!
//! Penalties are printed once per entry of the job-site catalogue, in
//! catalogue order, not once per applied penalty. Each applied penalty is
//! assigned to the first catalogue entry its type matches, so a catalogue
//! listing the same type twice never counts one penalty twice: the later
//! duplicate prints zero.
//!
//! Applied penalties whose type matches no catalogue entry still count in
//! the penalty total (they were deducted from the payment) but get no row.

use serde::Serialize;

use btp_core::{PenaliteAppliquee, PenaltyMatch, TypePenalite};

/// One printed penalty row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LignePenalite {
    /// Catalogue type the row stands for.
    pub type_penalite: String,
    /// Printed label.
    pub libelle: String,
    /// Sum of matching applied penalties.
    pub montant: f64,
}

/// Build one row per catalogue entry.
pub fn lignes_penalites(
    catalogue: &[TypePenalite],
    appliquees: &[PenaliteAppliquee],
    mode: PenaltyMatch,
) -> Vec<LignePenalite> {
    let mut lignes: Vec<LignePenalite> = catalogue
        .iter()
        .map(|entree| LignePenalite {
            type_penalite: entree.type_penalite.clone(),
            libelle: entree.libelle().to_string(),
            montant: 0.0,
        })
        .collect();
    for p in appliquees {
        let rang = catalogue
            .iter()
            .position(|entree| mode.matches(&entree.type_penalite, &p.type_penalite));
        if let Some(ligne) = rang.and_then(|i| lignes.get_mut(i)) {
            ligne.montant += p.montant_calcule.value();
        }
    }
    lignes
}

/// Applied penalties whose type has no catalogue entry.
pub fn hors_catalogue<'a>(
    catalogue: &[TypePenalite],
    appliquees: &'a [PenaliteAppliquee],
    mode: PenaltyMatch,
) -> Vec<&'a PenaliteAppliquee> {
    appliquees
        .iter()
        .filter(|p| {
            !catalogue
                .iter()
                .any(|entree| mode.matches(&entree.type_penalite, &p.type_penalite))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use btp_core::Montant;

    fn catalogue() -> Vec<TypePenalite> {
        vec![
            TypePenalite {
                type_penalite: "Retard".into(),
                description: Some("Retard d'exécution".into()),
            },
            TypePenalite {
                type_penalite: "Propreté".into(),
                description: None,
            },
            TypePenalite {
                type_penalite: "Absence réunion".into(),
                description: None,
            },
        ]
    }

    fn applied(kind: &str, amount: f64) -> PenaliteAppliquee {
        PenaliteAppliquee {
            type_penalite: kind.into(),
            montant_calcule: Montant::new(amount),
        }
    }

    #[test]
    fn test_one_row_per_catalogue_entry_in_order() {
        let rows = lignes_penalites(&catalogue(), &[applied("Propreté", 80.0)], PenaltyMatch::Exact);
        let labels: Vec<&str> = rows.iter().map(|r| r.libelle.as_str()).collect();
        assert_eq!(labels, ["Retard d'exécution", "Propreté", "Absence réunion"]);
        assert_eq!(rows[0].montant, 0.0);
        assert_eq!(rows[1].montant, 80.0);
        assert_eq!(rows[2].montant, 0.0);
    }

    #[test]
    fn test_same_type_applied_twice_is_summed() {
        let rows = lignes_penalites(
            &catalogue(),
            &[applied("Retard", 100.0), applied("Retard", 50.0)],
            PenaltyMatch::Exact,
        );
        assert_eq!(rows[0].montant, 150.0);
    }

    #[test]
    fn test_exact_mode_is_case_sensitive() {
        let rows = lignes_penalites(&catalogue(), &[applied("retard", 100.0)], PenaltyMatch::Exact);
        assert_eq!(rows[0].montant, 0.0);
        assert_eq!(
            hors_catalogue(&catalogue(), &[applied("retard", 100.0)], PenaltyMatch::Exact).len(),
            1
        );
    }

    #[test]
    fn test_case_insensitive_mode() {
        let rows = lignes_penalites(
            &catalogue(),
            &[applied("RETARD ", 100.0), applied("propreté", 20.0)],
            PenaltyMatch::CaseInsensitive,
        );
        assert_eq!(rows[0].montant, 100.0);
        assert_eq!(rows[1].montant, 20.0);
    }

    #[test]
    fn test_empty_catalogue_has_no_rows() {
        assert!(lignes_penalites(&[], &[applied("Retard", 10.0)], PenaltyMatch::Exact).is_empty());
    }

    fn entry(kind: &str) -> TypePenalite {
        TypePenalite {
            type_penalite: kind.into(),
            description: None,
        }
    }

    #[test]
    fn test_duplicate_catalogue_types_count_once() {
        let catalogue = [entry("Retard"), entry("RETARD")];
        let rows = lignes_penalites(
            &catalogue,
            &[applied("retard", 150.0)],
            PenaltyMatch::CaseInsensitive,
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].montant, 150.0);
        assert_eq!(rows[1].montant, 0.0);

        let catalogue = [entry("Retard"), entry(" Retard ")];
        let rows = lignes_penalites(&catalogue, &[applied("Retard", 90.0)], PenaltyMatch::Exact);
        assert_eq!(rows[0].montant, 90.0);
        assert_eq!(rows[1].montant, 0.0);
    }
}

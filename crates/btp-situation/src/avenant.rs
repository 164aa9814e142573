//! # Amendment Statement
//!
//! Figures printed on a contract amendment (avenant): the contract amount
//! before the amendment, the amendment itself, the new contract amount, and
//! how far the amendments move the contract away from its base amount.

use serde::Serialize;

use btp_core::{AvenantInput, RateConfig};

use crate::decompte::resolve_taux_tva;

/// Every computed figure of one amendment document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompteAvenant {
    /// Base contract amount HT.
    pub montant_marche_base: f64,
    /// Σ amendments signed before this one.
    pub avenants_precedents: f64,
    /// Contract HT before this amendment.
    pub montant_avant: f64,
    /// This amendment HT. May be negative (works removed).
    pub montant_avenant: f64,
    /// Contract HT after this amendment.
    pub montant_apres: f64,
    /// This amendment as a percentage of the base contract.
    pub variation: f64,
    /// All amendments so far as a percentage of the base contract.
    pub variation_cumulee: f64,
    /// VAT rate in percent.
    pub taux_tva: f64,
    pub tva_avenant: f64,
    pub ttc_avenant: f64,
    pub tva_apres: f64,
    pub ttc_apres: f64,
}

/// Compute the amendment statement.
///
/// Variations are 0 when the base contract is zero.
pub fn compute_avenant(input: &AvenantInput, rates: &RateConfig) -> DecompteAvenant {
    let montant_marche_base = input
        .marche
        .as_ref()
        .map(|m| m.montant.value())
        .unwrap_or(0.0);
    let avenants_precedents = input
        .avenants_precedents
        .iter()
        .fold(0.0, |acc, a| acc + a.montant_total_ht.value());
    let montant_avant = montant_marche_base + avenants_precedents;
    let montant_avenant = input.avenant.montant_total_ht.value();
    let montant_apres = montant_avant + montant_avenant;

    let (variation, variation_cumulee) = if montant_marche_base == 0.0 {
        tracing::debug!("base contract is zero, amendment variation falls back to 0");
        (0.0, 0.0)
    } else {
        (
            montant_avenant / montant_marche_base * 100.0,
            (avenants_precedents + montant_avenant) / montant_marche_base * 100.0,
        )
    };

    let taux_tva = resolve_taux_tva(input.taux_tva, input.marche.as_ref(), rates);
    let tva_avenant = montant_avenant * taux_tva / 100.0;
    let tva_apres = montant_apres * taux_tva / 100.0;

    DecompteAvenant {
        montant_marche_base,
        avenants_precedents,
        montant_avant,
        montant_avenant,
        montant_apres,
        variation,
        variation_cumulee,
        taux_tva,
        tva_avenant,
        ttc_avenant: montant_avenant + tva_avenant,
        tva_apres,
        ttc_apres: montant_apres + tva_apres,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btp_core::{Avenant, Marche, Montant};

    fn avenant(montant: f64) -> Avenant {
        Avenant {
            montant_total_ht: Montant::new(montant),
            ..Avenant::default()
        }
    }

    fn input() -> AvenantInput {
        AvenantInput {
            avenant: avenant(12_500.0),
            marche: Some(Marche {
                montant: Montant::new(250_000.0),
                ..Marche::default()
            }),
            avenants_precedents: vec![avenant(10_000.0), avenant(-2_500.0)],
            ..AvenantInput::default()
        }
    }

    #[test]
    fn test_amounts_before_and_after() {
        let d = compute_avenant(&input(), &RateConfig::default());
        assert_eq!(d.avenants_precedents, 7_500.0);
        assert_eq!(d.montant_avant, 257_500.0);
        assert_eq!(d.montant_apres, 270_000.0);
        assert_eq!(d.variation, 5.0);
        assert_eq!(d.variation_cumulee, 8.0);
    }

    #[test]
    fn test_vat_on_amendment_and_new_total() {
        let d = compute_avenant(&input(), &RateConfig::default());
        assert_eq!(d.taux_tva, 20.0);
        assert_eq!(d.tva_avenant, 2_500.0);
        assert_eq!(d.ttc_avenant, 15_000.0);
        assert_eq!(d.tva_apres, 54_000.0);
        assert_eq!(d.ttc_apres, 324_000.0);
    }

    #[test]
    fn test_negative_amendment() {
        let mut i = input();
        i.avenant = avenant(-25_000.0);
        let d = compute_avenant(&i, &RateConfig::default());
        assert_eq!(d.montant_apres, 232_500.0);
        assert_eq!(d.variation, -10.0);
    }

    #[test]
    fn test_zero_base_contract() {
        let mut i = input();
        i.marche = None;
        let d = compute_avenant(&i, &RateConfig::default());
        assert_eq!(d.variation, 0.0);
        assert_eq!(d.variation_cumulee, 0.0);
        assert_eq!(d.montant_apres, 20_000.0);
    }

    #[test]
    fn test_vat_override() {
        let mut i = input();
        i.taux_tva = Some(10.0);
        let d = compute_avenant(&i, &RateConfig::default());
        assert_eq!(d.tva_avenant, 1_250.0);
    }

    #[test]
    fn test_vat_falls_back_to_contract_then_default() {
        let mut i = input();
        i.marche.as_mut().unwrap().taux_tva = Some(5.5);
        assert_eq!(compute_avenant(&i, &RateConfig::default()).taux_tva, 5.5);

        let rates = RateConfig {
            default_vat_rate: 10.0,
            ..RateConfig::default()
        };
        i.marche.as_mut().unwrap().taux_tva = None;
        assert_eq!(compute_avenant(&i, &rates).taux_tva, 10.0);
    }

    #[test]
    fn test_negative_vat_in_snapshot_uses_default() {
        let i = AvenantInput::from_json(
            r#"{"avenant": {"montant_total_ht": 1000}, "taux_tva": -20}"#,
        )
        .unwrap();
        let d = compute_avenant(&i, &RateConfig::default());
        assert_eq!(d.taux_tva, 20.0);
        assert_eq!(d.tva_avenant, 200.0);
    }
}

//! Susceptibility (vulnerability) via a logistic transform
//!
//! `susceptibility = 1 / (1 + e^(-(TCap - resistance) / scale))`
//!
//! The result is the probability that a threat event becomes a loss event. It
//! rises with threat capability and falls with resistance strength.

use fairquant_core::SusceptibilityConfig;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Logistic susceptibility model
///
/// The transform itself runs in `f64`; inputs and output are `Decimal`.
#[derive(Debug, Clone)]
pub struct SusceptibilityModel {
    scale: f64,
}

impl SusceptibilityModel {
    /// Create a new model with the given config
    pub fn new(config: SusceptibilityConfig) -> Self {
        Self {
            scale: config.scale.to_f64().unwrap_or(2.0),
        }
    }

    /// Probability in [0, 1] that a threat of the given capability overcomes
    /// the given resistance
    pub fn susceptibility(&self, threat_capability: Decimal, resistance: Decimal) -> Decimal {
        let tcap = threat_capability.to_f64().unwrap_or(0.0);
        let rs = resistance.to_f64().unwrap_or(0.0);
        Decimal::from_f64(self.logistic(tcap, rs)).unwrap_or(Decimal::ZERO)
    }

    /// The raw transform, clamped to [0, 1]
    pub fn logistic(&self, threat_capability: f64, resistance: f64) -> f64 {
        let z = (threat_capability - resistance) / self.scale;
        // e^-z overflowing to infinity yields exactly 0
        let value = 1.0 / (1.0 + (-z).exp());
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, 1.0)
    }
}

/// Loss events per year: `CF x POA x susceptibility`, floored at zero
pub fn loss_event_frequency(
    contact_frequency: Decimal,
    probability_of_action: Decimal,
    susceptibility: Decimal,
) -> Decimal {
    contact_frequency
        .saturating_mul(probability_of_action)
        .saturating_mul(susceptibility)
        .max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn model() -> SusceptibilityModel {
        SusceptibilityModel::new(SusceptibilityConfig::default())
    }

    #[test]
    fn test_even_match_is_one_half() {
        let s = model().susceptibility(dec!(5), dec!(5));
        assert!((s - dec!(0.5)).abs() < dec!(0.0000001), "got {}", s);
    }

    #[test]
    fn test_known_value() {
        // 1 / (1 + e^-1) ≈ 0.7310585786
        let s = model().susceptibility(dec!(7), dec!(5));
        assert!((s - dec!(0.7310585786)).abs() < dec!(0.000001), "got {}", s);
    }

    #[test]
    fn test_overwhelming_threat_is_near_certain() {
        // 1 / (1 + e^-25)
        let s = model().susceptibility(dec!(50), Decimal::ZERO);
        assert!(s > dec!(0.99999999), "got {}", s);
        assert!(s <= Decimal::ONE);
    }

    #[test]
    fn test_monotonic_in_threat_capability() {
        let m = model();
        let mut previous = Decimal::ZERO;
        for tcap in 0..=10 {
            let s = m.susceptibility(Decimal::from(tcap), dec!(5));
            assert!(s > previous, "not increasing at tcap {}: {}", tcap, s);
            previous = s;
        }
    }

    #[test]
    fn test_monotonic_in_resistance() {
        let m = model();
        let mut previous = Decimal::ONE;
        for rs in 0..=10 {
            let s = m.susceptibility(dec!(5), Decimal::from(rs));
            assert!(s < previous, "not decreasing at resistance {}: {}", rs, s);
            previous = s;
        }
    }

    #[test]
    fn test_extreme_inputs_stay_in_unit_interval() {
        let m = model();
        assert_eq!(m.logistic(-1e308, 1e308), 0.0);
        assert_eq!(m.logistic(1e308, -1e308), 1.0);

        let low = m.susceptibility(dec!(-1000000), dec!(1000000));
        let high = m.susceptibility(dec!(1000000), dec!(-1000000));
        assert!(low >= Decimal::ZERO && low < dec!(0.000001), "got {}", low);
        assert!(high <= Decimal::ONE && high > dec!(0.999999), "got {}", high);
    }

    #[test]
    fn test_loss_event_frequency() {
        assert_eq!(loss_event_frequency(dec!(20), dec!(0.5), Decimal::ONE), dec!(10));
        assert_eq!(
            loss_event_frequency(dec!(-20), dec!(0.5), Decimal::ONE),
            Decimal::ZERO
        );
    }
}

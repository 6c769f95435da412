//! Loss magnitude per loss event
//!
//! Total loss at each scenario point is primary loss plus secondary loss.
//! Secondary loss comes from exactly one of two sources:
//!
//! - **Classic**: `SLEF x SLM` from the risk's own fields, used when no
//!   cost-modules are assigned
//! - **Cost-modules**: a single incident costed by the assigned modules, with
//!   percentage modules applied against the primary loss
//!
//! Assigned cost-modules always replace the classic pair; the two are never
//! summed.

use crate::secondary_loss::SecondaryLossAggregator;
use fairquant_core::{
    CostContext, CostModuleAssignment, FairScenarioParams, PointEstimates, ScenarioPoint,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Where secondary loss was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryLossSource {
    Classic,
    CostModules,
}

/// Loss magnitude breakdown across the three scenario points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LossMagnitude {
    pub primary: PointEstimates,
    pub secondary: PointEstimates,
    pub total: PointEstimates,
    pub source: SecondaryLossSource,
}

/// Combines primary and secondary loss into total loss per event
#[derive(Debug, Clone)]
pub struct LossMagnitudeCalculator {
    aggregator: SecondaryLossAggregator,
}

impl LossMagnitudeCalculator {
    /// Create a calculator on top of the given secondary loss aggregator
    pub fn new(aggregator: SecondaryLossAggregator) -> Self {
        Self { aggregator }
    }

    /// Total loss at a single scenario point
    pub fn total_loss(
        &self,
        point: ScenarioPoint,
        params: &FairScenarioParams,
        cost_modules: &[CostModuleAssignment],
    ) -> Decimal {
        self.combine(
            params.primary_loss.point(point),
            params.secondary_loss_event_frequency.point(point),
            params.secondary_loss_magnitude.point(point),
            cost_modules,
        )
        .0
    }

    /// Total and secondary loss for one set of factor values
    ///
    /// Returns `(total, secondary)`, both floored at zero. This is the
    /// per-draw path used by sampling, so it does not log.
    pub fn combine(
        &self,
        primary: Decimal,
        secondary_event_frequency: Decimal,
        secondary_magnitude: Decimal,
        cost_modules: &[CostModuleAssignment],
    ) -> (Decimal, Decimal) {
        if cost_modules.is_empty() {
            let secondary = secondary_event_frequency
                .saturating_mul(secondary_magnitude)
                .max(Decimal::ZERO);
            let total = primary.saturating_add(secondary).max(Decimal::ZERO);
            return (total, secondary);
        }

        // One incident, costed against the primary loss
        let secondary = self
            .aggregator
            .per_event_cost(primary, cost_modules, &CostContext::default());
        let total = primary.saturating_add(secondary).max(Decimal::ZERO);
        let derived = total.saturating_sub(primary).max(Decimal::ZERO);
        (total, derived)
    }

    /// Full loss magnitude breakdown for a risk
    pub fn calculate(
        &self,
        params: &FairScenarioParams,
        cost_modules: &[CostModuleAssignment],
    ) -> LossMagnitude {
        let primary = params.primary_loss.estimates();

        let (secondary, total, source) = if cost_modules.is_empty() {
            let secondary = PointEstimates::from_fn(|point| {
                params
                    .secondary_loss_event_frequency
                    .point(point)
                    .saturating_mul(params.secondary_loss_magnitude.point(point))
                    .max(Decimal::ZERO)
            });
            let total = PointEstimates::from_fn(|point| {
                primary
                    .get(point)
                    .saturating_add(secondary.get(point))
                    .max(Decimal::ZERO)
            });
            (secondary, total, SecondaryLossSource::Classic)
        } else {
            let module_loss = self.aggregator.aggregate(
                &PointEstimates::uniform(Decimal::ONE),
                &primary,
                cost_modules,
                &CostContext::default(),
            );
            let total = PointEstimates::from_fn(|point| {
                primary
                    .get(point)
                    .saturating_add(module_loss.get(point))
                    .max(Decimal::ZERO)
            });
            // Reverse-derived so secondary always equals total minus primary
            let secondary = PointEstimates::from_fn(|point| {
                total
                    .get(point)
                    .saturating_sub(primary.get(point))
                    .max(Decimal::ZERO)
            });
            (secondary, total, SecondaryLossSource::CostModules)
        };

        debug!(
            source = ?source,
            total_min = %total.min,
            total_avg = %total.avg,
            total_max = %total.max,
            "Calculated loss magnitude"
        );

        LossMagnitude {
            primary,
            secondary,
            total,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairquant_core::{CostConfig, CostModule, CostType, ScenarioRange};
    use rust_decimal_macros::dec;

    fn calculator() -> LossMagnitudeCalculator {
        LossMagnitudeCalculator::new(SecondaryLossAggregator::new(CostConfig::default()))
    }

    fn params() -> FairScenarioParams {
        FairScenarioParams {
            primary_loss: ScenarioRange::new(dec!(1000), dec!(5000), dec!(20000)),
            secondary_loss_event_frequency: ScenarioRange::new(dec!(0.1), dec!(0.5), dec!(1)),
            secondary_loss_magnitude: ScenarioRange::new(dec!(500), dec!(2000), dec!(10000)),
            ..Default::default()
        }
    }

    fn modules() -> Vec<CostModuleAssignment> {
        vec![
            CostModuleAssignment::new(CostModule::new("Legal", CostType::Fixed, dec!(3000))),
            CostModuleAssignment::new(CostModule::new(
                "Notification",
                CostType::Percentage,
                dec!(0.1),
            )),
            CostModuleAssignment::new(CostModule::new("Forensics", CostType::PerHour, dec!(200))),
        ]
    }

    #[test]
    fn test_classic_secondary_loss() {
        let loss = calculator().calculate(&params(), &[]);
        assert_eq!(loss.source, SecondaryLossSource::Classic);
        assert_eq!(loss.secondary, PointEstimates::new(dec!(50), dec!(1000), dec!(10000)));
        assert_eq!(loss.total, PointEstimates::new(dec!(1050), dec!(6000), dec!(30000)));
    }

    #[test]
    fn test_cost_modules_replace_classic_pair() {
        let loss = calculator().calculate(&params(), &modules());
        assert_eq!(loss.source, SecondaryLossSource::CostModules);

        // 3000 fixed + 10% of primary + 200 * 8 hours
        assert_eq!(loss.total.min, dec!(1000) + dec!(3000) + dec!(100) + dec!(1600));
        assert_eq!(loss.total.avg, dec!(5000) + dec!(3000) + dec!(500) + dec!(1600));
        assert_eq!(loss.total.max, dec!(20000) + dec!(3000) + dec!(2000) + dec!(1600));
    }

    #[test]
    fn test_secondary_is_total_minus_primary_with_modules() {
        let loss = calculator().calculate(&params(), &modules());
        for point in ScenarioPoint::ALL {
            assert_eq!(
                loss.secondary.get(point),
                loss.total.get(point) - loss.primary.get(point),
                "mismatch at {}",
                point
            );
        }
    }

    #[test]
    fn test_total_loss_matches_calculate() {
        let calc = calculator();
        let p = params();
        for cost_modules in [Vec::new(), modules()] {
            let loss = calc.calculate(&p, &cost_modules);
            for point in ScenarioPoint::ALL {
                assert_eq!(calc.total_loss(point, &p, &cost_modules), loss.total.get(point));
            }
        }
    }

    #[test]
    fn test_extreme_inputs_saturate() {
        let p = FairScenarioParams {
            primary_loss: ScenarioRange::new(Decimal::MAX, Decimal::MAX, Decimal::MAX),
            secondary_loss_event_frequency: ScenarioRange::new(dec!(2), dec!(2), dec!(2)),
            secondary_loss_magnitude: ScenarioRange::new(Decimal::MAX, Decimal::MAX, Decimal::MAX),
            ..Default::default()
        };
        let calc = calculator();

        let loss = calc.calculate(&p, &[]);
        assert_eq!(loss.secondary, PointEstimates::uniform(Decimal::MAX));
        assert_eq!(loss.total, PointEstimates::uniform(Decimal::MAX));

        let loss = calc.calculate(&p, &modules());
        assert_eq!(loss.total, PointEstimates::uniform(Decimal::MAX));
        assert_eq!(loss.secondary, PointEstimates::default());
    }

    #[test]
    fn test_negative_inputs_floor_at_zero() {
        let p = FairScenarioParams {
            primary_loss: ScenarioRange::new(dec!(-5000), dec!(-5000), dec!(-5000)),
            secondary_loss_event_frequency: ScenarioRange::new(dec!(-1), dec!(1), dec!(1)),
            secondary_loss_magnitude: ScenarioRange::new(dec!(100), dec!(100), dec!(100)),
            ..Default::default()
        };
        let loss = calculator().calculate(&p, &[]);
        assert_eq!(loss.secondary.min, Decimal::ZERO);
        assert_eq!(loss.total, PointEstimates::default());
    }
}

//! Control effectiveness aggregation
//!
//! Reduces the controls applied to a risk into a single average
//! implementation-adjusted effectiveness ("boost") on the 0-10 scale. The
//! boost feeds two separate mechanisms:
//!
//! - **Resistance boost**: added to baseline resistance strength per scenario
//!   point with asymmetric multipliers (0.8 / 1.0 / 1.2 by default), capped at
//!   the resistance ceiling. Reported for display.
//! - **Residual reduction**: `(boost / scale) * max_reduction` of inherent risk.
//!   This is what determines residual risk.
//!
//! Only controls with effectiveness above zero count towards the average.

use fairquant_core::{
    ControlConfig, ControlRecord, ImplementationStatus, PointEstimates, ScenarioRange,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Combined effect of a set of controls on one risk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEffect {
    /// Average implementation-adjusted effectiveness, clamped to the scale
    pub boost: Decimal,
    /// Controls with effectiveness above zero
    pub qualifying_controls: usize,
    /// Fraction of inherent risk removed by the controls
    pub reduction: Decimal,
    /// Baseline resistance strength lifted by the boost
    pub resistance: PointEstimates,
}

/// Aggregates applied controls into a resistance boost and risk reduction
#[derive(Debug, Clone)]
pub struct ControlEffectivenessAggregator {
    config: ControlConfig,
}

impl ControlEffectivenessAggregator {
    /// Create a new aggregator with the given control config
    pub fn new(config: ControlConfig) -> Self {
        Self { config }
    }

    /// Weight given to a control in the given implementation state
    pub fn implementation_factor(&self, status: Option<ImplementationStatus>) -> Decimal {
        match status {
            Some(ImplementationStatus::FullyImplemented) => self.config.fully_implemented_factor,
            Some(ImplementationStatus::InProgress) => self.config.in_progress_factor,
            _ => Decimal::ZERO,
        }
    }

    /// Average implementation-adjusted effectiveness over qualifying controls
    ///
    /// Returns the boost and the number of controls that qualified. With no
    /// qualifying controls the boost is zero.
    pub fn aggregate(&self, controls: &[ControlRecord]) -> (Decimal, usize) {
        let (total, count) = controls
            .iter()
            .filter(|c| c.control_effectiveness > Decimal::ZERO)
            .fold((Decimal::ZERO, 0usize), |(total, count), control| {
                let adjusted = control
                    .control_effectiveness
                    .saturating_mul(self.implementation_factor(control.implementation_status));
                (total.saturating_add(adjusted), count + 1)
            });

        if count == 0 {
            return (Decimal::ZERO, 0);
        }

        let boost = (total / Decimal::from(count))
            .max(Decimal::ZERO)
            .min(self.config.effectiveness_scale);

        (boost, count)
    }

    /// Fraction of inherent risk removed at the given boost
    ///
    /// Linear in the boost, reaching `max_reduction` at the top of the scale.
    /// A zero scale yields no reduction.
    pub fn reduction(&self, boost: Decimal) -> Decimal {
        let Some(share) = boost.checked_div(self.config.effectiveness_scale) else {
            return Decimal::ZERO;
        };
        share
            .saturating_mul(self.config.max_reduction)
            .max(Decimal::ZERO)
            .min(self.config.max_reduction)
    }

    /// Baseline resistance strength lifted by the boost at each scenario point
    pub fn boosted_resistance(&self, baseline: &ScenarioRange, boost: Decimal) -> PointEstimates {
        if boost.is_zero() {
            return baseline.estimates();
        }

        let multipliers = &self.config.boost_multipliers;
        let ceiling = self.config.resistance_ceiling;
        let lift = |rs: Decimal, multiplier: Decimal| {
            rs.saturating_add(boost.saturating_mul(multiplier)).min(ceiling)
        };
        PointEstimates::new(
            lift(baseline.min, multipliers.min),
            lift(baseline.avg, multipliers.avg),
            lift(baseline.max, multipliers.max),
        )
    }

    /// Full effect of `controls` against a baseline resistance strength
    pub fn evaluate(&self, controls: &[ControlRecord], baseline: &ScenarioRange) -> ControlEffect {
        let (boost, qualifying_controls) = self.aggregate(controls);
        let reduction = self.reduction(boost);
        let resistance = self.boosted_resistance(baseline, boost);

        debug!(
            controls = controls.len(),
            qualifying = qualifying_controls,
            boost = %boost,
            reduction = %reduction,
            resistance_avg = %resistance.avg,
            "Evaluated control effectiveness"
        );

        ControlEffect {
            boost,
            qualifying_controls,
            reduction,
            resistance,
        }
    }
}

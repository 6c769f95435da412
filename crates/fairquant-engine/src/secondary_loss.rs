//! Secondary loss aggregation over assigned cost-modules
//!
//! Each scenario point is evaluated independently: the per-event cost is the
//! sum of every module valued against that point's loss magnitude, then scaled
//! by that point's event frequency. An empty module list yields zeros; falling
//! back to classic SLEF x SLM is the caller's job.

use crate::cost_module::CostModuleValuator;
use fairquant_core::{CostConfig, CostContext, CostModuleAssignment, CostType, PointEstimates};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Sums cost-module valuations into a {min, avg, max} secondary loss
#[derive(Debug, Clone)]
pub struct SecondaryLossAggregator {
    config: CostConfig,
}

impl SecondaryLossAggregator {
    /// Create a new aggregator with the given cost config
    pub fn new(config: CostConfig) -> Self {
        Self { config }
    }

    /// Secondary loss at each scenario point
    pub fn aggregate(
        &self,
        event_frequency: &PointEstimates,
        loss_magnitude: &PointEstimates,
        modules: &[CostModuleAssignment],
        context: &CostContext,
    ) -> PointEstimates {
        if modules.is_empty() {
            return PointEstimates::default();
        }

        self.warn_unknown_types(modules);

        let result = PointEstimates::from_fn(|point| {
            let per_event = self.per_event_cost(loss_magnitude.get(point), modules, context);
            per_event.saturating_mul(event_frequency.get(point))
        });

        debug!(
            modules = modules.len(),
            min = %result.min,
            avg = %result.avg,
            max = %result.max,
            "Aggregated cost-module secondary loss"
        );

        result
    }

    /// Summed cost of all modules for a single event of the given magnitude
    pub fn per_event_cost(
        &self,
        magnitude: Decimal,
        modules: &[CostModuleAssignment],
        context: &CostContext,
    ) -> Decimal {
        modules
            .iter()
            .map(|assignment| {
                let value = CostModuleValuator::valuate(
                    assignment.module.cost_type,
                    assignment.module.cost_factor,
                    magnitude,
                    self.hours_for(assignment, context),
                );
                if self.config.apply_materiality_weight {
                    value.saturating_mul(assignment.weight)
                } else {
                    value
                }
            })
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Log each module whose type will be valued at zero
    pub fn warn_unknown_types(&self, modules: &[CostModuleAssignment]) {
        for assignment in modules
            .iter()
            .filter(|a| a.module.cost_type == CostType::Unknown)
        {
            warn!(
                module = %assignment.module.name,
                "Unknown cost-module type, valuing at zero"
            );
        }
    }

    /// Assignment context wins over the call context, which wins over the default
    fn hours_for(&self, assignment: &CostModuleAssignment, context: &CostContext) -> Decimal {
        assignment
            .context
            .hours_per_event
            .or(context.hours_per_event)
            .unwrap_or(self.config.default_hours_per_event)
    }
}

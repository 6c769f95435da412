//! Extension points of the quantification pipeline

use crate::types::{CostModuleAssignment, FairScenarioParams, MonteCarloResults};
use rust_decimal::Decimal;

/// Everything an exposure model may draw on for one risk
#[derive(Debug, Clone, Copy)]
pub struct ExposureInput<'a> {
    /// Point-estimate annualized risk the distribution is centred on
    pub base_risk: Decimal,
    pub params: &'a FairScenarioParams,
    pub cost_modules: &'a [CostModuleAssignment],
    /// Fractional residual-risk reduction from applied controls (0 without controls)
    pub control_reduction: Decimal,
}

/// Summarizes the annualized loss exposure distribution of a risk
pub trait ExposureModel: Send + Sync {
    /// Short model identifier for logs and reports
    fn name(&self) -> &'static str;

    /// Produce the percentile summary; must not fail
    fn summarize(&self, input: &ExposureInput<'_>) -> MonteCarloResults;
}

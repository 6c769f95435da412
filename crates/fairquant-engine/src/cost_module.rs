//! Cost-module valuation
//!
//! Values a single cost-module for one loss event. Four accrual models are
//! supported:
//!
//! - **fixed**: a flat one-time amount
//! - **per_event**: a flat amount; the event count is applied by the aggregator
//! - **per_hour**: an hourly rate times the hours spent per event
//! - **percentage**: a 0-1 fraction of the loss magnitude
//!
//! Unknown types value to zero rather than failing.

use fairquant_core::CostType;
use rust_decimal::Decimal;

/// Stateless valuator for cost-module contributions
#[derive(Debug, Clone, Copy, Default)]
pub struct CostModuleValuator;

impl CostModuleValuator {
    /// Monetary contribution of one cost-module for one event
    pub fn valuate(
        cost_type: CostType,
        cost_factor: Decimal,
        magnitude: Decimal,
        hours_per_event: Decimal,
    ) -> Decimal {
        match cost_type {
            CostType::Fixed | CostType::PerEvent => cost_factor,
            CostType::PerHour => cost_factor.saturating_mul(hours_per_event),
            CostType::Percentage => magnitude.saturating_mul(cost_factor),
            CostType::Unknown => Decimal::ZERO,
        }
    }
}

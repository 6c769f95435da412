//! Valuate CLI command: check what a single cost-module contributes per incident

use super::format_money;
use anyhow::Result;
use clap::Args;
use fairquant_core::{CostConfig, CostType};
use fairquant_engine::CostModuleValuator;
use rust_decimal::Decimal;
use tracing::warn;

/// Value one cost-module for a single incident
#[derive(Debug, Args)]
pub struct ValuateCommand {
    /// Cost type: fixed, per_event, per_hour or percentage
    #[arg(long)]
    pub cost_type: String,

    /// Cost factor: currency amount, or a 0-1 fraction for percentage
    #[arg(long)]
    pub factor: Decimal,

    /// Loss magnitude the percentage applies to
    #[arg(long, default_value = "0")]
    pub magnitude: Decimal,

    /// Hours per event for per_hour modules
    #[arg(long)]
    pub hours: Option<Decimal>,
}

impl ValuateCommand {
    pub fn run(&self) -> Result<()> {
        let value = self.value();
        println!(
            "{} cost-module, factor {}: {}",
            self.parsed_type(),
            self.factor,
            format_money(value)
        );
        Ok(())
    }

    fn parsed_type(&self) -> CostType {
        self.cost_type.parse().unwrap_or(CostType::Unknown)
    }

    fn value(&self) -> Decimal {
        let cost_type = self.parsed_type();
        if cost_type == CostType::Unknown {
            warn!(cost_type = %self.cost_type, "Unknown cost type, contributes nothing");
        }
        let hours = self
            .hours
            .unwrap_or_else(|| CostConfig::default().default_hours_per_event);
        CostModuleValuator::valuate(cost_type, self.factor, self.magnitude, hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn command(cost_type: &str, factor: Decimal) -> ValuateCommand {
        ValuateCommand {
            cost_type: cost_type.to_string(),
            factor,
            magnitude: Decimal::ZERO,
            hours: None,
        }
    }

    #[test]
    fn test_per_hour_uses_default_hours() {
        assert_eq!(command("per_hour", dec!(50)).value(), dec!(400));
    }

    #[test]
    fn test_per_hour_with_explicit_hours() {
        let cmd = ValuateCommand {
            hours: Some(dec!(4)),
            ..command("per_hour", dec!(50))
        };
        assert_eq!(cmd.value(), dec!(200));
    }

    #[test]
    fn test_percentage_of_magnitude() {
        let cmd = ValuateCommand {
            magnitude: dec!(10000),
            ..command("percentage", dec!(0.02))
        };
        assert_eq!(cmd.value(), dec!(200));
    }

    #[test]
    fn test_unknown_type_is_zero() {
        assert_eq!(command("per_head", dec!(999)).value(), Decimal::ZERO);
    }
}

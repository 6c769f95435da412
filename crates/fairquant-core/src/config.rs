//! Engine configuration
//!
//! Every tunable heuristic of the quantification pipeline lives here. The
//! defaults reproduce the reference FAIR calculation exactly; a TOML file may
//! override any subset of fields.

use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub controls: ControlConfig,
    pub susceptibility: SusceptibilityConfig,
    pub cost: CostConfig,
    pub exposure: ExposureConfig,
}

impl EngineConfig {
    /// Parse a configuration from TOML and validate it
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Check that every heuristic is within its meaningful range
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.controls.validate()?;
        self.susceptibility.validate()?;
        self.cost.validate()?;
        self.exposure.validate()
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

fn require_non_negative(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(invalid(field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

fn require_unit_interval(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(invalid(field, format!("must be within [0, 1], got {}", value)));
    }
    Ok(())
}

/// Per-point multipliers applied to the control boost before it is added to
/// baseline resistance strength.
///
/// The asymmetry (boost counts for less at the min point and more at the max
/// point) is a heuristic, not part of FAIR itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostMultipliers {
    pub min: Decimal,
    pub avg: Decimal,
    pub max: Decimal,
}

impl Default for BoostMultipliers {
    fn default() -> Self {
        Self {
            min: Decimal::new(8, 1),  // 0.8
            avg: Decimal::ONE,        // 1.0
            max: Decimal::new(12, 1), // 1.2
        }
    }
}

/// Control effectiveness heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Weight of a fully implemented control
    pub fully_implemented_factor: Decimal,
    /// Weight of a control still being rolled out
    pub in_progress_factor: Decimal,
    /// Top of the effectiveness scale
    pub effectiveness_scale: Decimal,
    /// Residual-risk reduction reached at the top of the effectiveness scale
    pub max_reduction: Decimal,
    /// Upper bound for boosted resistance strength
    pub resistance_ceiling: Decimal,
    pub boost_multipliers: BoostMultipliers,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            fully_implemented_factor: Decimal::ONE,
            in_progress_factor: Decimal::new(5, 1), // 0.5
            effectiveness_scale: Decimal::TEN,
            max_reduction: Decimal::new(5, 1), // 50%
            resistance_ceiling: Decimal::TEN,
            boost_multipliers: BoostMultipliers::default(),
        }
    }
}

impl ControlConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_unit_interval("controls.fully_implemented_factor", self.fully_implemented_factor)?;
        require_unit_interval("controls.in_progress_factor", self.in_progress_factor)?;
        require_unit_interval("controls.max_reduction", self.max_reduction)?;
        if self.effectiveness_scale <= Decimal::ZERO {
            return Err(invalid(
                "controls.effectiveness_scale",
                format!("must be > 0, got {}", self.effectiveness_scale),
            ));
        }
        require_non_negative("controls.resistance_ceiling", self.resistance_ceiling)?;
        require_non_negative("controls.boost_multipliers.min", self.boost_multipliers.min)?;
        require_non_negative("controls.boost_multipliers.avg", self.boost_multipliers.avg)?;
        require_non_negative("controls.boost_multipliers.max", self.boost_multipliers.max)
    }
}

/// Logistic susceptibility transform settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SusceptibilityConfig {
    /// Divisor of `TCap - resistance` in the logistic exponent
    pub scale: Decimal,
}

impl Default for SusceptibilityConfig {
    fn default() -> Self {
        Self { scale: Decimal::TWO }
    }
}

impl SusceptibilityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.scale <= Decimal::ZERO {
            return Err(invalid(
                "susceptibility.scale",
                format!("must be > 0, got {}", self.scale),
            ));
        }
        Ok(())
    }
}

/// Cost-module valuation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Hours per event when neither the assignment nor the call supplies one
    pub default_hours_per_event: Decimal,
    /// Multiply each module's valuation by its assignment weight
    pub apply_materiality_weight: bool,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            default_hours_per_event: Decimal::new(8, 0),
            apply_materiality_weight: false,
        }
    }
}

impl CostConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("cost.default_hours_per_event", self.default_hours_per_event)
    }
}

/// Which exposure model summarizes the annualized loss distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureModelKind {
    /// Fixed multiplicative percentile fan around the point estimate
    #[default]
    PercentileFan,
    /// Monte Carlo sampling over PERT-distributed FAIR factors
    Sampled,
}

/// Multipliers of the base risk used by the percentile fan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanMultipliers {
    pub p05: Decimal,
    pub p25: Decimal,
    pub p50: Decimal,
    pub p75: Decimal,
    pub p95: Decimal,
    pub max: Decimal,
}

impl Default for FanMultipliers {
    fn default() -> Self {
        Self {
            p05: Decimal::new(3, 1),
            p25: Decimal::new(6, 1),
            p50: Decimal::ONE,
            p75: Decimal::new(14, 1),
            p95: Decimal::TWO,
            max: Decimal::new(3, 0),
        }
    }
}

/// Exposure distribution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    pub model: ExposureModelKind,
    /// Samples drawn by the sampled model
    pub iterations: u32,
    /// Fixed RNG seed for reproducible sampling
    pub seed: Option<u64>,
    pub fan: FanMultipliers,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            model: ExposureModelKind::default(),
            iterations: 10_000,
            seed: None,
            fan: FanMultipliers::default(),
        }
    }
}

impl ExposureConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.model == ExposureModelKind::Sampled && self.iterations == 0 {
            return Err(invalid(
                "exposure.iterations",
                "must be > 0 when the sampled model is selected",
            ));
        }
        let fan = &self.fan;
        let points = [
            ("exposure.fan.p05", fan.p05),
            ("exposure.fan.p25", fan.p25),
            ("exposure.fan.p50", fan.p50),
            ("exposure.fan.p75", fan.p75),
            ("exposure.fan.p95", fan.p95),
            ("exposure.fan.max", fan.max),
        ];
        for (field, value) in points {
            require_non_negative(field, value)?;
        }
        // Percentiles must not decrease
        for pair in points.windows(2) {
            let (lower_field, lower) = pair[0];
            let (field, value) = pair[1];
            if value < lower {
                return Err(invalid(
                    field,
                    format!("must be >= {} ({}), got {}", lower_field, lower, value),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_match_reference_heuristics() {
        let config = EngineConfig::default();
        assert_eq!(config.controls.in_progress_factor, dec!(0.5));
        assert_eq!(config.controls.max_reduction, dec!(0.5));
        assert_eq!(config.controls.resistance_ceiling, dec!(10));
        assert_eq!(config.controls.boost_multipliers.min, dec!(0.8));
        assert_eq!(config.controls.boost_multipliers.max, dec!(1.2));
        assert_eq!(config.susceptibility.scale, dec!(2));
        assert_eq!(config.cost.default_hours_per_event, dec!(8));
        assert!(!config.cost.apply_materiality_weight);
        assert_eq!(config.exposure.model, ExposureModelKind::PercentileFan);
        assert_eq!(config.exposure.fan.p95, dec!(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [controls]
            max_reduction = 0.3

            [exposure]
            model = "sampled"
            iterations = 500
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.controls.max_reduction, dec!(0.3));
        assert_eq!(config.controls.in_progress_factor, dec!(0.5));
        assert_eq!(config.exposure.model, ExposureModelKind::Sampled);
        assert_eq!(config.exposure.iterations, 500);
        assert_eq!(config.exposure.seed, Some(7));
        assert_eq!(config.exposure.fan, FanMultipliers::default());
    }

    /// Field named by an `InvalidValue` error
    fn invalid_field(content: &str) -> String {
        match EngineConfig::from_toml_str(content) {
            Err(ConfigError::InvalidValue { field, .. }) => field,
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_max_reduction_rejected() {
        assert_eq!(
            invalid_field("[controls]\nmax_reduction = 1.5"),
            "controls.max_reduction"
        );
    }

    #[test]
    fn test_zero_iterations_rejected_for_sampled_model() {
        let err = EngineConfig::from_toml_str(
            "[exposure]\nmodel = \"sampled\"\niterations = 0",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        // The fan ignores iterations entirely
        assert!(EngineConfig::from_toml_str("[exposure]\niterations = 0").is_ok());
    }

    #[test]
    fn test_unordered_fan_rejected() {
        assert_eq!(
            invalid_field("[exposure.fan]\np05 = 2.5\np95 = 0.5"),
            "exposure.fan.p25"
        );
        assert_eq!(
            invalid_field("[exposure.fan]\np95 = 1.2"),
            "exposure.fan.p95"
        );

        // Equal neighbours are allowed
        let equal = EngineConfig::from_toml_str("[exposure.fan]\np75 = 1.0\np95 = 1.0");
        assert!(equal.is_ok());
        assert!(EngineConfig::from_toml_str("[exposure.fan]\np95 = 1.4").is_ok());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = EngineConfig::from_toml_str("[controls\nmax_reduction = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/fairquant.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = include_str!("../../../config/fairquant.toml");
        let config = EngineConfig::from_toml_str(shipped).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}

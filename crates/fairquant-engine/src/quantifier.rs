//! FAIR risk quantification
//!
//! Turns FAIR scenario parameters, applied controls and assigned cost-modules
//! into inherent and residual annualized risk.
//!
//! ## Pipeline
//!
//! 1. Loss magnitude per event at min/avg/max (primary + secondary)
//! 2. Control boost, and the boosted resistance strength it implies
//! 3. Susceptibility from the logistic transform of TCap against resistance,
//!    evaluated at the average point only
//! 4. Loss event frequency: `CF x POA x susceptibility`
//! 5. Inherent risk: LEF (no resistance) x average total loss
//! 6. Residual risk: inherent risk reduced by `(boost / 10) x 50%`
//! 7. Exposure distribution around the base risk
//!
//! Steps 2 and 6 are two separate control mechanisms. Residual risk comes only
//! from the multiplicative reduction in step 6; the boosted resistance and the
//! susceptibility against it are reported for display.
//!
//! The quantifier holds no mutable state, so one instance can serve any number
//! of threads.

use crate::control::ControlEffectivenessAggregator;
use crate::exposure::{MonteCarloSimulator, PercentileFan};
use crate::loss_magnitude::LossMagnitudeCalculator;
use crate::secondary_loss::SecondaryLossAggregator;
use crate::susceptibility::{loss_event_frequency, SusceptibilityModel};
use fairquant_core::{
    CalculationResult, ConfigError, ControlRecord, CostModuleAssignment, EngineConfig,
    ExposureInput, ExposureModel, ExposureModelKind, FairScenarioParams,
};
use rust_decimal::Decimal;
use std::fmt;
use tracing::{info, warn};

/// Orchestrates the full FAIR calculation for one risk at a time
pub struct RiskQuantifier {
    config: EngineConfig,
    controls: ControlEffectivenessAggregator,
    losses: LossMagnitudeCalculator,
    susceptibility: SusceptibilityModel,
    exposure: Box<dyn ExposureModel>,
}

impl RiskQuantifier {
    /// Create a quantifier with the exposure model selected by the config
    pub fn new(config: EngineConfig) -> Self {
        let losses =
            LossMagnitudeCalculator::new(SecondaryLossAggregator::new(config.cost.clone()));
        let susceptibility = SusceptibilityModel::new(config.susceptibility.clone());

        let exposure: Box<dyn ExposureModel> = match config.exposure.model {
            ExposureModelKind::PercentileFan => {
                Box::new(PercentileFan::new(config.exposure.fan.clone()))
            }
            ExposureModelKind::Sampled => Box::new(MonteCarloSimulator::new(
                config.exposure.iterations,
                config.exposure.seed,
                susceptibility.clone(),
                losses.clone(),
            )),
        };

        Self {
            controls: ControlEffectivenessAggregator::new(config.controls.clone()),
            losses,
            susceptibility,
            exposure,
            config,
        }
    }

    /// Validate the config, then create a quantifier from it
    pub fn try_new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Replace the exposure model
    pub fn with_exposure_model(mut self, model: Box<dyn ExposureModel>) -> Self {
        self.exposure = model;
        self
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the active exposure model
    pub fn exposure_model(&self) -> &'static str {
        self.exposure.name()
    }

    /// Quantify one risk
    ///
    /// Never fails: unset inputs are zero, susceptibility is clamped to
    /// [0, 1] and every monetary output is floored at zero.
    pub fn quantify(
        &self,
        params: &FairScenarioParams,
        controls: &[ControlRecord],
        cost_modules: &[CostModuleAssignment],
    ) -> CalculationResult {
        for (factor, range) in params.factors() {
            if !range.is_ordered() {
                warn!(
                    factor,
                    min = %range.min,
                    avg = %range.avg,
                    max = %range.max,
                    "Scenario range is not ordered min <= avg <= max"
                );
            }
        }

        let loss = self.losses.calculate(params, cost_modules);
        let effect = self
            .controls
            .evaluate(controls, &params.resistance_strength);

        let tcap = params.threat_capability.avg;
        let inherent_susceptibility = self.susceptibility.susceptibility(tcap, Decimal::ZERO);
        let residual_susceptibility = self
            .susceptibility
            .susceptibility(tcap, effect.resistance.avg);

        let lef = loss_event_frequency(
            params.contact_frequency.avg,
            params.probability_of_action.avg,
            inherent_susceptibility,
        );
        let inherent_risk = lef.saturating_mul(loss.total.avg).max(Decimal::ZERO);

        let has_controls = !controls.is_empty();
        let (residual_risk, control_reduction) = if has_controls {
            let residual = inherent_risk
                .saturating_mul(Decimal::ONE - effect.reduction)
                .max(Decimal::ZERO);
            (residual, effect.reduction)
        } else {
            (inherent_risk, Decimal::ZERO)
        };

        let base_risk = if has_controls {
            residual_risk
        } else {
            inherent_risk
        };
        let monte_carlo_results = self.exposure.summarize(&ExposureInput {
            base_risk,
            params,
            cost_modules,
            control_reduction,
        });

        info!(
            inherent_risk = %inherent_risk,
            residual_risk = %residual_risk,
            susceptibility = %inherent_susceptibility,
            lef = %lef,
            controls = controls.len(),
            cost_modules = cost_modules.len(),
            exposure_model = self.exposure.name(),
            "Quantified risk"
        );

        CalculationResult {
            inherent_risk,
            residual_risk,
            susceptibility: inherent_susceptibility,
            loss_magnitude: loss.total,
            secondary_loss_magnitude: loss.secondary,
            monte_carlo_results,
            resistance_strength: effect.resistance,
            loss_event_frequency: lef,
            residual_susceptibility,
            control_boost: effect.boost,
        }
    }
}

impl Default for RiskQuantifier {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl fmt::Debug for RiskQuantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiskQuantifier")
            .field("config", &self.config)
            .field("exposure", &self.exposure.name())
            .finish()
    }
}

/// Quantify one risk with the default engine configuration
pub fn quantify(
    params: &FairScenarioParams,
    controls: &[ControlRecord],
    cost_modules: &[CostModuleAssignment],
) -> CalculationResult {
    RiskQuantifier::default().quantify(params, controls, cost_modules)
}

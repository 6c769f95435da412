//! Annualized loss exposure distribution
//!
//! Two models implement [`ExposureModel`]:
//!
//! - **PercentileFan** (default): fixed multiples of the point-estimate risk.
//!   Nothing is sampled; `mean` and `p50` equal the base risk.
//! - **MonteCarloSimulator**: draws every FAIR factor from a PERT distribution
//!   over its min/avg/max range and runs each draw through the same
//!   susceptibility, frequency and loss-magnitude math as the point estimate.
//!
//! ## PERT shape
//!
//! The shape parameter follows the factor's confidence label: `low` = 2,
//! `medium` = 4 (classic PERT), `high` = 6. Higher shapes concentrate draws
//! around the most-likely value.

use crate::loss_magnitude::LossMagnitudeCalculator;
use crate::susceptibility::{loss_event_frequency, SusceptibilityModel};
use fairquant_core::{
    Confidence, ExposureInput, ExposureModel, FairScenarioParams, FanMultipliers,
    MonteCarloResults, ScenarioRange,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Pert};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Fixed multiplicative percentile fan around the base risk
#[derive(Debug, Clone)]
pub struct PercentileFan {
    multipliers: FanMultipliers,
}

impl PercentileFan {
    /// Create a fan with the given multipliers
    pub fn new(multipliers: FanMultipliers) -> Self {
        Self { multipliers }
    }
}

impl Default for PercentileFan {
    fn default() -> Self {
        Self::new(FanMultipliers::default())
    }
}

impl ExposureModel for PercentileFan {
    fn name(&self) -> &'static str {
        "percentile_fan"
    }

    fn summarize(&self, input: &ExposureInput<'_>) -> MonteCarloResults {
        let base = input.base_risk.max(Decimal::ZERO);
        let m = &self.multipliers;
        MonteCarloResults {
            mean: base,
            p05: base.saturating_mul(m.p05),
            p25: base.saturating_mul(m.p25),
            p50: base.saturating_mul(m.p50),
            p75: base.saturating_mul(m.p75),
            p95: base.saturating_mul(m.p95),
            max: base.saturating_mul(m.max),
        }
    }
}

/// Sampler for a single FAIR factor
#[derive(Debug, Clone)]
enum FactorSampler {
    Constant(f64),
    Pert(Pert<f64>),
}

impl FactorSampler {
    fn from_range(name: &str, range: &ScenarioRange) -> Self {
        let mut values = [
            range.min.to_f64().unwrap_or(0.0),
            range.avg.to_f64().unwrap_or(0.0),
            range.max.to_f64().unwrap_or(0.0),
        ];
        if !range.is_ordered() {
            debug!(factor = name, "Sorting out-of-order range before sampling");
        }
        values.sort_by(|a, b| a.total_cmp(b));
        let [low, mode, high] = values;

        if high - low <= f64::EPSILON * high.abs().max(1.0) {
            return FactorSampler::Constant(mode);
        }

        match Pert::new_with_shape(low, high, mode, pert_shape(range.confidence)) {
            Ok(pert) => FactorSampler::Pert(pert),
            Err(e) => {
                warn!(factor = name, error = ?e, "Invalid PERT range, using most-likely value");
                FactorSampler::Constant(mode)
            }
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            FactorSampler::Constant(value) => *value,
            FactorSampler::Pert(pert) => pert.sample(rng),
        }
    }
}

fn pert_shape(confidence: Confidence) -> f64 {
    match confidence {
        Confidence::Low => 2.0,
        Confidence::Medium => 4.0,
        Confidence::High => 6.0,
    }
}

/// Samplers for every factor of a scenario
struct ScenarioSamplers {
    contact_frequency: FactorSampler,
    probability_of_action: FactorSampler,
    threat_capability: FactorSampler,
    primary_loss: FactorSampler,
    secondary_loss_event_frequency: FactorSampler,
    secondary_loss_magnitude: FactorSampler,
}

impl ScenarioSamplers {
    fn new(params: &FairScenarioParams) -> Self {
        Self {
            contact_frequency: FactorSampler::from_range(
                "contact_frequency",
                &params.contact_frequency,
            ),
            probability_of_action: FactorSampler::from_range(
                "probability_of_action",
                &params.probability_of_action,
            ),
            threat_capability: FactorSampler::from_range(
                "threat_capability",
                &params.threat_capability,
            ),
            primary_loss: FactorSampler::from_range("primary_loss", &params.primary_loss),
            secondary_loss_event_frequency: FactorSampler::from_range(
                "secondary_loss_event_frequency",
                &params.secondary_loss_event_frequency,
            ),
            secondary_loss_magnitude: FactorSampler::from_range(
                "secondary_loss_magnitude",
                &params.secondary_loss_magnitude,
            ),
        }
    }
}

/// Monte Carlo exposure model over PERT-distributed FAIR factors
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    iterations: u32,
    seed: Option<u64>,
    susceptibility: SusceptibilityModel,
    losses: LossMagnitudeCalculator,
}

impl MonteCarloSimulator {
    /// Create a simulator drawing `iterations` samples (at least one)
    ///
    /// Without a seed every call draws from fresh entropy.
    pub fn new(
        iterations: u32,
        seed: Option<u64>,
        susceptibility: SusceptibilityModel,
        losses: LossMagnitudeCalculator,
    ) -> Self {
        Self {
            iterations: iterations.max(1),
            seed,
            susceptibility,
            losses,
        }
    }

    /// Draw the annualized risk samples, sorted ascending
    fn simulate(&self, input: &ExposureInput<'_>) -> Vec<Decimal> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let samplers = ScenarioSamplers::new(input.params);
        let retained = Decimal::ONE - input.control_reduction;

        let mut samples: Vec<Decimal> = (0..self.iterations)
            .map(|_| {
                let tcap = samplers.threat_capability.sample(&mut rng);
                let susceptibility = to_decimal(self.susceptibility.logistic(tcap, 0.0));
                let lef = loss_event_frequency(
                    to_decimal(samplers.contact_frequency.sample(&mut rng)),
                    to_decimal(samplers.probability_of_action.sample(&mut rng)),
                    susceptibility,
                );
                let (total_loss, _) = self.losses.combine(
                    to_decimal(samplers.primary_loss.sample(&mut rng)),
                    to_decimal(samplers.secondary_loss_event_frequency.sample(&mut rng)),
                    to_decimal(samplers.secondary_loss_magnitude.sample(&mut rng)),
                    input.cost_modules,
                );
                lef.saturating_mul(total_loss)
                    .saturating_mul(retained)
                    .max(Decimal::ZERO)
            })
            .collect();

        samples.sort();
        samples
    }
}

impl ExposureModel for MonteCarloSimulator {
    fn name(&self) -> &'static str {
        "monte_carlo"
    }

    fn summarize(&self, input: &ExposureInput<'_>) -> MonteCarloResults {
        let samples = self.simulate(input);
        let count = Decimal::from(samples.len());
        // Summing pre-divided samples keeps the total within range
        let mean = samples
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(*s / count));

        let results = MonteCarloResults {
            mean,
            p05: percentile(&samples, 5),
            p25: percentile(&samples, 25),
            p50: percentile(&samples, 50),
            p75: percentile(&samples, 75),
            p95: percentile(&samples, 95),
            max: samples.last().copied().unwrap_or(Decimal::ZERO),
        };

        debug!(
            iterations = samples.len(),
            seeded = self.seed.is_some(),
            mean = %results.mean,
            p50 = %results.p50,
            p95 = %results.p95,
            "Simulated exposure distribution"
        );

        results
    }
}

/// Nearest-rank percentile of ascending samples
fn percentile(sorted: &[Decimal], pct: usize) -> Decimal {
    if sorted.is_empty() {
        return Decimal::ZERO;
    }
    let rank = (pct * sorted.len()).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

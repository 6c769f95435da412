//! Core data model for FAIR risk quantification
//!
//! All monetary amounts are `Decimal` currency values; frequencies are events
//! per year. Missing numeric fields deserialize to zero so callers can hand
//! partially filled records straight to the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three FAIR scenario points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioPoint {
    /// Best case
    Min,
    /// Most likely
    Avg,
    /// Worst case
    Max,
}

impl ScenarioPoint {
    /// All points in min, avg, max order
    pub const ALL: [ScenarioPoint; 3] = [
        ScenarioPoint::Min,
        ScenarioPoint::Avg,
        ScenarioPoint::Max,
    ];
}

impl fmt::Display for ScenarioPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioPoint::Min => write!(f, "min"),
            ScenarioPoint::Avg => write!(f, "avg"),
            ScenarioPoint::Max => write!(f, "max"),
        }
    }
}

/// A {min, avg, max} triple of computed values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointEstimates {
    pub min: Decimal,
    pub avg: Decimal,
    pub max: Decimal,
}

impl PointEstimates {
    pub fn new(min: Decimal, avg: Decimal, max: Decimal) -> Self {
        Self { min, avg, max }
    }

    /// The same value at every point
    pub fn uniform(value: Decimal) -> Self {
        Self::new(value, value, value)
    }

    /// Build a triple by evaluating `f` at each point
    pub fn from_fn(mut f: impl FnMut(ScenarioPoint) -> Decimal) -> Self {
        Self {
            min: f(ScenarioPoint::Min),
            avg: f(ScenarioPoint::Avg),
            max: f(ScenarioPoint::Max),
        }
    }

    pub fn get(&self, point: ScenarioPoint) -> Decimal {
        match point {
            ScenarioPoint::Min => self.min,
            ScenarioPoint::Avg => self.avg,
            ScenarioPoint::Max => self.max,
        }
    }

    pub fn map(&self, mut f: impl FnMut(Decimal) -> Decimal) -> Self {
        Self::new(f(self.min), f(self.avg), f(self.max))
    }
}

/// Qualitative confidence attached to an estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

/// Stored estimate for a single FAIR factor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioRange {
    /// Best-case value
    pub min: Decimal,
    /// Most-likely value
    pub avg: Decimal,
    /// Worst-case value
    pub max: Decimal,
    /// Estimator confidence in the range
    pub confidence: Confidence,
}

impl ScenarioRange {
    pub fn new(min: Decimal, avg: Decimal, max: Decimal) -> Self {
        Self {
            min,
            avg,
            max,
            confidence: Confidence::default(),
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn point(&self, point: ScenarioPoint) -> Decimal {
        match point {
            ScenarioPoint::Min => self.min,
            ScenarioPoint::Avg => self.avg,
            ScenarioPoint::Max => self.max,
        }
    }

    pub fn estimates(&self) -> PointEstimates {
        PointEstimates::new(self.min, self.avg, self.max)
    }

    /// Whether `min <= avg <= max` holds
    pub fn is_ordered(&self) -> bool {
        self.min <= self.avg && self.avg <= self.max
    }
}

/// FAIR input parameters for one risk scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairScenarioParams {
    /// Threat contact events per year (CF)
    pub contact_frequency: ScenarioRange,
    /// Probability a contact becomes an action, 0-1 (POA)
    pub probability_of_action: ScenarioRange,
    /// Threat capability, 0-10 scale (TCap)
    pub threat_capability: ScenarioRange,
    /// Baseline resistance strength, 0-10 scale (RS)
    pub resistance_strength: ScenarioRange,
    /// Primary loss magnitude per event (PL)
    pub primary_loss: ScenarioRange,
    /// Secondary loss events per primary event (SLEF)
    pub secondary_loss_event_frequency: ScenarioRange,
    /// Secondary loss magnitude per secondary event (SLM)
    pub secondary_loss_magnitude: ScenarioRange,
}

impl FairScenarioParams {
    /// Factors as (name, range) pairs, for diagnostics
    pub fn factors(&self) -> [(&'static str, &ScenarioRange); 7] {
        [
            ("contact_frequency", &self.contact_frequency),
            ("probability_of_action", &self.probability_of_action),
            ("threat_capability", &self.threat_capability),
            ("resistance_strength", &self.resistance_strength),
            ("primary_loss", &self.primary_loss),
            (
                "secondary_loss_event_frequency",
                &self.secondary_loss_event_frequency,
            ),
            ("secondary_loss_magnitude", &self.secondary_loss_magnitude),
        ]
    }
}

/// Implementation status of an applied control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationStatus {
    NotImplemented,
    Planned,
    InProgress,
    FullyImplemented,
    /// Any status string this engine does not recognise
    #[serde(other)]
    Unknown,
}

/// A control applied to a risk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Effectiveness on a 0-10 scale
    pub control_effectiveness: Decimal,
    pub implementation_status: Option<ImplementationStatus>,
}

impl ControlRecord {
    pub fn new(control_effectiveness: Decimal, status: ImplementationStatus) -> Self {
        Self {
            control_effectiveness,
            implementation_status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// How a cost-module accrues cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    /// Flat one-time amount
    Fixed,
    /// Flat amount per event; the event multiplier is applied by the aggregator
    PerEvent,
    /// Hourly rate times hours spent per event
    PerHour,
    /// Fraction (0-1) of the loss magnitude
    Percentage,
    /// Unrecognised type; always valuates to zero
    #[serde(other)]
    Unknown,
}

impl FromStr for CostType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "fixed" => CostType::Fixed,
            "per_event" => CostType::PerEvent,
            "per_hour" => CostType::PerHour,
            "percentage" => CostType::Percentage,
            _ => CostType::Unknown,
        })
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CostType::Fixed => "fixed",
            CostType::PerEvent => "per_event",
            CostType::PerHour => "per_hour",
            CostType::Percentage => "percentage",
            CostType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A reusable cost-accrual rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModule {
    pub name: String,
    pub cost_type: CostType,
    /// Currency amount, or a 0-1 fraction for `Percentage`
    #[serde(default)]
    pub cost_factor: Decimal,
}

impl CostModule {
    pub fn new(name: impl Into<String>, cost_type: CostType, cost_factor: Decimal) -> Self {
        Self {
            name: name.into(),
            cost_type,
            cost_factor,
        }
    }
}

/// Execution context for cost valuation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostContext {
    /// Hours spent per event; falls back to the engine default when unset
    pub hours_per_event: Option<Decimal>,
}

impl CostContext {
    pub fn with_hours(hours_per_event: Decimal) -> Self {
        Self {
            hours_per_event: Some(hours_per_event),
        }
    }
}

fn default_weight() -> Decimal {
    Decimal::ONE
}

/// A cost-module assigned to a risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModuleAssignment {
    pub module: CostModule,
    /// Materiality weight
    #[serde(default = "default_weight")]
    pub weight: Decimal,
    #[serde(default)]
    pub context: CostContext,
}

impl CostModuleAssignment {
    pub fn new(module: CostModule) -> Self {
        Self {
            module,
            weight: default_weight(),
            context: CostContext::default(),
        }
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_context(mut self, context: CostContext) -> Self {
        self.context = context;
        self
    }
}

/// Summary statistics of the annualized exposure distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarloResults {
    pub mean: Decimal,
    pub p05: Decimal,
    pub p25: Decimal,
    pub p50: Decimal,
    pub p75: Decimal,
    pub p95: Decimal,
    pub max: Decimal,
}

/// Output of one quantification call
///
/// Field names are part of the persistence contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Annualized loss exposure without controls
    pub inherent_risk: Decimal,
    /// Annualized loss exposure after controls
    pub residual_risk: Decimal,
    /// Probability a threat event becomes a loss event, ignoring resistance
    pub susceptibility: Decimal,
    /// Total loss per event (primary + secondary)
    pub loss_magnitude: PointEstimates,
    /// Secondary loss per event
    pub secondary_loss_magnitude: PointEstimates,
    pub monte_carlo_results: MonteCarloResults,
    /// Control-boosted resistance strength, for display
    pub resistance_strength: PointEstimates,
    /// Loss events per year, ignoring resistance
    pub loss_event_frequency: Decimal,
    /// Susceptibility against the boosted average resistance
    pub residual_susceptibility: Decimal,
    /// Average implementation-adjusted control effectiveness
    pub control_boost: Decimal,
}

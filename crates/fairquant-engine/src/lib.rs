//! FAIR quantification engine
//!
//! Deterministic, stateless calculation of inherent and residual annualized
//! cyber risk from FAIR scenario parameters, applied controls and assigned
//! cost-modules.
//!
//! ## Components
//!
//! - **Cost-modules**: value a single cost-module for one incident
//! - **Secondary loss**: aggregate assigned cost-modules per scenario point
//! - **Loss magnitude**: primary + secondary loss per event
//! - **Controls**: average implementation-adjusted effectiveness
//! - **Susceptibility**: logistic TCap vs resistance transform
//! - **Exposure**: percentile fan or Monte Carlo distribution of annual loss
//! - **Quantifier**: ties the above into a [`CalculationResult`]
//!
//! [`CalculationResult`]: fairquant_core::CalculationResult

pub mod control;
pub mod cost_module;
pub mod exposure;
pub mod loss_magnitude;
pub mod quantifier;
pub mod secondary_loss;
pub mod susceptibility;

pub use control::{ControlEffect, ControlEffectivenessAggregator};
pub use cost_module::CostModuleValuator;
pub use exposure::{MonteCarloSimulator, PercentileFan};
pub use loss_magnitude::{LossMagnitude, LossMagnitudeCalculator, SecondaryLossSource};
pub use quantifier::{quantify, RiskQuantifier};
pub use secondary_loss::SecondaryLossAggregator;
pub use susceptibility::{loss_event_frequency, SusceptibilityModel};

//! Quantify CLI command: run every risk of a scenario file through the engine

use super::format_money;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use comfy_table::{
    presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
};
use fairquant_core::{CalculationResult, EngineConfig, ExposureModelKind, ScenarioFile};
use fairquant_engine::RiskQuantifier;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default engine configuration path
const DEFAULT_CONFIG_PATH: &str = "config/fairquant.toml";

/// Quantify inherent and residual risk for a scenario file
#[derive(Debug, Args)]
pub struct QuantifyCommand {
    /// Scenario file (TOML) with one or more [[risks]] entries
    pub scenario_file: PathBuf,

    /// Engine configuration file
    #[arg(long, short, env = "FAIRQUANT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: OutputFormat,

    /// Use Monte Carlo sampling for the exposure distribution
    #[arg(long)]
    pub sampled: bool,

    /// Number of Monte Carlo iterations
    #[arg(long)]
    pub iterations: Option<u32>,

    /// RNG seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One quantified risk
struct QuantifiedRisk<'a> {
    id: &'a str,
    label: &'a str,
    result: CalculationResult,
}

impl QuantifyCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let scenarios = ScenarioFile::from_file(&self.scenario_file).with_context(|| {
            format!(
                "Failed to load scenario file: {}",
                self.scenario_file.display()
            )
        })?;

        let quantifier = RiskQuantifier::try_new(config)
            .context("Invalid engine configuration")?;
        info!(
            risks = scenarios.risks.len(),
            exposure_model = quantifier.exposure_model(),
            "Quantifying scenario file"
        );

        let quantified: Vec<QuantifiedRisk<'_>> = scenarios
            .risks
            .iter()
            .map(|risk| QuantifiedRisk {
                id: &risk.id,
                label: risk.label(),
                result: quantifier.quantify(&risk.params, &risk.controls, &risk.cost_modules),
            })
            .collect();

        match self.format {
            OutputFormat::Table => output_table(&quantified, quantifier.exposure_model()),
            OutputFormat::Json => output_json(&quantified, quantifier.exposure_model())?,
        }

        Ok(())
    }

    /// Load the engine configuration and apply command-line overrides
    fn load_config(&self) -> Result<EngineConfig> {
        let mut config = load_engine_config(&self.config)?;

        if self.sampled {
            config.exposure.model = ExposureModelKind::Sampled;
        }
        if let Some(iterations) = self.iterations {
            config.exposure.iterations = iterations;
        }
        if self.seed.is_some() {
            config.exposure.seed = self.seed;
        }

        config
            .validate()
            .context("Invalid exposure options")?;
        Ok(config)
    }
}

/// Load engine configuration, falling back to defaults when the file is absent
fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    if path.exists() {
        EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(EngineConfig::default())
    }
}

fn output_table(risks: &[QuantifiedRisk<'_>], exposure_model: &str) {
    println!();
    println!("Risk Quantification ({})", exposure_model);
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Inherent").add_attribute(Attribute::Bold),
            Cell::new("Residual").add_attribute(Attribute::Bold),
            Cell::new("Reduction").add_attribute(Attribute::Bold),
            Cell::new("Susceptibility").add_attribute(Attribute::Bold),
            Cell::new("LEF").add_attribute(Attribute::Bold),
            Cell::new("P05").add_attribute(Attribute::Bold),
            Cell::new("P50").add_attribute(Attribute::Bold),
            Cell::new("P95").add_attribute(Attribute::Bold),
        ]);

    let mut total_inherent = Decimal::ZERO;
    let mut total_residual = Decimal::ZERO;

    for risk in risks {
        let r = &risk.result;
        total_inherent += r.inherent_risk;
        total_residual += r.residual_risk;

        let residual_color = if r.residual_risk < r.inherent_risk {
            Color::Green
        } else {
            Color::Reset
        };

        table.add_row(vec![
            Cell::new(risk.label),
            money_cell(r.inherent_risk),
            money_cell(r.residual_risk).fg(residual_color),
            Cell::new(format_reduction(r.inherent_risk, r.residual_risk))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", r.susceptibility)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", r.loss_event_frequency))
                .set_alignment(CellAlignment::Right),
            money_cell(r.monte_carlo_results.p05),
            money_cell(r.monte_carlo_results.p50),
            money_cell(r.monte_carlo_results.p95),
        ]);
    }

    if risks.len() > 1 {
        table.add_row(vec![
            Cell::new("TOTAL").add_attribute(Attribute::Bold),
            money_cell(total_inherent).add_attribute(Attribute::Bold),
            money_cell(total_residual).add_attribute(Attribute::Bold),
            Cell::new(format_reduction(total_inherent, total_residual))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
        ]);
    }

    println!("{table}");
    println!();
}

fn output_json(risks: &[QuantifiedRisk<'_>], exposure_model: &str) -> Result<()> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct RiskReport<'a> {
        name: &'a str,
        #[serde(flatten)]
        result: &'a CalculationResult,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Output<'a> {
        exposure_model: &'a str,
        risks: BTreeMap<&'a str, RiskReport<'a>>,
    }

    let output = Output {
        exposure_model,
        risks: risks
            .iter()
            .map(|risk| {
                (
                    risk.id,
                    RiskReport {
                        name: risk.label,
                        result: &risk.result,
                    },
                )
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output)?;
    println!("{}", json);
    Ok(())
}

fn money_cell(value: Decimal) -> Cell {
    Cell::new(format_money(value)).set_alignment(CellAlignment::Right)
}

/// Share of inherent risk removed by controls, as a percentage
fn format_reduction(inherent: Decimal, residual: Decimal) -> String {
    if inherent.is_zero() {
        return "-".to_string();
    }
    let pct = (inherent - residual) / inherent * Decimal::ONE_HUNDRED;
    format!("{:.1}%", pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_reduction() {
        assert_eq!(format_reduction(dec!(60000), dec!(36000)), "40.0%");
        assert_eq!(format_reduction(dec!(100), dec!(100)), "0.0%");
        assert_eq!(format_reduction(Decimal::ZERO, Decimal::ZERO), "-");
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let config = load_engine_config(Path::new("does/not/exist/fairquant.toml"))
            .expect("missing config should fall back");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_overrides_are_validated() {
        let cmd = QuantifyCommand {
            scenario_file: PathBuf::from("risks.toml"),
            config: PathBuf::from("does/not/exist/fairquant.toml"),
            format: OutputFormat::Table,
            sampled: true,
            iterations: Some(0),
            seed: None,
        };
        assert!(cmd.load_config().is_err());

        let cmd = QuantifyCommand {
            iterations: Some(250),
            seed: Some(3),
            ..cmd
        };
        let config = cmd.load_config().expect("valid overrides");
        assert_eq!(config.exposure.model, ExposureModelKind::Sampled);
        assert_eq!(config.exposure.iterations, 250);
        assert_eq!(config.exposure.seed, Some(3));
    }
}

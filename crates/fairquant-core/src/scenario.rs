//! Scenario files: batches of risks to quantify
//!
//! A scenario file is TOML with one `[[risks]]` table per risk:
//!
//! ```toml
//! [[risks]]
//! id = "phishing"
//! name = "Credential phishing"
//!
//! [risks.params.contact_frequency]
//! min = 10
//! avg = 20
//! max = 40
//!
//! [[risks.controls]]
//! control_effectiveness = 8
//! implementation_status = "fully_implemented"
//!
//! [[risks.cost_modules]]
//! module = { name = "Forensics", cost_type = "per_hour", cost_factor = 250 }
//! ```

use crate::error::ScenarioError;
use crate::types::{ControlRecord, CostModuleAssignment, FairScenarioParams};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One risk and the inputs needed to quantify it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScenario {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub params: FairScenarioParams,
    #[serde(default)]
    pub controls: Vec<ControlRecord>,
    #[serde(default)]
    pub cost_modules: Vec<CostModuleAssignment>,
}

impl RiskScenario {
    /// Display label: the name if present, otherwise the id
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A parsed scenario file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub risks: Vec<RiskScenario>,
}

impl ScenarioFile {
    /// Parse scenario TOML, rejecting empty files and duplicate ids
    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = toml::from_str(content)?;
        if file.risks.is_empty() {
            return Err(ScenarioError::Empty);
        }

        let mut seen = HashSet::new();
        for risk in &file.risks {
            if !seen.insert(risk.id.as_str()) {
                return Err(ScenarioError::DuplicateRisk(risk.id.clone()));
            }
        }

        Ok(file)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CostType, ImplementationStatus};
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
        [[risks]]
        id = "phishing"
        name = "Credential phishing"

        [risks.params.contact_frequency]
        min = 10
        avg = 20
        max = 40
        confidence = "high"

        [risks.params.primary_loss]
        avg = 5000

        [[risks.controls]]
        control_effectiveness = 8
        implementation_status = "fully_implemented"

        [[risks.cost_modules]]
        weight = 0.5
        module = { name = "Forensics", cost_type = "per_hour", cost_factor = 250 }
        context = { hours_per_event = 12 }

        [[risks]]
        id = "ransomware"
    "#;

    #[test]
    fn test_parse_scenario_file() {
        let file = ScenarioFile::from_toml_str(SAMPLE).unwrap();
        assert_eq!(file.risks.len(), 2);

        let phishing = &file.risks[0];
        assert_eq!(phishing.label(), "Credential phishing");
        assert_eq!(phishing.params.contact_frequency.avg, dec!(20));
        assert_eq!(phishing.params.primary_loss.avg, dec!(5000));
        assert_eq!(phishing.params.primary_loss.min, dec!(0));
        assert_eq!(
            phishing.controls[0].implementation_status,
            Some(ImplementationStatus::FullyImplemented)
        );

        let assignment = &phishing.cost_modules[0];
        assert_eq!(assignment.module.cost_type, CostType::PerHour);
        assert_eq!(assignment.weight, dec!(0.5));
        assert_eq!(assignment.context.hours_per_event, Some(dec!(12)));

        let ransomware = &file.risks[1];
        assert_eq!(ransomware.label(), "ransomware");
        assert!(ransomware.controls.is_empty());
        assert_eq!(ransomware.params, FairScenarioParams::default());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ScenarioFile::from_toml_str(
            r#"
            [[risks]]
            id = "a"
            [[risks]]
            id = "a"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::DuplicateRisk(ref id) if id == "a"));
    }

    #[test]
    fn test_empty_scenario_rejected() {
        assert!(matches!(
            ScenarioFile::from_toml_str("").unwrap_err(),
            ScenarioError::Empty
        ));
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Batch plan file: shared settings plus the plans to run
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub plans: Vec<PlanSpec>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.plans.is_empty() {
            return Err(ValidationError::InvalidPlans(
                "at least one plan is required".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for plan in &self.plans {
            plan.validate()?;
            if !names.insert(plan.name.as_str()) {
                return Err(ValidationError::InvalidPlan {
                    name: plan.name.clone(),
                    reason: "plan names must be unique".to_string(),
                });
            }
        }

        if let Some(dir) = &self.general.output_dir {
            if dir.trim().is_empty() {
                return Err(ValidationError::InvalidGeneral(
                    "output_dir cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Settings shared by every plan of a batch
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeneralConfig {
    /// Directory receiving one JSON report per plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

/// One plan: a parent network and the demands to carve from it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlanSpec {
    pub name: String,
    /// `a.b.c.d` or `a.b.c.d/p`
    pub network: String,
    /// Overrides both a `/p` suffix and the class default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<u8>,
    /// Demand config string, e.g. `"40:300 10:100x2"`
    pub demands: String,
}

impl PlanSpec {
    fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidPlan {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        // Names become report file names
        if self.name.contains(['/', '\\']) {
            return Err(invalid("name cannot contain path separators"));
        }
        if self.network.trim().is_empty() {
            return Err(invalid("network cannot be empty"));
        }
        if self.demands.trim().is_empty() {
            return Err(invalid("demands cannot be empty"));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid plans section: {0}")]
    InvalidPlans(String),
    #[error("Invalid plan '{name}': {reason}")]
    InvalidPlan { name: String, reason: String },
}

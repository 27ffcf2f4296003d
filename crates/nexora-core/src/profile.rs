//! Customer profile definitions

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Customer profile, loaded once at startup and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Unique user identifier (e.g. "USR_001")
    pub user_id: String,

    /// Historic account data
    pub historic_data: HistoricData,

    /// Risk profiling outcome
    pub risk_profiling: RiskProfiling,

    /// Onboarding questionnaire answers
    pub questionnaire: Questionnaire,
}

/// Historic account data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricData {
    /// Average monthly income
    pub avg_monthly_income: f64,
}

/// Risk profiling outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfiling {
    /// Risk category, e.g. "Low", "Moderate", "High"
    pub tolerance: String,

    /// Persona description
    pub requirement: String,
}

/// Questionnaire answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    /// Free-text financial goal
    pub goals: String,
}

impl CustomerProfile {
    /// Create a new profile
    pub fn new(
        user_id: impl Into<String>,
        avg_monthly_income: f64,
        tolerance: impl Into<String>,
        requirement: impl Into<String>,
        goals: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            historic_data: HistoricData { avg_monthly_income },
            risk_profiling: RiskProfiling {
                tolerance: tolerance.into(),
                requirement: requirement.into(),
            },
            questionnaire: Questionnaire {
                goals: goals.into(),
            },
        }
    }

    pub fn monthly_income(&self) -> f64 {
        self.historic_data.avg_monthly_income
    }

    pub fn risk_tolerance(&self) -> &str {
        &self.risk_profiling.tolerance
    }

    pub fn financial_goal(&self) -> &str {
        &self.questionnaire.goals
    }

    /// Check the invariants a loaded profile must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(CoreError::InvalidProfile("empty user_id".to_string()));
        }
        if !self.historic_data.avg_monthly_income.is_finite() {
            return Err(CoreError::InvalidProfile(format!(
                "{}: avg_monthly_income is not a finite number",
                self.user_id
            )));
        }
        Ok(())
    }
}

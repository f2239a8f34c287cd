use std::fmt;

use serde::{Deserialize, Serialize};

use super::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::MediumRisk => "Medium Risk",
            Self::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub compliance_score: u8,
    pub risk_level: RiskLevel,
    /// Detection order; repeated kinds are kept.
    pub violations: Vec<Violation>,
}

impl EvaluationResult {
    /// Violations ordered by descending impact; ties keep detection order.
    #[must_use]
    pub fn ranked(&self) -> Vec<&Violation> {
        let mut ranked: Vec<&Violation> = self.violations.iter().collect();
        ranked.sort_by(|a, b| b.impact_score().cmp(&a.impact_score()));
        ranked
    }

    #[must_use]
    pub fn count_of(&self, kind: &str) -> usize {
        self.violations.iter().filter(|v| v.kind() == kind).count()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

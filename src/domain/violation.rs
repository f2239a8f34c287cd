use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RegulationRef, RuleDefinition};
use crate::engine::catalog::{
    DEFAULT_EVIDENCE, DETERMINISTIC_CONFIDENCE, IMPACT_MULTIPLIER, MAX_IMPACT_SCORE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!(
                "Invalid severity '{s}'. Must be one of: low, medium, high, critical"
            )),
        }
    }
}

/// Review state of a violation. The engine only ever creates `Open` violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViolationStatus {
    #[default]
    Open,
    Reviewed,
    Resolved,
    FalsePositive,
}

impl fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "Open",
            Self::Reviewed => "Reviewed",
            Self::Resolved => "Resolved",
            Self::FalsePositive => "FalsePositive",
        };
        f.write_str(s)
    }
}

/// A single detection event against a product listing.
///
/// Violations are values: once built, nothing in the engine changes them.
/// A review workflow produces a new value through [`Violation::with_status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    kind: String,
    severity: Severity,
    description: String,
    evidence: String,
    confidence: f64,
    impact_score: u8,
    status: ViolationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    regulation_mapping: Option<RegulationRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_fix: Option<String>,
}

impl Violation {
    /// Start a violation of `kind` scored by `rule`.
    ///
    /// `kind` is kept verbatim even when `rule` is the catalog fallback, so
    /// externally sourced kinds survive into the output.
    #[must_use]
    pub fn builder<'a>(kind: &str, rule: &'a RuleDefinition) -> ViolationBuilder<'a> {
        ViolationBuilder {
            kind: kind.to_string(),
            rule,
            description: None,
            evidence: None,
            confidence: DETERMINISTIC_CONFIDENCE,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn evidence(&self) -> &str {
        &self.evidence
    }

    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn impact_score(&self) -> u8 {
        self.impact_score
    }

    #[must_use]
    pub fn status(&self) -> ViolationStatus {
        self.status
    }

    #[must_use]
    pub fn regulation_mapping(&self) -> Option<&RegulationRef> {
        self.regulation_mapping.as_ref()
    }

    #[must_use]
    pub fn suggested_fix(&self) -> Option<&str> {
        self.suggested_fix.as_deref()
    }

    #[must_use]
    pub fn with_status(self, status: ViolationStatus) -> Self {
        Self { status, ..self }
    }
}

pub struct ViolationBuilder<'a> {
    kind: String,
    rule: &'a RuleDefinition,
    description: Option<String>,
    evidence: Option<String>,
    confidence: f64,
}

impl ViolationBuilder<'_> {
    /// Replace the catalog description with a detection-specific one.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    /// Confidence is clamped to [0.0, 1.0]; NaN becomes 0.0.
    #[must_use]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    #[must_use]
    pub fn build(self) -> Violation {
        Violation {
            impact_score: impact_score(self.rule.weight, self.confidence),
            kind: self.kind,
            severity: self.rule.severity,
            description: self
                .description
                .unwrap_or_else(|| self.rule.description.to_string()),
            evidence: self.evidence.unwrap_or_else(|| DEFAULT_EVIDENCE.to_string()),
            confidence: self.confidence,
            status: ViolationStatus::Open,
            regulation_mapping: self.rule.regulation.clone(),
            suggested_fix: self.rule.suggested_fix.as_ref().map(ToString::to_string),
        }
    }
}

/// `weight x confidence x 2`, truncated toward zero and capped at 100.
#[must_use]
pub fn impact_score(weight: u8, confidence: f64) -> u8 {
    let raw = f64::from(weight) * confidence * IMPACT_MULTIPLIER;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let impact = raw.trunc().clamp(0.0, f64::from(MAX_IMPACT_SCORE)) as u8;
    impact
}

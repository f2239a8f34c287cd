use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{EvaluationResult, RiskLevel, Severity};
use crate::engine::SemanticSignal;

/// Explanation and rollup of a semantic analyzer reply that raised a concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticSummary {
    pub explanation: String,
    pub confidence: f64,
    pub impact_score: u8,
    pub risk_score: u8,
}

impl SemanticSummary {
    /// `None` when the signal flags nothing.
    #[must_use]
    pub fn from_signal(signal: &SemanticSignal) -> Option<Self> {
        if signal.is_empty() {
            return None;
        }
        let assessment = signal.assess();
        Some(Self {
            explanation: signal.explain(),
            confidence: assessment.confidence,
            impact_score: assessment.impact_score,
            risk_score: signal.risk_score,
        })
    }
}

/// One evaluated listing, labelled for display.
#[derive(Debug, Clone, Serialize)]
pub struct ListingReport {
    pub title: String,
    #[serde(flatten)]
    pub result: EvaluationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticSummary>,
}

impl ListingReport {
    #[must_use]
    pub fn new(title: impl Into<String>, result: EvaluationResult) -> Self {
        Self {
            title: title.into(),
            result,
            semantic: None,
        }
    }

    #[must_use]
    pub fn with_semantic(mut self, semantic: Option<SemanticSummary>) -> Self {
        self.semantic = semantic;
        self
    }
}

/// Aggregate figures over a set of evaluations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViolationStats {
    pub listings: usize,
    pub total_violations: usize,
    pub avg_confidence: f64,
    pub avg_impact: f64,
    pub avg_score: f64,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_risk: BTreeMap<RiskLevel, usize>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        round2(sum / count as f64)
    }
}

impl ViolationStats {
    #[must_use]
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a EvaluationResult>,
    {
        let mut stats = Self::default();
        let mut confidence_sum = 0.0;
        let mut impact_sum = 0.0;
        let mut score_sum = 0.0;

        for result in results {
            stats.listings += 1;
            score_sum += f64::from(result.compliance_score);
            *stats.by_risk.entry(result.risk_level).or_default() += 1;

            for v in &result.violations {
                stats.total_violations += 1;
                confidence_sum += v.confidence();
                impact_sum += f64::from(v.impact_score());
                *stats.by_severity.entry(v.severity()).or_default() += 1;
            }
        }

        stats.avg_confidence = mean(confidence_sum, stats.total_violations);
        stats.avg_impact = mean(impact_sum, stats.total_violations);
        stats.avg_score = mean(score_sum, stats.listings);
        stats
    }

    #[must_use]
    pub fn count_with_risk(&self, risk: RiskLevel) -> usize {
        self.by_risk.get(&risk).copied().unwrap_or(0)
    }
}

use crate::domain::{RiskLevel, Violation};
use crate::engine::catalog::{RuleCatalog, HIGH_RISK_BELOW, MAX_SCORE, SAFE_FROM};

/// Reduces a violation list to a 0-100 compliance score and a risk tier.
///
/// Every violation subtracts the full catalog weight of its kind, repeats
/// included. Unknown kinds cost the catalog's fallback weight.
#[derive(Debug, Clone, Copy)]
pub struct ScoreAggregator<'a> {
    catalog: &'a RuleCatalog,
}

impl<'a> ScoreAggregator<'a> {
    #[must_use]
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn penalty(&self, violations: &[Violation]) -> u32 {
        violations
            .iter()
            .map(|v| u32::from(self.catalog.weight(v.kind())))
            .sum()
    }

    #[must_use]
    pub fn score(&self, violations: &[Violation]) -> u8 {
        let remaining = u32::from(MAX_SCORE).saturating_sub(self.penalty(violations));
        u8::try_from(remaining).unwrap_or(MAX_SCORE)
    }

    #[must_use]
    pub fn risk_level(score: u8) -> RiskLevel {
        if score < HIGH_RISK_BELOW {
            RiskLevel::HighRisk
        } else if score < SAFE_FROM {
            RiskLevel::MediumRisk
        } else {
            RiskLevel::Safe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::kinds;

    fn violations(kinds: &[&str]) -> Vec<Violation> {
        let catalog = RuleCatalog::builtin();
        kinds.iter().map(|k| catalog.violation(k).build()).collect()
    }

    #[test]
    fn test_empty_is_perfect() {
        let agg = ScoreAggregator::new(RuleCatalog::builtin());
        assert_eq!(agg.score(&[]), 100);
        assert_eq!(ScoreAggregator::risk_level(100), RiskLevel::Safe);
    }

    #[test]
    fn test_additive_without_dedup() {
        let agg = ScoreAggregator::new(RuleCatalog::builtin());
        let v = violations(&[kinds::RESTRICTED_KEYWORD, kinds::RESTRICTED_KEYWORD]);
        assert_eq!(agg.score(&v), 40);
    }

    #[test]
    fn test_clamped_at_zero() {
        let agg = ScoreAggregator::new(RuleCatalog::builtin());
        let v = violations(&[
            kinds::INAPPROPRIATE_CONTENT,
            kinds::BRAND_INFRINGEMENT,
            kinds::IMAGE_MISMATCH,
        ]);
        assert_eq!(agg.penalty(&v), 130);
        assert_eq!(agg.score(&v), 0);
    }

    #[test]
    fn test_unknown_kind_costs_fallback_weight() {
        let agg = ScoreAggregator::new(RuleCatalog::builtin());
        assert_eq!(agg.score(&violations(&["SOMETHING_NEW"])), 90);
    }

    #[test]
    fn test_risk_boundaries() {
        assert_eq!(ScoreAggregator::risk_level(0), RiskLevel::HighRisk);
        assert_eq!(ScoreAggregator::risk_level(59), RiskLevel::HighRisk);
        assert_eq!(ScoreAggregator::risk_level(60), RiskLevel::MediumRisk);
        assert_eq!(ScoreAggregator::risk_level(84), RiskLevel::MediumRisk);
        assert_eq!(ScoreAggregator::risk_level(85), RiskLevel::Safe);
        assert_eq!(ScoreAggregator::risk_level(100), RiskLevel::Safe);
    }
}

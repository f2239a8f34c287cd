use regex::Regex;

use crate::domain::{ProductRecord, Violation};
use crate::engine::catalog::RuleCatalog;
use crate::engine::Checker;

/// A configured rule whose kind fires when `pattern` matches the listing text.
#[derive(Debug, Clone)]
pub struct CompiledCustomRule {
    pub key: String,
    pub pattern: Regex,
}

/// Runs every configured pattern rule against title + description.
#[derive(Debug, Clone, Default)]
pub struct CustomPatternChecker {
    rules: Vec<CompiledCustomRule>,
}

impl CustomPatternChecker {
    #[must_use]
    pub fn new(rules: Vec<CompiledCustomRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Checker for CustomPatternChecker {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn check(&self, record: &ProductRecord, catalog: &RuleCatalog) -> Vec<Violation> {
        let text = record.full_text();
        self.rules
            .iter()
            .filter_map(|rule| {
                let mat = rule.pattern.find(&text)?;
                Some(
                    catalog
                        .violation(&rule.key)
                        .evidence(format!("Matched '{}'", mat.as_str()))
                        .build(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_rule_fires_once_per_rule() {
        let checker = CustomPatternChecker::new(vec![CompiledCustomRule {
            key: "WARRANTY_CLAIM".to_string(),
            pattern: Regex::new(r"(?i)\blifetime warranty\b").unwrap(),
        }]);
        let record = ProductRecord::new("Steel kettle, Lifetime Warranty")
            .with_description("lifetime warranty included");
        let v = checker.check(&record, RuleCatalog::builtin());
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind(), "WARRANTY_CLAIM");
        assert_eq!(v[0].evidence(), "Matched 'Lifetime Warranty'");
    }

    #[test]
    fn test_no_match_no_violation() {
        let checker = CustomPatternChecker::new(vec![CompiledCustomRule {
            key: "WARRANTY_CLAIM".to_string(),
            pattern: Regex::new(r"warranty").unwrap(),
        }]);
        assert!(checker
            .check(&ProductRecord::new("Steel kettle 1.5L"), RuleCatalog::builtin())
            .is_empty());
    }
}

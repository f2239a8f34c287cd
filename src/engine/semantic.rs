use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::domain::{ProductRecord, Violation};
use crate::engine::catalog::{
    kinds, RuleCatalog, MAX_IMPACT_SCORE, SEMANTIC_MISLEADING_TERM_CONFIDENCE,
    SEMANTIC_PROHIBITED_CONTENT_CONFIDENCE, SEMANTIC_SUSPICIOUS_PRICING_CONFIDENCE,
};
use crate::engine::collaborator::CollaboratorError;
use crate::engine::Checker;

const GENERIC_EXPLANATION: &str = "Violation detected based on general pattern matching.";

/// Text-level findings reported by an external semantic analysis service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticSignal {
    #[serde(default, deserialize_with = "null_as_default")]
    pub misleading_terms: Vec<String>,
    #[serde(default)]
    pub suspicious_pricing: bool,
    #[serde(default)]
    pub prohibited_content: bool,
    /// 0-100.
    #[serde(default)]
    pub risk_score: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Aggregate certainty and impact of a semantic signal taken as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub confidence: f64,
    pub impact_score: u8,
}

impl SemanticSignal {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.misleading_terms.is_empty() && !self.suspicious_pricing && !self.prohibited_content
    }

    /// Human-readable summary of why this signal is a concern.
    #[must_use]
    pub fn explain(&self) -> String {
        let mut reasons = Vec::new();
        if !self.misleading_terms.is_empty() {
            reasons.push(format!(
                "Found misleading terms: {}",
                self.misleading_terms.join(", ")
            ));
        }
        if self.prohibited_content {
            reasons.push("Detected prohibited content category".to_string());
        }
        if self.suspicious_pricing {
            reasons.push(
                "Pricing structure appears irregular compared to market standards".to_string(),
            );
        }
        if reasons.is_empty() {
            return GENERIC_EXPLANATION.to_string();
        }
        reasons.join(" | ")
    }

    /// Heuristic rollup of the flags and the analyzer's own risk score.
    #[must_use]
    pub fn assess(&self) -> RiskAssessment {
        let mut confidence: f64 = 0.0;
        let mut impact: u32 = 0;

        if !self.misleading_terms.is_empty() {
            confidence += 0.4;
            impact += 30;
        }
        if self.prohibited_content {
            confidence += 0.5;
            impact += 50;
        }
        if self.suspicious_pricing {
            confidence += 0.3;
            impact += 20;
        }
        impact += u32::from(self.risk_score.min(100)) / 2;
        let impact_score = u8::try_from(impact.min(u32::from(MAX_IMPACT_SCORE)))
            .unwrap_or(MAX_IMPACT_SCORE);

        RiskAssessment {
            confidence: (confidence.min(0.99) * 100.0).round() / 100.0,
            impact_score,
        }
    }
}

/// Wire form of a semantic analyzer reply: the findings, or `{"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SemanticResponse {
    Failure { error: String },
    Signal(SemanticSignal),
}

impl SemanticResponse {
    /// Parse a raw JSON reply; undecodable payloads are `Malformed`.
    pub fn from_json(raw: &str) -> Result<SemanticSignal, CollaboratorError> {
        serde_json::from_str::<Self>(raw)
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?
            .into_result()
    }

    pub fn into_result(self) -> Result<SemanticSignal, CollaboratorError> {
        match self {
            Self::Failure { error } => Err(CollaboratorError::from_message(&error)),
            Self::Signal(signal) => Ok(signal),
        }
    }
}

/// External service that reads listing text for misleading or prohibited claims.
///
/// Implementations own their transport and timeouts; a slow or broken service
/// should return an error rather than block indefinitely.
pub trait SemanticAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<SemanticSignal, CollaboratorError>;
}

impl<F> SemanticAnalyzer for F
where
    F: Fn(&str) -> Result<SemanticSignal, CollaboratorError> + Send + Sync,
{
    fn analyze(&self, text: &str) -> Result<SemanticSignal, CollaboratorError> {
        self(text)
    }
}

/// Turns semantic analyzer output into violations at fixed confidences.
#[derive(Clone)]
pub struct SemanticSignalAdapter {
    analyzer: Arc<dyn SemanticAnalyzer>,
}

impl SemanticSignalAdapter {
    pub fn new(analyzer: Arc<dyn SemanticAnalyzer>) -> Self {
        Self { analyzer }
    }

    #[must_use]
    pub fn violations_from(signal: &SemanticSignal, catalog: &RuleCatalog) -> Vec<Violation> {
        let reasoning = if signal.reasoning.trim().is_empty() {
            "Term found in text"
        } else {
            signal.reasoning.as_str()
        };

        let mut violations: Vec<Violation> = signal
            .misleading_terms
            .iter()
            .map(|term| {
                catalog
                    .violation(kinds::RESTRICTED_KEYWORD)
                    .description(format!(
                        "Semantic analysis detected misleading claim: '{term}'"
                    ))
                    .evidence(format!("Analyzer reasoning: {reasoning}"))
                    .confidence(SEMANTIC_MISLEADING_TERM_CONFIDENCE)
                    .build()
            })
            .collect();

        if signal.prohibited_content {
            violations.push(
                catalog
                    .violation(kinds::INAPPROPRIATE_CONTENT)
                    .description("Semantic analysis detected prohibited/unsafe content")
                    .evidence(format!("Analyzer reasoning: {}", signal.reasoning))
                    .confidence(SEMANTIC_PROHIBITED_CONTENT_CONFIDENCE)
                    .build(),
            );
        }

        if signal.suspicious_pricing {
            violations.push(
                catalog
                    .violation(kinds::FAKE_DISCOUNT)
                    .description("Semantic analysis flagged pricing as suspicious/fake")
                    .evidence(format!("Analyzer reasoning: {}", signal.reasoning))
                    .confidence(SEMANTIC_SUSPICIOUS_PRICING_CONFIDENCE)
                    .build(),
            );
        }

        violations
    }
}

impl Checker for SemanticSignalAdapter {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn check(&self, record: &ProductRecord, catalog: &RuleCatalog) -> Vec<Violation> {
        let text = record.full_text();
        if text.trim().is_empty() {
            debug!("blank listing text, semantic analysis skipped");
            return Vec::new();
        }

        match self.analyzer.analyze(&text) {
            Ok(signal) => {
                debug!(
                    risk_score = signal.risk_score,
                    terms = signal.misleading_terms.len(),
                    "semantic signal received"
                );
                Self::violations_from(&signal, catalog)
            }
            Err(e) => {
                warn!(collaborator = "semantic", error = %e, "no semantic signal, continuing without it");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> SemanticSignal {
        SemanticSignal {
            misleading_terms: vec!["100% cure".to_string(), "magic".to_string()],
            suspicious_pricing: true,
            prohibited_content: true,
            risk_score: 80,
            reasoning: "Medical claims without evidence".to_string(),
        }
    }

    fn record() -> ProductRecord {
        ProductRecord::new("Herbal tonic for joint pain").with_description("100% cure, magic")
    }

    #[test]
    fn test_signal_maps_to_violations() {
        let v = SemanticSignalAdapter::violations_from(&signal(), RuleCatalog::builtin());
        let kinds_seen: Vec<&str> = v.iter().map(Violation::kind).collect();
        assert_eq!(
            kinds_seen,
            vec![
                kinds::RESTRICTED_KEYWORD,
                kinds::RESTRICTED_KEYWORD,
                kinds::INAPPROPRIATE_CONTENT,
                kinds::FAKE_DISCOUNT
            ]
        );
        assert!((v[0].confidence() - 0.95).abs() < 1e-9);
        assert!((v[2].confidence() - 0.98).abs() < 1e-9);
        assert!((v[3].confidence() - 0.90).abs() < 1e-9);
        assert!(v[0].evidence().contains("Medical claims"));
        assert!(v[0].description().contains("'100% cure'"));
        assert_eq!(v[3].impact_score(), 36);
    }

    #[test]
    fn test_error_yields_no_violations() {
        let adapter = SemanticSignalAdapter::new(Arc::new(|_: &str| {
            Err::<SemanticSignal, _>(CollaboratorError::Timeout)
        }));
        assert!(adapter.check(&record(), RuleCatalog::builtin()).is_empty());
    }

    #[test]
    fn test_blank_text_skips_analyzer() {
        let adapter = SemanticSignalAdapter::new(Arc::new(|_: &str| -> Result<SemanticSignal, CollaboratorError> {
            panic!("analyzer must not be called for blank text")
        }));
        assert!(adapter
            .check(&ProductRecord::new("  "), RuleCatalog::builtin())
            .is_empty());
    }

    #[test]
    fn test_response_parses_error_object() {
        let err = SemanticResponse::from_json(r#"{"error": "timeout"}"#).unwrap_err();
        assert_eq!(err, CollaboratorError::Timeout);

        let err = SemanticResponse::from_json(r#"{"misleading_terms": [], "error": "boom"}"#)
            .unwrap_err();
        assert_eq!(err, CollaboratorError::Failed("boom".to_string()));
    }

    #[test]
    fn test_response_parses_signal() {
        let signal = SemanticResponse::from_json(
            r#"{"misleading_terms": ["miracle"], "suspicious_pricing": false,
                "prohibited_content": false, "risk_score": 40, "reasoning": "hype"}"#,
        )
        .unwrap();
        assert_eq!(signal.misleading_terms, vec!["miracle".to_string()]);
        assert_eq!(signal.risk_score, 40);
    }

    #[test]
    fn test_response_null_terms_keep_other_flags() {
        let signal = SemanticResponse::from_json(
            r#"{"misleading_terms": null, "suspicious_pricing": false,
                "prohibited_content": true, "risk_score": 70, "reasoning": null}"#,
        )
        .unwrap();
        assert!(signal.misleading_terms.is_empty());
        assert!(signal.prohibited_content);
        assert_eq!(signal.reasoning, "");

        let v = SemanticSignalAdapter::violations_from(&signal, RuleCatalog::builtin());
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind(), kinds::INAPPROPRIATE_CONTENT);
    }

    #[test]
    fn test_response_malformed() {
        assert!(matches!(
            SemanticResponse::from_json("not json"),
            Err(CollaboratorError::Malformed(_))
        ));
        assert!(matches!(
            SemanticResponse::from_json(r#"{"risk_score": 900}"#),
            Err(CollaboratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_explain() {
        assert_eq!(SemanticSignal::default().explain(), GENERIC_EXPLANATION);
        let text = signal().explain();
        assert!(text.starts_with("Found misleading terms: 100% cure, magic | "));
        assert!(text.ends_with("irregular compared to market standards"));
    }

    #[test]
    fn test_assess_caps() {
        let assessment = signal().assess();
        assert!((assessment.confidence - 0.99).abs() < 1e-9);
        assert_eq!(assessment.impact_score, 100);

        let quiet = SemanticSignal {
            risk_score: 30,
            ..SemanticSignal::default()
        }
        .assess();
        assert!(quiet.confidence.abs() < 1e-9);
        assert_eq!(quiet.impact_score, 15);
    }
}

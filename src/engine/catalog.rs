//! Rule catalog and the scoring constants every checker shares.
//!
//! The catalog is built once (see [`RuleCatalog::builtin`]) and only read
//! afterwards, so one instance can back any number of concurrent evaluations.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::{RegulationRef, RuleDefinition, Severity, ViolationBuilder};
use crate::domain::Violation;
use crate::error::{Result, ShelfwatchError};

/// Confidence of a deterministic rule match.
pub const DETERMINISTIC_CONFIDENCE: f64 = 1.0;
/// Confidence of a misleading term reported by the semantic analyzer.
pub const SEMANTIC_MISLEADING_TERM_CONFIDENCE: f64 = 0.95;
/// Confidence of a prohibited-content flag reported by the semantic analyzer.
pub const SEMANTIC_PROHIBITED_CONTENT_CONFIDENCE: f64 = 0.98;
/// Confidence of a suspicious-pricing flag reported by the semantic analyzer.
pub const SEMANTIC_SUSPICIOUS_PRICING_CONFIDENCE: f64 = 0.90;

/// `impact = weight x confidence x IMPACT_MULTIPLIER`, so weight 50 maps to 100.
pub const IMPACT_MULTIPLIER: f64 = 2.0;
pub const MAX_IMPACT_SCORE: u8 = 100;

pub const MAX_RULE_WEIGHT: u8 = 50;
/// Weight charged for a violation kind the catalog does not know.
pub const UNKNOWN_RULE_WEIGHT: u8 = 10;
pub const UNKNOWN_RULE_DESCRIPTION: &str = "Unknown Violation";
pub const DEFAULT_EVIDENCE: &str = "Rule check failed";

/// Discounts strictly above this percentage are reported as fake.
pub const FAKE_DISCOUNT_THRESHOLD_PCT: f64 = 80.0;

/// Prices with |z| above this are outliers for their category.
pub const PRICE_OUTLIER_Z_SCORE: f64 = 2.5;
pub const PRICE_OUTLIER_STRONG_Z_SCORE: f64 = 3.0;
pub const PRICE_OUTLIER_CONFIDENCE: f64 = 0.75;
pub const PRICE_OUTLIER_STRONG_CONFIDENCE: f64 = 0.90;

pub const MIN_TITLE_WORDS: usize = 3;
/// All-caps titles are only flagged when longer than this many characters.
pub const ALL_CAPS_MIN_TITLE_CHARS: usize = 10;

pub const MAX_SCORE: u8 = 100;
/// Scores below this are High Risk.
pub const HIGH_RISK_BELOW: u8 = 60;
/// Scores at or above this are Safe.
pub const SAFE_FROM: u8 = 85;

pub mod kinds {
    pub const MRP_REQUIRED: &str = "MRP_REQUIRED";
    pub const FAKE_DISCOUNT: &str = "FAKE_DISCOUNT";
    pub const PRICE_HIGHER_THAN_MRP: &str = "PRICE_HIGHER_THAN_MRP";
    pub const RESTRICTED_KEYWORD: &str = "RESTRICTED_KEYWORD";
    pub const BRAND_INFRINGEMENT: &str = "BRAND_INFRINGEMENT";
    pub const INAPPROPRIATE_CONTENT: &str = "INAPPROPRIATE_CONTENT";
    pub const IMAGE_MISMATCH: &str = "IMAGE_MISMATCH";
    pub const MISSING_IMAGE: &str = "MISSING_IMAGE";
    pub const MANDATORY_FIELD_MISSING: &str = "MANDATORY_FIELD_MISSING";
    pub const WATERMARK_DETECTED: &str = "WATERMARK_DETECTED";
    pub const TITLE_TOO_SHORT: &str = "TITLE_TOO_SHORT";
    pub const TITLE_ALL_CAPS: &str = "TITLE_ALL_CAPS";
    pub const PRICE_OUTLIER: &str = "PRICE_OUTLIER";
}

pub static BUILTIN_RULES: &[RuleDefinition] = &[
    RuleDefinition::builtin(
        kinds::MRP_REQUIRED,
        Severity::High,
        15,
        "MRP is mandatory but missing",
        RegulationRef::new("Legal Metrology Act, 2009", "Rule 6(1)"),
        "Ensure the 'mrp' field is present and greater than 0.",
    ),
    RuleDefinition::builtin(
        kinds::FAKE_DISCOUNT,
        Severity::High,
        20,
        "Discount exceeds 80% or is suspicious",
        RegulationRef::new("Consumer Protection (E-Commerce) Rules, 2020", "Rule 4(2)"),
        "Reduce the discount percentage to under 80% or justify the pricing.",
    ),
    RuleDefinition::builtin(
        kinds::PRICE_HIGHER_THAN_MRP,
        Severity::High,
        25,
        "Selling Price > MRP",
        RegulationRef::new("Legal Metrology Act, 2009", "Section 18"),
        "Selling price cannot exceed the Maximum Retail Price (MRP).",
    ),
    RuleDefinition::builtin(
        kinds::RESTRICTED_KEYWORD,
        Severity::High,
        30,
        "Product contains restricted/prohibited terms",
        RegulationRef::new("Consumer Protection Act, 2019", "Section 2(9)"),
        "Remove the prohibited term from the title or description.",
    ),
    RuleDefinition::builtin(
        kinds::BRAND_INFRINGEMENT,
        Severity::High,
        40,
        "Potential counterfeit of protected brand",
        RegulationRef::new("Trade Marks Act, 1999", "Section 29"),
        "Ensure you have authorization to use this brand name or remove it.",
    ),
    RuleDefinition::builtin(
        kinds::INAPPROPRIATE_CONTENT,
        Severity::High,
        50,
        "Inappropriate/NSFW content detected in image",
        RegulationRef::new("IT Act, 2000", "Section 67"),
        "Remove the inappropriate content immediately.",
    ),
    RuleDefinition::builtin(
        kinds::IMAGE_MISMATCH,
        Severity::High,
        40,
        "Product image does not match product title/description",
        RegulationRef::new("Consumer Protection (E-Commerce) Rules, 2020", "Rule 4(2)"),
        "Upload an image that accurately represents the product.",
    ),
    RuleDefinition::builtin(
        kinds::MISSING_IMAGE,
        Severity::Medium,
        10,
        "Product image is missing",
        RegulationRef::new("E-Commerce Guidelines", "Visuals"),
        "Upload at least one clear image of the product.",
    ),
    RuleDefinition::builtin(
        kinds::MANDATORY_FIELD_MISSING,
        Severity::Medium,
        10,
        "Category-specific mandatory field missing",
        RegulationRef::new("Consumer Protection (E-Commerce) Rules, 2020", "Rule 5"),
        "Fill in the missing mandatory attributes for this category.",
    ),
    RuleDefinition::builtin(
        kinds::WATERMARK_DETECTED,
        Severity::Low,
        5,
        "Image contains watermark/text overlay",
        RegulationRef::new("Platform Policy", "Image Guidelines"),
        "Use a clean product image without text overlays or watermarks.",
    ),
    RuleDefinition::builtin(
        kinds::TITLE_TOO_SHORT,
        Severity::Low,
        5,
        "Title is too short (< 3 words)",
        RegulationRef::new("Platform Policy", "Quality"),
        "Expand the title to be more descriptive (min 3 words).",
    ),
    RuleDefinition::builtin(
        kinds::TITLE_ALL_CAPS,
        Severity::Low,
        5,
        "Title is in ALL CAPS",
        RegulationRef::new("Platform Policy", "Quality"),
        "Use Title Case instead of ALL CAPS.",
    ),
    RuleDefinition::builtin(
        kinds::PRICE_OUTLIER,
        Severity::Medium,
        10,
        "Price is a statistical outlier for its category",
        RegulationRef::new("Platform Policy", "Pricing Integrity"),
        "Verify the listed price against the category's typical price range.",
    ),
];

static BUILTIN_CATALOG: LazyLock<RuleCatalog> =
    LazyLock::new(|| RuleCatalog::from_definitions(BUILTIN_RULES.iter().cloned()));

/// Immutable lookup table from violation kind to its scoring metadata.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: HashMap<String, RuleDefinition>,
    order: Vec<String>,
    fallback: RuleDefinition,
}

impl RuleCatalog {
    /// The process-wide catalog of built-in rules.
    #[must_use]
    pub fn builtin() -> &'static RuleCatalog {
        &BUILTIN_CATALOG
    }

    fn from_definitions(definitions: impl IntoIterator<Item = RuleDefinition>) -> Self {
        let mut rules = HashMap::new();
        let mut order = Vec::new();
        for def in definitions {
            order.push(def.key.to_string());
            rules.insert(def.key.to_string(), def);
        }
        Self {
            rules,
            order,
            fallback: RuleDefinition {
                key: Cow::Borrowed("UNKNOWN"),
                severity: Severity::Low,
                weight: UNKNOWN_RULE_WEIGHT,
                description: Cow::Borrowed(UNKNOWN_RULE_DESCRIPTION),
                regulation: None,
                suggested_fix: None,
            },
        }
    }

    /// Built-in rules extended with caller-defined ones.
    ///
    /// Custom keys may not shadow built-in keys or repeat, and weights are
    /// bounded by [`MAX_RULE_WEIGHT`].
    pub fn with_custom(custom: impl IntoIterator<Item = RuleDefinition>) -> Result<Self> {
        let mut catalog = Self::builtin().clone();
        for def in custom {
            let key = def.key.trim().to_string();
            if key.is_empty() {
                return Err(ShelfwatchError::InvalidRule {
                    key,
                    message: "rule key must not be empty".to_string(),
                });
            }
            if catalog.rules.contains_key(&key) {
                return Err(ShelfwatchError::InvalidRule {
                    key,
                    message: "rule key is already defined".to_string(),
                });
            }
            if def.weight > MAX_RULE_WEIGHT {
                return Err(ShelfwatchError::InvalidRule {
                    key,
                    message: format!("weight {} exceeds maximum {MAX_RULE_WEIGHT}", def.weight),
                });
            }
            catalog.order.push(key.clone());
            catalog.rules.insert(
                key.clone(),
                RuleDefinition {
                    key: Cow::Owned(key),
                    ..def
                },
            );
        }
        Ok(catalog)
    }

    /// Definition for `key`, or the low-severity fallback for unknown kinds.
    #[must_use]
    pub fn lookup(&self, key: &str) -> &RuleDefinition {
        self.rules.get(key).unwrap_or(&self.fallback)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    #[must_use]
    pub fn weight(&self, key: &str) -> u8 {
        self.lookup(key).weight
    }

    /// Start a violation of `kind` with its catalog defaults filled in.
    #[must_use]
    pub fn violation(&self, kind: &str) -> ViolationBuilder<'_> {
        Violation::builder(kind, self.lookup(kind))
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.order.iter().filter_map(|key| self.rules.get(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_weights() {
        let catalog = RuleCatalog::builtin();
        let expected = [
            (kinds::MRP_REQUIRED, 15),
            (kinds::FAKE_DISCOUNT, 20),
            (kinds::PRICE_HIGHER_THAN_MRP, 25),
            (kinds::RESTRICTED_KEYWORD, 30),
            (kinds::BRAND_INFRINGEMENT, 40),
            (kinds::INAPPROPRIATE_CONTENT, 50),
            (kinds::IMAGE_MISMATCH, 40),
            (kinds::MISSING_IMAGE, 10),
            (kinds::MANDATORY_FIELD_MISSING, 10),
            (kinds::WATERMARK_DETECTED, 5),
            (kinds::TITLE_TOO_SHORT, 5),
            (kinds::TITLE_ALL_CAPS, 5),
        ];
        for (key, weight) in expected {
            assert!(catalog.contains(key), "missing {key}");
            assert_eq!(catalog.weight(key), weight, "weight of {key}");
        }
    }

    #[test]
    fn test_all_builtin_weights_in_range() {
        assert!(BUILTIN_RULES.iter().all(|r| r.weight <= MAX_RULE_WEIGHT));
    }

    #[test]
    fn test_unknown_key_fallback() {
        let def = RuleCatalog::builtin().lookup("AI_HALLUCINATED_KIND");
        assert_eq!(def.severity, Severity::Low);
        assert_eq!(def.weight, 10);
        assert_eq!(def.description, "Unknown Violation");
        assert!(def.regulation.is_none());
        assert!(def.suggested_fix.is_none());
    }

    #[test]
    fn test_unknown_kind_keeps_its_name() {
        let v = RuleCatalog::builtin().violation("AI_HALLUCINATED_KIND").build();
        assert_eq!(v.kind(), "AI_HALLUCINATED_KIND");
        assert_eq!(v.impact_score(), 20);
    }

    #[test]
    fn test_iter_keeps_registration_order() {
        let keys: Vec<&str> = RuleCatalog::builtin().iter().map(|r| r.key.as_ref()).collect();
        assert_eq!(keys.first(), Some(&kinds::MRP_REQUIRED));
        assert_eq!(keys.len(), BUILTIN_RULES.len());
    }

    #[test]
    fn test_with_custom_adds_rule() {
        let custom = RuleDefinition {
            key: Cow::Owned("BATTERY_DISCLOSURE".to_string()),
            severity: Severity::Medium,
            weight: 12,
            description: Cow::Owned("Battery chemistry not disclosed".to_string()),
            regulation: None,
            suggested_fix: None,
        };
        let catalog = RuleCatalog::with_custom([custom]).unwrap();
        assert_eq!(catalog.weight("BATTERY_DISCLOSURE"), 12);
        assert_eq!(catalog.len(), BUILTIN_RULES.len() + 1);
        assert!(!RuleCatalog::builtin().contains("BATTERY_DISCLOSURE"));
    }

    #[test]
    fn test_with_custom_rejects_shadowing_and_heavy_weight() {
        let mut def = BUILTIN_RULES[0].clone();
        assert!(RuleCatalog::with_custom([def.clone()]).is_err());

        def.key = Cow::Borrowed("HEAVY");
        def.weight = 51;
        assert!(RuleCatalog::with_custom([def]).is_err());
    }
}

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::domain::{RegulationRef, RuleDefinition, Severity};
use crate::engine::catalog::{RuleCatalog, MAX_RULE_WEIGHT};
use crate::engine::text::{
    COUNTERFEIT_INDICATORS, COUNTERFEIT_TERMS, PROTECTED_BRANDS, RESTRICTED_TERMS, SAFETY_TERMS,
};
use crate::engine::{
    default_category_stats, CompiledCustomRule, CustomPatternChecker, KeywordCategory,
    MandatoryFieldsTable, PriceOutlierChecker, PriceStats, TextChecker, DEFAULT_MANDATORY_FIELDS,
};
use crate::error::{Result, ShelfwatchError};

pub const CONFIG_FILE_NAME: &str = "shelfwatch.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ShelfwatchConfig {
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default = "default_mandatory_fields")]
    pub mandatory_fields: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub category: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_blacklist")]
    pub blacklist: Vec<BlacklistEntry>,
    #[serde(default = "default_protected_brands")]
    pub protected_brands: Vec<String>,
    #[serde(default = "default_counterfeit_indicators")]
    pub counterfeit_indicators: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub outlier_check: bool,
    #[serde(default = "default_category_stats")]
    pub category_stats: BTreeMap<String, PriceStats>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RulesConfig {
    #[serde(default)]
    pub disable: Vec<String>,
    #[serde(default)]
    pub custom: Vec<CustomRule>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomRegulation {
    pub act: String,
    pub section: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomRule {
    pub key: String,
    pub severity: String,
    pub weight: u8,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub regulation: Option<CustomRegulation>,
    #[serde(default)]
    pub fix: Option<String>,
    /// Regex over title + description; without one the kind is only scored
    /// when an external detector reports it.
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProfileOverrides {
    #[serde(default)]
    pub text: Option<PartialTextConfig>,
    #[serde(default)]
    pub mandatory_fields: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub pricing: Option<PartialPricingConfig>,
    #[serde(default)]
    pub rules: Option<PartialRulesConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PartialTextConfig {
    pub blacklist: Option<Vec<BlacklistEntry>>,
    pub protected_brands: Option<Vec<String>>,
    pub counterfeit_indicators: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PartialPricingConfig {
    pub outlier_check: Option<bool>,
    pub category_stats: Option<BTreeMap<String, PriceStats>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PartialRulesConfig {
    pub disable: Option<Vec<String>>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_blacklist() -> Vec<BlacklistEntry> {
    [
        ("restricted", RESTRICTED_TERMS),
        ("safety", SAFETY_TERMS),
        ("counterfeit", COUNTERFEIT_TERMS),
    ]
    .into_iter()
    .map(|(category, keywords)| BlacklistEntry {
        category: category.to_string(),
        keywords: to_strings(keywords),
    })
    .collect()
}

fn default_protected_brands() -> Vec<String> {
    to_strings(PROTECTED_BRANDS)
}

fn default_counterfeit_indicators() -> Vec<String> {
    to_strings(COUNTERFEIT_INDICATORS)
}

fn default_mandatory_fields() -> BTreeMap<String, Vec<String>> {
    DEFAULT_MANDATORY_FIELDS
        .iter()
        .map(|(category, fields)| ((*category).to_string(), to_strings(fields)))
        .collect()
}

impl Default for ShelfwatchConfig {
    fn default() -> Self {
        Self {
            text: TextConfig::default(),
            mandatory_fields: default_mandatory_fields(),
            pricing: PricingConfig::default(),
            rules: RulesConfig::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            blacklist: default_blacklist(),
            protected_brands: default_protected_brands(),
            counterfeit_indicators: default_counterfeit_indicators(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            outlier_check: false,
            category_stats: default_category_stats(),
        }
    }
}

impl ShelfwatchConfig {
    /// `shelfwatch.toml` in the working directory, or defaults when absent.
    pub fn load() -> Result<Self> {
        let config_path = Path::new(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ShelfwatchConfig =
            toml::from_str(content).map_err(|e| ShelfwatchError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything `load` cannot express in the schema alone.
    pub fn validate(&self) -> Result<()> {
        self.rule_catalog()?;
        self.custom_pattern_checker()?;
        validate_category_stats(&self.pricing.category_stats)?;
        for (name, profile) in &self.profiles {
            if let Some(stats) = profile
                .pricing
                .as_ref()
                .and_then(|p| p.category_stats.as_ref())
            {
                validate_category_stats(stats).map_err(|e| {
                    ShelfwatchError::Config(format!("profile '{name}': {e}"))
                })?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn has_profile(&self, profile_name: &str) -> bool {
        self.profiles.contains_key(profile_name)
    }

    /// Apply the named profile's overrides; unknown names change nothing.
    #[must_use]
    pub fn with_profile(mut self, profile_name: &str) -> Self {
        if let Some(overrides) = self.profiles.get(profile_name).cloned() {
            if let Some(text) = overrides.text {
                if let Some(v) = text.blacklist {
                    self.text.blacklist = v;
                }
                if let Some(v) = text.protected_brands {
                    self.text.protected_brands = v;
                }
                if let Some(v) = text.counterfeit_indicators {
                    self.text.counterfeit_indicators = v;
                }
            }
            if let Some(v) = overrides.mandatory_fields {
                self.mandatory_fields = v;
            }
            if let Some(pricing) = overrides.pricing {
                if let Some(v) = pricing.outlier_check {
                    self.pricing.outlier_check = v;
                }
                if let Some(v) = pricing.category_stats {
                    self.pricing.category_stats = v;
                }
            }
            if let Some(rules) = overrides.rules {
                if let Some(v) = rules.disable {
                    self.rules.disable = v;
                }
            }
        }
        self
    }

    pub fn custom_rule_definitions(&self) -> Result<Vec<RuleDefinition>> {
        self.rules
            .custom
            .iter()
            .map(|rule| {
                let severity: Severity =
                    rule.severity
                        .parse()
                        .map_err(|message| ShelfwatchError::InvalidRule {
                            key: rule.key.clone(),
                            message,
                        })?;

                if rule.weight > MAX_RULE_WEIGHT {
                    return Err(ShelfwatchError::InvalidRule {
                        key: rule.key.clone(),
                        message: format!(
                            "weight {} exceeds maximum {MAX_RULE_WEIGHT}",
                            rule.weight
                        ),
                    });
                }

                Ok(RuleDefinition {
                    key: Cow::Owned(rule.key.trim().to_string()),
                    severity,
                    weight: rule.weight,
                    description: Cow::Owned(
                        rule.description
                            .clone()
                            .unwrap_or_else(|| format!("Custom rule: {}", rule.key)),
                    ),
                    regulation: rule.regulation.as_ref().map(|r| RegulationRef {
                        act: Cow::Owned(r.act.clone()),
                        section: Cow::Owned(r.section.clone()),
                    }),
                    suggested_fix: rule.fix.clone().map(Cow::Owned),
                })
            })
            .collect()
    }

    /// Built-in catalog plus the configured custom rules.
    pub fn rule_catalog(&self) -> Result<RuleCatalog> {
        RuleCatalog::with_custom(self.custom_rule_definitions()?)
    }

    /// Checker for the custom rules that carry a `pattern`, if any do.
    pub fn custom_pattern_checker(&self) -> Result<Option<CustomPatternChecker>> {
        let compiled = self
            .rules
            .custom
            .iter()
            .filter_map(|rule| rule.pattern.as_ref().map(|p| (rule, p)))
            .map(|(rule, pattern)| {
                let pattern = Regex::new(pattern).map_err(|e| ShelfwatchError::InvalidRule {
                    key: rule.key.clone(),
                    message: e.to_string(),
                })?;
                Ok(CompiledCustomRule {
                    key: rule.key.trim().to_string(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if compiled.is_empty() {
            return Ok(None);
        }
        Ok(Some(CustomPatternChecker::new(compiled)))
    }

    #[must_use]
    pub fn mandatory_fields_table(&self) -> MandatoryFieldsTable {
        MandatoryFieldsTable::from_map(&self.mandatory_fields)
    }

    #[must_use]
    pub fn text_checker(&self) -> TextChecker {
        let blacklist = self
            .text
            .blacklist
            .iter()
            .map(|entry| KeywordCategory::new(entry.category.clone(), &entry.keywords))
            .collect();
        TextChecker::new(
            blacklist,
            &self.text.protected_brands,
            &self.text.counterfeit_indicators,
        )
    }

    pub fn price_outlier_checker(&self) -> Result<Option<PriceOutlierChecker>> {
        if !self.pricing.outlier_check {
            return Ok(None);
        }
        validate_category_stats(&self.pricing.category_stats)?;
        Ok(Some(PriceOutlierChecker::new(
            self.pricing.category_stats.clone(),
        )))
    }
}

fn validate_category_stats(stats: &BTreeMap<String, PriceStats>) -> Result<()> {
    for (category, s) in stats {
        if !s.mean.is_finite() || !s.std.is_finite() || s.std <= 0.0 {
            return Err(ShelfwatchError::Config(format!(
                "category_stats.{category}: std must be a positive number (got mean={}, std={})",
                s.mean, s.std
            )));
        }
    }
    Ok(())
}

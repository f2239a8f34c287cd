use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Severity;

/// Statutory or policy citation attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationRef {
    pub act: Cow<'static, str>,
    pub section: Cow<'static, str>,
}

impl RegulationRef {
    #[must_use]
    pub const fn new(act: &'static str, section: &'static str) -> Self {
        Self {
            act: Cow::Borrowed(act),
            section: Cow::Borrowed(section),
        }
    }
}

impl fmt::Display for RegulationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.act, self.section)
    }
}

/// Catalog entry describing how one violation kind is scored and explained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub key: Cow<'static, str>,
    pub severity: Severity,
    /// Score penalty subtracted once per violation of this kind (0-50).
    pub weight: u8,
    pub description: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulation: Option<RegulationRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<Cow<'static, str>>,
}

impl RuleDefinition {
    #[must_use]
    pub const fn builtin(
        key: &'static str,
        severity: Severity,
        weight: u8,
        description: &'static str,
        regulation: RegulationRef,
        suggested_fix: &'static str,
    ) -> Self {
        Self {
            key: Cow::Borrowed(key),
            severity,
            weight,
            description: Cow::Borrowed(description),
            regulation: Some(regulation),
            suggested_fix: Some(Cow::Borrowed(suggested_fix)),
        }
    }
}

use std::collections::BTreeMap;

use crate::domain::{ProductRecord, Violation};
use crate::engine::catalog::{kinds, RuleCatalog};
use crate::engine::Checker;

/// Requirements applied when no configuration overrides them.
pub const DEFAULT_MANDATORY_FIELDS: &[(&str, &[&str])] = &[
    ("food", &["expiry_date", "fssai_license", "ingredients", "mrp"]),
    ("electronics", &["mrp"]),
    ("clothing", &["material", "size_chart", "mrp"]),
];

/// Category (lower-case) to the attribute names a listing in it must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandatoryFieldsTable {
    table: BTreeMap<String, Vec<String>>,
}

impl Default for MandatoryFieldsTable {
    fn default() -> Self {
        Self::from_map(DEFAULT_MANDATORY_FIELDS.iter().copied())
    }
}

impl MandatoryFieldsTable {
    /// Build a table; category names are trimmed and lower-cased.
    pub fn from_map<I, K, V, F>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        let table = entries
            .into_iter()
            .map(|(category, fields)| {
                let fields = fields
                    .into_iter()
                    .map(|f| f.as_ref().trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect();
                (category.as_ref().trim().to_lowercase(), fields)
            })
            .collect();
        Self { table }
    }

    #[must_use]
    pub fn required_for(&self, category: &str) -> Option<&[String]> {
        self.table
            .get(category.trim().to_lowercase().as_str())
            .map(Vec::as_slice)
    }
}

/// Reports every required attribute a listing lacks for its category.
#[derive(Debug, Clone, Default)]
pub struct MandatoryFieldsChecker {
    table: MandatoryFieldsTable,
}

impl MandatoryFieldsChecker {
    #[must_use]
    pub fn new(table: MandatoryFieldsTable) -> Self {
        Self { table }
    }
}

impl Checker for MandatoryFieldsChecker {
    fn name(&self) -> &'static str {
        "mandatory_fields"
    }

    fn check(&self, record: &ProductRecord, catalog: &RuleCatalog) -> Vec<Violation> {
        let category = record.normalized_category();
        let Some(required) = self.table.required_for(&category) else {
            return Vec::new();
        };

        let missing: Vec<&str> = required
            .iter()
            .map(String::as_str)
            .filter(|field| !record.has_field(field))
            .collect();
        if missing.is_empty() {
            return Vec::new();
        }

        vec![catalog
            .violation(kinds::MANDATORY_FIELD_MISSING)
            .description(format!(
                "Missing fields for {category}: {}",
                missing.join(", ")
            ))
            .evidence(format!("Missing: [{}]", missing.join(", ")))
            .build()]
    }
}

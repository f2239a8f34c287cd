use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ProductRecord, Violation};
use crate::engine::catalog::{
    kinds, RuleCatalog, PRICE_OUTLIER_CONFIDENCE, PRICE_OUTLIER_STRONG_CONFIDENCE,
    PRICE_OUTLIER_STRONG_Z_SCORE, PRICE_OUTLIER_Z_SCORE,
};
use crate::engine::pricing::parse_amount;
use crate::engine::Checker;

const FALLBACK_CATEGORY: &str = "general";

/// Typical price distribution of a category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub mean: f64,
    pub std: f64,
}

#[must_use]
pub fn default_category_stats() -> BTreeMap<String, PriceStats> {
    [
        ("electronics", 500.0, 200.0),
        ("clothing", 50.0, 20.0),
        ("food", 10.0, 5.0),
        ("luxury", 2000.0, 1000.0),
        (FALLBACK_CATEGORY, 100.0, 50.0),
    ]
    .into_iter()
    .map(|(name, mean, std)| (name.to_string(), PriceStats { mean, std }))
    .collect()
}

/// Flags prices far from their category's typical range (z-score test).
///
/// Not part of the default checker set; enabled through `pricing.outlier_check`.
#[derive(Debug, Clone)]
pub struct PriceOutlierChecker {
    stats: BTreeMap<String, PriceStats>,
}

impl Default for PriceOutlierChecker {
    fn default() -> Self {
        Self::new(default_category_stats())
    }
}

impl PriceOutlierChecker {
    #[must_use]
    pub fn new(stats: BTreeMap<String, PriceStats>) -> Self {
        let stats = stats
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Self { stats }
    }

    /// z-score of `price` within `category`; unknown categories use `general`.
    #[must_use]
    pub fn z_score(&self, price: f64, category: &str) -> Option<f64> {
        let stats = self
            .stats
            .get(category)
            .or_else(|| self.stats.get(FALLBACK_CATEGORY))?;
        if stats.std <= 0.0 {
            return None;
        }
        Some((price - stats.mean) / stats.std)
    }
}

impl Checker for PriceOutlierChecker {
    fn name(&self) -> &'static str {
        "price_outlier"
    }

    fn check(&self, record: &ProductRecord, catalog: &RuleCatalog) -> Vec<Violation> {
        let price = parse_amount(&record.price);
        if price <= 0.0 {
            return Vec::new();
        }
        let category = record.normalized_category();
        let Some(z) = self.z_score(price, &category) else {
            return Vec::new();
        };
        if z.abs() <= PRICE_OUTLIER_Z_SCORE {
            return Vec::new();
        }

        let confidence = if z.abs() > PRICE_OUTLIER_STRONG_Z_SCORE {
            PRICE_OUTLIER_STRONG_CONFIDENCE
        } else {
            PRICE_OUTLIER_CONFIDENCE
        };
        let label = if category.is_empty() {
            FALLBACK_CATEGORY
        } else {
            category.as_str()
        };

        vec![catalog
            .violation(kinds::PRICE_OUTLIER)
            .description(format!(
                "Price is a statistical outlier (Z-Score: {z:.2}) for {label}"
            ))
            .evidence(format!("Price {price} vs category z-score threshold {PRICE_OUTLIER_Z_SCORE}"))
            .confidence(confidence)
            .build()]
    }
}

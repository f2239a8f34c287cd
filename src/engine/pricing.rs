use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::domain::{ProductRecord, Violation};
use crate::engine::catalog::{kinds, RuleCatalog, FAKE_DISCOUNT_THRESHOLD_PCT};
use crate::engine::Checker;

// Currency symbols/codes, thousands separators and stray whitespace.
static AMOUNT_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)₹|\brs\.?|\binr\b|\busd\b|\$|€|£|,|\s").expect("amount noise regex")
});

/// Parse a currency-tagged amount such as `"₹1,000"`, `"Rs. 499"` or `"$9.99"`.
///
/// Anything that does not parse to a finite number is `0.0`: a malformed
/// price is treated as missing rather than as an error.
#[must_use]
pub fn parse_amount(text: &str) -> f64 {
    let cleaned = AMOUNT_NOISE_RE.replace_all(text.trim(), "");
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            trace!(input = text, "unparsable amount treated as 0");
            0.0
        }
    }
}

/// Percentage reduction of `price` below `mrp`; 0 when there is no MRP.
#[must_use]
pub fn discount_pct(price: f64, mrp: f64) -> f64 {
    if mrp <= 0.0 {
        return 0.0;
    }
    (mrp - price) / mrp * 100.0
}

/// Selling price versus MRP rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingChecker;

impl PricingChecker {
    #[must_use]
    pub fn check_amounts(price: f64, mrp: f64, catalog: &RuleCatalog) -> Vec<Violation> {
        let mut violations = Vec::new();

        if price > 0.0 && mrp == 0.0 {
            violations.push(
                catalog
                    .violation(kinds::MRP_REQUIRED)
                    .evidence("Price exists but MRP is 0/missing")
                    .build(),
            );
        } else if mrp > 0.0 && price > 0.0 {
            if price > mrp {
                violations.push(
                    catalog
                        .violation(kinds::PRICE_HIGHER_THAN_MRP)
                        .evidence(format!("MRP: {mrp} vs Price: {price}"))
                        .build(),
                );
            } else {
                let discount = discount_pct(price, mrp);
                if discount > FAKE_DISCOUNT_THRESHOLD_PCT {
                    violations.push(
                        catalog
                            .violation(kinds::FAKE_DISCOUNT)
                            .description(format!("Unrealistic discount of {discount:.1}%"))
                            .evidence(format!(
                                "Discount > {FAKE_DISCOUNT_THRESHOLD_PCT}% threshold"
                            ))
                            .build(),
                    );
                }
            }
        }

        violations
    }
}

impl Checker for PricingChecker {
    fn name(&self) -> &'static str {
        "pricing"
    }

    fn check(&self, record: &ProductRecord, catalog: &RuleCatalog) -> Vec<Violation> {
        let price = parse_amount(&record.price);
        let mrp = record.mrp.as_deref().map_or(0.0, parse_amount);
        Self::check_amounts(price, mrp, catalog)
    }
}

use tracing::trace;

use crate::domain::{ProductRecord, Violation};
use crate::engine::catalog::{kinds, RuleCatalog, ALL_CAPS_MIN_TITLE_CHARS, MIN_TITLE_WORDS};
use crate::engine::Checker;
use crate::utils::{is_all_caps, normalize_terms, word_count};

pub const RESTRICTED_TERMS: &[&str] = &["ivory", "rhino", "leopard skin", "drug", "cocaine", "heroin"];
pub const SAFETY_TERMS: &[&str] = &["expired", "banned", "hazardous", "cyanide"];
// "first copy" is deliberately absent here; it only counts next to a protected brand.
pub const COUNTERFEIT_TERMS: &[&str] = &["replica", "clone", "1:1 copy", "fake"];
pub const PROTECTED_BRANDS: &[&str] = &["Gucci", "Rolex", "Nike", "Adidas", "Apple", "Samsung"];
pub const COUNTERFEIT_INDICATORS: &[&str] = &["copy", "replica", "clone", "duplicate", "first copy"];

/// A named group of blacklisted terms, matched as lower-case substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCategory {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordCategory {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: normalize_terms(keywords),
        }
    }
}

#[must_use]
pub fn default_blacklist() -> Vec<KeywordCategory> {
    vec![
        KeywordCategory::new("restricted", RESTRICTED_TERMS),
        KeywordCategory::new("safety", SAFETY_TERMS),
        KeywordCategory::new("counterfeit", COUNTERFEIT_TERMS),
    ]
}

#[derive(Debug, Clone)]
struct Brand {
    display: String,
    needle: String,
}

/// Keyword blacklist, counterfeit-brand and title formatting checks.
#[derive(Debug, Clone)]
pub struct TextChecker {
    blacklist: Vec<KeywordCategory>,
    brands: Vec<Brand>,
    counterfeit_indicators: Vec<String>,
}

impl Default for TextChecker {
    fn default() -> Self {
        Self::new(default_blacklist(), PROTECTED_BRANDS, COUNTERFEIT_INDICATORS)
    }
}

impl TextChecker {
    pub fn new<B, I, S, T>(blacklist: Vec<KeywordCategory>, brands: B, indicators: I) -> Self
    where
        B: IntoIterator<Item = S>,
        I: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let brands = brands
            .into_iter()
            .filter_map(|b| {
                let display = b.as_ref().trim().to_string();
                (!display.is_empty()).then(|| Brand {
                    needle: display.to_lowercase(),
                    display,
                })
            })
            .collect();
        Self {
            blacklist,
            brands,
            counterfeit_indicators: normalize_terms(indicators),
        }
    }

    /// One violation per blacklisted keyword found anywhere in `text`.
    #[must_use]
    pub fn check_blacklist(&self, text: &str, catalog: &RuleCatalog) -> Vec<Violation> {
        let haystack = text.to_lowercase();
        let mut violations = Vec::new();
        for category in &self.blacklist {
            for keyword in &category.keywords {
                if haystack.contains(keyword.as_str()) {
                    trace!(keyword = %keyword, category = %category.name, "blacklisted term");
                    violations.push(
                        catalog
                            .violation(kinds::RESTRICTED_KEYWORD)
                            .description(format!(
                                "Restricted term '{keyword}' found (Category: {})",
                                category.name
                            ))
                            .evidence(format!(
                                "Found '{keyword}' in text (category: {})",
                                category.name
                            ))
                            .build(),
                    );
                }
            }
        }
        violations
    }

    /// A protected brand only counts when a counterfeit indicator is also present.
    #[must_use]
    pub fn check_brands(&self, text: &str, catalog: &RuleCatalog) -> Vec<Violation> {
        let haystack = text.to_lowercase();
        let Some(indicator) = self
            .counterfeit_indicators
            .iter()
            .find(|term| haystack.contains(term.as_str()))
        else {
            return Vec::new();
        };

        self.brands
            .iter()
            .filter(|brand| haystack.contains(brand.needle.as_str()))
            .map(|brand| {
                catalog
                    .violation(kinds::BRAND_INFRINGEMENT)
                    .description(format!("Counterfeit '{}' listing detected", brand.display))
                    .evidence(format!(
                        "Brand '{}' + replica keyword '{indicator}'",
                        brand.display
                    ))
                    .build()
            })
            .collect()
    }

    #[must_use]
    pub fn check_title_format(title: &str, catalog: &RuleCatalog) -> Vec<Violation> {
        let mut violations = Vec::new();

        let words = word_count(title);
        if words < MIN_TITLE_WORDS {
            violations.push(
                catalog
                    .violation(kinds::TITLE_TOO_SHORT)
                    .evidence(format!("Title word count: {words} (Min: {MIN_TITLE_WORDS})"))
                    .build(),
            );
        }

        if is_all_caps(title) && title.chars().count() > ALL_CAPS_MIN_TITLE_CHARS {
            violations.push(
                catalog
                    .violation(kinds::TITLE_ALL_CAPS)
                    .evidence("Title is 100% uppercase characters")
                    .build(),
            );
        }

        violations
    }
}

impl Checker for TextChecker {
    fn name(&self) -> &'static str {
        "text"
    }

    fn check(&self, record: &ProductRecord, catalog: &RuleCatalog) -> Vec<Violation> {
        let text = record.full_text();
        let mut violations = self.check_blacklist(&text, catalog);
        violations.extend(self.check_brands(&text, catalog));
        violations.extend(Self::check_title_format(&record.title, catalog));
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(title: &str, description: &str) -> Vec<Violation> {
        let record = ProductRecord::new(title).with_description(description);
        TextChecker::default().check(&record, RuleCatalog::builtin())
    }

    fn count(violations: &[Violation], kind: &str) -> usize {
        violations.iter().filter(|v| v.kind() == kind).count()
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let upper = run("COCAINE for sale", "");
        let lower = run("cocaine for sale", "");
        assert_eq!(count(&upper, kinds::RESTRICTED_KEYWORD), 1);
        assert_eq!(upper, lower);
        assert!(upper[0].description().contains("'cocaine'"));
        assert!(upper[0].evidence().contains("restricted"));
    }

    #[test]
    fn test_each_keyword_is_its_own_violation() {
        let v = run("Hazardous expired cyanide kit", "");
        assert_eq!(count(&v, kinds::RESTRICTED_KEYWORD), 3);
    }

    #[test]
    fn test_keyword_found_in_description() {
        let v = run("Antique carved ornament", "Genuine ivory from estate sale");
        assert_eq!(count(&v, kinds::RESTRICTED_KEYWORD), 1);
    }

    #[test]
    fn test_brand_alone_is_not_infringement() {
        let v = run("Gucci handbag", "");
        assert_eq!(count(&v, kinds::BRAND_INFRINGEMENT), 0);
    }

    #[test]
    fn test_brand_with_replica_is_infringement() {
        let v = run("Gucci handbag replica", "");
        assert_eq!(count(&v, kinds::BRAND_INFRINGEMENT), 1);
        let brand = v
            .iter()
            .find(|v| v.kind() == kinds::BRAND_INFRINGEMENT)
            .unwrap();
        assert!(brand.description().contains("Gucci"));
    }

    #[test]
    fn test_first_copy_is_brand_signal_only() {
        let v = run("Rolex Submariner First Copy", "");
        assert_eq!(count(&v, kinds::BRAND_INFRINGEMENT), 1);
        assert_eq!(count(&v, kinds::RESTRICTED_KEYWORD), 0);
    }

    #[test]
    fn test_two_brands_two_violations() {
        let v = run("Nike Adidas duplicate combo shoes", "");
        assert_eq!(count(&v, kinds::BRAND_INFRINGEMENT), 2);
    }

    #[test]
    fn test_title_too_short() {
        let v = run("Phone", "");
        assert_eq!(count(&v, kinds::TITLE_TOO_SHORT), 1);
        assert_eq!(v[0].evidence(), "Title word count: 1 (Min: 3)");
        assert!(run("Wireless Bluetooth Speaker", "").is_empty());
    }

    #[test]
    fn test_title_all_caps() {
        let v = run("WIRELESS BLUETOOTH SPEAKER", "");
        assert_eq!(count(&v, kinds::TITLE_ALL_CAPS), 1);
        // Ten characters or fewer is tolerated.
        assert_eq!(count(&run("USB HUB 3X", ""), kinds::TITLE_ALL_CAPS), 0);
    }

    #[test]
    fn test_short_caps_title_triggers_both() {
        let v = run("SUPERSPEAKERX", "");
        assert_eq!(count(&v, kinds::TITLE_TOO_SHORT), 1);
        assert_eq!(count(&v, kinds::TITLE_ALL_CAPS), 1);
    }

    #[test]
    fn test_custom_lists() {
        let checker = TextChecker::new(
            vec![KeywordCategory::new("weapons", ["Crossbow"])],
            ["Acme"],
            ["knockoff"],
        );
        let record = ProductRecord::new("Acme crossbow knockoff edition");
        let v = checker.check(&record, RuleCatalog::builtin());
        assert_eq!(count(&v, kinds::RESTRICTED_KEYWORD), 1);
        assert_eq!(count(&v, kinds::BRAND_INFRINGEMENT), 1);
    }
}

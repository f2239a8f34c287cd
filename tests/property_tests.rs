//! Property-based tests using `proptest`.
//!
//! The evaluator must accept any listing without panicking, keep scores in
//! range, and agree with the additive scoring formula.

use std::sync::Arc;

use proptest::prelude::*;
use shelfwatch::engine::{
    kinds, parse_amount, FixedImageAnalyzer, FixedSemanticAnalyzer, ImageSignal, RuleCatalog,
    ScoreAggregator, SemanticSignal,
};
use shelfwatch::{ComplianceEvaluator, ProductRecord, RiskLevel};

fn arb_record() -> impl Strategy<Value = ProductRecord> {
    (
        "\\PC{0,60}",
        "\\PC{0,120}",
        prop_oneof!["\\PC{0,12}", "[0-9]{1,7}", "₹[0-9]{1,3},[0-9]{3}"],
        proptest::option::of(prop_oneof!["\\PC{0,12}", "[0-9]{1,7}"]),
        prop_oneof![
            Just(String::new()),
            Just("food".to_string()),
            Just("Electronics".to_string()),
            Just("clothing".to_string()),
            "[a-z]{0,10}"
        ],
        proptest::option::of("https://img/[a-z]{1,8}\\.jpg"),
    )
        .prop_map(|(title, description, price, mrp, category, image)| {
            let mut record = ProductRecord::new(title)
                .with_description(description)
                .with_price(price)
                .with_category(category);
            if let Some(mrp) = mrp {
                record = record.with_mrp(mrp);
            }
            if let Some(image) = image {
                record = record.with_image(image);
            }
            record
        })
}

fn arb_semantic() -> impl Strategy<Value = SemanticSignal> {
    (
        proptest::collection::vec("[a-z ]{1,12}", 0..4),
        any::<bool>(),
        any::<bool>(),
        0u8..=100,
    )
        .prop_map(|(terms, pricing, prohibited, risk)| SemanticSignal {
            misleading_terms: terms,
            suspicious_pricing: pricing,
            prohibited_content: prohibited,
            risk_score: risk,
            reasoning: String::new(),
        })
}

fn arb_image() -> impl Strategy<Value = ImageSignal> {
    (any::<bool>(), any::<bool>(), proptest::option::of(any::<bool>())).prop_map(
        |(watermark, inappropriate, cv_match)| ImageSignal {
            has_watermark: watermark,
            inappropriate_detected: inappropriate,
            cv_match,
            ..ImageSignal::default()
        },
    )
}

proptest! {
    #[test]
    fn parse_amount_never_panics(s in "\\PC*") {
        let amount = parse_amount(&s);
        prop_assert!(amount.is_finite());
    }

    #[test]
    fn score_always_in_range(record in arb_record()) {
        let result = ComplianceEvaluator::default().evaluate(&record);
        prop_assert!(result.compliance_score <= 100);
        prop_assert_eq!(
            result.risk_level,
            ScoreAggregator::risk_level(result.compliance_score)
        );
    }

    #[test]
    fn score_matches_additive_formula(
        record in arb_record(),
        semantic in arb_semantic(),
        image in arb_image(),
    ) {
        let evaluator = ComplianceEvaluator::builder()
            .semantic_analyzer(Arc::new(FixedSemanticAnalyzer(Ok(semantic))))
            .image_analyzer(Arc::new(FixedImageAnalyzer(Ok(image))))
            .build();
        let result = evaluator.evaluate(&record);

        let catalog = RuleCatalog::builtin();
        let penalty: u32 = result
            .violations
            .iter()
            .map(|v| u32::from(catalog.weight(v.kind())))
            .sum();
        let expected = 100u32.saturating_sub(penalty);
        prop_assert_eq!(u32::from(result.compliance_score), expected);

        for v in &result.violations {
            prop_assert!(v.impact_score() <= 100);
            prop_assert!((0.0..=1.0).contains(&v.confidence()));
        }
    }

    #[test]
    fn evaluation_is_idempotent(
        record in arb_record(),
        semantic in arb_semantic(),
        image in arb_image(),
    ) {
        let evaluator = ComplianceEvaluator::builder()
            .semantic_analyzer(Arc::new(FixedSemanticAnalyzer(Ok(semantic))))
            .image_analyzer(Arc::new(FixedImageAnalyzer(Ok(image))))
            .build();
        prop_assert_eq!(evaluator.evaluate(&record), evaluator.evaluate(&record));
    }

    #[test]
    fn pricing_rules_are_mutually_exclusive(price in 0u32..2_000_000, mrp in 0u32..2_000_000) {
        let record = ProductRecord::new("Listing under test")
            .with_price(price.to_string())
            .with_mrp(mrp.to_string());
        let result = ComplianceEvaluator::default().evaluate(&record);
        let pricing = result.count_of(kinds::MRP_REQUIRED)
            + result.count_of(kinds::PRICE_HIGHER_THAN_MRP)
            + result.count_of(kinds::FAKE_DISCOUNT);
        prop_assert!(pricing <= 1);
        if price == 0 {
            prop_assert_eq!(result.count_of(kinds::MRP_REQUIRED), 0);
        }
    }

    #[test]
    fn no_image_means_single_missing_image(record in arb_record(), image in arb_image()) {
        let mut record = record;
        record.image_url = None;
        record.images.clear();
        let evaluator = ComplianceEvaluator::builder()
            .image_analyzer(Arc::new(FixedImageAnalyzer(Ok(image))))
            .build();
        let result = evaluator.evaluate(&record);
        prop_assert_eq!(result.count_of(kinds::MISSING_IMAGE), 1);
        prop_assert_eq!(result.count_of(kinds::WATERMARK_DETECTED), 0);
        prop_assert_eq!(result.count_of(kinds::IMAGE_MISMATCH), 0);
    }
}

#[test]
fn risk_bands_cover_every_score() {
    for score in 0..=100u8 {
        let expected = if score < 60 {
            RiskLevel::HighRisk
        } else if score < 85 {
            RiskLevel::MediumRisk
        } else {
            RiskLevel::Safe
        };
        assert_eq!(ScoreAggregator::risk_level(score), expected, "score {score}");
    }
}

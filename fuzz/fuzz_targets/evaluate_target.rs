#![no_main]

use libfuzzer_sys::fuzz_target;
use shelfwatch::engine::parse_amount;
use shelfwatch::{ComplianceEvaluator, ProductRecord};

fuzz_target!(|data: &[u8]| {
    let evaluator = ComplianceEvaluator::default();

    // Structured listings when the bytes parse, free text otherwise
    if let Ok(record) = serde_json::from_slice::<ProductRecord>(data) {
        let result = evaluator.evaluate(&record);
        assert!(result.compliance_score <= 100);
    } else if let Ok(text) = std::str::from_utf8(data) {
        assert!(parse_amount(text).is_finite());
        let record = ProductRecord::new(text).with_description(text).with_price(text);
        let result = evaluator.evaluate(&record);
        assert!(result.compliance_score <= 100);
    }
});

use criterion::{criterion_group, criterion_main, Criterion};
use shelfwatch::{ComplianceEvaluator, EvaluatorBuilder, ProductRecord, ShelfwatchConfig};

fn listing(i: usize) -> ProductRecord {
    match i % 4 {
        0 => ProductRecord::new(format!("Rolex Submariner First Copy #{i}"))
            .with_price("5000")
            .with_mrp("1000000")
            .with_category("electronics"),
        1 => ProductRecord::new(format!("Organic honey jar 500g batch {i}"))
            .with_description("Raw forest honey, no added sugar")
            .with_price("349")
            .with_mrp("399")
            .with_category("food")
            .with_image("https://img/honey.jpg")
            .with_attribute("expiry_date", "2027-06-01"),
        2 => ProductRecord::new(format!("COTTON T-SHIRT {i}"))
            .with_price("799")
            .with_mrp("699")
            .with_category("clothing"),
        _ => ProductRecord::new(format!("Stainless steel water bottle {i}"))
            .with_description("Keeps drinks cold for 24 hours")
            .with_price("499")
            .with_mrp("699")
            .with_image("https://img/bottle.jpg"),
    }
}

fn listings(count: usize) -> Vec<ProductRecord> {
    (0..count).map(listing).collect()
}

fn bench_evaluate_single(c: &mut Criterion) {
    let evaluator = ComplianceEvaluator::default();
    let record = listing(0);
    c.bench_function("evaluate_single", |b| {
        b.iter(|| evaluator.evaluate(&record));
    });
}

fn bench_evaluate_batch_1000(c: &mut Criterion) {
    let evaluator = ComplianceEvaluator::default();
    let records = listings(1000);
    c.bench_function("evaluate_batch_1000", |b| {
        b.iter(|| evaluator.evaluate_batch(&records));
    });
}

fn bench_evaluate_batch_10000(c: &mut Criterion) {
    let evaluator = ComplianceEvaluator::default();
    let records = listings(10_000);
    c.bench_function("evaluate_batch_10000", |b| {
        b.iter(|| evaluator.evaluate_batch(&records));
    });
}

fn bench_evaluate_batch_1000_with_outlier(c: &mut Criterion) {
    let mut config = ShelfwatchConfig::default();
    config.pricing.outlier_check = true;
    let evaluator = EvaluatorBuilder::from_config(&config).unwrap().build();
    let records = listings(1000);
    c.bench_function("evaluate_batch_1000_with_outlier", |b| {
        b.iter(|| evaluator.evaluate_batch(&records));
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .sample_size(20)
        .warm_up_time(std::time::Duration::from_secs(2))
        .measurement_time(std::time::Duration::from_secs(10));
    targets = bench_evaluate_single, bench_evaluate_batch_1000, bench_evaluate_batch_10000,
        bench_evaluate_batch_1000_with_outlier
);
criterion_main!(benches);

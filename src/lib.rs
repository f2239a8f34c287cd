pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod presets;
pub mod utils;

pub use config::ShelfwatchConfig;
pub use domain::{EvaluationResult, ProductRecord, RiskLevel, Severity, Violation};
pub use engine::{ComplianceEvaluator, EvaluatorBuilder, RuleCatalog};
pub use error::{Result as ShelfwatchResult, ShelfwatchError};
pub use output::{OutputFormat, ViolationStats};

/// Evaluate a listing with the configuration found in the working directory
///
/// No collaborators are attached, so only rule-based checks contribute.
///
/// # Example
/// ```no_run
/// use shelfwatch::{evaluate, ProductRecord};
/// # fn main() -> shelfwatch::ShelfwatchResult<()> {
/// let record = ProductRecord::new("Cotton kurta for men")
///     .with_price("₹799")
///     .with_mrp("₹1,299")
///     .with_category("clothing");
/// let result = evaluate(&record)?;
/// println!("{} ({})", result.compliance_score, result.risk_level);
/// # Ok(())
/// # }
/// ```
pub fn evaluate(record: &ProductRecord) -> ShelfwatchResult<EvaluationResult> {
    let config = ShelfwatchConfig::load()?;
    evaluate_with_config(record, &config)
}

/// Evaluate a listing with an explicit configuration
///
/// # Example
/// ```
/// use shelfwatch::{evaluate_with_config, ProductRecord, RiskLevel, ShelfwatchConfig};
/// # fn main() -> shelfwatch::ShelfwatchResult<()> {
/// let config = ShelfwatchConfig::default();
/// let record = ProductRecord::new("Rolex Submariner First Copy")
///     .with_price("5000")
///     .with_mrp("1000000")
///     .with_category("electronics");
/// let result = evaluate_with_config(&record, &config)?;
/// assert_eq!(result.compliance_score, 30);
/// assert_eq!(result.risk_level, RiskLevel::HighRisk);
/// # Ok(())
/// # }
/// ```
pub fn evaluate_with_config(
    record: &ProductRecord,
    config: &ShelfwatchConfig,
) -> ShelfwatchResult<EvaluationResult> {
    let evaluator = ComplianceEvaluator::from_config(config)?;
    Ok(evaluator.evaluate(record))
}

mod evaluation;
mod product;
mod rule;
mod violation;

pub use evaluation::{EvaluationResult, RiskLevel};
pub use product::ProductRecord;
pub use rule::{RegulationRef, RuleDefinition};
pub use violation::{Severity, Violation, ViolationBuilder, ViolationStatus};

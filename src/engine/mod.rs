pub mod catalog;
pub mod collaborator;
mod custom;
mod evaluator;
pub mod image;
pub mod mandatory;
pub mod price_outlier;
pub mod pricing;
mod scoring;
pub mod semantic;
pub mod text;

pub use catalog::{kinds, RuleCatalog, BUILTIN_RULES};
pub use collaborator::{CollaboratorError, FixedImageAnalyzer, FixedSemanticAnalyzer, Unconfigured};
pub use custom::{CompiledCustomRule, CustomPatternChecker};
pub use evaluator::{Checker, ComplianceEvaluator, EvaluatorBuilder};
pub use image::{ImageAnalyzer, ImageChecker, ImageResponse, ImageSignal};
pub use mandatory::{MandatoryFieldsChecker, MandatoryFieldsTable, DEFAULT_MANDATORY_FIELDS};
pub use price_outlier::{default_category_stats, PriceOutlierChecker, PriceStats};
pub use pricing::{discount_pct, parse_amount, PricingChecker};
pub use scoring::ScoreAggregator;
pub use semantic::{
    RiskAssessment, SemanticAnalyzer, SemanticResponse, SemanticSignal, SemanticSignalAdapter,
};
pub use text::{default_blacklist, KeywordCategory, TextChecker};

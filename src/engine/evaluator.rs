use std::collections::BTreeSet;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, debug_span};

use crate::config::ShelfwatchConfig;
use crate::domain::{EvaluationResult, ProductRecord, Violation};
use crate::engine::catalog::RuleCatalog;
use crate::engine::collaborator::Unconfigured;
use crate::engine::image::{ImageAnalyzer, ImageChecker};
use crate::engine::mandatory::{MandatoryFieldsChecker, MandatoryFieldsTable};
use crate::engine::price_outlier::PriceOutlierChecker;
use crate::engine::pricing::PricingChecker;
use crate::engine::scoring::ScoreAggregator;
use crate::engine::semantic::{SemanticAnalyzer, SemanticSignalAdapter};
use crate::engine::text::TextChecker;
use crate::error::Result;

/// Something that inspects a listing and reports violations.
///
/// Checkers are independent of each other and must not keep state between
/// calls; the evaluator may run them for different listings on different
/// threads.
pub trait Checker: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, record: &ProductRecord, catalog: &RuleCatalog) -> Vec<Violation>;
}

/// Runs an ordered set of checkers over a listing and scores the result.
pub struct ComplianceEvaluator {
    catalog: Arc<RuleCatalog>,
    checkers: Vec<Arc<dyn Checker>>,
    disabled: BTreeSet<String>,
}

impl Default for ComplianceEvaluator {
    fn default() -> Self {
        EvaluatorBuilder::default().build()
    }
}

impl ComplianceEvaluator {
    #[must_use]
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::default()
    }

    /// Evaluator configured from a loaded config file, without collaborators.
    pub fn from_config(config: &ShelfwatchConfig) -> Result<Self> {
        Ok(EvaluatorBuilder::from_config(config)?.build())
    }

    #[must_use]
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn checker_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checkers.iter().map(|c| c.name())
    }

    /// Evaluate one listing. Never fails: collaborator errors only remove
    /// their signal from the result.
    pub fn evaluate(&self, record: &ProductRecord) -> EvaluationResult {
        let span = debug_span!("evaluate", title = %record.title);
        let _guard = span.enter();

        let mut violations = Vec::new();
        for checker in &self.checkers {
            let found = checker.check(record, &self.catalog);
            debug!(checker = checker.name(), found = found.len(), "checker finished");
            violations.extend(
                found
                    .into_iter()
                    .filter(|v| !self.disabled.contains(v.kind())),
            );
        }

        let compliance_score = ScoreAggregator::new(&self.catalog).score(&violations);
        let risk_level = ScoreAggregator::risk_level(compliance_score);
        debug!(
            score = compliance_score,
            risk = %risk_level,
            violations = violations.len(),
            "evaluation complete"
        );

        EvaluationResult {
            compliance_score,
            risk_level,
            violations,
        }
    }

    /// Evaluate many listings in parallel; results keep the input order.
    pub fn evaluate_batch(&self, records: &[ProductRecord]) -> Vec<EvaluationResult> {
        records.par_iter().map(|r| self.evaluate(r)).collect()
    }
}

/// Assembles a [`ComplianceEvaluator`].
///
/// Checkers run in a fixed order: mandatory fields, text, pricing, image,
/// semantic, price outlier (when enabled), then any extra checkers.
#[derive(Clone)]
pub struct EvaluatorBuilder {
    catalog: Arc<RuleCatalog>,
    mandatory_fields: MandatoryFieldsTable,
    text: TextChecker,
    semantic: Arc<dyn SemanticAnalyzer>,
    image: Arc<dyn ImageAnalyzer>,
    price_outlier: Option<PriceOutlierChecker>,
    disabled: BTreeSet<String>,
    extra: Vec<Arc<dyn Checker>>,
}

impl Default for EvaluatorBuilder {
    fn default() -> Self {
        Self {
            catalog: Arc::new(RuleCatalog::builtin().clone()),
            mandatory_fields: MandatoryFieldsTable::default(),
            text: TextChecker::default(),
            semantic: Arc::new(Unconfigured),
            image: Arc::new(Unconfigured),
            price_outlier: None,
            disabled: BTreeSet::new(),
            extra: Vec::new(),
        }
    }
}

impl EvaluatorBuilder {
    pub fn from_config(config: &ShelfwatchConfig) -> Result<Self> {
        Ok(Self {
            catalog: Arc::new(config.rule_catalog()?),
            mandatory_fields: config.mandatory_fields_table(),
            text: config.text_checker(),
            price_outlier: config.price_outlier_checker()?,
            disabled: config.rules.disable.iter().cloned().collect(),
            extra: config
                .custom_pattern_checker()?
                .map(|c| Arc::new(c) as Arc<dyn Checker>)
                .into_iter()
                .collect(),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn catalog(mut self, catalog: Arc<RuleCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn mandatory_fields(mut self, table: MandatoryFieldsTable) -> Self {
        self.mandatory_fields = table;
        self
    }

    #[must_use]
    pub fn text_checker(mut self, text: TextChecker) -> Self {
        self.text = text;
        self
    }

    #[must_use]
    pub fn semantic_analyzer(mut self, analyzer: Arc<dyn SemanticAnalyzer>) -> Self {
        self.semantic = analyzer;
        self
    }

    #[must_use]
    pub fn image_analyzer(mut self, analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        self.image = analyzer;
        self
    }

    #[must_use]
    pub fn price_outlier(mut self, checker: Option<PriceOutlierChecker>) -> Self {
        self.price_outlier = checker;
        self
    }

    /// Drop violations of `kind` before scoring.
    #[must_use]
    pub fn disable(mut self, kind: impl Into<String>) -> Self {
        self.disabled.insert(kind.into());
        self
    }

    /// Append a checker after the built-in ones.
    #[must_use]
    pub fn checker(mut self, checker: Arc<dyn Checker>) -> Self {
        self.extra.push(checker);
        self
    }

    #[must_use]
    pub fn build(self) -> ComplianceEvaluator {
        let mut checkers: Vec<Arc<dyn Checker>> = vec![
            Arc::new(MandatoryFieldsChecker::new(self.mandatory_fields)),
            Arc::new(self.text),
            Arc::new(PricingChecker),
            Arc::new(ImageChecker::new(self.image)),
            Arc::new(SemanticSignalAdapter::new(self.semantic)),
        ];
        if let Some(outlier) = self.price_outlier {
            checkers.push(Arc::new(outlier));
        }
        checkers.extend(self.extra);

        ComplianceEvaluator {
            catalog: self.catalog,
            checkers,
            disabled: self.disabled,
        }
    }
}

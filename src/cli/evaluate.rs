use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use shelfwatch::engine::{
    CollaboratorError, FixedImageAnalyzer, FixedSemanticAnalyzer, ImageResponse,
    SemanticResponse,
};
use shelfwatch::output::{format_output, ListingReport, OutputFormat, SemanticSummary};
use shelfwatch::{EvaluationResult, EvaluatorBuilder, ProductRecord, RiskLevel, ShelfwatchConfig};

/// A listing, optionally with recorded collaborator responses to replay.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingInput {
    Annotated {
        record: ProductRecord,
        #[serde(default)]
        semantic: Option<Value>,
        #[serde(default)]
        image: Option<Value>,
    },
    Plain(ProductRecord),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Many(Vec<ListingInput>),
    One(ListingInput),
}

impl ListingInput {
    fn record(&self) -> &ProductRecord {
        match self {
            Self::Annotated { record, .. } | Self::Plain(record) => record,
        }
    }

    fn is_plain(&self) -> bool {
        matches!(
            self,
            Self::Plain(_)
                | Self::Annotated {
                    semantic: None,
                    image: None,
                    ..
                }
        )
    }

    /// The result plus a summary of the replayed semantic reply, if it raised a concern.
    fn evaluate(&self, builder: &EvaluatorBuilder) -> (EvaluationResult, Option<SemanticSummary>) {
        let mut builder = builder.clone();
        let mut summary = None;
        if let Self::Annotated {
            record,
            semantic,
            image,
        } = self
        {
            if let Some(raw) = semantic {
                let response = serde_json::from_value::<SemanticResponse>(raw.clone())
                    .map_err(|e| CollaboratorError::Malformed(e.to_string()))
                    .and_then(SemanticResponse::into_result);
                if !record.full_text().trim().is_empty() {
                    summary = response.as_ref().ok().and_then(SemanticSummary::from_signal);
                }
                builder = builder.semantic_analyzer(Arc::new(FixedSemanticAnalyzer(response)));
            }
            if let Some(raw) = image {
                let response = serde_json::from_value::<ImageResponse>(raw.clone())
                    .map_err(|e| CollaboratorError::Malformed(e.to_string()))
                    .and_then(ImageResponse::into_result);
                builder = builder.image_analyzer(Arc::new(FixedImageAnalyzer(response)));
            }
        }
        (builder.build().evaluate(self.record()), summary)
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Read stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_config(config_path: Option<&Path>, profile: Option<&str>) -> Result<ShelfwatchConfig> {
    let config = match config_path {
        Some(path) => ShelfwatchConfig::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ShelfwatchConfig::load().context("Failed to load configuration")?,
    };
    let Some(name) = profile else {
        return Ok(config);
    };
    if !config.has_profile(name) {
        warn!(profile = name, "profile not found in configuration, using base settings");
    }
    Ok(config.with_profile(name))
}

fn label(record: &ProductRecord, index: usize) -> String {
    let title = record.title.trim();
    if title.is_empty() {
        format!("(untitled #{})", index + 1)
    } else {
        title.to_string()
    }
}

/// Evaluate every listing in `path` and print the report.
///
/// Returns whether any listing hit the `fail_on` threshold.
pub fn run_evaluate(
    path: &Path,
    format: OutputFormat,
    config_path: Option<&Path>,
    profile: Option<&str>,
    ci: bool,
    fail_on: impl Fn(RiskLevel) -> bool,
) -> Result<bool> {
    if ci {
        colored::control::set_override(false);
    }

    let content = read_input(path)?;
    let inputs = match serde_json::from_str::<InputDocument>(&content)
        .context("Input is not a listing or an array of listings")?
    {
        InputDocument::Many(inputs) => inputs,
        InputDocument::One(input) => vec![input],
    };

    let config = load_config(config_path, profile)?;
    let builder = EvaluatorBuilder::from_config(&config)?;

    let results: Vec<(EvaluationResult, Option<SemanticSummary>)> =
        if inputs.iter().all(ListingInput::is_plain) {
            let records: Vec<ProductRecord> = inputs.iter().map(|i| i.record().clone()).collect();
            builder
                .build()
                .evaluate_batch(&records)
                .into_iter()
                .map(|result| (result, None))
                .collect()
        } else {
            inputs.iter().map(|i| i.evaluate(&builder)).collect()
        };

    let reports: Vec<ListingReport> = inputs
        .iter()
        .zip(results)
        .enumerate()
        .map(|(index, (input, (result, semantic)))| {
            let title = label(input.record(), index);
            info!(
                listing = %title,
                score = result.compliance_score,
                risk = %result.risk_level,
                violations = result.violations.len(),
                "listing evaluated"
            );
            ListingReport::new(title, result).with_semantic(semantic)
        })
        .collect();

    let hit = reports.iter().any(|r| fail_on(r.result.risk_level));
    print!("{}", format_output(&reports, format, ci));
    Ok(hit)
}

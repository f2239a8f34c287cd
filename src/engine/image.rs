use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{ProductRecord, Violation};
use crate::engine::catalog::{kinds, RuleCatalog};
use crate::engine::collaborator::CollaboratorError;
use crate::engine::Checker;

const DEFAULT_IMAGE_CATEGORY: &str = "general";

fn default_true() -> bool {
    true
}

/// Findings of an external image analysis service for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSignal {
    #[serde(default)]
    pub has_watermark: bool,
    #[serde(default)]
    pub inappropriate_detected: bool,
    /// `None` means the image/title match was not evaluated.
    #[serde(default)]
    pub cv_match: Option<bool>,
    #[serde(default = "default_true")]
    pub category_match: bool,
    #[serde(default)]
    pub details: String,
}

impl Default for ImageSignal {
    fn default() -> Self {
        Self {
            has_watermark: false,
            inappropriate_detected: false,
            cv_match: None,
            category_match: true,
            details: String::new(),
        }
    }
}

/// Wire form of an image analyzer reply: the findings, or `{"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImageResponse {
    Failure { error: String },
    Signal(ImageSignal),
}

impl ImageResponse {
    pub fn from_json(raw: &str) -> Result<ImageSignal, CollaboratorError> {
        serde_json::from_str::<Self>(raw)
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?
            .into_result()
    }

    pub fn into_result(self) -> Result<ImageSignal, CollaboratorError> {
        match self {
            Self::Failure { error } => Err(CollaboratorError::from_message(&error)),
            Self::Signal(signal) => Ok(signal),
        }
    }
}

/// External service that inspects a listing's primary image.
pub trait ImageAnalyzer: Send + Sync {
    fn analyze(
        &self,
        image_ref: &str,
        title: &str,
        category: &str,
    ) -> Result<ImageSignal, CollaboratorError>;
}

impl<F> ImageAnalyzer for F
where
    F: Fn(&str, &str, &str) -> Result<ImageSignal, CollaboratorError> + Send + Sync,
{
    fn analyze(
        &self,
        image_ref: &str,
        title: &str,
        category: &str,
    ) -> Result<ImageSignal, CollaboratorError> {
        self(image_ref, title, category)
    }
}

/// Missing-image rule plus interpretation of the image analyzer's flags.
#[derive(Clone)]
pub struct ImageChecker {
    analyzer: Arc<dyn ImageAnalyzer>,
}

impl ImageChecker {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self { analyzer }
    }

    #[must_use]
    pub fn violations_from(signal: &ImageSignal, catalog: &RuleCatalog) -> Vec<Violation> {
        let flagged = |kind: &str| {
            let builder = catalog.violation(kind);
            if signal.details.trim().is_empty() {
                builder.build()
            } else {
                builder.evidence(signal.details.clone()).build()
            }
        };

        let mut violations = Vec::new();
        if signal.has_watermark {
            violations.push(flagged(kinds::WATERMARK_DETECTED));
        }
        if signal.inappropriate_detected {
            violations.push(flagged(kinds::INAPPROPRIATE_CONTENT));
        }
        if signal.cv_match == Some(false) {
            violations.push(flagged(kinds::IMAGE_MISMATCH));
        }
        violations
    }
}

impl Checker for ImageChecker {
    fn name(&self) -> &'static str {
        "image"
    }

    fn check(&self, record: &ProductRecord, catalog: &RuleCatalog) -> Vec<Violation> {
        let Some(image_ref) = record.primary_image() else {
            return vec![catalog.violation(kinds::MISSING_IMAGE).build()];
        };

        let category = match record.normalized_category() {
            c if c.is_empty() => DEFAULT_IMAGE_CATEGORY.to_string(),
            c => c,
        };

        match self.analyzer.analyze(image_ref, &record.title, &category) {
            Ok(signal) => {
                debug!(image = image_ref, cv_match = ?signal.cv_match, "image signal received");
                Self::violations_from(&signal, catalog)
            }
            Err(e) => {
                warn!(collaborator = "image", image = image_ref, error = %e, "no image signal, continuing without it");
                Vec::new()
            }
        }
    }
}

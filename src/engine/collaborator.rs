//! Failure type shared by external analyzers, plus the stock analyzers the
//! CLI and tests plug in when no live service is available.

use thiserror::Error;

use crate::engine::image::{ImageAnalyzer, ImageSignal};
use crate::engine::semantic::{SemanticAnalyzer, SemanticSignal};

/// Why a collaborator produced no signal. Never fatal to an evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("collaborator timed out")]
    Timeout,

    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("malformed collaborator response: {0}")]
    Malformed(String),

    #[error("collaborator failed: {0}")]
    Failed(String),
}

impl CollaboratorError {
    /// Classify a free-text `{"error": ...}` payload.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else if lower.contains("not configured") || lower.contains("unavailable") {
            Self::Unavailable(message.to_string())
        } else {
            Self::Failed(message.to_string())
        }
    }
}

/// Analyzer used when no backing service is wired in; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl SemanticAnalyzer for Unconfigured {
    fn analyze(&self, _text: &str) -> Result<SemanticSignal, CollaboratorError> {
        Err(CollaboratorError::Unavailable(
            "semantic analyzer not configured".to_string(),
        ))
    }
}

impl ImageAnalyzer for Unconfigured {
    fn analyze(
        &self,
        _image_ref: &str,
        _title: &str,
        _category: &str,
    ) -> Result<ImageSignal, CollaboratorError> {
        Err(CollaboratorError::Unavailable(
            "image analyzer not configured".to_string(),
        ))
    }
}

/// Replays one recorded semantic response for every call.
#[derive(Debug, Clone)]
pub struct FixedSemanticAnalyzer(pub Result<SemanticSignal, CollaboratorError>);

impl SemanticAnalyzer for FixedSemanticAnalyzer {
    fn analyze(&self, _text: &str) -> Result<SemanticSignal, CollaboratorError> {
        self.0.clone()
    }
}

/// Replays one recorded image response for every call.
#[derive(Debug, Clone)]
pub struct FixedImageAnalyzer(pub Result<ImageSignal, CollaboratorError>);

impl ImageAnalyzer for FixedImageAnalyzer {
    fn analyze(
        &self,
        _image_ref: &str,
        _title: &str,
        _category: &str,
    ) -> Result<ImageSignal, CollaboratorError> {
        self.0.clone()
    }
}

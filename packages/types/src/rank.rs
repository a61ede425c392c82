use crate::{ConditionLabel, EyescanError, Result};
use serde::Serialize;

/// Raw per-label output of a model, in model class-index order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScores {
    pub scores: Vec<(ConditionLabel, f64)>,
    /// False when the scores come from a model that was never trained.
    pub reliable: bool,
}

impl LabelScores {
    pub fn new(scores: Vec<(ConditionLabel, f64)>) -> Self {
        Self {
            scores,
            reliable: true,
        }
    }

    pub fn unreliable(scores: Vec<(ConditionLabel, f64)>) -> Self {
        Self {
            scores,
            reliable: false,
        }
    }

    /// Rejects empty, non-finite or out-of-range confidences.
    pub fn validate(&self) -> Result<()> {
        if self.scores.is_empty() {
            return Err(EyescanError::Inference(
                "model produced no scores".to_string(),
            ));
        }
        for (label, confidence) in &self.scores {
            if !confidence.is_finite() || !(0.0..=1.0 + 1e-6).contains(confidence) {
                return Err(EyescanError::Inference(format!(
                    "invalid confidence {confidence} for `{label}`"
                )));
            }
        }
        Ok(())
    }
}

/// A scored label with its confidence scaled to 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedResult {
    pub label: ConditionLabel,
    pub confidence: f64,
    pub scaled: f64,
}

impl RankedResult {
    pub fn new(label: ConditionLabel, confidence: f64) -> Self {
        Self {
            label,
            confidence,
            scaled: scale_percent(confidence),
        }
    }
}

/// `confidence * 100` rounded to two decimals.
pub fn scale_percent(confidence: f64) -> f64 {
    (confidence * 10_000.0).round() / 100.0
}

/// Orders scores by confidence, highest first.
///
/// The sort is stable: equal confidences keep the class-index order the
/// model presented them in.
pub fn rank(scores: LabelScores) -> Vec<RankedResult> {
    let mut ranked: Vec<RankedResult> = scores
        .scores
        .into_iter()
        .map(|(label, confidence)| RankedResult::new(label, confidence))
        .collect();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked
}

//! Fusion of the image and symptom reports into one suggestion
//!
//! The combined label is the one with the highest mean confidence across the
//! reports that succeeded. A label absent from a report counts as zero there.

use eyescan_types::{ConditionLabel, ERROR_LABEL, Report};
use serde::Serialize;

pub const SPECIALIST_TYPE: &str = "general-ophthalmologist";

/// Confidence at which a non-normal finding is escalated one risk level.
pub const ESCALATION_THRESHOLD: f64 = 0.9;

/// Confidence above which a specialist visit is recommended.
pub const REFERRAL_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn for_condition(label: ConditionLabel) -> Self {
        match label {
            ConditionLabel::Normal => RiskLevel::Low,
            ConditionLabel::Ptosis => RiskLevel::High,
            _ => RiskLevel::Medium,
        }
    }

    pub fn escalate(self) -> Self {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium => RiskLevel::High,
            RiskLevel::High | RiskLevel::Critical => RiskLevel::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Routine,
    Urgent,
    Emergency,
}

impl From<RiskLevel> for Urgency {
    fn from(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::Low | RiskLevel::Medium => Urgency::Routine,
            RiskLevel::High => Urgency::Urgent,
            RiskLevel::Critical => Urgency::Emergency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedPrediction {
    pub predicted_disease: ConditionLabel,
    pub overall_confidence: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CombinedResult {
    Prediction(CombinedPrediction),
    Error {
        disease: &'static str,
        confidence: f64,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistRouting {
    pub recommended: bool,
    pub urgency: Urgency,
    pub specialist_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub cnn_results: Report,
    pub text_results: Report,
    pub combined_result: CombinedResult,
    pub specialist_routing: SpecialistRouting,
}

impl Diagnosis {
    pub fn new(image: Report, text: Report) -> Self {
        let combined_result = combine(&image, &text);
        let specialist_routing = route(&combined_result);
        Self {
            cnn_results: image,
            text_results: text,
            combined_result,
            specialist_routing,
        }
    }
}

pub fn combine(image: &Report, text: &Report) -> CombinedResult {
    let succeeded: Vec<&Report> = [image, text].into_iter().filter(|r| !r.is_error()).collect();
    if succeeded.is_empty() {
        let reasons: Vec<String> = [image, text]
            .into_iter()
            .map(|r| format!("{}: {}", r.modality(), r.error_message().unwrap_or_default()))
            .collect();
        return CombinedResult::Error {
            disease: ERROR_LABEL,
            confidence: 0.0,
            error: format!("both pipelines failed ({})", reasons.join("; ")),
        };
    }

    let mut best = (ConditionLabel::Normal, f64::NEG_INFINITY);
    for label in ConditionLabel::ALL {
        let total: f64 = succeeded
            .iter()
            .map(|r| r.confidence_of(label).unwrap_or(0.0))
            .sum();
        let mean = total / succeeded.len() as f64;
        if mean > best.1 {
            best = (label, mean);
        }
    }

    let (label, mean) = best;
    let overall_confidence = (mean * 100.0).round() / 100.0;
    let mut risk_level = RiskLevel::for_condition(label);
    if label != ConditionLabel::Normal && overall_confidence >= ESCALATION_THRESHOLD {
        risk_level = risk_level.escalate();
    }

    tracing::debug!(%label, overall_confidence, ?risk_level, "combined reports");
    CombinedResult::Prediction(CombinedPrediction {
        predicted_disease: label,
        overall_confidence,
        risk_level,
    })
}

pub fn route(result: &CombinedResult) -> SpecialistRouting {
    match result {
        CombinedResult::Prediction(prediction) => SpecialistRouting {
            recommended: prediction.overall_confidence > REFERRAL_THRESHOLD
                && prediction.predicted_disease != ConditionLabel::Normal,
            urgency: prediction.risk_level.into(),
            specialist_type: SPECIALIST_TYPE,
        },
        CombinedResult::Error { .. } => SpecialistRouting {
            recommended: false,
            urgency: Urgency::Routine,
            specialist_type: SPECIALIST_TYPE,
        },
    }
}

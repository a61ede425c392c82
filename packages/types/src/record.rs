//! Packaging of ranked results into the records written at the output boundary.
//!
//! A [`Report`] is always a list: either one record per scored label, or a
//! single error record. Field names follow the wire format consumers already
//! parse (`disease`, `confidence`, `probability` / `relevanceScore`, `error`).

use crate::{ConditionLabel, EyescanError, RankedResult, Result};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Label sentinel carried by the degraded error record.
pub const ERROR_LABEL: &str = "error";

/// Which pipeline produced a report. Selects the wire name of the scaled score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Image,
    Text,
}

impl Modality {
    pub fn scaled_key(&self) -> &'static str {
        match self {
            Modality::Image => "probability",
            Modality::Text => "relevanceScore",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Image => write!(f, "image"),
            Modality::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLabel {
    Condition(ConditionLabel),
    Error,
}

impl RecordLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordLabel::Condition(label) => label.as_str(),
            RecordLabel::Error => ERROR_LABEL,
        }
    }

    pub fn condition(&self) -> Option<ConditionLabel> {
        match self {
            RecordLabel::Condition(label) => Some(*label),
            RecordLabel::Error => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub label: RecordLabel,
    pub confidence: f64,
    pub scaled: f64,
    pub message: Option<String>,
    /// Set when the scoring model was untrained.
    pub unreliable: bool,
}

impl PredictionRecord {
    pub fn ranked(result: RankedResult, unreliable: bool) -> Self {
        Self {
            label: RecordLabel::Condition(result.label),
            confidence: result.confidence,
            scaled: result.scaled,
            message: None,
            unreliable,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            label: RecordLabel::Error,
            confidence: 0.0,
            scaled: 0.0,
            message: Some(message.into()),
            unreliable: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.label == RecordLabel::Error
    }
}

/// The packaged output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    modality: Modality,
    records: Vec<PredictionRecord>,
}

impl Report {
    pub fn success(modality: Modality, ranked: Vec<RankedResult>, reliable: bool) -> Self {
        let records = ranked
            .into_iter()
            .map(|result| PredictionRecord::ranked(result, !reliable))
            .collect();
        Self { modality, records }
    }

    pub fn failure(modality: Modality, error: &EyescanError) -> Self {
        tracing::warn!(%modality, error = %error, "pipeline failed, emitting error record");
        Self {
            modality,
            records: vec![PredictionRecord::error(error.to_string())],
        }
    }

    /// Packages the outcome of a run; any error collapses into one error record.
    pub fn from_outcome(modality: Modality, outcome: Result<(Vec<RankedResult>, bool)>) -> Self {
        match outcome {
            Ok((ranked, reliable)) => Self::success(modality, ranked, reliable),
            Err(error) => Self::failure(modality, &error),
        }
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn is_error(&self) -> bool {
        self.records.first().is_some_and(PredictionRecord::is_error)
    }

    /// The error message when this report is a degraded error record.
    pub fn error_message(&self) -> Option<&str> {
        self.records
            .iter()
            .find(|record| record.is_error())
            .and_then(|record| record.message.as_deref())
    }

    pub fn confidence_of(&self, label: ConditionLabel) -> Option<f64> {
        self.records
            .iter()
            .find(|record| record.label == RecordLabel::Condition(label))
            .map(|record| record.confidence)
    }
}

struct RecordView<'a> {
    modality: Modality,
    record: &'a PredictionRecord,
}

impl Serialize for RecordView<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let record = self.record;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("disease", record.label.as_str())?;
        map.serialize_entry("confidence", &record.confidence)?;
        map.serialize_entry(self.modality.scaled_key(), &record.scaled)?;
        if let Some(message) = &record.message {
            map.serialize_entry("error", message)?;
        }
        if record.unreliable {
            map.serialize_entry("unreliable", &true)?;
        }
        map.end()
    }
}

impl Serialize for Report {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(&RecordView {
                modality: self.modality,
                record,
            })?;
        }
        seq.end()
    }
}

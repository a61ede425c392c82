//! Shared vocabulary for the eyescan pipelines
//!
//! Condition labels, the error taxonomy, ranked results and the packaged
//! output records live here so that the text and vision crates agree on a
//! single output shape.

pub mod artifact;
pub mod error;
pub mod label;
pub mod rank;
pub mod record;

#[cfg(test)]
mod tests;

pub use artifact::{Artifact, Readiness};
pub use error::{EyescanError, Result};
pub use label::ConditionLabel;
pub use rank::{LabelScores, RankedResult, rank};
pub use record::{ERROR_LABEL, Modality, PredictionRecord, RecordLabel, Report};

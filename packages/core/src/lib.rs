//! Eye condition suggestion pipelines
//!
//! Two independent classifiers share one contract ([`pipeline::Pipeline`]):
//! an image network scoring a fetched photo and a symptom model scoring a
//! free-text description. Both produce a ranked [`Report`] that degrades to
//! a single error record on any failure. [`Classifiers`] owns the loaded
//! models, and [`diagnosis`] fuses the two reports into one suggestion.

pub mod acquire;
pub mod classifiers;
pub mod config;
pub mod diagnosis;
pub mod pipeline;
pub mod store;

pub use acquire::ImageFetcher;
pub use classifiers::Classifiers;
pub use config::{Config, ConfigError, UntrainedPolicy};
pub use diagnosis::{Diagnosis, RiskLevel, Urgency};
pub use pipeline::{ImagePipeline, Pipeline, TextPipeline};
pub use store::{Bootstrapped, Loaded, ModelStore, Origin};

pub use eyescan_types::{
    ConditionLabel, ERROR_LABEL, EyescanError, Modality, PredictionRecord, RankedResult,
    Readiness, Report, Result,
};

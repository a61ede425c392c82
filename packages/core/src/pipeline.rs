//! The contract shared by both classifiers
//!
//! A pipeline only has to produce raw per-label scores. Validation, ranking
//! and packaging into a [`Report`] are common to every implementation, and
//! any error along the way becomes a single error record.

use crate::config::{Config, UntrainedPolicy};
use crate::store::{Bootstrapped, ModelStore, Origin};
use eyescan_text::{SymptomClassifier, SymptomModel, TextPreprocessor};
use eyescan_types::{
    ConditionLabel, EyescanError, LabelScores, Modality, RankedResult, Readiness, Report, Result,
    rank,
};
use eyescan_vision::ImageClassifier;

pub trait Pipeline: Send + Sync {
    type Input: ?Sized;

    const MODALITY: Modality;

    /// Raw confidences per label, in model class order.
    fn score(&self, input: &Self::Input) -> Result<LabelScores>;

    /// Scores, validates and ranks. The flag is false when the model was untrained.
    fn evaluate(&self, input: &Self::Input) -> Result<(Vec<RankedResult>, bool)> {
        let scores = self.score(input)?;
        scores.validate()?;
        let reliable = scores.reliable;
        Ok((rank(scores), reliable))
    }

    fn run(&self, input: &Self::Input) -> Report {
        Report::from_outcome(Self::MODALITY, self.evaluate(input))
    }
}

pub struct ImagePipeline {
    /// Absent when no trained weights exist and untrained scoring is refused.
    classifier: Option<ImageClassifier>,
    policy: UntrainedPolicy,
}

impl ImagePipeline {
    pub fn new(classifier: ImageClassifier, policy: UntrainedPolicy) -> Self {
        Self {
            classifier: Some(classifier),
            policy,
        }
    }

    /// Restores trained weights. Without them, [`UntrainedPolicy::Flag`]
    /// gets a random network that is never written to disk, and
    /// [`UntrainedPolicy::Refuse`] gets no network at all.
    pub fn load(config: &Config, store: &ModelStore) -> Result<Self> {
        let options = config.image_options();
        let path = config.image_artifact_path();
        let policy = config.untrained_image_policy;

        let classifier = match policy {
            UntrainedPolicy::Flag => {
                let loaded = store.load_or_bootstrap::<ImageClassifier, _>(&path, &options, || {
                    Ok(Bootstrapped {
                        artifact: ImageClassifier::untrained(&options)?,
                        persist: false,
                    })
                })?;
                Some(loaded.artifact)
            }
            UntrainedPolicy::Refuse => match store.load::<ImageClassifier>(&path, &options) {
                Ok(classifier) => Some(classifier),
                Err(e) if e.is_persistence() => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "no trained image weights; image requests will be refused"
                    );
                    None
                }
                Err(e) => return Err(e),
            },
        };
        Ok(Self { classifier, policy })
    }

    pub fn readiness(&self) -> Readiness {
        self.classifier
            .as_ref()
            .map_or(Readiness::Untrained, ImageClassifier::readiness)
    }

    pub fn classifier(&self) -> Option<&ImageClassifier> {
        self.classifier.as_ref()
    }
}

impl Pipeline for ImagePipeline {
    type Input = [u8];

    const MODALITY: Modality = Modality::Image;

    fn score(&self, input: &[u8]) -> Result<LabelScores> {
        match &self.classifier {
            Some(classifier)
                if classifier.readiness() == Readiness::Trained
                    || self.policy == UntrainedPolicy::Flag =>
            {
                classifier.score(input)
            }
            _ => Err(EyescanError::Inference("image model is untrained".to_string())),
        }
    }
}

pub struct TextPipeline {
    classifier: SymptomClassifier,
    origin: Origin,
}

impl TextPipeline {
    pub fn new(model: SymptomModel) -> Self {
        Self {
            classifier: SymptomClassifier::new(model),
            origin: Origin::Bootstrapped,
        }
    }

    /// Loads the persisted symptom model, or fits one on the seed corpus and
    /// persists it.
    pub fn load(config: &Config, store: &ModelStore) -> Result<Self> {
        let path = config.text_artifact_path();
        let loaded = store.load_or_bootstrap::<SymptomModel, _>(&path, &(), || {
            Ok(Bootstrapped {
                artifact: SymptomModel::bootstrap(&TextPreprocessor::new())?,
                persist: true,
            })
        })?;
        Ok(Self {
            classifier: SymptomClassifier::new(loaded.artifact),
            origin: loaded.origin,
        })
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn classes(&self) -> &[ConditionLabel] {
        self.classifier.classes()
    }

    pub fn classifier(&self) -> &SymptomClassifier {
        &self.classifier
    }
}

impl Pipeline for TextPipeline {
    type Input = str;

    const MODALITY: Modality = Modality::Text;

    fn score(&self, input: &str) -> Result<LabelScores> {
        self.classifier.score(input)
    }
}

use crate::artifact;
use crate::bayes::SymptomNb;
use crate::preprocess::TextPreprocessor;
use crate::seed::SEED_CORPUS;
use crate::tfidf::{DEFAULT_MAX_FEATURES, SparseVector, TfidfVectorizer};
use eyescan_types::{Artifact, ConditionLabel, EyescanError, LabelScores, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const MODEL_TYPE: &str = "tfidf-multinomial-nb";

/// # Fitted vectorizer and classifier, persisted as one artifact
///
/// The two halves share one feature space; keeping them in a single value
/// means they are always loaded and saved together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomModel {
    vectorizer: TfidfVectorizer,
    classifier: SymptomNb,
}

impl SymptomModel {
    /// Fits on `(description, label)` pairs after running them through `preprocessor`.
    pub fn fit(
        preprocessor: &TextPreprocessor,
        corpus: &[(&str, ConditionLabel)],
    ) -> Result<Self> {
        let docs: Vec<String> = corpus
            .iter()
            .map(|(text, _)| preprocessor.preprocess(text))
            .collect();
        let labels: Vec<ConditionLabel> = corpus.iter().map(|(_, label)| *label).collect();

        let (vectorizer, rows) = TfidfVectorizer::fit_transform(&docs, (1, 2), DEFAULT_MAX_FEATURES)?;
        let classifier = SymptomNb::fit(&rows, &labels, 1.0)?;

        tracing::info!(
            samples = corpus.len(),
            classes = classifier.classes().len(),
            features = vectorizer.dim(),
            "fitted symptom model"
        );
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Fits on the embedded seed corpus.
    pub fn bootstrap(preprocessor: &TextPreprocessor) -> Result<Self> {
        Self::fit(preprocessor, &SEED_CORPUS)
    }

    pub fn classes(&self) -> &[ConditionLabel] {
        self.classifier.classes()
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &SymptomNb {
        &self.classifier
    }

    pub fn vectorize(&self, preprocessed: &str) -> Result<SparseVector> {
        self.vectorizer.transform(preprocessed)
    }

    /// Rejects a decoded pair whose halves do not describe one feature space.
    fn check(&self) -> std::result::Result<(), String> {
        self.vectorizer.validate()?;
        if self.vectorizer.dim() != self.classifier.n_features() {
            return Err(format!(
                "vectorizer has {} terms but classifier expects {} features",
                self.vectorizer.dim(),
                self.classifier.n_features()
            ));
        }
        self.classifier.validate()
    }

    pub fn score_vector(&self, row: &SparseVector) -> Result<LabelScores> {
        if row.dim != self.classifier.n_features() {
            return Err(EyescanError::Vectorization(format!(
                "vectorizer produced {} features but the classifier expects {}",
                row.dim,
                self.classifier.n_features()
            )));
        }
        Ok(LabelScores::new(self.classifier.predict_proba(row)?))
    }
}

impl Artifact for SymptomModel {
    type Options = ();

    const KIND: &'static str = "symptom-classifier";

    fn load(path: &Path, _options: &()) -> Result<Self> {
        let model: SymptomModel = artifact::read(path, MODEL_TYPE)?;
        model
            .check()
            .map_err(|message| EyescanError::persistence(path, message))?;
        Ok(model)
    }

    fn save(&self, path: &Path) -> Result<()> {
        artifact::write(path, MODEL_TYPE, self)
    }
}

/// Scores free-text symptom descriptions against the fitted classes.
#[derive(Debug, Clone)]
pub struct SymptomClassifier {
    preprocessor: TextPreprocessor,
    model: SymptomModel,
}

impl SymptomClassifier {
    pub fn new(model: SymptomModel) -> Self {
        Self {
            preprocessor: TextPreprocessor::new(),
            model,
        }
    }

    pub fn model(&self) -> &SymptomModel {
        &self.model
    }

    /// Labels this classifier can return; a subset of [`ConditionLabel::ALL`].
    pub fn classes(&self) -> &[ConditionLabel] {
        self.model.classes()
    }

    pub fn preprocess(&self, text: &str) -> String {
        self.preprocessor.preprocess(text)
    }

    /// Probability per fitted class, in declared label order.
    pub fn score(&self, text: &str) -> Result<LabelScores> {
        let preprocessed = self.preprocess(text);
        tracing::debug!(input = %text, preprocessed = %preprocessed, "scoring symptoms");
        let row = self.model.vectorize(&preprocessed)?;
        self.model.score_vector(&row)
    }
}

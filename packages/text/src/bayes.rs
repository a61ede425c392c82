//! Multinomial naive Bayes over TF-IDF rows, backed by `linfa-bayes`
//!
//! Sparse rows are densified before fitting and scoring. Classes are stored
//! as [`ConditionLabel::index`] values so the fitted model orders them the
//! same way the labels are declared.

use crate::tfidf::SparseVector;
use eyescan_types::{ConditionLabel, EyescanError, Result};
use linfa::Dataset;
use linfa::traits::Fit;
use linfa_bayes::{MultinomialNb, NaiveBayes};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::panic::{AssertUnwindSafe, catch_unwind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomNb {
    /// Classes seen during fitting, in declared label order.
    classes: Vec<ConditionLabel>,
    n_features: usize,
    alpha: f64,
    model: MultinomialNb<f64, usize>,
}

/// Writes `rows` into a dense `rows × n_features` matrix.
fn densify<'a>(
    rows: impl ExactSizeIterator<Item = &'a SparseVector>,
    n_features: usize,
) -> Result<Array2<f64>> {
    let mut dense = Array2::<f64>::zeros((rows.len(), n_features));
    for (i, row) in rows.enumerate() {
        for &(feature, value) in &row.entries {
            let cell = dense.get_mut([i, feature]).ok_or_else(|| {
                EyescanError::Vectorization(format!(
                    "feature index {feature} is outside the {n_features}-column space"
                ))
            })?;
            *cell = value;
        }
    }
    Ok(dense)
}

impl SymptomNb {
    pub fn fit(rows: &[SparseVector], labels: &[ConditionLabel], alpha: f64) -> Result<Self> {
        if rows.is_empty() || rows.len() != labels.len() {
            return Err(EyescanError::Inference(format!(
                "cannot fit on {} rows with {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if alpha <= 0.0 {
            return Err(EyescanError::Inference(format!(
                "smoothing alpha must be positive, got {alpha}"
            )));
        }
        let n_features = rows[0].dim;
        if let Some(row) = rows.iter().find(|row| row.dim != n_features) {
            return Err(EyescanError::Vectorization(format!(
                "inconsistent row dimensions (expected {n_features}, got {})",
                row.dim
            )));
        }

        let records = densify(rows.iter(), n_features)?;
        let targets: Array1<usize> = labels.iter().map(|label| label.index()).collect();
        let model = MultinomialNb::params()
            .alpha(alpha)
            .fit(&Dataset::new(records, targets))
            .map_err(|e| EyescanError::Inference(format!("naive Bayes fit failed: {e}")))?;

        let classes = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            classes,
            n_features,
            alpha,
            model,
        })
    }

    pub fn classes(&self) -> &[ConditionLabel] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Posterior over the fitted classes, in declared label order.
    pub fn predict_proba(&self, row: &SparseVector) -> Result<Vec<(ConditionLabel, f64)>> {
        if row.dim != self.n_features {
            return Err(EyescanError::Vectorization(format!(
                "feature vector has {} dimensions but the model expects {}",
                row.dim, self.n_features
            )));
        }
        let dense = densify(std::iter::once(row), self.n_features)?;
        let (proba, indices) = self.model.predict_proba(dense.view());

        let labels = indices
            .into_iter()
            .map(|&index| {
                ConditionLabel::from_index(index).ok_or_else(|| {
                    EyescanError::Inference(format!("model returned unknown class index {index}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if labels != self.classes {
            return Err(EyescanError::Inference(format!(
                "model classes {labels:?} differ from the recorded {:?}",
                self.classes
            )));
        }

        Ok(labels.into_iter().zip(proba.row(0).iter().copied()).collect())
    }

    /// Checks a decoded model against its recorded classes and width.
    ///
    /// The fitted parameters are private to `linfa-bayes`, so the check
    /// scores a zero row and treats a shape panic as a mismatch.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("classifier has no classes".to_string());
        }
        if !self.classes.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(format!("classes {:?} are not in label order", self.classes));
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 {
            return Err(format!("smoothing alpha {} is not positive", self.alpha));
        }

        let zero = SparseVector::zeros(self.n_features);
        match catch_unwind(AssertUnwindSafe(|| self.predict_proba(&zero))) {
            Ok(Ok(proba)) if proba.iter().all(|(_, p)| p.is_finite()) => Ok(()),
            Ok(Ok(_)) => Err("classifier produced non-finite probabilities".to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "classifier parameters do not span {} features",
                self.n_features
            )),
        }
    }
}

//! TF-IDF vectorizer over word unigrams and bigrams
//!
//! Fitting builds a vocabulary capped at `max_features` terms (most frequent
//! across the corpus, ties broken alphabetically), indexed alphabetically.
//! Weights are raw term counts times the smoothed inverse document
//! frequency `ln((1 + n) / (1 + df)) + 1`, and each row is L2-normalized.

use eyescan_types::{EyescanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// A sparse row over a fixed vocabulary, entries sorted by column index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub dim: usize,
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, v)| *v == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    max_features: usize,
}

/// Splits into runs of word characters at least two characters long.
fn tokenize(doc: &str) -> Vec<&str> {
    doc.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .collect()
}

/// Unigrams first, then each higher order in document order.
fn ngrams(tokens: &[&str], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n.min(tokens.len()) {
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

fn term_counts(terms: Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

impl TfidfVectorizer {
    pub fn fit(docs: &[String], ngram_range: (usize, usize), max_features: usize) -> Result<Self> {
        if docs.is_empty() {
            return Err(EyescanError::Vectorization(
                "cannot fit a vectorizer on an empty corpus".to_string(),
            ));
        }
        if ngram_range.0 == 0 || ngram_range.0 > ngram_range.1 {
            return Err(EyescanError::Vectorization(format!(
                "invalid ngram range {ngram_range:?}"
            )));
        }

        let per_doc: Vec<HashMap<String, usize>> = docs
            .iter()
            .map(|doc| term_counts(ngrams(&tokenize(doc), ngram_range)))
            .collect();

        // BTreeMap keeps candidates alphabetical, which is also the tie-break order
        let mut corpus_freq: BTreeMap<&str, usize> = BTreeMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for counts in &per_doc {
            for (term, count) in counts {
                *corpus_freq.entry(term).or_insert(0) += count;
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }
        if corpus_freq.is_empty() {
            return Err(EyescanError::Vectorization(
                "empty vocabulary; documents contain no terms".to_string(),
            ));
        }

        let mut candidates: Vec<(&str, usize)> = corpus_freq.into_iter().collect();
        if candidates.len() > max_features {
            candidates.sort_by(|a, b| b.1.cmp(&a.1));
            candidates.truncate(max_features);
            candidates.sort_by(|a, b| a.0.cmp(b.0));
        }

        let n_docs = docs.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(candidates.len());
        for (index, (term, _)) in candidates.into_iter().enumerate() {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term.to_string(), index);
        }

        tracing::debug!(
            terms = vocabulary.len(),
            docs = docs.len(),
            "fitted tf-idf vocabulary"
        );

        Ok(Self {
            vocabulary,
            idf,
            ngram_range,
            max_features,
        })
    }

    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Checks that a decoded vectorizer describes one consistent feature
    /// space: every column is named by exactly one term and has a finite
    /// positive weight.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.idf.is_empty() {
            return Err("vectorizer has an empty vocabulary".to_string());
        }
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        if self.ngram_range.0 == 0 || self.ngram_range.0 > self.ngram_range.1 {
            return Err(format!("invalid ngram range {:?}", self.ngram_range));
        }

        let mut seen = vec![false; self.idf.len()];
        for (term, &index) in &self.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(format!("column {index} is assigned to several terms")),
                None => {
                    return Err(format!(
                        "term `{term}` maps to column {index} of {}",
                        self.idf.len()
                    ));
                }
            }
        }

        if let Some(weight) = self.idf.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(format!("invalid idf weight {weight}"));
        }
        Ok(())
    }

    /// Encodes one document; out-of-vocabulary terms are ignored and an
    /// empty document maps to the zero vector.
    pub fn transform(&self, doc: &str) -> Result<SparseVector> {
        let mut entries = Vec::new();
        for (term, count) in term_counts(ngrams(&tokenize(doc), self.ngram_range)) {
            let Some(&index) = self.vocabulary.get(&term) else {
                continue;
            };
            let idf = self.idf.get(index).ok_or_else(|| {
                EyescanError::Vectorization(format!(
                    "term `{term}` maps to column {index} but only {} idf weights exist",
                    self.idf.len()
                ))
            })?;
            entries.push((index, count as f64 * idf));
        }
        entries.sort_by_key(|(index, _)| *index);

        let mut row = SparseVector {
            dim: self.dim(),
            entries,
        };
        let norm = row.norm();
        if norm > 0.0 {
            for (_, value) in &mut row.entries {
                *value /= norm;
            }
        }
        Ok(row)
    }

    /// Points `term` at `index`; lets tests build inconsistent vectorizers.
    #[cfg(test)]
    pub(crate) fn remap(&mut self, term: &str, index: usize) {
        self.vocabulary.insert(term.to_string(), index);
    }

    pub fn fit_transform(
        docs: &[String],
        ngram_range: (usize, usize),
        max_features: usize,
    ) -> Result<(Self, Vec<SparseVector>)> {
        let vectorizer = Self::fit(docs, ngram_range, max_features)?;
        let rows = docs
            .iter()
            .map(|doc| vectorizer.transform(doc))
            .collect::<Result<Vec<_>>>()?;
        Ok((vectorizer, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "red eye itchy".to_string(),
            "dry eye gritty".to_string(),
            "red lump lid".to_string(),
        ]
    }

    #[test]
    fn tokenize_drops_single_characters() {
        assert_eq!(tokenize("a red  eye x"), vec!["red", "eye"]);
    }

    #[test]
    fn ngrams_include_bigrams_after_unigrams() {
        let terms = ngrams(&["red", "eye", "itchy"], (1, 2));
        assert_eq!(terms, vec!["red", "eye", "itchy", "red eye", "eye itchy"]);
    }

    #[test]
    fn vocabulary_is_alphabetical() {
        let vectorizer = TfidfVectorizer::fit(&corpus(), (1, 2), DEFAULT_MAX_FEATURES).unwrap();
        let terms: Vec<_> = vectorizer.vocabulary().keys().cloned().collect();
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
        for (expected, (_, index)) in vectorizer.vocabulary().iter().enumerate() {
            assert_eq!(*index, expected);
        }
        assert!(vectorizer.vocabulary().contains_key("red eye"));
    }

    #[test]
    fn max_features_keeps_most_frequent() {
        let vectorizer = TfidfVectorizer::fit(&corpus(), (1, 1), 2).unwrap();
        // "eye" and "red" both occur twice; every other term once
        let terms: Vec<_> = vectorizer.vocabulary().keys().cloned().collect();
        assert_eq!(terms, vec!["eye", "red"]);
    }

    #[test]
    fn rows_are_unit_length() {
        let (_, rows) = TfidfVectorizer::fit_transform(&corpus(), (1, 2), 1000).unwrap();
        for row in rows {
            assert!((row.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn idf_is_smoothed() {
        let vectorizer = TfidfVectorizer::fit(&corpus(), (1, 1), 1000).unwrap();
        let eye = vectorizer.vocabulary()["eye"];
        let lump = vectorizer.vocabulary()["lump"];
        assert!((vectorizer.idf[eye] - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((vectorizer.idf[lump] - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn unknown_and_empty_documents_map_to_zero() {
        let vectorizer = TfidfVectorizer::fit(&corpus(), (1, 2), 1000).unwrap();
        let empty = vectorizer.transform("").unwrap();
        assert_eq!(empty.dim, vectorizer.dim());
        assert!(empty.is_zero());
        assert!(vectorizer.transform("blurry vision").unwrap().is_zero());
    }

    #[test]
    fn fitted_vectorizer_validates() {
        let vectorizer = TfidfVectorizer::fit(&corpus(), (1, 2), 1000).unwrap();
        assert_eq!(vectorizer.validate(), Ok(()));
    }

    #[test]
    fn out_of_range_column_is_rejected() {
        let mut vectorizer = TfidfVectorizer::fit(&corpus(), (1, 1), 1000).unwrap();
        vectorizer.remap("red", 99_999);
        assert!(vectorizer.validate().unwrap_err().contains("99999"));
        assert!(matches!(
            vectorizer.transform("red eye"),
            Err(EyescanError::Vectorization(_))
        ));
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let mut vectorizer = TfidfVectorizer::fit(&corpus(), (1, 1), 1000).unwrap();
        let eye = vectorizer.vocabulary()["eye"];
        vectorizer.remap("red", eye);
        assert!(vectorizer.validate().is_err());
    }

    #[test]
    fn non_finite_idf_is_rejected() {
        let mut vectorizer = TfidfVectorizer::fit(&corpus(), (1, 1), 1000).unwrap();
        vectorizer.idf[0] = f64::NAN;
        assert!(vectorizer.validate().is_err());
    }

    #[test]
    fn fit_rejects_empty_corpus() {
        assert!(TfidfVectorizer::fit(&[], (1, 2), 1000).is_err());
        assert!(TfidfVectorizer::fit(&["a b".to_string()], (1, 2), 1000).is_err());
    }
}

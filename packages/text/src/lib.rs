//! Free-text symptom classification
//!
//! Symptom descriptions are normalized ([`preprocess`]), encoded with a
//! TF-IDF vectorizer ([`tfidf`]) and scored by `linfa-bayes`' multinomial
//! naive Bayes ([`bayes`]). Vectorizer and model are persisted together as one
//! [`SymptomModel`] artifact so a mismatched pair can never be loaded.

pub mod artifact;
pub mod bayes;
pub mod classifier;
pub mod lemma;
pub mod preprocess;
pub mod seed;
pub mod stopwords;
pub mod tfidf;


pub use bayes::SymptomNb;
pub use classifier::{SymptomClassifier, SymptomModel};
pub use preprocess::TextPreprocessor;
pub use seed::SEED_CORPUS;
pub use tfidf::{SparseVector, TfidfVectorizer};

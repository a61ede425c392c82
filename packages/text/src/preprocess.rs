use crate::lemma::Lemmatizer;
use crate::stopwords;
use std::collections::HashSet;

/// Normalizes symptom descriptions before vectorization.
///
/// lowercase → keep ASCII letters and whitespace → split → drop stopwords →
/// lemmatize → join with single spaces. Output is a pure function of the
/// input, which the fitted vocabulary relies on.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    stopwords: HashSet<String>,
    lemmatizer: Lemmatizer,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextPreprocessor {
    pub fn new() -> Self {
        Self {
            stopwords: stopwords::english(),
            lemmatizer: Lemmatizer::new(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn preprocess(&self, text: &str) -> String {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|word| !self.is_stopword(word))
            .map(|word| self.lemmatizer.lemmatize(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

//! English stopwords removed before lemmatization
//!
//! The list is NLTK's English corpus as shipped by the `stop-words` crate.
//! Entries with apostrophes can never match after character stripping and
//! are harmless.

use std::collections::HashSet;

pub fn english() -> HashSet<String> {
    stop_words::get(stop_words::LANGUAGE::English)
        .iter()
        .map(|word| word.to_string())
        .collect()
}

//! Dictionary-backed noun lemmatizer
//!
//! Irregular and verb forms are looked up in an embedded dictionary; every
//! other word goes through the regular noun-inflection suffix rules.

use std::borrow::Cow;
use std::collections::HashMap;

/// Forms the suffix rules would get wrong, and common verb forms seen in
/// symptom descriptions.
const LEMMA_DICTIONARY: &[(&str, &str)] = &[
    ("always", "always"),
    ("perhaps", "perhaps"),
    ("sometimes", "sometimes"),
    ("news", "news"),
    ("series", "series"),
    ("species", "species"),
    ("diabetes", "diabetes"),
    ("herpes", "herpes"),
    ("measles", "measles"),
    ("mumps", "mumps"),
    ("lens", "lens"),
    ("lenses", "lens"),
    ("irises", "iris"),
    ("viruses", "virus"),
    ("corneae", "cornea"),
    ("bacteria", "bacterium"),
    ("children", "child"),
    ("women", "woman"),
    ("men", "man"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("aches", "ache"),
    ("headaches", "headache"),
    ("burning", "burn"),
    ("itching", "itch"),
    ("watering", "water"),
    ("tearing", "tear"),
    ("drooping", "droop"),
    ("blurred", "blur"),
];

/// Suffix rewrite rules, tried in order; the first applicable one wins.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("shes", "sh"),
    ("ches", "ch"),
    ("xes", "x"),
    ("s", ""),
];

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    dictionary: HashMap<&'static str, &'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            dictionary: LEMMA_DICTIONARY.iter().copied().collect(),
        }
    }

    /// Reduces `word` (lowercase ASCII) to its dictionary base form.
    pub fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if let Some(lemma) = self.dictionary.get(word) {
            return Cow::Borrowed(*lemma);
        }
        if word.len() <= 3 || word.ends_with("ss") || word.ends_with("us") || word.ends_with("is")
        {
            return Cow::Borrowed(word);
        }

        for (suffix, replacement) in NOUN_SUFFIX_RULES {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            match *suffix {
                // "ties" -> "ty" is wrong; keep short words on the plain "s" rule
                "ies" if word.len() <= 4 => continue,
                // "patches" -> "patch", but "aches" -> "ache"
                "ches" if !stem.ends_with(|c: char| !"aeiou".contains(c)) => continue,
                _ => {}
            }
            return Cow::Owned(format!("{stem}{replacement}"));
        }

        Cow::Borrowed(word)
    }
}

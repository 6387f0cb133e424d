//! Phrase normalizer
//!
//! lowercase → drop digit-bearing words → split on whitespace → strip
//! punctuation → drop stopwords → lemmatize (falling back to the token).

use super::lexicon::{Lemmatizer, Lexicon};
use super::stopwords::ENGLISH_STOPWORDS;
use std::collections::HashSet;
use std::fmt;

pub struct Normalizer {
    stopwords: HashSet<String>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Normalizer {
    pub fn new(stopwords: HashSet<String>, lemmatizer: impl Lemmatizer + 'static) -> Self {
        Self {
            stopwords,
            lemmatizer: Box::new(lemmatizer),
        }
    }

    /// English stopwords with the bundled lexicon
    pub fn english() -> Self {
        Self::with_lexicon(Lexicon::bundled())
    }

    /// English stopwords with a caller-supplied lexicon
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        let stopwords = ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect();
        Self::new(stopwords, lexicon)
    }

    /// Add stopwords on top of the current set
    pub fn extend_stopwords<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Normalize every phrase into its token list, preserving order
    pub fn normalize<S: AsRef<str>>(&self, phrases: &[S]) -> Vec<Vec<String>> {
        phrases
            .iter()
            .map(|phrase| self.normalize_phrase(phrase.as_ref()))
            .collect()
    }

    pub fn normalize_phrase(&self, phrase: &str) -> Vec<String> {
        phrase
            .to_lowercase()
            .split_whitespace()
            .filter(|word| !word.chars().any(char::is_numeric))
            .map(|word| word.trim_matches(|c: char| c.is_ascii_punctuation()))
            .filter(|token| !token.is_empty() && !self.is_stopword(token))
            .map(|token| {
                self.lemmatizer
                    .lemma(token)
                    .unwrap_or_else(|| token.to_string())
            })
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}

//! Morphological lemma lookup
//!
//! Exceptions are consulted first, then known base forms, then suffix
//! detachment rules. A detached candidate is only accepted when it is a known
//! base form, so unknown words come back as `None`.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

/// Maps an inflected token to its base form
pub trait Lemmatizer: Send + Sync {
    /// Base form of `token`, or `None` when no lemma is known
    fn lemma(&self, token: &str) -> Option<String>;
}

/// Suffix detachment rules, noun rules first, then verb, then adjective.
const DETACHMENT_RULES: &[(&str, &str)] = &[
    // nouns
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
    // verbs
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
    // adjectives
    ("er", ""),
    ("est", ""),
    ("er", "e"),
    ("est", "e"),
];

const BUNDLED_LEXICON: &str = include_str!("../../data/lexicon.txt");

/// Word list backed lemmatizer
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    base_forms: HashSet<String>,
    exceptions: HashMap<String, String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexicon shipped with the crate
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_LEXICON)
    }

    /// Parse a lexicon file body.
    ///
    /// One base form per line, or `inflected base` pairs for irregular forms.
    /// Blank lines and `#` comments are skipped; words are lowercased.
    pub fn parse(text: &str) -> Self {
        let mut lexicon = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut words = line.split_whitespace();
            match (words.next(), words.next()) {
                (Some(base), None) => lexicon.insert_base_form(base),
                (Some(form), Some(base)) => lexicon.insert_exception(form, base),
                _ => {}
            }
        }
        lexicon
    }

    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn insert_base_form(&mut self, word: &str) {
        self.base_forms.insert(word.to_lowercase());
    }

    /// Register an irregular form; its base is also recorded as a base form
    pub fn insert_exception(&mut self, form: &str, base: &str) {
        let base = base.to_lowercase();
        self.base_forms.insert(base.clone());
        self.exceptions.insert(form.to_lowercase(), base);
    }

    /// Merge another lexicon into this one; entries in `other` win
    pub fn extend(&mut self, other: Lexicon) {
        self.base_forms.extend(other.base_forms);
        self.exceptions.extend(other.exceptions);
    }

    pub fn len(&self) -> usize {
        self.base_forms.len() + self.exceptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base_forms.is_empty() && self.exceptions.is_empty()
    }
}

impl Lemmatizer for Lexicon {
    fn lemma(&self, token: &str) -> Option<String> {
        if let Some(base) = self.exceptions.get(token) {
            return Some(base.clone());
        }
        if self.base_forms.contains(token) {
            return Some(token.to_string());
        }

        DETACHMENT_RULES.iter().find_map(|(suffix, ending)| {
            let stem = token.strip_suffix(suffix)?;
            if stem.is_empty() {
                return None;
            }
            let candidate = format!("{stem}{ending}");
            self.base_forms.contains(&candidate).then_some(candidate)
        })
    }
}

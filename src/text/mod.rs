//! Text normalization for cluster labeling
//!
//! Turns skill titles into lowercase, lemmatized content tokens.

pub mod lexicon;
pub mod normalizer;
pub mod stopwords;

pub use lexicon::{Lemmatizer, Lexicon};
pub use normalizer::Normalizer;
pub use stopwords::ENGLISH_STOPWORDS;

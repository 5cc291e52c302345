//! Taxo Extractor - Taxonomic entity recognition
//!
//! Wraps a pretrained recognition model behind the [`TaxonRecognizer`]
//! capability and exposes per-text species extraction on top of it. The
//! model is loaded once per run, owned explicitly by the caller, and passed
//! by reference into each extraction.

use taxo_core::Result;

/// A labeled text span produced by a recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSpan {
    /// Surface text of the span
    pub text: String,
    /// Label from the model's vocabulary (e.g. "TAXON")
    pub label: String,
    /// Byte offset of the span start in the analyzed text
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
}

/// Capability trait for entity recognizers emitting labeled spans.
///
/// Implementations must be pure with respect to their input: the same text
/// against the same model state yields the same spans.
pub trait TaxonRecognizer: Send + Sync {
    fn process(&self, text: &str) -> Result<Vec<LabeledSpan>>;

    /// Model name for logging
    fn name(&self) -> &str;
}

pub mod lexicon;
pub mod species;

pub use lexicon::{LexiconModel, LexiconRecognizer};
pub use species::SpeciesExtractor;

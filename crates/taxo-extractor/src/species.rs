//! Species extraction on top of a recognizer
//!
//! [`SpeciesExtractor`] owns the loaded model for the duration of a run and
//! turns one text value into the deduplicated set of taxon mentions.

use std::collections::BTreeSet;

use taxo_core::Result;

use crate::TaxonRecognizer;

/// Extracts the set of unique taxon mentions from a single text value.
///
/// Keeps only spans carrying the configured taxon label, trims surrounding
/// whitespace, and deduplicates by exact string equality. The returned
/// `BTreeSet` makes downstream serialization order lexicographic and
/// deterministic.
pub struct SpeciesExtractor<R> {
    recognizer: R,
    taxon_label: String,
}

impl<R: TaxonRecognizer> SpeciesExtractor<R> {
    /// Wrap a recognizer, keeping spans labeled `taxon_label`.
    ///
    /// The label is a property of the chosen model, so it is passed in as
    /// configuration rather than hardcoded here.
    pub fn new(recognizer: R, taxon_label: impl Into<String>) -> Self {
        Self {
            recognizer,
            taxon_label: taxon_label.into(),
        }
    }

    /// Extract the unique taxon mentions from `text`.
    ///
    /// Absent or whitespace-only input returns the empty set without
    /// invoking the model.
    pub fn extract(&self, text: &str) -> Result<BTreeSet<String>> {
        if text.trim().is_empty() {
            return Ok(BTreeSet::new());
        }

        let spans = self.recognizer.process(text)?;
        Ok(spans
            .into_iter()
            .filter(|s| s.label == self.taxon_label)
            .map(|s| s.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect())
    }

    /// The wrapped recognizer
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::lexicon::{LexiconModel, LexiconRecognizer};
    use crate::LabeledSpan;

    /// Stub recognizer that replays fixed spans and counts invocations
    struct StubRecognizer {
        spans: Vec<LabeledSpan>,
        calls: AtomicUsize,
    }

    impl StubRecognizer {
        fn new(spans: Vec<(&str, &str)>) -> Self {
            let spans = spans
                .into_iter()
                .map(|(text, label)| LabeledSpan {
                    text: text.to_string(),
                    label: label.to_string(),
                    start: 0,
                    end: text.len(),
                })
                .collect();
            Self {
                spans,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TaxonRecognizer for StubRecognizer {
        fn process(&self, _text: &str) -> Result<Vec<LabeledSpan>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.spans.clone())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[test]
    fn test_blank_input_short_circuits_the_model() {
        let extractor = SpeciesExtractor::new(StubRecognizer::new(vec![]), "TAXON");

        assert!(extractor.extract("").unwrap().is_empty());
        assert!(extractor.extract("   \t\n").unwrap().is_empty());
        assert_eq!(extractor.recognizer().calls(), 0);

        extractor.extract("some text").unwrap();
        assert_eq!(extractor.recognizer().calls(), 1);
    }

    #[test]
    fn test_only_configured_label_is_kept() {
        let stub = StubRecognizer::new(vec![
            ("Apis mellifera", "TAXON"),
            ("15 days", "DURATION"),
            ("Bombus terrestris", "TAXON"),
        ]);
        let extractor = SpeciesExtractor::new(stub, "TAXON");

        let species = extractor.extract("anything").unwrap();
        let names: Vec<&str> = species.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["Apis mellifera", "Bombus terrestris"]);
    }

    #[test]
    fn test_spans_are_trimmed_and_deduplicated() {
        let stub = StubRecognizer::new(vec![
            (" Apis mellifera ", "TAXON"),
            ("Apis mellifera", "TAXON"),
            ("   ", "TAXON"),
        ]);
        let extractor = SpeciesExtractor::new(stub, "TAXON");

        let species = extractor.extract("anything").unwrap();
        assert_eq!(species.len(), 1);
        assert!(species.contains("Apis mellifera"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let recognizer = LexiconRecognizer::new(LexiconModel::builtin().unwrap()).unwrap();
        let extractor = SpeciesExtractor::new(recognizer, "TAXON");
        let text = "Apis mellifera and Bombus terrestris visited Trifolium fields; \
                    honey bee traffic peaked at noon.";

        let first = extractor.extract(text).unwrap();
        let second = extractor.extract(text).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("Apis mellifera"));
    }

    #[test]
    fn test_result_order_is_lexicographic() {
        let stub = StubRecognizer::new(vec![
            ("Zostera marina", "TAXON"),
            ("Apis mellifera", "TAXON"),
            ("Mus musculus", "TAXON"),
        ]);
        let extractor = SpeciesExtractor::new(stub, "TAXON");

        let species = extractor.extract("anything").unwrap();
        let names: Vec<&str> = species.iter().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["Apis mellifera", "Mus musculus", "Zostera marina"]
        );
    }
}

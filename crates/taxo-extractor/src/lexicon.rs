//! Lexicon-backed taxonomic recognizer
//!
//! The production [`TaxonRecognizer`]: a pretrained lexicon model (term
//! dictionary plus binomial-nomenclature patterns) loaded once from a JSON
//! file or from the builtin English lexicon bundled with the binary.
//!
//! Recognition runs three passes over the text:
//! - dictionary: case-insensitive whole-word match of every lexicon term
//! - binomial: `Genus epithet` pairs where the genus appears in the lexicon
//! - abbreviated: `G. epithet` where both initial and epithet are known
//!
//! Overlapping candidates are resolved in favor of the longer span, so
//! "Apis mellifera" wins over a bare genus match on "Apis".

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use taxo_core::{Result, TaxoError};

use crate::{LabeledSpan, TaxonRecognizer};

const BUILTIN_LEXICON: &str = include_str!("lexicon/en_taxon_lexicon.json");

// ============================================================================
// Model file format
// ============================================================================

/// On-disk lexicon model: named term lists plus the label the model assigns
/// to every recognized span.
///
/// Scientific terms (binomials and bare genera) seed the nomenclature
/// patterns; vernacular terms are matched by dictionary lookup only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconModel {
    /// Model name, reported in logs
    pub name: String,

    /// Label emitted for every recognized span
    pub label: String,

    /// Scientific names: `Genus epithet` binomials or bare genera
    pub scientific: Vec<String>,

    /// Vernacular names
    #[serde(default)]
    pub vernacular: Vec<String>,
}

impl LexiconModel {
    /// The builtin English taxon lexicon bundled with the binary
    pub fn builtin() -> Result<Self> {
        serde_json::from_str(BUILTIN_LEXICON)
            .map_err(|e| TaxoError::ModelLoad(format!("builtin lexicon: {e}")))
    }

    /// Load a lexicon model from a JSON file.
    ///
    /// Any failure (missing file, malformed JSON, empty term lists) is a
    /// [`TaxoError::ModelLoad`] and fatal to the run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| TaxoError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let model: LexiconModel = serde_json::from_str(&content)
            .map_err(|e| TaxoError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        if model.scientific.is_empty() && model.vernacular.is_empty() {
            return Err(TaxoError::ModelLoad(format!(
                "{}: lexicon has no terms",
                path.display()
            )));
        }
        Ok(model)
    }

    /// All terms, scientific and vernacular
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.scientific
            .iter()
            .chain(self.vernacular.iter())
            .map(String::as_str)
    }
}

// ============================================================================
// Recognizer
// ============================================================================

/// Lexicon-backed recognizer holding the loaded model and its derived
/// lookup structures. Constructed once per run.
pub struct LexiconRecognizer {
    model: LexiconModel,
    /// Lowercased unique terms for the dictionary pass
    term_lookup: Vec<String>,
    /// Genus words from the scientific term list
    genera: HashSet<String>,
    /// Species epithets from binomial scientific terms
    epithets: HashSet<String>,
    /// Initial letters of the known genera
    genus_initials: HashSet<char>,
    binomial: Regex,
    abbreviated: Regex,
}

impl LexiconRecognizer {
    /// Build a recognizer over a loaded model
    pub fn new(model: LexiconModel) -> Result<Self> {
        let mut term_lookup: Vec<String> =
            model.terms().map(|t| t.to_ascii_lowercase()).collect();
        term_lookup.sort();
        term_lookup.dedup();

        let mut genera = HashSet::new();
        let mut epithets = HashSet::new();
        for term in &model.scientific {
            let mut words = term.split_whitespace();
            let Some(first) = words.next() else {
                continue;
            };
            if !is_genus_word(first) {
                continue;
            }
            match words.next() {
                Some(second) if is_epithet_word(second) && words.next().is_none() => {
                    genera.insert(first.to_string());
                    epithets.insert(second.to_string());
                }
                None => {
                    genera.insert(first.to_string());
                }
                _ => {}
            }
        }
        let genus_initials = genera.iter().filter_map(|g| g.chars().next()).collect();

        let binomial = Regex::new(r"\b([A-Z][a-z]+)\s+([a-z][a-z-]{2,})\b")
            .map_err(|e| TaxoError::ModelLoad(e.to_string()))?;
        let abbreviated = Regex::new(r"\b([A-Z])\.\s*([a-z][a-z-]{2,})\b")
            .map_err(|e| TaxoError::ModelLoad(e.to_string()))?;

        Ok(Self {
            model,
            term_lookup,
            genera,
            epithets,
            genus_initials,
            binomial,
            abbreviated,
        })
    }

    /// Load the model named by `path`, or the builtin lexicon when `path`
    /// is `None`, and build a recognizer over it.
    pub fn from_path(path: Option<&Path>) -> Result<Self> {
        let model = match path {
            Some(path) => LexiconModel::load(path)?,
            None => LexiconModel::builtin()?,
        };
        Self::new(model)
    }

    /// The loaded model
    pub fn model(&self) -> &LexiconModel {
        &self.model
    }

    /// Case-insensitive whole-word dictionary matches
    fn match_dictionary(&self, text: &str, lower: &str, spans: &mut Vec<LabeledSpan>) {
        for term in &self.term_lookup {
            for (start, matched) in lower.match_indices(term.as_str()) {
                let end = start + matched.len();
                if !on_word_boundary(lower, start, end) {
                    continue;
                }
                spans.push(self.span(&text[start..end], start, end));
            }
        }
    }

    /// `Genus epithet` pairs where the genus is known to the lexicon
    fn match_binomials(&self, text: &str, spans: &mut Vec<LabeledSpan>) {
        for caps in self.binomial.captures_iter(text) {
            if !self.genera.contains(&caps[1]) {
                continue;
            }
            let Some(m) = caps.get(0) else { continue };
            spans.push(self.span(m.as_str(), m.start(), m.end()));
        }
    }

    /// `G. epithet` where the initial and the epithet are both known
    fn match_abbreviated(&self, text: &str, spans: &mut Vec<LabeledSpan>) {
        for caps in self.abbreviated.captures_iter(text) {
            let known_initial = caps[1]
                .chars()
                .next()
                .is_some_and(|c| self.genus_initials.contains(&c));
            if !known_initial || !self.epithets.contains(&caps[2]) {
                continue;
            }
            let Some(m) = caps.get(0) else { continue };
            spans.push(self.span(m.as_str(), m.start(), m.end()));
        }
    }

    fn span(&self, text: &str, start: usize, end: usize) -> LabeledSpan {
        LabeledSpan {
            text: text.to_string(),
            label: self.model.label.clone(),
            start,
            end,
        }
    }

    /// Drop overlapping candidates, keeping the longer span
    fn resolve_overlaps(&self, mut spans: Vec<LabeledSpan>) -> Vec<LabeledSpan> {
        spans.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then((b.end - b.start).cmp(&(a.end - a.start)))
        });

        let mut result: Vec<LabeledSpan> = Vec::new();
        let mut covered: HashSet<usize> = HashSet::new();
        for span in spans {
            let overlaps = (span.start..span.end).any(|i| covered.contains(&i));
            if overlaps {
                continue;
            }
            for i in span.start..span.end {
                covered.insert(i);
            }
            result.push(span);
        }

        result.sort_by_key(|s| s.start);
        result
    }
}

impl TaxonRecognizer for LexiconRecognizer {
    fn process(&self, text: &str) -> Result<Vec<LabeledSpan>> {
        // Byte offsets into the lowered copy stay valid for the original:
        // ASCII lowering never changes lengths.
        let lower = text.to_ascii_lowercase();

        let mut spans = Vec::new();
        self.match_dictionary(text, &lower, &mut spans);
        self.match_binomials(text, &mut spans);
        self.match_abbreviated(text, &mut spans);

        Ok(self.resolve_overlaps(spans))
    }

    fn name(&self) -> &str {
        &self.model.name
    }
}

fn is_genus_word(word: &str) -> bool {
    let mut chars = word.chars();
    word.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase())
}

fn is_epithet_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase() || c == '-')
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_recognizer() -> LexiconRecognizer {
        LexiconRecognizer::new(LexiconModel::builtin().unwrap()).unwrap()
    }

    fn span_texts(spans: &[LabeledSpan]) -> Vec<&str> {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_builtin_model_loads() {
        let model = LexiconModel::builtin().unwrap();
        assert_eq!(model.label, "TAXON");
        assert!(!model.scientific.is_empty());
        assert!(!model.vernacular.is_empty());
    }

    #[test]
    fn test_load_missing_model_is_model_load_error() {
        let err = LexiconModel::load("models/does_not_exist.json").unwrap_err();
        assert!(matches!(err, TaxoError::ModelLoad(_)));
    }

    #[test]
    fn test_dictionary_match_is_case_insensitive() {
        let ner = builtin_recognizer();
        let spans = ner
            .process("Colony collapse in HONEY BEE populations")
            .unwrap();
        assert_eq!(span_texts(&spans), vec!["HONEY BEE"]);
        assert_eq!(spans[0].label, "TAXON");
    }

    #[test]
    fn test_binomial_with_known_genus() {
        let ner = builtin_recognizer();
        let spans = ner
            .process("We sampled Apis mellifera workers from ten hives.")
            .unwrap();
        assert_eq!(span_texts(&spans), vec!["Apis mellifera"]);
    }

    #[test]
    fn test_binomial_generalizes_over_epithet() {
        // "Apis cerana" is not a lexicon term, but the genus is known.
        let ner = builtin_recognizer();
        let spans = ner.process("Apis cerana occupies similar niches.").unwrap();
        assert_eq!(span_texts(&spans), vec!["Apis cerana"]);
    }

    #[test]
    fn test_capitalized_prose_is_not_a_binomial() {
        let ner = builtin_recognizer();
        let spans = ner
            .process("This analysis shows strong seasonal effects.")
            .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_vernacular_genus_words_do_not_seed_patterns() {
        // "European otter" is a vernacular term; "European" must not act as
        // a genus for the binomial pattern.
        let ner = builtin_recognizer();
        let spans = ner.process("European waters are warming.").unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_abbreviated_genus() {
        let ner = builtin_recognizer();
        let spans = ner
            .process("Growth curves for E. coli were measured overnight.")
            .unwrap();
        assert_eq!(span_texts(&spans), vec!["E. coli"]);
    }

    #[test]
    fn test_unknown_abbreviation_is_ignored() {
        let ner = builtin_recognizer();
        let spans = ner.process("See Q. xyzzy for details.").unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_overlap_prefers_longer_span() {
        let model = LexiconModel {
            name: "test".to_string(),
            label: "TAXON".to_string(),
            scientific: vec!["Apis".to_string(), "Apis mellifera".to_string()],
            vernacular: vec![],
        };
        let ner = LexiconRecognizer::new(model).unwrap();
        let spans = ner.process("Apis mellifera foragers").unwrap();
        assert_eq!(span_texts(&spans), vec!["Apis mellifera"]);
    }

    #[test]
    fn test_no_match_inside_words() {
        let model = LexiconModel {
            name: "test".to_string(),
            label: "TAXON".to_string(),
            scientific: vec![],
            vernacular: vec!["rat".to_string()],
        };
        let ner = LexiconRecognizer::new(model).unwrap();
        assert!(ner.process("stratified sampling").unwrap().is_empty());
        assert_eq!(
            span_texts(&ner.process("one rat only").unwrap()),
            vec!["rat"]
        );
    }

    #[test]
    fn test_spans_are_ordered_by_position() {
        let ner = builtin_recognizer();
        let spans = ner
            .process("Danio rerio and Mus musculus are standard models.")
            .unwrap();
        assert_eq!(span_texts(&spans), vec!["Danio rerio", "Mus musculus"]);
        assert!(spans[0].start < spans[1].start);
    }
}

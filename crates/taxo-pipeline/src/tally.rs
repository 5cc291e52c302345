//! Corpus-wide mention frequency
//!
//! Counts, for each species name, the number of rows that mention it. Rows
//! contribute at most one increment per distinct name because extraction is
//! already deduplicated per row; the tally therefore answers "how many rows
//! mention species X", not raw repetition frequency.

use std::cmp::Reverse;
use std::collections::HashMap;

use taxo_table::Table;

/// Running tally of species mentions across all rows.
///
/// Ranking is by count descending; ties keep first-encounter order, which
/// is stable for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTally {
    counts: HashMap<String, usize>,
    /// Names in first-encounter order, one entry per distinct name
    order: Vec<String>,
}

impl FrequencyTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one row-level mention of `name`
    pub fn record(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(name.to_string(), 1);
                self.order.push(name.to_string());
            }
        }
    }

    /// Number of distinct species seen
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Mention count for `name`, zero if never seen
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// All species ranked by count descending, ties by first encounter
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .order
            .iter()
            .map(|name| (name.as_str(), self.count(name)))
            .collect();
        // Stable sort keeps encounter order within equal counts
        ranked.sort_by_key(|&(_, count)| Reverse(count));
        ranked
    }

    /// The `n` highest-ranked species
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        self.ranked()
            .into_iter()
            .take(n)
            .map(|(name, count)| (name.to_string(), count))
            .collect()
    }

    /// Two-column summary table: `species`, `mention_count`
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(vec!["species".to_string(), "mention_count".to_string()]);
        for (name, count) in self.ranked() {
            table.rows.push(vec![name.to_string(), count.to_string()]);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rows producing {A,B}, {A}, {}, {B,C}
    fn sample_tally() -> FrequencyTally {
        let mut tally = FrequencyTally::new();
        for row in [vec!["A", "B"], vec!["A"], vec![], vec!["B", "C"]] {
            for name in row {
                tally.record(name);
            }
        }
        tally
    }

    #[test]
    fn test_row_level_counts() {
        let tally = sample_tally();
        assert_eq!(tally.count("A"), 2);
        assert_eq!(tally.count("B"), 2);
        assert_eq!(tally.count("C"), 1);
        assert_eq!(tally.count("D"), 0);
        assert_eq!(tally.len(), 3);
    }

    #[test]
    fn test_top_breaks_ties_by_first_encounter() {
        let tally = sample_tally();
        let top = tally.top(2);
        assert_eq!(
            top,
            vec![("A".to_string(), 2), ("B".to_string(), 2)]
        );
    }

    #[test]
    fn test_ranked_is_count_descending() {
        let tally = sample_tally();
        let ranked = tally.ranked();
        assert_eq!(ranked, vec![("A", 2), ("B", 2), ("C", 1)]);
    }

    #[test]
    fn test_to_table_shape() {
        let tally = sample_tally();
        let table = tally.to_table();
        assert_eq!(table.headers, vec!["species", "mention_count"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["A", "2"]);
        assert_eq!(table.rows[2], vec!["C", "1"]);
    }

    #[test]
    fn test_empty_tally() {
        let tally = FrequencyTally::new();
        assert!(tally.is_empty());
        assert!(tally.top(5).is_empty());
    }
}

//! Word aggregation and ranking.
//!
//! This module turns a token stream into per-word counts and orders
//! them into a deterministic ranking.

use crate::models::WordCount;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Occurrence counts for one text, borrowed from the normalized input.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable<'a> {
    counts: HashMap<&'a str, usize>,
    total: usize,
}

impl<'a> FrequencyTable<'a> {
    /// Count every token, duplicates included.
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::default();

        for token in tokens {
            *table.counts.entry(token).or_default() += 1;
            table.total += 1;
        }

        table
    }

    /// Total number of tokens seen.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The `n` highest ranked words.
    pub fn top(&self, n: usize) -> Vec<WordCount> {
        let mut entries: Vec<(&str, usize)> =
            self.counts.iter().map(|(word, count)| (*word, *count)).collect();

        sort_by_rank(&mut entries);
        entries.truncate(n);

        entries
            .into_iter()
            .map(|(word, count)| WordCount::new(word, count))
            .collect()
    }
}

/// Rank order: count descending, then word ascending by bytes.
pub fn compare_rank(a: (&str, usize), b: (&str, usize)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Sort `(word, count)` pairs into rank order.
pub fn sort_by_rank(entries: &mut [(&str, usize)]) {
    entries.sort_unstable_by(|a, b| compare_rank(*a, *b));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_total() {
        let table = FrequencyTable::from_tokens(["a", "b", "a", "c", "a", "b"]);

        assert_eq!(table.total(), 6);

        let ranked = table.top(usize::MAX);
        assert_eq!(
            ranked,
            vec![
                WordCount::new("a", 3),
                WordCount::new("b", 2),
                WordCount::new("c", 1)
            ]
        );

        let sum: usize = ranked.iter().map(|wc| wc.count).sum();
        assert_eq!(sum, table.total());
    }

    #[test]
    fn test_ranking_breaks_ties_by_word() {
        let table = FrequencyTable::from_tokens(["pear", "apple", "fig", "pear", "fig", "kiwi"]);

        let ranked = table.top(usize::MAX);
        let words: Vec<&str> = ranked.iter().map(|wc| wc.word.as_str()).collect();
        assert_eq!(words, vec!["fig", "pear", "apple", "kiwi"]);
    }

    #[test]
    fn test_digits_sort_before_letters() {
        let table = FrequencyTable::from_tokens(["b", "a", "9", "10"]);

        let words: Vec<String> = table.top(usize::MAX).into_iter().map(|wc| wc.word).collect();
        assert_eq!(words, vec!["10", "9", "a", "b"]);
    }

    #[test]
    fn test_top_truncates() {
        let table = FrequencyTable::from_tokens(["x", "y", "z", "x"]);

        assert_eq!(table.top(1), vec![WordCount::new("x", 2)]);
        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(100).len(), 3);
        assert!(table.top(0).is_empty());
    }

    #[test]
    fn test_empty_table() {
        let table = FrequencyTable::from_tokens(std::iter::empty());
        assert_eq!(table.total(), 0);
        assert!(table.top(10).is_empty());
    }

    #[test]
    fn test_compare_rank() {
        assert_eq!(compare_rank(("a", 2), ("b", 1)), Ordering::Less);
        assert_eq!(compare_rank(("a", 1), ("b", 1)), Ordering::Less);
        assert_eq!(compare_rank(("b", 1), ("a", 1)), Ordering::Greater);
        assert_eq!(compare_rank(("a", 1), ("a", 1)), Ordering::Equal);
    }
}

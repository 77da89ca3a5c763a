//! Phrase frequency aggregation

use std::collections::HashMap;

/// A phrase and how many times it occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseCount {
    pub phrase: String,
    pub count: u64,
}

impl PhraseCount {
    pub fn new(phrase: impl Into<String>, count: u64) -> Self {
        Self {
            phrase: phrase.into(),
            count,
        }
    }
}

/// Count exact-match occurrences and keep the `k` most frequent.
///
/// Matching is case- and whitespace-sensitive. Ties keep first-occurrence
/// order, so identical input always yields identical output.
pub fn aggregate_top(phrases: &[String], k: usize) -> Vec<PhraseCount> {
    let mut counts: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for phrase in phrases {
        match index.get(phrase.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(phrase.as_str(), counts.len());
                counts.push((phrase.as_str(), 1));
            }
        }
    }

    // stable: equal counts stay in first-occurrence order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);

    counts
        .into_iter()
        .map(|(phrase, count)| PhraseCount::new(phrase, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_counts_and_orders_by_frequency() {
        let phrases = strings(&["book", "flight", "book", "hotel", "book", "flight"]);
        let top = aggregate_top(&phrases, 2);
        assert_eq!(
            top,
            vec![PhraseCount::new("book", 3), PhraseCount::new("flight", 2)]
        );
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let phrases = strings(&["wifi", "parking", "checkout", "parking", "wifi", "checkout"]);
        let top = aggregate_top(&phrases, 10);
        let order: Vec<&str> = top.iter().map(|p| p.phrase.as_str()).collect();
        assert_eq!(order, vec!["wifi", "parking", "checkout"]);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let phrases = strings(&["c", "b", "a", "b", "c", "d", "a", "e"]);
        let first = aggregate_top(&phrases, 3);
        for _ in 0..20 {
            assert_eq!(aggregate_top(&phrases, 3), first);
        }
        let order: Vec<&str> = first.iter().map(|p| p.phrase.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_case_and_whitespace_are_distinct() {
        let phrases = strings(&["Book", "book", "book ", "book"]);
        let top = aggregate_top(&phrases, 10);
        assert_eq!(
            top,
            vec![
                PhraseCount::new("book", 2),
                PhraseCount::new("Book", 1),
                PhraseCount::new("book ", 1),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_top(&[], 10).is_empty());
    }

    #[test]
    fn test_never_exceeds_k() {
        let phrases: Vec<String> = (0..50).map(|i| format!("p{}", i % 17)).collect();
        assert_eq!(aggregate_top(&phrases, 10).len(), 10);
        assert_eq!(aggregate_top(&phrases, 100).len(), 17);
        assert!(aggregate_top(&phrases, 0).is_empty());
    }
}

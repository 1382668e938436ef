//! The reference map/reduce job: whitespace word counting. Pure user code
//! with no scheduling logic; it only supplies the mapper and the reducer
//! the engine runs.

use std::collections::HashMap;

pub type WordCounts = HashMap<String, u64>;

/// Splits a text blob into lowercase whitespace-delimited words. The word
/// sequence is what gets partitioned, so chunk boundaries never cut a word
/// in half.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect()
}

/// Mapper: counts the words of one chunk.
pub fn count_words(words: &[String]) -> WordCounts {
    let mut counts = WordCounts::new();
    for word in words {
        *counts.entry(word.clone()).or_insert(0) += 1;
    }
    counts
}

/// Reducer: merges two partial counts. Associative and commutative, as the
/// engine requires.
pub fn merge_counts(mut left: WordCounts, right: WordCounts) -> WordCounts {
    for (word, count) in right {
        *left.entry(word).or_insert(0) += count;
    }
    left
}

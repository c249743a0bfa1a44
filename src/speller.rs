//! Token-level spelling correction against the title word frequencies.

use crate::indexer::FrequencyIndex;

/// Proposes a correction for a single normalized token.
pub trait SpellingOracle {
    /// Best guess for `token` given the known word counts. Returns the token
    /// unchanged when nothing better is known.
    fn suggest(&self, token: &str, words: &FrequencyIndex) -> String;
}

/// Largest edit distance a correction may be from the typed token.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Frequency-weighted edit-distance corrector.
///
/// A known token wins outright. Otherwise the closest known word within
/// [`MAX_EDIT_DISTANCE`] edits (deletion, insertion, substitution, adjacent
/// transposition) is chosen, the more frequent one on equal distance, then
/// the lexicographically smallest.
///
/// Words whose length differs from the token by more than the maximum
/// distance are skipped before any distance is computed, so long tokens
/// only ever meet a handful of comparisons.
#[derive(Debug, Default, Clone, Copy)]
pub struct EditDistanceSpeller;

impl SpellingOracle for EditDistanceSpeller {
    fn suggest(&self, token: &str, words: &FrequencyIndex) -> String {
        if token.is_empty() || words.contains_key(token) {
            return token.to_string();
        }

        let typed: Vec<char> = token.chars().collect();
        let mut best: Option<(&str, usize, u64)> = None; // (word, distance, count)

        for (word, &count) in words {
            if word.len().abs_diff(typed.len()) > MAX_EDIT_DISTANCE {
                continue;
            }
            let Some(dist) = bounded_distance(&typed, word, MAX_EDIT_DISTANCE) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((best_word, best_dist, best_count)) => {
                    dist < best_dist
                        || (dist == best_dist && count > best_count)
                        || (dist == best_dist && count == best_count && word.as_str() < best_word)
                }
            };
            if better {
                best = Some((word.as_str(), dist, count));
            }
        }

        best.map_or_else(|| token.to_string(), |(word, _, _)| word.to_string())
    }
}

/// Optimal-string-alignment distance between `a` and `b`, or `None` once it
/// is certain to exceed `max`.
fn bounded_distance(a: &[char], b: &str, max: usize) -> Option<usize> {
    let b: Vec<char> = b.chars().collect();
    let mut before: Vec<usize> = Vec::new();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        row[0] = i;
        let mut row_min = row[0];
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut d = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d = d.min(before[j - 2] + 1);
            }
            row[j] = d;
            row_min = row_min.min(d);
        }
        if row_min > max {
            return None;
        }
        before = std::mem::replace(&mut prev, row.clone());
    }

    let dist = prev[b.len()];
    (dist <= max).then_some(dist)
}

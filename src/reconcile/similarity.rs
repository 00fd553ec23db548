//! String similarity metrics, all normalized to `[0, 1]`.

use std::collections::HashMap;

use strum::{Display, EnumString, VariantNames};

/// Metric used to score fuzzy candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, VariantNames, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SimilarityMetric {
    /// Ratcliff/Obershelp matching-block ratio.
    #[default]
    RatcliffObershelp,
    JaroWinkler,
    NormalizedLevenshtein,
    SorensenDice,
}

impl SimilarityMetric {
    pub fn names() -> &'static [&'static str] {
        Self::VARIANTS
    }

    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::RatcliffObershelp => ratcliff_obershelp(a, b),
            SimilarityMetric::JaroWinkler => strsim::jaro_winkler(a, b),
            SimilarityMetric::NormalizedLevenshtein => strsim::normalized_levenshtein(a, b),
            SimilarityMetric::SorensenDice => strsim::sorensen_dice(a, b),
        }
    }
}

/// Ratcliff/Obershelp similarity: `2 * M / (|a| + |b|)` where `M` is the
/// number of characters in the matching blocks found by repeatedly taking
/// the longest common substring and recursing on both sides of it.
///
/// Two empty strings are identical (1.0). No junk heuristic is applied.
#[allow(clippy::cast_precision_loss)]
pub fn ratcliff_obershelp(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b_index.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &b_index, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }
    matched
}

/// Longest common block of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Returns `(i, j, size)`; among equally long blocks the one starting
/// earliest in `a` wins, then earliest in `b`.
fn longest_match(
    a: &[char],
    b_index: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);
    // run length of the match ending at b[j], for the previous row of a
    let mut runs: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_runs = HashMap::new();
        if let Some(positions) = b_index.get(c) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let run = j
                    .checked_sub(1)
                    .and_then(|prev| runs.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_runs.insert(j, run);
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }
        runs = next_runs;
    }

    (best_i, best_j, best_size)
}

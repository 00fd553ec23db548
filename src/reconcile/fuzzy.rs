//! Greedy best-candidate fuzzy reconciliation.

use std::collections::BTreeMap;

use log::debug;

use super::{
    canonical::{NamedItem, display_form},
    similarity::SimilarityMetric,
};

/// Minimum score a candidate needs to be proposed.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyOptions {
    pub threshold: f64,
    pub metric: SimilarityMetric,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            metric: SimilarityMetric::default(),
        }
    }
}

/// A suggested relabeling of a right-side item to a left-side name.
#[derive(Debug)]
pub struct RenameProposal<'a, L, R> {
    pub source: &'a NamedItem<R>,
    pub target: &'a NamedItem<L>,
    /// Display form the source is renamed to.
    pub target_display: String,
    pub score: f64,
}

/// Propose a rename for each right item whose best-scoring left item
/// reaches the threshold.
///
/// Every right item is scored against the whole left pool, so two right
/// items may propose the same target (see [`conflicting_targets`]). Ties go
/// to the earliest left item. Proposals that would not change the right
/// item's display form are dropped.
pub fn fuzzy_reconcile<'a, L, R>(
    unmatched_right: &[&'a NamedItem<R>],
    unmatched_left: &[&'a NamedItem<L>],
    options: FuzzyOptions,
) -> Vec<RenameProposal<'a, L, R>> {
    let mut proposals = Vec::new();

    for &source in unmatched_right {
        let mut best: Option<(&NamedItem<L>, f64)> = None;

        for &candidate in unmatched_left {
            let score = options
                .metric
                .score(source.key().as_str(), candidate.key().as_str());
            let is_better = best
                .as_ref()
                .is_none_or(|(_, best_score)| score > *best_score);

            if is_better {
                best = Some((candidate, score));
            }
        }

        let Some((target, score)) = best else {
            continue;
        };

        if score < options.threshold {
            debug!(
                "No fuzzy match for '{}' (best '{}', score {score:.4})",
                source.display(),
                target.display()
            );
            continue;
        }

        let target_display = display_form(target.display());
        if target_display == source.display() {
            debug!("Skipping no-op rename of '{}'", source.display());
            continue;
        }

        debug!(
            "Fuzzy match: '{}' -> '{target_display}' (score {score:.4})",
            source.display()
        );
        proposals.push(RenameProposal {
            source,
            target,
            target_display,
            score,
        });
    }

    proposals
}

/// Target display forms claimed by more than one proposal, with the
/// indices of the proposals claiming them.
pub fn conflicting_targets<L, R>(
    proposals: &[RenameProposal<'_, L, R>],
) -> Vec<(String, Vec<usize>)> {
    let mut claims: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, proposal) in proposals.iter().enumerate() {
        claims
            .entry(proposal.target_display.as_str())
            .or_default()
            .push(idx);
    }

    claims
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(target, indices)| (target.to_string(), indices))
        .collect()
}

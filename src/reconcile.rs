//! Name reconciliation between two named collections.
//!
//! Exact reconciliation partitions both sides by canonical key; fuzzy
//! reconciliation proposes renames for the right-side leftovers.

mod canonical;
mod exact;
mod fuzzy;
mod similarity;

pub use canonical::{CanonicalKey, Name, NamedItem, canonicalize, display_form};
pub use exact::{MatchResult, MatchedGroup, reconcile};
pub use fuzzy::{
    DEFAULT_THRESHOLD, FuzzyOptions, RenameProposal, conflicting_targets, fuzzy_reconcile,
};
pub use similarity::{SimilarityMetric, ratcliff_obershelp};

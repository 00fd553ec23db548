//! Approximate card-name lookup for browsing the catalog.

use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use log::debug;

use crate::catalog::Card;

/// Find an exact (case-insensitive) match by card name.
#[must_use]
pub fn find_exact<'a>(cards: &'a [Card], query: &str) -> Option<&'a Card> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    cards
        .iter()
        .find(|card| card.name.to_lowercase() == query.to_lowercase())
}

/// Find the best matching cards for a query, ordered by score (best first).
///
/// An exact name match, when present, is always ranked first.
#[must_use]
pub fn search<'a>(cards: &'a [Card], query: &str, limit: usize) -> Vec<&'a Card> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(&Card, i64)> = cards
        .iter()
        .filter_map(|card| {
            matcher
                .fuzzy_match(&card.name, query)
                .map(|score| (card, score))
        })
        .collect();

    scored.sort_by(|(left_card, left_score), (right_card, right_score)| {
        right_score
            .cmp(left_score)
            .then_with(|| left_card.name.cmp(&right_card.name))
    });

    let exact = find_exact(cards, query);
    if let Some(exact) = exact {
        debug!("Exact match for '{query}': {}", exact.name);
        scored.retain(|(card, _)| !std::ptr::eq(*card, exact));
    }

    exact
        .into_iter()
        .chain(scored.into_iter().map(|(card, _)| card))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<Card> {
        ["Stonecutter", "Stone House Reconstruction", "Mason", "Freemason"]
            .into_iter()
            .map(Card::new)
            .collect()
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let cards = cards();
        let found = find_exact(&cards, "  MASON ").expect("expected match");
        assert_eq!(found.name, "Mason");
    }

    #[test]
    fn empty_query_returns_nothing() {
        let cards = cards();
        assert!(find_exact(&cards, "  ").is_none());
        assert!(search(&cards, "   ", 10).is_empty());
        assert!(search(&cards, "mason", 0).is_empty());
    }

    #[test]
    fn exact_match_ranks_first() -> Result<(), &'static str> {
        let cards = cards();
        let results = search(&cards, "mason", 10);
        let first = results.first().ok_or("expected results")?;
        assert_eq!(first.name, "Mason");
        assert!(results.iter().any(|card| card.name == "Freemason"));
        assert_eq!(
            results.iter().filter(|card| card.name == "Mason").count(),
            1
        );
        Ok(())
    }

    #[test]
    fn search_is_ranked_and_limited() {
        let cards = cards();
        let results = search(&cards, "stone", 1);
        assert_eq!(results.len(), 1);
        assert!(results[0].name.starts_with("Stone"));
    }
}

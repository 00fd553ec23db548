//! Strategy tags and the tag-map data file.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs,
    path::Path,
};

use log::{debug, info, warn};
use serde::Deserialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{
    catalog::Card,
    error::{CardmatchError, Result},
};

/// The known strategy tags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, EnumIter, Display,
)]
pub enum StrategyTag {
    #[strum(serialize = "Small House")]
    SmallHouse,
    #[strum(serialize = "Big House")]
    BigHouse,
    #[strum(serialize = "Stone House")]
    StoneHouse,
    #[strum(serialize = "Day Laborer")]
    DayLaborer,
    Grain,
    #[strum(serialize = "Major/Minor")]
    MajorMinor,
    Fishing,
    #[strum(serialize = "Traveling Players")]
    TravelingPlayers,
    Sow,
    Animal,
    Lesson,
    Stable,
}

impl StrategyTag {
    pub fn abbrev(self) -> &'static str {
        match self {
            StrategyTag::SmallHouse => "SmH",
            StrategyTag::BigHouse => "BH",
            StrategyTag::StoneHouse => "StH",
            StrategyTag::DayLaborer => "DL",
            StrategyTag::Grain => "G",
            StrategyTag::MajorMinor => "MM",
            StrategyTag::Fishing => "F",
            StrategyTag::TravelingPlayers => "TP",
            StrategyTag::Sow => "Sow",
            StrategyTag::Animal => "Ani",
            StrategyTag::Lesson => "L",
            StrategyTag::Stable => "ST",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            StrategyTag::SmallHouse => "#e67e22",
            StrategyTag::BigHouse => "#8e44ad",
            StrategyTag::StoneHouse => "#607d8b",
            StrategyTag::DayLaborer => "#e74c3c",
            StrategyTag::Grain => "#f1c40f",
            StrategyTag::MajorMinor => "#9b59b6",
            StrategyTag::Fishing => "#3498db",
            StrategyTag::TravelingPlayers => "#e91e9e",
            StrategyTag::Sow => "#2ecc71",
            StrategyTag::Animal => "#6d4c41",
            StrategyTag::Lesson => "#2980b9",
            StrategyTag::Stable => "#7f8c8d",
        }
    }

    /// Whether `raw` is the exact display name of a known tag.
    pub fn is_known(raw: &str) -> bool {
        StrategyTag::iter().any(|tag| tag.to_string() == raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagMapEntry {
    pub card: String,
    pub tags: Vec<String>,
}

/// Card name to tags, with repeated entries for a card merged.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    /// Card names in first-seen order.
    order: Vec<String>,
    tags: HashMap<String, Vec<String>>,
}

impl TagMap {
    /// Load a tag map file: a JSON array of `{"card": ..., "tags": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading tag map from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| CardmatchError::malformed(path, e))?;
        let entries: Vec<TagMapEntry> =
            serde_json::from_str(&raw).map_err(|e| CardmatchError::malformed(path, e))?;
        let map = Self::from_entries(entries);
        info!("Loaded tags for {} cards from {}", map.len(), path.display());
        Ok(map)
    }

    /// Merge entries: tags of a repeated card are unioned in first-seen order.
    pub fn from_entries(entries: impl IntoIterator<Item = TagMapEntry>) -> Self {
        let mut map = Self::default();
        for entry in entries {
            let merged = map.tags.entry(entry.card.clone()).or_insert_with(|| {
                map.order.push(entry.card.clone());
                Vec::new()
            });
            for tag in entry.tags {
                if !merged.contains(&tag) {
                    merged.push(tag);
                }
            }
        }
        map
    }

    pub fn get(&self, card: &str) -> Option<&[String]> {
        self.tags.get(card).map(Vec::as_slice)
    }

    pub fn cards(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Outcome of applying a tag map to a catalog.
#[derive(Debug, Default)]
pub struct TagReport {
    pub total: usize,
    pub tagged: usize,
    /// Tag-map names with no card in the catalog, sorted.
    pub not_found: Vec<String>,
    /// Tag counts, most used first, ties by name.
    pub distribution: Vec<(String, usize)>,
    /// One validation error per unknown tag.
    pub warnings: Vec<CardmatchError>,
}

impl TagReport {
    pub fn untagged(&self) -> usize {
        self.total - self.tagged
    }
}

/// Set every card's tags from the map: sorted merged tags for mapped cards,
/// an empty list for the rest.
pub fn apply_tags(cards: &mut [Card], map: &TagMap) -> TagReport {
    let mut report = TagReport {
        total: cards.len(),
        ..TagReport::default()
    };

    for card in cards.iter_mut() {
        if let Some(tags) = map.get(&card.name) {
            let mut tags = tags.to_vec();
            tags.sort();
            card.set_tags(tags);
            report.tagged += 1;
        } else {
            card.set_tags(Vec::new());
        }
    }

    let names: BTreeSet<&str> = cards.iter().map(|card| card.name.as_str()).collect();
    report.not_found = map
        .cards()
        .filter(|name| !names.contains(name))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    for name in &report.not_found {
        warn!("Tag map names '{name}' but no such card is in the catalog");
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for card in cards.iter() {
        for tag in card.tags() {
            *counts.entry(tag).or_default() += 1;
        }
    }

    report.warnings = counts
        .keys()
        .filter(|tag| !StrategyTag::is_known(tag))
        .map(|tag| CardmatchError::Validation(format!("Unknown tag '{tag}'")))
        .collect();
    for warning in &report.warnings {
        warn!("{warning}");
    }

    let mut distribution: Vec<(String, usize)> = counts.into_iter().collect();
    distribution.sort_by(|(a_tag, a_count), (b_tag, b_count)| {
        b_count.cmp(a_count).then_with(|| a_tag.cmp(b_tag))
    });
    report.distribution = distribution;

    info!(
        "Tagged {} of {} cards ({} map entries not found)",
        report.tagged,
        report.total,
        report.not_found.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(card: &str, tags: &[&str]) -> TagMapEntry {
        TagMapEntry {
            card: card.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn known_tags_round_trip() {
        assert_eq!(StrategyTag::iter().count(), 12);
        let tag: StrategyTag = "Major/Minor".parse().expect("known tag");
        assert_eq!(tag, StrategyTag::MajorMinor);
        assert_eq!(tag.abbrev(), "MM");
        assert_eq!(StrategyTag::Animal.color(), "#6d4c41");
        assert!(StrategyTag::is_known("Traveling Players"));
        assert!(!StrategyTag::is_known("Vegetable"));
        assert!(!StrategyTag::is_known("big house"));
    }

    #[test]
    fn repeated_entries_merge_without_duplicates() {
        let map = TagMap::from_entries([
            entry("Mason", &["Big House", "Stone House"]),
            entry("Scholar", &["Stone House"]),
            entry("Mason", &["Stone House", "Lesson"]),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.cards().collect::<Vec<_>>(), vec!["Mason", "Scholar"]);
        assert_eq!(
            map.get("Mason").expect("mapped"),
            ["Big House", "Stone House", "Lesson"]
        );
    }

    #[test]
    fn apply_sets_sorted_tags_and_reports() {
        let mut cards = vec![Card::new("Mason"), Card::new("Scholar"), Card::new("Lazybones")];
        let map = TagMap::from_entries([
            entry("Mason", &["Stone House", "Big House"]),
            entry("Scholar", &["Stone House", "Lesson"]),
            entry("Clay Room Builder", &["Big House"]),
        ]);

        let report = apply_tags(&mut cards, &map);

        assert_eq!(cards[0].tags(), vec!["Big House", "Stone House"]);
        assert_eq!(cards[1].tags(), vec!["Lesson", "Stone House"]);
        assert!(cards[2].tags().is_empty());
        assert!(cards[2].fields.contains_key("tags"));

        assert_eq!(report.total, 3);
        assert_eq!(report.tagged, 2);
        assert_eq!(report.untagged(), 1);
        assert_eq!(report.not_found, vec!["Clay Room Builder"]);
        assert_eq!(
            report.distribution,
            vec![
                ("Stone House".to_string(), 2),
                ("Big House".to_string(), 1),
                ("Lesson".to_string(), 1),
            ]
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn unknown_tags_are_warnings() {
        let mut cards = vec![Card::new("Turnip Farmer")];
        let map = TagMap::from_entries([entry("Turnip Farmer", &["Grain", "Vegetable"])]);

        let report = apply_tags(&mut cards, &map);

        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            &report.warnings[0],
            CardmatchError::Validation(msg) if msg.contains("Vegetable")
        ));
        assert!(!report.warnings[0].is_fatal());
        assert_eq!(cards[0].tags(), vec!["Grain", "Vegetable"]);
    }

    #[test]
    fn bundled_tag_map_only_uses_known_tags() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/tag-map.json");
        let map = TagMap::load(&path).expect("bundled tag map parses");
        assert!(!map.is_empty());
        for card in map.cards() {
            for tag in map.get(card).expect("listed card") {
                assert!(StrategyTag::is_known(tag), "{card}: {tag}");
            }
        }
    }
}

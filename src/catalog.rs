//! JSON card catalog.

use std::{fs, path::Path};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{CardmatchError, Result},
    reconcile::NamedItem,
};

/// A catalog record. Only `name` is interpreted; every other field is
/// carried through untouched and in its original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Card {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
        }
    }

    /// Current tags; absent or non-string entries are ignored.
    pub fn tags(&self) -> Vec<String> {
        self.fields
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        let tags = tags.into_iter().map(Value::String).collect();
        self.fields.insert("tags".to_string(), Value::Array(tags));
    }
}

/// Load the catalog. Any read or parse failure is a malformed-input error.
pub fn load(path: &Path) -> Result<Vec<Card>> {
    debug!("Loading catalog from {}", path.display());
    let raw = fs::read_to_string(path).map_err(|e| CardmatchError::malformed(path, e))?;
    let cards: Vec<Card> =
        serde_json::from_str(&raw).map_err(|e| CardmatchError::malformed(path, e))?;
    info!("Loaded {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

/// Write the catalog back with two-space indentation.
pub fn save(path: &Path, cards: &[Card]) -> Result<()> {
    let json = serde_json::to_string_pretty(cards)?;
    fs::write(path, json)?;
    info!("Wrote {} cards to {}", cards.len(), path.display());
    Ok(())
}

/// Catalog cards as named items for reconciliation.
pub fn named(cards: &[Card]) -> Vec<NamedItem<&Card>> {
    cards
        .iter()
        .map(|card| NamedItem::new(card.name.clone(), card))
        .collect()
}

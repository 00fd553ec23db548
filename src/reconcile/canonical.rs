//! Canonical keys for accent, case and punctuation insensitive matching.

use std::fmt;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Characters dropped from canonical keys.
const NOISE_CHARS: [char; 5] = [' ', '-', '\'', '\u{2019}', '.'];

/// Normalized form of a name, used only for equality and scoring.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a raw name.
///
/// Applies compatibility decomposition, drops combining marks, lowercases,
/// then removes spaces, hyphens, apostrophes (straight and typographic) and
/// periods.
pub fn canonicalize(raw: &str) -> CanonicalKey {
    let key = raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !NOISE_CHARS.contains(c))
        .collect();
    CanonicalKey(key)
}

/// Display form a right-side item is renamed to when it adopts this name.
pub fn display_form(raw: &str) -> String {
    raw.to_lowercase()
}

/// A human-facing name together with its canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    display: String,
    key: CanonicalKey,
}

impl Name {
    pub fn new(display: impl Into<String>) -> Self {
        let display = display.into();
        let key = canonicalize(&display);
        Self { display, key }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn key(&self) -> &CanonicalKey {
        &self.key
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// A name paired with whatever record it was derived from.
#[derive(Debug, Clone)]
pub struct NamedItem<P> {
    pub name: Name,
    pub payload: P,
}

impl<P> NamedItem<P> {
    pub fn new(display: impl Into<String>, payload: P) -> Self {
        Self {
            name: Name::new(display),
            payload,
        }
    }

    pub fn display(&self) -> &str {
        self.name.display()
    }

    pub fn key(&self) -> &CanonicalKey {
        self.name.key()
    }
}

//! Placeholder identifiers
//!
//! Provides [`Placeholder`] for command-local references to things that
//! do not exist yet, and [`PlaceholderSet`] for the declared universe of
//! placeholders of one command.
//!
//! # Grammar
//! - `#name`: freely named temporary thing declared by a definition
//! - `^N`: positional reference to an entity created earlier in the same
//!   command, e.g. the contribution at index `N`

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Sentinel of temporary placeholders
pub const TEMP_SENTINEL: char = '#';

/// Sentinel of positional placeholders
pub const POSITIONAL_SENTINEL: char = '^';

/// Kind of placeholder, determined by its sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlaceholderKind {
    /// `#name`
    Temp,
    /// `^N`
    Positional,
}

impl PlaceholderKind {
    /// Sentinel character of this kind
    #[inline]
    #[must_use]
    pub const fn sentinel(self) -> char {
        match self {
            Self::Temp => TEMP_SENTINEL,
            Self::Positional => POSITIONAL_SENTINEL,
        }
    }

    fn of(c: char) -> Option<Self> {
        match c {
            TEMP_SENTINEL => Some(Self::Temp),
            POSITIONAL_SENTINEL => Some(Self::Positional),
            _ => None,
        }
    }
}

/// Command-local identifier of a not-yet-persisted thing
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Placeholder {
    kind: PlaceholderKind,
    name: String,
}

impl Placeholder {
    /// Temporary placeholder `#name`
    #[inline]
    #[must_use]
    pub fn temp(name: impl Into<String>) -> Self {
        Self {
            kind: PlaceholderKind::Temp,
            name: name.into(),
        }
    }

    /// Positional placeholder `^index`
    #[inline]
    #[must_use]
    pub fn positional(index: usize) -> Self {
        Self {
            kind: PlaceholderKind::Positional,
            name: index.to_string(),
        }
    }

    /// Whether `raw` uses placeholder syntax (starts with a sentinel)
    #[inline]
    #[must_use]
    pub fn is_placeholder_syntax(raw: &str) -> bool {
        raw.chars().next().and_then(PlaceholderKind::of).is_some()
    }

    /// Parse a raw id
    ///
    /// Returns `None` when `raw` lacks a sentinel or has an empty name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        let kind = chars.next().and_then(PlaceholderKind::of)?;
        let name = chars.as_str();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            name: name.to_string(),
        })
    }

    /// Name without sentinel
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> PlaceholderKind {
        self.kind
    }
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.sentinel(), self.name)
    }
}

impl TryFrom<String> for Placeholder {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(value)
    }
}

impl From<Placeholder> for String {
    fn from(value: Placeholder) -> Self {
        value.to_string()
    }
}

/// Declared placeholders of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderSet(BTreeSet<String>);

impl PlaceholderSet {
    /// Empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a placeholder; returns `false` if it was already declared
    pub fn declare(&mut self, placeholder: &Placeholder) -> bool {
        self.0.insert(placeholder.to_string())
    }

    /// Whether the raw id is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.0.contains(raw)
    }

    /// Number of declared placeholders
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate raw ids in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<Placeholder> for PlaceholderSet {
    fn from_iter<I: IntoIterator<Item = Placeholder>>(iter: I) -> Self {
        Self(iter.into_iter().map(|p| p.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_temp_placeholder() {
        let placeholder = Placeholder::parse("#ghost").unwrap();
        assert_eq!(placeholder.kind(), PlaceholderKind::Temp);
        assert_eq!(placeholder.name(), "ghost");
        assert_eq!(placeholder.to_string(), "#ghost");
    }

    #[test]
    fn parse_positional_placeholder() {
        let placeholder = Placeholder::parse("^2").unwrap();
        assert_eq!(placeholder, Placeholder::positional(2));
    }

    #[test]
    fn parse_rejects_bare_sentinel_and_plain_ids() {
        assert_eq!(Placeholder::parse("#"), None);
        assert_eq!(Placeholder::parse("R123"), None);
        assert!(Placeholder::is_placeholder_syntax("#"));
        assert!(!Placeholder::is_placeholder_syntax("R123"));
    }

    #[test]
    fn set_tracks_declarations() {
        let mut set = PlaceholderSet::new();
        assert!(set.declare(&Placeholder::temp("a")));
        assert!(!set.declare(&Placeholder::temp("a")));
        assert!(set.contains("#a"));
        assert!(!set.contains("^a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn placeholder_serializes_as_string() {
        let json = serde_json::to_string(&Placeholder::temp("p1")).unwrap();
        assert_eq!(json, "\"#p1\"");
        assert!(serde_json::from_str::<Placeholder>("\"x\"").is_err());
    }
}

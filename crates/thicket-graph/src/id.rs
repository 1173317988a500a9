//! Identifiers for graph entities and contributors
//!
//! Provides [`ThingId`] for addressing things in the graph store,
//! [`StatementId`] for relationships and [`ContributorId`] for the
//! identity on whose behalf mutations are performed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

static THING_ID_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9:_\-]+$").ok());

/// Identifier of a thing (class, resource, predicate or literal)
///
/// Vocabulary ids are available as constants through
/// [`ThingId::from_static`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(Cow<'static, str>);

impl ThingId {
    /// Create id without validation
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    /// Create id from a static string, usable in `const` context
    #[inline]
    #[must_use]
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Parse and validate id
    ///
    /// # Errors
    /// Returns [`ThingIdError`] when the value is empty or contains
    /// characters outside `[A-Za-z0-9:_-]`.
    pub fn parse(value: &str) -> Result<Self, ThingIdError> {
        if Self::is_valid(value) {
            Ok(Self::new(value))
        } else {
            Err(ThingIdError(value.to_string()))
        }
    }

    /// Check the id grammar
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        THING_ID_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(value))
    }

    /// Get id as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ThingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ThingId {
    type Err = ThingIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ThingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ThingId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ThingId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Invalid thing id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid thing id \"{0}\"")]
pub struct ThingIdError(pub String);

/// Identifier of a persisted statement
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementId(String);

impl StatementId {
    /// Create statement id
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get id as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StatementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity on whose behalf graph mutations are performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributorId(Uuid);

impl ContributorId {
    /// Anonymous contributor (nil UUID)
    pub const UNKNOWN: Self = Self(Uuid::nil());

    /// Wrap an existing UUID
    #[inline]
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random contributor id
    #[inline]
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ContributorId {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl Display for ContributorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// How a piece of content was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionMethod {
    /// Curated by hand
    Manual,
    /// Produced by an automated extractor
    Automatic,
    /// Not recorded
    #[default]
    Unknown,
}

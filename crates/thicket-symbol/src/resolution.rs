//! Identifier resolution
//!
//! Every textual reference in a command is classified once as either a
//! declared placeholder or an existing thing. The result is memoized in a
//! [`ResolutionCache`] owned by the command execution, so the store is
//! consulted at most once per distinct id.

use crate::error::SymbolError;
use crate::placeholder::{Placeholder, PlaceholderSet};
use indexmap::IndexMap;
use thicket_graph::{Thing, ThingId, ThingRepository};

/// Outcome of resolving one id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Declared placeholder, by raw id (e.g. `#p1`)
    Placeholder(String),
    /// Thing already in the store
    Existing(Thing),
}

impl Resolution {
    /// Whether the id is a placeholder
    #[inline]
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// Existing thing, if resolved to one
    #[inline]
    #[must_use]
    pub fn as_existing(&self) -> Option<&Thing> {
        match self {
            Self::Existing(thing) => Some(thing),
            Self::Placeholder(_) => None,
        }
    }
}

/// Per-command map from id to resolution
///
/// Entries are never replaced: the first resolution of an id is final
/// for the rest of the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionCache(IndexMap<String, Resolution>);

impl ResolutionCache {
    /// Empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached resolution of `id`
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Resolution> {
        self.0.get(id)
    }

    /// Whether `id` was resolved
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Record a resolution unless `id` is already present
    ///
    /// Returns the resolution that is in effect afterwards.
    pub fn record(&mut self, id: impl Into<String>, resolution: Resolution) -> &Resolution {
        self.0.entry(id.into()).or_insert(resolution)
    }

    /// Number of resolved ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was resolved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in resolution order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.0.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// Ids that resolved to placeholders
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, r)| r.is_placeholder())
            .map(|(id, _)| id)
    }
}

/// Classifies references as placeholders or existing things
#[derive(Clone, Copy)]
pub struct IdentifierResolver<'a> {
    things: &'a dyn ThingRepository,
}

impl<'a> IdentifierResolver<'a> {
    /// Create resolver over a thing lookup
    #[inline]
    #[must_use]
    pub fn new(things: &'a dyn ThingRepository) -> Self {
        Self { things }
    }

    /// Resolve `id`
    ///
    /// # Errors
    /// - [`SymbolError::InvalidPlaceholder`] for a bare sentinel
    /// - [`SymbolError::UndeclaredPlaceholder`] for placeholders not in `declared`
    /// - [`SymbolError::InvalidThingId`] for malformed store ids
    /// - [`SymbolError::ThingNotFound`] for ids absent from the store
    pub fn resolve(
        &self,
        id: &str,
        declared: &PlaceholderSet,
        cache: &mut ResolutionCache,
    ) -> Result<Resolution, SymbolError> {
        if let Some(cached) = cache.get(id) {
            return Ok(cached.clone());
        }

        let resolution = if Placeholder::is_placeholder_syntax(id) {
            let placeholder = Placeholder::parse(id)
                .ok_or_else(|| SymbolError::InvalidPlaceholder(id.to_string()))?;
            if !declared.contains(id) {
                return Err(SymbolError::UndeclaredPlaceholder(placeholder));
            }
            Resolution::Placeholder(id.to_string())
        } else {
            let thing_id = ThingId::parse(id)?;
            tracing::trace!(id = %thing_id, "looking up thing");
            let thing = self
                .things
                .find_by_thing_id(&thing_id)?
                .ok_or(SymbolError::ThingNotFound(thing_id))?;
            Resolution::Existing(thing)
        };

        Ok(cache.record(id, resolution).clone())
    }
}

impl std::fmt::Debug for IdentifierResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierResolver").finish_non_exhaustive()
    }
}

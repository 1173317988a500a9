//! Symbol resolution errors

use crate::placeholder::Placeholder;
use std::collections::BTreeMap;
use thicket_graph::{StoreError, ThingId, ThingIdError};

/// Errors raised while declaring, resolving or validating identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// Declared id does not follow the `#name` grammar
    #[error("invalid placeholder \"{0}\"; requires \"#\" as prefix and a non-empty name")]
    InvalidPlaceholder(String),

    /// Same placeholder declared more than once
    #[error("duplicate placeholders: {}", format_counts(.0))]
    DuplicatePlaceholders(BTreeMap<String, usize>),

    /// Placeholder referenced without being declared
    #[error("undeclared placeholder \"{}\"", .0.name())]
    UndeclaredPlaceholder(Placeholder),

    /// Reference is neither a placeholder nor a valid thing id
    #[error(transparent)]
    InvalidThingId(#[from] ThingIdError),

    /// Referenced thing does not exist
    #[error("thing \"{0}\" not found")]
    ThingNotFound(ThingId),

    /// Reference used as a class is something else
    #[error("thing \"{0}\" is not a class")]
    ThingIsNotAClass(String),

    /// Reserved class assigned to a user-defined resource
    #[error("class \"{0}\" is reserved")]
    ReservedClass(ThingId),

    /// Label is multi-line or too long
    #[error("invalid label for \"{id}\"")]
    InvalidLabel {
        /// Placeholder of the offending definition
        id: String,
    },

    /// Literal value is outside its datatype's value space
    #[error("literal \"{id}\" with value \"{label}\" is not a valid {datatype}")]
    InvalidLiteralLabel {
        /// Placeholder of the literal
        id: String,
        /// Supplied value
        label: String,
        /// Declared datatype
        datatype: String,
    },

    /// Literal datatype is not a known datatype or absolute IRI
    #[error("invalid datatype \"{datatype}\" for literal \"{id}\"")]
    InvalidLiteralDatatype {
        /// Placeholder of the literal
        id: String,
        /// Declared datatype
        datatype: String,
    },

    /// Class IRI is relative
    #[error("uri \"{0}\" is not absolute")]
    UriNotAbsolute(String),

    /// Class IRI already belongs to another class
    #[error("uri \"{uri}\" is already assigned to class \"{class}\"")]
    UriAlreadyInUse {
        /// Requested IRI
        uri: String,
        /// Existing owner
        class: ThingId,
    },

    /// Store lookup failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

fn format_counts(counts: &BTreeMap<String, usize>) -> String {
    counts
        .iter()
        .map(|(id, count)| format!("{id}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SymbolError {
    /// Check if error is caused by the command rather than the store
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

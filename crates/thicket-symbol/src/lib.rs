//! Thicket Symbol System
//!
//! Command-local symbol table for graph content commands.
//!
//! # Core Concepts
//!
//! - [`Placeholder`]: `#name` or `^N` reference to a thing that does not exist yet
//! - [`ThingDefinitions`]: Declarative descriptions of the things a command creates
//! - [`ResolutionCache`]: Per-command memo of id → placeholder / existing thing
//! - [`IdentifierResolver`]: Classifies references, one store lookup per id
//! - [`PlaceholderValidator`]: Grammar and uniqueness of declared placeholders
//! - [`DefinitionValidator`]: Labels, datatypes, class references and list elements
//!
//! # Example
//!
//! ```rust,ignore
//! use thicket_symbol::{IdentifierResolver, PlaceholderValidator, ResolutionCache};
//!
//! let declared = PlaceholderValidator::new().validate(definitions.declared_ids())?;
//! let mut cache = ResolutionCache::new();
//! let resolution = IdentifierResolver::new(&things).resolve("#p1", &declared, &mut cache)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod definition;
mod error;
mod placeholder;
mod resolution;
mod validation;

// Re-exports
pub use definition::{
    ClassDefinition, DefinitionKind, ListDefinition, LiteralDefinition, PredicateDefinition,
    ResourceDefinition, ThingDefinition, ThingDefinitions,
};
pub use error::SymbolError;
pub use placeholder::{
    Placeholder, PlaceholderKind, PlaceholderSet, POSITIONAL_SENTINEL, TEMP_SENTINEL,
};
pub use resolution::{IdentifierResolver, Resolution, ResolutionCache};
pub use validation::{DefinitionRules, DefinitionValidator, PlaceholderValidator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

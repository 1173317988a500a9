//! Thicket Graph
//!
//! Vocabulary, value types and store ports of the shared graph.
//!
//! # Core Concepts
//!
//! - [`ThingId`]: Identifier of a class, resource, predicate or literal
//! - [`Thing`]: Closed union over persisted entity kinds
//! - [`Statement`]: Persisted `(subject, predicate, object)` relationship
//! - [`Xsd`]: Built-in literal datatypes with value-space checks
//! - [`ThingRepository`], [`ClassRepository`], [`StatementRepository`],
//!   [`GraphWriter`]: Capabilities the pipeline needs from the store
//!
//! # Example
//!
//! ```rust,ignore
//! use thicket_graph::{ThingId, ThingRepository};
//!
//! let thing = repository.find_by_thing_id(&ThingId::parse("R123")?)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod id;
mod label;
mod ports;
mod thing;
mod xsd;

/// Well-known ids
pub mod vocab;

// Re-exports
pub use error::StoreError;
pub use id::{ContributorId, ExtractionMethod, StatementId, ThingId, ThingIdError};
pub use label::{is_valid_label, is_valid_literal_label, MAX_LABEL_LENGTH};
pub use ports::{
    ClassRepository, GraphWriter, NewClass, NewList, NewLiteral, NewPredicate, NewResource,
    StatementRepository, ThingRepository,
};
pub use thing::{Class, Literal, Predicate, Resource, Statement, Thing, ThingKind};
pub use vocab::{classes, is_reserved_class, predicates};
pub use xsd::{
    is_absolute_iri, is_valid_datatype, label_matches_datatype, Xsd, DEFAULT_DATATYPE,
};

/// Generated mocks of the store ports
#[cfg(any(test, feature = "mocks"))]
pub mod mocks {
    pub use crate::ports::{
        MockClassRepository, MockGraphWriter, MockStatementRepository, MockThingRepository,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

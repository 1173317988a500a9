//! Store capabilities consumed by the pipeline
//!
//! The graph store is a black box. These traits are the only way the
//! pipeline reads from or writes to it. Implementations decide on
//! transactions, caching and concurrency control.

use crate::error::StoreError;
use crate::id::{ContributorId, ExtractionMethod, StatementId, ThingId};
use crate::thing::{Class, Statement, Thing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Thing lookup
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait ThingRepository: Send + Sync {
    /// Find a thing of any kind
    fn find_by_thing_id(&self, id: &ThingId) -> Result<Option<Thing>, StoreError>;

    /// Check that every id names an existing thing
    fn exists_all(&self, ids: &[ThingId]) -> Result<bool, StoreError>;
}

/// Class lookup
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait ClassRepository: Send + Sync {
    /// Find the class registered under an IRI
    fn find_by_uri(&self, uri: &str) -> Result<Option<Class>, StoreError>;

    /// Check whether `class` is a (transitive) subclass of `parent`
    fn is_subclass_of(&self, class: &ThingId, parent: &ThingId) -> Result<bool, StoreError>;
}

/// Statement lookup
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait StatementRepository: Send + Sync {
    /// Find the statement with exactly this subject, predicate and object
    fn find_by_subject_predicate_object(
        &self,
        subject: &ThingId,
        predicate: &ThingId,
        object: &ThingId,
    ) -> Result<Option<Statement>, StoreError>;

    /// All outgoing statements of a subject
    fn find_all_by_subject(&self, subject: &ThingId) -> Result<Vec<Statement>, StoreError>;

    /// All statements with the given predicate pointing at `object`
    fn find_all_by_predicate_and_object(
        &self,
        predicate: &ThingId,
        object: &ThingId,
    ) -> Result<Vec<Statement>, StoreError>;
}

/// Class to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub label: String,
    pub uri: Option<String>,
}

/// Resource to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    pub label: String,
    pub classes: BTreeSet<ThingId>,
    #[serde(default)]
    pub extraction_method: ExtractionMethod,
}

/// Literal to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLiteral {
    pub label: String,
    pub datatype: String,
}

/// Predicate to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPredicate {
    pub label: String,
}

/// List to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewList {
    pub label: String,
    pub elements: Vec<ThingId>,
}

/// Entity and relationship creation
///
/// Every `create_*` call mints a new entity. Deduplication is the
/// caller's responsibility.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait GraphWriter: Send + Sync {
    /// Create a class
    fn create_class(&self, contributor: ContributorId, class: &NewClass) -> Result<ThingId, StoreError>;

    /// Create a resource
    fn create_resource(
        &self,
        contributor: ContributorId,
        resource: &NewResource,
    ) -> Result<ThingId, StoreError>;

    /// Create a literal
    fn create_literal(
        &self,
        contributor: ContributorId,
        literal: &NewLiteral,
    ) -> Result<ThingId, StoreError>;

    /// Create a predicate
    fn create_predicate(
        &self,
        contributor: ContributorId,
        predicate: &NewPredicate,
    ) -> Result<ThingId, StoreError>;

    /// Create a list with initial elements
    fn create_list(&self, contributor: ContributorId, list: &NewList) -> Result<ThingId, StoreError>;

    /// Replace the elements of a list
    fn update_list(
        &self,
        contributor: ContributorId,
        list: &ThingId,
        elements: &[ThingId],
    ) -> Result<(), StoreError>;

    /// Create a statement
    fn add_statement(
        &self,
        contributor: ContributorId,
        subject: &ThingId,
        predicate: &ThingId,
        object: &ThingId,
    ) -> Result<StatementId, StoreError>;

    /// Delete statements by id
    fn delete_statements(&self, ids: &[StatementId]) -> Result<(), StoreError>;
}

//! Thing definitions supplied by a command
//!
//! A definition describes a thing that does not exist yet. Definitions
//! are keyed by their `#` placeholder and live for one command only.

#![allow(missing_docs)]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thicket_graph::{Thing, ThingId, DEFAULT_DATATYPE};

/// Class to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub label: String,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Resource to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub label: String,
    /// Class ids or class placeholders
    #[serde(default)]
    pub classes: BTreeSet<String>,
}

/// Literal to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralDefinition {
    pub label: String,
    #[serde(default = "default_datatype")]
    pub datatype: String,
}

fn default_datatype() -> String {
    DEFAULT_DATATYPE.to_string()
}

/// Predicate to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateDefinition {
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// List to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDefinition {
    pub label: String,
    /// Element ids or placeholders, in order
    #[serde(default)]
    pub elements: Vec<String>,
}

/// Kind of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Class,
    Resource,
    Literal,
    Predicate,
    List,
}

/// Any definition
///
/// Also used as the derived type description of an existing thing, so
/// that constraint checks treat placeholders and persisted things alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThingDefinition {
    Class(ClassDefinition),
    Resource(ResourceDefinition),
    Literal(LiteralDefinition),
    Predicate(PredicateDefinition),
    List(ListDefinition),
}

impl ThingDefinition {
    /// Describe an existing thing as a definition
    #[must_use]
    pub fn from_thing(thing: &Thing) -> Self {
        match thing {
            Thing::Class(class) => Self::Class(ClassDefinition {
                label: class.label.clone(),
                uri: class.uri.clone(),
            }),
            Thing::Resource(resource) if resource.is_list() => Self::List(ListDefinition {
                label: resource.label.clone(),
                elements: Vec::new(),
            }),
            Thing::Resource(resource) => Self::Resource(ResourceDefinition {
                label: resource.label.clone(),
                classes: resource.classes.iter().map(|c| c.to_string()).collect(),
            }),
            Thing::Predicate(predicate) => Self::Predicate(PredicateDefinition {
                label: predicate.label.clone(),
                description: None,
            }),
            Thing::Literal(literal) => Self::Literal(LiteralDefinition {
                label: literal.label.clone(),
                datatype: literal.datatype.clone(),
            }),
        }
    }

    /// Label of the defined thing
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Class(d) => &d.label,
            Self::Resource(d) => &d.label,
            Self::Literal(d) => &d.label,
            Self::Predicate(d) => &d.label,
            Self::List(d) => &d.label,
        }
    }

    /// Kind of the defined thing
    #[must_use]
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Class(_) => DefinitionKind::Class,
            Self::Resource(_) => DefinitionKind::Resource,
            Self::Literal(_) => DefinitionKind::Literal,
            Self::Predicate(_) => DefinitionKind::Predicate,
            Self::List(_) => DefinitionKind::List,
        }
    }

    /// Class memberships as ids; class placeholders are skipped
    #[must_use]
    pub fn class_ids(&self) -> BTreeSet<ThingId> {
        match self {
            Self::Resource(d) => d
                .classes
                .iter()
                .filter_map(|c| ThingId::parse(c).ok())
                .collect(),
            _ => BTreeSet::new(),
        }
    }
}

/// All definitions of a command, keyed by placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThingDefinitions {
    pub classes: IndexMap<String, ClassDefinition>,
    pub resources: IndexMap<String, ResourceDefinition>,
    pub literals: IndexMap<String, LiteralDefinition>,
    pub predicates: IndexMap<String, PredicateDefinition>,
    pub lists: IndexMap<String, ListDefinition>,
}

impl ThingDefinitions {
    /// No definitions
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a class definition
    #[must_use]
    pub fn with_class(mut self, id: impl Into<String>, definition: ClassDefinition) -> Self {
        self.classes.insert(id.into(), definition);
        self
    }

    /// With a resource definition
    #[must_use]
    pub fn with_resource(mut self, id: impl Into<String>, definition: ResourceDefinition) -> Self {
        self.resources.insert(id.into(), definition);
        self
    }

    /// With a literal definition
    #[must_use]
    pub fn with_literal(mut self, id: impl Into<String>, definition: LiteralDefinition) -> Self {
        self.literals.insert(id.into(), definition);
        self
    }

    /// With a predicate definition
    #[must_use]
    pub fn with_predicate(mut self, id: impl Into<String>, definition: PredicateDefinition) -> Self {
        self.predicates.insert(id.into(), definition);
        self
    }

    /// With a list definition
    #[must_use]
    pub fn with_list(mut self, id: impl Into<String>, definition: ListDefinition) -> Self {
        self.lists.insert(id.into(), definition);
        self
    }

    /// Every declared id, including repeats across kinds
    pub fn declared_ids(&self) -> impl Iterator<Item = &str> {
        self.classes
            .keys()
            .chain(self.resources.keys())
            .chain(self.literals.keys())
            .chain(self.predicates.keys())
            .chain(self.lists.keys())
            .map(String::as_str)
    }

    /// Find the definition declared under `id`
    #[must_use]
    pub fn find(&self, id: &str) -> Option<ThingDefinition> {
        if let Some(d) = self.classes.get(id) {
            return Some(ThingDefinition::Class(d.clone()));
        }
        if let Some(d) = self.resources.get(id) {
            return Some(ThingDefinition::Resource(d.clone()));
        }
        if let Some(d) = self.literals.get(id) {
            return Some(ThingDefinition::Literal(d.clone()));
        }
        if let Some(d) = self.predicates.get(id) {
            return Some(ThingDefinition::Predicate(d.clone()));
        }
        self.lists.get(id).map(|d| ThingDefinition::List(d.clone()))
    }

    /// Total number of definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
            + self.resources.len()
            + self.literals.len()
            + self.predicates.len()
            + self.lists.len()
    }

    /// Whether there are no definitions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

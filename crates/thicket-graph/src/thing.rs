//! Persisted graph entities
//!
//! A [`Thing`] is a closed union over the entity kinds of the graph.
//! Lists are resources carrying the `List` class.

use crate::id::{StatementId, ThingId};
use crate::vocab::classes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Class node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: ThingId,
    pub label: String,
    pub uri: Option<String>,
}

/// Resource node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ThingId,
    pub label: String,
    pub classes: BTreeSet<ThingId>,
}

impl Resource {
    /// Whether this resource is a list
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.classes.contains(&classes::LIST)
    }
}

/// Predicate node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub id: ThingId,
    pub label: String,
}

/// Literal node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub id: ThingId,
    pub label: String,
    pub datatype: String,
}

/// Kind of a thing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThingKind {
    Class,
    Resource,
    Predicate,
    Literal,
}

impl Display for ThingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Resource => "resource",
            Self::Predicate => "predicate",
            Self::Literal => "literal",
        };
        f.write_str(name)
    }
}

/// Any persisted entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_class", rename_all = "snake_case")]
pub enum Thing {
    Class(Class),
    Resource(Resource),
    Predicate(Predicate),
    Literal(Literal),
}

impl Thing {
    /// Id of the thing
    #[must_use]
    pub fn id(&self) -> &ThingId {
        match self {
            Self::Class(class) => &class.id,
            Self::Resource(resource) => &resource.id,
            Self::Predicate(predicate) => &predicate.id,
            Self::Literal(literal) => &literal.id,
        }
    }

    /// Label of the thing
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Class(class) => &class.label,
            Self::Resource(resource) => &resource.label,
            Self::Predicate(predicate) => &predicate.label,
            Self::Literal(literal) => &literal.label,
        }
    }

    /// Kind of the thing
    #[must_use]
    pub fn kind(&self) -> ThingKind {
        match self {
            Self::Class(_) => ThingKind::Class,
            Self::Resource(_) => ThingKind::Resource,
            Self::Predicate(_) => ThingKind::Predicate,
            Self::Literal(_) => ThingKind::Literal,
        }
    }

    /// Borrow as resource, if it is one
    #[inline]
    #[must_use]
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Borrow as literal, if it is one
    #[inline]
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl From<Class> for Thing {
    fn from(value: Class) -> Self {
        Self::Class(value)
    }
}

impl From<Resource> for Thing {
    fn from(value: Resource) -> Self {
        Self::Resource(value)
    }
}

impl From<Predicate> for Thing {
    fn from(value: Predicate) -> Self {
        Self::Predicate(value)
    }
}

impl From<Literal> for Thing {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

/// Persisted relationship between two things
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: StatementId,
    pub subject: ThingId,
    pub predicate: ThingId,
    pub object: Thing,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_resource() -> Resource {
        Resource {
            id: ThingId::new("R1"),
            label: "list".into(),
            classes: BTreeSet::from([classes::LIST]),
        }
    }

    #[test]
    fn resources_with_list_class_are_lists() {
        assert!(list_resource().is_list());
    }

    #[test]
    fn thing_accessors_dispatch_on_kind() {
        let thing = Thing::from(Literal {
            id: ThingId::new("L1"),
            label: "100".into(),
            datatype: "xsd:integer".into(),
        });
        assert_eq!(thing.id(), &ThingId::new("L1"));
        assert_eq!(thing.label(), "100");
        assert_eq!(thing.kind(), ThingKind::Literal);
        assert!(thing.as_literal().is_some());
        assert!(thing.as_resource().is_none());
    }
}

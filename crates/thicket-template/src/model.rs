//! Template model
//!
//! A [`Template`] is a persisted schema: an ordered list of typed
//! property slots, each bound to a path predicate and a cardinality.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use thicket_graph::{ThingId, Xsd};

/// Value constraint of a property slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyConstraint {
    /// Any value
    Untyped,
    /// Resource of a target class
    Resource {
        /// Target class
        class: ThingId,
    },
    /// `xsd:string` literal, optionally matching a pattern
    StringLiteral {
        /// Regular expression the whole label must match
        #[serde(default)]
        pattern: Option<String>,
    },
    /// Numeric literal with optional inclusive bounds
    NumberLiteral {
        /// Numeric datatype
        datatype: Xsd,
        /// Lower bound
        #[serde(default)]
        min_inclusive: Option<f64>,
        /// Upper bound
        #[serde(default)]
        max_inclusive: Option<f64>,
    },
    /// Literal of any other datatype
    OtherLiteral {
        /// Datatype as prefixed name or IRI
        datatype: String,
    },
}

impl PropertyConstraint {
    /// Datatype required by literal slots
    #[must_use]
    pub fn literal_datatype(&self) -> Option<&str> {
        match self {
            Self::StringLiteral { .. } => Some(Xsd::String.prefixed_uri()),
            Self::NumberLiteral { datatype, .. } => Some(datatype.prefixed_uri()),
            Self::OtherLiteral { datatype } => Some(datatype),
            Self::Untyped | Self::Resource { .. } => None,
        }
    }

    /// Whether the slot expects literals
    #[inline]
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.literal_datatype().is_some()
    }
}

/// Typed property slot of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateProperty {
    /// Id of the property shape
    pub id: ThingId,
    /// Human readable label
    pub label: String,
    /// Placeholder shown in formatted labels
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Free text description
    #[serde(default)]
    pub description: Option<String>,
    /// Position within the template
    pub order: u32,
    /// Predicate linking subject and value
    pub path: ThingId,
    /// Lower cardinality bound; absent or zero means unconstrained
    #[serde(default)]
    pub min_count: Option<u32>,
    /// Upper cardinality bound; absent or zero means unconstrained
    #[serde(default)]
    pub max_count: Option<u32>,
    /// Value constraint
    pub constraint: PropertyConstraint,
}

/// Kind of template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Describes instances of a class
    #[default]
    Standard,
    /// Describes multi-argument statements; property 0 is the subject position
    RosettaStone,
}

/// Persisted schema of a content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Id of the node shape
    pub id: ThingId,
    /// Human readable label
    pub label: String,
    /// Free text description
    #[serde(default)]
    pub description: Option<String>,
    /// Label format with `{placeholder}` slots
    #[serde(default)]
    pub formatted_label: Option<String>,
    /// Class the template describes
    pub target_class: ThingId,
    /// Property slots sorted by order
    pub properties: Vec<TemplateProperty>,
    /// Whether properties outside the template are forbidden
    #[serde(default)]
    pub is_closed: bool,
    /// Template kind
    #[serde(default)]
    pub kind: TemplateKind,
}

impl Template {
    /// Property slot bound to `path`
    #[must_use]
    pub fn property_by_path(&self, path: &ThingId) -> Option<&TemplateProperty> {
        self.properties.iter().find(|p| &p.path == path)
    }

    /// Subject position of a rosetta-stone template
    #[must_use]
    pub fn subject_position(&self) -> Option<&TemplateProperty> {
        match self.kind {
            TemplateKind::RosettaStone => self.properties.first(),
            TemplateKind::Standard => None,
        }
    }

    /// Object positions of a rosetta-stone template
    #[must_use]
    pub fn object_positions(&self) -> &[TemplateProperty] {
        match self.kind {
            TemplateKind::RosettaStone if !self.properties.is_empty() => &self.properties[1..],
            _ => &[],
        }
    }

    /// Sort properties by order
    pub fn sort_properties(&mut self) {
        self.properties.sort_by_key(|p| p.order);
    }
}

/// Location of a slot within a command, used in diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Template property bound to a path
    Property(ThingId),
    /// Subject position of a rosetta-stone statement
    Subject,
    /// Object position with its index among object positions
    Object(usize),
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(path) => write!(f, "property \"{path}\""),
            Self::Subject => f.write_str("subject position"),
            Self::Object(index) => write!(f, "object position {index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(order: u32, path: &str) -> TemplateProperty {
        TemplateProperty {
            id: ThingId::new(format!("PS{order}")),
            label: path.to_string(),
            placeholder: None,
            description: None,
            order,
            path: ThingId::new(path),
            min_count: None,
            max_count: None,
            constraint: PropertyConstraint::Untyped,
        }
    }

    fn template(kind: TemplateKind, properties: Vec<TemplateProperty>) -> Template {
        Template {
            id: ThingId::new("T1"),
            label: "template".into(),
            description: None,
            formatted_label: None,
            target_class: ThingId::new("C1"),
            properties,
            is_closed: false,
            kind,
        }
    }

    #[test]
    fn rosetta_template_splits_positions() {
        let t = template(
            TemplateKind::RosettaStone,
            vec![property(0, "P0"), property(1, "P1"), property(2, "P2")],
        );
        assert_eq!(t.subject_position().map(|p| p.order), Some(0));
        assert_eq!(t.object_positions().len(), 2);
    }

    #[test]
    fn standard_template_has_no_positions() {
        let t = template(TemplateKind::Standard, vec![property(0, "P0")]);
        assert!(t.subject_position().is_none());
        assert!(t.object_positions().is_empty());
    }

    #[test]
    fn properties_sort_by_order() {
        let mut t = template(
            TemplateKind::Standard,
            vec![property(2, "P2"), property(0, "P0"), property(1, "P1")],
        );
        t.sort_properties();
        let orders: Vec<u32> = t.properties.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!(t.property_by_path(&ThingId::new("P1")).is_some());
    }

    #[test]
    fn constraint_deserializes_from_tagged_json() {
        let constraint: PropertyConstraint = serde_json::from_str(
            r#"{ "type": "number_literal", "datatype": "xsd:integer", "min_inclusive": 1 }"#,
        )
        .unwrap();
        assert_eq!(constraint.literal_datatype(), Some("xsd:integer"));
        assert!(constraint.is_literal());
    }
}

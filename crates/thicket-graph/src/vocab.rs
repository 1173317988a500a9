//! Well-known class and predicate ids

use crate::id::ThingId;

/// Class ids
#[allow(missing_docs)]
pub mod classes {
    use super::ThingId;

    pub const THING: ThingId = ThingId::from_static("Thing");
    pub const RESOURCES: ThingId = ThingId::from_static("Resources");
    pub const CLASSES: ThingId = ThingId::from_static("Classes");
    pub const PREDICATES: ThingId = ThingId::from_static("Predicates");
    pub const LITERALS: ThingId = ThingId::from_static("Literals");
    pub const LIST: ThingId = ThingId::from_static("List");
    pub const PAPER: ThingId = ThingId::from_static("Paper");
    pub const CONTRIBUTION: ThingId = ThingId::from_static("Contribution");
    pub const RESEARCH_FIELD: ThingId = ThingId::from_static("ResearchField");
    pub const AUTHOR: ThingId = ThingId::from_static("Author");
    pub const NODE_SHAPE: ThingId = ThingId::from_static("NodeShape");
    pub const PROPERTY_SHAPE: ThingId = ThingId::from_static("PropertyShape");
    pub const ROSETTA_NODE_SHAPE: ThingId = ThingId::from_static("RosettaNodeShape");
    pub const ROSETTA_STONE_STATEMENT: ThingId = ThingId::from_static("RosettaStoneStatement");
}

/// Predicate ids
#[allow(missing_docs)]
pub mod predicates {
    use super::ThingId;

    pub const DESCRIPTION: ThingId = ThingId::from_static("description");
    pub const HAS_LIST_ELEMENT: ThingId = ThingId::from_static("hasListElement");
    pub const HAS_CONTRIBUTION: ThingId = ThingId::from_static("hasContribution");
    pub const HAS_RESEARCH_FIELD: ThingId = ThingId::from_static("hasResearchField");
    pub const HAS_AUTHORS: ThingId = ThingId::from_static("hasAuthors");
    pub const HAS_DOI: ThingId = ThingId::from_static("hasDOI");
    pub const HAS_ISBN: ThingId = ThingId::from_static("hasISBN");
    pub const HAS_ISSN: ThingId = ThingId::from_static("hasISSN");
    pub const HAS_URL: ThingId = ThingId::from_static("hasURL");
    pub const SH_TARGET_CLASS: ThingId = ThingId::from_static("sh:targetClass");
    pub const SH_PROPERTY: ThingId = ThingId::from_static("sh:property");
    pub const SH_PATH: ThingId = ThingId::from_static("sh:path");
    pub const SH_MIN_COUNT: ThingId = ThingId::from_static("sh:minCount");
    pub const SH_MAX_COUNT: ThingId = ThingId::from_static("sh:maxCount");
    pub const SH_CLASS: ThingId = ThingId::from_static("sh:class");
    pub const SH_DATATYPE: ThingId = ThingId::from_static("sh:datatype");
    pub const SH_PATTERN: ThingId = ThingId::from_static("sh:pattern");
    pub const SH_MIN_INCLUSIVE: ThingId = ThingId::from_static("sh:minInclusive");
    pub const SH_MAX_INCLUSIVE: ThingId = ThingId::from_static("sh:maxInclusive");
    pub const SH_ORDER: ThingId = ThingId::from_static("sh:order");
    pub const SH_CLOSED: ThingId = ThingId::from_static("sh:closed");
    pub const TEMPLATE_LABEL_FORMAT: ThingId = ThingId::from_static("templateLabelFormat");
    pub const PLACEHOLDER: ThingId = ThingId::from_static("placeholder");
    pub const HAS_CONTEXT: ThingId = ThingId::from_static("hasContext");

    /// Predicate used to link a paper identifier of the given kind
    ///
    /// Unknown identifier kinds yield `None`.
    #[must_use]
    pub fn for_identifier(kind: &str) -> Option<ThingId> {
        match kind {
            "doi" => Some(HAS_DOI),
            "isbn" => Some(HAS_ISBN),
            "issn" => Some(HAS_ISSN),
            "url" => Some(HAS_URL),
            _ => None,
        }
    }
}

/// Classes that may not be assigned to user-defined resources
pub const RESERVED_CLASSES: [ThingId; 9] = [
    ThingId::from_static("Literal"),
    ThingId::from_static("Class"),
    ThingId::from_static("Predicate"),
    ThingId::from_static("Resource"),
    classes::LIST,
    classes::LITERALS,
    classes::CLASSES,
    classes::PREDICATES,
    classes::RESOURCES,
];

/// Check whether a class id is reserved
#[inline]
#[must_use]
pub fn is_reserved_class(id: &ThingId) -> bool {
    RESERVED_CLASSES.contains(id)
}

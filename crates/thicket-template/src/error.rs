//! Template errors

use crate::model::Slot;
use thicket_graph::{StoreError, ThingId, ThingIdError};

/// Violations of template constraints
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstraintError {
    /// Fewer input positions than template properties
    #[error("missing input for statement of template \"{template}\"; expected exactly {expected} input positions ({diff})")]
    MissingInputPositions {
        /// Template id
        template: ThingId,
        /// Expected number of positions, subject included
        expected: usize,
        /// Supplied minus expected
        diff: isize,
    },

    /// More input positions than template properties
    #[error("too many inputs for statement of template \"{template}\"; expected exactly {expected} input positions (+{diff})")]
    TooManyInputPositions {
        /// Template id
        template: ThingId,
        /// Expected number of positions, subject included
        expected: usize,
        /// Supplied minus expected
        diff: isize,
    },

    /// Fewer values than `min_count`
    #[error("missing values for {slot}; at least {min} required, {actual} given")]
    MissingPropertyValues {
        /// Offending slot
        slot: Slot,
        /// Lower bound
        min: u32,
        /// Supplied count
        actual: usize,
    },

    /// More values than `max_count`
    #[error("too many values for {slot}; at most {max} allowed, {actual} given")]
    TooManyPropertyValues {
        /// Offending slot
        slot: Slot,
        /// Upper bound
        max: u32,
        /// Supplied count
        actual: usize,
    },

    /// Class slot received something else
    #[error("object \"{object}\" for property \"{property}\" is not a class")]
    ObjectIsNotAClass {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
    },

    /// Predicate slot received something else
    #[error("object \"{object}\" for property \"{property}\" is not a predicate")]
    ObjectIsNotAPredicate {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
    },

    /// List slot received something else
    #[error("object \"{object}\" for property \"{property}\" is not a list")]
    ObjectIsNotAList {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
    },

    /// Resource slot received a literal
    #[error("object \"{object}\" for property \"{property}\" must not be a literal")]
    ObjectMustNotBeALiteral {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
    },

    /// Resource lacks the target class
    #[error("object \"{object}\" for property \"{property}\" is not an instance of class \"{target_class}\"")]
    ResourceIsNotAnInstanceOfTargetClass {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
        /// Required class
        target_class: ThingId,
    },

    /// Literal slot received a non-literal
    #[error("object \"{object}\" for property \"{property}\" is not a literal")]
    ObjectIsNotALiteral {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
    },

    /// Literal value outside the slot datatype's value space
    #[error("object \"{object}\" with value \"{label}\" for property \"{property}\" is not a valid {datatype}")]
    InvalidLiteral {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
        /// Slot datatype
        datatype: String,
        /// Literal value
        label: String,
    },

    /// Literal datatype differs from a custom slot datatype
    #[error("object \"{object}\" for property \"{property}\" has datatype \"{found}\", expected \"{expected}\"")]
    MismatchedDataType {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
        /// Slot datatype
        expected: String,
        /// Literal datatype
        found: String,
    },

    /// Literal value does not match the slot pattern
    #[error("value \"{label}\" of object \"{object}\" for property \"{property}\" does not match pattern \"{pattern}\"")]
    LabelDoesNotMatchPattern {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
        /// Literal value
        label: String,
        /// Slot pattern
        pattern: String,
    },

    /// Slot pattern is not a valid regular expression
    #[error("invalid pattern \"{pattern}\" on property \"{property}\"")]
    InvalidPattern {
        /// Property shape id
        property: ThingId,
        /// Slot pattern
        pattern: String,
    },

    /// Number below the lower bound
    #[error("number \"{label}\" of object \"{object}\" for property \"{property}\" is lower than {min}")]
    NumberTooLow {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
        /// Literal value
        label: String,
        /// Lower bound
        min: f64,
    },

    /// Number above the upper bound
    #[error("number \"{label}\" of object \"{object}\" for property \"{property}\" is higher than {max}")]
    NumberTooHigh {
        /// Property shape id
        property: ThingId,
        /// Offending value
        object: String,
        /// Literal value
        label: String,
        /// Upper bound
        max: f64,
    },

    /// Placeholder used as a value has no definition
    #[error("placeholder \"{0}\" has no definition")]
    MissingDefinition(String),

    /// Paths outside the template
    #[error("unknown properties for template \"{template}\": {}", format_ids(.unknown))]
    UnknownTemplateProperties {
        /// Template id
        template: ThingId,
        /// Paths not declared by the template
        unknown: Vec<ThingId>,
    },

    /// Subclass lookup failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

fn format_ids(ids: &[ThingId]) -> String {
    ids.iter()
        .map(ThingId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors reading templates from the graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Template statements are incomplete or inconsistent
    #[error("malformed template \"{template}\": {reason}")]
    Malformed {
        /// Node shape id
        template: ThingId,
        /// What is wrong
        reason: String,
    },

    /// Template id is malformed
    #[error(transparent)]
    InvalidId(#[from] ThingIdError),

    /// Store lookup failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl TemplateError {
    pub(crate) fn malformed(template: &ThingId, reason: impl Into<String>) -> Self {
        Self::Malformed {
            template: template.clone(),
            reason: reason.into(),
        }
    }
}

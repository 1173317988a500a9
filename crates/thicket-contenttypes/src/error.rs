//! Error types for content type commands
//!
//! Every step of a pipeline fails with [`ContentTypeError`]. Errors of the
//! lower layers are wrapped unchanged so callers can match on the exact
//! cause.

use std::fmt::{self, Display, Formatter};
use thicket_graph::{StoreError, ThingId};
use thicket_symbol::SymbolError;
use thicket_template::{ConstraintError, TemplateError};

/// Main content type error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentTypeError {
    /// Placeholder or definition error
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// Template constraint violation
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// Template could not be read
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Store collaborator failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Statement predicate is not a predicate
    #[error("thing \"{0}\" is not a predicate")]
    ThingIsNotAPredicate(String),

    /// Literal used as the subject of nested statements
    #[error("invalid statement subject \"{0}\"")]
    InvalidStatementSubject(String),

    /// Contribution without statements
    #[error("{}", empty_contribution_message(*.index))]
    EmptyContribution {
        /// Index of the contribution when the command has several
        index: Option<usize>,
    },

    /// Nested statement definitions exceed the configured depth
    #[error("statement definitions are nested deeper than {max} levels")]
    StatementNestingTooDeep {
        /// Configured maximum
        max: usize,
    },

    /// Label of a command field is invalid
    #[error("invalid label for {0}")]
    InvalidLabel(String),

    /// Paper with the same title or identifier exists
    #[error("{0}")]
    PaperAlreadyExists(PaperConflict),

    /// Identifier kind without a known predicate
    #[error("unknown identifier kind \"{0}\"")]
    UnknownIdentifierKind(String),

    /// Paper commands take exactly one research field
    #[error("exactly one research field is allowed, {0} given")]
    OnlyOneResearchFieldAllowed(usize),

    /// Research field does not exist
    #[error("research field \"{0}\" not found")]
    ResearchFieldNotFound(ThingId),

    /// Referenced author does not exist
    #[error("author \"{0}\" not found")]
    AuthorNotFound(ThingId),

    /// Template does not exist
    #[error("template \"{0}\" not found")]
    TemplateNotFound(ThingId),

    /// Rosetta-stone template does not exist
    #[error("rosetta stone template \"{0}\" not found")]
    RosettaStoneTemplateNotFound(ThingId),

    /// Template exists but is not a rosetta-stone template
    #[error("template \"{0}\" is not a rosetta stone template")]
    NotARosettaStoneTemplate(ThingId),

    /// Resource does not exist
    #[error("resource \"{0}\" not found")]
    ResourceNotFound(ThingId),

    /// Resource is not an instance of the template's target class
    #[error("template \"{template}\" cannot be applied to resource \"{resource}\"")]
    TemplateNotApplicable {
        /// Template id
        template: ThingId,
        /// Resource id
        resource: ThingId,
    },

    /// Target class already has a template
    #[error("class \"{class}\" already has template \"{template}\"")]
    TemplateAlreadyExistsForClass {
        /// Target class
        class: ThingId,
        /// Existing template
        template: ThingId,
    },

    /// Negative minimum cardinality
    #[error("invalid min count {0}")]
    InvalidMinCount(i64),

    /// Negative maximum cardinality
    #[error("invalid max count {0}")]
    InvalidMaxCount(i64),

    /// Minimum exceeds maximum
    #[error("invalid cardinality; min count {min} is greater than max count {max}")]
    InvalidCardinality {
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },

    /// Lower number bound exceeds upper bound
    #[error("invalid bounds; min {min} is greater than max {max}")]
    InvalidBounds {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Property pattern is not a valid regular expression
    #[error("invalid regex pattern \"{0}\"")]
    InvalidRegexPattern(String),

    /// Property datatype is unusable
    #[error("invalid datatype \"{0}\"")]
    InvalidDatatype(String),

    /// Rosetta-stone template without properties
    #[error("rosetta stone template requires a subject position")]
    MissingSubjectPosition,

    /// Placeholder referenced by a statement was never created
    #[error("placeholder \"{0}\" was not created")]
    PlaceholderNotCreated(String),

    /// A step ran before the step that provides its input
    #[error("step \"{step}\" requires {field}, which no earlier step provided")]
    MissingState {
        /// Step name
        step: &'static str,
        /// Missing state field
        field: &'static str,
    },
}

fn empty_contribution_message(index: Option<usize>) -> String {
    match index {
        Some(index) => format!("contribution at index {index} does not contain any statements"),
        None => "contribution does not contain any statements".to_string(),
    }
}

/// Conflicting existing paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperConflict {
    /// Same title
    Title(String),
    /// Same identifier value
    Identifier(String),
}

impl Display for PaperConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title(title) => write!(f, "paper with title \"{title}\" already exists"),
            Self::Identifier(id) => write!(f, "paper with identifier \"{id}\" already exists"),
        }
    }
}

/// Coarse classification of failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or duplicate placeholder ids
    Grammar,
    /// Undeclared placeholder or missing thing
    Resolution,
    /// Thing of the wrong kind
    Kind,
    /// Too few or too many values or positions
    Cardinality,
    /// Empty contribution, literal subject, nesting
    Structural,
    /// Conflicting existing content
    PreExistence,
    /// Labels, datatypes and other value checks
    Value,
    /// Store failure
    Store,
    /// Pipeline misconfiguration
    Internal,
}

impl ContentTypeError {
    /// Paper title conflict
    #[inline]
    #[must_use]
    pub fn paper_with_title(title: impl Into<String>) -> Self {
        Self::PaperAlreadyExists(PaperConflict::Title(title.into()))
    }

    /// Paper identifier conflict
    #[inline]
    #[must_use]
    pub fn paper_with_identifier(identifier: impl Into<String>) -> Self {
        Self::PaperAlreadyExists(PaperConflict::Identifier(identifier.into()))
    }

    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Symbol(err) => match err {
                SymbolError::InvalidPlaceholder(_) | SymbolError::DuplicatePlaceholders(_) => {
                    ErrorKind::Grammar
                }
                SymbolError::UndeclaredPlaceholder(_)
                | SymbolError::InvalidThingId(_)
                | SymbolError::ThingNotFound(_) => ErrorKind::Resolution,
                SymbolError::ThingIsNotAClass(_) | SymbolError::ReservedClass(_) => ErrorKind::Kind,
                SymbolError::UriAlreadyInUse { .. } => ErrorKind::PreExistence,
                SymbolError::Store(_) => ErrorKind::Store,
                _ => ErrorKind::Value,
            },
            Self::Constraint(err) => match err {
                ConstraintError::MissingInputPositions { .. }
                | ConstraintError::TooManyInputPositions { .. }
                | ConstraintError::MissingPropertyValues { .. }
                | ConstraintError::TooManyPropertyValues { .. } => ErrorKind::Cardinality,
                ConstraintError::ObjectIsNotAClass { .. }
                | ConstraintError::ObjectIsNotAPredicate { .. }
                | ConstraintError::ObjectIsNotAList { .. }
                | ConstraintError::ObjectMustNotBeALiteral { .. }
                | ConstraintError::ObjectIsNotALiteral { .. }
                | ConstraintError::ResourceIsNotAnInstanceOfTargetClass { .. } => ErrorKind::Kind,
                ConstraintError::MissingDefinition(_) => ErrorKind::Resolution,
                ConstraintError::Store(_) => ErrorKind::Store,
                _ => ErrorKind::Value,
            },
            Self::Template(TemplateError::Store(_)) | Self::Store(_) => ErrorKind::Store,
            Self::Template(_) | Self::MissingState { .. } | Self::PlaceholderNotCreated(_) => {
                ErrorKind::Internal
            }
            Self::ThingIsNotAPredicate(_)
            | Self::NotARosettaStoneTemplate(_)
            | Self::TemplateNotApplicable { .. } => ErrorKind::Kind,
            Self::InvalidStatementSubject(_)
            | Self::EmptyContribution { .. }
            | Self::StatementNestingTooDeep { .. }
            | Self::MissingSubjectPosition => ErrorKind::Structural,
            Self::PaperAlreadyExists(_) | Self::TemplateAlreadyExistsForClass { .. } => {
                ErrorKind::PreExistence
            }
            Self::OnlyOneResearchFieldAllowed(_) => ErrorKind::Cardinality,
            Self::ResearchFieldNotFound(_)
            | Self::AuthorNotFound(_)
            | Self::TemplateNotFound(_)
            | Self::RosettaStoneTemplateNotFound(_)
            | Self::ResourceNotFound(_) => ErrorKind::Resolution,
            Self::InvalidLabel(_)
            | Self::UnknownIdentifierKind(_)
            | Self::InvalidMinCount(_)
            | Self::InvalidMaxCount(_)
            | Self::InvalidCardinality { .. }
            | Self::InvalidBounds { .. }
            | Self::InvalidRegexPattern(_)
            | Self::InvalidDatatype(_) => ErrorKind::Value,
        }
    }

    /// Check if the command caused the error
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Store | ErrorKind::Internal)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed value is out of range
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// What is wrong
        reason: String,
    },
}

//! Content type commands
//!
//! Commands are plain values decoded by the caller. They reference things
//! either by store id or by a `#` placeholder declared in their
//! definitions.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thicket_graph::{ContributorId, ExtractionMethod, ThingId};
use thicket_symbol::ThingDefinitions;
use thicket_template::{PropertyConstraint, TemplateKind};

static NO_DEFINITIONS: Lazy<ThingDefinitions> = Lazy::new(ThingDefinitions::new);

/// Predicate id to object definitions
pub type StatementDefinitions = IndexMap<String, Vec<StatementObject>>;

/// Object of a statement definition
///
/// An object carrying `statements` becomes the subject of those nested
/// statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementObject {
    /// Store id or placeholder
    pub id: String,
    /// Nested statements with this object as subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statements: Option<StatementDefinitions>,
}

impl StatementObject {
    /// Plain object without nested statements
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            statements: None,
        }
    }

    /// Builder: attach nested statements
    #[inline]
    #[must_use]
    pub fn with_statements(mut self, statements: StatementDefinitions) -> Self {
        self.statements = Some(statements);
        self
    }
}

/// Commands that carry thing definitions
pub trait ThingsCommand {
    /// Contributor performing the command
    fn contributor_id(&self) -> ContributorId;

    /// Definitions declared by the command
    fn definitions(&self) -> &ThingDefinitions;
}

/// Paper author, either existing or by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Existing author resource
    #[serde(default)]
    pub id: Option<ThingId>,
    /// Display name, used when a new author resource is created
    pub name: String,
}

/// Contribution of a paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDefinition {
    pub label: String,
    /// Classes in addition to `Contribution`
    #[serde(default)]
    pub classes: BTreeSet<ThingId>,
    #[serde(default)]
    pub statements: StatementDefinitions,
}

/// Definitions and contributions of a paper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperContents {
    #[serde(flatten)]
    pub definitions: ThingDefinitions,
    #[serde(default)]
    pub contributions: Vec<ContributionDefinition>,
}

/// Create a paper with its contributions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaperCommand {
    #[serde(default)]
    pub contributor_id: ContributorId,
    pub title: String,
    pub research_fields: Vec<ThingId>,
    /// Identifier kind (`doi`, `isbn`, `issn`, `url`) to values
    #[serde(default)]
    pub identifiers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub contents: Option<PaperContents>,
    #[serde(default)]
    pub extraction_method: ExtractionMethod,
}

impl ThingsCommand for CreatePaperCommand {
    fn contributor_id(&self) -> ContributorId {
        self.contributor_id
    }

    fn definitions(&self) -> &ThingDefinitions {
        self.contents
            .as_ref()
            .map_or(&*NO_DEFINITIONS, |contents| &contents.definitions)
    }
}

/// Create a multi-argument statement from a rosetta-stone template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRosettaStoneStatementCommand {
    #[serde(default)]
    pub contributor_id: ContributorId,
    pub template_id: ThingId,
    /// Thing the statement is made about
    #[serde(default)]
    pub context: Option<ThingId>,
    /// Values of the subject position
    pub subjects: Vec<String>,
    /// Values per object position
    pub objects: Vec<Vec<String>>,
    #[serde(default)]
    pub definitions: ThingDefinitions,
    #[serde(default)]
    pub extraction_method: ExtractionMethod,
}

impl ThingsCommand for CreateRosettaStoneStatementCommand {
    fn contributor_id(&self) -> ContributorId {
        self.contributor_id
    }

    fn definitions(&self) -> &ThingDefinitions {
        &self.definitions
    }
}

/// Replace the template-governed statements of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTemplateInstanceCommand {
    #[serde(default)]
    pub contributor_id: ContributorId,
    /// Resource the template is applied to
    pub subject: ThingId,
    pub template_id: ThingId,
    /// Property path to values
    #[serde(default)]
    pub statements: IndexMap<ThingId, Vec<String>>,
    #[serde(default)]
    pub definitions: ThingDefinitions,
    #[serde(default)]
    pub extraction_method: ExtractionMethod,
}

impl ThingsCommand for UpdateTemplateInstanceCommand {
    fn contributor_id(&self) -> ContributorId {
        self.contributor_id
    }

    fn definitions(&self) -> &ThingDefinitions {
        &self.definitions
    }
}

/// Property slot of a new template
///
/// Counts are signed so negative input can be reported instead of
/// rejected by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePropertyDefinition {
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min_count: Option<i64>,
    #[serde(default)]
    pub max_count: Option<i64>,
    pub path: ThingId,
    #[serde(default = "untyped")]
    pub constraint: PropertyConstraint,
}

fn untyped() -> PropertyConstraint {
    PropertyConstraint::Untyped
}

/// Create a template for a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTemplateCommand {
    #[serde(default)]
    pub contributor_id: ContributorId,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub formatted_label: Option<String>,
    pub target_class: ThingId,
    /// Slots in order; for rosetta-stone templates the first is the subject
    #[serde(default)]
    pub properties: Vec<TemplatePropertyDefinition>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub kind: TemplateKind,
    #[serde(default)]
    pub extraction_method: ExtractionMethod,
}

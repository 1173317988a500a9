//! Pipeline state
//!
//! Every pipeline threads one owned state value through its steps.
//! Validators add to it; creators add the ids they mint.

use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use thicket_graph::{Resource, StatementId, ThingId};
use thicket_symbol::{PlaceholderSet, ResolutionCache, ThingDefinitions};
use thicket_template::Template;

/// Triple whose components are store ids or placeholders
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BakedStatement {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl BakedStatement {
    /// Create baked statement
    #[inline]
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl Display for BakedStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

/// Resource created for a `^N` position of the command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalResource {
    /// `^N` placeholder
    pub placeholder: String,
    pub label: String,
    pub classes: BTreeSet<ThingId>,
}

/// State shared by every pipeline that materializes a subgraph
#[derive(Debug, Clone, Default)]
pub struct SubgraphState {
    /// Working copy of the command's definitions
    pub definitions: ThingDefinitions,
    /// Declared `#` and `^` placeholders
    pub placeholders: PlaceholderSet,
    /// Resolution cache
    pub validated_ids: ResolutionCache,
    /// Statements to create, in discovery order without repeats
    pub baked_statements: IndexSet<BakedStatement>,
    /// Positional resources to create
    pub positional: Vec<PositionalResource>,
    /// Placeholder to created id
    pub lookup: IndexMap<String, ThingId>,
    /// Literal placeholder to the datatype of the slot it fills
    pub slot_datatypes: IndexMap<String, String>,
}

/// Access to the subgraph part of a pipeline state
pub trait HasSubgraph {
    /// Shared subgraph state
    fn subgraph(&self) -> &SubgraphState;

    /// Mutable shared subgraph state
    fn subgraph_mut(&mut self) -> &mut SubgraphState;
}

impl HasSubgraph for SubgraphState {
    fn subgraph(&self) -> &SubgraphState {
        self
    }

    fn subgraph_mut(&mut self) -> &mut SubgraphState {
        self
    }
}

macro_rules! impl_has_subgraph {
    ($($state:ty),* $(,)?) => {
        $(
            impl HasSubgraph for $state {
                fn subgraph(&self) -> &SubgraphState {
                    &self.subgraph
                }

                fn subgraph_mut(&mut self) -> &mut SubgraphState {
                    &mut self.subgraph
                }
            }
        )*
    };
}

/// State of the create paper pipeline
#[derive(Debug, Clone, Default)]
pub struct PaperState {
    pub subgraph: SubgraphState,
    /// Created paper resource
    pub paper_id: Option<ThingId>,
}

/// State of the create rosetta-stone statement pipeline
#[derive(Debug, Clone, Default)]
pub struct RosettaStoneStatementState {
    pub subgraph: SubgraphState,
    pub template: Option<Template>,
    /// Created statement resource
    pub statement_id: Option<ThingId>,
}

/// State of the update template instance pipeline
#[derive(Debug, Clone, Default)]
pub struct TemplateInstanceState {
    pub subgraph: SubgraphState,
    pub subject: Option<Resource>,
    pub template: Option<Template>,
    /// Statements no longer backed by the command
    pub to_remove: Vec<StatementId>,
}

impl_has_subgraph!(PaperState, RosettaStoneStatementState, TemplateInstanceState);

/// State of the create template pipeline
#[derive(Debug, Clone, Default)]
pub struct TemplateState {
    /// Created node shape
    pub template_id: Option<ThingId>,
    /// Created property shapes in order
    pub property_ids: Vec<ThingId>,
}

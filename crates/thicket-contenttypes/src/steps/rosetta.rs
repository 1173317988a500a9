//! Steps of the create rosetta-stone statement pipeline

use super::{check_value, required};
use crate::commands::CreateRosettaStoneStatementCommand;
use crate::creator::SubgraphCreator;
use crate::error::ContentTypeError;
use crate::pipeline::Step;
use crate::state::{BakedStatement, PositionalResource, RosettaStoneStatementState, SubgraphState};
use std::collections::BTreeSet;
use std::sync::Arc;
use thicket_graph::{classes, predicates, ClassRepository, GraphWriter, ThingRepository};
use thicket_symbol::{IdentifierResolver, Placeholder, SymbolError};
use thicket_template::{Slot, TemplateConstraintValidator, TemplateKind, TemplateProperty, TemplateRepository};

type Command = CreateRosettaStoneStatementCommand;
type State = RosettaStoneStatementState;

/// Loads the template and checks that it is a rosetta-stone template
pub struct RosettaTemplateValidator {
    templates: Arc<dyn TemplateRepository>,
}

impl RosettaTemplateValidator {
    #[must_use]
    pub fn new(templates: Arc<dyn TemplateRepository>) -> Self {
        Self { templates }
    }
}

impl Step<Command, State> for RosettaTemplateValidator {
    fn name(&self) -> &'static str {
        "rosetta-template"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        let template = self
            .templates
            .find_by_id(&command.template_id)?
            .ok_or_else(|| ContentTypeError::RosettaStoneTemplateNotFound(command.template_id.clone()))?;
        if template.kind != TemplateKind::RosettaStone {
            return Err(ContentTypeError::NotARosettaStoneTemplate(template.id));
        }
        state.template = Some(template);
        Ok(state)
    }
}

/// Context, if given, must exist
pub struct ContextValidator {
    things: Arc<dyn ThingRepository>,
}

impl ContextValidator {
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>) -> Self {
        Self { things }
    }
}

impl Step<Command, State> for ContextValidator {
    fn name(&self) -> &'static str {
        "rosetta-context"
    }

    fn apply(&self, command: &Command, state: State) -> Result<State, ContentTypeError> {
        if let Some(context) = &command.context {
            if self.things.find_by_thing_id(context)?.is_none() {
                return Err(SymbolError::ThingNotFound(context.clone()).into());
            }
        }
        Ok(state)
    }
}

/// Arity, cardinality and value checks of every input position
pub struct PositionValidator {
    things: Arc<dyn ThingRepository>,
    classes: Arc<dyn ClassRepository>,
}

impl PositionValidator {
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>, classes: Arc<dyn ClassRepository>) -> Self {
        Self { things, classes }
    }
}

impl Step<Command, State> for PositionValidator {
    fn name(&self) -> &'static str {
        "rosetta-positions"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        let template = required(&state.template, self.name(), "template")?.clone();
        let validator = TemplateConstraintValidator::new(&*self.classes);
        let resolver = IdentifierResolver::new(&*self.things);

        validator.check_arity(&template, command.objects.len())?;
        let subject_property = template
            .subject_position()
            .ok_or(ContentTypeError::MissingSubjectPosition)?;

        let statement = Placeholder::positional(0);
        state.subgraph.placeholders.declare(&statement);
        let statement = statement.to_string();

        let positions = std::iter::once((subject_property, Slot::Subject, command.subjects.as_slice())).chain(
            template
                .object_positions()
                .iter()
                .zip(&command.objects)
                .enumerate()
                .map(|(index, (property, values))| (property, Slot::Object(index), values.as_slice())),
        );
        for (property, slot, values) in positions {
            validate_position(&validator, &resolver, &mut state.subgraph, property, slot, &statement, values)?;
        }

        state.subgraph.positional.push(PositionalResource {
            placeholder: statement,
            label: template.label.clone(),
            classes: BTreeSet::from([template.target_class.clone(), classes::ROSETTA_STONE_STATEMENT]),
        });
        Ok(state)
    }
}

fn validate_position(
    validator: &TemplateConstraintValidator<'_>,
    resolver: &IdentifierResolver<'_>,
    subgraph: &mut SubgraphState,
    property: &TemplateProperty,
    slot: Slot,
    statement: &str,
    values: &[String],
) -> Result<(), ContentTypeError> {
    validator.validate_cardinality(property, slot, values.len())?;
    for value in values {
        check_value(validator, resolver, subgraph, property, value)?;
        subgraph
            .baked_statements
            .insert(BakedStatement::new(statement, property.path.as_str(), value.as_str()));
    }
    Ok(())
}

/// Creates the statement resource, its values and the context link
pub struct RosettaStatementCreator {
    creator: SubgraphCreator,
    writer: Arc<dyn GraphWriter>,
}

impl RosettaStatementCreator {
    #[must_use]
    pub fn new(creator: SubgraphCreator, writer: Arc<dyn GraphWriter>) -> Self {
        Self { creator, writer }
    }
}

impl Step<Command, State> for RosettaStatementCreator {
    fn name(&self) -> &'static str {
        "rosetta-statement-creator"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        self.creator.create(
            command.contributor_id,
            command.extraction_method,
            &mut state.subgraph,
            None,
        )?;
        let statement = state
            .subgraph
            .lookup
            .get("^0")
            .cloned()
            .ok_or_else(|| ContentTypeError::PlaceholderNotCreated("^0".into()))?;

        if let Some(context) = &command.context {
            self.writer
                .add_statement(command.contributor_id, &statement, &predicates::HAS_CONTEXT, context)?;
        }
        tracing::info!(statement = %statement, template = %command.template_id, "created rosetta stone statement");
        state.statement_id = Some(statement);
        Ok(state)
    }
}

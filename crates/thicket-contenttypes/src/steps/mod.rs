//! Step vocabulary
//!
//! Steps shared by every command that carries definitions live here;
//! content type specific steps live in the submodules.

pub mod instance;
pub mod paper;
pub mod rosetta;
pub mod template;

use crate::commands::ThingsCommand;
use crate::error::ContentTypeError;
use crate::pipeline::Step;
use crate::state::{HasSubgraph, SubgraphState};
use std::sync::Arc;
use thicket_graph::{ClassRepository, ThingRepository};
use thicket_symbol::{
    DefinitionRules, DefinitionValidator, IdentifierResolver, Placeholder, PlaceholderValidator,
    Resolution,
};
use thicket_template::{ConstraintError, TemplateConstraintValidator, TemplateProperty};

/// Validates declared placeholders and seeds the state's definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderStep;

impl<C, S> Step<C, S> for PlaceholderStep
where
    C: ThingsCommand,
    S: HasSubgraph,
{
    fn name(&self) -> &'static str {
        "placeholders"
    }

    fn apply(&self, command: &C, mut state: S) -> Result<S, ContentTypeError> {
        let definitions = command.definitions();
        let declared = PlaceholderValidator::new().validate(definitions.declared_ids())?;
        tracing::debug!(placeholders = declared.len(), "placeholders declared");

        let subgraph = state.subgraph_mut();
        for id in declared.iter() {
            if let Some(placeholder) = Placeholder::parse(id) {
                subgraph.placeholders.declare(&placeholder);
            }
        }
        subgraph.definitions = definitions.clone();
        Ok(state)
    }
}

/// Validates definition content against the store
pub struct DefinitionStep {
    things: Arc<dyn ThingRepository>,
    classes: Arc<dyn ClassRepository>,
    rules: DefinitionRules,
}

impl DefinitionStep {
    /// Create step
    #[must_use]
    pub fn new(
        things: Arc<dyn ThingRepository>,
        classes: Arc<dyn ClassRepository>,
        rules: DefinitionRules,
    ) -> Self {
        Self {
            things,
            classes,
            rules,
        }
    }
}

impl<C, S> Step<C, S> for DefinitionStep
where
    C: ThingsCommand,
    S: HasSubgraph,
{
    fn name(&self) -> &'static str {
        "definitions"
    }

    fn apply(&self, _command: &C, mut state: S) -> Result<S, ContentTypeError> {
        let SubgraphState {
            definitions,
            placeholders,
            validated_ids,
            ..
        } = state.subgraph_mut();
        DefinitionValidator::new(&*self.things, &*self.classes, self.rules).validate(
            definitions,
            placeholders,
            validated_ids,
        )?;
        Ok(state)
    }
}

/// Resolve `value` and check it against `property`
///
/// A literal placeholder that passes the check takes the slot's
/// datatype, so `"100"` declared as `xsd:string` fills an `xsd:integer`
/// slot. A placeholder bound to slots of different datatypes is
/// rejected.
pub(crate) fn check_value(
    validator: &TemplateConstraintValidator<'_>,
    resolver: &IdentifierResolver<'_>,
    subgraph: &mut SubgraphState,
    property: &TemplateProperty,
    value: &str,
) -> Result<Resolution, ContentTypeError> {
    let resolution = resolver.resolve(value, &subgraph.placeholders, &mut subgraph.validated_ids)?;
    validator.validate_value(property, value, &resolution, &subgraph.definitions)?;
    if let Some(datatype) = property.constraint.literal_datatype() {
        adopt_slot_datatype(subgraph, property, value, datatype)?;
    }
    Ok(resolution)
}

fn adopt_slot_datatype(
    subgraph: &mut SubgraphState,
    property: &TemplateProperty,
    value: &str,
    datatype: &str,
) -> Result<(), ContentTypeError> {
    let Some(literal) = subgraph.definitions.literals.get_mut(value) else {
        return Ok(());
    };
    match subgraph.slot_datatypes.get(value) {
        Some(bound) if bound != datatype => {
            return Err(ConstraintError::MismatchedDataType {
                property: property.id.clone(),
                object: value.to_string(),
                expected: datatype.to_string(),
                found: bound.clone(),
            }
            .into());
        }
        Some(_) => return Ok(()),
        None => {}
    }
    if literal.datatype != datatype {
        tracing::debug!(placeholder = value, datatype, "adopting slot datatype");
        literal.datatype = datatype.to_string();
    }
    subgraph
        .slot_datatypes
        .insert(value.to_string(), datatype.to_string());
    Ok(())
}

/// Fetch a state field set by an earlier step
pub(crate) fn required<'s, T>(
    value: &'s Option<T>,
    step: &'static str,
    field: &'static str,
) -> Result<&'s T, ContentTypeError> {
    value
        .as_ref()
        .ok_or(ContentTypeError::MissingState { step, field })
}

pub(crate) fn is_valid_optional_label(label: Option<&str>, max_length: usize) -> bool {
    label.map_or(true, |label| thicket_graph::is_valid_label(label, max_length))
}

pub(crate) fn is_valid_optional_text(text: Option<&str>, max_length: usize) -> bool {
    text.map_or(true, |text| thicket_graph::is_valid_literal_label(text, max_length))
}

//! Steps of the create template pipeline
//!
//! Templates are written as shapes the [`GraphTemplateRepository`] reads
//! back: a node shape with one property shape per slot.
//!
//! [`GraphTemplateRepository`]: thicket_template::GraphTemplateRepository

use super::{is_valid_optional_label, is_valid_optional_text, required};
use crate::commands::{CreateTemplateCommand, TemplatePropertyDefinition};
use crate::error::ContentTypeError;
use crate::pipeline::Step;
use crate::state::TemplateState;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;
use thicket_graph::{
    classes, is_valid_datatype, is_valid_label, predicates, ContributorId, GraphWriter, NewLiteral,
    NewResource, StoreError, Thing, ThingId, ThingRepository, Xsd,
};
use thicket_symbol::SymbolError;
use thicket_template::{PropertyConstraint, TemplateKind, TemplateRepository};

type Command = CreateTemplateCommand;
type State = TemplateState;

/// Label, description and formatted label
pub struct TemplateLabelValidator {
    max_label_length: usize,
}

impl TemplateLabelValidator {
    #[must_use]
    pub fn new(max_label_length: usize) -> Self {
        Self { max_label_length }
    }
}

impl Step<Command, State> for TemplateLabelValidator {
    fn name(&self) -> &'static str {
        "template-label"
    }

    fn apply(&self, command: &Command, state: State) -> Result<State, ContentTypeError> {
        if !is_valid_label(&command.label, self.max_label_length) {
            return Err(ContentTypeError::InvalidLabel("label".into()));
        }
        if !is_valid_optional_text(command.description.as_deref(), self.max_label_length) {
            return Err(ContentTypeError::InvalidLabel("description".into()));
        }
        if !is_valid_optional_label(command.formatted_label.as_deref(), self.max_label_length) {
            return Err(ContentTypeError::InvalidLabel("formatted label".into()));
        }
        Ok(state)
    }
}

/// Target class exists, is a class and has no template yet
pub struct TargetClassValidator {
    things: Arc<dyn ThingRepository>,
    templates: Arc<dyn TemplateRepository>,
}

impl TargetClassValidator {
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>, templates: Arc<dyn TemplateRepository>) -> Self {
        Self { things, templates }
    }
}

impl Step<Command, State> for TargetClassValidator {
    fn name(&self) -> &'static str {
        "template-target-class"
    }

    fn apply(&self, command: &Command, state: State) -> Result<State, ContentTypeError> {
        expect_class(&*self.things, &command.target_class)?;
        if let Some(template) = self.templates.find_by_target_class(&command.target_class)? {
            return Err(ContentTypeError::TemplateAlreadyExistsForClass {
                class: command.target_class.clone(),
                template,
            });
        }
        Ok(state)
    }
}

/// Property slots: labels, counts, paths and constraints
pub struct TemplatePropertiesValidator {
    things: Arc<dyn ThingRepository>,
    max_label_length: usize,
}

impl TemplatePropertiesValidator {
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>, max_label_length: usize) -> Self {
        Self {
            things,
            max_label_length,
        }
    }

    fn validate_property(&self, index: usize, property: &TemplatePropertyDefinition) -> Result<(), ContentTypeError> {
        if !is_valid_label(&property.label, self.max_label_length)
            || !is_valid_optional_label(property.placeholder.as_deref(), self.max_label_length)
        {
            return Err(ContentTypeError::InvalidLabel(format!("property {index}")));
        }
        if !is_valid_optional_text(property.description.as_deref(), self.max_label_length) {
            return Err(ContentTypeError::InvalidLabel(format!("description of property {index}")));
        }

        validate_counts(property.min_count, property.max_count)?;

        match self.things.find_by_thing_id(&property.path)? {
            Some(Thing::Predicate(_)) => {}
            Some(_) => return Err(ContentTypeError::ThingIsNotAPredicate(property.path.to_string())),
            None => return Err(SymbolError::ThingNotFound(property.path.clone()).into()),
        }

        match &property.constraint {
            PropertyConstraint::Untyped => {}
            PropertyConstraint::Resource { class } => expect_class(&*self.things, class)?,
            PropertyConstraint::StringLiteral { pattern } => {
                if let Some(pattern) = pattern {
                    Regex::new(pattern).map_err(|_| ContentTypeError::InvalidRegexPattern(pattern.clone()))?;
                }
            }
            PropertyConstraint::NumberLiteral {
                datatype,
                min_inclusive,
                max_inclusive,
            } => {
                if !datatype.is_number() {
                    return Err(ContentTypeError::InvalidDatatype(datatype.prefixed_uri().to_string()));
                }
                if let (Some(min), Some(max)) = (min_inclusive, max_inclusive) {
                    if min > max {
                        return Err(ContentTypeError::InvalidBounds { min: *min, max: *max });
                    }
                }
            }
            PropertyConstraint::OtherLiteral { datatype } => {
                if !is_valid_datatype(datatype) {
                    return Err(ContentTypeError::InvalidDatatype(datatype.clone()));
                }
            }
        }
        Ok(())
    }
}

impl Step<Command, State> for TemplatePropertiesValidator {
    fn name(&self) -> &'static str {
        "template-properties"
    }

    fn apply(&self, command: &Command, state: State) -> Result<State, ContentTypeError> {
        if command.kind == TemplateKind::RosettaStone && command.properties.is_empty() {
            return Err(ContentTypeError::MissingSubjectPosition);
        }
        for (index, property) in command.properties.iter().enumerate() {
            self.validate_property(index, property)?;
        }
        Ok(state)
    }
}

fn validate_counts(min: Option<i64>, max: Option<i64>) -> Result<(), ContentTypeError> {
    if let Some(min) = min {
        if u32::try_from(min).is_err() {
            return Err(ContentTypeError::InvalidMinCount(min));
        }
    }
    if let Some(max) = max {
        if u32::try_from(max).is_err() {
            return Err(ContentTypeError::InvalidMaxCount(max));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if max > 0 && min > max {
            return Err(ContentTypeError::InvalidCardinality { min, max });
        }
    }
    Ok(())
}

fn expect_class(things: &dyn ThingRepository, id: &ThingId) -> Result<(), ContentTypeError> {
    match things.find_by_thing_id(id)? {
        Some(Thing::Class(_)) => Ok(()),
        Some(_) => Err(SymbolError::ThingIsNotAClass(id.to_string()).into()),
        None => Err(SymbolError::ThingNotFound(id.clone()).into()),
    }
}

/// Creates the node shape
pub struct NodeShapeCreator {
    writer: Arc<dyn GraphWriter>,
}

impl NodeShapeCreator {
    #[must_use]
    pub fn new(writer: Arc<dyn GraphWriter>) -> Self {
        Self { writer }
    }
}

impl Step<Command, State> for NodeShapeCreator {
    fn name(&self) -> &'static str {
        "template-node-shape-creator"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        let class = match command.kind {
            TemplateKind::Standard => classes::NODE_SHAPE,
            TemplateKind::RosettaStone => classes::ROSETTA_NODE_SHAPE,
        };
        let id = self.writer.create_resource(
            command.contributor_id,
            &NewResource {
                label: command.label.clone(),
                classes: BTreeSet::from([class]),
                extraction_method: command.extraction_method,
            },
        )?;
        tracing::info!(template = %id, target_class = %command.target_class, "created template");
        state.template_id = Some(id);
        Ok(state)
    }
}

/// Links target class, description, label format and closed flag
pub struct TemplateMetadataCreator {
    writer: Arc<dyn GraphWriter>,
}

impl TemplateMetadataCreator {
    #[must_use]
    pub fn new(writer: Arc<dyn GraphWriter>) -> Self {
        Self { writer }
    }
}

impl Step<Command, State> for TemplateMetadataCreator {
    fn name(&self) -> &'static str {
        "template-metadata-creator"
    }

    fn apply(&self, command: &Command, state: State) -> Result<State, ContentTypeError> {
        let template = required(&state.template_id, self.name(), "template id")?;
        let writer = ShapeWriter::new(&*self.writer, command.contributor_id);

        writer.link(template, &predicates::SH_TARGET_CLASS, &command.target_class)?;
        if let Some(description) = &command.description {
            writer.literal(template, &predicates::DESCRIPTION, description, Xsd::String)?;
        }
        if let Some(format) = &command.formatted_label {
            writer.literal(template, &predicates::TEMPLATE_LABEL_FORMAT, format, Xsd::String)?;
        }
        if command.is_closed {
            writer.literal(template, &predicates::SH_CLOSED, "true", Xsd::Boolean)?;
        }
        Ok(state)
    }
}

/// Creates one property shape per slot
pub struct PropertyShapeCreator {
    writer: Arc<dyn GraphWriter>,
}

impl PropertyShapeCreator {
    #[must_use]
    pub fn new(writer: Arc<dyn GraphWriter>) -> Self {
        Self { writer }
    }
}

impl Step<Command, State> for PropertyShapeCreator {
    fn name(&self) -> &'static str {
        "template-property-creator"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        let template = required(&state.template_id, self.name(), "template id")?.clone();
        let writer = ShapeWriter::new(&*self.writer, command.contributor_id);

        for (order, property) in command.properties.iter().enumerate() {
            let shape = self.writer.create_resource(
                command.contributor_id,
                &NewResource {
                    label: property.label.clone(),
                    classes: BTreeSet::from([classes::PROPERTY_SHAPE]),
                    extraction_method: command.extraction_method,
                },
            )?;
            writer.link(&template, &predicates::SH_PROPERTY, &shape)?;
            writer.link(&shape, &predicates::SH_PATH, &property.path)?;
            writer.literal(&shape, &predicates::SH_ORDER, &order.to_string(), Xsd::Integer)?;
            if let Some(min) = property.min_count {
                writer.literal(&shape, &predicates::SH_MIN_COUNT, &min.to_string(), Xsd::Integer)?;
            }
            if let Some(max) = property.max_count {
                writer.literal(&shape, &predicates::SH_MAX_COUNT, &max.to_string(), Xsd::Integer)?;
            }
            if let Some(placeholder) = &property.placeholder {
                writer.literal(&shape, &predicates::PLACEHOLDER, placeholder, Xsd::String)?;
            }
            if let Some(description) = &property.description {
                writer.literal(&shape, &predicates::DESCRIPTION, description, Xsd::String)?;
            }
            writer.constraint(&shape, &property.constraint)?;

            tracing::debug!(shape = %shape, path = %property.path, order, "created property shape");
            state.property_ids.push(shape);
        }
        Ok(state)
    }
}

/// Statement helper bound to one contributor
struct ShapeWriter<'a> {
    writer: &'a dyn GraphWriter,
    contributor: ContributorId,
}

impl<'a> ShapeWriter<'a> {
    fn new(writer: &'a dyn GraphWriter, contributor: ContributorId) -> Self {
        Self { writer, contributor }
    }

    fn link(&self, subject: &ThingId, predicate: &ThingId, object: &ThingId) -> Result<(), StoreError> {
        self.writer
            .add_statement(self.contributor, subject, predicate, object)
            .map(|_| ())
    }

    fn literal(&self, subject: &ThingId, predicate: &ThingId, label: &str, datatype: Xsd) -> Result<(), StoreError> {
        let literal = self.writer.create_literal(
            self.contributor,
            &NewLiteral {
                label: label.to_string(),
                datatype: datatype.prefixed_uri().to_string(),
            },
        )?;
        self.link(subject, predicate, &literal)
    }

    fn constraint(&self, shape: &ThingId, constraint: &PropertyConstraint) -> Result<(), StoreError> {
        match constraint {
            PropertyConstraint::Untyped => Ok(()),
            PropertyConstraint::Resource { class } => self.link(shape, &predicates::SH_CLASS, class),
            PropertyConstraint::StringLiteral { pattern } => {
                self.literal(shape, &predicates::SH_DATATYPE, Xsd::String.prefixed_uri(), Xsd::String)?;
                match pattern {
                    Some(pattern) => self.literal(shape, &predicates::SH_PATTERN, pattern, Xsd::String),
                    None => Ok(()),
                }
            }
            PropertyConstraint::NumberLiteral {
                datatype,
                min_inclusive,
                max_inclusive,
            } => {
                self.literal(shape, &predicates::SH_DATATYPE, datatype.prefixed_uri(), Xsd::String)?;
                if let Some(min) = min_inclusive {
                    self.literal(shape, &predicates::SH_MIN_INCLUSIVE, &min.to_string(), Xsd::Decimal)?;
                }
                if let Some(max) = max_inclusive {
                    self.literal(shape, &predicates::SH_MAX_INCLUSIVE, &max.to_string(), Xsd::Decimal)?;
                }
                Ok(())
            }
            PropertyConstraint::OtherLiteral { datatype } => {
                self.literal(shape, &predicates::SH_DATATYPE, datatype, Xsd::String)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTemplates;
    use thicket_graph::mocks::MockThingRepository;
    use thicket_graph::{Class, ExtractionMethod, Predicate, Resource};

    fn command(properties: Vec<TemplatePropertyDefinition>) -> Command {
        Command {
            contributor_id: ContributorId::UNKNOWN,
            label: "Measurement".into(),
            description: None,
            formatted_label: None,
            target_class: ThingId::new("C1"),
            properties,
            is_closed: false,
            kind: TemplateKind::Standard,
            extraction_method: ExtractionMethod::Unknown,
        }
    }

    fn property(constraint: PropertyConstraint) -> TemplatePropertyDefinition {
        TemplatePropertyDefinition {
            label: "value".into(),
            placeholder: None,
            description: None,
            min_count: None,
            max_count: None,
            path: ThingId::new("P1"),
            constraint,
        }
    }

    fn store() -> MockThingRepository {
        let mut things = MockThingRepository::new();
        things.expect_find_by_thing_id().returning(|id| {
            let label = id.to_string();
            let id = id.clone();
            Ok(Some(match id.as_str().chars().next() {
                Some('C') => Thing::Class(Class { id, label, uri: None }),
                Some('P') => Thing::Predicate(Predicate { id, label }),
                _ => Thing::Resource(Resource {
                    id,
                    label,
                    classes: BTreeSet::new(),
                }),
            }))
        });
        things
    }

    fn validate(property: TemplatePropertyDefinition) -> Result<State, ContentTypeError> {
        TemplatePropertiesValidator::new(Arc::new(store()), 100).apply(&command(vec![property]), State::default())
    }

    #[test]
    fn class_with_template_is_rejected() {
        let mut templates = MockTemplates::new();
        templates
            .expect_find_by_target_class()
            .returning(|_| Ok(Some(ThingId::new("T9"))));

        let err = TargetClassValidator::new(Arc::new(store()), Arc::new(templates))
            .apply(&command(Vec::new()), State::default())
            .unwrap_err();

        assert_eq!(
            err,
            ContentTypeError::TemplateAlreadyExistsForClass {
                class: ThingId::new("C1"),
                template: ThingId::new("T9"),
            }
        );
    }

    #[test]
    fn target_must_be_a_class() {
        let templates = MockTemplates::new();
        let mut command = command(Vec::new());
        command.target_class = ThingId::new("R1");

        let err = TargetClassValidator::new(Arc::new(store()), Arc::new(templates))
            .apply(&command, State::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::Symbol(SymbolError::ThingIsNotAClass("R1".into())));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let mut min = property(PropertyConstraint::Untyped);
        min.min_count = Some(-1);
        assert_eq!(validate(min).unwrap_err(), ContentTypeError::InvalidMinCount(-1));

        let mut max = property(PropertyConstraint::Untyped);
        max.max_count = Some(-2);
        assert_eq!(validate(max).unwrap_err(), ContentTypeError::InvalidMaxCount(-2));
    }

    #[test]
    fn min_above_max_is_rejected() {
        let mut property = property(PropertyConstraint::Untyped);
        property.min_count = Some(3);
        property.max_count = Some(1);
        assert_eq!(
            validate(property).unwrap_err(),
            ContentTypeError::InvalidCardinality { min: 3, max: 1 }
        );
    }

    #[test]
    fn zero_max_is_unbounded() {
        let mut property = property(PropertyConstraint::Untyped);
        property.min_count = Some(3);
        property.max_count = Some(0);
        assert!(validate(property).is_ok());
    }

    #[test]
    fn bad_pattern_is_rejected() {
        let err = validate(property(PropertyConstraint::StringLiteral {
            pattern: Some("[a-".into()),
        }))
        .unwrap_err();
        assert_eq!(err, ContentTypeError::InvalidRegexPattern("[a-".into()));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = validate(property(PropertyConstraint::NumberLiteral {
            datatype: Xsd::Integer,
            min_inclusive: Some(10.0),
            max_inclusive: Some(1.0),
        }))
        .unwrap_err();
        assert_eq!(err, ContentTypeError::InvalidBounds { min: 10.0, max: 1.0 });
    }

    #[test]
    fn number_slot_needs_number_datatype() {
        let err = validate(property(PropertyConstraint::NumberLiteral {
            datatype: Xsd::Date,
            min_inclusive: None,
            max_inclusive: None,
        }))
        .unwrap_err();
        assert_eq!(err, ContentTypeError::InvalidDatatype("xsd:date".into()));
    }

    #[test]
    fn path_must_be_a_predicate() {
        let mut property = property(PropertyConstraint::Untyped);
        property.path = ThingId::new("R5");
        assert_eq!(
            validate(property).unwrap_err(),
            ContentTypeError::ThingIsNotAPredicate("R5".into())
        );
    }

    #[test]
    fn rosetta_template_needs_a_subject_position() {
        let mut command = command(Vec::new());
        command.kind = TemplateKind::RosettaStone;

        let err = TemplatePropertiesValidator::new(Arc::new(store()), 100)
            .apply(&command, State::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::MissingSubjectPosition);
    }
}

//! Steps of the update template instance pipeline

use super::{check_value, required};
use crate::commands::UpdateTemplateInstanceCommand;
use crate::creator::SubgraphCreator;
use crate::error::ContentTypeError;
use crate::pipeline::Step;
use crate::state::{BakedStatement, TemplateInstanceState};
use std::sync::Arc;
use thicket_graph::{ClassRepository, GraphWriter, Resource, StatementRepository, Thing, ThingId, ThingRepository};
use thicket_symbol::{IdentifierResolver, Resolution};
use thicket_template::{ConstraintError, Slot, TemplateConstraintValidator, TemplateRepository};

type Command = UpdateTemplateInstanceCommand;
type State = TemplateInstanceState;

/// Subject must be an existing resource
pub struct SubjectValidator {
    things: Arc<dyn ThingRepository>,
}

impl SubjectValidator {
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>) -> Self {
        Self { things }
    }
}

impl Step<Command, State> for SubjectValidator {
    fn name(&self) -> &'static str {
        "instance-subject"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        match self.things.find_by_thing_id(&command.subject)? {
            Some(Thing::Resource(resource)) => {
                state.subject = Some(resource);
                Ok(state)
            }
            _ => Err(ContentTypeError::ResourceNotFound(command.subject.clone())),
        }
    }
}

/// Template must exist and target one of the subject's classes or a
/// superclass of one
pub struct InstanceTemplateValidator {
    templates: Arc<dyn TemplateRepository>,
    classes: Arc<dyn ClassRepository>,
}

impl InstanceTemplateValidator {
    #[must_use]
    pub fn new(templates: Arc<dyn TemplateRepository>, classes: Arc<dyn ClassRepository>) -> Self {
        Self { templates, classes }
    }

    fn applies_to(&self, subject: &Resource, target: &ThingId) -> Result<bool, ContentTypeError> {
        for class in &subject.classes {
            if class == target || self.classes.is_subclass_of(class, target)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Step<Command, State> for InstanceTemplateValidator {
    fn name(&self) -> &'static str {
        "instance-template"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        let template = self
            .templates
            .find_by_id(&command.template_id)?
            .ok_or_else(|| ContentTypeError::TemplateNotFound(command.template_id.clone()))?;
        let subject = required(&state.subject, self.name(), "subject")?;
        if !self.applies_to(subject, &template.target_class)? {
            return Err(ContentTypeError::TemplateNotApplicable {
                template: template.id,
                resource: subject.id.clone(),
            });
        }
        state.template = Some(template);
        Ok(state)
    }
}

/// Checks every property and computes the statement diff
///
/// Values already linked to the subject are kept as they are, values
/// no longer listed are marked for removal, everything else is baked.
pub struct PropertyValueValidator {
    things: Arc<dyn ThingRepository>,
    classes: Arc<dyn ClassRepository>,
    statements: Arc<dyn StatementRepository>,
}

impl PropertyValueValidator {
    #[must_use]
    pub fn new(
        things: Arc<dyn ThingRepository>,
        classes: Arc<dyn ClassRepository>,
        statements: Arc<dyn StatementRepository>,
    ) -> Self {
        Self {
            things,
            classes,
            statements,
        }
    }
}

impl Step<Command, State> for PropertyValueValidator {
    fn name(&self) -> &'static str {
        "instance-property-values"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        let template = required(&state.template, self.name(), "template")?.clone();

        let unknown: Vec<_> = command
            .statements
            .keys()
            .filter(|path| template.property_by_path(path).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ConstraintError::UnknownTemplateProperties {
                template: template.id.clone(),
                unknown,
            }
            .into());
        }

        let validator = TemplateConstraintValidator::new(&*self.classes);
        let resolver = IdentifierResolver::new(&*self.things);
        let current = self.statements.find_all_by_subject(&command.subject)?;
        let subject = command.subject.as_str();

        for property in &template.properties {
            let values = command
                .statements
                .get(&property.path)
                .map_or(&[][..], Vec::as_slice);
            validator.validate_cardinality(property, Slot::Property(property.path.clone()), values.len())?;

            for value in values {
                let resolution = check_value(&validator, &resolver, &mut state.subgraph, property, value)?;
                let linked = matches!(&resolution, Resolution::Existing(thing) if current
                    .iter()
                    .any(|s| s.predicate == property.path && s.object.id() == thing.id()));
                if !linked {
                    state
                        .subgraph
                        .baked_statements
                        .insert(BakedStatement::new(subject, property.path.as_str(), value.as_str()));
                }
            }

            state.to_remove.extend(
                current
                    .iter()
                    .filter(|s| s.predicate == property.path)
                    .filter(|s| !values.iter().any(|value| s.object.id() == value.as_str()))
                    .map(|s| s.id.clone()),
            );
        }

        tracing::debug!(
            added = state.subgraph.baked_statements.len(),
            removed = state.to_remove.len(),
            "computed template instance diff"
        );
        Ok(state)
    }
}

/// Deletes stale statements and materializes the new ones
pub struct TemplateInstanceCreator {
    creator: SubgraphCreator,
    writer: Arc<dyn GraphWriter>,
}

impl TemplateInstanceCreator {
    #[must_use]
    pub fn new(creator: SubgraphCreator, writer: Arc<dyn GraphWriter>) -> Self {
        Self { creator, writer }
    }
}

impl Step<Command, State> for TemplateInstanceCreator {
    fn name(&self) -> &'static str {
        "instance-creator"
    }

    fn apply(&self, command: &Command, mut state: State) -> Result<State, ContentTypeError> {
        if !state.to_remove.is_empty() {
            self.writer.delete_statements(&state.to_remove)?;
            tracing::debug!(count = state.to_remove.len(), "removed stale statements");
        }
        self.creator.create(
            command.contributor_id,
            command.extraction_method,
            &mut state.subgraph,
            None,
        )?;
        tracing::info!(subject = %command.subject, template = %command.template_id, "updated template instance");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTemplates;
    use indexmap::IndexMap;
    use std::collections::BTreeSet;
    use thicket_graph::mocks::{MockClassRepository, MockStatementRepository, MockThingRepository};
    use thicket_graph::{ContributorId, ExtractionMethod, Literal, Resource, Statement, StatementId, ThingId};
    use thicket_symbol::ThingDefinitions;
    use thicket_template::{PropertyConstraint, Template, TemplateKind, TemplateProperty};

    fn template() -> Template {
        Template {
            id: ThingId::new("T1"),
            label: "measurement".into(),
            description: None,
            formatted_label: None,
            target_class: ThingId::new("C1"),
            properties: vec![TemplateProperty {
                id: ThingId::new("PS1"),
                label: "value".into(),
                placeholder: None,
                description: None,
                order: 0,
                path: ThingId::new("P1"),
                min_count: None,
                max_count: Some(2),
                constraint: PropertyConstraint::Untyped,
            }],
            is_closed: false,
            kind: TemplateKind::Standard,
        }
    }

    fn resource(id: &str, classes: &[&str]) -> Resource {
        Resource {
            id: ThingId::new(id),
            label: id.to_string(),
            classes: classes.iter().map(|c| ThingId::new(*c)).collect::<BTreeSet<_>>(),
        }
    }

    fn command(values: &[&str]) -> Command {
        let mut statements = IndexMap::new();
        statements.insert(
            ThingId::new("P1"),
            values.iter().map(ToString::to_string).collect(),
        );
        Command {
            contributor_id: ContributorId::UNKNOWN,
            subject: ThingId::new("R1"),
            template_id: ThingId::new("T1"),
            statements,
            definitions: ThingDefinitions::new(),
            extraction_method: ExtractionMethod::Unknown,
        }
    }

    fn statement(id: &str, object: &str) -> Statement {
        Statement {
            id: StatementId::new(id),
            subject: ThingId::new("R1"),
            predicate: ThingId::new("P1"),
            object: Thing::Literal(Literal {
                id: ThingId::new(object),
                label: object.to_string(),
                datatype: "xsd:string".into(),
            }),
        }
    }

    fn validated_state() -> State {
        State {
            subject: Some(resource("R1", &["C1"])),
            template: Some(template()),
            ..State::default()
        }
    }

    #[test]
    fn missing_subject_is_rejected() {
        let mut things = MockThingRepository::new();
        things.expect_find_by_thing_id().returning(|_| Ok(None));

        let err = SubjectValidator::new(Arc::new(things))
            .apply(&command(&[]), State::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::ResourceNotFound(ThingId::new("R1")));
    }

    #[test]
    fn template_must_target_subject_class() {
        let mut templates = MockTemplates::new();
        templates.expect_find_by_id().returning(|_| Ok(Some(template())));
        let mut classes = MockClassRepository::new();
        classes.expect_is_subclass_of().returning(|_, _| Ok(false));
        let state = State {
            subject: Some(resource("R1", &["C9"])),
            ..State::default()
        };

        let err = InstanceTemplateValidator::new(Arc::new(templates), Arc::new(classes))
            .apply(&command(&[]), state)
            .unwrap_err();

        assert_eq!(
            err,
            ContentTypeError::TemplateNotApplicable {
                template: ThingId::new("T1"),
                resource: ThingId::new("R1"),
            }
        );
    }

    #[test]
    fn template_applies_to_subclass_instances() {
        let mut templates = MockTemplates::new();
        templates.expect_find_by_id().returning(|_| Ok(Some(template())));
        let mut classes = MockClassRepository::new();
        classes
            .expect_is_subclass_of()
            .withf(|class, parent| class.as_str() == "C2" && parent.as_str() == "C1")
            .times(1)
            .returning(|_, _| Ok(true));
        let state = State {
            subject: Some(resource("R1", &["C2"])),
            ..State::default()
        };

        let state = InstanceTemplateValidator::new(Arc::new(templates), Arc::new(classes))
            .apply(&command(&[]), state)
            .unwrap();

        assert_eq!(state.template.map(|t| t.id), Some(ThingId::new("T1")));
    }

    #[test]
    fn unknown_paths_are_reported() {
        let things = MockThingRepository::new();
        let mut statements = MockStatementRepository::new();
        statements.expect_find_all_by_subject().never();
        let step = PropertyValueValidator::new(
            Arc::new(things),
            Arc::new(MockClassRepository::new()),
            Arc::new(statements),
        );
        let mut command = command(&[]);
        command.statements.insert(ThingId::new("P9"), vec!["R2".into()]);

        let err = step.apply(&command, validated_state()).unwrap_err();

        assert_eq!(
            err,
            ContentTypeError::Constraint(ConstraintError::UnknownTemplateProperties {
                template: ThingId::new("T1"),
                unknown: vec![ThingId::new("P9")],
            })
        );
    }

    #[test]
    fn diff_keeps_linked_values_and_removes_stale_ones() {
        let mut things = MockThingRepository::new();
        things.expect_find_by_thing_id().returning(|id| {
            Ok(Some(Thing::Literal(Literal {
                id: id.clone(),
                label: id.to_string(),
                datatype: "xsd:string".into(),
            })))
        });
        let mut statements = MockStatementRepository::new();
        statements
            .expect_find_all_by_subject()
            .times(1)
            .returning(|_| Ok(vec![statement("S1", "L1"), statement("S2", "L2")]));
        let step = PropertyValueValidator::new(
            Arc::new(things),
            Arc::new(MockClassRepository::new()),
            Arc::new(statements),
        );

        let state = step.apply(&command(&["L1", "L3"]), validated_state()).unwrap();

        let baked: Vec<_> = state.subgraph.baked_statements.iter().cloned().collect();
        assert_eq!(baked, vec![BakedStatement::new("R1", "P1", "L3")]);
        assert_eq!(state.to_remove, vec![StatementId::new("S2")]);
    }

    #[test]
    fn cardinality_applies_to_updates() {
        let mut things = MockThingRepository::new();
        things.expect_find_by_thing_id().never();
        let mut statements = MockStatementRepository::new();
        statements.expect_find_all_by_subject().returning(|_| Ok(Vec::new()));
        let step = PropertyValueValidator::new(
            Arc::new(things),
            Arc::new(MockClassRepository::new()),
            Arc::new(statements),
        );

        let err = step
            .apply(&command(&["L1", "L2", "L3"]), validated_state())
            .unwrap_err();

        assert_eq!(
            err,
            ContentTypeError::Constraint(ConstraintError::TooManyPropertyValues {
                slot: Slot::Property(ThingId::new("P1")),
                max: 2,
                actual: 3,
            })
        );
    }
}

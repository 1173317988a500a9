//! Subgraph creation
//!
//! Turns a validated [`SubgraphState`] into graph mutations. Entities are
//! created in dependency order and recorded in the state's lookup table;
//! baked statements are written last with placeholders substituted.
//!
//! Creation is not atomic. A failure part way leaves already created
//! entities in the store; a transactional [`GraphWriter`] is the place to
//! add atomicity.

use crate::error::ContentTypeError;
use crate::state::SubgraphState;
use indexmap::IndexMap;
use std::sync::Arc;
use thicket_graph::{
    predicates, ContributorId, ExtractionMethod, GraphWriter, NewClass, NewList, NewLiteral,
    NewPredicate, NewResource, StatementRepository, ThingId, Xsd,
};
use thicket_symbol::{Placeholder, Resolution, ResolutionCache};

/// Link from an existing entity to every positional resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    pub subject: ThingId,
    pub predicate: ThingId,
}

/// Creates the entities and statements of a validated subgraph
#[derive(Clone)]
pub struct SubgraphCreator {
    writer: Arc<dyn GraphWriter>,
    statements: Arc<dyn StatementRepository>,
}

impl SubgraphCreator {
    /// Create creator over the store ports
    #[inline]
    #[must_use]
    pub fn new(writer: Arc<dyn GraphWriter>, statements: Arc<dyn StatementRepository>) -> Self {
        Self { writer, statements }
    }

    /// Materialize `state`
    ///
    /// Order: classes, resources, literals, predicates, lists (empty, then
    /// filled), positional resources, statements. Only definitions
    /// resolved as placeholders are created. A statement is skipped when
    /// none of its components is a placeholder and the store already
    /// holds the identical triple.
    ///
    /// # Errors
    /// - `ContentTypeError::PlaceholderNotCreated` for a statement that
    ///   references a placeholder nothing created
    /// - store errors of the writer
    pub fn create(
        &self,
        contributor: ContributorId,
        extraction_method: ExtractionMethod,
        state: &mut SubgraphState,
        parent: Option<&ParentLink>,
    ) -> Result<(), ContentTypeError> {
        let SubgraphState {
            definitions,
            validated_ids,
            baked_statements,
            positional,
            lookup,
            ..
        } = state;

        for (id, class) in &definitions.classes {
            if !is_pending(validated_ids, id) {
                continue;
            }
            let created = self.writer.create_class(
                contributor,
                &NewClass {
                    label: class.label.clone(),
                    uri: class.uri.clone(),
                },
            )?;
            record(lookup, id, created);
        }

        for (id, resource) in &definitions.resources {
            if !is_pending(validated_ids, id) {
                continue;
            }
            let classes = resource
                .classes
                .iter()
                .map(|class| substitute(lookup, class))
                .collect::<Result<_, _>>()?;
            let created = self.writer.create_resource(
                contributor,
                &NewResource {
                    label: resource.label.clone(),
                    classes,
                    extraction_method,
                },
            )?;
            record(lookup, id, created);
        }

        for (id, literal) in &definitions.literals {
            if !is_pending(validated_ids, id) {
                continue;
            }
            let created = self.writer.create_literal(
                contributor,
                &NewLiteral {
                    label: literal.label.clone(),
                    datatype: literal.datatype.clone(),
                },
            )?;
            record(lookup, id, created);
        }

        for (id, predicate) in &definitions.predicates {
            if !is_pending(validated_ids, id) {
                continue;
            }
            let created = self.writer.create_predicate(
                contributor,
                &NewPredicate {
                    label: predicate.label.clone(),
                },
            )?;
            if let Some(description) = &predicate.description {
                let literal = self.writer.create_literal(
                    contributor,
                    &NewLiteral {
                        label: description.clone(),
                        datatype: Xsd::String.prefixed_uri().to_string(),
                    },
                )?;
                self.writer
                    .add_statement(contributor, &created, &predicates::DESCRIPTION, &literal)?;
            }
            record(lookup, id, created);
        }

        let mut lists = Vec::new();
        for (id, list) in &definitions.lists {
            if !is_pending(validated_ids, id) {
                continue;
            }
            let created = self.writer.create_list(
                contributor,
                &NewList {
                    label: list.label.clone(),
                    elements: Vec::new(),
                },
            )?;
            record(lookup, id, created.clone());
            lists.push((created, &list.elements));
        }
        for (list, elements) in lists {
            let elements = elements
                .iter()
                .map(|element| substitute(lookup, element))
                .collect::<Result<Vec<_>, _>>()?;
            self.writer.update_list(contributor, &list, &elements)?;
        }

        for resource in positional.iter() {
            let created = self.writer.create_resource(
                contributor,
                &NewResource {
                    label: resource.label.clone(),
                    classes: resource.classes.clone(),
                    extraction_method,
                },
            )?;
            if let Some(parent) = parent {
                self.writer
                    .add_statement(contributor, &parent.subject, &parent.predicate, &created)?;
            }
            record(lookup, &resource.placeholder, created);
        }

        for statement in baked_statements.iter() {
            let subject = substitute(lookup, &statement.subject)?;
            let predicate = substitute(lookup, &statement.predicate)?;
            let object = substitute(lookup, &statement.object)?;

            let has_placeholder = [&statement.subject, &statement.predicate, &statement.object]
                .into_iter()
                .any(|component| Placeholder::is_placeholder_syntax(component));
            if !has_placeholder
                && self
                    .statements
                    .find_by_subject_predicate_object(&subject, &predicate, &object)?
                    .is_some()
            {
                tracing::debug!(%statement, "statement exists; skipping");
                continue;
            }
            let id = self
                .writer
                .add_statement(contributor, &subject, &predicate, &object)?;
            tracing::debug!(%statement, statement_id = %id, "created statement");
        }

        tracing::info!(created = lookup.len(), "subgraph materialized");
        Ok(())
    }
}

impl std::fmt::Debug for SubgraphCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubgraphCreator").finish_non_exhaustive()
    }
}

fn is_pending(cache: &ResolutionCache, id: &str) -> bool {
    matches!(cache.get(id), Some(Resolution::Placeholder(_)))
}

fn record(lookup: &mut IndexMap<String, ThingId>, placeholder: &str, id: ThingId) {
    tracing::debug!(placeholder, %id, "created thing");
    lookup.insert(placeholder.to_string(), id);
}

/// Replace a placeholder by its created id, or parse a store id
pub(crate) fn substitute(
    lookup: &IndexMap<String, ThingId>,
    raw: &str,
) -> Result<ThingId, ContentTypeError> {
    if Placeholder::is_placeholder_syntax(raw) {
        lookup
            .get(raw)
            .cloned()
            .ok_or_else(|| ContentTypeError::PlaceholderNotCreated(raw.to_string()))
    } else {
        Ok(ThingId::parse(raw).map_err(thicket_symbol::SymbolError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BakedStatement, PositionalResource};
    use mockall::predicate::eq;
    use std::collections::BTreeSet;
    use thicket_graph::mocks::{MockGraphWriter, MockStatementRepository};
    use thicket_graph::{classes, Resource, Statement, StatementId, Thing};
    use thicket_symbol::{ListDefinition, LiteralDefinition, PredicateDefinition, ThingDefinitions};

    fn existing(id: &str) -> Resolution {
        Resolution::Existing(Thing::Resource(Resource {
            id: ThingId::new(id),
            label: id.to_string(),
            classes: BTreeSet::new(),
        }))
    }

    fn creator(writer: MockGraphWriter, statements: MockStatementRepository) -> SubgraphCreator {
        SubgraphCreator::new(Arc::new(writer), Arc::new(statements))
    }

    #[test]
    fn existing_triple_is_not_created_twice() {
        let mut writer = MockGraphWriter::new();
        writer.expect_add_statement().never();
        let mut statements = MockStatementRepository::new();
        statements
            .expect_find_by_subject_predicate_object()
            .times(1)
            .returning(|s, p, o| {
                Ok(Some(Statement {
                    id: StatementId::new("S1"),
                    subject: s.clone(),
                    predicate: p.clone(),
                    object: Thing::Resource(Resource {
                        id: o.clone(),
                        label: "o".into(),
                        classes: BTreeSet::new(),
                    }),
                }))
            });

        let mut state = SubgraphState::default();
        state
            .baked_statements
            .insert(BakedStatement::new("R1", "P1", "R2"));

        creator(writer, statements)
            .create(ContributorId::UNKNOWN, ExtractionMethod::Unknown, &mut state, None)
            .unwrap();
    }

    #[test]
    fn placeholder_statements_skip_the_existence_check() {
        let mut writer = MockGraphWriter::new();
        writer
            .expect_create_literal()
            .times(1)
            .returning(|_, _| Ok(ThingId::new("L1")));
        writer
            .expect_add_statement()
            .with(
                eq(ContributorId::UNKNOWN),
                eq(ThingId::new("R1")),
                eq(ThingId::new("P1")),
                eq(ThingId::new("L1")),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(StatementId::new("S1")));
        let mut statements = MockStatementRepository::new();
        statements.expect_find_by_subject_predicate_object().never();

        let mut state = SubgraphState {
            definitions: ThingDefinitions::new().with_literal(
                "#l",
                LiteralDefinition {
                    label: "100".into(),
                    datatype: "xsd:integer".into(),
                },
            ),
            ..SubgraphState::default()
        };
        state
            .validated_ids
            .record("#l", Resolution::Placeholder("#l".into()));
        state
            .baked_statements
            .insert(BakedStatement::new("R1", "P1", "#l"));

        creator(writer, statements)
            .create(ContributorId::UNKNOWN, ExtractionMethod::Unknown, &mut state, None)
            .unwrap();

        assert_eq!(state.lookup["#l"], ThingId::new("L1"));
    }

    #[test]
    fn definitions_resolved_to_existing_things_are_not_created() {
        let mut writer = MockGraphWriter::new();
        writer.expect_create_literal().never();
        let statements = MockStatementRepository::new();

        let mut state = SubgraphState {
            definitions: ThingDefinitions::new()
                .with_literal(
                    "#unused",
                    LiteralDefinition {
                        label: "x".into(),
                        datatype: "xsd:string".into(),
                    },
                )
                .with_literal(
                    "#shadowed",
                    LiteralDefinition {
                        label: "y".into(),
                        datatype: "xsd:string".into(),
                    },
                ),
            ..SubgraphState::default()
        };
        state.validated_ids.record("#shadowed", existing("L9"));

        creator(writer, statements)
            .create(ContributorId::UNKNOWN, ExtractionMethod::Unknown, &mut state, None)
            .unwrap();

        assert!(state.lookup.is_empty());
    }

    #[test]
    fn predicate_description_is_linked() {
        let mut writer = MockGraphWriter::new();
        writer
            .expect_create_predicate()
            .times(1)
            .returning(|_, _| Ok(ThingId::new("P7")));
        writer
            .expect_create_literal()
            .withf(|_, literal| literal.label == "how much" && literal.datatype == "xsd:string")
            .times(1)
            .returning(|_, _| Ok(ThingId::new("L7")));
        writer
            .expect_add_statement()
            .with(
                eq(ContributorId::UNKNOWN),
                eq(ThingId::new("P7")),
                eq(predicates::DESCRIPTION),
                eq(ThingId::new("L7")),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(StatementId::new("S1")));
        let statements = MockStatementRepository::new();

        let mut state = SubgraphState {
            definitions: ThingDefinitions::new().with_predicate(
                "#p",
                PredicateDefinition {
                    label: "amount".into(),
                    description: Some("how much".into()),
                },
            ),
            ..SubgraphState::default()
        };
        state
            .validated_ids
            .record("#p", Resolution::Placeholder("#p".into()));

        creator(writer, statements)
            .create(ContributorId::UNKNOWN, ExtractionMethod::Unknown, &mut state, None)
            .unwrap();

        assert_eq!(state.lookup["#p"], ThingId::new("P7"));
    }

    #[test]
    fn lists_are_created_empty_then_filled() {
        let mut sequence = mockall::Sequence::new();
        let mut writer = MockGraphWriter::new();
        writer
            .expect_create_list()
            .withf(|_, list| list.label == "a" && list.elements.is_empty())
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(ThingId::new("R10")));
        writer
            .expect_create_list()
            .withf(|_, list| list.label == "b" && list.elements.is_empty())
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(ThingId::new("R11")));
        writer
            .expect_update_list()
            .withf(|_, list, elements| list.as_str() == "R10" && elements == [ThingId::new("R11")])
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _, _| Ok(()));
        writer
            .expect_update_list()
            .withf(|_, list, elements| list.as_str() == "R11" && elements == [ThingId::new("R10")])
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _, _| Ok(()));
        let statements = MockStatementRepository::new();

        let mut state = SubgraphState {
            definitions: ThingDefinitions::new()
                .with_list(
                    "#a",
                    ListDefinition {
                        label: "a".into(),
                        elements: vec!["#b".into()],
                    },
                )
                .with_list(
                    "#b",
                    ListDefinition {
                        label: "b".into(),
                        elements: vec!["#a".into()],
                    },
                ),
            ..SubgraphState::default()
        };
        for id in ["#a", "#b"] {
            state
                .validated_ids
                .record(id, Resolution::Placeholder(id.into()));
        }

        creator(writer, statements)
            .create(ContributorId::UNKNOWN, ExtractionMethod::Unknown, &mut state, None)
            .unwrap();
    }

    #[test]
    fn positional_resources_are_linked_to_parent() {
        let mut writer = MockGraphWriter::new();
        writer
            .expect_create_resource()
            .withf(|_, resource| resource.classes.contains(&classes::CONTRIBUTION))
            .times(1)
            .returning(|_, _| Ok(ThingId::new("R5")));
        writer
            .expect_add_statement()
            .with(
                eq(ContributorId::UNKNOWN),
                eq(ThingId::new("R1")),
                eq(predicates::HAS_CONTRIBUTION),
                eq(ThingId::new("R5")),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(StatementId::new("S1")));
        let statements = MockStatementRepository::new();

        let mut state = SubgraphState::default();
        state.positional.push(PositionalResource {
            placeholder: "^0".into(),
            label: "Contribution 1".into(),
            classes: BTreeSet::from([classes::CONTRIBUTION]),
        });
        let parent = ParentLink {
            subject: ThingId::new("R1"),
            predicate: predicates::HAS_CONTRIBUTION,
        };

        creator(writer, statements)
            .create(
                ContributorId::UNKNOWN,
                ExtractionMethod::Unknown,
                &mut state,
                Some(&parent),
            )
            .unwrap();

        assert_eq!(state.lookup["^0"], ThingId::new("R5"));
    }

    #[test]
    fn unresolved_placeholder_in_statement_fails() {
        let writer = MockGraphWriter::new();
        let statements = MockStatementRepository::new();
        let mut state = SubgraphState::default();
        state
            .baked_statements
            .insert(BakedStatement::new("^0", "P1", "R1"));

        let err = creator(writer, statements)
            .create(ContributorId::UNKNOWN, ExtractionMethod::Unknown, &mut state, None)
            .unwrap_err();

        assert_eq!(err, ContentTypeError::PlaceholderNotCreated("^0".into()));
    }
}

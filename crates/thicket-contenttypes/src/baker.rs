//! Statement baking
//!
//! Nested statement definitions are flattened into [`BakedStatement`]s
//! with an explicit worklist, so input nesting never grows the native
//! stack. Nesting depth is bounded by configuration.

use crate::commands::{ContributionDefinition, StatementDefinitions};
use crate::error::ContentTypeError;
use crate::state::{BakedStatement, SubgraphState};
use std::collections::VecDeque;
use thicket_graph::{Thing, ThingRepository};
use thicket_symbol::{
    IdentifierResolver, Placeholder, PlaceholderSet, Resolution, ResolutionCache,
    ThingDefinitions,
};

/// Flattens statement definitions into triples
#[derive(Debug, Clone, Copy)]
pub struct StatementBaker<'a> {
    resolver: IdentifierResolver<'a>,
    max_depth: usize,
}

impl<'a> StatementBaker<'a> {
    /// Create baker; `max_depth` counts the top level as 1
    #[inline]
    #[must_use]
    pub fn new(things: &'a dyn ThingRepository, max_depth: usize) -> Self {
        Self {
            resolver: IdentifierResolver::new(things),
            max_depth,
        }
    }

    /// Bake the statements of every contribution with subject `^i`
    ///
    /// # Errors
    /// `ContentTypeError::EmptyContribution` for a contribution without
    /// statements, indexed when there is more than one contribution
    pub fn bake_contributions(
        &self,
        contributions: &[ContributionDefinition],
        state: &mut SubgraphState,
    ) -> Result<(), ContentTypeError> {
        let indexed = contributions.len() > 1;
        for (index, contribution) in contributions.iter().enumerate() {
            if contribution.statements.is_empty() {
                return Err(ContentTypeError::EmptyContribution {
                    index: indexed.then_some(index),
                });
            }
            let subject = Placeholder::positional(index).to_string();
            self.bake(&subject, &contribution.statements, state)?;
        }
        Ok(())
    }

    /// Bake `statements` with `subject` as the subject of the top level
    ///
    /// Every predicate and object is resolved into the state's cache.
    ///
    /// # Errors
    /// - `ContentTypeError::ThingIsNotAPredicate` for predicates of another kind
    /// - `ContentTypeError::InvalidStatementSubject` for literals with nested statements
    /// - `ContentTypeError::StatementNestingTooDeep` beyond `max_depth`
    /// - resolution errors of the identifier resolver
    pub fn bake(
        &self,
        subject: &str,
        statements: &StatementDefinitions,
        state: &mut SubgraphState,
    ) -> Result<(), ContentTypeError> {
        let SubgraphState {
            definitions,
            placeholders,
            validated_ids,
            baked_statements,
            ..
        } = state;

        let mut pending = VecDeque::from([(subject.to_string(), statements, 1_usize)]);
        while let Some((subject, statements, depth)) = pending.pop_front() {
            for (predicate, objects) in statements {
                self.check_predicate(predicate, definitions, placeholders, validated_ids)?;

                for object in objects {
                    let resolution = self.resolver.resolve(&object.id, placeholders, validated_ids)?;
                    let baked = BakedStatement::new(subject.as_str(), predicate.as_str(), object.id.as_str());
                    tracing::trace!(statement = %baked, "baked statement");
                    baked_statements.insert(baked);

                    let Some(nested) = &object.statements else {
                        continue;
                    };
                    if is_literal(&resolution, definitions) {
                        return Err(ContentTypeError::InvalidStatementSubject(object.id.clone()));
                    }
                    if depth >= self.max_depth {
                        return Err(ContentTypeError::StatementNestingTooDeep {
                            max: self.max_depth,
                        });
                    }
                    pending.push_back((object.id.clone(), nested, depth + 1));
                }
            }
        }
        Ok(())
    }

    fn check_predicate(
        &self,
        predicate: &str,
        definitions: &ThingDefinitions,
        placeholders: &PlaceholderSet,
        cache: &mut ResolutionCache,
    ) -> Result<(), ContentTypeError> {
        match self.resolver.resolve(predicate, placeholders, cache)? {
            Resolution::Placeholder(id) if definitions.predicates.contains_key(&id) => Ok(()),
            Resolution::Existing(Thing::Predicate(_)) => Ok(()),
            _ => Err(ContentTypeError::ThingIsNotAPredicate(predicate.to_string())),
        }
    }
}

fn is_literal(resolution: &Resolution, definitions: &ThingDefinitions) -> bool {
    match resolution {
        Resolution::Placeholder(id) => definitions.literals.contains_key(id),
        Resolution::Existing(thing) => matches!(thing, Thing::Literal(_)),
    }
}

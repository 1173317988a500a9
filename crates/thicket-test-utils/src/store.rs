//! In-memory graph store
//!
//! Implements every store port over a single lock. Ids are minted per
//! kind (`C1`, `R1`, `L1`, `P1`, `S1`), vocabulary things exist from
//! the start.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use thicket_contenttypes::PaperRepository;
use thicket_graph::{
    classes, predicates, Class, ClassRepository, ContributorId, GraphWriter, Literal, NewClass,
    NewList, NewLiteral, NewPredicate, NewResource, Predicate, Resource, Statement, StatementId,
    StatementRepository, StoreError, Thing, ThingId, ThingRepository,
};

const VOCABULARY_CLASSES: [ThingId; 14] = [
    classes::THING,
    classes::RESOURCES,
    classes::CLASSES,
    classes::PREDICATES,
    classes::LITERALS,
    classes::LIST,
    classes::PAPER,
    classes::CONTRIBUTION,
    classes::RESEARCH_FIELD,
    classes::AUTHOR,
    classes::NODE_SHAPE,
    classes::PROPERTY_SHAPE,
    classes::ROSETTA_NODE_SHAPE,
    classes::ROSETTA_STONE_STATEMENT,
];

const VOCABULARY_PREDICATES: [ThingId; 24] = [
    predicates::DESCRIPTION,
    predicates::HAS_LIST_ELEMENT,
    predicates::HAS_CONTRIBUTION,
    predicates::HAS_RESEARCH_FIELD,
    predicates::HAS_AUTHORS,
    predicates::HAS_DOI,
    predicates::HAS_ISBN,
    predicates::HAS_ISSN,
    predicates::HAS_URL,
    predicates::SH_TARGET_CLASS,
    predicates::SH_PROPERTY,
    predicates::SH_PATH,
    predicates::SH_MIN_COUNT,
    predicates::SH_MAX_COUNT,
    predicates::SH_CLASS,
    predicates::SH_DATATYPE,
    predicates::SH_PATTERN,
    predicates::SH_MIN_INCLUSIVE,
    predicates::SH_MAX_INCLUSIVE,
    predicates::SH_ORDER,
    predicates::SH_CLOSED,
    predicates::TEMPLATE_LABEL_FORMAT,
    predicates::PLACEHOLDER,
    predicates::HAS_CONTEXT,
];

#[derive(Default)]
struct Counters {
    classes: u64,
    resources: u64,
    literals: u64,
    predicates: u64,
    statements: u64,
}

#[derive(Default)]
struct Graph {
    things: IndexMap<ThingId, Thing>,
    statements: IndexMap<StatementId, Statement>,
    parents: HashMap<ThingId, ThingId>,
    counters: Counters,
    writes: usize,
}

impl Graph {
    fn mint(&mut self, prefix: char) -> ThingId {
        let counter = match prefix {
            'C' => &mut self.counters.classes,
            'R' => &mut self.counters.resources,
            'L' => &mut self.counters.literals,
            _ => &mut self.counters.predicates,
        };
        *counter += 1;
        ThingId::new(format!("{prefix}{counter}"))
    }

    fn insert(&mut self, thing: Thing) -> ThingId {
        let id = thing.id().clone();
        self.things.insert(id.clone(), thing);
        self.writes += 1;
        id
    }

    fn link(&mut self, subject: &ThingId, predicate: &ThingId, object: &ThingId) -> Result<StatementId, StoreError> {
        if !self.things.contains_key(subject) {
            return Err(StoreError::MissingThing(subject.clone()));
        }
        let object = self
            .things
            .get(object)
            .cloned()
            .ok_or_else(|| StoreError::MissingThing(object.clone()))?;
        self.counters.statements += 1;
        let id = StatementId::new(format!("S{}", self.counters.statements));
        self.statements.insert(
            id.clone(),
            Statement {
                id: id.clone(),
                subject: subject.clone(),
                predicate: predicate.clone(),
                object,
            },
        );
        self.writes += 1;
        Ok(id)
    }
}

/// Graph store kept in memory
pub struct InMemoryGraph {
    graph: RwLock<Graph>,
}

impl Default for InMemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGraph {
    /// Store holding only the vocabulary
    #[must_use]
    pub fn new() -> Self {
        let mut graph = Graph::default();
        for id in VOCABULARY_CLASSES {
            graph.things.insert(
                id.clone(),
                Thing::Class(Class {
                    label: id.to_string(),
                    id,
                    uri: None,
                }),
            );
        }
        for id in VOCABULARY_PREDICATES {
            graph.things.insert(
                id.clone(),
                Thing::Predicate(Predicate {
                    label: id.to_string(),
                    id,
                }),
            );
        }
        Self {
            graph: RwLock::new(graph),
        }
    }

    /// Add a class, optionally below `parent`
    pub fn add_class(&self, label: &str, parent: Option<&ThingId>) -> ThingId {
        let mut graph = self.graph.write();
        let id = graph.mint('C');
        graph.insert(Thing::Class(Class {
            id: id.clone(),
            label: label.to_string(),
            uri: None,
        }));
        if let Some(parent) = parent {
            graph.parents.insert(id.clone(), parent.clone());
        }
        id
    }

    /// Add a predicate
    pub fn add_predicate(&self, label: &str) -> ThingId {
        let mut graph = self.graph.write();
        let id = graph.mint('P');
        graph.insert(Thing::Predicate(Predicate {
            id,
            label: label.to_string(),
        }))
    }

    /// Add a resource
    pub fn add_resource(&self, label: &str, classes: &[ThingId]) -> ThingId {
        let mut graph = self.graph.write();
        let id = graph.mint('R');
        graph.insert(Thing::Resource(Resource {
            id,
            label: label.to_string(),
            classes: classes.iter().cloned().collect(),
        }))
    }

    /// Add a literal
    pub fn add_literal(&self, label: &str, datatype: &str) -> ThingId {
        let mut graph = self.graph.write();
        let id = graph.mint('L');
        graph.insert(Thing::Literal(Literal {
            id,
            label: label.to_string(),
            datatype: datatype.to_string(),
        }))
    }

    /// Add a statement between existing things
    ///
    /// # Panics
    /// If subject or object is missing.
    pub fn add_link(&self, subject: &ThingId, predicate: &ThingId, object: &ThingId) -> StatementId {
        self.graph
            .write()
            .link(subject, predicate, object)
            .unwrap_or_else(|err| panic!("cannot link fixture: {err}"))
    }

    /// Thing by id
    #[must_use]
    pub fn thing(&self, id: &ThingId) -> Option<Thing> {
        self.graph.read().things.get(id).cloned()
    }

    /// Snapshot of all statements in insertion order
    #[must_use]
    pub fn statements(&self) -> Vec<Statement> {
        self.graph.read().statements.values().cloned().collect()
    }

    /// Objects linked from `subject` through `predicate`
    #[must_use]
    pub fn objects(&self, subject: &ThingId, predicate: &ThingId) -> Vec<Thing> {
        self.graph
            .read()
            .statements
            .values()
            .filter(|s| &s.subject == subject && &s.predicate == predicate)
            .map(|s| s.object.clone())
            .collect()
    }

    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.graph.read().statements.len()
    }

    #[must_use]
    pub fn thing_count(&self) -> usize {
        self.graph.read().things.len()
    }

    /// Number of successful writes, fixtures included
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.graph.read().writes
    }
}

impl std::fmt::Debug for InMemoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let graph = self.graph.read();
        f.debug_struct("InMemoryGraph")
            .field("things", &graph.things.len())
            .field("statements", &graph.statements.len())
            .finish()
    }
}

impl ThingRepository for InMemoryGraph {
    fn find_by_thing_id(&self, id: &ThingId) -> Result<Option<Thing>, StoreError> {
        Ok(self.thing(id))
    }

    fn exists_all(&self, ids: &[ThingId]) -> Result<bool, StoreError> {
        let graph = self.graph.read();
        Ok(ids.iter().all(|id| graph.things.contains_key(id)))
    }
}

impl ClassRepository for InMemoryGraph {
    fn find_by_uri(&self, uri: &str) -> Result<Option<Class>, StoreError> {
        Ok(self.graph.read().things.values().find_map(|thing| match thing {
            Thing::Class(class) if class.uri.as_deref() == Some(uri) => Some(class.clone()),
            _ => None,
        }))
    }

    fn is_subclass_of(&self, class: &ThingId, parent: &ThingId) -> Result<bool, StoreError> {
        let graph = self.graph.read();
        let mut seen = BTreeSet::new();
        let mut current = graph.parents.get(class);
        while let Some(next) = current {
            if next == parent {
                return Ok(true);
            }
            if !seen.insert(next) {
                break;
            }
            current = graph.parents.get(next);
        }
        Ok(false)
    }
}

impl StatementRepository for InMemoryGraph {
    fn find_by_subject_predicate_object(
        &self,
        subject: &ThingId,
        predicate: &ThingId,
        object: &ThingId,
    ) -> Result<Option<Statement>, StoreError> {
        Ok(self
            .graph
            .read()
            .statements
            .values()
            .find(|s| &s.subject == subject && &s.predicate == predicate && s.object.id() == object)
            .cloned())
    }

    fn find_all_by_subject(&self, subject: &ThingId) -> Result<Vec<Statement>, StoreError> {
        Ok(self
            .graph
            .read()
            .statements
            .values()
            .filter(|s| &s.subject == subject)
            .cloned()
            .collect())
    }

    fn find_all_by_predicate_and_object(
        &self,
        predicate: &ThingId,
        object: &ThingId,
    ) -> Result<Vec<Statement>, StoreError> {
        Ok(self
            .graph
            .read()
            .statements
            .values()
            .filter(|s| &s.predicate == predicate && s.object.id() == object)
            .cloned()
            .collect())
    }
}

impl GraphWriter for InMemoryGraph {
    fn create_class(&self, _contributor: ContributorId, class: &NewClass) -> Result<ThingId, StoreError> {
        let mut graph = self.graph.write();
        let id = graph.mint('C');
        Ok(graph.insert(Thing::Class(Class {
            id,
            label: class.label.clone(),
            uri: class.uri.clone(),
        })))
    }

    fn create_resource(&self, _contributor: ContributorId, resource: &NewResource) -> Result<ThingId, StoreError> {
        let mut graph = self.graph.write();
        let id = graph.mint('R');
        Ok(graph.insert(Thing::Resource(Resource {
            id,
            label: resource.label.clone(),
            classes: resource.classes.clone(),
        })))
    }

    fn create_literal(&self, _contributor: ContributorId, literal: &NewLiteral) -> Result<ThingId, StoreError> {
        let mut graph = self.graph.write();
        let id = graph.mint('L');
        Ok(graph.insert(Thing::Literal(Literal {
            id,
            label: literal.label.clone(),
            datatype: literal.datatype.clone(),
        })))
    }

    fn create_predicate(&self, _contributor: ContributorId, predicate: &NewPredicate) -> Result<ThingId, StoreError> {
        let mut graph = self.graph.write();
        let id = graph.mint('P');
        Ok(graph.insert(Thing::Predicate(Predicate {
            id,
            label: predicate.label.clone(),
        })))
    }

    fn create_list(&self, contributor: ContributorId, list: &NewList) -> Result<ThingId, StoreError> {
        let id = {
            let mut graph = self.graph.write();
            let id = graph.mint('R');
            graph.insert(Thing::Resource(Resource {
                id,
                label: list.label.clone(),
                classes: BTreeSet::from([classes::LIST]),
            }))
        };
        self.update_list(contributor, &id, &list.elements)?;
        Ok(id)
    }

    fn update_list(&self, _contributor: ContributorId, list: &ThingId, elements: &[ThingId]) -> Result<(), StoreError> {
        let mut graph = self.graph.write();
        match graph.things.get(list) {
            Some(Thing::Resource(resource)) if resource.is_list() => {}
            _ => return Err(StoreError::MissingThing(list.clone())),
        }
        graph
            .statements
            .retain(|_, s| !(&s.subject == list && s.predicate == predicates::HAS_LIST_ELEMENT));
        for element in elements {
            graph.link(list, &predicates::HAS_LIST_ELEMENT, element)?;
        }
        Ok(())
    }

    fn add_statement(
        &self,
        _contributor: ContributorId,
        subject: &ThingId,
        predicate: &ThingId,
        object: &ThingId,
    ) -> Result<StatementId, StoreError> {
        tracing::trace!(%subject, %predicate, %object, "adding statement");
        self.graph.write().link(subject, predicate, object)
    }

    fn delete_statements(&self, ids: &[StatementId]) -> Result<(), StoreError> {
        let mut graph = self.graph.write();
        if let Some(missing) = ids.iter().find(|id| !graph.statements.contains_key(*id)) {
            return Err(StoreError::MissingStatement(missing.clone()));
        }
        for id in ids {
            graph.statements.shift_remove(id);
        }
        graph.writes += 1;
        Ok(())
    }
}

impl PaperRepository for InMemoryGraph {
    fn find_by_title(&self, title: &str) -> Result<Option<ThingId>, StoreError> {
        Ok(self.graph.read().things.values().find_map(|thing| match thing {
            Thing::Resource(resource)
                if resource.classes.contains(&classes::PAPER) && resource.label == title =>
            {
                Some(resource.id.clone())
            }
            _ => None,
        }))
    }

    fn find_by_identifier(&self, predicate: &ThingId, value: &str) -> Result<Option<ThingId>, StoreError> {
        let graph = self.graph.read();
        Ok(graph
            .statements
            .values()
            .filter(|s| &s.predicate == predicate)
            .filter(|s| s.object.as_literal().is_some_and(|literal| literal.label == value))
            .find(|s| {
                graph
                    .things
                    .get(&s.subject)
                    .and_then(Thing::as_resource)
                    .is_some_and(|resource| resource.classes.contains(&classes::PAPER))
            })
            .map(|s| s.subject.clone()))
    }
}

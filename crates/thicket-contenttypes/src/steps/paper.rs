//! Steps of the create paper pipeline

use super::required;
use crate::baker::StatementBaker;
use crate::commands::CreatePaperCommand;
use crate::creator::{ParentLink, SubgraphCreator};
use crate::error::ContentTypeError;
use crate::pipeline::Step;
use crate::ports::PaperRepository;
use crate::state::{PaperState, PositionalResource};
use std::collections::BTreeSet;
use std::sync::Arc;
use thicket_graph::{
    classes, is_valid_label, predicates, GraphWriter, NewList, NewLiteral, NewResource, Thing,
    ThingId, ThingRepository, Xsd,
};
use thicket_symbol::{Placeholder, SymbolError};

/// Title is a valid label and not used by another paper
pub struct TitleValidator {
    papers: Arc<dyn PaperRepository>,
    max_label_length: usize,
}

impl TitleValidator {
    #[must_use]
    pub fn new(papers: Arc<dyn PaperRepository>, max_label_length: usize) -> Self {
        Self {
            papers,
            max_label_length,
        }
    }
}

impl Step<CreatePaperCommand, PaperState> for TitleValidator {
    fn name(&self) -> &'static str {
        "paper-title"
    }

    fn apply(&self, command: &CreatePaperCommand, state: PaperState) -> Result<PaperState, ContentTypeError> {
        if !is_valid_label(&command.title, self.max_label_length) {
            return Err(ContentTypeError::InvalidLabel("title".into()));
        }
        if self.papers.find_by_title(&command.title)?.is_some() {
            return Err(ContentTypeError::paper_with_title(&command.title));
        }
        Ok(state)
    }
}

/// Identifiers are of a known kind and not used by another paper
pub struct IdentifierValidator {
    papers: Arc<dyn PaperRepository>,
}

impl IdentifierValidator {
    #[must_use]
    pub fn new(papers: Arc<dyn PaperRepository>) -> Self {
        Self { papers }
    }
}

impl Step<CreatePaperCommand, PaperState> for IdentifierValidator {
    fn name(&self) -> &'static str {
        "paper-identifiers"
    }

    fn apply(&self, command: &CreatePaperCommand, state: PaperState) -> Result<PaperState, ContentTypeError> {
        for (kind, values) in &command.identifiers {
            let predicate = predicates::for_identifier(kind)
                .ok_or_else(|| ContentTypeError::UnknownIdentifierKind(kind.clone()))?;
            for value in values {
                if self.papers.find_by_identifier(&predicate, value)?.is_some() {
                    return Err(ContentTypeError::paper_with_identifier(value));
                }
            }
        }
        Ok(state)
    }
}

/// Exactly one existing research field
pub struct ResearchFieldValidator {
    things: Arc<dyn ThingRepository>,
}

impl ResearchFieldValidator {
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>) -> Self {
        Self { things }
    }
}

impl Step<CreatePaperCommand, PaperState> for ResearchFieldValidator {
    fn name(&self) -> &'static str {
        "paper-research-field"
    }

    fn apply(&self, command: &CreatePaperCommand, state: PaperState) -> Result<PaperState, ContentTypeError> {
        let [field] = command.research_fields.as_slice() else {
            return Err(ContentTypeError::OnlyOneResearchFieldAllowed(
                command.research_fields.len(),
            ));
        };
        match self.things.find_by_thing_id(field)? {
            Some(Thing::Resource(resource)) if resource.classes.contains(&classes::RESEARCH_FIELD) => {
                Ok(state)
            }
            _ => Err(ContentTypeError::ResearchFieldNotFound(field.clone())),
        }
    }
}

/// Referenced authors exist, new authors have valid names
pub struct AuthorValidator {
    things: Arc<dyn ThingRepository>,
    max_label_length: usize,
}

impl AuthorValidator {
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>, max_label_length: usize) -> Self {
        Self {
            things,
            max_label_length,
        }
    }
}

impl Step<CreatePaperCommand, PaperState> for AuthorValidator {
    fn name(&self) -> &'static str {
        "paper-authors"
    }

    fn apply(&self, command: &CreatePaperCommand, state: PaperState) -> Result<PaperState, ContentTypeError> {
        for author in &command.authors {
            match &author.id {
                Some(id) => {
                    if !matches!(self.things.find_by_thing_id(id)?, Some(Thing::Resource(_))) {
                        return Err(ContentTypeError::AuthorNotFound(id.clone()));
                    }
                }
                None => {
                    if !is_valid_label(&author.name, self.max_label_length) {
                        return Err(ContentTypeError::InvalidLabel("author name".into()));
                    }
                }
            }
        }
        Ok(state)
    }
}

/// Contributions: labels, classes, positions and baked statements
pub struct ContributionValidator {
    things: Arc<dyn ThingRepository>,
    max_label_length: usize,
    max_statement_depth: usize,
}

impl ContributionValidator {
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>, max_label_length: usize, max_statement_depth: usize) -> Self {
        Self {
            things,
            max_label_length,
            max_statement_depth,
        }
    }

    fn check_class(&self, class: &ThingId) -> Result<(), ContentTypeError> {
        match self.things.find_by_thing_id(class)? {
            Some(Thing::Class(_)) => Ok(()),
            Some(_) => Err(SymbolError::ThingIsNotAClass(class.to_string()).into()),
            None => Err(SymbolError::ThingNotFound(class.clone()).into()),
        }
    }
}

impl Step<CreatePaperCommand, PaperState> for ContributionValidator {
    fn name(&self) -> &'static str {
        "paper-contributions"
    }

    fn apply(&self, command: &CreatePaperCommand, mut state: PaperState) -> Result<PaperState, ContentTypeError> {
        let Some(contents) = &command.contents else {
            return Ok(state);
        };

        for (index, contribution) in contents.contributions.iter().enumerate() {
            if !is_valid_label(&contribution.label, self.max_label_length) {
                return Err(ContentTypeError::InvalidLabel(format!("contribution {index}")));
            }
            for class in &contribution.classes {
                self.check_class(class)?;
            }

            let position = Placeholder::positional(index);
            state.subgraph.placeholders.declare(&position);
            let mut resource_classes = BTreeSet::from([classes::CONTRIBUTION]);
            resource_classes.extend(contribution.classes.iter().cloned());
            state.subgraph.positional.push(PositionalResource {
                placeholder: position.to_string(),
                label: contribution.label.clone(),
                classes: resource_classes,
            });
        }

        StatementBaker::new(&*self.things, self.max_statement_depth)
            .bake_contributions(&contents.contributions, &mut state.subgraph)?;
        tracing::debug!(
            contributions = contents.contributions.len(),
            statements = state.subgraph.baked_statements.len(),
            "contributions baked"
        );
        Ok(state)
    }
}

/// Creates the paper resource
pub struct PaperResourceCreator {
    writer: Arc<dyn GraphWriter>,
}

impl PaperResourceCreator {
    #[must_use]
    pub fn new(writer: Arc<dyn GraphWriter>) -> Self {
        Self { writer }
    }
}

impl Step<CreatePaperCommand, PaperState> for PaperResourceCreator {
    fn name(&self) -> &'static str {
        "paper-resource-creator"
    }

    fn apply(&self, command: &CreatePaperCommand, mut state: PaperState) -> Result<PaperState, ContentTypeError> {
        let id = self.writer.create_resource(
            command.contributor_id,
            &NewResource {
                label: command.title.clone(),
                classes: BTreeSet::from([classes::PAPER]),
                extraction_method: command.extraction_method,
            },
        )?;
        tracing::info!(paper = %id, "created paper");
        state.paper_id = Some(id);
        Ok(state)
    }
}

/// Links the research field
pub struct ResearchFieldCreator {
    writer: Arc<dyn GraphWriter>,
}

impl ResearchFieldCreator {
    #[must_use]
    pub fn new(writer: Arc<dyn GraphWriter>) -> Self {
        Self { writer }
    }
}

impl Step<CreatePaperCommand, PaperState> for ResearchFieldCreator {
    fn name(&self) -> &'static str {
        "paper-research-field-creator"
    }

    fn apply(&self, command: &CreatePaperCommand, state: PaperState) -> Result<PaperState, ContentTypeError> {
        let paper = required(&state.paper_id, self.name(), "paper id")?;
        for field in &command.research_fields {
            self.writer.add_statement(
                command.contributor_id,
                paper,
                &predicates::HAS_RESEARCH_FIELD,
                field,
            )?;
        }
        Ok(state)
    }
}

/// Creates one literal per identifier value
pub struct IdentifierCreator {
    writer: Arc<dyn GraphWriter>,
}

impl IdentifierCreator {
    #[must_use]
    pub fn new(writer: Arc<dyn GraphWriter>) -> Self {
        Self { writer }
    }
}

impl Step<CreatePaperCommand, PaperState> for IdentifierCreator {
    fn name(&self) -> &'static str {
        "paper-identifier-creator"
    }

    fn apply(&self, command: &CreatePaperCommand, state: PaperState) -> Result<PaperState, ContentTypeError> {
        let paper = required(&state.paper_id, self.name(), "paper id")?;
        for (kind, values) in &command.identifiers {
            let predicate = predicates::for_identifier(kind)
                .ok_or_else(|| ContentTypeError::UnknownIdentifierKind(kind.clone()))?;
            for value in values {
                let literal = self.writer.create_literal(
                    command.contributor_id,
                    &NewLiteral {
                        label: value.clone(),
                        datatype: Xsd::String.prefixed_uri().to_string(),
                    },
                )?;
                self.writer
                    .add_statement(command.contributor_id, paper, &predicate, &literal)?;
            }
        }
        Ok(state)
    }
}

/// Creates missing authors and the ordered author list
pub struct AuthorCreator {
    writer: Arc<dyn GraphWriter>,
}

impl AuthorCreator {
    #[must_use]
    pub fn new(writer: Arc<dyn GraphWriter>) -> Self {
        Self { writer }
    }
}

impl Step<CreatePaperCommand, PaperState> for AuthorCreator {
    fn name(&self) -> &'static str {
        "paper-author-creator"
    }

    fn apply(&self, command: &CreatePaperCommand, state: PaperState) -> Result<PaperState, ContentTypeError> {
        if command.authors.is_empty() {
            return Ok(state);
        }
        let paper = required(&state.paper_id, self.name(), "paper id")?;

        let mut authors = Vec::with_capacity(command.authors.len());
        for author in &command.authors {
            let id = match &author.id {
                Some(id) => id.clone(),
                None => self.writer.create_resource(
                    command.contributor_id,
                    &NewResource {
                        label: author.name.clone(),
                        classes: BTreeSet::from([classes::AUTHOR]),
                        extraction_method: command.extraction_method,
                    },
                )?,
            };
            authors.push(id);
        }

        let list = self.writer.create_list(
            command.contributor_id,
            &NewList {
                label: "authors list".into(),
                elements: authors,
            },
        )?;
        self.writer
            .add_statement(command.contributor_id, paper, &predicates::HAS_AUTHORS, &list)?;
        Ok(state)
    }
}

/// Materializes definitions and contributions below the paper
pub struct ContentsCreator {
    creator: SubgraphCreator,
}

impl ContentsCreator {
    #[must_use]
    pub fn new(creator: SubgraphCreator) -> Self {
        Self { creator }
    }
}

impl Step<CreatePaperCommand, PaperState> for ContentsCreator {
    fn name(&self) -> &'static str {
        "paper-contents-creator"
    }

    fn apply(&self, command: &CreatePaperCommand, mut state: PaperState) -> Result<PaperState, ContentTypeError> {
        if command.contents.is_none() {
            return Ok(state);
        }
        let parent = ParentLink {
            subject: required(&state.paper_id, self.name(), "paper id")?.clone(),
            predicate: predicates::HAS_CONTRIBUTION,
        };
        self.creator.create(
            command.contributor_id,
            command.extraction_method,
            &mut state.subgraph,
            Some(&parent),
        )?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Author, ContributionDefinition, PaperContents, StatementDefinitions, StatementObject};
    use crate::ports::MockPaperRepository;
    use std::collections::BTreeMap;
    use thicket_graph::mocks::MockThingRepository;
    use thicket_graph::{Class, ContributorId, ExtractionMethod, Resource};

    fn command() -> CreatePaperCommand {
        CreatePaperCommand {
            contributor_id: ContributorId::UNKNOWN,
            title: "Graph content at scale".into(),
            research_fields: vec![ThingId::new("R11")],
            identifiers: BTreeMap::new(),
            authors: Vec::new(),
            contents: None,
            extraction_method: ExtractionMethod::Manual,
        }
    }

    fn resource(id: &ThingId, classes: &[ThingId]) -> Thing {
        Thing::Resource(Resource {
            id: id.clone(),
            label: id.to_string(),
            classes: classes.iter().cloned().collect(),
        })
    }

    #[test]
    fn existing_title_is_rejected() {
        let mut papers = MockPaperRepository::new();
        papers
            .expect_find_by_title()
            .returning(|_| Ok(Some(ThingId::new("R1"))));

        let err = TitleValidator::new(Arc::new(papers), 100)
            .apply(&command(), PaperState::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::paper_with_title("Graph content at scale"));
    }

    #[test]
    fn existing_identifier_is_rejected() {
        let mut papers = MockPaperRepository::new();
        papers
            .expect_find_by_identifier()
            .returning(|predicate, value| {
                Ok((predicate == &predicates::HAS_DOI && value == "10.1/taken").then(|| ThingId::new("R1")))
            });
        let mut command = command();
        command
            .identifiers
            .insert("doi".into(), vec!["10.1/free".into(), "10.1/taken".into()]);

        let err = IdentifierValidator::new(Arc::new(papers))
            .apply(&command, PaperState::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::paper_with_identifier("10.1/taken"));
    }

    #[test]
    fn unknown_identifier_kind_is_rejected() {
        let papers = MockPaperRepository::new();
        let mut command = command();
        command.identifiers.insert("arxiv".into(), vec!["1234".into()]);

        let err = IdentifierValidator::new(Arc::new(papers))
            .apply(&command, PaperState::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::UnknownIdentifierKind("arxiv".into()));
    }

    #[test]
    fn exactly_one_research_field() {
        let mut things = MockThingRepository::new();
        things.expect_find_by_thing_id().never();
        let mut command = command();
        command.research_fields.push(ThingId::new("R12"));

        let err = ResearchFieldValidator::new(Arc::new(things))
            .apply(&command, PaperState::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::OnlyOneResearchFieldAllowed(2));
    }

    #[test]
    fn research_field_must_have_field_class() {
        let mut things = MockThingRepository::new();
        things
            .expect_find_by_thing_id()
            .returning(|id| Ok(Some(resource(id, &[classes::PAPER]))));

        let err = ResearchFieldValidator::new(Arc::new(things))
            .apply(&command(), PaperState::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::ResearchFieldNotFound(ThingId::new("R11")));
    }

    #[test]
    fn missing_author_is_rejected() {
        let mut things = MockThingRepository::new();
        things.expect_find_by_thing_id().returning(|_| Ok(None));
        let mut command = command();
        command.authors.push(Author {
            id: Some(ThingId::new("R404")),
            name: "Ghost".into(),
        });

        let err = AuthorValidator::new(Arc::new(things), 100)
            .apply(&command, PaperState::default())
            .unwrap_err();

        assert_eq!(err, ContentTypeError::AuthorNotFound(ThingId::new("R404")));
    }

    #[test]
    fn contributions_declare_positions() {
        let mut things = MockThingRepository::new();
        things.expect_find_by_thing_id().returning(|id| {
            Ok(Some(match id.as_str() {
                "C5" => Thing::Class(Class {
                    id: id.clone(),
                    label: "Problem".into(),
                    uri: None,
                }),
                "P1" => Thing::Predicate(thicket_graph::Predicate {
                    id: id.clone(),
                    label: "solves".into(),
                }),
                _ => resource(id, &[]),
            }))
        });
        let mut statements = StatementDefinitions::new();
        statements.insert("P1".into(), vec![StatementObject::new("R2")]);
        let mut command = command();
        command.contents = Some(PaperContents {
            definitions: thicket_symbol::ThingDefinitions::new(),
            contributions: vec![ContributionDefinition {
                label: "Contribution 1".into(),
                classes: BTreeSet::from([ThingId::new("C5")]),
                statements,
            }],
        });

        let state = ContributionValidator::new(Arc::new(things), 100, 8)
            .apply(&command, PaperState::default())
            .unwrap();

        assert!(state.subgraph.placeholders.contains("^0"));
        assert_eq!(state.subgraph.positional.len(), 1);
        assert_eq!(
            state.subgraph.positional[0].classes,
            BTreeSet::from([classes::CONTRIBUTION, ThingId::new("C5")])
        );
        assert_eq!(state.subgraph.baked_statements.len(), 1);
    }

    #[test]
    fn creators_require_the_paper_id() {
        let writer = thicket_graph::mocks::MockGraphWriter::new();

        let err = ResearchFieldCreator::new(Arc::new(writer))
            .apply(&command(), PaperState::default())
            .unwrap_err();

        assert!(matches!(err, ContentTypeError::MissingState { field: "paper id", .. }));
    }
}

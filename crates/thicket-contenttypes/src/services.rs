//! Content type services
//!
//! Each service owns the pipeline of one command and exposes a single
//! entry point returning the id of the created or updated root.
//!
//! Creation is not atomic. When a creator step fails after earlier
//! writes, those writes stay in the store; wrap the store in a
//! transaction if that matters.

use crate::commands::{
    CreatePaperCommand, CreateRosettaStoneStatementCommand, CreateTemplateCommand,
    UpdateTemplateInstanceCommand,
};
use crate::config::PipelineConfig;
use crate::creator::SubgraphCreator;
use crate::error::ContentTypeError;
use crate::pipeline::Pipeline;
use crate::ports::{GraphPorts, PaperRepository};
use crate::state::{PaperState, RosettaStoneStatementState, TemplateInstanceState, TemplateState};
use crate::steps::{instance, paper, rosetta, template, DefinitionStep, PlaceholderStep};
use std::sync::Arc;
use thicket_graph::ThingId;
use thicket_template::TemplateRepository;

fn creator(ports: &GraphPorts) -> SubgraphCreator {
    SubgraphCreator::new(Arc::clone(&ports.writer), Arc::clone(&ports.statements))
}

fn definitions(ports: &GraphPorts, config: &PipelineConfig) -> DefinitionStep {
    DefinitionStep::new(
        Arc::clone(&ports.things),
        Arc::clone(&ports.classes),
        config.definition_rules(),
    )
}

fn created(id: Option<ThingId>, step: &'static str, field: &'static str) -> Result<ThingId, ContentTypeError> {
    id.ok_or(ContentTypeError::MissingState { step, field })
}

/// Creates papers with their contributions
pub struct PaperService {
    pipeline: Pipeline<CreatePaperCommand, PaperState>,
}

impl PaperService {
    /// Wire the paper pipeline
    #[must_use]
    pub fn new(ports: &GraphPorts, papers: Arc<dyn PaperRepository>, config: &PipelineConfig) -> Self {
        let things = &ports.things;
        let writer = &ports.writer;
        let pipeline = Pipeline::builder("create-paper")
            .step(paper::TitleValidator::new(Arc::clone(&papers), config.max_label_length))
            .step(paper::IdentifierValidator::new(papers))
            .step(paper::ResearchFieldValidator::new(Arc::clone(things)))
            .step(paper::AuthorValidator::new(Arc::clone(things), config.max_label_length))
            .step(PlaceholderStep)
            .step(definitions(ports, config))
            .step(paper::ContributionValidator::new(
                Arc::clone(things),
                config.max_label_length,
                config.max_statement_depth,
            ))
            .step(paper::PaperResourceCreator::new(Arc::clone(writer)))
            .step(paper::ResearchFieldCreator::new(Arc::clone(writer)))
            .step(paper::IdentifierCreator::new(Arc::clone(writer)))
            .step(paper::AuthorCreator::new(Arc::clone(writer)))
            .step(paper::ContentsCreator::new(creator(ports)))
            .build();
        Self { pipeline }
    }

    /// Validate and create a paper
    ///
    /// # Errors
    /// The first validation or store error; see [`ContentTypeError`].
    pub fn create(&self, command: &CreatePaperCommand) -> Result<ThingId, ContentTypeError> {
        tracing::info!(title = %command.title, contributor = %command.contributor_id, "creating paper");
        let state = self.pipeline.execute(command, PaperState::default())?;
        created(state.paper_id, "paper-resource-creator", "paper id")
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<CreatePaperCommand, PaperState> {
        &self.pipeline
    }
}

/// Creates rosetta-stone statements
pub struct RosettaStoneStatementService {
    pipeline: Pipeline<CreateRosettaStoneStatementCommand, RosettaStoneStatementState>,
}

impl RosettaStoneStatementService {
    #[must_use]
    pub fn new(ports: &GraphPorts, templates: Arc<dyn TemplateRepository>, config: &PipelineConfig) -> Self {
        let pipeline = Pipeline::builder("create-rosetta-stone-statement")
            .step(rosetta::RosettaTemplateValidator::new(templates))
            .step(rosetta::ContextValidator::new(Arc::clone(&ports.things)))
            .step(PlaceholderStep)
            .step(definitions(ports, config))
            .step(rosetta::PositionValidator::new(
                Arc::clone(&ports.things),
                Arc::clone(&ports.classes),
            ))
            .step(rosetta::RosettaStatementCreator::new(creator(ports), Arc::clone(&ports.writer)))
            .build();
        Self { pipeline }
    }

    /// Validate and create a rosetta-stone statement
    ///
    /// # Errors
    /// The first validation or store error; see [`ContentTypeError`].
    pub fn create(&self, command: &CreateRosettaStoneStatementCommand) -> Result<ThingId, ContentTypeError> {
        tracing::info!(template = %command.template_id, contributor = %command.contributor_id, "creating rosetta stone statement");
        let state = self
            .pipeline
            .execute(command, RosettaStoneStatementState::default())?;
        created(state.statement_id, "rosetta-statement-creator", "statement id")
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<CreateRosettaStoneStatementCommand, RosettaStoneStatementState> {
        &self.pipeline
    }
}

/// Updates the properties of template instances
pub struct TemplateInstanceService {
    pipeline: Pipeline<UpdateTemplateInstanceCommand, TemplateInstanceState>,
}

impl TemplateInstanceService {
    #[must_use]
    pub fn new(ports: &GraphPorts, templates: Arc<dyn TemplateRepository>, config: &PipelineConfig) -> Self {
        let pipeline = Pipeline::builder("update-template-instance")
            .step(instance::SubjectValidator::new(Arc::clone(&ports.things)))
            .step(instance::InstanceTemplateValidator::new(
                templates,
                Arc::clone(&ports.classes),
            ))
            .step(PlaceholderStep)
            .step(definitions(ports, config))
            .step(instance::PropertyValueValidator::new(
                Arc::clone(&ports.things),
                Arc::clone(&ports.classes),
                Arc::clone(&ports.statements),
            ))
            .step(instance::TemplateInstanceCreator::new(creator(ports), Arc::clone(&ports.writer)))
            .build();
        Self { pipeline }
    }

    /// Validate and apply a template instance update
    ///
    /// Returns the subject id.
    ///
    /// # Errors
    /// The first validation or store error; see [`ContentTypeError`].
    pub fn update(&self, command: &UpdateTemplateInstanceCommand) -> Result<ThingId, ContentTypeError> {
        tracing::info!(subject = %command.subject, template = %command.template_id, "updating template instance");
        self.pipeline
            .execute(command, TemplateInstanceState::default())?;
        Ok(command.subject.clone())
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<UpdateTemplateInstanceCommand, TemplateInstanceState> {
        &self.pipeline
    }
}

/// Creates templates
pub struct TemplateService {
    pipeline: Pipeline<CreateTemplateCommand, TemplateState>,
}

impl TemplateService {
    #[must_use]
    pub fn new(ports: &GraphPorts, templates: Arc<dyn TemplateRepository>, config: &PipelineConfig) -> Self {
        let pipeline = Pipeline::builder("create-template")
            .step(template::TemplateLabelValidator::new(config.max_label_length))
            .step(template::TargetClassValidator::new(Arc::clone(&ports.things), templates))
            .step(template::TemplatePropertiesValidator::new(
                Arc::clone(&ports.things),
                config.max_label_length,
            ))
            .step(template::NodeShapeCreator::new(Arc::clone(&ports.writer)))
            .step(template::TemplateMetadataCreator::new(Arc::clone(&ports.writer)))
            .step(template::PropertyShapeCreator::new(Arc::clone(&ports.writer)))
            .build();
        Self { pipeline }
    }

    /// Validate and create a template
    ///
    /// # Errors
    /// The first validation or store error; see [`ContentTypeError`].
    pub fn create(&self, command: &CreateTemplateCommand) -> Result<ThingId, ContentTypeError> {
        tracing::info!(label = %command.label, target_class = %command.target_class, "creating template");
        let state = self.pipeline.execute(command, TemplateState::default())?;
        created(state.template_id, "template-node-shape-creator", "template id")
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<CreateTemplateCommand, TemplateState> {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockPaperRepository;
    use crate::testing::MockTemplates;
    use thicket_graph::mocks::{
        MockClassRepository, MockGraphWriter, MockStatementRepository, MockThingRepository,
    };

    fn ports() -> GraphPorts {
        GraphPorts::new(
            Arc::new(MockThingRepository::new()),
            Arc::new(MockClassRepository::new()),
            Arc::new(MockStatementRepository::new()),
            Arc::new(MockGraphWriter::new()),
        )
    }

    #[test]
    fn paper_pipeline_validates_before_creating() {
        let service = PaperService::new(&ports(), Arc::new(MockPaperRepository::new()), &PipelineConfig::default());

        let names = service.pipeline().step_names();

        let first_creator = names.iter().position(|name| name.ends_with("creator")).unwrap();
        assert!(names[..first_creator].iter().all(|name| !name.ends_with("creator")));
        assert_eq!(names[first_creator], "paper-resource-creator");
        assert!(names.contains(&"placeholders"));
        assert!(names.contains(&"definitions"));
    }

    #[test]
    fn rosetta_pipeline_checks_placeholders_before_positions() {
        let service = RosettaStoneStatementService::new(
            &ports(),
            Arc::new(MockTemplates::new()),
            &PipelineConfig::default(),
        );

        assert_eq!(
            service.pipeline().step_names(),
            vec![
                "rosetta-template",
                "rosetta-context",
                "placeholders",
                "definitions",
                "rosetta-positions",
                "rosetta-statement-creator",
            ]
        );
    }

    #[test]
    fn every_service_has_a_named_pipeline() {
        let ports = ports();
        let config = PipelineConfig::default();

        assert_eq!(
            TemplateInstanceService::new(&ports, Arc::new(MockTemplates::new()), &config)
                .pipeline()
                .name(),
            "update-template-instance"
        );
        assert_eq!(
            TemplateService::new(&ports, Arc::new(MockTemplates::new()), &config)
                .pipeline()
                .len(),
            6
        );
    }
}

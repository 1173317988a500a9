//! Store collaborators of the services

use std::sync::Arc;
use thicket_graph::{
    ClassRepository, GraphWriter, StatementRepository, StoreError, ThingId, ThingRepository,
};
use thicket_template::{GraphTemplateRepository, TemplateRepository};

/// Paper lookup
#[cfg_attr(test, mockall::automock)]
pub trait PaperRepository: Send + Sync {
    /// Find a paper by exact title
    fn find_by_title(&self, title: &str) -> Result<Option<ThingId>, StoreError>;

    /// Find a paper linked to an identifier literal through `predicate`
    fn find_by_identifier(
        &self,
        predicate: &ThingId,
        value: &str,
    ) -> Result<Option<ThingId>, StoreError>;
}

/// Shared graph ports handed to every service
#[derive(Clone)]
pub struct GraphPorts {
    pub things: Arc<dyn ThingRepository>,
    pub classes: Arc<dyn ClassRepository>,
    pub statements: Arc<dyn StatementRepository>,
    pub writer: Arc<dyn GraphWriter>,
}

impl GraphPorts {
    /// Bundle individual ports
    #[inline]
    #[must_use]
    pub fn new(
        things: Arc<dyn ThingRepository>,
        classes: Arc<dyn ClassRepository>,
        statements: Arc<dyn StatementRepository>,
        writer: Arc<dyn GraphWriter>,
    ) -> Self {
        Self {
            things,
            classes,
            statements,
            writer,
        }
    }

    /// Use one store for every port
    #[must_use]
    pub fn from_store<T>(store: Arc<T>) -> Self
    where
        T: ThingRepository + ClassRepository + StatementRepository + GraphWriter + 'static,
    {
        Self {
            things: store.clone(),
            classes: store.clone(),
            statements: store.clone(),
            writer: store,
        }
    }

    /// Template repository reading shapes through these ports
    #[must_use]
    pub fn template_repository(&self) -> Arc<dyn TemplateRepository> {
        Arc::new(GraphTemplateRepository::new(
            Arc::clone(&self.things),
            Arc::clone(&self.statements),
        ))
    }
}

impl std::fmt::Debug for GraphPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphPorts").finish_non_exhaustive()
    }
}

//! Thicket Content Types
//!
//! Validates content commands and materializes them as subgraphs:
//! - Papers with research fields, identifiers, authors and contributions
//! - Templates written as node and property shapes
//! - Rosetta-stone statements filling the input positions of a template
//! - Template instance updates applied as a statement diff
//!
//! # Core Concepts
//!
//! - [`Pipeline`] / [`Step`]: Ordered validators and creators folded over a state value
//! - [`SubgraphState`]: Definitions, resolutions and baked statements of one command
//! - [`StatementBaker`]: Flattens nested statement trees into triples
//! - [`SubgraphCreator`]: Writes placeholders and baked statements to the store
//! - Services: one entry point per command
//!
//! # Example
//!
//! ```rust,ignore
//! use thicket_contenttypes::prelude::*;
//!
//! let ports = GraphPorts::from_store(store);
//! let service = RosettaStoneStatementService::new(&ports, ports.template_repository(), &PipelineConfig::default());
//! let statement = service.create(&command)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod baker;
pub mod commands;
pub mod config;
pub mod creator;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod services;
pub mod state;
pub mod steps;

#[cfg(test)]
mod testing;

// Re-exports
pub use baker::StatementBaker;
pub use commands::{
    Author, ContributionDefinition, CreatePaperCommand, CreateRosettaStoneStatementCommand,
    CreateTemplateCommand, PaperContents, StatementDefinitions, StatementObject,
    TemplatePropertyDefinition, ThingsCommand, UpdateTemplateInstanceCommand,
};
pub use config::{PipelineConfig, DEFAULT_MAX_STATEMENT_DEPTH};
pub use creator::{ParentLink, SubgraphCreator};
pub use error::{ConfigError, ContentTypeError, ErrorKind, PaperConflict};
pub use pipeline::{Pipeline, PipelineBuilder, Step};
pub use ports::{GraphPorts, PaperRepository};
pub use services::{
    PaperService, RosettaStoneStatementService, TemplateInstanceService, TemplateService,
};
pub use state::{
    BakedStatement, HasSubgraph, PaperState, PositionalResource, RosettaStoneStatementState,
    SubgraphState, TemplateInstanceState, TemplateState,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for issuing content commands
    pub use crate::{
        ContentTypeError, CreatePaperCommand, CreateRosettaStoneStatementCommand,
        CreateTemplateCommand, GraphPorts, PaperRepository, PaperService, PipelineConfig,
        RosettaStoneStatementService, TemplateInstanceService, TemplateService,
        UpdateTemplateInstanceCommand,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

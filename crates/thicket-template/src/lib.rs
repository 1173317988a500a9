//! Thicket Templates
//!
//! Persisted schemas for content types and the validation of supplied
//! values against them.
//!
//! # Core Concepts
//!
//! - [`Template`]: Ordered property slots with target class and kind
//! - [`TemplateProperty`] / [`PropertyConstraint`]: Path, cardinality and value type of a slot
//! - [`TemplateConstraintValidator`]: Arity, cardinality and object typing checks
//! - [`TemplateRepository`]: Template lookup; [`GraphTemplateRepository`] reads shapes from the graph
//!
//! # Example
//!
//! ```rust,ignore
//! use thicket_template::{Slot, TemplateConstraintValidator};
//!
//! let validator = TemplateConstraintValidator::new(&classes);
//! validator.check_arity(&template, objects.len())?;
//! validator.validate_cardinality(&property, Slot::Object(0), values.len())?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod constraint;
mod error;
mod model;
mod repository;

// Re-exports
pub use constraint::TemplateConstraintValidator;
pub use error::{ConstraintError, TemplateError};
pub use model::{PropertyConstraint, Slot, Template, TemplateKind, TemplateProperty};
pub use repository::{GraphTemplateRepository, TemplateRepository};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

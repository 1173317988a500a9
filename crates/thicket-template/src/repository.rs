//! Template lookup
//!
//! Templates are stored as SHACL-like shapes in the graph: a node shape
//! resource points at its target class and at one property shape per
//! slot. [`GraphTemplateRepository`] rebuilds [`Template`] values from
//! those statements.

use crate::error::TemplateError;
use crate::model::{PropertyConstraint, Template, TemplateKind, TemplateProperty};
use std::sync::Arc;
use thicket_graph::{
    classes, predicates, Statement, StatementRepository, Thing, ThingId, ThingRepository, Xsd,
};

/// Read access to templates
pub trait TemplateRepository: Send + Sync {
    /// Load a template by node shape id
    ///
    /// Returns `Ok(None)` if `id` is absent or not a node shape.
    fn find_by_id(&self, id: &ThingId) -> Result<Option<Template>, TemplateError>;

    /// Find the template describing `class`, if any
    fn find_by_target_class(&self, class: &ThingId) -> Result<Option<ThingId>, TemplateError>;
}

/// Template lookup backed by graph statements
#[derive(Clone)]
pub struct GraphTemplateRepository {
    things: Arc<dyn ThingRepository>,
    statements: Arc<dyn StatementRepository>,
}

impl GraphTemplateRepository {
    /// Create repository over the graph lookups
    #[inline]
    #[must_use]
    pub fn new(things: Arc<dyn ThingRepository>, statements: Arc<dyn StatementRepository>) -> Self {
        Self { things, statements }
    }

    fn read_property(&self, template: &ThingId, id: &ThingId) -> Result<TemplateProperty, TemplateError> {
        let label = self
            .things
            .find_by_thing_id(id)?
            .map(|thing| thing.label().to_string())
            .ok_or_else(|| TemplateError::malformed(template, format!("property shape \"{id}\" is missing")))?;
        let statements = self.statements.find_all_by_subject(id)?;

        let path = object_id(&statements, &predicates::SH_PATH)
            .ok_or_else(|| TemplateError::malformed(template, format!("property \"{id}\" has no path")))?;
        let order = parse_literal::<u32>(template, &statements, &predicates::SH_ORDER)?.unwrap_or(0);
        let min_count = parse_literal::<u32>(template, &statements, &predicates::SH_MIN_COUNT)?;
        let max_count = parse_literal::<u32>(template, &statements, &predicates::SH_MAX_COUNT)?;

        let constraint = if let Some(class) = object_id(&statements, &predicates::SH_CLASS) {
            PropertyConstraint::Resource { class }
        } else if let Some(datatype) = literal_label(&statements, &predicates::SH_DATATYPE) {
            match Xsd::from_prefixed_uri(datatype) {
                Some(Xsd::String) => PropertyConstraint::StringLiteral {
                    pattern: literal_label(&statements, &predicates::SH_PATTERN).map(str::to_string),
                },
                Some(xsd) if xsd.is_number() => PropertyConstraint::NumberLiteral {
                    datatype: xsd,
                    min_inclusive: parse_literal::<f64>(template, &statements, &predicates::SH_MIN_INCLUSIVE)?,
                    max_inclusive: parse_literal::<f64>(template, &statements, &predicates::SH_MAX_INCLUSIVE)?,
                },
                _ => PropertyConstraint::OtherLiteral {
                    datatype: datatype.to_string(),
                },
            }
        } else {
            PropertyConstraint::Untyped
        };

        Ok(TemplateProperty {
            id: id.clone(),
            label,
            placeholder: literal_label(&statements, &predicates::PLACEHOLDER).map(str::to_string),
            description: literal_label(&statements, &predicates::DESCRIPTION).map(str::to_string),
            order,
            path,
            min_count,
            max_count,
            constraint,
        })
    }
}

impl TemplateRepository for GraphTemplateRepository {
    fn find_by_id(&self, id: &ThingId) -> Result<Option<Template>, TemplateError> {
        let Some(Thing::Resource(resource)) = self.things.find_by_thing_id(id)? else {
            return Ok(None);
        };
        let kind = if resource.classes.contains(&classes::ROSETTA_NODE_SHAPE) {
            TemplateKind::RosettaStone
        } else if resource.classes.contains(&classes::NODE_SHAPE) {
            TemplateKind::Standard
        } else {
            return Ok(None);
        };

        tracing::debug!(template = %id, ?kind, "loading template");
        let statements = self.statements.find_all_by_subject(id)?;
        let target_class = object_id(&statements, &predicates::SH_TARGET_CLASS)
            .ok_or_else(|| TemplateError::malformed(id, "no target class"))?;

        let properties = statements
            .iter()
            .filter(|s| s.predicate == predicates::SH_PROPERTY)
            .map(|s| self.read_property(id, s.object.id()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut template = Template {
            id: id.clone(),
            label: resource.label,
            description: literal_label(&statements, &predicates::DESCRIPTION).map(str::to_string),
            formatted_label: literal_label(&statements, &predicates::TEMPLATE_LABEL_FORMAT)
                .map(str::to_string),
            target_class,
            properties,
            is_closed: literal_label(&statements, &predicates::SH_CLOSED) == Some("true"),
            kind,
        };
        template.sort_properties();
        Ok(Some(template))
    }

    fn find_by_target_class(&self, class: &ThingId) -> Result<Option<ThingId>, TemplateError> {
        let statements = self
            .statements
            .find_all_by_predicate_and_object(&predicates::SH_TARGET_CLASS, class)?;
        Ok(statements.into_iter().next().map(|s| s.subject))
    }
}

impl std::fmt::Debug for GraphTemplateRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphTemplateRepository").finish_non_exhaustive()
    }
}

fn object_id(statements: &[Statement], predicate: &ThingId) -> Option<ThingId> {
    statements
        .iter()
        .find(|s| &s.predicate == predicate)
        .map(|s| s.object.id().clone())
}

fn literal_label<'s>(statements: &'s [Statement], predicate: &ThingId) -> Option<&'s str> {
    statements
        .iter()
        .filter(|s| &s.predicate == predicate)
        .find_map(|s| s.object.as_literal())
        .map(|literal| literal.label.as_str())
}

fn parse_literal<T: std::str::FromStr>(
    template: &ThingId,
    statements: &[Statement],
    predicate: &ThingId,
) -> Result<Option<T>, TemplateError> {
    literal_label(statements, predicate)
        .map(|label| {
            label.trim().parse::<T>().map_err(|_| {
                TemplateError::malformed(template, format!("invalid value \"{label}\" for {predicate}"))
            })
        })
        .transpose()
}

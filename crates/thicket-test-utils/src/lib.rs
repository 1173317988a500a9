//! Testing utilities for the Thicket workspace
//!
//! An in-memory store implementing every port, fixtures that seed
//! templates as shapes, and a tracing subscriber for test output.

#![allow(missing_docs)]

mod store;

pub use store::InMemoryGraph;

use thicket_graph::{classes, predicates, ThingId, Xsd};
use thicket_template::TemplateKind;

/// Slot of a seeded template
#[derive(Debug, Clone)]
pub struct SlotFixture {
    pub label: String,
    pub path: ThingId,
    pub min_count: Option<u32>,
    pub max_count: Option<u32>,
    pub class: Option<ThingId>,
    /// Prefixed `xsd:` name or absolute datatype IRI
    pub datatype: Option<String>,
}

impl SlotFixture {
    /// Untyped slot without cardinality bounds
    #[must_use]
    pub fn new(label: &str, path: ThingId) -> Self {
        Self {
            label: label.to_string(),
            path,
            min_count: None,
            max_count: None,
            class: None,
            datatype: None,
        }
    }

    #[must_use]
    pub fn with_count(mut self, min: u32, max: u32) -> Self {
        self.min_count = Some(min);
        self.max_count = Some(max);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: ThingId) -> Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn with_datatype(self, datatype: Xsd) -> Self {
        self.with_datatype_iri(datatype.prefixed_uri())
    }

    #[must_use]
    pub fn with_datatype_iri(mut self, datatype: &str) -> Self {
        self.datatype = Some(datatype.to_string());
        self
    }
}

/// Write a template as node and property shapes, returning its id
pub fn seed_template(
    graph: &InMemoryGraph,
    label: &str,
    kind: TemplateKind,
    target_class: &ThingId,
    slots: &[SlotFixture],
) -> ThingId {
    let shape_class = match kind {
        TemplateKind::Standard => classes::NODE_SHAPE,
        TemplateKind::RosettaStone => classes::ROSETTA_NODE_SHAPE,
    };
    let template = graph.add_resource(label, &[shape_class]);
    graph.add_link(&template, &predicates::SH_TARGET_CLASS, target_class);

    let literal = |subject: &ThingId, predicate: &ThingId, label: &str, datatype: Xsd| {
        let literal = graph.add_literal(label, datatype.prefixed_uri());
        graph.add_link(subject, predicate, &literal);
    };

    for (order, slot) in slots.iter().enumerate() {
        let shape = graph.add_resource(&slot.label, &[classes::PROPERTY_SHAPE]);
        graph.add_link(&template, &predicates::SH_PROPERTY, &shape);
        graph.add_link(&shape, &predicates::SH_PATH, &slot.path);
        literal(&shape, &predicates::SH_ORDER, &order.to_string(), Xsd::Integer);
        if let Some(min) = slot.min_count {
            literal(&shape, &predicates::SH_MIN_COUNT, &min.to_string(), Xsd::Integer);
        }
        if let Some(max) = slot.max_count {
            literal(&shape, &predicates::SH_MAX_COUNT, &max.to_string(), Xsd::Integer);
        }
        if let Some(class) = &slot.class {
            graph.add_link(&shape, &predicates::SH_CLASS, class);
        }
        if let Some(datatype) = &slot.datatype {
            literal(&shape, &predicates::SH_DATATYPE, datatype, Xsd::String);
        }
    }
    template
}

/// Install a fmt subscriber honoring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

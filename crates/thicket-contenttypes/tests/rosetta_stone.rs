//! Rosetta-stone statements against the in-memory store

use pretty_assertions::assert_eq;
use std::sync::Arc;
use thicket_contenttypes::prelude::*;
use thicket_graph::{classes, predicates, ContributorId, ExtractionMethod, Thing, ThingId, Xsd};
use thicket_symbol::{LiteralDefinition, ResourceDefinition, SymbolError, ThingDefinitions};
use thicket_template::{ConstraintError, TemplateKind};
use thicket_test_utils::{init_tracing, seed_template, InMemoryGraph, SlotFixture};

struct Fixture {
    graph: Arc<InMemoryGraph>,
    service: RosettaStoneStatementService,
    template: ThingId,
    subject: ThingId,
}

const UNIT: &str = "http://example.org/unit";

/// Template with a subject slot and two single-valued object slots,
/// the last one an `xsd:integer`
fn fixture() -> Fixture {
    fixture_with(|unit| SlotFixture::new("unit", unit).with_count(1, 1))
}

fn fixture_with(unit_slot: impl FnOnce(ThingId) -> SlotFixture) -> Fixture {
    init_tracing();
    let graph = Arc::new(InMemoryGraph::new());
    let class = graph.add_class("Measurement", None);
    let measured = graph.add_predicate("measured");
    let unit = graph.add_predicate("unit");
    let value = graph.add_predicate("value");
    let template = seed_template(
        &graph,
        "measurement",
        TemplateKind::RosettaStone,
        &class,
        &[
            SlotFixture::new("subject", measured).with_count(1, 1),
            unit_slot(unit),
            SlotFixture::new("value", value)
                .with_count(1, 1)
                .with_datatype(Xsd::Integer),
        ],
    );
    let subject = graph.add_resource("sample", &[]);

    let ports = GraphPorts::from_store(Arc::clone(&graph));
    let service = RosettaStoneStatementService::new(&ports, ports.template_repository(), &PipelineConfig::default());
    Fixture {
        graph,
        service,
        template,
        subject,
    }
}

fn command(fixture: &Fixture, objects: Vec<Vec<String>>, definitions: ThingDefinitions) -> CreateRosettaStoneStatementCommand {
    CreateRosettaStoneStatementCommand {
        contributor_id: ContributorId::UNKNOWN,
        template_id: fixture.template.clone(),
        context: None,
        subjects: vec![fixture.subject.to_string()],
        objects,
        definitions,
        extraction_method: ExtractionMethod::Manual,
    }
}

fn untyped_literal(label: &str) -> LiteralDefinition {
    LiteralDefinition {
        label: label.into(),
        datatype: Xsd::String.prefixed_uri().into(),
    }
}

#[test]
fn literal_placeholder_fills_integer_slot() {
    let fixture = fixture();
    let unit = fixture.graph.add_resource("kg", &[]);
    let before = fixture.graph.statement_count();
    let command = command(
        &fixture,
        vec![vec![unit.to_string()], vec!["#p1".into()]],
        ThingDefinitions::new().with_literal("#p1", untyped_literal("100")),
    );

    let statement = fixture.service.create(&command).unwrap();

    let Some(Thing::Resource(resource)) = fixture.graph.thing(&statement) else {
        panic!("statement resource missing");
    };
    assert_eq!(resource.label, "measurement");
    assert!(resource.classes.contains(&classes::ROSETTA_STONE_STATEMENT));
    assert_eq!(fixture.graph.statement_count() - before, 3);

    let values = fixture.graph.statements();
    let value = values
        .iter()
        .filter(|s| s.subject == statement)
        .find_map(|s| s.object.as_literal())
        .unwrap();
    assert_eq!(value.label, "100");
    assert_eq!(value.datatype, "xsd:integer");
}

#[test]
fn missing_position_reports_signed_difference() {
    let fixture = fixture();
    let command = command(&fixture, vec![vec![fixture.subject.to_string()]], ThingDefinitions::new());
    let writes = fixture.graph.write_count();

    let err = fixture.service.create(&command).unwrap_err();

    assert_eq!(
        err,
        ContentTypeError::Constraint(ConstraintError::MissingInputPositions {
            template: fixture.template.clone(),
            expected: 3,
            diff: -1,
        })
    );
    assert_eq!(fixture.graph.write_count(), writes);
}

#[test]
fn undeclared_placeholder_fails_before_any_write() {
    let fixture = fixture();
    let command = command(
        &fixture,
        vec![vec!["#ghost".into()], vec!["#p1".into()]],
        ThingDefinitions::new().with_literal("#p1", untyped_literal("5")),
    );
    let writes = fixture.graph.write_count();

    let err = fixture.service.create(&command).unwrap_err();

    assert!(matches!(
        err,
        ContentTypeError::Symbol(SymbolError::UndeclaredPlaceholder(_))
    ));
    assert_eq!(fixture.graph.write_count(), writes);
}

#[test]
fn placeholder_declared_twice_is_rejected() {
    let fixture = fixture();
    let command = command(
        &fixture,
        vec![vec!["#x".into()], vec!["#p1".into()]],
        ThingDefinitions::new()
            .with_literal("#x", untyped_literal("kg"))
            .with_resource(
                "#x",
                ResourceDefinition {
                    label: "kilogram".into(),
                    classes: Default::default(),
                },
            )
            .with_literal("#p1", untyped_literal("5")),
    );

    let err = fixture.service.create(&command).unwrap_err();

    assert!(matches!(
        err,
        ContentTypeError::Symbol(SymbolError::DuplicatePlaceholders(ref counts)) if counts["#x"] == 2
    ));
}

#[test]
fn non_numeric_value_is_rejected() {
    let fixture = fixture();
    let unit = fixture.graph.add_resource("kg", &[]);
    let command = command(
        &fixture,
        vec![vec![unit.to_string()], vec!["#p1".into()]],
        ThingDefinitions::new().with_literal("#p1", untyped_literal("heavy")),
    );

    let err = fixture.service.create(&command).unwrap_err();

    assert_eq!(err.kind(), thicket_contenttypes::ErrorKind::Value);
}

#[test]
fn context_is_linked_to_the_statement() {
    let fixture = fixture();
    let unit = fixture.graph.add_resource("kg", &[]);
    let paper = fixture.graph.add_resource("paper", &[classes::PAPER]);
    let mut command = command(
        &fixture,
        vec![vec![unit.to_string()], vec!["#p1".into()]],
        ThingDefinitions::new().with_literal("#p1", untyped_literal("7")),
    );
    command.context = Some(paper.clone());

    let statement = fixture.service.create(&command).unwrap();

    let contexts: Vec<_> = fixture
        .graph
        .objects(&statement, &predicates::HAS_CONTEXT)
        .iter()
        .map(|thing| thing.id().clone())
        .collect();
    assert_eq!(contexts, vec![paper]);
}

#[test]
fn unknown_context_is_rejected() {
    let fixture = fixture();
    let mut command = command(&fixture, vec![vec![], vec![]], ThingDefinitions::new());
    command.context = Some(ThingId::new("R404"));

    let err = fixture.service.create(&command).unwrap_err();

    assert_eq!(err, ContentTypeError::Symbol(SymbolError::ThingNotFound(ThingId::new("R404"))));
}

/// Unit slot typed with a datatype outside the `xsd:` set
fn custom_unit_fixture() -> Fixture {
    fixture_with(|unit| {
        SlotFixture::new("unit", unit)
            .with_count(1, 1)
            .with_datatype_iri(UNIT)
    })
}

fn mismatched_found(err: &ContentTypeError) -> Option<&str> {
    match err {
        ContentTypeError::Constraint(ConstraintError::MismatchedDataType { found, .. }) => Some(found.as_str()),
        _ => None,
    }
}

#[test]
fn custom_datatype_slot_judges_placeholders_like_existing_literals() {
    let fixture = custom_unit_fixture();
    let existing = fixture.graph.add_literal("kg", "xsd:string");

    let from_placeholder = fixture
        .service
        .create(&command(
            &fixture,
            vec![vec!["#u".into()], vec!["#v".into()]],
            ThingDefinitions::new()
                .with_literal("#u", untyped_literal("kg"))
                .with_literal("#v", untyped_literal("3")),
        ))
        .unwrap_err();
    let from_store = fixture
        .service
        .create(&command(
            &fixture,
            vec![vec![existing.to_string()], vec!["#v".into()]],
            ThingDefinitions::new().with_literal("#v", untyped_literal("3")),
        ))
        .unwrap_err();

    assert_eq!(mismatched_found(&from_placeholder), Some("xsd:string"));
    assert_eq!(mismatched_found(&from_store), Some("xsd:string"));
}

#[test]
fn custom_datatype_slot_accepts_matching_placeholder() {
    let fixture = custom_unit_fixture();
    let command = command(
        &fixture,
        vec![vec!["#u".into()], vec!["#v".into()]],
        ThingDefinitions::new()
            .with_literal(
                "#u",
                LiteralDefinition {
                    label: "kg".into(),
                    datatype: UNIT.into(),
                },
            )
            .with_literal("#v", untyped_literal("3")),
    );

    let statement = fixture.service.create(&command).unwrap();

    let mut datatypes: Vec<_> = fixture
        .graph
        .statements()
        .iter()
        .filter(|s| s.subject == statement)
        .filter_map(|s| s.object.as_literal().map(|literal| literal.datatype.clone()))
        .collect();
    datatypes.sort();
    assert_eq!(datatypes, vec![UNIT.to_string(), "xsd:integer".to_string()]);
}

#[test]
fn placeholder_bound_to_conflicting_slot_datatypes_is_rejected() {
    let fixture = custom_unit_fixture();
    let command = command(
        &fixture,
        vec![vec!["#u".into()], vec!["#u".into()]],
        ThingDefinitions::new().with_literal(
            "#u",
            LiteralDefinition {
                label: "5".into(),
                datatype: UNIT.into(),
            },
        ),
    );
    let writes = fixture.graph.write_count();

    let err = fixture.service.create(&command).unwrap_err();

    assert!(matches!(
        err,
        ContentTypeError::Constraint(ConstraintError::MismatchedDataType { ref expected, ref found, .. })
            if expected == "xsd:integer" && found == UNIT
    ));
    assert_eq!(fixture.graph.write_count(), writes);
}

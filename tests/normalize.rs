//! Tests for payload shape detection and normalization.
mod common;
use common::*;
use journey_prefill::prelude::*;
use serde_json::json;

#[test]
fn test_schema_and_legacy_payloads_normalize_to_same_graph() {
    let from_schema = normalize(&chain_schema_payload());
    let from_legacy = normalize(&chain_legacy_payload());

    assert_eq!(from_schema, from_legacy);
    assert_eq!(from_schema.forms.len(), 3);
    assert_eq!(from_schema.edges[0], Edge::new("A", "B"));
}

#[test]
fn test_shape_detection_requires_nodes_and_forms_arrays() {
    assert!(RawGraph::is_schema_shape(&chain_schema_payload()));
    assert!(!RawGraph::is_schema_shape(&chain_legacy_payload()));
    // `nodes` alone is not enough.
    assert!(!RawGraph::is_schema_shape(&json!({ "nodes": [], "edges": [] })));
    assert!(!RawGraph::is_schema_shape(&json!({ "nodes": {}, "forms": [] })));
}

#[test]
fn test_schema_field_type_precedence() {
    let payload = json!({
        "nodes": [{ "id": "n1", "data": { "name": "Intake", "component_id": "d1" } }],
        "edges": [],
        "forms": [{
            "id": "d1",
            "field_schema": { "properties": {
                "a": { "avantos_type": "short-text", "type": "string" },
                "b": { "type": ["string", "null"] },
                "c": { "type": "object" },
                "d": { "title": "Dee" }
            }}
        }]
    });

    let graph = normalize(&payload);
    let form = graph.form("n1").expect("form n1");
    let types: Vec<_> = form.fields.iter().map(|f| f.field_type.as_str()).collect();
    assert_eq!(types, vec!["short-text", "string|null", "object", "unknown"]);

    assert_eq!(form.field("a").unwrap().label, "a");
    assert_eq!(form.field("d").unwrap().label, "Dee");
}

#[test]
fn test_schema_fields_keep_property_order() {
    let payload = json!({
        "nodes": [{ "id": "n1", "data": { "name": "Intake", "component_id": "d1" } }],
        "forms": [{
            "id": "d1",
            "field_schema": { "properties": {
                "zeta": { "type": "string" },
                "alpha": { "type": "string" },
                "mid": { "type": "string" }
            }}
        }]
    });

    let graph = normalize(&payload);
    let ids: Vec<_> = graph.forms[0].fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    assert!(graph.edges.is_empty());
}

#[test]
fn test_missing_form_definition_yields_empty_fields() {
    let payload = json!({
        "nodes": [
            { "id": "n1", "data": { "name": "Known", "component_id": "d1" } },
            { "id": "n2", "data": { "name": "Orphan", "component_id": "does_not_exist" } }
        ],
        "edges": [{ "source": "n1", "target": "n2" }],
        "forms": [{ "id": "d1", "field_schema": { "properties": { "email": {} } } }]
    });

    let graph = normalize(&payload);
    assert_eq!(graph.forms.len(), 2);
    let orphan = graph.form("n2").expect("orphan form is kept");
    assert_eq!(orphan.name, "Orphan");
    assert!(orphan.fields.is_empty());
}

#[test]
fn test_forms_follow_node_order_not_definition_order() {
    let payload = json!({
        "nodes": [
            { "id": "second", "data": { "name": "Second", "component_id": "d2" } },
            { "id": "first", "data": { "name": "First", "component_id": "d1" } }
        ],
        "forms": [{ "id": "d1" }, { "id": "d2" }]
    });

    let graph = normalize(&payload);
    let ids: Vec<_> = graph.forms.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["second", "first"]);
}

#[test]
fn test_node_name_falls_back_to_definition_then_id() {
    let payload = json!({
        "nodes": [
            { "id": "n1", "data": { "component_id": "d1" } },
            { "id": "n2", "data": {} }
        ],
        "forms": [{ "id": "d1", "name": "Definition name" }]
    });

    let graph = normalize(&payload);
    assert_eq!(graph.form("n1").unwrap().name, "Definition name");
    assert_eq!(graph.form("n2").unwrap().name, "n2");
}

#[test]
fn test_legacy_defaults_and_edge_aliases() {
    let payload = json!({
        "forms": [
            { "id": "A", "name": "Form A", "fields": [{ "id": "email" }] },
            { "id": "B", "fields": [{ "id": "phone", "label": "Phone", "type": "tel" }] }
        ],
        "edges": [
            { "source": "A", "target": "B" },
            { "from": "B" }
        ]
    });

    let graph = normalize(&payload);
    let a = graph.form("A").unwrap();
    assert_eq!(a.fields[0].label, "email");
    assert_eq!(a.fields[0].field_type, "unknown");

    let b = graph.form("B").unwrap();
    assert_eq!(b.name, "B");
    assert_eq!(b.fields[0].field_type, "tel");

    // The edge with no target is dropped.
    assert_eq!(graph.edges, vec![Edge::new("A", "B")]);
}

#[test]
fn test_unreadable_entries_are_skipped() {
    let payload = json!({
        "forms": [
            { "name": "no id" },
            { "id": "ok", "name": "Ok", "fields": [{ "id": "f1" }] },
            { "id": "bad_field", "fields": [{ "label": "no id" }, { "id": "f2" }] },
            42
        ],
        "edges": "not a list"
    });

    let graph = normalize(&payload);
    let ids: Vec<_> = graph.forms.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["ok", "bad_field"]);
    // Only the field without an id is dropped; its form stays.
    let fields: Vec<_> = graph.forms[1].fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(fields, vec!["f2"]);
    assert!(graph.edges.is_empty());
}

#[test]
fn test_bad_legacy_field_metadata_keeps_form_in_chain() {
    let payload = json!({
        "forms": [
            { "id": "A", "name": "Form A", "fields": [{ "id": "email" }] },
            { "id": "B", "name": "Form B", "fields": [{ "id": "phone", "label": 7, "type": false }] },
            { "id": "C", "name": "Form C", "fields": "not a list" }
        ],
        "edges": [
            { "from": "A", "to": "B" },
            { "from": "B", "to": "C" }
        ]
    });

    let graph = normalize(&payload);
    let b = graph.form("B").expect("B survives bad field metadata");
    assert_eq!(b.fields.len(), 1);
    assert_eq!(b.fields[0].label, "phone");
    assert_eq!(b.fields[0].field_type, "unknown");
    assert!(graph.form("C").unwrap().fields.is_empty());

    let groups = group_sources(&graph, Some("C"));
    assert_eq!(groups.direct.form_ids(), vec!["B"]);
    assert_eq!(groups.transitive.form_ids(), vec!["A"]);
}

#[test]
fn test_bad_form_names_fall_back_instead_of_dropping() {
    let legacy = normalize(&json!({ "forms": [{ "id": "A", "name": 12 }] }));
    assert_eq!(legacy.form("A").unwrap().name, "A");

    let schema = normalize(&json!({
        "nodes": [{ "id": "n1", "data": { "name": ["x"], "component_id": "d1" } }],
        "forms": [{ "id": "d1", "name": "Definition name", "field_schema": { "properties": { "email": {} } } }]
    }));
    let form = schema.form("n1").unwrap();
    assert_eq!(form.name, "Definition name");
    assert_eq!(form.fields.len(), 1);
}

#[test]
fn test_schema_property_attributes_are_read_independently() {
    let payload = json!({
        "nodes": [{ "id": "n1", "data": { "name": "Intake", "component_id": "d1" } }],
        "forms": [{
            "id": "d1",
            "field_schema": { "properties": {
                "email": { "title": 5, "avantos_type": "short-text" },
                "age": { "title": "Age", "avantos_type": 3, "type": "integer" },
                "notes": { "title": "Notes", "type": { "not": "a type" } },
                "flag": true
            }}
        }]
    });

    let graph = normalize(&payload);
    let form = graph.form("n1").unwrap();

    let email = form.field("email").unwrap();
    assert_eq!(email.label, "email");
    assert_eq!(email.field_type, "short-text");

    let age = form.field("age").unwrap();
    assert_eq!(age.label, "Age");
    assert_eq!(age.field_type, "integer");

    let notes = form.field("notes").unwrap();
    assert_eq!(notes.label, "Notes");
    assert_eq!(notes.field_type, "unknown");

    let flag = form.field("flag").unwrap();
    assert_eq!(flag.label, "flag");
    assert_eq!(flag.field_type, "unknown");
}

#[test]
fn test_normalize_is_total_on_non_object_payloads() {
    assert!(normalize(&json!(null)).is_empty());
    assert!(normalize(&json!([1, 2, 3])).is_empty());
    assert!(normalize(&json!({})).is_empty());
}

#[test]
fn test_sample_data_file_normalizes() {
    let content =
        std::fs::read_to_string("data/graph.json").expect("sample data file should exist");
    let payload: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");

    let graph = normalize(&payload);
    assert_eq!(graph.forms.len(), 6);
    assert_eq!(graph.edges.len(), 6);
    assert!(graph.find_cycle().is_none());
    let form_a = graph.form("form-a").unwrap();
    assert_eq!(form_a.name, "Form A");
    assert_eq!(form_a.field("score").unwrap().field_type, "number|null");
}

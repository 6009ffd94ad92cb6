//! Common test utilities for building graph payloads.
use journey_prefill::prelude::*;
use serde_json::{Value, json};

/// Legacy-shape payload for the chain `A -> B -> C`, every form with one `email` field.
#[allow(dead_code)]
pub fn chain_legacy_payload() -> Value {
    json!({
        "forms": [
            { "id": "A", "name": "Form A", "fields": [{ "id": "email", "label": "Email", "type": "short-text" }] },
            { "id": "B", "name": "Form B", "fields": [{ "id": "email", "label": "Email", "type": "short-text" }] },
            { "id": "C", "name": "Form C", "fields": [{ "id": "email", "label": "Email", "type": "short-text" }] }
        ],
        "edges": [
            { "from": "A", "to": "B" },
            { "from": "B", "to": "C" }
        ]
    })
}

/// The same chain in the schema shape, with every node sharing one form definition.
#[allow(dead_code)]
pub fn chain_schema_payload() -> Value {
    json!({
        "nodes": [
            { "id": "A", "type": "form", "data": { "name": "Form A", "component_id": "def_email" } },
            { "id": "B", "type": "form", "data": { "name": "Form B", "component_id": "def_email" } },
            { "id": "C", "type": "form", "data": { "name": "Form C", "component_id": "def_email" } }
        ],
        "edges": [
            { "source": "A", "target": "B" },
            { "source": "B", "target": "C" }
        ],
        "forms": [
            {
                "id": "def_email",
                "name": "Email form",
                "field_schema": {
                    "properties": {
                        "email": { "title": "Email", "avantos_type": "short-text", "type": "string" }
                    }
                }
            }
        ]
    })
}

#[allow(dead_code)]
pub fn chain_graph() -> Graph {
    normalize(&chain_legacy_payload())
}

/// Builds a graph with one `email` field per form from `(from, to)` pairs.
#[allow(dead_code)]
pub fn graph_from_edges(form_ids: &[&str], edges: &[(&str, &str)]) -> Graph {
    Graph {
        forms: form_ids
            .iter()
            .map(|id| Form {
                id: id.to_string(),
                name: format!("Form {}", id),
                fields: vec![Field {
                    id: "email".to_string(),
                    label: "Email".to_string(),
                    field_type: "short-text".to_string(),
                }],
            })
            .collect(),
        edges: edges.iter().map(|(from, to)| Edge::new(*from, *to)).collect(),
    }
}

/// A diamond with a tail: `A -> B`, `A -> C`, `B -> D`, `C -> D`, `D -> E`.
#[allow(dead_code)]
pub fn diamond_graph() -> Graph {
    graph_from_edges(
        &["A", "B", "C", "D", "E"],
        &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")],
    )
}

#[allow(dead_code)]
pub fn email_from(form_id: &str) -> PrefillSource {
    PrefillSource::form_field(form_id, "email", format!("Form {}.email", form_id))
}

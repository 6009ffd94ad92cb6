use super::definition::{Edge, Field, Form, Graph, UNKNOWN_FIELD_TYPE};
use super::raw::{
    LegacyPayload, RawFieldKind, RawFieldProperty, RawGraph, RawLegacyEdge, RawLegacyField,
    SchemaPayload,
};
use ahash::AHashMap;
use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, warn};

/// A trait for payload models that can be converted into the canonical [`Graph`].
///
/// Both built-in wire shapes implement it. Implementing it for another format
/// is all that is needed to feed that format into the resolver.
///
/// # Example
///
/// ```rust
/// use journey_prefill::graph::{Edge, Field, Form, Graph, IntoGraph};
///
/// struct Checklist {
///     steps: Vec<(String, Vec<String>)>,
/// }
///
/// impl IntoGraph for Checklist {
///     fn into_graph(self) -> Graph {
///         let ids: Vec<String> = self.steps.iter().map(|(id, _)| id.clone()).collect();
///         let forms = self
///             .steps
///             .into_iter()
///             .map(|(id, fields)| Form {
///                 name: id.clone(),
///                 fields: fields
///                     .into_iter()
///                     .map(|f| Field { label: f.clone(), id: f, field_type: "unknown".into() })
///                     .collect(),
///                 id,
///             })
///             .collect();
///         let edges = ids.windows(2).map(|w| Edge::new(&w[0], &w[1])).collect();
///         Graph { forms, edges }
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the payload and converts it into a canonical graph.
    fn into_graph(self) -> Graph;
}

/// Converts a raw JSON payload in either accepted shape into a canonical graph.
///
/// Never fails: missing metadata is defaulted and unreadable entries are skipped.
pub fn normalize(raw: &Value) -> Graph {
    let graph = RawGraph::from_value(raw).into_graph();
    debug!(
        "Normalized graph: {} forms, {} edges",
        graph.forms.len(),
        graph.edges.len()
    );
    graph
}

impl IntoGraph for RawGraph {
    fn into_graph(self) -> Graph {
        match self {
            RawGraph::Schema(payload) => payload.into_graph(),
            RawGraph::Legacy(payload) => payload.into_graph(),
        }
    }
}

impl IntoGraph for SchemaPayload {
    fn into_graph(self) -> Graph {
        let definitions: AHashMap<&str, _> = self
            .forms
            .iter()
            .map(|definition| (definition.id.as_str(), definition))
            .collect();

        let forms = self
            .nodes
            .iter()
            .map(|node| {
                let definition = node
                    .data
                    .component_id
                    .as_deref()
                    .and_then(|component_id| definitions.get(component_id));

                if definition.is_none() {
                    debug!(
                        "Node '{}' references no known form definition; it has no fields",
                        node.id
                    );
                }

                let fields = definition
                    .and_then(|d| d.field_schema.as_ref())
                    .map(|schema| {
                        schema
                            .properties
                            .iter()
                            .map(|(key, value)| schema_field(key, value))
                            .collect()
                    })
                    .unwrap_or_default();

                let name = node
                    .data
                    .name
                    .clone()
                    .or_else(|| definition.and_then(|d| d.name.clone()))
                    .unwrap_or_else(|| node.id.clone());

                Form {
                    id: node.id.clone(),
                    name,
                    fields,
                }
            })
            .collect();

        let edges = self
            .edges
            .into_iter()
            .map(|edge| Edge {
                from: edge.source,
                to: edge.target,
            })
            .collect();

        Graph { forms, edges }
    }
}

impl IntoGraph for LegacyPayload {
    fn into_graph(self) -> Graph {
        let forms = self
            .forms
            .into_iter()
            .map(|form| Form {
                fields: form.read_fields().into_iter().map(legacy_field).collect(),
                name: form.name.unwrap_or_else(|| form.id.clone()),
                id: form.id,
            })
            .collect();

        let edges = self.edges.into_iter().filter_map(legacy_edge).collect();

        Graph { forms, edges }
    }
}

fn schema_field(key: &str, value: &Value) -> Field {
    let property = RawFieldProperty::deserialize_lenient(value);
    Field {
        id: key.to_string(),
        label: property.title.unwrap_or_else(|| key.to_string()),
        field_type: resolve_field_type(property.avantos_type, property.kind),
    }
}

fn legacy_field(field: RawLegacyField) -> Field {
    Field {
        label: field.label.unwrap_or_else(|| field.id.clone()),
        field_type: resolve_field_type(None, field.kind),
        id: field.id,
    }
}

fn legacy_edge(edge: RawLegacyEdge) -> Option<Edge> {
    match (edge.from.or(edge.source), edge.to.or(edge.target)) {
        (Some(from), Some(to)) => Some(Edge { from, to }),
        (from, to) => {
            warn!(
                "Skipping legacy edge with a missing endpoint (from: {:?}, to: {:?})",
                from, to
            );
            None
        }
    }
}

/// Type precedence: `avantos_type`, then a joined `type` union, then a plain `type`.
pub fn resolve_field_type(avantos_type: Option<String>, kind: Option<RawFieldKind>) -> String {
    if let Some(avantos_type) = avantos_type {
        return avantos_type;
    }
    match kind {
        Some(RawFieldKind::Many(types)) => types.iter().join("|"),
        Some(RawFieldKind::One(name)) => name,
        None => UNKNOWN_FIELD_TYPE.to_string(),
    }
}

impl RawFieldProperty {
    /// Reads property metadata. A property that is not an object has none.
    fn deserialize_lenient(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

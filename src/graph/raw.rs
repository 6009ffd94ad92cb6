//! Wire shapes accepted from the upstream graph endpoint.
//!
//! Two envelopes exist in the wild: the blueprint schema shape, where graph
//! nodes point at shared form definitions through `component_id`, and the
//! older flat shape that lists forms with their fields inline. The shape is
//! decided once per payload by [`RawGraph::from_value`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// A raw payload after shape detection.
#[derive(Debug, Clone)]
pub enum RawGraph {
    Schema(SchemaPayload),
    Legacy(LegacyPayload),
}

impl RawGraph {
    /// Detects the payload shape and reads it.
    ///
    /// A payload with both a `nodes` array and a `forms` array is the schema
    /// shape; anything else is read as the legacy shape. Entries that cannot
    /// be read at all (e.g. a node without an `id`) are skipped.
    pub fn from_value(value: &Value) -> Self {
        if Self::is_schema_shape(value) {
            RawGraph::Schema(SchemaPayload {
                nodes: read_entries(value.get("nodes"), "node"),
                edges: read_entries(value.get("edges"), "edge"),
                forms: read_entries(value.get("forms"), "form definition"),
            })
        } else {
            RawGraph::Legacy(LegacyPayload {
                forms: read_entries(value.get("forms"), "form"),
                edges: read_entries(value.get("edges"), "edge"),
            })
        }
    }

    pub fn is_schema_shape(value: &Value) -> bool {
        value.get("nodes").is_some_and(Value::is_array)
            && value.get("forms").is_some_and(Value::is_array)
    }
}

fn read_entries<T: DeserializeOwned>(value: Option<&Value>, what: &str) -> Vec<T> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    read_list(items, what)
}

fn read_list<T: DeserializeOwned>(items: &[Value], what: &str) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable {} at index {}: {}", what, index, e);
                None
            }
        })
        .collect()
}

/// Reads one optional attribute, falling back to the default when it has the
/// wrong JSON type. Used for metadata so one bad attribute costs only itself.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// --- Schema shape ---

#[derive(Debug, Clone, Default)]
pub struct SchemaPayload {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawSchemaEdge>,
    pub forms: Vec<RawFormDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub data: RawNodeData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNodeData {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(alias = "componentId", default, deserialize_with = "lenient")]
    pub component_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSchemaEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFormDefinition {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub field_schema: Option<RawFieldSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldSchema {
    /// Kept as a JSON map so property order survives (`preserve_order`).
    #[serde(default, deserialize_with = "lenient")]
    pub properties: serde_json::Map<String, Value>,
}

/// Metadata of one schema property. Every part is optional and read on its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldProperty {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub avantos_type: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<RawFieldKind>,
}

/// A JSON-schema `type`, either a single name or a union of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawFieldKind {
    One(String),
    Many(Vec<String>),
}

// --- Legacy shape ---

#[derive(Debug, Clone, Default)]
pub struct LegacyPayload {
    pub forms: Vec<RawLegacyForm>,
    pub edges: Vec<RawLegacyEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLegacyForm {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Read entry by entry in [`RawLegacyForm::read_fields`], so an unreadable
    /// field drops only itself.
    #[serde(default, deserialize_with = "lenient")]
    pub fields: Vec<Value>,
}

impl RawLegacyForm {
    pub fn read_fields(&self) -> Vec<RawLegacyField> {
        read_list(&self.fields, &format!("field of form '{}'", self.id))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLegacyField {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<RawFieldKind>,
}

/// Legacy edges come as either `{from, to}` or `{source, target}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLegacyEdge {
    pub from: Option<String>,
    pub to: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
}

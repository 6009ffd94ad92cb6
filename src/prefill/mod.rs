use crate::graph::Graph;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Where a prefilled value comes from.
///
/// The variant tag is the identity of the source kind; labels are display
/// text only and are never used to tell the two kinds apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PrefillSource {
    #[serde(rename = "formField", rename_all = "camelCase")]
    FormField {
        form_id: String,
        field_id: String,
        label: String,
    },
    #[serde(rename = "global")]
    Global { label: String },
}

impl PrefillSource {
    pub fn form_field(
        form_id: impl Into<String>,
        field_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        PrefillSource::FormField {
            form_id: form_id.into(),
            field_id: field_id.into(),
            label: label.into(),
        }
    }

    pub fn global(label: impl Into<String>) -> Self {
        PrefillSource::Global {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PrefillSource::FormField { label, .. } | PrefillSource::Global { label } => label.as_str(),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, PrefillSource::Global { .. })
    }
}

impl fmt::Display for PrefillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefillSource::FormField {
                form_id, field_id, ..
            } => write!(f, "{}.{}", form_id, field_id),
            PrefillSource::Global { label } => write!(f, "global:{}", label),
        }
    }
}

/// Field id -> chosen source, for one form.
pub type PrefillMapping = AHashMap<String, PrefillSource>;

/// Committed prefill choices for every form, keyed by form id.
///
/// Entries are not validated against any graph when written. Entries whose
/// field no longer exists are kept until [`PrefillState::prune`] is called,
/// and are hidden by [`PrefillState::visible`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefillState {
    forms: AHashMap<String, PrefillMapping>,
}

impl PrefillState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an initial state from its JSON form (`{formId: {fieldId: source}}`).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The mapping for a form; empty if nothing was ever set.
    pub fn get(&self, form_id: &str) -> PrefillMapping {
        self.forms.get(form_id).cloned().unwrap_or_default()
    }

    pub fn source_for(&self, form_id: &str, field_id: &str) -> Option<&PrefillSource> {
        self.forms.get(form_id).and_then(|m| m.get(field_id))
    }

    /// Replaces any existing source for the field.
    pub fn set(&mut self, form_id: &str, field_id: &str, source: PrefillSource) {
        debug!("Prefill {}.{} <- {}", form_id, field_id, source);
        self.forms
            .entry(form_id.to_string())
            .or_default()
            .insert(field_id.to_string(), source);
    }

    /// Removes the field's source. Returns it if one was set; absent fields are a no-op.
    pub fn clear(&mut self, form_id: &str, field_id: &str) -> Option<PrefillSource> {
        let mapping = self.forms.get_mut(form_id)?;
        let removed = mapping.remove(field_id);
        if mapping.is_empty() {
            self.forms.remove(form_id);
        }
        removed
    }

    /// The mapping of a form restricted to fields that exist in `graph`.
    pub fn visible(&self, graph: &Graph, form_id: &str) -> PrefillMapping {
        let Some(form) = graph.form(form_id) else {
            return PrefillMapping::new();
        };
        self.forms
            .get(form_id)
            .map(|mapping| {
                mapping
                    .iter()
                    .filter(|(field_id, _)| form.has_field(field_id))
                    .map(|(field_id, source)| (field_id.clone(), source.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drops every entry whose form or field is absent from `graph`.
    /// Returns how many field entries were removed.
    pub fn prune(&mut self, graph: &Graph) -> usize {
        let mut removed = 0;
        self.forms.retain(|form_id, mapping| {
            let before = mapping.len();
            match graph.form(form_id) {
                Some(form) => mapping.retain(|field_id, _| form.has_field(field_id)),
                None => mapping.clear(),
            }
            removed += before - mapping.len();
            !mapping.is_empty()
        });
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Form ids with at least one mapped field.
    pub fn form_ids(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }
}

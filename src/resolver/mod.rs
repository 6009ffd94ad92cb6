use crate::graph::{Form, Graph};
use crate::prefill::PrefillSource;
use ahash::AHashSet;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use tracing::debug;

pub mod catalog;

pub use catalog::global_sources;

/// How a group of sources relates to the selected form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceGroupKind {
    Direct,
    Transitive,
    Global,
}

impl SourceGroupKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceGroupKind::Direct => "Direct dependencies",
            SourceGroupKind::Transitive => "Transitive dependencies",
            SourceGroupKind::Global => "Global data",
        }
    }
}

impl fmt::Display for SourceGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A field offered as a source. Types are not carried; only display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceField {
    pub id: String,
    pub label: String,
}

/// A form (or global pseudo-form) offered as a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceForm {
    pub id: String,
    pub name: String,
    pub fields: Vec<SourceField>,
}

impl SourceForm {
    fn project(form: &Form) -> Self {
        Self {
            id: form.id.clone(),
            name: form.name.clone(),
            fields: form
                .fields
                .iter()
                .map(|field| SourceField {
                    id: field.id.clone(),
                    label: if field.label.is_empty() {
                        field.id.clone()
                    } else {
                        field.label.clone()
                    },
                })
                .collect(),
        }
    }

    /// Builds the prefill source for one of this form's fields.
    ///
    /// The variant follows `kind`, so a global property and a form field
    /// with the same label stay distinct.
    pub fn candidate(&self, kind: SourceGroupKind, field_id: &str) -> Option<PrefillSource> {
        let field = self.fields.iter().find(|f| f.id == field_id)?;
        let label = format!("{}.{}", self.name, field.id);
        Some(match kind {
            SourceGroupKind::Global => PrefillSource::Global { label },
            SourceGroupKind::Direct | SourceGroupKind::Transitive => PrefillSource::FormField {
                form_id: self.id.clone(),
                field_id: field.id.clone(),
                label,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceGroup {
    pub kind: SourceGroupKind,
    pub forms: Vec<SourceForm>,
}

impl SourceGroup {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn form(&self, form_id: &str) -> Option<&SourceForm> {
        self.forms.iter().find(|f| f.id == form_id)
    }

    pub fn contains(&self, form_id: &str) -> bool {
        self.form(form_id).is_some()
    }

    pub fn form_ids(&self) -> Vec<&str> {
        self.forms.iter().map(|f| f.id.as_str()).collect()
    }

    /// Shorthand for `self.form(form_id)?.candidate(self.kind, field_id)`.
    pub fn candidate(&self, form_id: &str, field_id: &str) -> Option<PrefillSource> {
        self.form(form_id)?.candidate(self.kind, field_id)
    }
}

/// The three source groups for a selected form, always in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceGroups {
    pub direct: SourceGroup,
    pub transitive: SourceGroup,
    pub global: SourceGroup,
}

impl SourceGroups {
    fn new(direct: Vec<SourceForm>, transitive: Vec<SourceForm>) -> Self {
        Self {
            direct: SourceGroup {
                kind: SourceGroupKind::Direct,
                forms: direct,
            },
            transitive: SourceGroup {
                kind: SourceGroupKind::Transitive,
                forms: transitive,
            },
            global: SourceGroup {
                kind: SourceGroupKind::Global,
                forms: global_sources(),
            },
        }
    }

    /// Direct and transitive groups empty; global group populated.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceGroup> {
        [&self.direct, &self.transitive, &self.global].into_iter()
    }

    pub fn group(&self, kind: SourceGroupKind) -> &SourceGroup {
        match kind {
            SourceGroupKind::Direct => &self.direct,
            SourceGroupKind::Transitive => &self.transitive,
            SourceGroupKind::Global => &self.global,
        }
    }
}

/// Groups the prefill sources available to `selected_form_id`.
///
/// Direct sources are forms with an edge straight into the selected form.
/// Transitive sources are every other ancestor, found by walking prerequisite
/// edges backwards with a worklist and a visited set, so each ancestor appears
/// once however many paths lead to it. The selected form is never offered as
/// its own source. Forms referenced by edges but absent from the graph are
/// skipped.
pub fn group_sources(graph: &Graph, selected_form_id: Option<&str>) -> SourceGroups {
    let Some(selected) = selected_form_id else {
        return SourceGroups::empty();
    };
    if graph.is_empty() {
        return SourceGroups::empty();
    }

    let direct_ids: Vec<&str> = graph
        .prerequisites_of(selected)
        .filter(|id| *id != selected)
        .unique()
        .collect();
    let direct_set: AHashSet<&str> = direct_ids.iter().copied().collect();

    let transitive_ids: Vec<&str> = ancestors(graph, selected)
        .into_iter()
        .filter(|id| !direct_set.contains(id))
        .collect();

    debug!(
        "Sources for '{}': {} direct, {} transitive",
        selected,
        direct_ids.len(),
        transitive_ids.len()
    );

    let project = |ids: Vec<&str>| -> Vec<SourceForm> {
        ids.into_iter()
            .filter_map(|id| graph.form(id))
            .map(SourceForm::project)
            .collect()
    };

    SourceGroups::new(project(direct_ids), project(transitive_ids))
}

/// Every form reachable backwards from `form_id`, in discovery order, excluding `form_id`.
pub fn ancestors<'a>(graph: &'a Graph, form_id: &'a str) -> Vec<&'a str> {
    let incoming = graph.incoming_index();
    let mut visited: AHashSet<&str> = AHashSet::new();
    let mut discovered: Vec<&str> = Vec::new();
    let mut stack: Vec<&str> = vec![form_id];

    // Marked on pop, so a cycle back to the start node is skipped and the
    // discovery order is a depth-first preorder.
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        if current != form_id {
            discovered.push(current);
        }
        let Some(prerequisites) = incoming.get(current) else {
            continue;
        };
        // Reversed so the first edge is explored first.
        stack.extend(
            prerequisites
                .iter()
                .rev()
                .filter(|prerequisite| !visited.contains(*prerequisite)),
        );
    }

    discovered
}

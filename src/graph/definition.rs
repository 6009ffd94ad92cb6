use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// The type tag used when a field carries no type metadata.
pub const UNKNOWN_FIELD_TYPE: &str = "unknown";

/// The complete, canonical form dependency graph.
/// Both wire shapes normalize into this structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub forms: Vec<Form>,
    pub edges: Vec<Edge>,
}

/// A data-entry unit in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub name: String,
    pub fields: Vec<Field>,
}

/// A single field of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// `from` is a prerequisite of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Form {
    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn has_field(&self, field_id: &str) -> bool {
        self.field(field_id).is_some()
    }
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn form(&self, form_id: &str) -> Option<&Form> {
        self.forms.iter().find(|f| f.id == form_id)
    }

    pub fn contains_form(&self, form_id: &str) -> bool {
        self.form(form_id).is_some()
    }

    /// Forms with an edge directly into `form_id`, in edge order.
    /// Duplicate edges yield duplicate ids; callers dedupe.
    pub fn prerequisites_of<'a>(&'a self, form_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.to == form_id)
            .map(|e| e.from.as_str())
    }

    /// Index of `to -> [from]`, built once per traversal.
    pub(crate) fn incoming_index(&self) -> AHashMap<&str, Vec<&str>> {
        let mut incoming: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for edge in &self.edges {
            incoming
                .entry(edge.to.as_str())
                .or_default()
                .push(edge.from.as_str());
        }
        incoming
    }

    /// Returns the form ids along one cycle (first id repeated at the end), if any.
    ///
    /// The graph is expected to be acyclic; this exists so loaders can report
    /// the anomaly instead of resolving sources over it silently.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut outgoing: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for edge in &self.edges {
            outgoing
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
        }

        let mut done: AHashSet<&str> = AHashSet::new();
        let roots = self
            .forms
            .iter()
            .map(|f| f.id.as_str())
            .chain(self.edges.iter().map(|e| e.from.as_str()));

        for root in roots {
            if done.contains(root) {
                continue;
            }
            // Explicit DFS: each frame is (node, index of next child to visit).
            let mut path: Vec<&str> = vec![root];
            let mut on_path: AHashSet<&str> = AHashSet::from_iter([root]);
            let mut cursors: Vec<usize> = vec![0];

            while let Some(&node) = path.last() {
                let children = outgoing.get(node).map(Vec::as_slice).unwrap_or(&[]);
                let cursor = cursors.last_mut().map(|c| {
                    let current = *c;
                    *c += 1;
                    current
                });

                match cursor.and_then(|i| children.get(i)) {
                    Some(&child) if on_path.contains(child) => {
                        let start = path.iter().position(|n| *n == child).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|n| n.to_string()).collect();
                        cycle.push(child.to_string());
                        return Some(cycle);
                    }
                    Some(&child) if !done.contains(child) => {
                        path.push(child);
                        on_path.insert(child);
                        cursors.push(0);
                    }
                    Some(_) => {}
                    None => {
                        path.pop();
                        cursors.pop();
                        on_path.remove(node);
                        done.insert(node);
                    }
                }
            }
        }
        None
    }
}

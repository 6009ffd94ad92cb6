use crate::error::{FetchError, WorkspaceError};
use crate::fetch::GraphSource;
use crate::graph::{Form, Graph, normalize};
use crate::prefill::{PrefillMapping, PrefillSource, PrefillState};
use crate::resolver::{SourceGroups, group_sources};
use crate::session::SelectionSession;
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

/// Progress of the one graph load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Idle => write!(f, "idle"),
            LoadState::Loading => write!(f, "loading"),
            LoadState::Ready => write!(f, "success"),
            LoadState::Failed(message) => write!(f, "error ({})", message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkspaceOptions {
    /// Drop mappings whose form or field vanished when a new graph is applied.
    pub prune_on_reload: bool,
}

/// The single actor behind a prefill editor.
///
/// Owns the loaded graph, the selected form, the committed prefill state and
/// the current selection session. Every method runs to completion; the only
/// suspending step is [`Workspace::load`]. Before a graph is loaded all
/// queries operate on an empty graph.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    load_state: LoadState,
    graph: Graph,
    selected_form_id: Option<String>,
    prefill: PrefillState,
    session: SelectionSession,
    options: WorkspaceOptions,
}

impl Workspace {
    pub fn new(initial: PrefillState) -> Self {
        Self::with_options(initial, WorkspaceOptions::default())
    }

    pub fn with_options(initial: PrefillState, options: WorkspaceOptions) -> Self {
        Self {
            prefill: initial,
            options,
            ..Self::default()
        }
    }

    // --- Loading ---

    /// Fetches, normalizes and applies a graph. Failures end in [`LoadState::Failed`].
    pub async fn load<S: GraphSource>(&mut self, source: &S) -> &LoadState {
        self.begin_loading();
        let result = source.fetch().await;
        self.finish_loading(result)
    }

    pub fn begin_loading(&mut self) {
        info!("Loading graph");
        self.load_state = LoadState::Loading;
    }

    /// Applies the outcome of a fetch. A failure leaves graph, selection and
    /// prefill state as they were.
    pub fn finish_loading(&mut self, result: Result<Value, FetchError>) -> &LoadState {
        match result {
            Ok(payload) => {
                self.apply_graph(normalize(&payload));
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                warn!("Failed to load graph: {}", e);
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
        &self.load_state
    }

    /// Replaces the graph wholesale.
    pub fn apply_graph(&mut self, graph: Graph) {
        if let Some(cycle) = graph.find_cycle() {
            warn!(
                "Graph contains a dependency cycle: {}; sources along it are reported as ancestors",
                cycle.join(" -> ")
            );
        }

        if self.selected_form_id.is_none() {
            self.selected_form_id = graph.forms.first().map(|f| f.id.clone());
        }

        if self.options.prune_on_reload {
            let removed = self.prefill.prune(&graph);
            if removed > 0 {
                info!("Pruned {} stale prefill mappings", removed);
            }
        }

        info!(
            "Graph ready: {} forms, {} edges",
            graph.forms.len(),
            graph.edges.len()
        );
        self.graph = graph;
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn prefill(&self) -> &PrefillState {
        &self.prefill
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    // --- Selection ---

    pub fn select_form(&mut self, form_id: &str) -> Result<&Form, WorkspaceError> {
        if !self.graph.contains_form(form_id) {
            return Err(WorkspaceError::UnknownForm(form_id.to_string()));
        }
        if self.selected_form_id.as_deref() != Some(form_id) {
            self.session.cancel();
        }
        self.selected_form_id = Some(form_id.to_string());
        self.selected_form().ok_or(WorkspaceError::NoSelectedForm)
    }

    pub fn selected_form_id(&self) -> Option<&str> {
        self.selected_form_id.as_deref()
    }

    pub fn selected_form(&self) -> Option<&Form> {
        self.selected_form_id
            .as_deref()
            .and_then(|id| self.graph.form(id))
    }

    /// Source groups for the selected form.
    pub fn source_groups(&self) -> SourceGroups {
        group_sources(&self.graph, self.selected_form_id.as_deref())
    }

    /// Committed mapping of the selected form, restricted to fields that exist.
    pub fn visible_mapping(&self) -> PrefillMapping {
        match self.selected_form_id.as_deref() {
            Some(form_id) => self.prefill.visible(&self.graph, form_id),
            None => PrefillMapping::new(),
        }
    }

    // --- Session ---

    /// Starts choosing a source for a field of the selected form.
    pub fn open_field(&mut self, field_id: &str) -> Result<(), WorkspaceError> {
        let form = self.selected_form().ok_or(WorkspaceError::NoSelectedForm)?;
        if !form.has_field(field_id) {
            return Err(WorkspaceError::UnknownField {
                form_id: form.id.clone(),
                field_id: field_id.to_string(),
            });
        }
        self.session.open(field_id);
        Ok(())
    }

    pub fn highlight(&mut self, source: PrefillSource) -> Result<(), WorkspaceError> {
        Ok(self.session.highlight(source)?)
    }

    pub fn can_commit(&self) -> bool {
        self.session.can_commit(self.selected_form_id.as_deref())
    }

    pub fn commit(&mut self) -> Result<(), WorkspaceError> {
        self.session
            .commit(self.selected_form_id.as_deref(), &mut self.prefill)?;
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    /// Removes the selected form's mapping for `field_id`, if any.
    pub fn clear_field(&mut self, field_id: &str) -> Result<Option<PrefillSource>, WorkspaceError> {
        let form_id = self
            .selected_form_id
            .as_deref()
            .ok_or(WorkspaceError::NoSelectedForm)?;
        Ok(self.prefill.clear(form_id, field_id))
    }
}

use thiserror::Error;

/// Errors that can occur while fetching a raw graph payload from its upstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Failed to load graph: {status}")]
    Status { status: u16 },

    #[error("Failed to reach graph upstream: {0}")]
    Transport(String),

    #[error("Graph payload is not valid JSON: {0}")]
    Decode(String),

    #[error("Could not read graph payload: {0}")]
    Io(String),
}

/// Errors raised by selection session operations that are not currently offered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No field is being mapped")]
    NotOpen,

    #[error("No source is highlighted for field '{field_id}'")]
    NoHighlightedSource { field_id: String },

    #[error("No form is selected")]
    NoSelectedForm,
}

/// Errors surfaced by the workspace when an action refers to something that is not loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("Form '{0}' is not part of the loaded graph")]
    UnknownForm(String),

    #[error("Field '{field_id}' does not exist on form '{form_id}'")]
    UnknownField { form_id: String, field_id: String },

    #[error("No form is selected")]
    NoSelectedForm,

    #[error(transparent)]
    Session(#[from] SessionError),
}

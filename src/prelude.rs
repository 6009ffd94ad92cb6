//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use journey_prefill::prelude::*;
//!
//! # async fn run_example() -> Result<()> {
//! let source = HttpGraphSource::new(&Config::from_env());
//! let mut workspace = Workspace::new(PrefillState::new());
//! workspace.load(&source).await;
//!
//! for group in workspace.source_groups().iter() {
//!     println!("{}: {} forms", group.label(), group.forms.len());
//! }
//! # Ok(())
//! # }
//! ```

// Canonical graph and normalization
pub use crate::graph::{Edge, Field, Form, Graph, IntoGraph, RawGraph, normalize};

// Source resolution
pub use crate::resolver::{
    SourceField, SourceForm, SourceGroup, SourceGroupKind, SourceGroups, group_sources,
};

// Prefill store and selection session
pub use crate::prefill::{PrefillMapping, PrefillSource, PrefillState};
pub use crate::session::SelectionSession;
pub use crate::workspace::{LoadState, Workspace, WorkspaceOptions};

// Loading
pub use crate::config::Config;
pub use crate::fetch::{FileGraphSource, GraphSource, HttpGraphSource, StaticGraphSource};

// Error types
pub use crate::error::{FetchError, SessionError, WorkspaceError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

//! # Journey Prefill - Form Dependency Graph Source Resolution
//!
//! Given a directed acyclic graph of forms, this crate works out which upstream
//! fields (and which global properties) may be used to prefill each field of a
//! selected form, and keeps the user's choices in a single prefill store.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Fetch a raw graph payload through a [`fetch::GraphSource`]
//!     (HTTP, file, or in-memory).
//! 2.  **Normalize**: [`graph::normalize`] turns either accepted wire shape into one
//!     canonical [`graph::Graph`]. Custom formats can implement [`graph::IntoGraph`].
//! 3.  **Resolve**: [`resolver::group_sources`] groups candidate sources for a
//!     selected form into direct, transitive, and global groups.
//! 4.  **Map**: A [`session::SelectionSession`] tracks the field being mapped and the
//!     highlighted candidate; committing writes into the [`prefill::PrefillState`].
//!
//! [`workspace::Workspace`] ties these together as one owned state object.
//!
//! ## Quick Start
//!
//! ```rust
//! use journey_prefill::prelude::*;
//! use serde_json::json;
//!
//! let payload = json!({
//!     "forms": [
//!         { "id": "A", "name": "Form A", "fields": [{ "id": "email" }] },
//!         { "id": "B", "name": "Form B", "fields": [{ "id": "email" }] },
//!         { "id": "C", "name": "Form C", "fields": [{ "id": "email" }] }
//!     ],
//!     "edges": [{ "from": "A", "to": "B" }, { "from": "B", "to": "C" }]
//! });
//!
//! let graph = normalize(&payload);
//! let groups = group_sources(&graph, Some("C"));
//! assert_eq!(groups.direct.form_ids(), vec!["B"]);
//! assert_eq!(groups.transitive.form_ids(), vec!["A"]);
//!
//! let mut store = PrefillState::new();
//! let mut session = SelectionSession::new();
//! session.open("email");
//! let source = groups.direct.candidate("B", "email").unwrap();
//! session.highlight(source.clone()).unwrap();
//! session.commit(Some("C"), &mut store).unwrap();
//! assert_eq!(store.get("C").get("email"), Some(&source));
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod prefill;
pub mod prelude;
pub mod resolver;
pub mod session;
pub mod workspace;

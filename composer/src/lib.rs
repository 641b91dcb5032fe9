//! Component-tree editing engine for the MJML visual editor.
//!
//! This crate owns everything the editor knows about document structure: the
//! containment schema, the document tree, the insert menu, default subtree
//! synthesis, and the repositioning of new nodes next to the selection. It
//! performs no I/O; the host layer drives it with selections and menu
//! activations and persists the resulting snapshots.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EditorCore`]: selection, commands, menu state |
//! | [`kind`] | Component kinds and the containment schema |
//! | [`doc`] | Owned document tree and component definitions |
//! | [`menu`] | Insert menu built from a resolved target |
//! | [`insert`] | Target resolution, insertion, and repositioning |
//! | [`synth`] | Default subtree per kind |
//! | [`validate`] | Whole-document containment check |
//! | [`export`] | Tree to MJML markup |
//! | [`parse`] | MJML markup to tree |

pub mod doc;
pub mod engine;
pub mod export;
pub mod insert;
pub mod kind;
pub mod menu;
pub mod parse;
pub mod synth;
pub mod validate;

pub use doc::{ComponentDef, ComponentTree, NodeId, NodePatch, NodeView};
pub use engine::{Action, EditorCore, EditorError};
pub use insert::{InsertError, InsertionTarget};
pub use kind::{ComponentKind, Tag};
pub use menu::{Menu, MenuItem};

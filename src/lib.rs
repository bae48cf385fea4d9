//! Document model and interaction core for a drag-and-drop form builder.
//!
//! This crate owns everything about a form that is not pixels: the field
//! schema, the document store that keeps the two-level field tree consistent,
//! the drag intent resolver that turns drop events into store mutations, the
//! renderer that maps fields to view trees in edit and preview mode, and the
//! properties editor that turns inspector edits into patches. The host UI is
//! responsible only for wiring pointer and input events to [`engine::EngineCore`]
//! and painting what it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] and the [`engine::Action`]s it emits |
//! | [`field`] | Field schema: kinds, per-kind props, templates |
//! | [`patch`] | Sparse field updates and their merge rules |
//! | [`doc`] | Document store with an id index over the field tree |
//! | [`selection`] | Active-field tracking |
//! | [`placement`] | Drag sources, drop targets, and the gesture state machine |
//! | [`render`] | View trees for edit and preview mode, input changes |
//! | [`properties`] | Kind-gated property editing |
//! | [`preview`] | Answer store backing preview mode |
//! | [`ids`] | Field id generation |
//! | [`consts`] | Template defaults and editor ranges |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod field;
pub mod ids;
pub mod patch;
pub mod placement;
pub mod preview;
pub mod properties;
pub mod render;
pub mod selection;

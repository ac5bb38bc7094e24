//! Interactive column resizing for document-model tables rendered with egui.
//!
//! A drag on the boundary between two columns shows a guide line that follows
//! the pointer, clamped to a minimum column width, and on release writes the
//! new width back into the document model. The model stores widths per cell
//! and renders a column as wide as its widest cell, so the write fans out to
//! the cell at the same ordinal index in every row; anything less would let a
//! stale wider cell silently override the resize.
//!
//! The crate is split along the host boundary:
//! * [`TableModel`] and [`ViewTree`] describe the document model and the
//!   rendered tree the host owns.
//! * [`ResizeController`] is the pointer-event state machine
//!   (idle ⇄ resizing), with trailing-edge coalescing of move events.
//! * [`apply_column_width`] fans a width out across a column.
//! * [`ResizableGrid`] wires everything to an [`egui::Ui`], with
//!   [`TableTree`] as a ready-made in-memory model.
//!
//! Hosts embedding their own rich-text framework implement the two boundary
//! traits and a [`SelectionGate`] for whatever input mode competes with the
//! drag, then feed [`PointerEvent`]s to the controller.

#![cfg_attr(feature = "document-features", doc = document_features::document_features!())]

mod controller;
mod gate;
mod model;
mod propagate;
mod table;
mod throttle;
mod view;

pub use controller::{GuideLine, PointerEvent, ResizeConfig, ResizeController};
pub use gate::{SelectionGate, SharedGate};
pub use model::{
    NodeId, NodeKind, ResizeError, TableModel, TableTree, ancestor_of_kind, format_px, parse_px,
};
pub use propagate::{MIN_CELL_WIDTH, apply_column_width, rendered_column_widths};
pub use table::{GridElement, GridOutput, GridView, ResizableGrid};
pub use throttle::MoveCoalescer;
pub use view::{ElementKind, ViewTree, ancestor_element};

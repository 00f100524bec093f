//! The reorder engine.
//!
//! Three operations share one renumbering policy and one undo contract:
//! - `reorder_items`: move within one container, dense renumber
//! - `reorder_items_with_edge`: same, but the destination is "before/after
//!   this target item"
//! - `move_row`: move a row to another container, shifting siblings on both
//!   sides
//!
//! Every operation validates its inputs before touching the arena, so an
//! `Err` always means nothing was mutated.
pub mod edge;
pub mod move_row;
pub mod reorder;

pub use edge::{can_reorder_by_closest_edge, reorder_destination_index, reorder_items_with_edge};
pub use move_row::{move_row, MoveRow};
pub use reorder::{reorder_items, Reordered};

use crate::types::ItemKind;
use crate::undo::Operation;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("Index {index} out of range for list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Item not found: {uid}")]
    ItemNotFound { uid: String },

    #[error("Item {uid} is not in container {container}")]
    NotInContainer { uid: String, container: String },

    #[error("Source and destination are the same container: {container}")]
    SameContainer { container: String },

    #[error("Undo already applied")]
    UndoConsumed,

    #[error("Undo is stale: items changed since the {operation:?} was applied")]
    StaleUndo { operation: Operation },

    #[error("Undo recorded for {expected:?} items, applied to {actual:?} items")]
    KindMismatch { expected: ItemKind, actual: ItemKind },
}

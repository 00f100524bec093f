//! Optimistic reorder engine for kanban-style drag and drop.
//!
//! Dragging a card, column or checklist item computes the new order
//! deterministically, applies it to the caller's in-memory models right
//! away, and hands back an [`UndoRecord`] so a failed server round trip can
//! be reverted without re-fetching.
//!
//! ## Overview
//!
//! - **Arenas** - caller-owned uid -> item tables; the engine only writes
//!   `order` and the container uid of items that already exist
//! - **Engine** - same-container reorder, edge-aware reorder, cross-container
//!   move; all keep every touched container densely numbered `0..n`
//! - **Undo records** - one-shot, fingerprinted values instead of closures
//! - **Drop monitor** - classifies the drag source and drop target and picks
//!   the operation
//!
//! ## Threading
//!
//! Everything here assumes a single-threaded event loop. One gesture is
//! processed to completion synchronously; only persistence is async.
//!
//! ```rust,no_run
//! use reorder_core::{Board, DropMonitor, Edge, Orderable, ItemKind};
//!
//! # struct Column { uid: String, order: usize }
//! # impl Orderable for Column {
//! #     const KIND: ItemKind = ItemKind::Column;
//! #     fn uid(&self) -> &str { &self.uid }
//! #     fn order(&self) -> usize { self.order }
//! #     fn set_order(&mut self, order: usize) { self.order = order }
//! # }
//! # fn example(board: &mut Board<Column, Column>) {
//! let mut monitor = DropMonitor::default();
//! monitor.begin_drag(monitor.column_payload("done")).ok();
//! let target = monitor.column_target("todo", Some(Edge::Top));
//! if let Some(_commit) = monitor.drop_on(board, Some(&target)).into_commit() {
//!     // send commit.change to the server, keep commit.undo for a rollback
//! }
//! # }
//! ```

pub mod board;
pub mod commit;
pub mod dnd;
pub mod engine;
pub mod types;
pub mod undo;

pub use board::Board;
pub use commit::{settle_commit, OrderPersistence, PersistError, Settled};
pub use dnd::auto_scroll::{can_scroll, AutoScrollOptions, ScrollSpeed};
pub use dnd::monitor::{
    ColumnReorderMode, Commit, DropMonitor, DropOutcome, GestureId, MonitorOptions, SkipReason,
};
pub use dnd::{DndScope, DragPayload, DropTargetData};
pub use engine::{
    can_reorder_by_closest_edge, move_row, reorder_destination_index, reorder_items,
    reorder_items_with_edge, MoveRow, ReorderError, Reordered,
};
pub use types::{Arena, Edge, FinishIndex, ItemKind, OrderChange, Orderable};
pub use undo::{Operation, PriorSlot, UndoRecord};

/// Drop monitor: turns one finished drag gesture into at most one engine
/// operation.
///
/// Gesture lifecycle: IDLE -> DRAGGING (`begin_drag`) -> DROPPED
/// (`drop_on`, exactly once) -> back to IDLE. The outcome of a drop is
/// either a `Commit` (the board was already mutated optimistically; persist
/// `change` and keep `undo` for a rollback) or a `SkipReason` (nothing was
/// touched).
use std::mem;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::engine::{
    can_reorder_by_closest_edge, move_row, reorder_items, reorder_items_with_edge, MoveRow,
    ReorderError,
};
use crate::types::{Edge, FinishIndex, ItemKind, OrderChange, Orderable};
use crate::undo::UndoRecord;

use super::auto_scroll::can_scroll;
use super::{
    extract_closest_edge, is_column_droppable_target_data, is_dragging_a_column,
    is_dragging_a_row, is_row_droppable_target_data, DndScope, DragPayload, DropTargetData,
};

/// How columns are reordered among themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnReorderMode {
    /// Take the target column's slot.
    Index,
    /// Land before or after the target column, with indicator lines.
    #[default]
    ClosestEdge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorOptions {
    #[serde(default)]
    pub column_reorder: ColumnReorderMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GestureId(u64);

impl std::fmt::Display for GestureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Why a drop (or drag start) did nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("No drag in progress")]
    NotDragging,

    #[error("A drag is already in progress")]
    AlreadyDragging,

    #[error("Payload belongs to another drag system")]
    ForeignPayload,

    #[error("Dropped outside any target")]
    NoDropTarget,

    #[error("Drop target belongs to another drag system")]
    ForeignTarget,

    #[error("Dragged item no longer exists: {uid}")]
    UnknownSource { uid: String },

    #[error("Drop target no longer exists: {uid}")]
    UnknownTarget { uid: String },

    #[error("A {source_kind:?} cannot be dropped on a {target_kind:?}")]
    UnsupportedTarget {
        source_kind: ItemKind,
        target_kind: ItemKind,
    },

    #[error("Drop would not change the order")]
    NoOp,

    #[error("Move rejected: {0}")]
    Rejected(#[from] ReorderError),
}

/// An optimistically applied move awaiting persistence.
#[derive(Debug)]
pub struct Commit {
    pub gesture: GestureId,
    pub change: OrderChange,
    pub undo: UndoRecord,
}

#[derive(Debug)]
pub enum DropOutcome {
    Applied(Commit),
    Skipped(SkipReason),
}

impl DropOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DropOutcome::Applied(_))
    }

    pub fn into_commit(self) -> Option<Commit> {
        match self {
            DropOutcome::Applied(commit) => Some(commit),
            DropOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Dragging {
        gesture: GestureId,
        payload: DragPayload,
    },
}

/// Event-thread-only: holds the in-flight gesture and mutates the board
/// passed to `drop_on`.
#[derive(Debug)]
pub struct DropMonitor {
    scope: DndScope,
    options: MonitorOptions,
    phase: Phase,
    next_gesture: u64,
}

impl DropMonitor {
    pub fn new(options: MonitorOptions) -> Self {
        Self {
            scope: DndScope::new(),
            options,
            phase: Phase::Idle,
            next_gesture: 1,
        }
    }

    pub fn scope(&self) -> DndScope {
        self.scope
    }

    pub fn options(&self) -> MonitorOptions {
        self.options
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn dragging(&self) -> Option<&DragPayload> {
        match &self.phase {
            Phase::Dragging { payload, .. } => Some(payload),
            Phase::Idle => None,
        }
    }

    pub fn current_gesture(&self) -> Option<GestureId> {
        match &self.phase {
            Phase::Dragging { gesture, .. } => Some(*gesture),
            Phase::Idle => None,
        }
    }

    pub fn can_scroll(&self, source: &DragPayload) -> bool {
        can_scroll(self.scope, source)
    }

    pub fn row_payload(&self, uid: impl Into<String>) -> DragPayload {
        DragPayload::row(self.scope, uid)
    }

    pub fn column_payload(&self, uid: impl Into<String>) -> DragPayload {
        DragPayload::column(self.scope, uid)
    }

    pub fn row_target(&self, uid: impl Into<String>, closest_edge: Option<Edge>) -> DropTargetData {
        DropTargetData::row(self.scope, uid, closest_edge)
    }

    pub fn column_target(
        &self,
        uid: impl Into<String>,
        closest_edge: Option<Edge>,
    ) -> DropTargetData {
        DropTargetData::column(self.scope, uid, closest_edge)
    }

    /// IDLE -> DRAGGING.
    pub fn begin_drag(&mut self, payload: DragPayload) -> Result<GestureId, SkipReason> {
        if !is_dragging_a_row(self.scope, &payload) && !is_dragging_a_column(self.scope, &payload) {
            return Err(SkipReason::ForeignPayload);
        }
        if self.is_dragging() {
            return Err(SkipReason::AlreadyDragging);
        }
        let gesture = GestureId(self.next_gesture);
        self.next_gesture += 1;
        log::debug!(
            "[reorder.monitor.drag] {} started on {:?} {}",
            gesture,
            payload.kind,
            payload.uid
        );
        self.phase = Phase::Dragging { gesture, payload };
        Ok(gesture)
    }

    /// DRAGGING -> IDLE without a drop (escape, drop outside the window).
    pub fn cancel_drag(&mut self) -> Option<GestureId> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging { gesture, .. } => {
                log::debug!("[reorder.monitor.cancel] {} cancelled", gesture);
                Some(gesture)
            }
            Phase::Idle => None,
        }
    }

    /// Finish the current gesture on `target` (the innermost drop target, or
    /// `None` when released over nothing).
    pub fn drop_on<C: Orderable, R: Orderable>(
        &mut self,
        board: &mut Board<C, R>,
        target: Option<&DropTargetData>,
    ) -> DropOutcome {
        let Phase::Dragging { gesture, payload } = mem::replace(&mut self.phase, Phase::Idle)
        else {
            return DropOutcome::Skipped(SkipReason::NotDragging);
        };

        let result = match target {
            None => Err(SkipReason::NoDropTarget),
            Some(target) if target.scope != self.scope => Err(SkipReason::ForeignTarget),
            Some(target) => match payload.kind {
                ItemKind::Row => self.drop_row(board, &payload.uid, target),
                ItemKind::Column => self.drop_column(board, &payload.uid, target),
            },
        };

        match result {
            Ok((change, undo)) => {
                log::info!(
                    "[reorder.monitor.drop] {} applied: {} -> order {} in {}",
                    gesture,
                    change.item_uid,
                    change.order,
                    change.parent_uid.as_deref().unwrap_or("same container")
                );
                DropOutcome::Applied(Commit {
                    gesture,
                    change,
                    undo,
                })
            }
            Err(reason) => {
                log::debug!("[reorder.monitor.drop] {} skipped: {}", gesture, reason);
                DropOutcome::Skipped(reason)
            }
        }
    }

    fn drop_row<C: Orderable, R: Orderable>(
        &self,
        board: &mut Board<C, R>,
        uid: &str,
        target: &DropTargetData,
    ) -> Result<(OrderChange, UndoRecord), SkipReason> {
        let source_column = board
            .rows
            .get(uid)
            .and_then(|row| row.container_uid())
            .map(str::to_string)
            .ok_or_else(|| SkipReason::UnknownSource {
                uid: uid.to_string(),
            })?;

        if is_row_droppable_target_data(self.scope, target) {
            let (target_column, target_order) = board
                .rows
                .get(&target.uid)
                .and_then(|row| row.container_uid().map(|c| (c.to_string(), row.order())))
                .ok_or_else(|| SkipReason::UnknownTarget {
                    uid: target.uid.clone(),
                })?;
            let edge = extract_closest_edge(target);

            if target_column == source_column {
                let list = board.rows_in(&source_column);
                let start = position_of(&list, uid)?;
                let index_of_target = list
                    .iter()
                    .position(|u| u == &target.uid)
                    .ok_or_else(|| SkipReason::UnknownTarget {
                        uid: target.uid.clone(),
                    })?;
                if !can_reorder_by_closest_edge(start, index_of_target, edge) {
                    return Err(SkipReason::NoOp);
                }
                let reordered =
                    reorder_items_with_edge(&mut board.rows, &list, start, index_of_target, edge)?;
                let order = order_of(&board.rows, uid);
                return Ok((change::<R>(uid, order, None), reordered.undo));
            }

            let final_index = target_order + usize::from(edge == Some(Edge::Bottom));
            let undo = move_row(
                &mut board.rows,
                MoveRow {
                    dragging_uid: uid,
                    source_column_uid: &source_column,
                    destination_column_uid: &target_column,
                    target_index: FinishIndex::Index(final_index),
                },
            )?;
            return Ok((change::<R>(uid, final_index, Some(target_column)), undo));
        }

        if is_column_droppable_target_data(self.scope, target) {
            if !board.columns.contains(&target.uid) {
                return Err(SkipReason::UnknownTarget {
                    uid: target.uid.clone(),
                });
            }

            if target.uid == source_column {
                let list = board.rows_in(&source_column);
                let start = position_of(&list, uid)?;
                if start + 1 == list.len() {
                    return Err(SkipReason::NoOp);
                }
                let reordered = reorder_items(&mut board.rows, &list, start, FinishIndex::Last)?;
                let order = order_of(&board.rows, uid);
                return Ok((change::<R>(uid, order, None), reordered.undo));
            }

            let undo = move_row(
                &mut board.rows,
                MoveRow {
                    dragging_uid: uid,
                    source_column_uid: &source_column,
                    destination_column_uid: &target.uid,
                    target_index: FinishIndex::Last,
                },
            )?;
            let order = order_of(&board.rows, uid);
            return Ok((change::<R>(uid, order, Some(target.uid.clone())), undo));
        }

        Err(SkipReason::UnsupportedTarget {
            source_kind: ItemKind::Row,
            target_kind: target.kind,
        })
    }

    fn drop_column<C: Orderable, R: Orderable>(
        &self,
        board: &mut Board<C, R>,
        uid: &str,
        target: &DropTargetData,
    ) -> Result<(OrderChange, UndoRecord), SkipReason> {
        if !is_column_droppable_target_data(self.scope, target) {
            return Err(SkipReason::UnsupportedTarget {
                source_kind: ItemKind::Column,
                target_kind: target.kind,
            });
        }
        let list = board.column_list();
        let start = position_of(&list, uid)?;
        let index_of_target = list
            .iter()
            .position(|u| u == &target.uid)
            .ok_or_else(|| SkipReason::UnknownTarget {
                uid: target.uid.clone(),
            })?;

        let reordered = match self.options.column_reorder {
            ColumnReorderMode::Index => {
                if start == index_of_target {
                    return Err(SkipReason::NoOp);
                }
                reorder_items(
                    &mut board.columns,
                    &list,
                    start,
                    FinishIndex::Index(index_of_target),
                )?
            }
            ColumnReorderMode::ClosestEdge => {
                let edge = extract_closest_edge(target);
                if !can_reorder_by_closest_edge(start, index_of_target, edge) {
                    return Err(SkipReason::NoOp);
                }
                reorder_items_with_edge(&mut board.columns, &list, start, index_of_target, edge)?
            }
        };
        let order = order_of(&board.columns, uid);
        Ok((change::<C>(uid, order, None), reordered.undo))
    }
}

impl Default for DropMonitor {
    fn default() -> Self {
        Self::new(MonitorOptions::default())
    }
}

fn position_of(list: &[String], uid: &str) -> Result<usize, SkipReason> {
    list.iter()
        .position(|u| u == uid)
        .ok_or_else(|| SkipReason::UnknownSource {
            uid: uid.to_string(),
        })
}

fn order_of<T: Orderable>(arena: &crate::types::Arena<T>, uid: &str) -> usize {
    arena.get(uid).map(|item| item.order()).unwrap_or_default()
}

fn change<T: Orderable>(uid: &str, order: usize, parent_uid: Option<String>) -> OrderChange {
    OrderChange {
        kind: T::KIND,
        item_uid: uid.to_string(),
        order,
        parent_uid,
    }
}

//! Drag classification: payloads, drop targets and the predicates the
//! monitor uses to tell rows from columns.
//!
//! Every payload and target carries the `DndScope` of the monitor that
//! created it, so data from an unrelated drag system on the same surface is
//! never mistaken for ours.
pub mod auto_scroll;
pub mod monitor;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::types::{Edge, ItemKind};

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

/// Unique marker of one drag system instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DndScope(u64);

impl DndScope {
    pub fn new() -> Self {
        Self(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for DndScope {
    fn default() -> Self {
        Self::new()
    }
}

/// What is being dragged. Refers to the live item by uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub scope: DndScope,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub uid: String,
}

impl DragPayload {
    pub fn row(scope: DndScope, uid: impl Into<String>) -> Self {
        Self {
            scope,
            kind: ItemKind::Row,
            uid: uid.into(),
        }
    }

    pub fn column(scope: DndScope, uid: impl Into<String>) -> Self {
        Self {
            scope,
            kind: ItemKind::Column,
            uid: uid.into(),
        }
    }
}

/// What the pointer was over when the drag ended.
///
/// A row target is a specific row; a column target is either a column
/// header (column-on-column) or the empty body of a column (row-on-column,
/// meaning "append").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTargetData {
    pub scope: DndScope,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closest_edge: Option<Edge>,
}

impl DropTargetData {
    pub fn row(scope: DndScope, uid: impl Into<String>, closest_edge: Option<Edge>) -> Self {
        Self {
            scope,
            kind: ItemKind::Row,
            uid: uid.into(),
            closest_edge,
        }
    }

    pub fn column(scope: DndScope, uid: impl Into<String>, closest_edge: Option<Edge>) -> Self {
        Self {
            scope,
            kind: ItemKind::Column,
            uid: uid.into(),
            closest_edge,
        }
    }
}

pub fn is_dragging_a_row(scope: DndScope, source: &DragPayload) -> bool {
    source.scope == scope && source.kind == ItemKind::Row
}

pub fn is_dragging_a_column(scope: DndScope, source: &DragPayload) -> bool {
    source.scope == scope && source.kind == ItemKind::Column
}

pub fn is_row_droppable_target_data(scope: DndScope, data: &DropTargetData) -> bool {
    data.scope == scope && data.kind == ItemKind::Row
}

pub fn is_column_droppable_target_data(scope: DndScope, data: &DropTargetData) -> bool {
    data.scope == scope && data.kind == ItemKind::Column
}

pub fn extract_closest_edge(data: &DropTargetData) -> Option<Edge> {
    data.closest_edge
}

//! Undo records: the compensation for one optimistic reorder.
//!
//! A record is a plain value (kind of operation plus a before-state
//! snapshot), created at drop time and applied at most once if persistence
//! fails. Applying twice is refused with `ReorderError::UndoConsumed`.
//! Applying after something else changed the same containers is refused with
//! `ReorderError::StaleUndo`; `force_apply` skips that check.
pub mod fingerprint;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::ReorderError;
use crate::types::{renumber_list, Arena, ItemKind, Orderable};
use fingerprint::OrderFingerprint;

/// Which engine operation produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Reorder,
    EdgeReorder,
    Move,
}

/// Pre-move state of one item touched by a cross-container move.
/// `container_uid` is only set for the dragged item; siblings that were
/// shifted kept their container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorSlot {
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_uid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Snapshot {
    /// Same-container move: the list after the move plus the index pair.
    /// Undo moves `finish_index` back to `start_index` and renumbers.
    #[serde(rename_all = "camelCase")]
    Mirror {
        list: Vec<String>,
        start_index: usize,
        finish_index: usize,
    },
    /// Cross-container move: uid -> state before the move.
    Prior { slots: BTreeMap<String, PriorSlot> },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoRecord {
    operation: Operation,
    kind: ItemKind,
    snapshot: Snapshot,
    /// Containers whose full membership the fingerprint covers.
    containers: Vec<Option<String>>,
    fingerprint: OrderFingerprint,
    created_at_ms: i64,
    #[serde(default)]
    consumed: bool,
}

impl UndoRecord {
    pub(crate) fn mirror<T: Orderable>(
        arena: &Arena<T>,
        operation: Operation,
        list: Vec<String>,
        start_index: usize,
        finish_index: usize,
    ) -> Self {
        let container = list
            .first()
            .and_then(|uid| arena.get(uid))
            .and_then(|item| item.container_uid())
            .map(str::to_string);
        let containers = vec![container];
        let fingerprint = OrderFingerprint::capture(arena, &containers);
        Self {
            operation,
            kind: T::KIND,
            snapshot: Snapshot::Mirror {
                list,
                start_index,
                finish_index,
            },
            containers,
            fingerprint,
            created_at_ms: chrono::Utc::now().timestamp_millis(),
            consumed: false,
        }
    }

    pub(crate) fn prior<T: Orderable>(
        arena: &Arena<T>,
        slots: BTreeMap<String, PriorSlot>,
        containers: Vec<Option<String>>,
    ) -> Self {
        let fingerprint = OrderFingerprint::capture(arena, &containers);
        Self {
            operation: Operation::Move,
            kind: T::KIND,
            snapshot: Snapshot::Prior { slots },
            containers,
            fingerprint,
            created_at_ms: chrono::Utc::now().timestamp_millis(),
            consumed: false,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn item_kind(&self) -> ItemKind {
        self.kind
    }

    pub fn created_at_ms(&self) -> i64 {
        self.created_at_ms
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Uids whose state this record restores.
    pub fn affected_uids(&self) -> Vec<&str> {
        match &self.snapshot {
            Snapshot::Mirror { list, .. } => list.iter().map(String::as_str).collect(),
            Snapshot::Prior { slots } => slots.keys().map(String::as_str).collect(),
        }
    }

    /// Pre-move slot of `uid` for cross-container records.
    pub fn prior_slot(&self, uid: &str) -> Option<&PriorSlot> {
        match &self.snapshot {
            Snapshot::Prior { slots } => slots.get(uid),
            Snapshot::Mirror { .. } => None,
        }
    }

    pub fn containers(&self) -> &[Option<String>] {
        &self.containers
    }

    /// True when every container the record touches still looks exactly as
    /// the optimistic apply left it, membership included.
    pub fn is_current<T: Orderable>(&self, arena: &Arena<T>) -> bool {
        OrderFingerprint::capture(arena, &self.containers) == self.fingerprint
    }

    /// Restore the before-state. Returns the restored list for same-container
    /// records, or the restored uids (sorted) for cross-container records.
    pub fn apply<T: Orderable>(&mut self, arena: &mut Arena<T>) -> Result<Vec<String>, ReorderError> {
        self.check_usable::<T>()?;
        if !self.is_current(arena) {
            log::warn!(
                "[reorder.undo.stale] {:?} undo refused: affected containers changed since apply",
                self.operation
            );
            return Err(ReorderError::StaleUndo {
                operation: self.operation,
            });
        }
        Ok(self.restore(arena))
    }

    /// Restore without the staleness check. Items that were deleted in the
    /// meantime are skipped.
    pub fn force_apply<T: Orderable>(
        &mut self,
        arena: &mut Arena<T>,
    ) -> Result<Vec<String>, ReorderError> {
        self.check_usable::<T>()?;
        Ok(self.restore(arena))
    }

    fn check_usable<T: Orderable>(&self) -> Result<(), ReorderError> {
        if self.consumed {
            return Err(ReorderError::UndoConsumed);
        }
        if T::KIND != self.kind {
            return Err(ReorderError::KindMismatch {
                expected: self.kind,
                actual: T::KIND,
            });
        }
        Ok(())
    }

    fn restore<T: Orderable>(&mut self, arena: &mut Arena<T>) -> Vec<String> {
        self.consumed = true;
        let restored = match &self.snapshot {
            Snapshot::Mirror {
                list,
                start_index,
                finish_index,
            } => {
                let mut list = list.clone();
                if *finish_index < list.len() {
                    let uid = list.remove(*finish_index);
                    list.insert((*start_index).min(list.len()), uid);
                }
                renumber_list(arena, &list);
                list
            }
            Snapshot::Prior { slots } => {
                for (uid, slot) in slots {
                    if let Some(item) = arena.get_mut(uid) {
                        item.set_order(slot.order);
                        if let Some(container) = &slot.container_uid {
                            item.set_container_uid(Some(container.clone()));
                        }
                    }
                }
                slots.keys().cloned().collect()
            }
        };
        log::info!(
            "[reorder.undo.apply] Restored {} item(s) after {:?}",
            restored.len(),
            self.operation
        );
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{move_row, reorder_items, MoveRow};
    use crate::types::test_support::*;
    use crate::types::FinishIndex;

    #[test]
    fn test_undo_twice_is_refused() {
        let mut arena = column_arena("todo", &["a", "b", "c"]);
        let list = arena.container_list(Some("todo"));
        let mut reordered = reorder_items(&mut arena, &list, 0, FinishIndex::Index(2)).unwrap();

        reordered.undo.apply(&mut arena).unwrap();
        assert!(reordered.undo.is_consumed());
        let before = snapshot(&arena, "todo");

        let second = reordered.undo.apply(&mut arena);
        assert_eq!(second, Err(ReorderError::UndoConsumed));
        assert_eq!(snapshot(&arena, "todo"), before);

        let forced = reordered.undo.force_apply(&mut arena);
        assert_eq!(forced, Err(ReorderError::UndoConsumed));
    }

    #[test]
    fn test_stale_undo_detected_and_forceable() {
        let mut arena = column_arena("todo", &["a", "b", "c", "d"]);
        let list = arena.container_list(Some("todo"));
        let mut first = reorder_items(&mut arena, &list, 0, FinishIndex::Index(2)).unwrap();
        assert!(first.undo.is_current(&arena));

        // A second gesture lands before the first one's rollback.
        let list = arena.container_list(Some("todo"));
        let _second = reorder_items(&mut arena, &list, 3, FinishIndex::Index(0)).unwrap();
        assert!(!first.undo.is_current(&arena));

        let result = first.undo.apply(&mut arena);
        assert_eq!(
            result,
            Err(ReorderError::StaleUndo {
                operation: Operation::Reorder
            })
        );
        assert!(!first.undo.is_consumed());

        first.undo.force_apply(&mut arena).unwrap();
        assert!(first.undo.is_consumed());
        assert!(arena.is_dense(Some("todo")));
    }

    fn two_column_arena() -> Arena<TestRow> {
        let mut arena = column_arena("src", &["x", "y", "z"]);
        arena.insert(make_row("p", 0, "dst"));
        arena.insert(make_row("q", 1, "dst"));
        arena.insert(make_row("w", 0, "inbox"));
        arena
    }

    fn move_to<'a>(uid: &'a str, from: &'a str, to: &'a str, index: FinishIndex) -> MoveRow<'a> {
        MoveRow {
            dragging_uid: uid,
            source_column_uid: from,
            destination_column_uid: to,
            target_index: index,
        }
    }

    #[test]
    fn test_append_into_destination_makes_move_stale() {
        let mut arena = two_column_arena();
        let mut first =
            move_row(&mut arena, move_to("y", "src", "dst", FinishIndex::Index(1))).unwrap();
        move_row(&mut arena, move_to("w", "inbox", "dst", FinishIndex::Last)).unwrap();
        let after_second = snapshot(&arena, "dst");

        assert!(!first.is_current(&arena));
        assert_eq!(
            first.apply(&mut arena),
            Err(ReorderError::StaleUndo {
                operation: Operation::Move
            })
        );
        assert!(!first.is_consumed());
        assert_eq!(snapshot(&arena, "dst"), after_second);
        assert!(arena.is_dense(Some("dst")));
    }

    #[test]
    fn test_append_into_source_makes_move_stale() {
        let mut arena = two_column_arena();
        let mut first =
            move_row(&mut arena, move_to("y", "src", "dst", FinishIndex::Index(1))).unwrap();
        move_row(&mut arena, move_to("w", "inbox", "src", FinishIndex::Last)).unwrap();

        assert!(matches!(
            first.apply(&mut arena),
            Err(ReorderError::StaleUndo { .. })
        ));
        assert_eq!(snapshot(&arena, "src"), pairs(&[("x", 0), ("z", 1), ("w", 2)]));
    }

    #[test]
    fn test_append_into_reordered_container_makes_undo_stale() {
        let mut arena = two_column_arena();
        let list = arena.container_list(Some("src"));
        let mut first = reorder_items(&mut arena, &list, 0, FinishIndex::Last).unwrap();
        move_row(&mut arena, move_to("w", "inbox", "src", FinishIndex::Last)).unwrap();

        assert!(matches!(
            first.undo.apply(&mut arena),
            Err(ReorderError::StaleUndo { .. })
        ));
        assert!(arena.is_dense(Some("src")));
    }

    #[test]
    fn test_unrelated_container_keeps_undo_current() {
        let mut arena = two_column_arena();
        arena.insert(make_row("v", 1, "inbox"));
        let mut first =
            move_row(&mut arena, move_to("y", "src", "dst", FinishIndex::Index(1))).unwrap();
        let list = arena.container_list(Some("inbox"));
        reorder_items(&mut arena, &list, 0, FinishIndex::Last).unwrap();

        assert!(first.is_current(&arena));
        first.apply(&mut arena).unwrap();
        assert_eq!(snapshot(&arena, "src"), pairs(&[("x", 0), ("y", 1), ("z", 2)]));
        assert_eq!(snapshot(&arena, "dst"), pairs(&[("p", 0), ("q", 1)]));
    }

    #[test]
    fn test_kind_mismatch_refused() {
        let mut rows = column_arena("todo", &["a", "b"]);
        let list = rows.container_list(Some("todo"));
        let mut reordered = reorder_items(&mut rows, &list, 0, FinishIndex::Last).unwrap();

        let mut columns: Arena<TestColumn> = Arena::new();
        columns.insert(make_column("todo", 0));
        let result = reordered.undo.apply(&mut columns);
        assert_eq!(
            result,
            Err(ReorderError::KindMismatch {
                expected: ItemKind::Row,
                actual: ItemKind::Column,
            })
        );
        assert!(!reordered.undo.is_consumed());
    }

    #[test]
    fn test_record_metadata() {
        let mut arena = column_arena("todo", &["x", "y"]);
        arena.insert(make_row("p", 0, "done"));
        let undo = move_row(
            &mut arena,
            MoveRow {
                dragging_uid: "x",
                source_column_uid: "todo",
                destination_column_uid: "done",
                target_index: FinishIndex::Index(0),
            },
        )
        .unwrap();

        assert_eq!(undo.operation(), Operation::Move);
        assert_eq!(undo.item_kind(), ItemKind::Row);
        assert!(undo.created_at_ms() > 0);
        assert_eq!(undo.affected_uids(), vec!["p", "x", "y"]);
        assert_eq!(
            undo.prior_slot("x"),
            Some(&PriorSlot {
                order: 0,
                container_uid: Some("todo".to_string()),
            })
        );
        assert_eq!(
            undo.prior_slot("y"),
            Some(&PriorSlot {
                order: 1,
                container_uid: None,
            })
        );
    }

    #[test]
    fn test_record_survives_serialization() {
        let mut arena = column_arena("todo", &["a", "b", "c"]);
        let list = arena.container_list(Some("todo"));
        let reordered = reorder_items(&mut arena, &list, 2, FinishIndex::Index(0)).unwrap();

        let json = serde_json::to_string(&reordered.undo).unwrap();
        assert!(json.contains("\"operation\":\"reorder\""));
        assert!(json.contains("\"type\":\"mirror\""));

        let mut restored: UndoRecord = serde_json::from_str(&json).unwrap();
        restored.apply(&mut arena).unwrap();
        assert_eq!(snapshot(&arena, "todo"), pairs(&[("a", 0), ("b", 1), ("c", 2)]));
    }
}

/// Cross-container move: a row leaves one column and lands in another.
///
/// Source side: rows after the dragged one shift up by one.
/// Destination side: rows at or after the target index shift down by one,
/// or nothing shifts when appending.
/// The undo restores every touched order, and the container of the dragged
/// row only.
use std::collections::BTreeMap;

use crate::types::{Arena, FinishIndex, Orderable};
use crate::undo::{PriorSlot, UndoRecord};

use super::ReorderError;

#[derive(Debug, Clone, Copy)]
pub struct MoveRow<'a> {
    pub dragging_uid: &'a str,
    pub source_column_uid: &'a str,
    pub destination_column_uid: &'a str,
    pub target_index: FinishIndex,
}

/// Move a row between two different containers of the global row arena.
///
/// Fails without mutating when source and destination are the same
/// container (route those through `reorder_items`), when the row is missing
/// or not in the source, or when the target index is past the end of the
/// destination.
pub fn move_row<T: Orderable>(
    rows: &mut Arena<T>,
    mv: MoveRow<'_>,
) -> Result<UndoRecord, ReorderError> {
    if mv.source_column_uid == mv.destination_column_uid {
        return Err(ReorderError::SameContainer {
            container: mv.source_column_uid.to_string(),
        });
    }
    let dragged = rows.get(mv.dragging_uid).ok_or_else(|| ReorderError::ItemNotFound {
        uid: mv.dragging_uid.to_string(),
    })?;
    if dragged.container_uid() != Some(mv.source_column_uid) {
        return Err(ReorderError::NotInContainer {
            uid: mv.dragging_uid.to_string(),
            container: mv.source_column_uid.to_string(),
        });
    }
    let original_order = dragged.order();

    let destination_len = rows.container_len(Some(mv.destination_column_uid));
    if let FinishIndex::Index(index) = mv.target_index {
        if index > destination_len {
            return Err(ReorderError::IndexOutOfRange {
                index,
                len: destination_len,
            });
        }
    }

    let mut slots: BTreeMap<String, PriorSlot> = BTreeMap::new();

    // Close the gap in the source column.
    for row in rows.iter_mut() {
        if row.container_uid() == Some(mv.source_column_uid)
            && row.uid() != mv.dragging_uid
            && row.order() > original_order
        {
            slots.insert(
                row.uid().to_string(),
                PriorSlot {
                    order: row.order(),
                    container_uid: None,
                },
            );
            row.set_order(row.order() - 1);
        }
    }

    // Open a slot in the destination column.
    let new_order = match mv.target_index {
        FinishIndex::Last => rows
            .iter()
            .filter(|row| row.container_uid() == Some(mv.destination_column_uid))
            .map(|row| row.order() + 1)
            .max()
            .unwrap_or(0),
        FinishIndex::Index(index) => {
            for row in rows.iter_mut() {
                if row.container_uid() == Some(mv.destination_column_uid) && row.order() >= index {
                    slots.insert(
                        row.uid().to_string(),
                        PriorSlot {
                            order: row.order(),
                            container_uid: None,
                        },
                    );
                    row.set_order(row.order() + 1);
                }
            }
            index
        }
    };

    slots.insert(
        mv.dragging_uid.to_string(),
        PriorSlot {
            order: original_order,
            container_uid: Some(mv.source_column_uid.to_string()),
        },
    );
    if let Some(row) = rows.get_mut(mv.dragging_uid) {
        row.set_order(new_order);
        row.set_container_uid(Some(mv.destination_column_uid.to_string()));
    }

    log::info!(
        "[reorder.engine.move] {} {}#{} -> {}#{} ({} sibling(s) shifted)",
        mv.dragging_uid,
        mv.source_column_uid,
        original_order,
        mv.destination_column_uid,
        new_order,
        slots.len() - 1
    );

    Ok(UndoRecord::prior(
        rows,
        slots,
        vec![
            Some(mv.source_column_uid.to_string()),
            Some(mv.destination_column_uid.to_string()),
        ],
    ))
}

/// Same-container reorder with dense renumbering.
use crate::types::{renumber_list, Arena, FinishIndex, Orderable};
use crate::undo::{Operation, UndoRecord};

use super::ReorderError;

/// Result of a same-container reorder: the new display list and its undo.
#[derive(Debug)]
pub struct Reordered {
    pub list: Vec<String>,
    pub undo: UndoRecord,
}

/// Move `list[start_index]` to `finish` and rewrite every order in the list
/// to its new position.
///
/// `list` is the live container list sorted by order. Equal indices are a
/// harmless full rewrite; callers skip them before getting here.
pub fn reorder_items<T: Orderable>(
    arena: &mut Arena<T>,
    list: &[String],
    start_index: usize,
    finish: FinishIndex,
) -> Result<Reordered, ReorderError> {
    let finish_index = resolve_finish(list, finish)?;
    reorder_resolved(arena, list, start_index, finish_index, Operation::Reorder)
}

pub(crate) fn resolve_finish(list: &[String], finish: FinishIndex) -> Result<usize, ReorderError> {
    match finish {
        FinishIndex::Index(index) if index < list.len() => Ok(index),
        FinishIndex::Index(index) => Err(ReorderError::IndexOutOfRange {
            index,
            len: list.len(),
        }),
        FinishIndex::Last if !list.is_empty() => Ok(list.len() - 1),
        FinishIndex::Last => Err(ReorderError::IndexOutOfRange { index: 0, len: 0 }),
    }
}

pub(crate) fn reorder_resolved<T: Orderable>(
    arena: &mut Arena<T>,
    list: &[String],
    start_index: usize,
    finish_index: usize,
    operation: Operation,
) -> Result<Reordered, ReorderError> {
    if start_index >= list.len() {
        return Err(ReorderError::IndexOutOfRange {
            index: start_index,
            len: list.len(),
        });
    }
    if finish_index >= list.len() {
        return Err(ReorderError::IndexOutOfRange {
            index: finish_index,
            len: list.len(),
        });
    }
    if let Some(missing) = list.iter().find(|uid| !arena.contains(uid)) {
        return Err(ReorderError::ItemNotFound {
            uid: missing.clone(),
        });
    }

    let mut result = list.to_vec();
    let moved = result.remove(start_index);
    result.insert(finish_index, moved);
    let changed = renumber_list(arena, &result);

    log::info!(
        "[reorder.engine.reorder] {:?} {} -> {} ({} of {} orders rewritten)",
        operation,
        start_index,
        finish_index,
        changed,
        result.len()
    );

    let undo = UndoRecord::mirror(arena, operation, result.clone(), start_index, finish_index);
    Ok(Reordered { list: result, undo })
}

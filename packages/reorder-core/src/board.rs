/// The shared mutable arena pair a drag gesture operates on.
///
/// Columns live at the top level (no container); rows live inside columns.
/// The same shape covers board columns/cards and check-groups/checklist
/// items.
///
/// Single writer only: a `Board` is owned by the event thread and every
/// operation runs to completion before control returns to the event loop.
use crate::engine::ReorderError;
use crate::types::{Arena, ItemKind, Orderable};
use crate::undo::UndoRecord;

#[derive(Debug, Clone)]
pub struct Board<C, R> {
    pub columns: Arena<C>,
    pub rows: Arena<R>,
}

impl<C, R> Default for Board<C, R> {
    fn default() -> Self {
        Self {
            columns: Arena::default(),
            rows: Arena::default(),
        }
    }
}

impl<C: Orderable, R: Orderable> Board<C, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from loose items, e.g. an API response.
    pub fn from_parts(
        columns: impl IntoIterator<Item = C>,
        rows: impl IntoIterator<Item = R>,
    ) -> Self {
        let mut board = Self::new();
        for column in columns {
            board.columns.insert(column);
        }
        for row in rows {
            board.rows.insert(row);
        }
        board
    }

    /// Column uids in display order.
    pub fn column_list(&self) -> Vec<String> {
        self.columns.container_list(None)
    }

    /// Row uids of one column in display order.
    pub fn rows_in(&self, column_uid: &str) -> Vec<String> {
        self.rows.container_list(Some(column_uid))
    }

    /// Number of rows in a column, or of columns when `column_uid` is `None`.
    pub fn container_len(&self, column_uid: Option<&str>) -> usize {
        match column_uid {
            Some(uid) => self.rows.container_len(Some(uid)),
            None => self.columns.container_len(None),
        }
    }

    /// Apply an undo record to whichever arena it was recorded against.
    pub fn apply_undo(&mut self, undo: &mut UndoRecord) -> Result<Vec<String>, ReorderError> {
        match undo.item_kind() {
            ItemKind::Column => undo.apply(&mut self.columns),
            ItemKind::Row => undo.apply(&mut self.rows),
        }
    }

    /// Like `apply_undo` without the staleness check.
    pub fn force_undo(&mut self, undo: &mut UndoRecord) -> Result<Vec<String>, ReorderError> {
        match undo.item_kind() {
            ItemKind::Column => undo.force_apply(&mut self.columns),
            ItemKind::Row => undo.force_apply(&mut self.rows),
        }
    }
}

/// One drag-and-drop surface: the board it edits, the monitor classifying
/// gestures, and the undo records of drops still waiting on the server.
///
/// Gestures move through Dragging -> Dropped -> Committed | RolledBack.
/// A rollback that finds the board already changed by later gestures is
/// refused; the session then asks for a resync and refuses new drags until
/// `resynced` hands it a fresh board.
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use reorder_core::{
    settle_commit, AutoScrollOptions, Board, Commit, DragPayload, DropMonitor, DropOutcome,
    DropTargetData, Edge, GestureId, OrderChange, OrderPersistence, Orderable, PersistError,
    ReorderError, Settled, SkipReason,
};
use serde::Serialize;

use crate::config::DndConfig;
use crate::models::{Card, CheckGroup, ChecklistItem, Column};

pub type BoardSession = DndSession<Column, Card>;
pub type ChecklistSession = DndSession<CheckGroup, ChecklistItem>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GesturePhase {
    Dragging,
    Dropped,
    Committed,
    RolledBack,
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notice {
    #[serde(rename_all = "camelCase")]
    RolledBack {
        gesture: GestureId,
        item_uid: String,
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    ResyncRequired {
        gesture: GestureId,
        item_uid: String,
        reason: String,
    },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::RolledBack { reason, .. } => {
                format!("Could not save the new order ({reason}); it was reverted.")
            }
            Notice::ResyncRequired { reason, .. } => {
                format!("Could not save the new order ({reason}); reloading the board.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Board is out of sync; waiting for a reload")]
    ResyncRequired,

    #[error(transparent)]
    Skipped(#[from] SkipReason),

    #[error("Unknown or already settled gesture: {0}")]
    UnknownGesture(GestureId),
}

/// A drop applied to the board and handed to the caller for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropped {
    pub gesture: GestureId,
    pub change: OrderChange,
}

#[derive(Debug)]
pub struct DndSession<C, R> {
    board: Board<C, R>,
    monitor: DropMonitor,
    auto_scroll: AutoScrollOptions,
    persist_debounce: Duration,
    check_stale_undo: bool,
    pending: BTreeMap<GestureId, Commit>,
    notices: VecDeque<Notice>,
    needs_resync: bool,
}

impl<C: Orderable, R: Orderable> DndSession<C, R> {
    pub fn new(board: Board<C, R>, config: &DndConfig) -> Self {
        Self {
            board,
            monitor: DropMonitor::new(config.monitor_options()),
            auto_scroll: config.auto_scroll_options(),
            persist_debounce: config.persist_debounce(),
            check_stale_undo: config.check_stale_undo,
            pending: BTreeMap::new(),
            notices: VecDeque::new(),
            needs_resync: false,
        }
    }

    pub fn board(&self) -> &Board<C, R> {
        &self.board
    }

    /// For inserts and removals pushed by the server. Any change to a column
    /// a pending gesture touched makes that gesture's undo stale.
    pub fn board_mut(&mut self) -> &mut Board<C, R> {
        &mut self.board
    }

    pub fn monitor(&self) -> &DropMonitor {
        &self.monitor
    }

    pub fn auto_scroll_options(&self) -> AutoScrollOptions {
        self.auto_scroll
    }

    pub fn can_scroll(&self, source: &DragPayload) -> bool {
        self.monitor.can_scroll(source)
    }

    pub fn needs_resync(&self) -> bool {
        self.needs_resync
    }

    pub fn begin_drag(&mut self, payload: DragPayload) -> Result<GestureId, SessionError> {
        if self.needs_resync {
            log::debug!(
                "[reorder.session.drag] refused {}: waiting for resync",
                payload.uid
            );
            return Err(SessionError::ResyncRequired);
        }
        Ok(self.monitor.begin_drag(payload)?)
    }

    pub fn drag_row(&mut self, uid: &str) -> Result<GestureId, SessionError> {
        let payload = self.monitor.row_payload(uid);
        self.begin_drag(payload)
    }

    pub fn drag_column(&mut self, uid: &str) -> Result<GestureId, SessionError> {
        let payload = self.monitor.column_payload(uid);
        self.begin_drag(payload)
    }

    pub fn cancel_drag(&mut self) -> Option<GestureId> {
        self.monitor.cancel_drag()
    }

    /// Finish the current gesture. On success the board already shows the
    /// move and the returned change should be persisted, then `settle`d.
    pub fn drop_on(&mut self, target: Option<&DropTargetData>) -> Result<Dropped, SessionError> {
        match self.monitor.drop_on(&mut self.board, target) {
            DropOutcome::Applied(commit) => {
                let dropped = Dropped {
                    gesture: commit.gesture,
                    change: commit.change.clone(),
                };
                self.pending.insert(commit.gesture, commit);
                Ok(dropped)
            }
            DropOutcome::Skipped(reason) => Err(reason.into()),
        }
    }

    pub fn drop_on_row(&mut self, uid: &str, edge: Option<Edge>) -> Result<Dropped, SessionError> {
        let target = self.monitor.row_target(uid, edge);
        self.drop_on(Some(&target))
    }

    pub fn drop_on_column(
        &mut self,
        uid: &str,
        edge: Option<Edge>,
    ) -> Result<Dropped, SessionError> {
        let target = self.monitor.column_target(uid, edge);
        self.drop_on(Some(&target))
    }

    /// Settled gestures are forgotten and report `None`.
    pub fn phase_of(&self, gesture: GestureId) -> Option<GesturePhase> {
        if self.monitor.current_gesture() == Some(gesture) {
            Some(GesturePhase::Dragging)
        } else if self.pending.contains_key(&gesture) {
            Some(GesturePhase::Dropped)
        } else {
            None
        }
    }

    pub fn pending_changes(&self) -> impl Iterator<Item = (GestureId, &OrderChange)> {
        self.pending
            .iter()
            .map(|(gesture, commit)| (*gesture, &commit.change))
    }

    /// Record the persistence result of a dropped gesture. Each gesture
    /// settles once.
    pub fn settle(
        &mut self,
        gesture: GestureId,
        result: Result<(), PersistError>,
    ) -> Result<GesturePhase, SessionError> {
        let mut commit = self
            .pending
            .remove(&gesture)
            .ok_or(SessionError::UnknownGesture(gesture))?;
        match result {
            Ok(()) => {
                log::info!(
                    "[reorder.session.commit] {} committed {}",
                    gesture,
                    commit.change.item_uid
                );
                Ok(GesturePhase::Committed)
            }
            Err(error) => {
                let restored = self.board.apply_undo(&mut commit.undo);
                Ok(self.roll_back(commit, error, restored))
            }
        }
    }

    /// Wait out the configured debounce, persist the gesture's change and
    /// settle it with the result.
    pub async fn persist<P: OrderPersistence>(
        &mut self,
        persistence: &P,
        gesture: GestureId,
    ) -> Result<GesturePhase, SessionError> {
        let commit = self
            .pending
            .get_mut(&gesture)
            .ok_or(SessionError::UnknownGesture(gesture))?;
        let settled =
            settle_commit(&mut self.board, persistence, commit, self.persist_debounce).await;
        let commit = self
            .pending
            .remove(&gesture)
            .ok_or(SessionError::UnknownGesture(gesture))?;
        match settled {
            Settled::Committed { .. } => Ok(GesturePhase::Committed),
            Settled::RolledBack { error, undo, .. } => Ok(self.roll_back(commit, error, undo)),
        }
    }

    /// Finish a failed gesture given the outcome of its checked undo.
    fn roll_back(
        &mut self,
        mut commit: Commit,
        error: PersistError,
        restored: Result<Vec<String>, ReorderError>,
    ) -> GesturePhase {
        let restored = match restored {
            Err(ReorderError::StaleUndo { .. }) if !self.check_stale_undo => {
                self.board.force_undo(&mut commit.undo)
            }
            other => other,
        };
        let gesture = commit.gesture;
        let item_uid = commit.change.item_uid;
        match restored {
            Ok(_) => {
                log::warn!(
                    "[reorder.session.rollback] {} reverted {} after: {}",
                    gesture,
                    item_uid,
                    error
                );
                self.notices.push_back(Notice::RolledBack {
                    gesture,
                    item_uid,
                    reason: error.to_string(),
                });
            }
            Err(undo_error) => {
                log::warn!(
                    "[reorder.session.resync] {} could not revert {} ({}) after: {}",
                    gesture,
                    item_uid,
                    undo_error,
                    error
                );
                self.needs_resync = true;
                self.notices.push_back(Notice::ResyncRequired {
                    gesture,
                    item_uid,
                    reason: error.to_string(),
                });
            }
        }
        GesturePhase::RolledBack
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Replace the board with an authoritative copy. Pending gestures are
    /// dropped: their undo records describe a board that no longer exists.
    pub fn resynced(&mut self, board: Board<C, R>) {
        if !self.pending.is_empty() {
            log::info!(
                "[reorder.session.resync] discarding {} pending gesture(s)",
                self.pending.len()
            );
        }
        self.board = board;
        self.pending.clear();
        self.needs_resync = false;
    }
}

/// Persistence boundary.
///
/// The engine never waits on the network: by the time a `Commit` exists the
/// board already shows the move. `settle_commit` is the standard follow-up
/// for callers that hold the board across the round trip: wait out the
/// debounce, persist, and on failure roll the board back with the commit's
/// undo.
use std::future::Future;
use std::time::Duration;

use crate::board::Board;
use crate::dnd::monitor::{Commit, GestureId};
use crate::engine::ReorderError;
use crate::types::{OrderChange, Orderable};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rejected by server: {0}")]
    Rejected(String),
}

/// Writes a committed order change to the authoritative backend.
pub trait OrderPersistence {
    fn persist(&self, change: &OrderChange) -> impl Future<Output = Result<(), PersistError>>;
}

/// How a gesture ended after its persistence attempt.
#[derive(Debug, PartialEq)]
pub enum Settled {
    Committed {
        gesture: GestureId,
    },
    RolledBack {
        gesture: GestureId,
        error: PersistError,
        /// Outcome of the undo itself. `Err(StaleUndo)` means the board was
        /// changed by something else in the meantime and was left alone.
        undo: Result<Vec<String>, ReorderError>,
    },
}

impl Settled {
    pub fn gesture(&self) -> GestureId {
        match self {
            Settled::Committed { gesture } | Settled::RolledBack { gesture, .. } => *gesture,
        }
    }
}

/// Persist one commit and roll it back on failure.
///
/// Holds `board` across the await; only valid when the caller runs a
/// single-threaded event loop and nothing else needs the board meanwhile.
/// A refused stale undo stays unconsumed in `commit.undo`, so the caller may
/// still `force_undo` it.
pub async fn settle_commit<C, R, P>(
    board: &mut Board<C, R>,
    persistence: &P,
    commit: &mut Commit,
    debounce: Duration,
) -> Settled
where
    C: Orderable,
    R: Orderable,
    P: OrderPersistence,
{
    if !debounce.is_zero() {
        tokio::time::sleep(debounce).await;
    }
    match persistence.persist(&commit.change).await {
        Ok(()) => {
            log::info!(
                "[reorder.commit.persist] {} committed {}",
                commit.gesture,
                commit.change.item_uid
            );
            Settled::Committed {
                gesture: commit.gesture,
            }
        }
        Err(error) => {
            log::warn!(
                "[reorder.commit.rollback] {} persist failed ({}), rolling back {}",
                commit.gesture,
                error,
                commit.change.item_uid
            );
            let undo = board.apply_undo(&mut commit.undo);
            Settled::RolledBack {
                gesture: commit.gesture,
                error,
                undo,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnd::monitor::DropMonitor;
    use crate::types::test_support::*;
    use crate::types::Edge;
    use std::cell::RefCell;

    /// Records every change it is handed; fails when `fail` is set.
    struct RecordingPersistence {
        calls: RefCell<Vec<OrderChange>>,
        fail: Option<PersistError>,
    }

    impl RecordingPersistence {
        fn ok() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail: None,
            }
        }

        fn failing(error: PersistError) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail: Some(error),
            }
        }
    }

    impl OrderPersistence for RecordingPersistence {
        async fn persist(&self, change: &OrderChange) -> Result<(), PersistError> {
            self.calls.borrow_mut().push(change.clone());
            match &self.fail {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    fn board() -> Board<TestColumn, TestRow> {
        Board::from_parts(
            vec![make_column("todo", 0), make_column("done", 1)],
            vec![
                make_row("x", 0, "todo"),
                make_row("y", 1, "todo"),
                make_row("z", 2, "todo"),
                make_row("p", 0, "done"),
                make_row("q", 1, "done"),
            ],
        )
    }

    fn move_y_between_p_and_q(board: &mut Board<TestColumn, TestRow>) -> Commit {
        let mut monitor = DropMonitor::default();
        monitor.begin_drag(monitor.row_payload("y")).unwrap();
        let target = monitor.row_target("q", Some(Edge::Top));
        monitor.drop_on(board, Some(&target)).into_commit().unwrap()
    }

    #[tokio::test]
    async fn test_success_keeps_optimistic_state() {
        let mut board = board();
        let mut commit = move_y_between_p_and_q(&mut board);
        let persistence = RecordingPersistence::ok();

        let settled = settle_commit(&mut board, &persistence, &mut commit, Duration::ZERO).await;

        assert!(matches!(settled, Settled::Committed { .. }));
        assert_eq!(board.rows_in("done"), vec!["p", "y", "q"]);
        let calls = persistence.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].item_uid, "y");
        assert_eq!(calls[0].order, 1);
        assert_eq!(calls[0].parent_uid.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_failure_rolls_back() {
        let mut board = board();
        let mut commit = move_y_between_p_and_q(&mut board);
        let gesture = commit.gesture;
        let persistence =
            RecordingPersistence::failing(PersistError::Rejected("column locked".to_string()));

        let settled = settle_commit(&mut board, &persistence, &mut commit, Duration::ZERO).await;

        match settled {
            Settled::RolledBack { gesture: g, error, undo } => {
                assert_eq!(g, gesture);
                assert_eq!(error, PersistError::Rejected("column locked".to_string()));
                assert!(undo.is_ok());
            }
            other => panic!("expected rollback, got {other:?}"),
        }
        assert_eq!(board.rows_in("todo"), vec!["x", "y", "z"]);
        assert_eq!(board.rows_in("done"), vec!["p", "q"]);
        assert_eq!(board.rows.get("y").unwrap().column_uid.as_deref(), Some("todo"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_delays_persist() {
        let mut board = board();
        let mut commit = move_y_between_p_and_q(&mut board);
        let persistence = RecordingPersistence::ok();

        let started = tokio::time::Instant::now();
        settle_commit(&mut board, &persistence, &mut commit, Duration::from_millis(300)).await;
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(persistence.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_interleaved_rollback_is_refused_when_stale() {
        let mut board = board();
        let mut commit = move_y_between_p_and_q(&mut board);

        // A later gesture rewrites the same column before the first fails.
        let mut monitor = DropMonitor::default();
        monitor.begin_drag(monitor.row_payload("q")).unwrap();
        let target = monitor.row_target("p", Some(Edge::Top));
        monitor.drop_on(&mut board, Some(&target)).into_commit().unwrap();
        let after_second = board.rows_in("done");

        let persistence = RecordingPersistence::failing(PersistError::Network("offline".into()));
        let settled = settle_commit(&mut board, &persistence, &mut commit, Duration::ZERO).await;

        match settled {
            Settled::RolledBack { undo, .. } => {
                assert!(matches!(undo, Err(ReorderError::StaleUndo { .. })));
            }
            other => panic!("expected rollback, got {other:?}"),
        }
        assert_eq!(board.rows_in("done"), after_second);

        // The refused record is still usable for a forced restore.
        assert!(!commit.undo.is_consumed());
        board.force_undo(&mut commit.undo).unwrap();
        assert_eq!(board.rows_in("todo"), vec!["x", "y", "z"]);
    }
}

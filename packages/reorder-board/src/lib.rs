//! Board and checklist drag-and-drop on top of `reorder-core`.
//!
//! Provides the concrete models, the `dnd.json` settings, a process logger
//! with an in-memory tail, and `DndSession`, which tracks dropped gestures
//! until the server confirms or rejects them.

pub mod config;
pub mod log_bridge;
pub mod models;
pub mod session;

pub use config::{default_config_path, load_config, save_config, ConfigError, DndConfig};
pub use models::{Card, CheckGroup, ChecklistItem, Column};
pub use session::{
    BoardSession, ChecklistSession, DndSession, Dropped, GesturePhase, Notice, SessionError,
};

/// Drag-and-drop settings.
/// Reads dnd.json from ~/.config/reorder/dnd.json (or platform equivalent).
use reorder_core::{AutoScrollOptions, ColumnReorderMode, MonitorOptions, ScrollSpeed};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DndConfig {
    #[serde(default)]
    pub column_reorder: ColumnReorderMode,
    /// Delay between an optimistic drop and the persistence call.
    #[serde(default = "default_persist_debounce_ms")]
    pub persist_debounce_ms: u64,
    #[serde(default)]
    pub max_scroll_speed: ScrollSpeed,
    /// When false, a failed persist always restores the pre-drop order even
    /// if later gestures touched the same items.
    #[serde(default = "default_check_stale_undo")]
    pub check_stale_undo: bool,
}

fn default_persist_debounce_ms() -> u64 {
    300
}

fn default_check_stale_undo() -> bool {
    true
}

impl Default for DndConfig {
    fn default() -> Self {
        Self {
            column_reorder: ColumnReorderMode::default(),
            persist_debounce_ms: default_persist_debounce_ms(),
            max_scroll_speed: ScrollSpeed::default(),
            check_stale_undo: default_check_stale_undo(),
        }
    }
}

impl DndConfig {
    pub fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            column_reorder: self.column_reorder,
        }
    }

    pub fn auto_scroll_options(&self) -> AutoScrollOptions {
        AutoScrollOptions {
            max_scroll_speed: self.max_scroll_speed,
        }
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }
}

/// Default config path: ~/.config/reorder/dnd.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reorder")
        .join("dnd.json")
}

/// Load config from path. Returns defaults if the file is missing or invalid.
pub fn load_config(path: &Path) -> DndConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!(
                "[reorder.config.load] Failed to parse {}: {}",
                path.display(),
                e
            );
            DndConfig::default()
        }),
        Err(_) => {
            log::info!(
                "[reorder.config.load] No config at {}, using defaults",
                path.display()
            );
            DndConfig::default()
        }
    }
}

pub fn save_config(path: &Path, config: &DndConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Auto-scroll eligibility while dragging near a container edge.
///
/// Scrolling itself belongs to the UI; this only answers whether a payload
/// may scroll containers and how fast the UI should allow it.
use serde::{Deserialize, Serialize};

use super::{is_dragging_a_column, is_dragging_a_row, DndScope, DragPayload};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollSpeed {
    Standard,
    #[default]
    Fast,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScrollOptions {
    #[serde(default)]
    pub max_scroll_speed: ScrollSpeed,
}

/// Only our own rows and columns scroll our containers.
pub fn can_scroll(scope: DndScope, source: &DragPayload) -> bool {
    is_dragging_a_row(scope, source) || is_dragging_a_column(scope, source)
}

/// Edge-aware reorder: drop before or after a specific target item.
use crate::types::{Arena, Edge, Orderable};
use crate::undo::Operation;

use super::reorder::{reorder_resolved, Reordered};
use super::ReorderError;

/// Final index of the dragged item once it lands on `closest_edge` of the
/// item at `index_of_target`, after accounting for the slot it vacated.
pub fn reorder_destination_index(
    start_index: usize,
    index_of_target: usize,
    closest_edge: Option<Edge>,
) -> usize {
    let Some(edge) = closest_edge else {
        return index_of_target;
    };
    if start_index == index_of_target {
        return start_index;
    }
    let going_after = edge == Edge::Bottom;
    if start_index < index_of_target {
        if going_after {
            index_of_target
        } else {
            index_of_target - 1
        }
    } else if going_after {
        index_of_target + 1
    } else {
        index_of_target
    }
}

/// Rejects drops that would land the item where it already is: onto itself,
/// onto the bottom edge of the item just above, or the top edge of the item
/// just below.
pub fn can_reorder_by_closest_edge(
    start_index: usize,
    index_of_target: usize,
    closest_edge: Option<Edge>,
) -> bool {
    if start_index == index_of_target {
        return false;
    }
    match closest_edge {
        Some(Edge::Bottom) => index_of_target + 1 != start_index,
        Some(Edge::Top) => start_index + 1 != index_of_target,
        None => true,
    }
}

/// Move `list[start_index]` next to `list[index_of_target]` on the given
/// edge, then densely renumber.
///
/// Callers filter self-drops and adjacency no-ops with
/// `can_reorder_by_closest_edge` first; this function does not.
pub fn reorder_items_with_edge<T: Orderable>(
    arena: &mut Arena<T>,
    list: &[String],
    start_index: usize,
    index_of_target: usize,
    closest_edge: Option<Edge>,
) -> Result<Reordered, ReorderError> {
    if index_of_target >= list.len() {
        return Err(ReorderError::IndexOutOfRange {
            index: index_of_target,
            len: list.len(),
        });
    }
    let finish_index = reorder_destination_index(start_index, index_of_target, closest_edge);
    reorder_resolved(arena, list, start_index, finish_index, Operation::EdgeReorder)
}

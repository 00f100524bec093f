use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which level of a board an orderable type lives on.
/// Rows (cards, checklist items) sit inside columns; columns sit at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Row,
    Column,
}

/// Closest edge of a drop target under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Edge {
    Top,
    Bottom,
}

impl Edge {
    pub fn flip(self) -> Self {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }
}

/// Destination index of a move. `Last` means "append to the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinishIndex {
    Index(usize),
    Last,
}

impl From<usize> for FinishIndex {
    fn from(index: usize) -> Self {
        FinishIndex::Index(index)
    }
}

/// An entity that takes part in a reorderable collection.
///
/// Only `order` and the container uid are ever written by the engine.
/// The uid must stay stable for the item's lifetime.
pub trait Orderable {
    /// Arena of a `Board` this type belongs to.
    const KIND: ItemKind;

    fn uid(&self) -> &str;
    fn order(&self) -> usize;
    fn set_order(&mut self, order: usize);

    /// Uid of the container holding this item. `None` means top level.
    fn container_uid(&self) -> Option<&str> {
        None
    }

    fn set_container_uid(&mut self, _container: Option<String>) {}
}

/// What the persistence callback is told about a committed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderChange {
    pub kind: ItemKind,
    pub item_uid: String,
    pub order: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_uid: Option<String>,
}

/// Caller-owned table of live items keyed by uid.
///
/// The engine mutates entries in place and never inserts or removes.
/// Not synchronized: use from the event thread only.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: HashMap<String, T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<T: Orderable> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item keyed by its uid, returning any item it replaced.
    pub fn insert(&mut self, item: T) -> Option<T> {
        self.items.insert(item.uid().to_string(), item)
    }

    pub fn remove(&mut self, uid: &str) -> Option<T> {
        self.items.remove(uid)
    }

    pub fn get(&self, uid: &str) -> Option<&T> {
        self.items.get(uid)
    }

    pub fn get_mut(&mut self, uid: &str) -> Option<&mut T> {
        self.items.get_mut(uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.items.contains_key(uid)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    /// Uids of the items in `container`, sorted by order (ties by uid).
    pub fn container_list(&self, container: Option<&str>) -> Vec<String> {
        let mut members: Vec<&T> = self
            .items
            .values()
            .filter(|item| item.container_uid() == container)
            .collect();
        members.sort_by(|a, b| a.order().cmp(&b.order()).then_with(|| a.uid().cmp(b.uid())));
        members.iter().map(|item| item.uid().to_string()).collect()
    }

    pub fn container_len(&self, container: Option<&str>) -> usize {
        self.items
            .values()
            .filter(|item| item.container_uid() == container)
            .count()
    }

    /// True when the orders in `container` are exactly `0..n`.
    pub fn is_dense(&self, container: Option<&str>) -> bool {
        let mut orders: Vec<usize> = self
            .items
            .values()
            .filter(|item| item.container_uid() == container)
            .map(|item| item.order())
            .collect();
        orders.sort_unstable();
        orders.iter().enumerate().all(|(i, order)| i == *order)
    }

    /// Rewrite the orders of `container` to `0..n`, keeping relative order.
    /// Returns how many items changed.
    pub fn renumber(&mut self, container: Option<&str>) -> usize {
        let list = self.container_list(container);
        renumber_list(self, &list)
    }
}

/// Dense renumbering: every uid in `list` gets its position as order.
pub(crate) fn renumber_list<T: Orderable>(arena: &mut Arena<T>, list: &[String]) -> usize {
    let mut changed = 0;
    for (position, uid) in list.iter().enumerate() {
        if let Some(item) = arena.get_mut(uid) {
            if item.order() != position {
                item.set_order(position);
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal row used across the engine tests.
    #[derive(Debug, Clone, PartialEq)]
    pub struct TestRow {
        pub uid: String,
        pub order: usize,
        pub column_uid: Option<String>,
    }

    impl Orderable for TestRow {
        const KIND: ItemKind = ItemKind::Row;

        fn uid(&self) -> &str {
            &self.uid
        }
        fn order(&self) -> usize {
            self.order
        }
        fn set_order(&mut self, order: usize) {
            self.order = order;
        }
        fn container_uid(&self) -> Option<&str> {
            self.column_uid.as_deref()
        }
        fn set_container_uid(&mut self, container: Option<String>) {
            self.column_uid = container;
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct TestColumn {
        pub uid: String,
        pub order: usize,
    }

    impl Orderable for TestColumn {
        const KIND: ItemKind = ItemKind::Column;

        fn uid(&self) -> &str {
            &self.uid
        }
        fn order(&self) -> usize {
            self.order
        }
        fn set_order(&mut self, order: usize) {
            self.order = order;
        }
    }

    pub fn make_row(uid: &str, order: usize, column: &str) -> TestRow {
        TestRow {
            uid: uid.to_string(),
            order,
            column_uid: Some(column.to_string()),
        }
    }

    pub fn make_column(uid: &str, order: usize) -> TestColumn {
        TestColumn {
            uid: uid.to_string(),
            order,
        }
    }

    /// Arena with one column holding the given uids at orders 0..n.
    pub fn column_arena(column: &str, uids: &[&str]) -> Arena<TestRow> {
        let mut arena = Arena::new();
        for (i, uid) in uids.iter().enumerate() {
            arena.insert(make_row(uid, i, column));
        }
        arena
    }

    /// `[(uid, order)]` of a container, in display order.
    pub fn snapshot(arena: &Arena<TestRow>, column: &str) -> Vec<(String, usize)> {
        arena
            .container_list(Some(column))
            .into_iter()
            .map(|uid| {
                let order = arena.get(&uid).map(|r| r.order).unwrap_or(usize::MAX);
                (uid, order)
            })
            .collect()
    }

    pub fn pairs(expected: &[(&str, usize)]) -> Vec<(String, usize)> {
        expected.iter().map(|(u, o)| (u.to_string(), *o)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_container_list_sorted_by_order() {
        let mut arena = Arena::new();
        arena.insert(make_row("c", 2, "todo"));
        arena.insert(make_row("a", 0, "todo"));
        arena.insert(make_row("b", 1, "todo"));
        arena.insert(make_row("x", 0, "done"));

        assert_eq!(arena.container_list(Some("todo")), vec!["a", "b", "c"]);
        assert_eq!(arena.container_list(Some("done")), vec!["x"]);
        assert!(arena.container_list(Some("missing")).is_empty());
        assert_eq!(arena.container_len(Some("todo")), 3);
    }

    #[test]
    fn test_container_list_ties_broken_by_uid() {
        let mut arena = Arena::new();
        arena.insert(make_row("b", 0, "todo"));
        arena.insert(make_row("a", 0, "todo"));
        assert_eq!(arena.container_list(Some("todo")), vec!["a", "b"]);
    }

    #[test]
    fn test_is_dense() {
        let mut arena = column_arena("todo", &["a", "b", "c"]);
        assert!(arena.is_dense(Some("todo")));
        assert!(arena.is_dense(Some("empty")));

        arena.get_mut("b").unwrap().order = 5;
        assert!(!arena.is_dense(Some("todo")));
    }

    #[test]
    fn test_renumber_closes_gaps() {
        let mut arena = Arena::new();
        arena.insert(make_row("a", 3, "todo"));
        arena.insert(make_row("b", 7, "todo"));
        arena.insert(make_row("c", 9, "todo"));

        assert_eq!(arena.renumber(Some("todo")), 3);
        assert_eq!(snapshot(&arena, "todo"), pairs(&[("a", 0), ("b", 1), ("c", 2)]));
        assert_eq!(arena.renumber(Some("todo")), 0);
    }

    #[test]
    fn test_top_level_columns() {
        let mut arena = Arena::new();
        arena.insert(make_column("done", 1));
        arena.insert(make_column("todo", 0));
        assert_eq!(arena.container_list(None), vec!["todo", "done"]);
    }

    #[test]
    fn test_edge_flip() {
        assert_eq!(Edge::Top.flip(), Edge::Bottom);
        assert_eq!(Edge::Bottom.flip(), Edge::Top);
    }

    #[test]
    fn test_order_change_serializes_camel_case() {
        let change = OrderChange {
            kind: ItemKind::Row,
            item_uid: "card-1".to_string(),
            order: 2,
            parent_uid: Some("col-2".to_string()),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["itemUid"], "card-1");
        assert_eq!(json["parentUid"], "col-2");
        assert_eq!(json["kind"], "row");

        let same_column = OrderChange { parent_uid: None, ..change };
        let json = serde_json::to_value(&same_column).unwrap();
        assert!(json.get("parentUid").is_none());
    }
}

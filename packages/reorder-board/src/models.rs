use reorder_core::{ItemKind, Orderable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub uid: String,
    pub title: String,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub uid: String,
    pub title: String,
    pub order: usize,
    pub column_uid: String,
}

/// A named group of checklist items inside one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckGroup {
    pub uid: String,
    pub title: String,
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_uid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub uid: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
    pub order: usize,
    pub check_group_uid: String,
}

impl Column {
    pub fn new(uid: impl Into<String>, title: impl Into<String>, order: usize) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            order,
        }
    }
}

impl Card {
    pub fn new(
        uid: impl Into<String>,
        title: impl Into<String>,
        order: usize,
        column_uid: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            order,
            column_uid: column_uid.into(),
        }
    }
}

impl CheckGroup {
    pub fn new(uid: impl Into<String>, title: impl Into<String>, order: usize) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            order,
            card_uid: None,
        }
    }
}

impl ChecklistItem {
    pub fn new(
        uid: impl Into<String>,
        text: impl Into<String>,
        order: usize,
        check_group_uid: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            text: text.into(),
            checked: false,
            order,
            check_group_uid: check_group_uid.into(),
        }
    }
}

impl Orderable for Column {
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

impl Orderable for CheckGroup {
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

impl Orderable for Card {
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
        Some(&self.column_uid)
    }

    // The engine never clears a row's container.
    fn set_container_uid(&mut self, container: Option<String>) {
        if let Some(container) = container {
            self.column_uid = container;
        }
    }
}

impl Orderable for ChecklistItem {
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
        Some(&self.check_group_uid)
    }

    fn set_container_uid(&mut self, container: Option<String>) {
        if let Some(container) = container {
            self.check_group_uid = container;
        }
    }
}

//! The set of checked rows in the transaction table.

use crate::database_id::TransactionId;

/// Transaction IDs in the order they were selected, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<TransactionId>,
}

impl Selection {
    /// Create a selection from `ids`, keeping the first occurrence of each ID.
    pub fn from_ids(ids: impl IntoIterator<Item = TransactionId>) -> Self {
        let mut selection = Selection::default();

        for id in ids {
            if !selection.contains(id) {
                selection.ids.push(id);
            }
        }

        selection
    }

    pub fn ids(&self) -> &[TransactionId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: TransactionId) -> bool {
        self.ids.contains(&id)
    }

    /// Remove `id` if it is selected, otherwise add it to the end.
    pub fn toggle(&self, id: TransactionId) -> Selection {
        let ids = if self.contains(id) {
            self.ids
                .iter()
                .copied()
                .filter(|&selected| selected != id)
                .collect()
        } else {
            let mut ids = self.ids.clone();
            ids.push(id);
            ids
        };

        Selection { ids }
    }

    /// The selection after clicking the "select all" checkbox.
    ///
    /// Clears the selection if it is as large as the visible rows, otherwise
    /// selects exactly `visible_ids`.
    pub fn toggle_all(&self, visible_ids: &[TransactionId]) -> Selection {
        if self.len() == visible_ids.len() {
            Selection::default()
        } else {
            Selection::from_ids(visible_ids.iter().copied())
        }
    }

    /// Whether the "select all" checkbox should be checked.
    pub fn all_selected(&self, visible_count: usize) -> bool {
        visible_count > 0 && self.len() == visible_count
    }

    /// The selection with `removed` taken out.
    pub fn without(&self, removed: &[TransactionId]) -> Selection {
        Selection {
            ids: self
                .ids
                .iter()
                .copied()
                .filter(|id| !removed.contains(id))
                .collect(),
        }
    }
}

//! Bounded, newest-first history of saved bills plus the UI selection used for bulk
//! deletes.

use std::{collections::HashSet, sync::Arc};

use crate::{
    core::confirm::ConfirmationPrompt,
    domain::{BillSnapshot, Identifiable, SnapshotId},
    errors::{Result, SplitError},
    storage::{keys, read_value, write_value, KeyValueStore},
};

/// Maximum number of snapshots retained.
pub const HISTORY_CAPACITY: usize = 5;

/// Recent bills, persisted in full after every mutation.
pub struct HistoryStore {
    entries: Vec<BillSnapshot>,
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    /// Loads the persisted collection, degrading to an empty history when the stored
    /// value is missing, unreadable or undecodable.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut entries = match read_value::<Vec<BillSnapshot>, _>(store.as_ref(), keys::BILL_HISTORY)
        {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "bill history unavailable, starting empty");
                Vec::new()
            }
        };
        entries.truncate(HISTORY_CAPACITY);
        tracing::debug!(count = entries.len(), "loaded bill history");
        Self { entries, store }
    }

    pub fn entries(&self) -> &[BillSnapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SnapshotId> + '_ {
        self.entries.iter().map(Identifiable::id)
    }

    /// Prepends `snapshot`, evicting the oldest entries beyond [`HISTORY_CAPACITY`].
    pub fn append(&mut self, snapshot: BillSnapshot) -> Result<()> {
        tracing::info!(id = %snapshot.id, label = %snapshot.label, "saving bill to history");
        let mut candidate = Vec::with_capacity(HISTORY_CAPACITY + 1);
        candidate.push(snapshot);
        candidate.extend(self.entries.iter().cloned());
        candidate.truncate(HISTORY_CAPACITY);
        self.commit(candidate)
    }

    pub fn restore(&self, id: &SnapshotId) -> Result<&BillSnapshot> {
        self.entries
            .iter()
            .find(|entry| entry.id() == id)
            .ok_or_else(|| SplitError::NotFound(id.to_string()))
    }

    /// Removes every entry whose id is in `ids`; unknown ids are ignored. Returns the
    /// number of entries removed. Nothing is written when nothing matched.
    pub fn delete_many(&mut self, ids: &HashSet<SnapshotId>) -> Result<usize> {
        let candidate: Vec<BillSnapshot> = self
            .entries
            .iter()
            .filter(|entry| !ids.contains(entry.id()))
            .cloned()
            .collect();
        let removed = self.entries.len() - candidate.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(candidate)?;
        tracing::info!(removed, "deleted bills from history");
        Ok(removed)
    }

    pub fn delete(&mut self, id: &SnapshotId) -> Result<bool> {
        let ids = HashSet::from([id.clone()]);
        Ok(self.delete_many(&ids)? > 0)
    }

    /// Deletes the selected entries once `prompt` agrees, then clears the selection.
    /// A declined or dismissed prompt leaves both history and selection untouched.
    pub fn delete_selection(
        &mut self,
        selection: &mut Selection,
        prompt: &dyn ConfirmationPrompt,
    ) -> Result<usize> {
        if selection.is_empty() {
            return Ok(0);
        }
        let count = selection.len();
        let noun = if count == 1 { "bill" } else { "bills" };
        if !prompt.confirm(&format!("Delete {count} selected {noun}?")) {
            tracing::debug!(count, "bulk delete declined");
            return Ok(0);
        }
        let removed = self.delete_many(selection.ids())?;
        selection.clear();
        Ok(removed)
    }

    /// Writes `candidate` and adopts it only once the write succeeded, so memory never
    /// runs ahead of the store.
    fn commit(&mut self, candidate: Vec<BillSnapshot>) -> Result<()> {
        write_value(self.store.as_ref(), keys::BILL_HISTORY, &candidate)?;
        self.entries = candidate;
        Ok(())
    }
}

/// Ids currently checked in the history view. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<SnapshotId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &SnapshotId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Selects every id in `all`, or clears the selection when it already holds them all.
    pub fn toggle_all<'a, I>(&mut self, all: I)
    where
        I: IntoIterator<Item = &'a SnapshotId>,
    {
        let all: HashSet<SnapshotId> = all.into_iter().cloned().collect();
        if all.is_subset(&self.ids) {
            self.ids.clear();
        } else {
            self.ids = all;
        }
    }

    pub fn is_selected(&self, id: &SnapshotId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<SnapshotId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids that no longer exist in `history`.
    pub fn retain_existing(&mut self, history: &HistoryStore) {
        let live: HashSet<&SnapshotId> = history.ids().collect();
        self.ids.retain(|id| live.contains(id));
    }
}

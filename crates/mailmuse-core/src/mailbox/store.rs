//! Canonical mail item collection.

use tracing::debug;

use super::model::{ItemKind, MailItem, MailItemId, MailboxView};
use crate::error::{Error, Result};
use crate::remote::MailRecord;

/// Owns the full set of mail items and derives every type-scoped view from
/// it.
///
/// One indexed collection is the sole source of truth: the starred and
/// trashed flags live on the items themselves, so there is no separate
/// id-set that could drift out of sync. Views are recomputed on every call
/// and always reflect the latest flags.
///
/// All mutators are synchronous and in-memory. Persisting a change to the
/// backend is the caller's responsibility, layered on top (optimistic UI).
/// A stale id is a benign no-op, never an error; callers that require strict
/// existence use [`MailboxStore::get`] and map `None` to
/// [`Error::NotFound`](crate::Error::NotFound) themselves.
#[derive(Debug, Default)]
pub struct MailboxStore {
    /// Items in insertion order.
    items: Vec<MailItem>,
}

impl MailboxStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of items, trashed included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &MailItemId) -> Option<&MailItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Looks up an item by id, failing with `NotFound` when absent.
    pub fn require(&self, id: &MailItemId) -> Result<&MailItem> {
        self.get(id).ok_or_else(|| Error::NotFound(id.clone()))
    }

    /// Inserts an item, replacing in place when the id already exists so a
    /// bulk reload stays idempotent and keeps its original position.
    pub fn insert(&mut self, item: MailItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    /// Bulk-ingests records from the load collaborator.
    ///
    /// Any malformed record aborts the load with
    /// [`Error::Integrity`](crate::Error::Integrity) and the store is left
    /// untouched; nothing is silently substituted.
    pub fn load(&mut self, records: impl IntoIterator<Item = MailRecord>) -> Result<()> {
        let items = records
            .into_iter()
            .map(MailRecord::into_item)
            .collect::<Result<Vec<_>>>()?;
        for item in items {
            self.insert(item);
        }
        debug!(total = self.items.len(), "mailbox loaded");
        Ok(())
    }

    /// Returns the items visible in the given view, in insertion order.
    ///
    /// Recomputed on every call; there is no cached view that can go stale
    /// relative to the flags.
    #[must_use]
    pub fn list_by_view(&self, view: MailboxView) -> Vec<&MailItem> {
        self.items
            .iter()
            .filter(|item| match view {
                MailboxView::Inbox => item.kind == ItemKind::Inbox && !item.trashed,
                MailboxView::Sent => item.kind == ItemKind::Sent && !item.trashed,
                MailboxView::Drafts => item.kind == ItemKind::Draft && !item.trashed,
                MailboxView::Starred => item.starred && !item.trashed,
                MailboxView::Trash => item.trashed,
            })
            .collect()
    }

    /// Flips the starred flag, returning the new value, or `None` when the
    /// id is absent (the item may have been deleted concurrently).
    pub fn toggle_star(&mut self, id: &MailItemId) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| &item.id == id)?;
        item.starred = !item.starred;
        debug!(%id, starred = item.starred, "star toggled");
        Some(item.starred)
    }

    /// Marks an item trashed, hiding it from its origin view. Returns `false`
    /// when the id is absent.
    ///
    /// The star flag is untouched; a later restore brings the item back to
    /// every view it appeared in before. If the item is currently shown in a
    /// detail screen, the view coordinator clears that selection — a contract
    /// on the caller, not on this store.
    pub fn move_to_trash(&mut self, id: &MailItemId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        item.trashed = true;
        debug!(%id, "moved to trash");
        true
    }

    /// Clears the trashed flag. A no-op unless the item is currently trashed;
    /// returns whether a restore actually happened.
    pub fn restore(&mut self, id: &MailItemId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        if !item.trashed {
            return false;
        }
        item.trashed = false;
        debug!(%id, "restored from trash");
        true
    }

    /// Removes the item from the collection entirely. Irreversible; no undo
    /// state is retained. Idempotent: a second call returns `false`.
    pub fn delete_forever(&mut self, id: &MailItemId) -> bool {
        let Some(pos) = self.items.iter().position(|item| &item.id == id) else {
            return false;
        };
        self.items.remove(pos);
        debug!(%id, "deleted forever");
        true
    }

    /// Transitions a stored draft into a sent item after a successful send.
    /// Returns `false` when the id is absent or the item is not a draft.
    pub fn mark_sent(&mut self, id: &MailItemId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        if item.kind != ItemKind::Draft {
            return false;
        }
        item.kind = ItemKind::Sent;
        debug!(%id, "draft marked sent");
        true
    }
}

//! Screen state and cross-component consistency.

use tracing::debug;

use crate::compose::{CommitAction, CommitReceipt, ComposeSession};
use crate::error::{Error, Result};
use crate::mailbox::{ActionPolicy, MailItem, MailItemId, MailboxStore, MailboxView};
use crate::remote::{DraftGateway, MailGateway, SessionAuth};

/// What the main surface is showing: a mailbox list or a single item.
///
/// These two are mutually exclusive; the compose overlay is layered on top of
/// either (see [`ViewCoordinator::is_composing`]) and is not a screen of its
/// own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// The list of one mailbox view.
    Listing(MailboxView),
    /// One item in detail, remembering which view it was opened from.
    Viewing {
        /// The item on screen.
        item: MailItemId,
        /// The view to return to.
        view: MailboxView,
    },
}

impl Screen {
    /// The mailbox view this screen belongs to.
    #[must_use]
    pub const fn view(&self) -> MailboxView {
        match self {
            Self::Listing(view) | Self::Viewing { view, .. } => *view,
        }
    }
}

/// Receives user intents, delegates mutations to the store and the compose
/// session, and keeps the screen consistent with both.
///
/// Every mutating intent is checked against the current view's
/// [`ActionPolicy`] first, so an action that is not legal in this view is
/// rejected before any state changes. The one cross-component rule enforced
/// here: an item must never remain on the detail screen after it is trashed
/// or deleted.
#[derive(Debug, Default)]
pub struct ViewCoordinator {
    store: MailboxStore,
    compose: ComposeSession,
    screen: Screen,
}

impl Default for Screen {
    fn default() -> Self {
        Self::Listing(MailboxView::Inbox)
    }
}

impl ViewCoordinator {
    /// Creates a coordinator over the given store, listing the inbox.
    #[must_use]
    pub fn new(store: MailboxStore) -> Self {
        Self {
            store,
            compose: ComposeSession::new(),
            screen: Screen::default(),
        }
    }

    /// The current screen.
    #[must_use]
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The mailbox view the screen belongs to.
    #[must_use]
    pub const fn current_view(&self) -> MailboxView {
        self.screen.view()
    }

    /// Whether the compose overlay is open. Independent of the screen
    /// underneath.
    #[must_use]
    pub const fn is_composing(&self) -> bool {
        self.compose.is_editing()
    }

    /// Read access to the item collection.
    #[must_use]
    pub const fn store(&self) -> &MailboxStore {
        &self.store
    }

    /// Read access to the compose session.
    #[must_use]
    pub const fn compose(&self) -> &ComposeSession {
        &self.compose
    }

    /// Mutable access to the compose session, for field edits and the assist
    /// protocol. Data mutations of the item collection go through the intent
    /// methods below instead.
    pub const fn compose_mut(&mut self) -> &mut ComposeSession {
        &mut self.compose
    }

    /// The capability record of the current view.
    #[must_use]
    pub const fn policy(&self) -> &'static ActionPolicy {
        self.current_view().policy()
    }

    /// The items visible on the current screen's view, freshly derived.
    #[must_use]
    pub fn visible(&self) -> Vec<&MailItem> {
        self.store.list_by_view(self.current_view())
    }

    /// Fetches one mailbox view from the load collaborator into the store.
    pub async fn load_mailbox<G: MailGateway>(
        &mut self,
        gateway: &G,
        auth: &SessionAuth,
        view: MailboxView,
    ) -> Result<()> {
        let records = gateway.fetch_mailbox(auth, view).await?;
        self.store.load(records)
    }

    /// Switches to listing the given view, clearing any detail selection.
    pub fn show_mailbox(&mut self, view: MailboxView) {
        self.screen = Screen::Listing(view);
    }

    /// Opens an item from the list.
    ///
    /// Routes to the detail screen, except in views whose policy marks items
    /// as editable (drafts): those open in the compose overlay instead, since
    /// drafts are edited, not merely viewed.
    pub fn select_item(&mut self, id: &MailItemId) -> Result<()> {
        let view = self.current_view();
        let item = self.store.require(id)?;
        if view.policy().edit {
            self.compose.open(Some(item));
            debug!(%id, "draft opened for editing");
        } else {
            self.screen = Screen::Viewing {
                item: id.clone(),
                view,
            };
        }
        Ok(())
    }

    /// Returns from the detail screen to its list, clearing the selection.
    /// No-op when already listing.
    pub fn back(&mut self) {
        if let Screen::Viewing { view, .. } = &self.screen {
            self.screen = Screen::Listing(*view);
        }
    }

    /// Opens the compose overlay with a blank draft.
    pub fn compose_new(&mut self) {
        self.compose.open(None);
    }

    /// Opens the compose overlay on an existing draft.
    pub fn edit_draft(&mut self, id: &MailItemId) -> Result<()> {
        let item = self.store.require(id)?;
        self.compose.open(Some(item));
        Ok(())
    }

    /// Opens the compose overlay prefilled as a reply to the item on the
    /// detail screen.
    pub fn reply(&mut self) -> Result<()> {
        let item = Self::detail_item(&self.store, &self.screen, |policy| policy.reply, "reply")?;
        self.compose.open_reply(item);
        Ok(())
    }

    /// Opens the compose overlay prefilled as a forward of the item on the
    /// detail screen.
    pub fn forward(&mut self) -> Result<()> {
        let item =
            Self::detail_item(&self.store, &self.screen, |policy| policy.forward, "forward")?;
        self.compose.open_forward(item);
        Ok(())
    }

    fn detail_item<'a>(
        store: &'a MailboxStore,
        screen: &Screen,
        allowed: impl Fn(&ActionPolicy) -> bool,
        action: &str,
    ) -> Result<&'a MailItem> {
        let Screen::Viewing { item, view } = screen else {
            return Err(Error::Validation(format!(
                "{action} requires an open item"
            )));
        };
        if !allowed(view.policy()) {
            return Err(Error::Validation(format!(
                "{action} is not available in {}",
                view.display_name()
            )));
        }
        store.require(item)
    }

    /// Closes the compose overlay, discarding the session. The underlying
    /// screen is preserved as it was.
    pub fn close_compose(&mut self) {
        self.compose.discard();
    }

    /// Commits the open draft through the persistence collaborator; see
    /// [`ComposeSession::commit`].
    pub async fn commit_compose<G: DraftGateway>(
        &mut self,
        action: CommitAction,
        gateway: &G,
        auth: &SessionAuth,
    ) -> Result<CommitReceipt> {
        self.compose
            .commit(action, &mut self.store, gateway, auth)
            .await
    }

    /// Deletes the persisted draft open in the overlay; see
    /// [`ComposeSession::request_delete`].
    pub async fn delete_compose<G: DraftGateway>(
        &mut self,
        gateway: &G,
        auth: &SessionAuth,
    ) -> Result<()> {
        self.compose
            .request_delete(&mut self.store, gateway, auth)
            .await
    }

    /// Toggles the star flag, returning the new value (`None` for a stale
    /// id).
    pub fn toggle_star(&mut self, id: &MailItemId) -> Result<Option<bool>> {
        self.check_policy(self.policy().star, "star")?;
        Ok(self.store.toggle_star(id))
    }

    /// Moves an item to the trash. If that item is on the detail screen, the
    /// screen returns to its list immediately.
    pub fn move_to_trash(&mut self, id: &MailItemId) -> Result<bool> {
        self.check_policy(self.policy().trash, "trash")?;
        let moved = self.store.move_to_trash(id);
        self.clear_detail_if_shown(id);
        Ok(moved)
    }

    /// Restores an item from the trash.
    pub fn restore(&mut self, id: &MailItemId) -> Result<bool> {
        self.check_policy(self.policy().restore, "restore")?;
        let restored = self.store.restore(id);
        self.clear_detail_if_shown(id);
        Ok(restored)
    }

    /// Permanently deletes an item. If that item is on the detail screen,
    /// the screen returns to its list immediately.
    pub fn delete_forever(&mut self, id: &MailItemId) -> Result<bool> {
        self.check_policy(self.policy().delete_forever, "delete")?;
        let deleted = self.store.delete_forever(id);
        self.clear_detail_if_shown(id);
        Ok(deleted)
    }

    fn check_policy(&self, allowed: bool, action: &str) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "{action} is not available in {}",
                self.current_view().display_name()
            )))
        }
    }

    fn clear_detail_if_shown(&mut self, id: &MailItemId) {
        if let Screen::Viewing { item, view } = &self.screen
            && item == id
        {
            self.screen = Screen::Listing(*view);
        }
    }
}

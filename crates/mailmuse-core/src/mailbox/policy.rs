//! Per-view action policy.
//!
//! The single source of truth for which actions are legal in which mailbox
//! view and which addressee column is shown. Both the list and the detail
//! surface consult this table; neither may hard-code action visibility on its
//! own, so the two can never disagree.

use super::model::MailboxView;

/// Capability record for one mailbox view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // A fixed capability record, not state
pub struct ActionPolicy {
    /// Star/unstar is available.
    pub star: bool,
    /// Move-to-trash is available.
    pub trash: bool,
    /// Permanent deletion is available.
    pub delete_forever: bool,
    /// Restore-from-trash is available.
    pub restore: bool,
    /// Reply is available.
    pub reply: bool,
    /// Forward is available.
    pub forward: bool,
    /// Selecting an item opens it for editing instead of viewing.
    pub edit: bool,
    /// The list shows the recipient column.
    pub to_field: bool,
    /// The list shows the sender column.
    pub from_field: bool,
}

const INBOX: ActionPolicy = ActionPolicy {
    star: true,
    trash: true,
    delete_forever: false,
    restore: false,
    reply: true,
    forward: true,
    edit: false,
    to_field: false,
    from_field: true,
};

const SENT: ActionPolicy = ActionPolicy {
    star: false,
    trash: true,
    delete_forever: false,
    restore: false,
    reply: false,
    forward: true,
    edit: false,
    to_field: true,
    from_field: false,
};

const DRAFTS: ActionPolicy = ActionPolicy {
    star: false,
    trash: true,
    delete_forever: true,
    restore: false,
    reply: false,
    forward: false,
    edit: true,
    to_field: true,
    from_field: false,
};

const STARRED: ActionPolicy = ActionPolicy {
    star: true,
    trash: true,
    delete_forever: false,
    restore: false,
    reply: true,
    forward: true,
    edit: false,
    to_field: false,
    from_field: true,
};

const TRASH: ActionPolicy = ActionPolicy {
    star: false,
    trash: false,
    delete_forever: true,
    restore: true,
    reply: false,
    forward: false,
    edit: false,
    to_field: false,
    from_field: true,
};

impl MailboxView {
    /// Returns the capability record for this view.
    ///
    /// Referentially stable: the same view always yields the same record.
    /// Unknown view *names* fall back to `Inbox` at parse time
    /// ([`MailboxView::parse`]), so this lookup is total.
    #[must_use]
    pub const fn policy(self) -> &'static ActionPolicy {
        match self {
            Self::Inbox => &INBOX,
            Self::Sent => &SENT,
            Self::Drafts => &DRAFTS,
            Self::Starred => &STARRED,
            Self::Trash => &TRASH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_is_referentially_stable() {
        assert!(std::ptr::eq(
            MailboxView::Inbox.policy(),
            MailboxView::Inbox.policy()
        ));
    }

    #[test]
    fn test_unknown_view_gets_inbox_policy() {
        let view = MailboxView::parse("no-such-view");
        assert!(std::ptr::eq(view.policy(), MailboxView::Inbox.policy()));
    }

    #[test]
    fn test_trash_view_allows_only_restore_and_delete() {
        let policy = MailboxView::Trash.policy();
        assert!(policy.restore);
        assert!(policy.delete_forever);
        assert!(!policy.star);
        assert!(!policy.trash);
        assert!(!policy.reply);
        assert!(!policy.forward);
        assert!(!policy.edit);
    }

    #[test]
    fn test_drafts_open_for_editing() {
        assert!(MailboxView::Drafts.policy().edit);
        assert!(!MailboxView::Inbox.policy().edit);
        assert!(!MailboxView::Trash.policy().edit);
    }

    #[test]
    fn test_addressee_column_per_view() {
        assert!(MailboxView::Inbox.policy().from_field);
        assert!(!MailboxView::Inbox.policy().to_field);
        assert!(MailboxView::Sent.policy().to_field);
        assert!(MailboxView::Drafts.policy().to_field);
    }
}

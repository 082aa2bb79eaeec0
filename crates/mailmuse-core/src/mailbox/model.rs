//! Mail item data models.

use std::fmt;

use chrono::{DateTime, Local};

/// Maximum number of characters in a list snippet.
const SNIPPET_LEN: usize = 80;

/// Unique identifier for a mail item.
///
/// Server-assigned for loaded items, locally generated (`local-N`) for drafts
/// that have not been persisted yet. Stable for the item's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailItemId(String);

impl MailItemId {
    /// Creates an id from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MailItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier grouping a draft with the conversation it replies to or
/// forwards. Assigned once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadId(String);

impl ThreadId {
    /// Creates a thread id from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Addressee identity: display name plus address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Display name; falls back to the address when the source had none.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl Address {
    /// Parses a `"Name <email@example.com>"` or bare-address string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Some(start) = raw.rfind('<')
            && let Some(end) = raw.rfind('>')
            && start < end
        {
            let email = raw[start + 1..end].to_string();
            let name = raw[..start].trim().to_string();
            if name.is_empty() {
                return Self {
                    name: email.clone(),
                    email,
                };
            }
            return Self { name, email };
        }
        Self {
            name: raw.to_string(),
            email: raw.to_string(),
        }
    }

    /// Formats as `"Name <email>"`, or the bare address when both match.
    #[must_use]
    pub fn display(&self) -> String {
        if self.name == self.email {
            self.email.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }
}

/// The stored type of a mail item.
///
/// Starred and trash are *flags* surfaced as derived views, never stored
/// kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemKind {
    /// Received mail.
    #[default]
    Inbox,
    /// Sent mail.
    Sent,
    /// A draft under composition.
    Draft,
}

impl ItemKind {
    /// Parses the backend string representation; `None` for unknown kinds so
    /// the caller can report an integrity error instead of guessing.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inbox" => Some(Self::Inbox),
            "sent" => Some(Self::Sent),
            "draft" | "drafts" => Some(Self::Draft),
            _ => None,
        }
    }

    /// Backend string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Sent => "Sent",
            Self::Draft => "Draft",
        }
    }
}

/// A named, derived view over the item collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MailboxView {
    /// Received mail, minus trashed items.
    #[default]
    Inbox,
    /// Sent mail, minus trashed items.
    Sent,
    /// Drafts, minus trashed items.
    Drafts,
    /// Starred items of any kind, minus trashed items.
    Starred,
    /// Trashed items of any kind.
    Trash,
}

impl MailboxView {
    /// Parses a view name. Unknown names fall back to `Inbox`, matching the
    /// policy table's fallback rule.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sent" => Self::Sent,
            "draft" | "drafts" => Self::Drafts,
            "starred" => Self::Starred,
            "trash" => Self::Trash,
            _ => Self::Inbox,
        }
    }

    /// Backend query-string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Sent => "Sent",
            Self::Drafts => "Drafts",
            Self::Starred => "Starred",
            Self::Trash => "Trash",
        }
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Sent => "Sent",
            Self::Drafts => "Drafts",
            Self::Starred => "Starred",
            Self::Trash => "Trash",
        }
    }
}

/// A single mail item owned by the [`MailboxStore`](crate::MailboxStore).
#[derive(Debug, Clone)]
pub struct MailItem {
    /// Unique identifier.
    pub id: MailItemId,
    /// Stored type.
    pub kind: ItemKind,
    /// Sender identity; absent on outgoing items.
    pub sender: Option<Address>,
    /// Recipient identity; absent on incoming items.
    pub recipient: Option<Address>,
    /// Subject line.
    pub subject: String,
    /// Full body text.
    pub body: String,
    /// Display timestamp, kept opaque; no ordering logic depends on it.
    pub date: String,
    /// Starred flag, independent of `trashed`.
    pub starred: bool,
    /// Trashed flag; hides the item from its origin view without erasing it.
    pub trashed: bool,
    /// Whether the content originated from an AI-generation call. Immutable
    /// after creation.
    pub from_ai: bool,
    /// Conversation grouping, if any.
    pub thread_id: Option<ThreadId>,
}

impl MailItem {
    /// Creates a bare item. Flags default to unset; addressees and thread are
    /// filled in by the caller.
    #[must_use]
    pub fn new(
        id: MailItemId,
        kind: ItemKind,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            sender: None,
            recipient: None,
            subject: subject.into(),
            body: body.into(),
            date: String::new(),
            starred: false,
            trashed: false,
            from_ai: false,
            thread_id: None,
        }
    }

    /// Display-only truncation of the body. Recomputed on demand, never
    /// stored, so it always reflects the current body.
    #[must_use]
    pub fn snippet(&self) -> String {
        let mut chars = self.body.chars();
        let head: String = chars.by_ref().take(SNIPPET_LEN).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    /// Formats the item date in local time, falling back to the raw string
    /// when it does not parse as RFC 2822 or RFC 3339.
    #[must_use]
    pub fn display_date(&self) -> String {
        if let Ok(dt) = DateTime::parse_from_rfc2822(&self.date) {
            let local: DateTime<Local> = dt.with_timezone(&Local);
            return local.format("%a, %d %b %Y %H:%M:%S").to_string();
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date) {
            let local: DateTime<Local> = dt.with_timezone(&Local);
            return local.format("%a, %d %b %Y %H:%M:%S").to_string();
        }
        self.date.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_name_and_email() {
        let addr = Address::parse("Jane Smith <jane@example.com>");
        assert_eq!(addr.name, "Jane Smith");
        assert_eq!(addr.email, "jane@example.com");
        assert_eq!(addr.display(), "Jane Smith <jane@example.com>");
    }

    #[test]
    fn test_address_parse_bare_email() {
        let addr = Address::parse("jane@example.com");
        assert_eq!(addr.name, "jane@example.com");
        assert_eq!(addr.display(), "jane@example.com");
    }

    #[test]
    fn test_item_kind_parse_unknown_is_none() {
        assert_eq!(ItemKind::parse("Sent"), Some(ItemKind::Sent));
        assert_eq!(ItemKind::parse("outbox"), None);
    }

    #[test]
    fn test_mailbox_view_parse_falls_back_to_inbox() {
        assert_eq!(MailboxView::parse("trash"), MailboxView::Trash);
        assert_eq!(MailboxView::parse("archive"), MailboxView::Inbox);
        assert_eq!(MailboxView::parse(""), MailboxView::Inbox);
    }

    #[test]
    fn test_snippet_truncates_long_body() {
        let long = "x".repeat(200);
        let item = MailItem::new(MailItemId::new("1"), ItemKind::Inbox, "s", long);
        let snippet = item.snippet();
        assert_eq!(snippet.chars().count(), 80 + 3);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_snippet_short_body_untouched() {
        let item = MailItem::new(MailItemId::new("1"), ItemKind::Inbox, "s", "short body");
        assert_eq!(item.snippet(), "short body");
    }

    #[test]
    fn test_display_date_falls_back_to_raw() {
        let mut item = MailItem::new(MailItemId::new("1"), ItemKind::Inbox, "s", "b");
        item.date = "yesterday".into();
        assert_eq!(item.display_date(), "yesterday");
    }
}

//! Wire records exchanged with the backend services.

use serde::{Deserialize, Serialize};

use crate::compose::DraftStatus;
use crate::error::{Error, Result};
use crate::mailbox::{Address, ItemKind, MailItem, MailItemId, ThreadId};

/// A mail document as returned by the email service.
///
/// Every field the core requires is optional here so that a malformed
/// document can be reported as an integrity error by [`MailRecord::into_item`]
/// instead of failing deserialization of the whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailRecord {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Stored kind (`Inbox`, `Sent`, `Draft`).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Sender, `"Name <email>"` or bare address.
    #[serde(default)]
    pub sender: Option<String>,
    /// Recipient, `"Name <email>"` or bare address.
    #[serde(default)]
    pub recipient: Option<String>,
    /// Subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Full body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Display timestamp.
    #[serde(default)]
    pub date: Option<String>,
    /// Starred flag.
    #[serde(default)]
    pub starred: bool,
    /// Trashed flag.
    #[serde(default)]
    pub trashed: bool,
    /// Whether the content came from an AI-generation call.
    #[serde(default)]
    pub from_ai: bool,
    /// Conversation grouping.
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl MailRecord {
    /// Validates the record and converts it into an owned [`MailItem`].
    ///
    /// Missing required fields or an unknown kind are integrity errors, not
    /// defaults.
    pub fn into_item(self) -> Result<MailItem> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Integrity("missing id".into()))?;
        let kind = match self.kind {
            Some(raw) => ItemKind::parse(&raw)
                .ok_or_else(|| Error::Integrity(format!("unknown kind `{raw}` on item {id}")))?,
            None => return Err(Error::Integrity(format!("missing kind on item {id}"))),
        };
        let subject = self
            .subject
            .ok_or_else(|| Error::Integrity(format!("missing subject on item {id}")))?;
        let body = self
            .body
            .ok_or_else(|| Error::Integrity(format!("missing body on item {id}")))?;
        let date = self
            .date
            .ok_or_else(|| Error::Integrity(format!("missing date on item {id}")))?;

        let mut item = MailItem::new(MailItemId::new(id), kind, subject, body);
        item.date = date;
        item.sender = self.sender.as_deref().map(Address::parse);
        item.recipient = self.recipient.as_deref().map(Address::parse);
        item.starred = self.starred;
        item.trashed = self.trashed;
        item.from_ai = self.from_ai;
        item.thread_id = self.thread_id.map(ThreadId::new);
        Ok(item)
    }
}

/// Create/update body for the drafts service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPayload {
    /// Recipient addresses, comma separated.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Conversation the draft belongs to.
    pub thread_id: Option<String>,
    /// Whether the body contains AI-generated text.
    pub from_ai: bool,
}

/// A draft document as returned by the drafts service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecord {
    /// Server-assigned draft identifier.
    pub draft_id: String,
    /// Owner of the draft.
    pub user_id: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Body text.
    #[serde(default)]
    pub body: String,
    /// Recipient addresses, comma separated.
    #[serde(default)]
    pub to: String,
    /// Conversation the draft belongs to.
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Whether the body contains AI-generated text.
    #[serde(default)]
    pub from_ai: bool,
    /// Server-side lifecycle status.
    #[serde(default)]
    pub status: DraftStatus,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last-update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Send timestamp, once sent.
    #[serde(default)]
    pub sent_at: Option<String>,
}

impl DraftRecord {
    /// Converts the draft document into an owned [`MailItem`] of draft kind.
    #[must_use]
    pub fn into_item(self) -> MailItem {
        let mut item = MailItem::new(
            MailItemId::new(self.draft_id),
            ItemKind::Draft,
            self.subject,
            self.body,
        );
        if !self.to.is_empty() {
            item.recipient = Some(Address::parse(&self.to));
        }
        item.date = self.updated_at.or(self.created_at).unwrap_or_default();
        item.from_ai = self.from_ai;
        item.thread_id = self.thread_id.map(ThreadId::new);
        item
    }
}

impl From<DraftRecord> for MailRecord {
    /// Reshapes a drafts-service document into the common load record, so
    /// the drafts mailbox goes through the same integrity-checked ingest
    /// path as every other view.
    fn from(draft: DraftRecord) -> Self {
        Self {
            id: Some(draft.draft_id),
            kind: Some(ItemKind::Draft.as_str().to_string()),
            sender: None,
            recipient: (!draft.to.is_empty()).then_some(draft.to),
            subject: Some(draft.subject),
            body: Some(draft.body),
            date: Some(draft.updated_at.or(draft.created_at).unwrap_or_default()),
            starred: false,
            trashed: false,
            from_ai: draft.from_ai,
            thread_id: draft.thread_id,
        }
    }
}

//! Compose draft data models.

use serde::{Deserialize, Serialize};

use crate::mailbox::{Address, MailItem, ThreadId};
use crate::remote::DraftPayload;

/// Which draft field an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    /// Recipient addresses (To).
    To,
    /// CC addresses.
    Cc,
    /// BCC addresses.
    Bcc,
    /// Subject line.
    Subject,
    /// Message body.
    Body,
}

/// How a draft leaves the compose session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    /// Send now.
    Send,
    /// Keep as a draft.
    SaveDraft,
    /// Hand to the backend for deferred sending.
    Schedule,
}

/// Server-side draft lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    /// Saved, not yet approved for sending.
    #[default]
    Pending,
    /// Approved; eligible for sending.
    Approved,
    /// Sent.
    Sent,
}

impl DraftStatus {
    /// Backend string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Sent => "sent",
        }
    }
}

/// The editable fields of the draft under composition.
///
/// This is a *copy* of a stored draft's fields; edits never touch the
/// [`MailboxStore`](crate::MailboxStore) until an explicit commit.
#[derive(Debug, Clone, Default)]
pub struct DraftFields {
    /// Recipient addresses (To), comma separated.
    pub to: String,
    /// CC addresses, comma separated.
    pub cc: String,
    /// BCC addresses, comma separated.
    pub bcc: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Conversation the draft belongs to.
    pub thread_id: Option<ThreadId>,
    /// Whether the body contains AI-generated text.
    pub from_ai: bool,
}

impl DraftFields {
    /// Copies the fields out of a stored draft item for editing.
    #[must_use]
    pub fn from_item(item: &MailItem) -> Self {
        Self {
            to: item
                .recipient
                .as_ref()
                .map(Address::display)
                .unwrap_or_default(),
            cc: String::new(),
            bcc: String::new(),
            subject: item.subject.clone(),
            body: item.body.clone(),
            thread_id: item.thread_id.clone(),
            from_ai: item.from_ai,
        }
    }

    /// Prefills a reply to the given item: `Re:` subject, quoted body,
    /// addressed to the original sender, same thread.
    #[must_use]
    pub fn reply(original: &MailItem) -> Self {
        let subject = if original.subject.to_lowercase().starts_with("re:") {
            original.subject.clone()
        } else {
            format!("Re: {}", original.subject)
        };
        let body = format!("\n\n> {}", original.body.replace('\n', "\n> "));
        Self {
            to: original
                .sender
                .as_ref()
                .map(Address::display)
                .unwrap_or_default(),
            subject,
            body,
            thread_id: original.thread_id.clone(),
            ..Default::default()
        }
    }

    /// Prefills a forward of the given item: `Fwd:` subject, forwarded-header
    /// body, recipient left blank, same thread.
    #[must_use]
    pub fn forward(original: &MailItem) -> Self {
        let subject = if original.subject.to_lowercase().starts_with("fwd:") {
            original.subject.clone()
        } else {
            format!("Fwd: {}", original.subject)
        };
        let original_from = original
            .sender
            .as_ref()
            .map(Address::display)
            .unwrap_or_default();
        let body = format!(
            "\n\n---------- Forwarded message ----------\nFrom: {original_from}\n\n{}",
            original.body
        );
        Self {
            subject,
            body,
            thread_id: original.thread_id.clone(),
            ..Default::default()
        }
    }

    /// Writes a value into one field.
    pub fn set(&mut self, field: ComposeField, value: &str) {
        let target = match field {
            ComposeField::To => &mut self.to,
            ComposeField::Cc => &mut self.cc,
            ComposeField::Bcc => &mut self.bcc,
            ComposeField::Subject => &mut self.subject,
            ComposeField::Body => &mut self.body,
        };
        value.clone_into(target);
    }

    /// Non-empty recipient entries from the To field.
    #[must_use]
    pub fn recipient_list(&self) -> Vec<&str> {
        self.to
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect()
    }

    /// Validates the draft for the given commit action. Returns the first
    /// problem found, or `None` when the draft is acceptable.
    ///
    /// Only `Send` requires a recipient; drafts may be saved half-written.
    #[must_use]
    pub fn validate(&self, action: CommitAction) -> Option<String> {
        if action == CommitAction::Send {
            let recipients = self.recipient_list();
            if recipients.is_empty() {
                return Some("Please enter at least one recipient".to_string());
            }
            for recipient in recipients {
                if !recipient.contains('@') {
                    return Some(format!("Invalid email address: {recipient}"));
                }
            }
        }
        None
    }

    /// Converts to the drafts-service create/update body.
    #[must_use]
    pub fn to_payload(&self) -> DraftPayload {
        DraftPayload {
            to: self.to.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            thread_id: self.thread_id.as_ref().map(|t| t.as_str().to_string()),
            from_ai: self.from_ai,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::{Address, ItemKind, MailItemId};

    fn original() -> MailItem {
        let mut item = MailItem::new(
            MailItemId::new("m1"),
            ItemKind::Inbox,
            "Plans",
            "First line\nSecond line",
        );
        item.sender = Some(Address::parse("Ann <ann@example.com>"));
        item.thread_id = Some(ThreadId::new("t1"));
        item
    }

    #[test]
    fn test_reply_prefill() {
        let fields = DraftFields::reply(&original());
        assert_eq!(fields.subject, "Re: Plans");
        assert_eq!(fields.to, "Ann <ann@example.com>");
        assert_eq!(fields.body, "\n\n> First line\n> Second line");
        assert_eq!(fields.thread_id, Some(ThreadId::new("t1")));
    }

    #[test]
    fn test_reply_does_not_stack_prefixes() {
        let mut item = original();
        item.subject = "Re: Plans".into();
        assert_eq!(DraftFields::reply(&item).subject, "Re: Plans");
    }

    #[test]
    fn test_forward_prefill_keeps_recipient_blank() {
        let fields = DraftFields::forward(&original());
        assert_eq!(fields.subject, "Fwd: Plans");
        assert!(fields.to.is_empty());
        assert!(fields.body.contains("---------- Forwarded message ----------"));
        assert!(fields.body.contains("From: Ann <ann@example.com>"));
    }

    #[test]
    fn test_send_requires_recipient() {
        let fields = DraftFields::default();
        assert!(fields.validate(CommitAction::Send).is_some());
        assert!(fields.validate(CommitAction::SaveDraft).is_none());
    }

    #[test]
    fn test_send_rejects_malformed_address() {
        let fields = DraftFields {
            to: "ann@example.com, not-an-address".into(),
            ..Default::default()
        };
        let problem = fields.validate(CommitAction::Send).unwrap();
        assert!(problem.contains("not-an-address"));
    }

    #[test]
    fn test_recipient_list_trims_and_drops_empties() {
        let fields = DraftFields {
            to: " a@x.com, , b@y.com ,".into(),
            ..Default::default()
        };
        assert_eq!(fields.recipient_list(), vec!["a@x.com", "b@y.com"]);
    }

    #[test]
    fn test_draft_status_serde_roundtrip() {
        for status in [DraftStatus::Pending, DraftStatus::Approved, DraftStatus::Sent] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: DraftStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }
}

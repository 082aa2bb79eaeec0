//! End-to-end flows across the store, compose session, and view coordinator,
//! using in-memory gateways in place of the network layer.

use std::cell::RefCell;

use mailmuse_core::{
    AssistGateway, AssistOutcome, CommitAction, ComposeField, DraftGateway, DraftPayload,
    DraftRecord, DraftStatus, Error, ItemKind, MailGateway, MailItem, MailItemId, MailRecord,
    MailboxStore, MailboxView, RemoteResult, Screen, SessionAuth, ViewCoordinator,
};

fn auth() -> SessionAuth {
    SessionAuth::new("bearer-token", "user-1")
}

fn id(s: &str) -> MailItemId {
    MailItemId::new(s)
}

fn record(item_id: &str, kind: &str, subject: &str) -> MailRecord {
    MailRecord {
        id: Some(item_id.into()),
        kind: Some(kind.into()),
        sender: Some("Ann <ann@example.com>".into()),
        recipient: None,
        subject: Some(subject.into()),
        body: Some(format!("body of {subject}")),
        date: Some("2026-01-15T19:31:43Z".into()),
        starred: false,
        trashed: false,
        from_ai: false,
        thread_id: None,
    }
}

/// Mail load gateway serving a fixed page.
struct FixedMail(Vec<MailRecord>);

impl MailGateway for FixedMail {
    async fn fetch_mailbox(
        &self,
        _auth: &SessionAuth,
        _view: MailboxView,
    ) -> RemoteResult<Vec<MailRecord>> {
        Ok(self.0.clone())
    }
}

/// Drafts gateway that persists everything it is asked to.
#[derive(Default)]
struct AcceptingDrafts {
    seq: RefCell<u32>,
}

impl AcceptingDrafts {
    fn record(id: &str, payload: &DraftPayload, status: DraftStatus) -> DraftRecord {
        DraftRecord {
            draft_id: id.to_string(),
            user_id: "user-1".into(),
            subject: payload.subject.clone(),
            body: payload.body.clone(),
            to: payload.to.clone(),
            thread_id: payload.thread_id.clone(),
            from_ai: payload.from_ai,
            status,
            created_at: Some("2026-02-01T10:00:00Z".into()),
            updated_at: Some("2026-02-01T10:00:00Z".into()),
            sent_at: None,
        }
    }
}

impl DraftGateway for AcceptingDrafts {
    async fn create_draft(
        &self,
        _auth: &SessionAuth,
        draft: &DraftPayload,
    ) -> RemoteResult<DraftRecord> {
        *self.seq.borrow_mut() += 1;
        let draft_id = format!("srv-{}", self.seq.borrow());
        Ok(Self::record(&draft_id, draft, DraftStatus::Pending))
    }

    async fn update_draft(
        &self,
        _auth: &SessionAuth,
        draft_id: &MailItemId,
        draft: &DraftPayload,
    ) -> RemoteResult<DraftRecord> {
        Ok(Self::record(draft_id.as_str(), draft, DraftStatus::Pending))
    }

    async fn delete_draft(&self, _auth: &SessionAuth, _id: &MailItemId) -> RemoteResult<()> {
        Ok(())
    }

    async fn send_draft(
        &self,
        _auth: &SessionAuth,
        draft_id: &MailItemId,
    ) -> RemoteResult<DraftRecord> {
        let empty = DraftPayload {
            to: "someone@example.com".into(),
            subject: String::new(),
            body: String::new(),
            thread_id: None,
            from_ai: false,
        };
        Ok(Self::record(draft_id.as_str(), &empty, DraftStatus::Sent))
    }

    async fn schedule_draft(
        &self,
        _auth: &SessionAuth,
        draft_id: &MailItemId,
    ) -> RemoteResult<DraftRecord> {
        let empty = DraftPayload {
            to: String::new(),
            subject: String::new(),
            body: String::new(),
            thread_id: None,
            from_ai: false,
        };
        Ok(Self::record(draft_id.as_str(), &empty, DraftStatus::Approved))
    }
}

/// Assist gateway returning canned text.
struct CannedAssist(&'static str);

impl AssistGateway for CannedAssist {
    async fn generate_reply(&self, _auth: &SessionAuth, _context: &str) -> RemoteResult<String> {
        Ok(self.0.to_string())
    }
}

#[tokio::test]
async fn load_then_star_trash_restore_round_trip() {
    let gateway = FixedMail(vec![
        record("1", "Inbox", "Hi"),
        record("2", "Inbox", "Second"),
    ]);
    let mut coord = ViewCoordinator::new(MailboxStore::new());
    coord
        .load_mailbox(&gateway, &auth(), MailboxView::Inbox)
        .await
        .unwrap();
    assert_eq!(coord.visible().len(), 2);

    coord.toggle_star(&id("1")).unwrap();
    coord.show_mailbox(MailboxView::Starred);
    assert!(coord.visible().iter().any(|i| i.id == id("1")));

    coord.move_to_trash(&id("1")).unwrap();
    assert!(coord.visible().iter().all(|i| i.id != id("1")));
    coord.show_mailbox(MailboxView::Trash);
    assert!(coord.visible().iter().any(|i| i.id == id("1")));

    coord.restore(&id("1")).unwrap();
    coord.show_mailbox(MailboxView::Starred);
    assert!(coord.visible().iter().any(|i| i.id == id("1")));
}

#[tokio::test]
async fn malformed_record_fails_the_load() {
    let mut bad = record("3", "Inbox", "broken");
    bad.subject = None;
    let gateway = FixedMail(vec![record("1", "Inbox", "ok"), bad]);

    let mut coord = ViewCoordinator::new(MailboxStore::new());
    let result = coord
        .load_mailbox(&gateway, &auth(), MailboxView::Inbox)
        .await;
    assert!(matches!(result, Err(Error::Integrity(_))));
    assert!(coord.store().is_empty());
}

#[tokio::test]
async fn empty_recipient_send_is_rejected_without_side_effects() {
    let drafts = AcceptingDrafts::default();
    let mut coord = ViewCoordinator::new(MailboxStore::new());

    coord.compose_new();
    coord.compose_mut().update_field(ComposeField::To, "");
    coord
        .compose_mut()
        .update_field(ComposeField::Body, "hello?");

    let result = coord
        .commit_compose(CommitAction::Send, &drafts, &auth())
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(coord.store().is_empty());
    assert!(coord.is_composing());
}

#[tokio::test]
async fn compose_send_appears_in_sent_view() {
    let drafts = AcceptingDrafts::default();
    let mut coord = ViewCoordinator::new(MailboxStore::new());

    coord.compose_new();
    coord
        .compose_mut()
        .update_field(ComposeField::To, "bob@example.com");
    coord
        .compose_mut()
        .update_field(ComposeField::Subject, "Plans");
    coord.compose_mut().update_field(ComposeField::Body, "Sat?");

    let receipt = coord
        .commit_compose(CommitAction::Send, &drafts, &auth())
        .await
        .unwrap();
    assert!(!coord.is_composing());

    coord.show_mailbox(MailboxView::Sent);
    let sent = coord.visible();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, receipt.item_id);
    assert_eq!(sent[0].kind, ItemKind::Sent);
}

#[tokio::test]
async fn saved_draft_can_be_reopened_and_deleted() {
    let drafts = AcceptingDrafts::default();
    let mut coord = ViewCoordinator::new(MailboxStore::new());

    coord.compose_new();
    coord
        .compose_mut()
        .update_field(ComposeField::Subject, "WIP");
    let receipt = coord
        .commit_compose(CommitAction::SaveDraft, &drafts, &auth())
        .await
        .unwrap();

    coord.show_mailbox(MailboxView::Drafts);
    assert_eq!(coord.visible().len(), 1);

    // Selecting a draft opens the editor, not the detail screen.
    coord.select_item(&receipt.item_id).unwrap();
    assert!(coord.is_composing());
    assert!(coord.compose().is_persisted());
    assert!(matches!(coord.screen(), Screen::Listing(_)));

    coord.delete_compose(&drafts, &auth()).await.unwrap();
    assert!(!coord.is_composing());
    assert!(coord.visible().is_empty());
}

#[tokio::test]
async fn assist_appends_exactly_one_generated_text() {
    let assist = CannedAssist("Generated reply.");
    let mut coord = ViewCoordinator::new(MailboxStore::new());

    coord.compose_new();
    coord
        .compose_mut()
        .update_field(ComposeField::Body, "My own words.");

    let request = coord
        .compose_mut()
        .begin_assist(Some("draft a reply"))
        .unwrap();
    // A second request while the first is outstanding is rejected.
    assert!(matches!(
        coord.compose_mut().begin_assist(Some("another")),
        Err(Error::ConcurrentRequest)
    ));

    let generated = assist.generate_reply(&auth(), &request.context).await;
    let outcome = coord.compose_mut().finish_assist(request.ticket, generated);
    assert_eq!(outcome, AssistOutcome::Applied);
    assert_eq!(
        coord.compose().fields().unwrap().body,
        "My own words.\n\nGenerated reply."
    );
}

#[tokio::test]
async fn assist_response_after_close_is_dropped() {
    let assist = CannedAssist("Too late.");
    let mut coord = ViewCoordinator::new(MailboxStore::new());

    coord.compose_new();
    let request = coord.compose_mut().begin_assist(None).unwrap();
    let generated = assist.generate_reply(&auth(), &request.context).await;

    coord.close_compose();
    let outcome = coord.compose_mut().finish_assist(request.ticket, generated);
    assert_eq!(outcome, AssistOutcome::Stale);
    assert!(!coord.is_composing());
}

#[tokio::test]
async fn reply_from_detail_carries_thread_and_quotes() {
    let mut store = MailboxStore::new();
    let mut item = MailItem::new(id("m1"), ItemKind::Inbox, "Plans", "Original text");
    item.sender = Some(mailmuse_core::Address::parse("Ann <ann@example.com>"));
    item.thread_id = Some(mailmuse_core::ThreadId::new("t-9"));
    store.insert(item);

    let mut coord = ViewCoordinator::new(store);
    coord.select_item(&id("m1")).unwrap();
    coord.reply().unwrap();

    let fields = coord.compose().fields().unwrap();
    assert_eq!(fields.subject, "Re: Plans");
    assert_eq!(fields.to, "Ann <ann@example.com>");
    assert!(fields.body.contains("> Original text"));
    assert_eq!(
        fields.thread_id.as_ref().map(|t| t.as_str()),
        Some("t-9")
    );
}

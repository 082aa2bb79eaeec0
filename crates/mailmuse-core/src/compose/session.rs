//! The draft-under-edit state machine.

use tracing::{debug, warn};

use super::model::{CommitAction, ComposeField, DraftFields};
use crate::error::{Error, Result};
use crate::mailbox::{
    Address, ItemKind, MailItem, MailItemId, MailboxStore, ThreadId,
};
use crate::remote::{DraftGateway, RemoteError, SessionAuth};

/// Ticket for one outstanding AI assist request.
///
/// Carries the session epoch at issue time; a response whose ticket is stale
/// (the session was discarded, committed, or reopened in the meantime) is
/// dropped instead of applied.
#[derive(Debug)]
pub struct AssistTicket {
    epoch: u64,
}

/// An accepted assist request: the ticket to hand back on completion plus the
/// context text to send to the generation collaborator.
#[derive(Debug)]
pub struct AssistRequest {
    /// Ticket identifying this request.
    pub ticket: AssistTicket,
    /// Prompt or current draft body to generate from.
    pub context: String,
}

/// What became of a finished assist request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistOutcome {
    /// Generated text was appended to the draft body.
    Applied,
    /// The generation call failed; the body is untouched and the error is
    /// recorded for display.
    Failed(String),
    /// The session moved on before the response arrived; it was discarded.
    Stale,
}

/// Receipt for a successful commit.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// Id of the item now present in the store (server-assigned for new
    /// drafts).
    pub item_id: MailItemId,
    /// The action that was committed.
    pub action: CommitAction,
}

/// Editing state while a draft is open.
#[derive(Debug)]
struct EditState {
    draft: DraftFields,
    draft_id: MailItemId,
    is_persisted: bool,
    is_dirty: bool,
    assist_in_flight: bool,
    last_error: Option<String>,
}

/// Owns the transient draft under edit and its send/save/discard protocol.
///
/// Holds at most one draft at a time (`Empty -> Editing -> Empty`). The
/// session works on a *copy* of a stored draft's fields and writes back into
/// the [`MailboxStore`] only on an explicit commit, never per keystroke.
///
/// The one overlapping-duration operation is an AI assist request; it is
/// single-outstanding per session, and the epoch carried by its
/// [`AssistTicket`] guarantees a response landing after a discard or commit
/// is ignored rather than applied.
#[derive(Debug, Default)]
pub struct ComposeSession {
    state: Option<EditState>,
    /// Bumped on every open/discard/commit; stale assist tickets are detected
    /// by comparing against it.
    epoch: u64,
    /// Counter for locally generated draft and thread ids.
    local_seq: u64,
}

impl ComposeSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a draft is currently open for editing.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.state.is_some()
    }

    /// The fields of the draft under edit, if any.
    #[must_use]
    pub fn fields(&self) -> Option<&DraftFields> {
        self.state.as_ref().map(|s| &s.draft)
    }

    /// Id of the draft under edit, if any.
    #[must_use]
    pub fn draft_id(&self) -> Option<&MailItemId> {
        self.state.as_ref().map(|s| &s.draft_id)
    }

    /// Whether the open draft has a server-assigned identifier.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.is_persisted)
    }

    /// Whether the open draft has unsaved edits.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.is_dirty)
    }

    /// Whether an assist request is currently outstanding.
    #[must_use]
    pub fn assist_in_flight(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.assist_in_flight)
    }

    /// The last user-visible error recorded on this draft, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.state.as_ref().and_then(|s| s.last_error.as_deref())
    }

    /// Opens a draft for editing.
    ///
    /// With an existing draft item its fields are copied in; with `None` a
    /// blank draft starts under a fresh local id and a newly generated thread
    /// id. Opening over a previous edit replaces it and invalidates any
    /// in-flight assist.
    pub fn open(&mut self, existing: Option<&MailItem>) {
        self.epoch += 1;
        let state = match existing {
            Some(item) => EditState {
                draft: DraftFields::from_item(item),
                draft_id: item.id.clone(),
                is_persisted: true,
                is_dirty: false,
                assist_in_flight: false,
                last_error: None,
            },
            None => {
                self.local_seq += 1;
                let draft = DraftFields {
                    thread_id: Some(ThreadId::new(format!("local-thread-{}", self.local_seq))),
                    ..DraftFields::default()
                };
                EditState {
                    draft,
                    draft_id: MailItemId::new(format!("local-{}", self.local_seq)),
                    is_persisted: false,
                    is_dirty: false,
                    assist_in_flight: false,
                    last_error: None,
                }
            }
        };
        debug!(draft = %state.draft_id, persisted = state.is_persisted, "compose opened");
        self.state = Some(state);
    }

    /// Opens a blank draft prefilled as a reply to `original`.
    pub fn open_reply(&mut self, original: &MailItem) {
        self.open_prefilled(DraftFields::reply(original));
    }

    /// Opens a blank draft prefilled as a forward of `original`.
    pub fn open_forward(&mut self, original: &MailItem) {
        self.open_prefilled(DraftFields::forward(original));
    }

    fn open_prefilled(&mut self, draft: DraftFields) {
        self.open(None);
        if let Some(state) = self.state.as_mut() {
            // Keep the freshly generated thread id only when the original had
            // none to inherit.
            let fallback_thread = state.draft.thread_id.take();
            state.draft = draft;
            if state.draft.thread_id.is_none() {
                state.draft.thread_id = fallback_thread;
            }
        }
    }

    /// Applies a pure local edit to one field. No network call; marks the
    /// draft dirty. Ignored when no draft is open (stray events are normal in
    /// an event loop).
    pub fn update_field(&mut self, field: ComposeField, value: &str) {
        let Some(state) = self.state.as_mut() else {
            warn!(?field, "edit ignored: no draft open");
            return;
        };
        state.draft.set(field, value);
        state.is_dirty = true;
    }

    /// Starts an AI assist request for this draft.
    ///
    /// The returned request carries the context to send to the generation
    /// collaborator (the prompt, or the current body when none is given) and
    /// a ticket to hand back to [`ComposeSession::finish_assist`]. A second
    /// call while one request is outstanding is rejected with
    /// [`Error::ConcurrentRequest`] so two generated texts can never
    /// interleave into the body.
    pub fn begin_assist(&mut self, prompt: Option<&str>) -> Result<AssistRequest> {
        let epoch = self.epoch;
        let Some(state) = self.state.as_mut() else {
            return Err(Error::Validation("no draft open".into()));
        };
        if state.assist_in_flight {
            return Err(Error::ConcurrentRequest);
        }
        state.assist_in_flight = true;
        state.last_error = None;
        let context = prompt.map_or_else(|| state.draft.body.clone(), str::to_string);
        debug!(draft = %state.draft_id, "assist request started");
        Ok(AssistRequest {
            ticket: AssistTicket { epoch },
            context,
        })
    }

    /// Completes an assist request.
    ///
    /// On success the generated text is appended to the body (never
    /// replacing user-authored content); on failure a user-visible error is
    /// recorded and the body stays untouched. A ticket from before the
    /// session's last transition is reported [`AssistOutcome::Stale`] and the
    /// response is dropped.
    pub fn finish_assist(
        &mut self,
        ticket: AssistTicket,
        outcome: std::result::Result<String, RemoteError>,
    ) -> AssistOutcome {
        if ticket.epoch != self.epoch {
            debug!("assist response arrived after session moved on; dropped");
            return AssistOutcome::Stale;
        }
        let Some(state) = self.state.as_mut() else {
            return AssistOutcome::Stale;
        };
        state.assist_in_flight = false;
        match outcome {
            Ok(text) => {
                state.draft.body.push_str("\n\n");
                state.draft.body.push_str(&text);
                state.draft.from_ai = true;
                state.is_dirty = true;
                AssistOutcome::Applied
            }
            Err(err) => {
                let message = format!("Smart reply failed: {err}");
                state.last_error = Some(message.clone());
                AssistOutcome::Failed(message)
            }
        }
    }

    /// Commits the open draft.
    ///
    /// Validates the fields for the action, persists through the gateway
    /// (create for a never-saved draft, update otherwise; `Send` and
    /// `Schedule` additionally request the matching transition), then writes
    /// the result into the store and returns the session to empty. On a
    /// remote failure the session stays in editing with `last_error` set and
    /// no local state is rolled back; the user may retry.
    pub async fn commit<G: DraftGateway>(
        &mut self,
        action: CommitAction,
        store: &mut MailboxStore,
        gateway: &G,
        auth: &SessionAuth,
    ) -> Result<CommitReceipt> {
        let Some(state) = self.state.as_mut() else {
            return Err(Error::Validation("no draft open".into()));
        };
        if let Some(problem) = state.draft.validate(action) {
            return Err(Error::Validation(problem));
        }

        let payload = state.draft.to_payload();
        let persisted = if state.is_persisted {
            gateway.update_draft(auth, &state.draft_id, &payload).await
        } else {
            gateway.create_draft(auth, &payload).await
        };
        let record = match persisted {
            Ok(record) => record,
            Err(err) => {
                state.last_error = Some(err.to_string());
                return Err(err.into());
            }
        };
        let server_id = MailItemId::new(record.draft_id.clone());

        let record = match action {
            CommitAction::SaveDraft => record,
            CommitAction::Send => match gateway.send_draft(auth, &server_id).await {
                Ok(record) => record,
                Err(err) => {
                    // The draft itself was saved; only the transition failed.
                    state.is_persisted = true;
                    state.draft_id = server_id;
                    state.last_error = Some(err.to_string());
                    return Err(err.into());
                }
            },
            CommitAction::Schedule => match gateway.schedule_draft(auth, &server_id).await {
                Ok(record) => record,
                Err(err) => {
                    state.is_persisted = true;
                    state.draft_id = server_id;
                    state.last_error = Some(err.to_string());
                    return Err(err.into());
                }
            },
        };

        let mut item = record.into_item();
        if action == CommitAction::Send {
            item.kind = ItemKind::Sent;
            if item.recipient.is_none() && !payload.to.is_empty() {
                item.recipient = Some(Address::parse(&payload.to));
            }
        }
        let item_id = item.id.clone();
        store.insert(item);
        if action == CommitAction::Send {
            // An earlier save may have stored the draft under the same id.
            store.mark_sent(&item_id);
        }

        debug!(draft = %item_id, ?action, "draft committed");
        self.epoch += 1;
        self.state = None;
        Ok(CommitReceipt { item_id, action })
    }

    /// Clears the session without touching the store. For a persisted draft
    /// with no edits this is equivalent to a plain close. Any in-flight
    /// assist response is invalidated.
    pub fn discard(&mut self) {
        if let Some(state) = &self.state {
            debug!(draft = %state.draft_id, dirty = state.is_dirty, "compose discarded");
        }
        self.epoch += 1;
        self.state = None;
    }

    /// Deletes a persisted draft remotely, then removes it from the store
    /// and empties the session.
    ///
    /// Fails with [`Error::NotPersisted`] for a draft that was never saved;
    /// the caller should plainly [`ComposeSession::discard`] instead.
    pub async fn request_delete<G: DraftGateway>(
        &mut self,
        store: &mut MailboxStore,
        gateway: &G,
        auth: &SessionAuth,
    ) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Err(Error::Validation("no draft open".into()));
        };
        if !state.is_persisted {
            return Err(Error::NotPersisted);
        }
        if let Err(err) = gateway.delete_draft(auth, &state.draft_id).await {
            state.last_error = Some(err.to_string());
            return Err(err.into());
        }
        let id = state.draft_id.clone();
        store.delete_forever(&id);
        debug!(draft = %id, "draft deleted");
        self.epoch += 1;
        self.state = None;
        Ok(())
    }
}

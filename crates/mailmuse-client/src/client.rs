//! `reqwest`-based backend client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use mailmuse_core::{
    AssistGateway, DraftGateway, DraftPayload, DraftRecord, MailGateway, MailItemId, MailRecord,
    MailboxView, RemoteError, RemoteResult, SessionAuth,
};

/// Page window for mailbox fetches, matching the backend defaults.
const DEFAULT_SKIP: u32 = 0;
const DEFAULT_LIMIT: u32 = 50;

/// HTTP client for the email, drafts, and AI-generation services.
///
/// Implements all three core gateway traits against the backend REST API.
/// Every request carries the bearer credential from the [`SessionAuth`]
/// handed in per call; the client itself holds no ambient session state.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

/// Error body shape shared by the backend services.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Response envelope of the email service.
#[derive(Debug, Deserialize)]
struct EmailsEnvelope {
    #[serde(default)]
    emails: Vec<MailRecord>,
}

/// Response envelope of the drafts service.
#[derive(Debug, Deserialize)]
struct DraftsEnvelope {
    #[serde(default)]
    items: Vec<DraftRecord>,
}

/// Request body of the AI-generation service.
#[derive(Debug, Serialize)]
struct AssistBody<'a> {
    user_id: &'a str,
    email_body: &'a str,
}

/// Response envelope of the AI-generation service.
#[derive(Debug, Deserialize)]
struct AssistEnvelope {
    #[serde(default)]
    body: String,
}

fn transport(err: &reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.to_string())
}

impl BackendClient {
    /// Creates a client for the service root, e.g. `http://localhost:8000`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, reqwest::Client::new())
    }

    /// Creates a client reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn mailbox_path(auth: &SessionAuth, view: MailboxView) -> String {
        if view == MailboxView::Drafts {
            format!("/users/{}/drafts?skip={DEFAULT_SKIP}&limit={DEFAULT_LIMIT}", auth.user_id)
        } else {
            format!(
                "/emails?skip={DEFAULT_SKIP}&limit={DEFAULT_LIMIT}&type={}",
                view.as_str()
            )
        }
    }

    fn draft_path(auth: &SessionAuth, id: &MailItemId) -> String {
        format!("/users/{}/drafts/{}", auth.user_id, id)
    }

    /// Maps a non-success response to a [`RemoteError`], extracting the
    /// server's `detail` message when present.
    async fn check(response: reqwest::Response) -> RemoteResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RemoteError::Unauthorized);
        }
        let message = match response.text().await {
            Ok(text) => serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or(text),
            Err(_) => String::new(),
        };
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> RemoteResult<T> {
        let checked = Self::check(response).await?;
        checked
            .json::<T>()
            .await
            .map_err(|err| RemoteError::Malformed(err.to_string()))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        auth: &SessionAuth,
        path: &str,
    ) -> RemoteResult<T> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&auth.token)
            .send()
            .await
            .map_err(|err| transport(&err))?;
        Self::read_json(response).await
    }

    async fn put_json<T: serde::de::DeserializeOwned>(
        &self,
        auth: &SessionAuth,
        path: &str,
        body: Option<&DraftPayload>,
    ) -> RemoteResult<T> {
        debug!(path, "PUT");
        let mut request = self.http.put(self.url(path)).bearer_auth(&auth.token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|err| transport(&err))?;
        Self::read_json(response).await
    }
}

impl MailGateway for BackendClient {
    async fn fetch_mailbox(
        &self,
        auth: &SessionAuth,
        view: MailboxView,
    ) -> RemoteResult<Vec<MailRecord>> {
        let path = Self::mailbox_path(auth, view);
        if view == MailboxView::Drafts {
            let envelope: DraftsEnvelope = self.get_json(auth, &path).await?;
            Ok(envelope.items.into_iter().map(MailRecord::from).collect())
        } else {
            let envelope: EmailsEnvelope = self.get_json(auth, &path).await?;
            Ok(envelope.emails)
        }
    }
}

impl DraftGateway for BackendClient {
    async fn create_draft(
        &self,
        auth: &SessionAuth,
        draft: &DraftPayload,
    ) -> RemoteResult<DraftRecord> {
        let path = format!("/users/{}/drafts", auth.user_id);
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(&path))
            .bearer_auth(&auth.token)
            .json(draft)
            .send()
            .await
            .map_err(|err| transport(&err))?;
        Self::read_json(response).await
    }

    async fn update_draft(
        &self,
        auth: &SessionAuth,
        id: &MailItemId,
        draft: &DraftPayload,
    ) -> RemoteResult<DraftRecord> {
        self.put_json(auth, &Self::draft_path(auth, id), Some(draft))
            .await
    }

    async fn delete_draft(&self, auth: &SessionAuth, id: &MailItemId) -> RemoteResult<()> {
        let path = Self::draft_path(auth, id);
        debug!(path, "DELETE");
        let response = self
            .http
            .delete(self.url(&path))
            .bearer_auth(&auth.token)
            .send()
            .await
            .map_err(|err| transport(&err))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn send_draft(&self, auth: &SessionAuth, id: &MailItemId) -> RemoteResult<DraftRecord> {
        // The drafts service only sends approved drafts.
        let approve = format!("{}/approve", Self::draft_path(auth, id));
        let _approved: DraftRecord = self.put_json(auth, &approve, None).await?;
        let send = format!("{}/send", Self::draft_path(auth, id));
        self.put_json(auth, &send, None).await
    }

    async fn schedule_draft(
        &self,
        auth: &SessionAuth,
        id: &MailItemId,
    ) -> RemoteResult<DraftRecord> {
        // Approval marks the draft eligible; the service sends it on its own
        // schedule.
        let approve = format!("{}/approve", Self::draft_path(auth, id));
        self.put_json(auth, &approve, None).await
    }
}

impl AssistGateway for BackendClient {
    async fn generate_reply(&self, auth: &SessionAuth, context: &str) -> RemoteResult<String> {
        let path = "/api/ai/generate-reply";
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&auth.token)
            .json(&AssistBody {
                user_id: &auth.user_id,
                email_body: context,
            })
            .send()
            .await
            .map_err(|err| transport(&err))?;
        let envelope: AssistEnvelope = Self::read_json(response).await?;
        Ok(envelope.body)
    }
}

use crate::config::EnvConfig;
use crate::models::{
    CreateNoteRequest, CreateNotebookRequest, Note, NotePatch, Notebook, NotebookSummary,
};
use serde::de::DeserializeOwned;

#[cfg(test)]
pub(crate) mod memory;

/// Values a corrupted route parameter can stringify to.
const PLACEHOLDER_IDS: [&str; 2] = ["undefined", "null"];

pub(crate) const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// Missing or placeholder identifier; the request was never sent.
    InvalidReference,
    Timeout,
    Network,
    Http(u16),
    Parse,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub recoverable: bool,
}

impl ApiError {
    pub(crate) fn invalid_reference(what: &str) -> Self {
        Self {
            kind: ApiErrorKind::InvalidReference,
            message: format!("Invalid {what} ID"),
            recoverable: true,
        }
    }

    pub(crate) fn timeout(after_ms: u32) -> Self {
        Self {
            kind: ApiErrorKind::Timeout,
            message: format!("Request timed out after {}s", after_ms / 1000),
            recoverable: true,
        }
    }

    fn network(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self {
                kind: ApiErrorKind::Timeout,
                message: "Request timed out".to_string(),
                recoverable: true,
            };
        }
        Self {
            kind: ApiErrorKind::Network,
            message: format!("Could not reach the server ({e})"),
            recoverable: true,
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: format!("Unexpected response from server: {e}"),
            recoverable: false,
        }
    }

    pub(crate) fn http(status: u16, body: &str) -> Self {
        let message = extract_detail(body).unwrap_or_else(|| {
            if status >= 500 {
                GENERIC_FAILURE.to_string()
            } else {
                format!("Request failed ({status})")
            }
        });
        Self {
            kind: ApiErrorKind::Http(status),
            message,
            recoverable: status >= 500 || status == 408 || status == 429,
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Rejects empty identifiers and stringified placeholders before a request is built.
pub(crate) fn ensure_ref<'a>(id: &'a str, what: &str) -> ApiResult<&'a str> {
    let trimmed = id.trim();
    if trimmed.is_empty() || PLACEHOLDER_IDS.contains(&trimmed) {
        return Err(ApiError::invalid_reference(what));
    }
    Ok(trimmed)
}

/// Pulls the human-readable `detail` out of an error body.
///
/// FastAPI returns either `{"detail": "text"}` or, for request validation,
/// `{"detail": [{"loc": [...], "msg": "..."}]}`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    match v.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(|l| l.as_array())
                        .and_then(|parts| parts.last())
                        .and_then(|p| p.as_str());
                    Some(match field {
                        Some(f) => format!("{f}: {msg}"),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

/// Remote notebook store. Implemented over HTTP by [`ApiClient`]; tests use
/// an in-memory store.
pub(crate) trait RemoteStore: Clone + 'static {
    async fn list_notebooks(&self) -> ApiResult<Vec<NotebookSummary>>;
    async fn get_notebook(&self, notebook_id: &str) -> ApiResult<Notebook>;
    async fn create_notebook(&self, req: &CreateNotebookRequest) -> ApiResult<NotebookSummary>;
    async fn delete_notebook(&self, notebook_id: &str) -> ApiResult<()>;
    async fn create_note(&self, notebook_id: &str, req: &CreateNoteRequest) -> ApiResult<Note>;
    async fn update_note(
        &self,
        notebook_id: &str,
        note_id: &str,
        patch: &NotePatch,
    ) -> ApiResult<()>;
    async fn delete_note(&self, notebook_id: &str, note_id: &str) -> ApiResult<()>;
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) timeout_ms: u32,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String, timeout_ms: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.api_url.clone(), config.request_timeout_ms)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn notebook_path(notebook_id: &str) -> String {
        format!("/notebooks/{}", urlencoding::encode(notebook_id))
    }

    fn note_path(notebook_id: &str, note_id: &str) -> String {
        format!(
            "/notebooks/{}/notes/{}",
            urlencoding::encode(notebook_id),
            urlencoding::encode(note_id)
        )
    }

    #[cfg(target_arch = "wasm32")]
    async fn dispatch(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        use futures::future::{select, Either};

        let send = req.send();
        let timer = gloo_timers::future::TimeoutFuture::new(self.timeout_ms);
        futures::pin_mut!(send, timer);

        match select(send, timer).await {
            Either::Left((res, _)) => res.map_err(ApiError::network),
            Either::Right(((), _)) => Err(ApiError::timeout(self.timeout_ms)),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn dispatch(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        req.timeout(std::time::Duration::from_millis(u64::from(self.timeout_ms)))
            .send()
            .await
            .map_err(ApiError::network)
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<reqwest::Response> {
        tracing::debug!(%method, path, "api request");

        let mut req = self.http.request(method.clone(), self.url(path));
        if let Some(b) = body {
            req = req.json(&b);
        }

        let result = match self.dispatch(req).await {
            Ok(res) if res.status().is_success() => Ok(res),
            Ok(res) => {
                let status = res.status().as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(ApiError::http(status, &body))
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            tracing::warn!(%method, path, kind = ?e.kind, error = %e, "api request failed");
        }
        result
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        res.json::<T>().await.map_err(|e| {
            let err = ApiError::parse(e);
            tracing::warn!(path, error = %err, "api response did not decode");
            err
        })
    }

    fn to_body(value: &impl serde::Serialize) -> ApiResult<serde_json::Value> {
        serde_json::to_value(value).map_err(ApiError::parse)
    }
}

impl RemoteStore for ApiClient {
    async fn list_notebooks(&self) -> ApiResult<Vec<NotebookSummary>> {
        self.send_json(reqwest::Method::GET, "/notebooks/", None).await
    }

    async fn get_notebook(&self, notebook_id: &str) -> ApiResult<Notebook> {
        let id = ensure_ref(notebook_id, "notebook")?;
        self.send_json(reqwest::Method::GET, &Self::notebook_path(id), None)
            .await
    }

    async fn create_notebook(&self, req: &CreateNotebookRequest) -> ApiResult<NotebookSummary> {
        let body = Self::to_body(req)?;
        self.send_json(reqwest::Method::POST, "/notebooks/", Some(body))
            .await
    }

    async fn delete_notebook(&self, notebook_id: &str) -> ApiResult<()> {
        let id = ensure_ref(notebook_id, "notebook")?;
        self.send(reqwest::Method::DELETE, &Self::notebook_path(id), None)
            .await
            .map(|_| ())
    }

    async fn create_note(&self, notebook_id: &str, req: &CreateNoteRequest) -> ApiResult<Note> {
        let id = ensure_ref(notebook_id, "notebook")?;
        let body = Self::to_body(req)?;
        let path = format!("{}/notes/", Self::notebook_path(id));
        self.send_json(reqwest::Method::POST, &path, Some(body)).await
    }

    async fn update_note(
        &self,
        notebook_id: &str,
        note_id: &str,
        patch: &NotePatch,
    ) -> ApiResult<()> {
        let nb = ensure_ref(notebook_id, "notebook")?;
        let note = ensure_ref(note_id, "note")?;
        let body = Self::to_body(patch)?;
        // The server replies `{"updated": true}`; callers refetch the notebook.
        self.send(reqwest::Method::PATCH, &Self::note_path(nb, note), Some(body))
            .await
            .map(|_| ())
    }

    async fn delete_note(&self, notebook_id: &str, note_id: &str) -> ApiResult<()> {
        let nb = ensure_ref(notebook_id, "notebook")?;
        let note = ensure_ref(note_id, "note")?;
        self.send(reqwest::Method::DELETE, &Self::note_path(nb, note), None)
            .await
            .map(|_| ())
    }
}

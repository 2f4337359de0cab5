//! The logsys API client.
//!
//! Wraps outbound calls to the REST surface under `<server>/api`. Request
//! bodies are JSON; any non-2xx response becomes an [`Error::Api`] carrying
//! the server's `error` string; empty bodies (204 or zero-length) resolve
//! to "no data"; transport failures normalize to [`Error::Unavailable`].
//!
//! Authentication is the `logsys-session` cookie set by the login endpoint.
//! The client holds a cookie jar so the cookie flows automatically once set,
//! and exposes it for persistence across invocations.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::models::{AggregatedLogEntry, ApiKey, LogEntry, LogQuery, NewProject, Project, User};

/// Name of the session cookie issued by the login endpoint.
pub const SESSION_COOKIE: &str = "logsys-session";

/// Client for the logsys REST API.
#[derive(Clone)]
pub struct ApiClient {
    /// The underlying HTTP client.
    http: Client,
    /// Base server URL (the `/api` prefix is appended per request).
    server: Url,
    /// Cookie jar carrying the session cookie.
    jar: Arc<Jar>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("server", &self.server.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the given server with no active session.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(server: Url, timeout: Duration) -> Result<Self> {
        Self::with_session(server, timeout, None)
    }

    /// Create a client, seeding the cookie jar with a previously saved
    /// session cookie value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_session(server: Url, timeout: Duration, cookie: Option<&str>) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        if let Some(value) = cookie {
            jar.add_cookie_str(&format!("{SESSION_COOKIE}={value}"), &server);
        }

        let http = Client::builder()
            .timeout(timeout)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|err| Error::internal(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { http, server, jar })
    }

    /// The server URL this client talks to.
    #[must_use]
    pub fn server(&self) -> &Url {
        &self.server
    }

    /// The current session cookie value, if any.
    ///
    /// Present after a successful login (or when the client was seeded
    /// with a saved session).
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        let header = self.jar.cookies(&self.server)?;
        extract_cookie(header.to_str().ok()?, SESSION_COOKIE)
    }

    // === Authentication ===

    /// `POST /auth/login` with the given credentials.
    ///
    /// On success the session cookie lands in the jar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with the server's message on rejected
    /// credentials, or [`Error::Unavailable`] on transport failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let body = json!({ "username": username, "password": password });
        self.post::<_, Value>("/auth/login", &body).await?;
        Ok(())
    }

    /// `POST /auth/logout`, invalidating the server-side session.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the call or is unreachable.
    pub async fn logout(&self) -> Result<()> {
        let request = self.http.post(self.url("/auth/logout"));
        self.execute::<Value>(request).await?;
        Ok(())
    }

    /// `GET /auth/me` - the currently authenticated user.
    ///
    /// Resolves to `None` on an empty 2xx response.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no valid session or the server is
    /// unreachable.
    pub async fn me(&self) -> Result<Option<User>> {
        self.get("/auth/me", &[]).await
    }

    // === Projects ===

    /// `GET /projects` - all projects visible to the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.get("/projects", &[]).await?.unwrap_or_default())
    }

    /// `POST /projects` - create a project.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with the server's validation message on
    /// rejection.
    pub async fn create_project(&self, project: &NewProject) -> Result<()> {
        self.post::<_, Value>("/projects", project).await?;
        Ok(())
    }

    /// `GET /projects/{id}/apikey` - reveal the ingestion key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no
    /// key.
    pub async fn api_key(&self, project_id: &str) -> Result<ApiKey> {
        let path = format!("/projects/{project_id}/apikey");
        self.get(&path, &[])
            .await?
            .ok_or_else(|| Error::invalid_response("empty body from apikey endpoint"))
    }

    // === Logs ===

    /// `GET /projects/{id}/logs/aggregated` - events grouped by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn aggregated_logs(
        &self,
        project_id: &str,
        query: &LogQuery,
    ) -> Result<Vec<AggregatedLogEntry>> {
        let path = format!("/projects/{project_id}/logs/aggregated");
        Ok(self
            .get(&path, &query.to_query_pairs())
            .await?
            .unwrap_or_default())
    }

    /// `GET /projects/{id}/logs` - individual log events.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn logs(&self, project_id: &str, query: &LogQuery) -> Result<Vec<LogEntry>> {
        let path = format!("/projects/{project_id}/logs");
        Ok(self
            .get(&path, &query.to_query_pairs())
            .await?
            .unwrap_or_default())
    }

    // === Internals ===

    /// Build the absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        let base = self.server.as_str().trim_end_matches('/');
        format!("{base}/api{path}")
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let mut request = self.http.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let response = request.send().await.map_err(|err| {
            warn!("API call failed: {err}");
            Error::Unavailable
        })?;

        let status = response.status();
        debug!("API response: {status}");

        let body = response.bytes().await.map_err(|err| {
            warn!("failed to read API response body: {err}");
            Error::Unavailable
        })?;

        decode_body(status, &body)
    }
}

/// Decode a response body according to the API's conventions.
///
/// Non-2xx statuses are errors whose message is the `error` field of the
/// JSON body (with a status-based fallback). A 204 or empty body is a
/// valid no-data success.
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<Option<T>> {
    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .as_ref()
            .and_then(|value| value.get("error"))
            .and_then(Value::as_str)
            .map(ToString::to_string);
        return Err(match message {
            Some(message) => Error::api(status, message),
            None => Error::api_fallback(status),
        });
    }

    if status == StatusCode::NO_CONTENT || body.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_slice(body)?))
}

/// Pull a named cookie value out of a `Cookie:` header string.
fn extract_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(cookie_name, _)| *cookie_name == name)
        .map(|(_, value)| value.to_string())
}

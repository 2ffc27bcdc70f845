use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use url::Url;

use super::{
    api::{
        AdminApi, AuthApi, BlogApi, ContactApi, FavoritesApi, PaymentsApi, ProjectsApi,
        ResourcesApi,
    },
    error::ClientError,
};
use crate::{model::ErrorBody, APP_USER_AGENT};

/// HTTP wrapper shared by every API module.
///
/// Clones share the reqwest connection pool and the token cell, so a login
/// through one clone authenticates all of them.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Arc<RwLock<Option<SecretString>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for the backend at `base_url`; requests go to `{base_url}/api/...`.
    ///
    /// # Errors
    /// Returns an error if the URL cannot be parsed or cannot carry a path, or
    /// if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        let http = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            http,
            base,
            token: Arc::new(RwLock::new(None)),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Replaces the bearer token attached to outgoing requests.
    pub async fn set_token(&self, token: Option<SecretString>) {
        *self.token.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(self.clone())
    }

    pub fn blog(&self) -> BlogApi {
        BlogApi::new(self.clone())
    }

    pub fn contact(&self) -> ContactApi {
        ContactApi::new(self.clone())
    }

    pub fn resources(&self) -> ResourcesApi {
        ResourcesApi::new(self.clone())
    }

    pub fn favorites(&self) -> FavoritesApi {
        FavoritesApi::new(self.clone())
    }

    pub fn payments(&self) -> PaymentsApi {
        PaymentsApi::new(self.clone())
    }

    pub fn admin(&self) -> AdminApi {
        AdminApi::new(self.clone())
    }

    /// `{base}/api/{segments...}` with each segment percent-encoded.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // new() rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    pub(crate) async fn get<T>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send(self.http.get(self.endpoint(segments)).query(query))
            .await
    }

    pub(crate) async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.endpoint(segments)).json(body))
            .await
    }

    /// POST without a body, used by favorites.
    pub(crate) async fn post_empty<T>(&self, segments: &[&str]) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.endpoint(segments))).await
    }

    pub(crate) async fn put<B, T>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.put(self.endpoint(segments)).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    pub(crate) async fn delete<T>(&self, segments: &[&str]) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send(self.http.delete(self.endpoint(segments))).await
    }

    #[instrument(skip_all)]
    async fn send<T>(&self, request: RequestBuilder) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let request = match self.token.read().await.as_ref() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "API response");

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status, detail(status, &body)))
    }
}

/// Pulls the message out of an error response: the `detail` field when the
/// body is the usual JSON envelope, otherwise the raw text or the reason phrase.
fn detail(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorBody>(body) {
        return envelope.detail;
    }
    let text = body.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        text.to_string()
    }
}

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use shared::models::{
    Credentials, ErrorResponse, NewPolicy, Policy, PolicyId, PolicyPatch, TokenResponse,
};
use tracing::{debug, warn};

use crate::error::ApiError;

/// The five policy API operations, one request each.
///
/// Implemented over HTTP by [`HttpPolicyApi`]; tests substitute scripted
/// implementations.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PolicyApi {
    /// `POST /login` with a form-url-encoded body.
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError>;

    /// `POST /register` with a JSON body.
    async fn register(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError>;

    /// `GET /policies`.
    async fn list_policies(&self, token: &str) -> Result<Vec<Policy>, ApiError>;

    /// `POST /policies`.
    async fn create_policy(&self, token: &str, draft: &NewPolicy) -> Result<Policy, ApiError>;

    /// `PATCH /policies/{id}`.
    async fn update_policy(
        &self,
        token: &str,
        id: PolicyId,
        patch: &PolicyPatch,
    ) -> Result<Policy, ApiError>;

    /// `DELETE /policies/{id}`. The response body is ignored.
    async fn delete_policy(&self, token: &str, id: PolicyId) -> Result<(), ApiError>;
}

/// reqwest-backed [`PolicyApi`].
#[derive(Clone, Debug)]
pub struct HttpPolicyApi {
    base_url: String,
    client: Client,
}

impl HttpPolicyApi {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a pre-configured reqwest client (timeouts, user agent).
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {token}"))
    }
}

async fn send(request: RequestBuilder, operation: &'static str) -> Result<Response, ApiError> {
    debug!(operation, "dispatching request");
    let response = request.send().await.map_err(|err| {
        warn!(operation, error = %err, "request failed before a response arrived");
        ApiError::Transport(err.to_string())
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|error| error.message());
    warn!(operation, status = status.as_u16(), detail = ?detail, "request rejected");
    Err(ApiError::Status {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PolicyApi for HttpPolicyApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let request = self.client.post(self.api_url("login")).form(credentials);
        decode(send(request, "login").await?).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let request = self.client.post(self.api_url("register")).json(credentials);
        decode(send(request, "register").await?).await
    }

    async fn list_policies(&self, token: &str) -> Result<Vec<Policy>, ApiError> {
        let request = Self::authorized(self.client.get(self.api_url("policies")), token);
        decode(send(request, "list_policies").await?).await
    }

    async fn create_policy(&self, token: &str, draft: &NewPolicy) -> Result<Policy, ApiError> {
        let request =
            Self::authorized(self.client.post(self.api_url("policies")), token).json(draft);
        decode(send(request, "create_policy").await?).await
    }

    async fn update_policy(
        &self,
        token: &str,
        id: PolicyId,
        patch: &PolicyPatch,
    ) -> Result<Policy, ApiError> {
        let url = self.api_url(&format!("policies/{id}"));
        let request = Self::authorized(self.client.patch(url), token).json(patch);
        decode(send(request, "update_policy").await?).await
    }

    async fn delete_policy(&self, token: &str, id: PolicyId) -> Result<(), ApiError> {
        let url = self.api_url(&format!("policies/{id}"));
        let request = Self::authorized(self.client.delete(url), token);
        send(request, "delete_policy").await.map(drop)
    }
}

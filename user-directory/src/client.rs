//! reqwest-backed [`UserApi`] for the agency users endpoints.

use crate::api::UserApi;
use crate::error::{Result, UserApiError};
use crate::types::{User, UserForm, UserId};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Header the backend's API-key middleware checks
pub const API_TOKEN_HEADER: &str = "x-auth-api-token";

const USERS_PATH: &str = "/api/agencies/users";

/// HTTP client for the agency users API
#[derive(Clone, Debug)]
pub struct HttpUserApi {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    bearer_token: Option<String>,
}

impl HttpUserApi {
    /// Create a client with a 30 second request timeout
    ///
    /// # Errors
    ///
    /// Returns [`UserApiError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a client with an explicit request timeout
    ///
    /// # Errors
    ///
    /// Returns [`UserApiError::Request`] if the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UserApiError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            bearer_token: None,
        })
    }

    /// Send `token` in the `x-auth-api-token` header
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Send `token` as `Authorization: Bearer <token>`
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}{USERS_PATH}", self.base_url)
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}{USERS_PATH}/{id}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("accept", "application/json");
        let request = match &self.api_token {
            Some(token) => request.header(API_TOKEN_HEADER, token),
            None => request,
        };
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| UserApiError::Request(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!(status = status.as_u16(), %error, "Failed to read error response body");
            String::new()
        },
    };
    Err(UserApiError::from_response(status.as_u16(), &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| UserApiError::Decode(e.to_string()))
}

impl UserApi for HttpUserApi {
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send {
        let request = self.authorize(self.client.get(self.users_url()));
        async move { decode(send(request).await?).await }
    }

    fn create_user(&self, form: &UserForm) -> impl Future<Output = Result<User>> + Send {
        let request = self.authorize(self.client.post(self.users_url()).json(form));
        async move { decode(send(request).await?).await }
    }

    fn update_user(&self, id: UserId, form: &UserForm) -> impl Future<Output = Result<()>> + Send {
        let request = self.authorize(self.client.put(self.user_url(id)).json(form));
        async move {
            send(request).await?;
            Ok(())
        }
    }

    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<()>> + Send {
        let request = self.authorize(self.client.delete(self.user_url(id)));
        async move {
            send(request).await?;
            Ok(())
        }
    }
}

//! API gateway client.
//!
//! One configured [`reqwest::Client`] for the whole process. Every
//! outbound call attaches `Authorization: Bearer <token>` when the
//! session holds one; every inbound response passes through the 401
//! decorator ([`SessionStore::handle_unauthorized`]) before the caller
//! sees it. Non-2xx responses become [`ApiError::Api`] carrying the
//! server-supplied message; transport failures are returned as-is with
//! no retry policy imposed here.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::session::SessionStore;

/// Errors from the gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 401 arrived while authenticated outside the auth screens; the
    /// session has already been cleared and the expiry hook fired.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// A 401 during an auth flow (bad credentials, not expiry).
    #[error("{0}")]
    Unauthorized(String),

    /// Any other non-2xx response, with the server-supplied message.
    #[error("{message}")]
    Api { status: u16, message: String },
}

/// Error body shape used across the API: `{ success: false, message }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Single configured HTTP client for the marketplace API.
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiGateway {
    /// Build the gateway from configuration, injecting the session store
    /// whose token is attached to every call.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET` a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.http.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    /// `POST` a JSON body, decoding a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        Ok(response.json().await?)
    }

    /// `PUT` a JSON body, decoding a JSON response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.put(self.url(path)).json(body)).await?;
        Ok(response.json().await?)
    }

    /// `DELETE` a resource, discarding the body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    /// `POST` a multipart form (image upload side channel).
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.http.post(self.url(path)).multipart(form))
            .await?;
        Ok(response.json().await?)
    }

    /// Attach the bearer token, send, and run the response decorator.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let builder = match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await?;
        self.intercept(response).await
    }

    /// Response decorator: 401s go through the session expiry handler
    /// before the caller resumes; other failures surface the server's
    /// message.
    async fn intercept(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let message = Self::error_message(response, "Unauthorized").await;
            if self.session.handle_unauthorized() {
                return Err(ApiError::SessionExpired);
            }
            return Err(ApiError::Unauthorized(message));
        }
        if !status.is_success() {
            let message = Self::error_message(response, "Request failed").await;
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Pull the server's `message` field out of an error body, falling
    /// back to a generic label when the body is not the expected shape.
    async fn error_message(response: reqwest::Response, fallback: &str) -> String {
        match response.json::<ErrorBody>().await {
            Ok(body) => body.message.unwrap_or_else(|| fallback.to_string()),
            Err(_) => fallback.to_string(),
        }
    }
}

//! HTTP client for the gateway's key-management API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{GatewayError, Result};
use crate::models::Session;

/// Header carrying the gateway admin secret.
pub const AUTH_HEADER: &str = "x-gateway-authorization";

/// Error response bodies are truncated to this many bytes.
const ERROR_BYTES_LIMIT: usize = 4000;

/// Methods to manage auth keys on the fronting gateway.
#[async_trait]
pub trait KeyApi: Send + Sync {
    /// Create a new key from session data and return its ID.
    async fn create_key(&self, session: &Session) -> Result<String>;

    /// Retrieve a key's session data.
    async fn retrieve_key(&self, key_id: &str) -> Result<Session>;

    /// Update a key with new session data.
    async fn update_key(&self, key_id: &str, session: &Session) -> Result<()>;

    /// Delete a key by ID.
    async fn delete_key(&self, key_id: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct CreateKeyResponse {
    key: Option<String>,
}

/// Key-management client backed by the gateway's REST API.
pub struct GatewayClient {
    base_url: String,
    admin_secret: String,
    http_client: reqwest::Client,
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the gateway admin API (e.g., "http://gateway:8080")
    /// * `admin_secret` - Secret sent in the `x-gateway-authorization` header
    pub fn new(base_url: impl Into<String>, admin_secret: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_secret: admin_secret.into(),
            http_client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Surface non-2xx responses as errors, truncating long bodies.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.as_u16() >= 400 {
            let bytes = response.bytes().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body: error_body(&bytes),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl KeyApi for GatewayClient {
    async fn create_key(&self, session: &Session) -> Result<String> {
        let response = self
            .http_client
            .post(self.url("/keys/create"))
            .header(AUTH_HEADER, &self.admin_secret)
            .json(session)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let created: CreateKeyResponse = response.json().await?;
        let key_id = created.key.ok_or(GatewayError::MissingKeyId)?;

        tracing::debug!(key_id = %key_id, "Created gateway key");
        Ok(key_id)
    }

    async fn retrieve_key(&self, key_id: &str) -> Result<Session> {
        let response = self
            .http_client
            .get(self.url(&format!("/keys/{}", key_id)))
            .header(AUTH_HEADER, &self.admin_secret)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        Ok(response.json().await?)
    }

    async fn update_key(&self, key_id: &str, session: &Session) -> Result<()> {
        let response = self
            .http_client
            .put(self.url(&format!("/keys/{}", key_id)))
            .header(AUTH_HEADER, &self.admin_secret)
            .json(session)
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::debug!(key_id = %key_id, "Updated gateway key");
        Ok(())
    }

    async fn delete_key(&self, key_id: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.url(&format!("/keys/{}", key_id)))
            .header(AUTH_HEADER, &self.admin_secret)
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::debug!(key_id = %key_id, "Deleted gateway key");
        Ok(())
    }
}

fn error_body(bytes: &[u8]) -> String {
    let end = bytes.len().min(ERROR_BYTES_LIMIT);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Stub key API for wiring tests without a running gateway.
#[derive(Debug, Clone, Default)]
pub struct StubKeyApi;

impl StubKeyApi {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyApi for StubKeyApi {
    async fn create_key(&self, _session: &Session) -> Result<String> {
        Ok(uuid::Uuid::new_v4().simple().to_string())
    }

    async fn retrieve_key(&self, _key_id: &str) -> Result<Session> {
        Ok(Session::new())
    }

    async fn update_key(&self, _key_id: &str, _session: &Session) -> Result<()> {
        Ok(())
    }

    async fn delete_key(&self, _key_id: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GatewayClient::new("http://gateway:8080/", "secret");
        assert_eq!(client.url("/keys/create"), "http://gateway:8080/keys/create");
    }

    #[test]
    fn test_error_body_truncation() {
        let long = vec![b'x'; ERROR_BYTES_LIMIT + 1000];
        assert_eq!(error_body(&long).len(), ERROR_BYTES_LIMIT);

        let short = b"not found";
        assert_eq!(error_body(short), "not found");
    }

    #[tokio::test]
    async fn test_stub_create_key_returns_id() {
        let stub = StubKeyApi::new();
        let key_id = stub.create_key(&Session::new()).await.unwrap();
        assert_eq!(key_id.len(), 32);
    }

    #[tokio::test]
    async fn test_stub_retrieve_key_returns_defaults() {
        let stub = StubKeyApi::new();
        let session = stub.retrieve_key("any-key").await.unwrap();
        assert_eq!(session, Session::new());
    }

    #[tokio::test]
    async fn test_stub_update_and_delete_succeed() {
        let stub = StubKeyApi::new();
        stub.update_key("any-key", &Session::new()).await.unwrap();
        stub.delete_key("any-key").await.unwrap();
    }
}

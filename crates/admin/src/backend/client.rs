//! Transport for the inventory REST backend.

use std::sync::Arc;

use depot_core::models::KeySpellings;
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::BackendError;
use crate::config::BackendConfig;

/// Inventory backend client.
///
/// Cheap to clone; all clones share one connection pool.
///
/// # Authentication
///
/// When a token is configured every request carries
/// `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    config: BackendConfig,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("depot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
                config,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        self.request_with(method, path, &[])
    }

    fn request_with(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder, BackendError> {
        let url = self.url(path, query)?;
        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.inner.config.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    /// Send a request and turn non-2xx statuses into errors.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok());
        let body = response.text().await.unwrap_or_default();
        let error = BackendError::from_response(status, retry_after, &body);
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error, "Backend server error");
        } else {
            tracing::warn!(status = status.as_u16(), error = %error, "Backend rejected request");
        }
        Err(error)
    }

    async fn decode<T: DeserializeOwned + KeySpellings>(
        path: &str,
        response: Response,
    ) -> Result<T, BackendError> {
        let body = response.bytes().await?;
        depot_core::models::decode(&body).map_err(|source| BackendError::Decode {
            path: path.to_owned(),
            source,
        })
    }

    /// `GET` a JSON resource.
    #[instrument(skip(self))]
    pub(crate) async fn get_json<T: DeserializeOwned + KeySpellings>(
        &self,
        path: &str,
    ) -> Result<T, BackendError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Self::decode(path, response).await
    }

    /// `GET` a JSON resource with query parameters.
    #[instrument(skip(self))]
    pub(crate) async fn get_json_with<T: DeserializeOwned + KeySpellings>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let response = self
            .send(self.request_with(Method::GET, path, query)?)
            .await?;
        Self::decode(path, response).await
    }

    /// Send a JSON body and decode the JSON reply.
    #[instrument(skip(self, body))]
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + KeySpellings,
    {
        let response = self.send(self.request(method, path)?.json(body)).await?;
        Self::decode(path, response).await
    }

    /// Send a JSON body, ignoring whatever the backend replies with.
    #[instrument(skip(self, body))]
    pub(crate) async fn send_json_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), BackendError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(method, path)?.json(body)).await?;
        Ok(())
    }

    /// Bodiless `POST`, used for state transitions.
    #[instrument(skip(self))]
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), BackendError> {
        self.send(self.request(Method::POST, path)?).await?;
        Ok(())
    }

    /// `POST` a multipart form.
    #[instrument(skip(self, form))]
    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<(), BackendError> {
        self.send(self.request(Method::POST, path)?.multipart(form))
            .await?;
        Ok(())
    }

    /// `DELETE` a resource.
    #[instrument(skip(self))]
    pub(crate) async fn delete(&self, path: &str) -> Result<(), BackendError> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// Check the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if `/health` does not answer with a 2xx status.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), BackendError> {
        self.send(self.request(Method::GET, "health")?).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(base: &str, token: Option<&str>) -> BackendClient {
        let config =
            BackendConfig::new(base, token.map(str::to_owned), Duration::from_secs(5)).unwrap();
        BackendClient::new(config).unwrap()
    }

    #[test]
    fn test_paths_join_under_base_path() {
        let client = client("http://api.local/v1", None);
        let request = client
            .request(Method::GET, "/products/3")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://api.local/v1/products/3");
        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_query_pairs_are_encoded() {
        let client = client("http://api.local", None);
        let url = client
            .url("reports/top-products", &[("limit", "5".to_owned()), ("q", "a b".to_owned())])
            .unwrap();
        assert_eq!(url.as_str(), "http://api.local/reports/top-products?limit=5&q=a+b");
    }

    #[test]
    fn test_bearer_token_is_attached() {
        let client = client("http://api.local", Some("tok_123"));
        let request = client
            .request(Method::POST, "orders")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer tok_123");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client("http://api.local", Some("tok_123"));
        assert!(!format!("{client:?}").contains("tok_123"));
    }
}

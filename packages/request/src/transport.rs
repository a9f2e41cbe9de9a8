//! HTTP transport to the analysis backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::RequestError;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/";

/// Backend location and credentials, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    token: Option<String>,
}

impl ApiConfig {
    /// Creates a config. A trailing `/` is added to `base_url` if missing.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            token: token.filter(|token| !token.is_empty()),
        }
    }

    /// Reads `MISLAND_API_URL` (default [`DEFAULT_API_URL`]) and the
    /// optional `MISLAND_AUTH_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Config`] if the URL is not http(s).
    pub fn from_env() -> Result<Self, RequestError> {
        let base_url =
            std::env::var("MISLAND_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(RequestError::Config {
                message: format!("MISLAND_API_URL must be an http(s) URL, got '{base_url}'"),
            });
        }
        let token = std::env::var("MISLAND_AUTH_TOKEN").ok();
        if token.is_none() {
            log::debug!("MISLAND_AUTH_TOKEN not set; requests are sent unauthenticated");
        }
        Ok(Self::new(base_url, token))
    }

    /// Absolute URL of a path relative to the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `Authorization` header value, when a token is configured.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }
}

/// Sends JSON requests to the backend.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// `POST`s a JSON body to a path relative to the API base.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport, status, or decoding failure.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, RequestError>;

    /// `GET`s a JSON document from a path relative to the API base.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport, status, or decoding failure.
    async fn get_json(&self, path: &str) -> Result<Value, RequestError>;
}

/// [`AnalysisTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpTransport {
    /// Creates a transport with a fresh client.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Creates a transport reusing an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    /// Backend configuration.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.authorization() {
            Some(value) => req.header(reqwest::header::AUTHORIZATION, value),
            None => req,
        }
    }

    async fn read(resp: reqwest::Response) -> Result<Value, RequestError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RequestError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, RequestError> {
        let url = self.config.url(path);
        log::debug!("POST {url}");
        let resp = self.authorize(self.client.post(&url)).json(body).send().await?;
        Self::read(resp).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, RequestError> {
        let url = self.config.url(path);
        log::debug!("GET {url}");
        let resp = self.authorize(self.client.get(&url)).send().await?;
        Self::read(resp).await
    }
}

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;

/// Query string parameters, already rendered to strings.
pub type Params = Vec<(&'static str, String)>;

/// Shared HTTP client for the analytics API. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    origin: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("TlcDashboard/0.1"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());

        if config.base_url.is_empty() {
            tracing::info!("Using relative API paths via proxy at {}", config.origin);
        }

        Self {
            client,
            base_url: config.base_url.clone(),
            origin: config.origin.clone(),
        }
    }

    /// Where the backend is expected to be reachable, for error hints.
    pub fn backend_location(&self) -> &str {
        if self.base_url.is_empty() {
            &self.origin
        } else {
            &self.base_url
        }
    }

    /// Resolve `path` against the base URL, falling back to the proxy origin for relative paths.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let relative = format!("{}{}", self.base_url, path);
        let origin = Url::parse(&self.origin)
            .map_err(|e| ApiError::Setup(format!("invalid origin '{}': {}", self.origin, e)))?;
        origin
            .join(&relative)
            .map_err(|e| ApiError::Setup(format!("invalid path '{}': {}", relative, e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Params) -> Result<T, ApiError> {
        self.send(Method::GET, path, None, query).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
        query: &Params,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, body, query).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &Params,
    ) -> Result<T, ApiError> {
        // 1. Build the request
        let url = self.resolve(path).map_err(|e| {
            tracing::error!("Error setting up request: {}", e);
            e
        })?;
        tracing::debug!("{} {} params={:?}", method, url, query);

        let mut request = self.client.request(method.clone(), url.clone()).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        // 2. Send
        let resp = request.send().await.map_err(|source| {
            if source.is_builder() {
                tracing::error!("Error setting up request: {}", source);
                ApiError::Setup(source.to_string())
            } else {
                tracing::error!("No response received from {}: {}", url, source);
                tracing::error!("Is the backend running at {}?", self.backend_location());
                ApiError::Transport {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        let status = resp.status();
        tracing::debug!("{} {} -> {}", method, url, status);

        // 3. Status and body
        let text = resp.text().await.map_err(|source| {
            tracing::error!("Response body from {} could not be read: {}", url, source);
            ApiError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        if !status.is_success() {
            tracing::error!("Response error: {} {}", status.as_u16(), text);
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|source| {
            tracing::error!("Unexpected payload from {}: {}", url, source);
            ApiError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}

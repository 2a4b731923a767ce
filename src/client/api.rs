//! Typed client for the Docktrine HTTP API.

use crate::container::domain::NormalizedContainer;
use crate::http::{API_KEY_HEADER, CreateServerBody, MessageResponse, ServerView};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API URL was blank.
    #[error("API URL is required (set --api-url or DOCKTRINE_API_URL)")]
    MissingApiUrl,

    /// The API URL is not an absolute `http` or `https` URL.
    #[error("invalid API URL '{0}'")]
    InvalidApiUrl(String),

    /// The API key was blank.
    #[error("API key is required (set --api-key or DOCKTRINE_API_KEY)")]
    MissingApiKey,

    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("{message} ({status})")]
    Api {
        /// Response status.
        status: StatusCode,
        /// Server-provided error message.
        message: String,
    },

    /// A 2xx body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Validated client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: Url,
    api_key: String,
}

impl ClientConfig {
    /// Validates the API URL and key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingApiUrl`] or
    /// [`ClientError::MissingApiKey`] for blank values, and
    /// [`ClientError::InvalidApiUrl`] when the URL cannot carry a path.
    pub fn new(api_url: &str, api_key: &str) -> ClientResult<Self> {
        let raw_url = api_url.trim();
        if raw_url.is_empty() {
            return Err(ClientError::MissingApiUrl);
        }
        let base_url = Url::parse(raw_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::InvalidApiUrl(raw_url.to_owned()))?;
        let key = api_key.trim();
        if key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }
        Ok(Self {
            api_url: base_url,
            api_key: key.to_owned(),
        })
    }

    /// Builds the URL for `segments` under the API base URL.
    ///
    /// Each segment is percent-encoded, so names containing `/`, `?` or
    /// spaces stay a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidApiUrl`] when the base URL cannot carry
    /// a path.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidApiUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed calls against the API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Creates a client for `config`.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        Ok(self
            .http
            .request(method, self.config.endpoint(segments)?)
            .header(API_KEY_HEADER, &self.config.api_key))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_response(status, &body)
    }

    /// Lists containers on `server`, or the default server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn list_containers(
        &self,
        server: Option<&str>,
    ) -> ClientResult<Vec<NormalizedContainer>> {
        self.send(self.request(Method::GET, &["containers"])?.query(&server_query(server)))
            .await
    }

    /// Fetches one container.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn get_container(
        &self,
        id: &str,
        server: Option<&str>,
    ) -> ClientResult<NormalizedContainer> {
        self.send(
            self.request(Method::GET, &["containers", id])?
                .query(&server_query(server)),
        )
        .await
    }

    /// Starts a container.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn start_container(&self, id: &str, server: Option<&str>) -> ClientResult<String> {
        self.container_command("start", id, server, None).await
    }

    /// Stops a container.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn stop_container(&self, id: &str, server: Option<&str>) -> ClientResult<String> {
        self.container_command("stop", id, server, None).await
    }

    /// Restarts a container, optionally pulling its image first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn restart_container(
        &self,
        id: &str,
        server: Option<&str>,
        pull_latest: bool,
    ) -> ClientResult<String> {
        self.container_command("restart", id, server, Some(pull_latest))
            .await
    }

    async fn container_command(
        &self,
        action: &str,
        id: &str,
        server: Option<&str>,
        pull_latest: Option<bool>,
    ) -> ClientResult<String> {
        let mut query = server_query(server);
        if let Some(pull) = pull_latest {
            query.push(("pull_latest", pull.to_string()));
        }
        let response: MessageResponse = self
            .send(self.request(Method::POST, &["containers", action, id])?.query(&query))
            .await?;
        Ok(response.message)
    }

    /// Lists registered servers.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn list_servers(&self) -> ClientResult<Vec<ServerView>> {
        self.send(self.request(Method::GET, &["servers"])?).await
    }

    /// Fetches a server by name.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn get_server(&self, name: &str) -> ClientResult<ServerView> {
        self.send(self.request(Method::GET, &["servers", name])?).await
    }

    /// Registers a server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn add_server(&self, body: &CreateServerBody) -> ClientResult<ServerView> {
        self.send(self.request(Method::POST, &["servers"])?.json(body))
            .await
    }

    /// Removes a server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn remove_server(&self, name: &str) -> ClientResult<String> {
        let response: MessageResponse = self
            .send(self.request(Method::DELETE, &["servers", name])?)
            .await?;
        Ok(response.message)
    }
}

fn server_query(server: Option<&str>) -> Vec<(&'static str, String)> {
    server
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| vec![("server", name.to_owned())])
        .unwrap_or_default()
}

/// Decodes a response: any 2xx body as `T`, anything else as an API error.
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> ClientResult<T> {
    if status.is_success() {
        return Ok(serde_json::from_str(body)?);
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_owned()
            } else {
                trimmed.to_owned()
            }
        });
    Err(ClientError::Api { status, message })
}

use crate::config::Config;
use crate::error::FetchError;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Anything that can produce a raw graph payload.
///
/// This is the only suspending operation in the crate. Sources do not retry.
pub trait GraphSource {
    fn fetch(&self) -> impl Future<Output = Result<Value, FetchError>>;
}

/// Fetches the payload over HTTP from `GET {base}/action-blueprint-graph`.
pub struct HttpGraphSource {
    http: reqwest::Client,
    url: String,
}

impl HttpGraphSource {
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            url: config.graph_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GraphSource for HttpGraphSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        debug!("Fetching graph from {}", self.url);

        let response = self.http.get(&self.url).send().await.map_err(|e| {
            warn!("Graph request to {} failed: {}", self.url, e);
            FetchError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Graph request to {} returned {}", self.url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Reads the payload from a JSON file on disk.
pub struct FileGraphSource {
    path: PathBuf,
}

impl FileGraphSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for FileGraphSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        debug!("Reading graph from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            FetchError::Io(format!("Could not read '{}': {}", self.path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Serves a fixed payload. Useful as an offline source and in tests.
pub struct StaticGraphSource {
    payload: Result<Value, FetchError>,
}

impl StaticGraphSource {
    pub fn new(payload: Value) -> Self {
        Self {
            payload: Ok(payload),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            payload: Err(error),
        }
    }
}

impl GraphSource for StaticGraphSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        self.payload.clone()
    }
}

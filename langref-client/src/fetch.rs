//! Artifact fetchers
//!
//! The cache never performs I/O itself; it asks a [Fetcher] for the raw bytes of an artifact
//! path such as `hierarchy.json` or `languages/rescript.json`.

use langref_config::ClientConfig;
use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::FetchError;

#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetch the artifact at `path`, relative to the artifact root.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F: Fetcher> Fetcher for Arc<F> {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        self.as_ref().fetch(path).await
    }
}

/// Fetches artifacts over HTTP from a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url(path);
        tracing::debug!(%url, "fetching artifact");

        let network = |e: reqwest::Error| FetchError::Network {
            path: path.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(&url).send().await.map_err(network)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network)?;
        Ok(body.to_vec())
    }
}

/// Reads artifacts straight from a compiled output directory.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetcher for DirFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full = self.root.join(path.trim_start_matches('/'));
        tracing::debug!(path = %full.display(), "reading artifact");
        tokio::fs::read(&full).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FetchError::NotFound {
                path: path.to_string(),
            },
            _ => FetchError::Io {
                path: path.to_string(),
                message: e.to_string(),
            },
        })
    }
}

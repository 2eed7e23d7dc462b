//! Shared HTTP call helper for the NASA endpoints.
//!
//! Every feed goes through [`JsonGet`], so the selection policies in
//! [`crate::feed`] can be exercised without a network. [`NasaClient`] is the
//! real implementation: it appends the API key, performs the GET, rejects
//! non-2xx statuses and decodes the body as JSON.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Anything that can go wrong while talking to an endpoint.
///
/// All three variants are "transport" failures from the point of view of
/// the feeds; each feed decides whether one is fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {path} failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} answered with HTTP {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error("unexpected payload from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub(crate) fn decode(path: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.to_string(),
            source,
        }
    }
}

/// GET a path relative to the API base and decode the JSON body.
///
/// `params` must not include the API key; implementations add it.
#[async_trait]
pub trait JsonGet: Send + Sync {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, FetchError>;
}

pub struct NasaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("nasa-photo-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn query<'a>(&'a self, params: &'a [(&'a str, String)]) -> Vec<(&'a str, &'a str)> {
        params
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(std::iter::once(("api_key", self.api_key.as_str())))
            .collect()
    }
}

#[async_trait]
impl JsonGet for NasaClient {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, FetchError> {
        debug!("GET {} {:?}", path, params);

        let network = |source: reqwest::Error| FetchError::Network {
            path: path.to_string(),
            source,
        };

        let resp = self
            .client
            .get(self.url(path))
            .query(&self.query(params))
            .send()
            .await
            .map_err(network)?;

        let status = resp.status();
        if !status.is_success() {
            warn!("{} answered with HTTP {}", path, status);
            return Err(FetchError::Status {
                path: path.to_string(),
                status,
            });
        }

        let body = resp.bytes().await.map_err(network)?;
        serde_json::from_slice(&body).map_err(|e| FetchError::decode(path, e))
    }
}

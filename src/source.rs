//! Device list retrieval
//!
//! The transport seam of the client: a [`DeviceListSource`] performs one
//! HTTP GET for the device list and parses the JSON body. The cache and
//! lookup logic never touch the network directly, which keeps them testable
//! against scripted sources.

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;

use crate::device::DeviceList;

/// Errors that can occur while retrieving or decoding the device list
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("device list request failed with status {0}")]
    Status(reqwest::StatusCode),

    /// Failed to parse the JSON body as a device list
    #[error("failed to parse device list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A retriever for the upstream device list
///
/// Returns an owned `'static` future so an in-flight retrieval can outlive
/// the borrow of the source and be shared between concurrent callers.
/// Sources are stateless as far as the client is concerned; they are never
/// asked to retry.
pub trait DeviceListSource: Send + Sync {
    /// Retrieves and parses the device list published at `url`
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<DeviceList, SourceError>>;
}

/// [`DeviceListSource`] backed by a reqwest HTTP client
#[derive(Debug, Clone, Default)]
pub struct HttpDeviceListSource {
    client: reqwest::Client,
}

impl HttpDeviceListSource {
    /// Creates a source with a default HTTP client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Creates a source with a custom HTTP client
    ///
    /// Useful when the embedder already configures timeouts, proxies or a
    /// user agent on its own `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl DeviceListSource for HttpDeviceListSource {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<DeviceList, SourceError>> {
        let client = self.client.clone();
        let url = url.to_string();

        async move {
            let response = client.get(&url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status(status));
            }

            let body = response.text().await?;
            let devices: DeviceList = serde_json::from_str(&body)?;
            Ok(devices)
        }
        .boxed()
    }
}

//! LineageOS support client
//!
//! Ties configuration, the device list cache and the transport together:
//! [`Client::get_device_list`] serves from the cache while it is fresh and
//! refreshes through the source when stale, and
//! [`Client::is_device_supported`] answers support queries against the
//! current list.
//!
//! Concurrent refreshes are collapsed into a single request: callers that
//! arrive while a refresh is in flight await the same pending retrieval
//! instead of issuing their own, and all of them observe its outcome.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use thiserror::Error;
use tracing::debug;

use crate::cache::DeviceListCache;
use crate::config::{ClientConfig, ClientOptions, ConfigError};
use crate::device::{self, DeviceList, DeviceRecord};
use crate::source::{DeviceListSource, HttpDeviceListSource, SourceError};

/// Errors surfaced by [`Client`] operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// The device list could not be retrieved
    ///
    /// The underlying error is reference-counted because one failed
    /// retrieval may be observed by several concurrent callers.
    #[error(transparent)]
    Source(#[from] Arc<SourceError>),

    /// The queried codename is absent from the device list
    #[error("device '{0}' is not officially supported by LineageOS")]
    DeviceNotSupported(String),
}

/// A pending refresh whose outcome every waiting caller will observe
type SharedRefresh = Shared<BoxFuture<'static, Result<DeviceList, Arc<SourceError>>>>;

/// Cache and refresh bookkeeping guarded by one lock
///
/// The lock is only held across synchronous sections; the refresh future
/// itself runs unlocked and re-acquires the lock to publish its outcome.
#[derive(Default)]
struct ProviderState {
    cache: DeviceListCache,
    in_flight: Option<SharedRefresh>,
}

/// Client for the LineageOS device support API
///
/// Owns one device list cache; independent clients never share state, so a
/// process can run several differently configured instances side by side.
///
/// # Example
/// ```no_run
/// use lineageos_api::{Client, ClientOptions};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new(ClientOptions::default())?;
/// let device = client.is_device_supported("guacamoleb").await?;
/// println!("{} {} is supported", device.oem, device.name);
/// # Ok(())
/// # }
/// ```
pub struct Client {
    config: ClientConfig,
    source: Arc<dyn DeviceListSource>,
    state: Arc<Mutex<ProviderState>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client backed by the real HTTP source
    ///
    /// # Errors
    /// * `ConfigError::InvalidHost` if the configured host is not a valid
    ///   absolute http(s) URL
    /// * `ConfigError::InsecureHost` if the host uses plain http without the
    ///   `allow_insecure` override
    pub fn new(options: ClientOptions) -> Result<Self, ConfigError> {
        Self::with_source(options, Arc::new(HttpDeviceListSource::new()))
    }

    /// Creates a client with a custom device list source
    ///
    /// Lets embedders supply a tuned transport (timeouts, proxies) and lets
    /// tests script the source entirely.
    pub fn with_source(
        options: ClientOptions,
        source: Arc<dyn DeviceListSource>,
    ) -> Result<Self, ConfigError> {
        let config = ClientConfig::from_options(options)?;
        Ok(Self {
            config,
            source,
            state: Arc::new(Mutex::new(ProviderState::default())),
        })
    }

    /// Base host of the download API, always ending in a slash
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Returns the current device list
    ///
    /// Serves the cached list without suspending while it is fresh.
    /// Otherwise the list is fetched from the configured URL, cached for the
    /// configured lifetime and returned. A failed fetch leaves the cache
    /// untouched, so the next call attempts the fetch again; the failure is
    /// propagated unchanged.
    ///
    /// When several callers hit a stale cache concurrently, exactly one
    /// fetch is made and every caller receives its result.
    pub async fn get_device_list(&self) -> Result<DeviceList, ClientError> {
        let refresh = {
            // No await happens while the lock is held, so checking the cache
            // and installing the in-flight marker is one atomic step.
            let mut state = self.state.lock().expect("provider state lock poisoned");

            if let Some(devices) = state.cache.get_if_fresh(Utc::now()) {
                return Ok(devices.clone());
            }

            match &state.in_flight {
                Some(refresh) => refresh.clone(),
                None => {
                    let refresh = self.start_refresh();
                    state.in_flight = Some(refresh.clone());
                    refresh
                }
            }
        };

        refresh.await.map_err(ClientError::from)
    }

    /// Checks whether a device is officially supported
    ///
    /// Looks the codename up in the current device list with an exact,
    /// case-sensitive match and resolves with the first matching record.
    ///
    /// # Errors
    /// * `ClientError::DeviceNotSupported` if the list has no such codename
    /// * `ClientError::Source` if the list could not be retrieved; callers
    ///   can tell the two apart structurally
    pub async fn is_device_supported(&self, codename: &str) -> Result<DeviceRecord, ClientError> {
        let devices = self.get_device_list().await?;

        device::find_by_model(&devices, codename)
            .cloned()
            .ok_or_else(|| ClientError::DeviceNotSupported(codename.to_string()))
    }

    /// Builds the shared refresh future
    ///
    /// The future performs one fetch, then re-acquires the state lock to
    /// clear the in-flight marker and, on success, store the fresh list.
    /// The cache is updated exactly once per refresh no matter how many
    /// callers await it.
    fn start_refresh(&self) -> SharedRefresh {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let url = self.config.device_list_url.clone();
        let ttl_secs = self.config.cache_time_secs;

        async move {
            debug!(url = %url, "refreshing device list");
            let outcome = source.fetch(&url).await.map_err(Arc::new);

            let mut state = state.lock().expect("provider state lock poisoned");
            state.in_flight = None;
            match &outcome {
                Ok(devices) => {
                    debug!(devices = devices.len(), "device list refreshed");
                    state.cache.store(devices.clone(), Utc::now(), ttl_secs);
                }
                Err(error) => {
                    debug!(%error, "device list refresh failed");
                }
            }

            outcome
        }
        .boxed()
        .shared()
    }
}

//! Client configuration and validation
//!
//! Options accepted at client construction, together with the validation
//! applied to the base host. Validation happens once here; the rest of the
//! client trusts the resulting `ClientConfig`.

use thiserror::Error;
use url::Url;

/// Default base host of the LineageOS download API
pub const DEFAULT_HOST: &str = "https://download.lineageos.org/api/v1/";

/// Default location of the upstream device list
pub const DEFAULT_DEVICE_LIST_URL: &str =
    "https://raw.githubusercontent.com/LineageOS/hudson/master/updater/devices.json";

/// Default cache lifetime for the device list, in seconds (3 minutes)
pub const DEFAULT_CACHE_TIME_SECS: u64 = 180;

/// Errors raised while validating client options
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base host is not a valid absolute http(s) URL
    #[error("host is not a valid URL: '{0}'")]
    InvalidHost(String),

    /// The base host uses plain http without the insecure override
    #[error("insecure host URL '{0}': enable allow_insecure to use it")]
    InsecureHost(String),
}

/// Options accepted by [`Client::new`](crate::Client::new)
///
/// All fields are optional; unset fields fall back to the public LineageOS
/// endpoints and the default cache lifetime.
///
/// # Example
/// ```
/// use lineageos_api::ClientOptions;
///
/// let options = ClientOptions::new()
///     .with_host("https://mirror.example.org/api/v1")
///     .with_cache_time(60);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    host: Option<String>,
    device_list_url: Option<String>,
    cache_time_secs: Option<u64>,
    allow_insecure: bool,
}

impl ClientOptions {
    /// Creates options with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the base host of the download API
    ///
    /// The host is validated when the client is constructed; a trailing
    /// slash is appended if absent.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Overrides the URL the device list is fetched from
    pub fn with_device_list_url(mut self, url: impl Into<String>) -> Self {
        self.device_list_url = Some(url.into());
        self
    }

    /// Overrides the cache lifetime for the device list, in seconds
    pub fn with_cache_time(mut self, secs: u64) -> Self {
        self.cache_time_secs = Some(secs);
        self
    }

    /// Permits a plain-http base host
    ///
    /// Without this override, an `http://` host is rejected at construction.
    pub fn with_allow_insecure(mut self, allow: bool) -> Self {
        self.allow_insecure = allow;
        self
    }
}

/// Validated, immutable client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base host of the download API, always ending in a slash
    pub host: String,
    /// URL the device list is fetched from
    pub device_list_url: String,
    /// Cache lifetime for the device list, in seconds
    pub cache_time_secs: u64,
}

impl ClientConfig {
    /// Validates `options` into a usable configuration
    ///
    /// # Errors
    /// * `ConfigError::InvalidHost` if the host is not an absolute http(s) URL
    /// * `ConfigError::InsecureHost` if the host uses http without the override
    pub fn from_options(options: ClientOptions) -> Result<Self, ConfigError> {
        let host = match options.host {
            Some(host) => validate_host(&host, options.allow_insecure)?,
            None => DEFAULT_HOST.to_string(),
        };

        Ok(Self {
            host,
            device_list_url: options
                .device_list_url
                .unwrap_or_else(|| DEFAULT_DEVICE_LIST_URL.to_string()),
            cache_time_secs: options.cache_time_secs.unwrap_or(DEFAULT_CACHE_TIME_SECS),
        })
    }
}

/// Checks that `host` is an absolute http(s) URL with a host component and
/// returns it with a trailing slash appended if absent
fn validate_host(host: &str, allow_insecure: bool) -> Result<String, ConfigError> {
    let parsed = Url::parse(host).map_err(|_| ConfigError::InvalidHost(host.to_string()))?;

    match parsed.scheme() {
        "https" => {}
        "http" if allow_insecure => {}
        "http" => return Err(ConfigError::InsecureHost(host.to_string())),
        _ => return Err(ConfigError::InvalidHost(host.to_string())),
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidHost(host.to_string()));
    }

    if host.ends_with('/') {
        Ok(host.to_string())
    } else {
        Ok(format!("{host}/"))
    }
}

//! Client library for the LineageOS device support API
//!
//! Answers "is this device officially supported?" by consulting the
//! periodically updated upstream device list, keeping a time-bounded
//! in-memory cache so repeated lookups do not hit the network. Concurrent
//! lookups against a stale cache share a single refresh request.
//!
//! ```no_run
//! use lineageos_api::{Client, ClientOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientOptions::default())?;
//! match client.is_device_supported("guacamoleb").await {
//!     Ok(device) => println!("{} {} is supported", device.oem, device.name),
//!     Err(lineageos_api::ClientError::DeviceNotSupported(codename)) => {
//!         println!("{codename} is not supported");
//!     }
//!     Err(err) => eprintln!("could not reach the device list: {err}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod device;
pub mod source;

pub use client::{Client, ClientError};
pub use config::{ClientOptions, ConfigError};
pub use device::{DeviceList, DeviceRecord};
pub use source::{DeviceListSource, HttpDeviceListSource, SourceError};

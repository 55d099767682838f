//! Device list data model
//!
//! Types for the upstream device list: one `DeviceRecord` per officially
//! supported device, keyed by its codename (`model`), plus the lookup used
//! to answer support queries.

use serde::{Deserialize, Serialize};

/// A single entry of the upstream device list
///
/// Mirrors one row of the `devices.json` document published by the build
/// infrastructure, e.g.:
///
/// ```json
/// { "model": "guacamoleb", "oem": "OnePlus", "name": "7", "lineage_recovery": true }
/// ```
///
/// Unknown upstream fields are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Device codename, unique within the list (e.g. "guacamoleb")
    pub model: String,
    /// Manufacturer name (e.g. "OnePlus")
    pub oem: String,
    /// Marketing name (e.g. "7")
    pub name: String,
    /// Whether Lineage Recovery is available, when published upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineage_recovery: Option<bool>,
}

/// The full upstream device list
///
/// Semantically a set keyed by `model`: order does not matter and a
/// duplicated codename (an upstream data error) is resolved by first match.
pub type DeviceList = Vec<DeviceRecord>;

/// Finds a device by its codename
///
/// Performs an exact, case-sensitive match on `model` and returns the first
/// matching record.
///
/// # Arguments
/// * `devices` - The device list to search
/// * `codename` - The codename to look for (e.g. "guacamoleb")
///
/// # Returns
/// * `Some(&DeviceRecord)` if a record with that codename exists
/// * `None` otherwise
pub fn find_by_model<'a>(devices: &'a [DeviceRecord], codename: &str) -> Option<&'a DeviceRecord> {
    devices.iter().find(|device| device.model == codename)
}

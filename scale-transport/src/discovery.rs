//! Scale discovery over an enumerated USB device list

use tracing::debug;

use crate::device_registry::{is_supported, SupportedDevice};
use crate::endpoint::ConfigLayout;
use crate::error::ScaleError;

/// Vendor/product ID pair read from a device descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
}

/// Minimal view of an enumerated USB device
///
/// The matcher and the endpoint resolver only ever inspect descriptors; the
/// device handle itself stays with the transport backend. Both operations are
/// fallible on real hardware.
pub trait ScaleDevice {
    /// Read the vendor/product IDs from the device descriptor
    fn ids(&self) -> Result<DeviceId, ScaleError>;

    /// Read the first configuration descriptor
    fn config(&self) -> Result<ConfigLayout, ScaleError>;
}

/// Find the first supported scale in an enumerated device list
///
/// Devices are tested in the order the transport enumerated them (that order
/// is not stable across calls or platforms); the first one whose VID/PID pair
/// is in the registry wins. Returns `Ok(None)` when nothing matches.
///
/// A descriptor read failure aborts the whole scan rather than skipping the
/// unreadable device, matching the historical behavior of this tool. A
/// skip-and-continue scan would be more forgiving; see DESIGN.md.
pub fn find_scale<D, I>(devices: I, registry: &[SupportedDevice]) -> Result<Option<D>, ScaleError>
where
    D: ScaleDevice,
    I: IntoIterator<Item = D>,
{
    for device in devices {
        let id = device.ids()?;
        if is_supported(registry, id.vendor_id, id.product_id) {
            debug!(
                "Found scale {:04x}:{:04x}",
                id.vendor_id, id.product_id
            );
            return Ok(Some(device));
        }
    }
    Ok(None)
}

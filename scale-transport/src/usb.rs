//! rusb (libusb) transport backend
//!
//! Everything that touches the USB stack lives here: context init, device
//! enumeration, descriptor reads, handle open/claim and the blocking
//! interrupt reads. The rest of the crate only sees the [`ScaleDevice`] and
//! [`FrameSource`] traits.

use std::time::Duration;

use rusb::{Context, Device, DeviceHandle, UsbContext};
use tracing::debug;

use crate::discovery::{DeviceId, ScaleDevice};
use crate::endpoint::{AltSetting, ConfigLayout, InterfaceLayout};
use crate::error::ScaleError;
use crate::report::{RawFrame, REPORT_SIZE};
use crate::session::FrameSource;

/// The scale exposes its HID interface as interface 0
const SCALE_INTERFACE: u8 = 0;

/// Handle to an initialized libusb context
pub struct UsbTransport {
    context: Context,
}

impl UsbTransport {
    /// Initialize the USB subsystem
    pub fn new() -> Result<Self, ScaleError> {
        let context = Context::new().map_err(|e| ScaleError::Init(e.to_string()))?;
        Ok(Self { context })
    }

    /// Enumerate all USB devices currently attached
    pub fn devices(&self) -> Result<Vec<Device<Context>>, ScaleError> {
        let list = self
            .context
            .devices()
            .map_err(|e| ScaleError::Enumeration(e.to_string()))?;
        Ok(list.iter().collect())
    }
}

impl ScaleDevice for Device<Context> {
    fn ids(&self) -> Result<DeviceId, ScaleError> {
        let desc = self
            .device_descriptor()
            .map_err(|e| ScaleError::DescriptorRead(e.to_string()))?;
        Ok(DeviceId {
            vendor_id: desc.vendor_id(),
            product_id: desc.product_id(),
        })
    }

    fn config(&self) -> Result<ConfigLayout, ScaleError> {
        // The descriptor tree is copied out; the rusb ConfigDescriptor is
        // freed when it drops, on success and failure alike.
        let config = self
            .config_descriptor(0)
            .map_err(|e| ScaleError::DescriptorRead(e.to_string()))?;
        Ok(ConfigLayout {
            interfaces: config
                .interfaces()
                .map(|interface| InterfaceLayout {
                    alt_settings: interface
                        .descriptors()
                        .map(|alt| AltSetting {
                            endpoints: alt
                                .endpoint_descriptors()
                                .map(|endpoint| endpoint.address())
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        })
    }
}

/// An opened scale: claimed interface plus kernel-driver bookkeeping
///
/// Dropping the handle releases the interface and reattaches the kernel
/// driver if one was detached, on every exit path.
pub struct OpenScale {
    handle: DeviceHandle<Context>,
    kernel_driver_detached: bool,
}

impl OpenScale {
    /// Open the device, detach any kernel driver and claim the interface
    pub fn open(device: &Device<Context>) -> Result<Self, ScaleError> {
        let handle = device.open().map_err(|e| match e {
            rusb::Error::Access => ScaleError::PermissionDenied(e.to_string()),
            rusb::Error::NoDevice => ScaleError::Disconnected,
            other => ScaleError::Open(other.to_string()),
        })?;

        // A userspace tool has to take the interface from the kernel HID
        // driver first. On platforms without that concept the query returns
        // NotSupported and nothing is detached.
        let kernel_driver_detached = match handle.kernel_driver_active(SCALE_INTERFACE) {
            Ok(true) => {
                debug!("Detaching kernel driver from interface {SCALE_INTERFACE}");
                handle.detach_kernel_driver(SCALE_INTERFACE).is_ok()
            }
            _ => false,
        };

        handle
            .claim_interface(SCALE_INTERFACE)
            .map_err(|e| ScaleError::Open(e.to_string()))?;

        Ok(Self {
            handle,
            kernel_driver_detached,
        })
    }
}

impl FrameSource for OpenScale {
    fn read_frame(&mut self, endpoint: u8, timeout: Duration) -> Result<RawFrame, ScaleError> {
        let mut buf = [0u8; REPORT_SIZE];
        let len = self
            .handle
            .read_interrupt(endpoint, &mut buf, timeout)
            .map_err(|e| match e {
                rusb::Error::NoDevice => ScaleError::Disconnected,
                other => ScaleError::Transfer(other.to_string()),
            })?;
        if len != REPORT_SIZE {
            return Err(ScaleError::Transfer(format!(
                "short read: {len} of {REPORT_SIZE} bytes"
            )));
        }
        Ok(buf)
    }
}

impl Drop for OpenScale {
    fn drop(&mut self) {
        let _ = self.handle.release_interface(SCALE_INTERFACE);
        if self.kernel_driver_detached {
            let _ = self.handle.attach_kernel_driver(SCALE_INTERFACE);
        }
    }
}

//! Transport and protocol layer for USB HID point-of-sale scales
//!
//! This crate turns an enumerated USB device list into one supported scale
//! and its stream of weight reports:
//!
//! - device matching against a registry of known VID/PID pairs
//! - interrupt-IN endpoint resolution from the configuration descriptor
//! - decoding of the 6-byte HID Point of Sale weight reports
//! - a blocking poll session that retries until the weighing settles
//!
//! The USB stack itself (libusb via `rusb`) is confined to the `usb`
//! module; the core operates on the [`ScaleDevice`] and [`FrameSource`]
//! traits and is testable without hardware.

pub mod device_registry;
pub mod error;
pub mod report;

mod discovery;
mod endpoint;
mod session;
mod usb;

pub use device_registry::{is_supported, SupportedDevice, SUPPORTED_SCALES};
pub use discovery::{find_scale, DeviceId, ScaleDevice};
pub use endpoint::{resolve_endpoint, AltSetting, ConfigLayout, InterfaceLayout, FALLBACK_ENDPOINT};
pub use error::ScaleError;
pub use report::{
    decode, unit_label, Decoded, FaultKind, PollState, RawFrame, REPORT_SIZE, UNITS,
};
pub use session::{
    poll_for_weight, FrameSource, Measurement, PollConfig, DEFAULT_DISCARD_COUNT,
    DEFAULT_READ_TIMEOUT,
};
pub use usb::{OpenScale, UsbTransport};

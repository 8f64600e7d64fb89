//! Scale error types

use thiserror::Error;

/// Errors that can occur while locating, opening or reading a scale
#[derive(Error, Debug, Clone)]
pub enum ScaleError {
    // USB subsystem errors
    #[error("USB subsystem initialization failed: {0}")]
    Init(String),

    #[error("USB device enumeration failed: {0}")]
    Enumeration(String),

    // Matching errors
    #[error("no supported scale found on this computer")]
    DeviceNotFound,

    #[error("failed to read device descriptor: {0}")]
    DescriptorRead(String),

    // Open errors, distinguished for user messaging
    #[error("permission denied to scale (check your udev rules): {0}")]
    PermissionDenied(String),

    #[error("scale has been disconnected")]
    Disconnected,

    #[error("failed to open scale: {0}")]
    Open(String),

    // Transfer errors
    #[error("USB transfer failed: {0}")]
    Transfer(String),

    // Protocol errors reported by the device
    #[error("invalid report type byte: 0x{0:02X}")]
    InvalidReport(u8),

    #[error("scale reports fault")]
    ScaleFault,

    #[error("unknown status code: 0x{0:02X}")]
    UnknownStatus(u8),

    #[error("unit code out of range: {0}")]
    UnitRange(u8),
}

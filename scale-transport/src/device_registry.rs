//! Device registry - the supported scale models
//!
//! Scales are identified purely by their USB vendor/product ID pair. The
//! built-in table covers the known HID point-of-sale postal scales; a
//! replacement table can be loaded from JSON at runtime so new models can be
//! added without touching the decode logic.

use serde::{Deserialize, Serialize};

/// A supported scale model, identified by its USB IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedDevice {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
}

impl SupportedDevice {
    /// Construct an entry from a VID/PID pair
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

/// Known HID point-of-sale scales
pub const SUPPORTED_SCALES: &[SupportedDevice] = &[
    // Stamps.com Model 510 5LB Scale
    SupportedDevice::new(0x1446, 0x6a73),
    // USPS (Elane) PS311 "XM Elane Elane UParcel 30lb"
    SupportedDevice::new(0x7b7c, 0x0100),
    // Stamps.com Stainless Steel 5 lb. Digital Scale
    SupportedDevice::new(0x2474, 0x0550),
    // Stamps.com Stainless Steel 35 lb. Digital Scale
    SupportedDevice::new(0x2474, 0x3550),
    // Mettler Toledo
    SupportedDevice::new(0x0eb8, 0xf000),
    // SANFORD Dymo 10 lb USB Postal Scale
    SupportedDevice::new(0x6096, 0x0158),
    // Fairbanks Scales SCB-R9000
    SupportedDevice::new(0x0b67, 0x555e),
    // Dymo-CoStar Corp. M25 Digital Postal Scale
    SupportedDevice::new(0x0922, 0x8004),
    // DYMO 1772057 Digital Postal Scale
    SupportedDevice::new(0x0922, 0x8003),
];

/// Check if a VID/PID pair is in the registry
///
/// Registry order carries no meaning; device selection is by enumeration
/// order, not by position in this table.
pub fn is_supported(registry: &[SupportedDevice], vendor_id: u16, product_id: u16) -> bool {
    registry.contains(&SupportedDevice::new(vendor_id, product_id))
}

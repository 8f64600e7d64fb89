//! Interrupt-IN endpoint resolution from configuration descriptors

use tracing::debug;

use crate::discovery::ScaleDevice;

/// Fallback when no configuration descriptor can be read: direction IN
/// (0x80) | recipient interface (0x01). This is a bit pattern, not a real
/// endpoint index; the transfer itself may still fail if it is wrong.
pub const FALLBACK_ENDPOINT: u8 = 0x81;

/// Plain-data mirror of the parts of a USB configuration descriptor needed
/// to locate the scale's data endpoint
#[derive(Debug, Clone, Default)]
pub struct ConfigLayout {
    /// Interfaces in descriptor order
    pub interfaces: Vec<InterfaceLayout>,
}

/// One interface and its alternate settings
#[derive(Debug, Clone, Default)]
pub struct InterfaceLayout {
    /// Alternate settings in descriptor order
    pub alt_settings: Vec<AltSetting>,
}

/// One alternate setting and its endpoint addresses
#[derive(Debug, Clone, Default)]
pub struct AltSetting {
    /// Endpoint addresses (bEndpointAddress) in descriptor order
    pub endpoints: Vec<u8>,
}

impl ConfigLayout {
    /// Address of the first endpoint of the first alternate setting of the
    /// first interface, if any
    fn first_endpoint(&self) -> Option<u8> {
        self.interfaces
            .first()?
            .alt_settings
            .first()?
            .endpoints
            .first()
            .copied()
    }
}

/// Determine the endpoint address to read weight reports from
///
/// Supported scales expose a single interrupt-IN endpoint, so the first
/// endpoint of the first interface's first alternate setting is taken
/// without further inspection. That single-endpoint assumption is a known
/// limitation; composite devices are out of scope.
///
/// An unreadable or empty configuration descriptor degrades to
/// [`FALLBACK_ENDPOINT`] instead of failing: the subsequent transfer decides
/// whether the address was usable.
pub fn resolve_endpoint<D: ScaleDevice>(device: &D) -> u8 {
    let address = match device.config() {
        Ok(config) => config.first_endpoint().unwrap_or(FALLBACK_ENDPOINT),
        Err(e) => {
            debug!("Config descriptor unreadable ({e}), using fallback endpoint");
            FALLBACK_ENDPOINT
        }
    };
    debug!("bEndpointAddress 0x{:02x}", address);
    address
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DeviceId;
    use crate::error::ScaleError;

    struct FakeDevice {
        config: Option<ConfigLayout>,
    }

    impl ScaleDevice for FakeDevice {
        fn ids(&self) -> Result<DeviceId, ScaleError> {
            Ok(DeviceId {
                vendor_id: 0x0922,
                product_id: 0x8003,
            })
        }

        fn config(&self) -> Result<ConfigLayout, ScaleError> {
            self.config
                .clone()
                .ok_or_else(|| ScaleError::DescriptorRead("fake config failure".into()))
        }
    }

    fn layout_with_endpoints(endpoints: Vec<u8>) -> ConfigLayout {
        ConfigLayout {
            interfaces: vec![InterfaceLayout {
                alt_settings: vec![AltSetting { endpoints }],
            }],
        }
    }

    #[test]
    fn test_first_endpoint_wins() {
        let device = FakeDevice {
            config: Some(layout_with_endpoints(vec![0x82, 0x02])),
        };
        assert_eq!(resolve_endpoint(&device), 0x82);
    }

    #[test]
    fn test_unreadable_config_falls_back() {
        let device = FakeDevice { config: None };
        assert_eq!(resolve_endpoint(&device), FALLBACK_ENDPOINT);
    }

    #[test]
    fn test_empty_config_falls_back() {
        let device = FakeDevice {
            config: Some(ConfigLayout::default()),
        };
        assert_eq!(resolve_endpoint(&device), FALLBACK_ENDPOINT);

        let device = FakeDevice {
            config: Some(layout_with_endpoints(vec![])),
        };
        assert_eq!(resolve_endpoint(&device), FALLBACK_ENDPOINT);
    }
}

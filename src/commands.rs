// Command handlers for the usbscale CLI

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use tracing::info;

use scale_transport::{
    find_scale, is_supported, poll_for_weight, resolve_endpoint, OpenScale, PollConfig,
    ScaleDevice, ScaleError, SupportedDevice, UsbTransport, SUPPORTED_SCALES,
};

use crate::cli::Cli;

/// Resolve the registry: JSON file when given, built-in table otherwise
fn load_registry(path: Option<&Path>) -> anyhow::Result<Vec<SupportedDevice>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open registry file {}", path.display()))?;
            let registry: Vec<SupportedDevice> = serde_json::from_reader(file)
                .with_context(|| format!("failed to parse registry file {}", path.display()))?;
            info!("Loaded {} registry entries from {}", registry.len(), path.display());
            Ok(registry)
        }
        None => Ok(SUPPORTED_SCALES.to_vec()),
    }
}

/// Weigh once and print `<value> <unit>` on stdout
pub fn weigh(cli: &Cli) -> anyhow::Result<()> {
    let registry = load_registry(cli.registry.as_deref())?;

    let usb = UsbTransport::new()?;
    let devices = usb.devices()?;
    let device = find_scale(devices, &registry)?.ok_or(ScaleError::DeviceNotFound)?;

    let endpoint = resolve_endpoint(&device);
    let mut scale = OpenScale::open(&device)?;

    let config = PollConfig {
        discard_count: cli.discard,
        read_timeout: Duration::from_millis(cli.timeout_ms),
    };
    let measurement = poll_for_weight(&mut scale, endpoint, &config)?;

    // The weight line is the only thing on stdout; diagnostics go to stderr
    println!("{} {}", measurement.value, measurement.unit);
    Ok(())
}

/// List attached scales that match the registry
pub fn list(cli: &Cli) -> anyhow::Result<()> {
    let registry = load_registry(cli.registry.as_deref())?;

    let usb = UsbTransport::new()?;
    let mut found = 0;
    for device in usb.devices()? {
        let id = device.ids()?;
        if is_supported(&registry, id.vendor_id, id.product_id) {
            println!("{:04x}:{:04x}", id.vendor_id, id.product_id);
            found += 1;
        }
    }

    if found == 0 {
        info!("No supported scale found on this computer");
    }
    Ok(())
}

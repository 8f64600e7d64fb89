// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "usbscale")]
#[command(author, version, about = "Read weight from USB HID point-of-sale scales")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Number of initial reads to discard (the first report repeats the
    /// previous weighing)
    #[arg(long, global = true, value_name = "N", default_value_t = scale_transport::DEFAULT_DISCARD_COUNT)]
    pub discard: u32,

    /// Per-read timeout in milliseconds
    #[arg(long, global = true, value_name = "MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Load the supported-scale registry from a JSON file instead of the
    /// built-in table
    #[arg(long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Weigh once and print the result (the default)
    #[command(visible_alias = "w")]
    Weigh,

    /// List supported scales attached to this computer
    #[command(visible_aliases = ["ls", "l"])]
    List,
}

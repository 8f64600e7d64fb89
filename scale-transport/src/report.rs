//! Weight report decoding per the HID Point of Sale Usage Tables, v1.02
//!
//! The scale streams fixed 6-byte reports over its interrupt endpoint:
//!
//! - Byte 0: report type (0x03 or 0x04)
//! - Byte 1: status code (see [`status`])
//! - Byte 2: unit code (index into [`UNITS`])
//! - Byte 3: signed base-ten exponent
//! - Bytes 4-5: little-endian unsigned mantissa
//!
//! The reported weight is `mantissa * 10^exponent`.

/// Size of one weight report in bytes
pub const REPORT_SIZE: usize = 6;

/// One raw weight report as read from the interrupt endpoint
pub type RawFrame = [u8; REPORT_SIZE];

/// Status code constants carried in byte 1 of a weight report.
///
/// 0x04 is the only final, successful status. 0x01 and anything outside
/// this set are terminal failures; the remaining codes mean a weighing is
/// still in progress.
pub mod status {
    /// Hardware fault, terminal
    pub const FAULT: u8 = 0x01;
    /// Scale is at zero
    pub const ZEROED: u8 = 0x02;
    /// Weighing in progress
    pub const WEIGHING: u8 = 0x03;
    /// Stable weight available, terminal success
    pub const STABLE: u8 = 0x04;
    /// Load is under zero
    pub const UNDER_ZERO: u8 = 0x05;
    /// Load exceeds the scale's capacity
    pub const OVER_WEIGHT: u8 = 0x06;
    /// Scale requires calibration
    pub const CALIBRATION_NEEDED: u8 = 0x07;
    /// Scale requires re-zeroing
    pub const REZERO_NEEDED: u8 = 0x08;
}

/// Unit abbreviations from the HID Point of Sale Usage Tables, v1.02, by the
/// USB Implementers' Forum. The unit code reported by the scale is the index
/// of its corresponding label.
pub const UNITS: [&str; 13] = [
    "units",  // unknown unit
    "mg",     // milligram
    "g",      // gram
    "kg",     // kilogram
    "cd",     // carat
    "taels",  // lian
    "gr",     // grain
    "dwt",    // pennyweight
    "tonnes", // metric tons
    "tons",   // avoir ton
    "ozt",    // troy ounce
    "oz",     // ounce
    "lbs",    // pound
];

/// Look up a unit label, bounds-checked against the table
///
/// The unit code is device-supplied and must never index the table
/// unchecked.
pub fn unit_label(code: u8) -> Option<&'static str> {
    UNITS.get(usize::from(code)).copied()
}

/// Per-session decode state
///
/// Remembers the status code from the previous poll so that the same
/// human-readable status message is not emitted on every iteration while
/// waiting for a weighing to settle. Suppression applies to the message
/// only, never to the outcome classification or the retry itself.
///
/// One instance per scale session; do not share across sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollState {
    /// Status code seen on the previous decode, `None` before the first
    last_status: Option<u8>,
}

impl PollState {
    /// Fresh state for a new session
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `status` and report whether it differs from the previous poll
    fn transition(&mut self, status: u8) -> bool {
        let changed = self.last_status != Some(status);
        self.last_status = Some(status);
        changed
    }
}

/// Terminal decode failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Report type byte was not 0x03 or 0x04
    InvalidReport(u8),
    /// Device reported a hardware fault (status 0x01)
    Hardware,
    /// Unit code outside the unit table
    UnitOutOfRange(u8),
}

/// Outcome of decoding one weight report
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Final weight, terminal success
    Weight {
        /// Weight value in `unit`
        value: f64,
        /// Unit label from [`UNITS`]
        unit: &'static str,
    },
    /// Weighing still in progress; read again
    Pending {
        /// The status code reported by the scale
        status: u8,
        /// Human-readable status, `None` when unchanged since the last poll
        message: Option<&'static str>,
    },
    /// Terminal failure reported by the device or the wire format
    Fault(FaultKind),
    /// Status code outside the recognized set, terminal failure
    Unknown {
        /// The unrecognized status code
        code: u8,
        /// Whether the code differs from the previous poll's status
        announced: bool,
    },
}

fn pending_message(status: u8) -> &'static str {
    match status {
        status::ZEROED => "scale is zero'd",
        status::WEIGHING => "weighing...",
        status::UNDER_ZERO => "scale reports under zero",
        status::OVER_WEIGHT => "scale reports over weight",
        status::CALIBRATION_NEEDED => "scale reports calibration needed",
        _ => "scale reports re-zeroing needed",
    }
}

/// Decode one weight report
///
/// Pure apart from updating `state`; emitting the returned messages is the
/// caller's concern.
pub fn decode(frame: &RawFrame, state: &mut PollState) -> Decoded {
    let report = frame[0];
    if report != 0x03 && report != 0x04 {
        return Decoded::Fault(FaultKind::InvalidReport(report));
    }

    let status_code = frame[1];
    let unit = frame[2];
    // Scaling is applied to the mantissa as a signed base-ten exponent
    let exponent = frame[3] as i8;
    let mantissa = u16::from_le_bytes([frame[4], frame[5]]);
    let weight = f64::from(mantissa) * 10f64.powi(i32::from(exponent));

    match status_code {
        status::FAULT => Decoded::Fault(FaultKind::Hardware),
        status::STABLE => match unit_label(unit) {
            Some(label) => Decoded::Weight {
                value: weight,
                unit: label,
            },
            None => Decoded::Fault(FaultKind::UnitOutOfRange(unit)),
        },
        status::ZEROED
        | status::WEIGHING
        | status::UNDER_ZERO
        | status::OVER_WEIGHT
        | status::CALIBRATION_NEEDED
        | status::REZERO_NEEDED => {
            let message = state
                .transition(status_code)
                .then(|| pending_message(status_code));
            Decoded::Pending {
                status: status_code,
                message,
            }
        }
        code => {
            let announced = state.transition(code);
            Decoded::Unknown { code, announced }
        }
    }
}

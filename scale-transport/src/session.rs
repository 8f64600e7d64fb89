//! Polling session: repeated interrupt reads until a terminal outcome

use std::time::Duration;

use tracing::{info, trace, warn};

use crate::error::ScaleError;
use crate::report::{decode, Decoded, FaultKind, PollState, RawFrame};

/// Number of initial reads discarded by default. The first report after
/// opening a scale repeats the previous weighing.
pub const DEFAULT_DISCARD_COUNT: u32 = 1;

/// Default per-read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of raw weight reports - one blocking transport read per call
pub trait FrameSource {
    /// Read one report from `endpoint`, blocking up to `timeout`
    fn read_frame(&mut self, endpoint: u8, timeout: Duration) -> Result<RawFrame, ScaleError>;
}

/// Session knobs
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Successful reads to discard before decoding starts to matter
    pub discard_count: u32,
    /// Timeout applied to each individual read
    pub read_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            discard_count: DEFAULT_DISCARD_COUNT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// A settled weight reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Weight value in `unit`
    pub value: f64,
    /// Unit label
    pub unit: &'static str,
}

/// Poll the scale until it produces a stable weight or fails
///
/// The first `discard_count` successful reads are thrown away unconditionally
/// (stale data from the previous weighing). After that the session loops:
/// a transport failure ends it immediately, a `Pending` decode retries (a
/// weighing can legitimately take several seconds, so there is no iteration
/// cap beyond the per-read timeout), and any terminal decode returns.
///
/// Pending status messages are emitted to the diagnostic log as they change;
/// suppression never skips a retry, only the repeated message.
pub fn poll_for_weight<S: FrameSource>(
    source: &mut S,
    endpoint: u8,
    config: &PollConfig,
) -> Result<Measurement, ScaleError> {
    for n in 0..config.discard_count {
        let frame = source.read_frame(endpoint, config.read_timeout)?;
        trace!("Discarding stale report {} of {}: {:02X?}", n + 1, config.discard_count, frame);
    }

    let mut state = PollState::new();
    loop {
        let frame = source.read_frame(endpoint, config.read_timeout)?;
        trace!("Report: {:02X?}", frame);

        match decode(&frame, &mut state) {
            Decoded::Weight { value, unit } => return Ok(Measurement { value, unit }),
            Decoded::Pending { message, .. } => {
                if let Some(message) = message {
                    info!("{message}");
                }
            }
            Decoded::Fault(kind) => {
                return Err(match kind {
                    FaultKind::InvalidReport(byte) => ScaleError::InvalidReport(byte),
                    FaultKind::Hardware => ScaleError::ScaleFault,
                    FaultKind::UnitOutOfRange(code) => ScaleError::UnitRange(code),
                })
            }
            Decoded::Unknown { code, announced } => {
                if announced {
                    warn!("Unknown status code: 0x{code:02X}");
                }
                return Err(ScaleError::UnknownStatus(code));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Frame source backed by a queue of canned results
    struct QueuedSource {
        frames: VecDeque<Result<RawFrame, ScaleError>>,
        reads: usize,
    }

    impl QueuedSource {
        fn new(frames: Vec<Result<RawFrame, ScaleError>>) -> Self {
            Self {
                frames: frames.into(),
                reads: 0,
            }
        }
    }

    impl FrameSource for QueuedSource {
        fn read_frame(&mut self, _endpoint: u8, _timeout: Duration) -> Result<RawFrame, ScaleError> {
            self.reads += 1;
            self.frames
                .pop_front()
                .unwrap_or(Err(ScaleError::Transfer("queue exhausted".into())))
        }
    }

    fn config_with_discard(discard_count: u32) -> PollConfig {
        PollConfig {
            discard_count,
            ..PollConfig::default()
        }
    }

    #[test]
    fn test_discard_then_pending_then_weight() {
        // Stale garbage, a weighing-in-progress report, then a stable 50.0 g
        let mut source = QueuedSource::new(vec![
            Ok([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
            Ok([0x03, 0x03, 0x02, 0x00, 0x00, 0x00]),
            Ok([0x04, 0x04, 0x02, 0xFF, 0xF4, 0x01]),
        ]);

        let m = poll_for_weight(&mut source, 0x82, &config_with_discard(1)).unwrap();
        assert!((m.value - 50.0).abs() < 1e-9);
        assert_eq!(m.unit, "g");
        assert_eq!(source.reads, 3);
    }

    #[test]
    fn test_garbage_in_discard_window_is_ignored() {
        // The discard window would decode as an invalid report, but it never
        // reaches the decoder.
        let mut source = QueuedSource::new(vec![
            Ok([0xFF, 0x01, 0x00, 0x00, 0x00, 0x00]),
            Ok([0xFF, 0x01, 0x00, 0x00, 0x00, 0x00]),
            Ok([0x04, 0x04, 0x0C, 0x00, 0x05, 0x00]),
        ]);

        let m = poll_for_weight(&mut source, 0x82, &config_with_discard(2)).unwrap();
        assert!((m.value - 5.0).abs() < 1e-9);
        assert_eq!(m.unit, "lbs");
    }

    #[test]
    fn test_zero_discard() {
        let mut source = QueuedSource::new(vec![Ok([0x04, 0x04, 0x03, 0x00, 0x02, 0x00])]);
        let m = poll_for_weight(&mut source, 0x82, &config_with_discard(0)).unwrap();
        assert!((m.value - 2.0).abs() < 1e-9);
        assert_eq!(m.unit, "kg");
        assert_eq!(source.reads, 1);
    }

    #[test]
    fn test_transfer_error_is_immediate() {
        let mut source = QueuedSource::new(vec![
            Ok([0x03, 0x03, 0x02, 0x00, 0x00, 0x00]),
            Err(ScaleError::Transfer("timed out".into())),
            Ok([0x04, 0x04, 0x02, 0x00, 0x01, 0x00]),
        ]);

        let result = poll_for_weight(&mut source, 0x82, &config_with_discard(0));
        assert!(matches!(result, Err(ScaleError::Transfer(_))));
        assert_eq!(source.reads, 2);
    }

    #[test]
    fn test_transfer_error_during_discard() {
        let mut source = QueuedSource::new(vec![Err(ScaleError::Transfer("timed out".into()))]);
        let result = poll_for_weight(&mut source, 0x82, &config_with_discard(1));
        assert!(matches!(result, Err(ScaleError::Transfer(_))));
    }

    #[test]
    fn test_fault_stops_polling() {
        let mut source = QueuedSource::new(vec![
            Ok([0x03, 0x01, 0x00, 0x00, 0x00, 0x00]),
            Ok([0x04, 0x04, 0x02, 0x00, 0x01, 0x00]),
        ]);

        let result = poll_for_weight(&mut source, 0x82, &config_with_discard(0));
        assert!(matches!(result, Err(ScaleError::ScaleFault)));
        assert_eq!(source.reads, 1);
    }

    #[test]
    fn test_unknown_status_stops_polling() {
        let mut source = QueuedSource::new(vec![Ok([0x03, 0x7F, 0x00, 0x00, 0x00, 0x00])]);
        let result = poll_for_weight(&mut source, 0x82, &config_with_discard(0));
        assert!(matches!(result, Err(ScaleError::UnknownStatus(0x7F))));
    }

    #[test]
    fn test_unit_out_of_range_stops_polling() {
        let mut source = QueuedSource::new(vec![Ok([0x04, 0x04, 0x0D, 0x00, 0x01, 0x00])]);
        let result = poll_for_weight(&mut source, 0x82, &config_with_discard(0));
        assert!(matches!(result, Err(ScaleError::UnitRange(0x0D))));
    }

    #[test]
    fn test_repeated_pending_keeps_retrying() {
        // Many identical pending reports before the weight settles; the
        // session retries through all of them.
        let mut frames: Vec<Result<RawFrame, ScaleError>> =
            vec![Ok([0x03, 0x03, 0x02, 0x00, 0x00, 0x00]); 20];
        frames.push(Ok([0x04, 0x04, 0x02, 0x00, 0x64, 0x00]));
        let mut source = QueuedSource::new(frames);

        let m = poll_for_weight(&mut source, 0x82, &config_with_discard(0)).unwrap();
        assert!((m.value - 100.0).abs() < 1e-9);
        assert_eq!(source.reads, 21);
    }
}

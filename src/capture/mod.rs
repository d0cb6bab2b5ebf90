//! Capture ingest and frame reassembly.

mod event;
mod reader;
mod reassembler;

pub use event::{ByteEvent, Direction};
pub use reader::{load_capture, read_events, CaptureError};
pub use reassembler::{reassemble, Frame, FrameKind, Reassembler, BREAK};

/// Default maximum spacing between bytes of one frame, in seconds.
pub const DEFAULT_GAP_THRESHOLD: f64 = 0.004;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CaptureConfig {
    /// Pending bytes are flushed as raw when the next byte in the same
    /// direction arrives more than this many seconds later.
    pub gap_threshold: f64,
    /// Fail on rows with an unparsable timestamp or byte value instead of
    /// skipping them.
    pub strict: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig { gap_threshold: DEFAULT_GAP_THRESHOLD, strict: false }
    }
}

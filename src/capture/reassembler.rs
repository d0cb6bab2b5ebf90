use std::collections::VecDeque;

use log::{debug, trace};

use super::event::{ByteEvent, Direction};
use super::CaptureConfig;
use crate::protocol::packet::{self, FrameError, Packet, HEADER_LEN};

/// Idle/reset marker sent between exchanges.
pub const BREAK: [u8; 4] = [0xff, 0xff, 0x00, 0x00];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FrameKind {
    /// Header, payload and trailer with a valid checksum.
    Packet,
    /// The `BREAK` marker.
    Break,
    /// Bytes that could not be interpreted.
    Raw,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub kind: FrameKind,
    pub direction: Direction,
    /// Time of the first byte, in seconds.
    pub start_time: f64,
    pub bytes: Vec<u8>,
}

impl Frame {
    /// Re-runs the codec over a packet frame. `None` for break and raw frames.
    pub fn packet(&self) -> Option<Result<Packet, FrameError>> {
        match self.kind {
            FrameKind::Packet => Some(Packet::parse(&self.bytes)),
            FrameKind::Break | FrameKind::Raw => None,
        }
    }
}

/// Not-yet-framed bytes of one direction.
#[derive(Debug, Default)]
struct PendingBuffer {
    bytes: VecDeque<ByteEvent>,
    last_time: Option<f64>,
}

impl PendingBuffer {
    fn starts_with_break(&self) -> bool {
        self.bytes.len() >= BREAK.len()
            && self.bytes.iter().zip(BREAK.iter()).all(|(e, b)| e.value == *b)
    }

    /// Removes the first `len` bytes and emits them as one frame.
    fn emit(&mut self, kind: FrameKind, direction: Direction, len: usize, out: &mut Vec<Frame>) {
        let start_time = match self.bytes.front() {
            Some(first) => first.time,
            None => return,
        };
        let bytes = self.bytes.drain(..len).map(|e| e.value).collect();
        out.push(Frame { kind, direction, start_time, bytes });
    }

    /// Frames as much of the buffer as possible. Every iteration either
    /// emits a frame or stops, so the buffer strictly shrinks. With
    /// `final_flush` set, an incomplete tail is emitted as one raw frame
    /// instead of waiting for more bytes.
    fn drain(&mut self, direction: Direction, out: &mut Vec<Frame>, final_flush: bool) {
        while !self.bytes.is_empty() {
            if self.starts_with_break() {
                self.emit(FrameKind::Break, direction, BREAK.len(), out);
                continue;
            }

            if self.bytes.len() < HEADER_LEN {
                break;
            }

            let total_length = packet::frame_length(self.bytes[HEADER_LEN - 1].value);
            if self.bytes.len() < total_length {
                break;
            }

            let candidate: Vec<u8> = self.bytes.iter().take(total_length).map(|e| e.value).collect();
            match packet::validate_frame(&candidate) {
                Ok(()) => self.emit(FrameKind::Packet, direction, total_length, out),
                Err(e) => {
                    trace!("{} resync at {:.6}: {}", direction, self.bytes[0].time, e);
                    self.emit(FrameKind::Raw, direction, 1, out);
                }
            }
        }

        if final_flush && !self.bytes.is_empty() {
            debug!("{} flushing {} trailing bytes as raw", direction, self.bytes.len());
            let len = self.bytes.len();
            self.emit(FrameKind::Raw, direction, len, out);
        }
    }
}

/// Turns per-direction byte streams into frames. Feed it events in time
/// order with `ingest`, then call `finish`.
#[derive(Debug)]
pub struct Reassembler {
    gap_threshold: f64,
    rx: PendingBuffer,
    tx: PendingBuffer,
    frames: Vec<Frame>,
}

impl Reassembler {
    pub fn new(config: &CaptureConfig) -> Self {
        Reassembler {
            gap_threshold: config.gap_threshold,
            rx: PendingBuffer::default(),
            tx: PendingBuffer::default(),
            frames: Vec::new(),
        }
    }

    fn split(&mut self, direction: Direction) -> (&mut PendingBuffer, &mut Vec<Frame>) {
        match direction {
            Direction::Rx => (&mut self.rx, &mut self.frames),
            Direction::Tx => (&mut self.tx, &mut self.frames),
        }
    }

    pub fn ingest(&mut self, event: &ByteEvent) {
        let gap_threshold = self.gap_threshold;
        let direction = event.direction;
        let (buffer, frames) = self.split(direction);

        if let Some(last_time) = buffer.last_time {
            let delta = event.time - last_time;
            if delta > gap_threshold && !buffer.bytes.is_empty() {
                debug!("{} idle gap of {:.6}s at {:.6}, flushing", direction, delta, event.time);
                buffer.drain(direction, frames, true);
            }
        }

        if event.has_error {
            trace!("{} byte 0x{:02x} at {:.6} flagged by analyzer", direction, event.value, event.time);
        }

        buffer.last_time = Some(event.time);
        buffer.bytes.push_back(*event);
        buffer.drain(direction, frames, false);
    }

    /// Frames whatever is left in one direction, emitting any incomplete
    /// tail as raw.
    pub fn flush(&mut self, direction: Direction) {
        let (buffer, frames) = self.split(direction);
        buffer.drain(direction, frames, true);
    }

    /// Flushes both directions and returns every frame ordered by start
    /// time. Frames with equal start times keep their emission order.
    pub fn finish(mut self) -> Vec<Frame> {
        self.flush(Direction::Rx);
        self.flush(Direction::Tx);
        let mut frames = self.frames;
        frames.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        frames
    }
}

/// Sorts `events` by time (ties keep their original order) and reassembles
/// them into frames.
pub fn reassemble(mut events: Vec<ByteEvent>, config: &CaptureConfig) -> Vec<Frame> {
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    let mut reassembler = Reassembler::new(config);
    for event in &events {
        reassembler.ingest(event);
    }
    reassembler.finish()
}

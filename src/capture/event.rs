use std::fmt;

/// Bus direction as labelled in the capture.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Indoor unit -> module
    Rx,
    /// Module -> indoor unit
    Tx,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Rx => "RX",
            Direction::Tx => "TX",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single decoded byte from the analyzer, timestamped in seconds from the
/// start of the capture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ByteEvent {
    pub direction: Direction,
    pub time: f64,
    pub value: u8,
    /// The analyzer flagged a framing/parity error on this byte.
    pub has_error: bool,
}

impl ByteEvent {
    pub fn new(direction: Direction, time: f64, value: u8) -> Self {
        ByteEvent { direction, time, value, has_error: false }
    }
}

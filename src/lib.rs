//! airstage
//!
//! Reverse-engineered decoder for the serial protocol spoken between some
//! Fujitsu air conditioner indoor units and their network control module.
//!
//! This library is in its very early stages. Register meanings come from
//! observation only.
//!
//! There is no code to talk to a live bus here. Captures come from a logic
//! analyzer's async-serial export: each decoded byte, timestamped and tagged
//! with its direction. The crate turns those bytes into frames, validates
//! packets and classifies their payloads.
//!
//! ## Frame Layout
//!
//! ```text
//!  0   1   2   3   4   5 .. 5+n   5+n  6+n
//! C0  C1  C2  C3  LN  payload     CH   CL
//! ```
//!
//! `C0..C3` is the little-endian command id, `LN` the payload length and
//! `CH CL` a big-endian checksum chosen so that the 16-bit sum of every
//! preceding byte plus the checksum is `0xffff`. Exchanges are separated by
//! a `ff ff 00 00` break.
//!
//! ## General Usage
//!
//! Reassemble timestamped bytes and decode what comes out:
//!
//! ```
//! use airstage::capture::{reassemble, ByteEvent, CaptureConfig, Direction, FrameKind};
//! use airstage::protocol::{Message, ReadRequest};
//!
//! let bytes = [0xff, 0xff, 0x00, 0x00,
//!              0x03, 0x00, 0x00, 0x00, 0x02, 0x10, 0x00, 0xff, 0xea];
//!
//! let events = bytes
//!     .iter()
//!     .enumerate()
//!     .map(|(i, b)| ByteEvent::new(Direction::Rx, i as f64 * 0.0001, *b))
//!     .collect();
//!
//! let frames = reassemble(events, &CaptureConfig::default());
//! assert_eq!(frames[0].kind, FrameKind::Break);
//!
//! // Packet frames are re-validated on the way out.
//! let packet = frames[1].packet().unwrap().unwrap();
//! assert_eq!(
//!     Message::decode(&packet),
//!     Message::ReadRequest(ReadRequest { addresses: vec![0x1000] })
//! );
//! ```
//!
//! Encode a packet:
//!
//! ```
//! use airstage::protocol::Packet;
//!
//! let packet = Packet::new(0, vec![0xaa, 0xbb]);
//!
//! assert_eq!(
//!     //     ---- command id          ---- len    ---- checksum
//!     //     ||||||||||||||||||||      ||||        ||||||||||
//!     &[ 0x00, 0x00, 0x00, 0x00,      0x02,  0xaa, 0xbb,  0xfe, 0x98 ][..],
//!     &packet.serialize().unwrap()[..]
//! );
//! ```

pub mod capture;
pub mod protocol;
pub mod registers;

#[doc(inline)]
pub use protocol::*;

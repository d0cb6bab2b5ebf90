use nom::bytes::complete::take;
use nom::number::complete::{be_u16, le_u32, u8 as byte};
use nom::sequence::tuple;
use nom::IResult;
use thiserror::Error;

use super::encoding::{check_len, Encodable, EncodingError};

/// 4-byte command id + 1-byte payload length.
pub const HEADER_LEN: usize = 5;
/// 16-bit checksum.
pub const TRAILER_LEN: usize = 2;
pub const MIN_FRAME_LEN: usize = HEADER_LEN + TRAILER_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame too short")]
    TooShort,
    #[error("payload length does not match frame size")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("checksum mismatch")]
    ChecksumMismatch { calculated: u16, received: u16 },
}

/// `0xffff - (sum of bytes & 0xffff)`
pub fn checksum(bytes: &[u8]) -> u16 {
    let sum = bytes.iter().fold(0u32, |acc, b| acc + *b as u32);
    0xffff - (sum & 0xffff) as u16
}

/// Total frame size implied by a payload length byte.
pub fn frame_length(payload_len: u8) -> usize {
    HEADER_LEN + payload_len as usize + TRAILER_LEN
}

/// Checks size and checksum of a complete candidate frame.
pub fn validate_frame(frame: &[u8]) -> Result<(), FrameError> {
    if frame.len() < MIN_FRAME_LEN {
        return Err(FrameError::TooShort);
    }

    let declared = frame_length(frame[4]);
    if frame.len() != declared {
        return Err(FrameError::LengthMismatch { declared, actual: frame.len() });
    }

    let (body, trailer) = frame.split_at(frame.len() - TRAILER_LEN);
    let calculated = checksum(body);
    let received = u16::from_be_bytes([trailer[0], trailer[1]]);
    if calculated != received {
        return Err(FrameError::ChecksumMismatch { calculated, received });
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub command_id: u32,
    pub payload: Vec<u8>,
    pub checksum: u16,
}

fn packet_fields(input: &[u8]) -> IResult<&[u8], (u32, &[u8], u16)> {
    let (input, (command_id, len)) = tuple((le_u32, byte))(input)?;
    let (input, (payload, checksum)) = tuple((take(len), be_u16))(input)?;
    Ok((input, (command_id, payload, checksum)))
}

impl Packet {
    /// Builds a packet and computes the checksum its frame will carry.
    pub fn new(command_id: u32, payload: Vec<u8>) -> Self {
        let mut header = [0u8; HEADER_LEN];
        header[0..4].copy_from_slice(&command_id.to_le_bytes());
        header[4] = payload.len() as u8;
        let checksum = checksum(&[&header[..], &payload[..]].concat());
        Packet { command_id, payload, checksum }
    }

    pub fn payload_length(&self) -> usize {
        self.payload.len()
    }

    pub fn frame_length(&self) -> usize {
        HEADER_LEN + self.payload.len() + TRAILER_LEN
    }

    /// Validates `frame` and splits it into its fields. Validation is the
    /// only source of truth for whether a frame is a packet.
    pub fn parse(frame: &[u8]) -> Result<Self, FrameError> {
        validate_frame(frame)?;

        match packet_fields(frame) {
            Ok((_, (command_id, payload, checksum))) => Ok(Packet {
                command_id,
                payload: payload.to_vec(),
                checksum,
            }),
            // validate_frame has already pinned the sizes
            Err(_) => Err(FrameError::TooShort),
        }
    }

    /// Serialized frame: little-endian id, length, payload, big-endian
    /// checksum over everything before it.
    pub fn serialize(&self) -> Result<Vec<u8>, EncodingError> {
        self.to_bytes()
    }
}

impl Encodable for Packet {
    fn encoded_len(&self) -> usize {
        self.frame_length()
    }

    fn encode<'a>(&self, into: &'a mut [u8]) -> Result<&'a [u8], EncodingError> {
        let len = self.payload.len();
        if len > u8::MAX as usize {
            return Err(EncodingError::PayloadTooLong(len));
        }
        check_len(into, self.frame_length())?;

        into[0..4].copy_from_slice(&self.command_id.to_le_bytes());
        into[4] = len as u8;
        into[HEADER_LEN..HEADER_LEN + len].copy_from_slice(&self.payload);
        let body_len = HEADER_LEN + len;
        let cs = checksum(&into[..body_len]);
        into[body_len..].copy_from_slice(&cs.to_be_bytes());
        Ok(into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_test() {
        assert_eq!(checksum(&[]), 0xffff);
        assert_eq!(checksum(&[0x00, 0x00, 0x00, 0x00, 0x02, 0xaa, 0xbb]), 0xfe98);
    }

    #[test]
    fn checksum_wraps_at_16_bits_test() {
        let bytes = vec![0xffu8; 300];
        let sum = (0xff * 300) & 0xffff;
        assert_eq!(checksum(&bytes), 0xffff - sum as u16);
    }

    #[test]
    fn serialize_test() {
        let packet = Packet::new(0, vec![0xaa, 0xbb]);
        assert_eq!(packet.checksum, 0xfe98);
        assert_eq!(
            packet.serialize(),
            Ok(vec![0x00, 0x00, 0x00, 0x00, 0x02, 0xaa, 0xbb, 0xfe, 0x98])
        );
    }

    #[test]
    fn serialize_command_id_little_endian_test() {
        let frame = Packet::new(0x0403_0201, vec![]).serialize().unwrap();
        assert_eq!(&frame[0..5], &[0x01, 0x02, 0x03, 0x04, 0x00]);
        assert_eq!(frame.len(), MIN_FRAME_LEN);
    }

    #[test]
    fn serialize_payload_too_long_test() {
        let packet = Packet::new(3, vec![0; 256]);
        assert_eq!(packet.serialize(), Err(EncodingError::PayloadTooLong(256)));
    }

    #[test]
    fn encode_buffer_size_test() {
        let mut buf = [0u8; 8];
        assert_eq!(
            Packet::new(0, vec![0xaa, 0xbb]).encode(&mut buf),
            Err(EncodingError::BufferSize { expected: 9, actual: 8 })
        );
    }

    #[test]
    fn parse_test() {
        assert_eq!(
            Packet::parse(&[0x00, 0x00, 0x00, 0x00, 0x02, 0xaa, 0xbb, 0xfe, 0x98]),
            Ok(Packet { command_id: 0, payload: vec![0xaa, 0xbb], checksum: 0xfe98 })
        );
    }

    #[test]
    fn round_trip_test() {
        for payload in vec![vec![], vec![0x10, 0x00], vec![0x5a; 255]] {
            let packet = Packet::new(3, payload);
            let frame = packet.serialize().unwrap();
            assert_eq!(Packet::parse(&frame), Ok(packet));
        }
    }

    #[test]
    fn validate_too_short_test() {
        assert_eq!(validate_frame(&[]), Err(FrameError::TooShort));
        assert_eq!(validate_frame(&[0x00, 0x00, 0x00, 0x00, 0x00, 0xff]), Err(FrameError::TooShort));
    }

    #[test]
    fn validate_length_mismatch_test() {
        assert_eq!(
            validate_frame(&[0x00, 0x00, 0x00, 0x00, 0x03, 0xaa, 0xbb, 0xfe, 0x98]),
            Err(FrameError::LengthMismatch { declared: 10, actual: 9 })
        );
    }

    #[test]
    fn validate_checksum_mismatch_test() {
        let err = validate_frame(&[0x00, 0x00, 0x00, 0x00, 0x02, 0xaa, 0xbb, 0xfe, 0x99]).unwrap_err();
        assert_eq!(err, FrameError::ChecksumMismatch { calculated: 0xfe98, received: 0xfe99 });
        assert_eq!(err.to_string(), "checksum mismatch");
    }

    #[test]
    fn error_reasons_test() {
        assert_eq!(FrameError::TooShort.to_string(), "frame too short");
        assert_eq!(
            FrameError::LengthMismatch { declared: 7, actual: 8 }.to_string(),
            "payload length does not match frame size"
        );
    }
}

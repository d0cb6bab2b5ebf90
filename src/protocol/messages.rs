use super::packet::Packet;
use super::types::{CommandId, RegisterValue};

fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

fn read_register_values(bytes: &[u8]) -> Vec<RegisterValue> {
    bytes
        .chunks_exact(4)
        .map(|c| RegisterValue::new(read_u16(&c[0..2]), read_u16(&c[2..4])))
        .collect()
}

fn command(packet: &Packet) -> Option<CommandId> {
    CommandId::from_repr(packet.command_id)
}

fn is_write(packet: &Packet) -> bool {
    command(packet).map_or(false, |c| c.is_write())
}

/// Indoor unit asking the module for a list of registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub addresses: Vec<u16>,
}

impl ReadRequest {
    pub fn decode(packet: &Packet) -> Option<Self> {
        if command(packet) != Some(CommandId::ReadRegisters) {
            return None;
        }
        let payload = &packet.payload;
        if payload.is_empty() || payload.len() % 2 != 0 {
            return None;
        }
        Some(ReadRequest { addresses: payload.chunks_exact(2).map(read_u16).collect() })
    }
}

/// Module answering a read: status byte then address/value groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    pub status: u8,
    pub values: Vec<RegisterValue>,
}

impl ReadResponse {
    pub fn decode(packet: &Packet) -> Option<Self> {
        if command(packet) != Some(CommandId::ReadRegisters) {
            return None;
        }
        let (status, rest) = packet.payload.split_first()?;
        if rest.len() % 4 != 0 {
            return None;
        }
        Some(ReadResponse { status: *status, values: read_register_values(rest) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub values: Vec<RegisterValue>,
}

impl WriteRequest {
    pub fn decode(packet: &Packet) -> Option<Self> {
        if !is_write(packet) {
            return None;
        }
        let payload = &packet.payload;
        if payload.is_empty() || payload.len() % 4 != 0 {
            return None;
        }
        Some(WriteRequest { values: read_register_values(payload) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResponse {
    pub status: u8,
}

impl WriteResponse {
    pub fn decode(packet: &Packet) -> Option<Self> {
        if !is_write(packet) {
            return None;
        }
        match packet.payload[..] {
            [status] => Some(WriteResponse { status }),
            _ => None,
        }
    }
}

/// Outcome of classifying a packet. `decode` tries the decoders in a fixed
/// order (read request, read response, write request, write response) and
/// takes the first match; the decoders do not check each other's shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ReadRequest(ReadRequest),
    ReadResponse(ReadResponse),
    WriteRequest(WriteRequest),
    WriteResponse(WriteResponse),
    Unknown,
}

impl Message {
    pub fn decode(packet: &Packet) -> Self {
        if let Some(m) = ReadRequest::decode(packet) {
            Message::ReadRequest(m)
        } else if let Some(m) = ReadResponse::decode(packet) {
            Message::ReadResponse(m)
        } else if let Some(m) = WriteRequest::decode(packet) {
            Message::WriteRequest(m)
        } else if let Some(m) = WriteResponse::decode(packet) {
            Message::WriteResponse(m)
        } else {
            Message::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(command_id: u32, payload: &[u8]) -> Packet {
        Packet::new(command_id, payload.to_vec())
    }

    #[test]
    fn read_request_test() {
        let p = packet(3, &[0x10, 0x00]);
        assert_eq!(ReadRequest::decode(&p), Some(ReadRequest { addresses: vec![0x1000] }));
        assert_eq!(Message::decode(&p), Message::ReadRequest(ReadRequest { addresses: vec![0x1000] }));
    }

    #[test]
    fn read_request_rejects_odd_or_empty_test() {
        assert_eq!(ReadRequest::decode(&packet(3, &[])), None);
        assert_eq!(ReadRequest::decode(&packet(3, &[0x10, 0x00, 0x10])), None);
        assert_eq!(ReadRequest::decode(&packet(2, &[0x10, 0x00])), None);
    }

    #[test]
    fn read_response_test() {
        let p = packet(3, &[0x00, 0x10, 0x00, 0x12, 0x34]);
        let expected = ReadResponse { status: 0x00, values: vec![RegisterValue::new(0x1000, 0x1234)] };
        assert_eq!(ReadResponse::decode(&p), Some(expected.clone()));
        assert_eq!(Message::decode(&p), Message::ReadResponse(expected));
    }

    #[test]
    fn read_response_status_only_test() {
        let p = packet(3, &[0x01]);
        assert_eq!(ReadResponse::decode(&p), Some(ReadResponse { status: 0x01, values: vec![] }));
        assert_eq!(ReadResponse::decode(&packet(3, &[])), None);
        assert_eq!(ReadResponse::decode(&packet(3, &[0x00, 0x10, 0x00])), None);
    }

    #[test]
    fn write_request_test() {
        for command_id in &[2, 4, 5] {
            let p = packet(*command_id, &[0x10, 0x02, 0x00, 0xc8, 0x11, 0x08, 0x00, 0x01]);
            assert_eq!(
                Message::decode(&p),
                Message::WriteRequest(WriteRequest {
                    values: vec![RegisterValue::new(0x1002, 0x00c8), RegisterValue::new(0x1108, 0x0001)],
                })
            );
        }
        assert_eq!(WriteRequest::decode(&packet(3, &[0x10, 0x02, 0x00, 0xc8])), None);
        assert_eq!(WriteRequest::decode(&packet(2, &[0x10, 0x02, 0x00])), None);
    }

    #[test]
    fn write_response_test() {
        let p = packet(4, &[0x00]);
        assert_eq!(WriteResponse::decode(&p), Some(WriteResponse { status: 0x00 }));
        assert_eq!(Message::decode(&p), Message::WriteResponse(WriteResponse { status: 0x00 }));
        assert_eq!(WriteResponse::decode(&packet(4, &[0x00, 0x00])), None);
        assert_eq!(WriteResponse::decode(&packet(3, &[0x00])), None);
    }

    #[test]
    fn priority_order_test() {
        let p = packet(3, &[0x10, 0x00, 0x10, 0x01]);
        assert!(ReadResponse::decode(&p).is_none());
        assert_eq!(Message::decode(&p), Message::ReadRequest(ReadRequest { addresses: vec![0x1000, 0x1001] }));
    }

    #[test]
    fn unknown_command_test() {
        let p = packet(0x99, &[0x10, 0x00, 0x00, 0x01]);
        assert_eq!(Message::decode(&p), Message::Unknown);
        assert_eq!(Message::decode(&packet(0, &[0x00])), Message::Unknown);
        assert_eq!(Message::decode(&packet(1, &[])), Message::Unknown);
    }
}

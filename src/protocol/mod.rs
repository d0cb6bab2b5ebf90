pub mod encoding;
pub mod messages;
pub mod packet;
pub mod types;

pub use encoding::{Encodable, EncodingError};
pub use messages::{Message, ReadRequest, ReadResponse, WriteRequest, WriteResponse};
pub use packet::{checksum, validate_frame, FrameError, Packet};
pub use types::{command_name, CommandId, RegisterValue};

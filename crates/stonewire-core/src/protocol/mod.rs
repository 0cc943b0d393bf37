//! Protocol module containing message types and the line codec.

pub mod codec;
pub mod messages;

pub use codec::{encode_line, parse_line, split_line, ProtocolError};
pub use messages::*;

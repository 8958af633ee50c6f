//! Frame codec and check byte for the spilink wire protocol.
//!
//! Every message on the wire is framed as:
//! - A 2-byte start marker (`48 5A`, "HZ")
//! - A 1-byte function id
//! - A 2-byte little-endian payload length
//! - The payload
//! - A 1-byte check: the low byte of a CRC-32 over the payload
//! - A 2-byte stop marker (`0D 0A`, CRLF)
//!
//! Decoding never panics on malformed input; every rejection is a
//! [`FrameError`].

pub mod checksum;
pub mod codec;
pub mod error;
pub mod hex;

pub use checksum::{build_table, checksum, crc32, CRC32_TABLE};
pub use codec::{
    decode_frame, encode_frame, max_frame_size, Frame, FrameRef, HEADER_SIZE, LENGTH_FIELD_MAX,
    MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, START_MARKER, STOP_MARKER, TRAILER_SIZE,
};
pub use error::{FrameError, Result};
pub use hex::HexBytes;

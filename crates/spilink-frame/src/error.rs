/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Fewer bytes than the smallest possible frame.
    #[error("frame too short ({len} bytes, min {min})")]
    TooShort { len: usize, min: usize },

    /// The leading bytes are not the start marker.
    #[error("invalid start marker {found:02X?} (expected [48, 5A])")]
    InvalidStartMarker { found: [u8; 2] },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The length field claims more bytes than were received.
    #[error("frame truncated (need {needed} bytes, got {available})")]
    Truncated { needed: usize, available: usize },

    /// The check byte does not match the payload.
    #[error("check byte mismatch (computed {computed:#04x}, received {received:#04x})")]
    ChecksumMismatch { computed: u8, received: u8 },

    /// The bytes after the check byte are not the stop marker.
    #[error("invalid stop marker {found:02X?} (expected [0D, 0A])")]
    InvalidStopMarker { found: [u8; 2] },
}

impl FrameError {
    /// Integrity failure rather than a malformed frame.
    pub fn is_checksum_mismatch(&self) -> bool {
        matches!(self, FrameError::ChecksumMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;

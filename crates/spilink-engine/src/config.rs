use spilink_frame::{max_frame_size, MAX_PAYLOAD_SIZE};

/// Request engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Largest payload accepted in either direction. Default: 1 KiB.
    pub max_payload_size: usize,
    /// Byte clocked out while reading a response. Default: `0xFF`.
    pub filler_byte: u8,
}

impl EngineConfig {
    /// Length of every response read, and of the receive buffer.
    ///
    /// Bounded by the 16-bit length field whatever `max_payload_size` says.
    pub fn max_frame_size(&self) -> usize {
        max_frame_size(self.max_payload_size)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            filler_byte: 0xFF,
        }
    }
}

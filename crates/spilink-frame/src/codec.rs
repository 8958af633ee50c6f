use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::checksum::checksum;
use crate::error::{FrameError, Result};
use crate::hex::HexBytes;

/// Start marker: "HZ" (0x48 0x5A).
pub const START_MARKER: [u8; 2] = [0x48, 0x5A];

/// Stop marker: CR LF (0x0D 0x0A).
pub const STOP_MARKER: [u8; 2] = [0x0D, 0x0A];

/// Frame header: start marker (2) + function id (1) + length (2) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Frame trailer: check byte (1) + stop marker (2) = 3 bytes.
pub const TRAILER_SIZE: usize = 3;

/// Smallest valid frame: header and trailer around an empty payload.
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + TRAILER_SIZE;

/// Default maximum payload size: 1 KiB.
pub const MAX_PAYLOAD_SIZE: usize = 1024;

/// Largest frame carrying a [`MAX_PAYLOAD_SIZE`] payload.
pub const MAX_FRAME_SIZE: usize = max_frame_size(MAX_PAYLOAD_SIZE);

/// Largest payload the 16-bit length field can express.
pub const LENGTH_FIELD_MAX: usize = u16::MAX as usize;

/// Wire size of a frame carrying `max_payload` bytes.
///
/// Limits above [`LENGTH_FIELD_MAX`] are clamped to it.
pub const fn max_frame_size(max_payload: usize) -> usize {
    let payload = if max_payload > LENGTH_FIELD_MAX {
        LENGTH_FIELD_MAX
    } else {
        max_payload
    };
    HEADER_SIZE + payload + TRAILER_SIZE
}

/// An owned frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The function this message addresses on the peer.
    pub function_id: u8,
    /// The message payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(function_id: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            function_id,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        max_frame_size(self.payload.len())
    }

    /// Encode into a fresh buffer, limited to [`MAX_PAYLOAD_SIZE`].
    pub fn encode(&self) -> Result<BytesMut> {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        encode_frame(self.function_id, &self.payload, &mut dst, MAX_PAYLOAD_SIZE)?;
        Ok(dst)
    }
}

impl From<FrameRef<'_>> for Frame {
    fn from(frame: FrameRef<'_>) -> Self {
        Self::new(frame.function_id, Bytes::copy_from_slice(frame.payload))
    }
}

/// A decoded frame borrowing its payload from the receive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    pub function_id: u8,
    pub payload: &'a [u8],
}

/// Encode a frame into the wire format, appending to `dst`.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────┬──────────┬───────────┬───────┬──────────────┐
/// │ Start (2B)   │ Function │ Length   │ Payload   │ Check │ Stop (2B)    │
/// │ 0x48 0x5A    │ (1B)     │ (2B LE)  │ (Length)  │ (1B)  │ 0x0D 0x0A    │
/// └──────────────┴──────────┴──────────┴───────────┴───────┴──────────────┘
/// ```
///
/// A payload longer than `max_payload` (or than the 16-bit length field can
/// express) is rejected, never truncated.
pub fn encode_frame(
    function_id: u8,
    payload: &[u8],
    dst: &mut BytesMut,
    max_payload: usize,
) -> Result<()> {
    let max = max_payload.min(LENGTH_FIELD_MAX);
    if payload.len() > max {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max,
        });
    }

    let start = dst.len();
    dst.reserve(max_frame_size(payload.len()));
    dst.put_slice(&START_MARKER);
    dst.put_u8(function_id);
    dst.put_u16_le(payload.len() as u16);
    dst.put_slice(payload);
    dst.put_u8(checksum(payload));
    dst.put_slice(&STOP_MARKER);

    trace!(function_id, frame = %HexBytes(&dst[start..]), "encoded frame");
    Ok(())
}

/// Decode and validate the frame at the start of `src`.
///
/// Checks run in a fixed order, and the first failure wins:
/// length floor, start marker, declared length against `max_payload`,
/// declared length against the bytes actually present, check byte,
/// stop marker. Bytes after the stop marker are ignored.
pub fn decode_frame(src: &[u8], max_payload: usize) -> Result<FrameRef<'_>> {
    if src.len() < MIN_FRAME_SIZE {
        return Err(FrameError::TooShort {
            len: src.len(),
            min: MIN_FRAME_SIZE,
        });
    }

    if src[0..2] != START_MARKER {
        return Err(FrameError::InvalidStartMarker {
            found: [src[0], src[1]],
        });
    }

    let function_id = src[2];
    let payload_len = u16::from_le_bytes([src[3], src[4]]) as usize;
    trace!(function_id, payload_len, "frame header");

    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let needed = max_frame_size(payload_len);
    if src.len() < needed {
        return Err(FrameError::Truncated {
            needed,
            available: src.len(),
        });
    }

    let payload = &src[HEADER_SIZE..HEADER_SIZE + payload_len];
    let received = src[HEADER_SIZE + payload_len];
    let computed = checksum(payload);
    if received != computed {
        return Err(FrameError::ChecksumMismatch { computed, received });
    }

    let stop = HEADER_SIZE + payload_len + 1;
    if src[stop..stop + 2] != STOP_MARKER {
        return Err(FrameError::InvalidStopMarker {
            found: [src[stop], src[stop + 1]],
        });
    }

    Ok(FrameRef {
        function_id,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(function_id: u8, payload: &[u8]) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_frame(function_id, payload, &mut buf, MAX_PAYLOAD_SIZE).unwrap();
        buf
    }

    #[test]
    fn test_encode_reference_frame() {
        let buf = encoded(0x01, &[0xAA, 0xBB]);
        assert_eq!(
            buf.as_ref(),
            &[0x48, 0x5A, 0x01, 0x02, 0x00, 0xAA, 0xBB, 0x81, 0x0D, 0x0A]
        );
    }

    #[test]
    fn test_decode_reference_frame() {
        let wire = [0x48, 0x5A, 0x01, 0x02, 0x00, 0xAA, 0xBB, 0x81, 0x0D, 0x0A];
        let frame = decode_frame(&wire, MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(frame.function_id, 0x01);
        assert_eq!(frame.payload, &[0xAA, 0xBB]);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let payload = b"hello, spilink!";
        let buf = encoded(0x7F, payload);

        assert_eq!(buf.len(), max_frame_size(payload.len()));

        let frame = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(frame.function_id, 0x7F);
        assert_eq!(frame.payload, payload);
    }

    #[test]
    fn test_empty_payload() {
        let buf = encoded(0x00, b"");
        assert_eq!(buf.len(), MIN_FRAME_SIZE);
        assert_eq!(buf[5], 0xFF);

        let frame = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(frame.function_id, 0);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_max_payload_roundtrip() {
        let payload = vec![0x5A; MAX_PAYLOAD_SIZE];
        let buf = encoded(0xFE, &payload);
        assert_eq!(buf.len(), MAX_FRAME_SIZE);

        let frame = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(frame.payload, payload.as_slice());
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let mut buf = BytesMut::new();
        let payload = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        let err = encode_frame(1, &payload, &mut buf, MAX_PAYLOAD_SIZE).unwrap_err();
        assert_eq!(
            err,
            FrameError::PayloadTooLarge {
                size: MAX_PAYLOAD_SIZE + 1,
                max: MAX_PAYLOAD_SIZE
            }
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_caps_at_length_field() {
        let mut buf = BytesMut::new();
        let payload = vec![0u8; u16::MAX as usize + 1];
        let err = encode_frame(1, &payload, &mut buf, usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge { max, .. } if max == u16::MAX as usize
        ));
    }

    #[test]
    fn test_encode_appends() {
        let mut buf = BytesMut::from(&b"xx"[..]);
        encode_frame(2, b"ab", &mut buf, MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(&buf[..2], b"xx");
        let frame = decode_frame(&buf[2..], MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(frame.payload, b"ab");
    }

    #[test]
    fn test_decode_too_short() {
        let buf = encoded(1, b"");
        for len in 0..MIN_FRAME_SIZE {
            let err = decode_frame(&buf[..len], MAX_PAYLOAD_SIZE).unwrap_err();
            assert_eq!(
                err,
                FrameError::TooShort {
                    len,
                    min: MIN_FRAME_SIZE
                }
            );
        }
    }

    #[test]
    fn test_decode_truncated_payload() {
        let buf = encoded(1, b"truncate me");
        let err = decode_frame(&buf[..buf.len() - 1], MAX_PAYLOAD_SIZE).unwrap_err();
        assert_eq!(
            err,
            FrameError::Truncated {
                needed: buf.len(),
                available: buf.len() - 1
            }
        );
    }

    #[test]
    fn test_decode_invalid_start_marker() {
        for index in 0..2 {
            let mut buf = encoded(1, b"abc");
            buf[index] ^= 0xFF;
            let err = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap_err();
            assert!(matches!(err, FrameError::InvalidStartMarker { .. }));
            assert!(!err.is_checksum_mismatch());
        }
    }

    #[test]
    fn test_decode_invalid_stop_marker() {
        for offset in 1..=2 {
            let mut buf = encoded(1, b"abc");
            let index = buf.len() - offset;
            buf[index] ^= 0xFF;
            let err = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap_err();
            assert!(matches!(err, FrameError::InvalidStopMarker { .. }));
        }
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let mut buf = encoded(1, b"abc");
        let index = buf.len() - 3;
        let original = buf[index];
        buf[index] ^= 0x01;
        let err = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap_err();
        assert_eq!(
            err,
            FrameError::ChecksumMismatch {
                computed: original,
                received: original ^ 0x01
            }
        );
        assert!(err.is_checksum_mismatch());
    }

    #[test]
    fn test_decode_corrupted_payload_is_checksum_mismatch() {
        let mut buf = encoded(0x01, &[0xAA, 0xBB]);
        buf[6] = 0xBC;
        let err = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap_err();
        assert!(err.is_checksum_mismatch());
    }

    #[test]
    fn test_decode_checksum_checked_before_stop_marker() {
        let mut buf = encoded(1, b"abc");
        let len = buf.len();
        buf[len - 3] ^= 0x01;
        buf[len - 1] = 0x00;
        let err = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap_err();
        assert!(err.is_checksum_mismatch());
    }

    #[test]
    fn test_decode_payload_too_large_even_with_long_buffer() {
        let mut buf = BytesMut::new();
        buf.put_slice(&START_MARKER);
        buf.put_u8(1);
        buf.put_u16_le(MAX_PAYLOAD_SIZE as u16 + 1);
        buf.put_bytes(0, MAX_PAYLOAD_SIZE + 1);
        buf.put_u8(0);
        buf.put_slice(&STOP_MARKER);

        let err = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap_err();
        assert_eq!(
            err,
            FrameError::PayloadTooLarge {
                size: MAX_PAYLOAD_SIZE + 1,
                max: MAX_PAYLOAD_SIZE
            }
        );
    }

    #[test]
    fn test_decode_length_checked_before_truncation() {
        let wire = [0x48, 0x5A, 0x01, 0xFF, 0xFF, 0x00, 0x0D, 0x0A];
        let err = decode_frame(&wire, MAX_PAYLOAD_SIZE).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 0xFFFF, .. }));
    }

    #[test]
    fn test_decode_start_marker_checked_before_length() {
        let wire = [0x00, 0x5A, 0x01, 0xFF, 0xFF, 0x00, 0x0D, 0x0A];
        let err = decode_frame(&wire, MAX_PAYLOAD_SIZE).unwrap_err();
        assert!(matches!(err, FrameError::InvalidStartMarker { found: [0x00, 0x5A] }));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut buf = encoded(9, b"ping");
        buf.put_bytes(0xFF, 32);
        let frame = decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(frame.function_id, 9);
        assert_eq!(frame.payload, b"ping");
    }

    #[test]
    fn test_decode_idle_bus() {
        let idle = [0xFF; MAX_FRAME_SIZE];
        let err = decode_frame(&idle, MAX_PAYLOAD_SIZE).unwrap_err();
        assert!(matches!(err, FrameError::InvalidStartMarker { .. }));
    }

    #[test]
    fn test_frame_wire_size_and_encode() {
        let frame = Frame::new(3, Bytes::from_static(b"test"));
        assert_eq!(frame.wire_size(), MIN_FRAME_SIZE + 4);

        let buf = frame.encode().unwrap();
        let decoded = Frame::from(decode_frame(&buf, MAX_PAYLOAD_SIZE).unwrap());
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_max_frame_size_tracks_payload_limit() {
        assert_eq!(max_frame_size(MAX_PAYLOAD_SIZE), MAX_FRAME_SIZE);
        assert_eq!(max_frame_size(0), MIN_FRAME_SIZE);
    }

    #[test]
    fn test_max_frame_size_clamps_to_length_field() {
        let largest = HEADER_SIZE + LENGTH_FIELD_MAX + TRAILER_SIZE;
        assert_eq!(max_frame_size(LENGTH_FIELD_MAX), largest);
        assert_eq!(max_frame_size(LENGTH_FIELD_MAX + 1), largest);
        assert_eq!(max_frame_size(usize::MAX), largest);
    }
}

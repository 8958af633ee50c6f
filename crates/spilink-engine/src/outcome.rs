use std::fmt;

use spilink_frame::{Frame, FrameError, FrameRef};

use crate::error::EngineError;

/// A validated response, borrowing its payload from the engine's receive
/// buffer. The borrow ends before the next exchange can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<'a> {
    pub function_id: u8,
    pub payload: &'a [u8],
}

impl Response<'_> {
    /// Copy the payload out of the receive buffer.
    pub fn to_frame(&self) -> Frame {
        Frame::new(self.function_id, self.payload.to_vec())
    }
}

impl<'a> From<FrameRef<'a>> for Response<'a> {
    fn from(frame: FrameRef<'a>) -> Self {
        Self {
            function_id: frame.function_id,
            payload: frame.payload,
        }
    }
}

/// Result of one exchange, as delivered to the caller.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// A well-formed frame with a matching check byte.
    Success(Response<'a>),
    /// Bad length, bad markers, or an outbound payload that cannot be framed.
    InvalidFormat(FrameError),
    /// The check byte does not match the received payload.
    ChecksumMismatch { computed: u8, received: u8 },
    /// The transfer or the interrupt wait failed.
    TransportOrWaitFailure(EngineError),
}

/// The tag of an [`Outcome`], without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    InvalidFormat,
    ChecksumMismatch,
    TransportOrWaitFailure,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::InvalidFormat => "invalid_format",
            OutcomeKind::ChecksumMismatch => "checksum_mismatch",
            OutcomeKind::TransportOrWaitFailure => "transport_or_wait_failure",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> Outcome<'a> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::InvalidFormat(_) => OutcomeKind::InvalidFormat,
            Outcome::ChecksumMismatch { .. } => OutcomeKind::ChecksumMismatch,
            Outcome::TransportOrWaitFailure(_) => OutcomeKind::TransportOrWaitFailure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The response, if the exchange succeeded.
    pub fn response(&self) -> Option<&Response<'a>> {
        match self {
            Outcome::Success(response) => Some(response),
            _ => None,
        }
    }
}

impl From<FrameError> for Outcome<'_> {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::ChecksumMismatch { computed, received } => {
                Outcome::ChecksumMismatch { computed, received }
            }
            other => Outcome::InvalidFormat(other),
        }
    }
}

impl From<EngineError> for Outcome<'_> {
    fn from(err: EngineError) -> Self {
        Outcome::TransportOrWaitFailure(err)
    }
}

impl fmt::Display for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(response) => write!(
                f,
                "function {:#04x} returned {} bytes",
                response.function_id,
                response.payload.len()
            ),
            Outcome::InvalidFormat(err) => write!(f, "invalid format: {err}"),
            Outcome::ChecksumMismatch { computed, received } => write!(
                f,
                "check byte mismatch (computed {computed:#04x}, received {received:#04x})"
            ),
            Outcome::TransportOrWaitFailure(err) => write!(f, "{err}"),
        }
    }
}

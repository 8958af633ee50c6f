use std::ffi::c_void;

use spilink_engine::{OutcomeKind, RequestEngine, Response};
use spilink_transport::{InterruptGate, TransferPort};

/// Result codes. Values 0-3 are part of the stable C ABI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpilinkStatus {
    Success = 0,
    InvalidFormat = 1,
    CrcMismatch = 2,
    Unknown = 3,
    InvalidArgument = 4,
    Internal = 99,
}

impl From<OutcomeKind> for SpilinkStatus {
    fn from(kind: OutcomeKind) -> Self {
        match kind {
            OutcomeKind::Success => SpilinkStatus::Success,
            OutcomeKind::InvalidFormat => SpilinkStatus::InvalidFormat,
            OutcomeKind::ChecksumMismatch => SpilinkStatus::CrcMismatch,
            OutcomeKind::TransportOrWaitFailure => SpilinkStatus::Unknown,
        }
    }
}

pub const SPILINK_SUCCESS: SpilinkStatus = SpilinkStatus::Success;
pub const SPILINK_ERROR_INVALID_FORMAT: SpilinkStatus = SpilinkStatus::InvalidFormat;
pub const SPILINK_ERROR_CRC_MISMATCH: SpilinkStatus = SpilinkStatus::CrcMismatch;
pub const SPILINK_ERROR_UNKNOWN: SpilinkStatus = SpilinkStatus::Unknown;
pub const SPILINK_ERROR_INVALID_ARGUMENT: SpilinkStatus = SpilinkStatus::InvalidArgument;
pub const SPILINK_ERROR_INTERNAL: SpilinkStatus = SpilinkStatus::Internal;

pub const SPILINK_MAX_PAYLOAD_SIZE: u16 = spilink_frame::MAX_PAYLOAD_SIZE as u16;

/// A response handed to the callback. `payload` is valid only during the call.
#[repr(C)]
#[derive(Debug)]
pub struct SpilinkResponse {
    pub function_id: u8,
    pub payload_size: u16,
    pub payload: *const u8,
}

impl SpilinkResponse {
    /// Borrowing view of `response`, or `None` when its payload does not fit
    /// `payload_size`.
    pub(crate) fn view(response: &Response<'_>) -> Option<Self> {
        Some(Self {
            function_id: response.function_id,
            payload_size: u16::try_from(response.payload.len()).ok()?,
            payload: response.payload.as_ptr(),
        })
    }
}

/// Invoked once per request. `response` is null unless `status` is success.
pub type SpilinkCallback = Option<
    unsafe extern "C" fn(status: SpilinkStatus, response: *const SpilinkResponse, user_data: *mut c_void),
>;

pub type SpilinkHandle = *mut c_void;

pub(crate) type BoxedPort = Box<dyn TransferPort + Send>;
pub(crate) type BoxedGate = Box<dyn InterruptGate + Send>;

pub(crate) struct LinkHandle {
    pub(crate) engine: RequestEngine<BoxedPort, BoxedGate>,
}

use std::fmt;
use std::io;

use spilink_engine::{EngineError, Outcome};
use spilink_frame::FrameError;
use spilink_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { path, source } => {
            io_error(&format!("{context} ({})", path.display()), source)
        }
        TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn engine_error(context: &str, err: EngineError) -> CliError {
    let stage = err.to_string();
    let source = match err {
        EngineError::RequestTransfer(source)
        | EngineError::InterruptWait(source)
        | EngineError::ResponseTransfer(source) => source,
    };
    let code = transport_error(context, source).code;
    CliError::new(code, format!("{context}: {stage}"))
}

/// Map a failed exchange to an exit code. Success maps to `SUCCESS`.
pub fn outcome_error(context: &str, outcome: Outcome<'_>) -> CliError {
    match outcome {
        Outcome::Success(_) => CliError::new(SUCCESS, context),
        Outcome::InvalidFormat(err) => frame_error(context, err),
        Outcome::ChecksumMismatch { computed, received } => frame_error(
            context,
            FrameError::ChecksumMismatch { computed, received },
        ),
        Outcome::TransportOrWaitFailure(err) => engine_error(context, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_map_to_timeout_code() {
        let err = engine_error(
            "request failed",
            EngineError::InterruptWait(TransportError::Io(io::Error::from(
                io::ErrorKind::TimedOut,
            ))),
        );
        assert_eq!(err.code, TIMEOUT);
        assert!(err.message.starts_with("request failed: interrupt wait failed"));
    }

    #[test]
    fn protocol_failures_are_data_invalid() {
        let err = outcome_error(
            "request failed",
            Outcome::ChecksumMismatch {
                computed: 0x81,
                received: 0x00,
            },
        );
        assert_eq!(err.code, DATA_INVALID);

        let err = outcome_error(
            "request failed",
            Outcome::InvalidFormat(FrameError::TooShort { len: 0, min: 8 }),
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn open_failures_keep_device_path() {
        let err = transport_error(
            "failed to open spi device",
            TransportError::Open {
                path: "/dev/spidev9.9".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
        assert!(err.message.contains("/dev/spidev9.9"));
    }
}

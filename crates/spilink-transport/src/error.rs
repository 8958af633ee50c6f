use std::path::PathBuf;

/// Errors that can occur in transfer or interrupt-wait operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device node.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to apply a device setting.
    #[error("failed to set {setting}: {source}")]
    Configure {
        setting: &'static str,
        source: std::io::Error,
    },

    /// An I/O error occurred during a transfer.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Full-duplex transfers need equally sized tx and rx buffers.
    #[error("transfer buffer length mismatch (tx {tx} bytes, rx {rx} bytes)")]
    LengthMismatch { tx: usize, rx: usize },

    /// The GPIO character device reported an error.
    #[cfg(target_os = "linux")]
    #[error("gpio error: {0}")]
    Gpio(#[from] gpiocdev::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

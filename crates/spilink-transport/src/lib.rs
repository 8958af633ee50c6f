//! Transport collaborators for the spilink protocol engine.
//!
//! The engine needs exactly two capabilities from the hardware:
//! - a synchronous full-duplex transfer ([`TransferPort`])
//! - a blocking wait for a rising edge on the peer's ready line ([`InterruptGate`])
//!
//! This is the lowest layer of spilink. On Linux, [`SpidevPort`] drives a
//! `/dev/spidevB.C` character device and [`EdgeGate`] watches a line on a
//! `/dev/gpiochipN` device.

pub mod error;
pub mod traits;

#[cfg(target_os = "linux")]
pub mod gpio;
#[cfg(target_os = "linux")]
pub mod spidev;

pub use error::{Result, TransportError};
pub use traits::{InterruptGate, TransferPort};

#[cfg(target_os = "linux")]
pub use gpio::{EdgeGate, GpioConfig};
#[cfg(target_os = "linux")]
pub use spidev::{SpiConfig, SpidevPort};

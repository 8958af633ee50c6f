//! Framed request/response messaging over SPI.
//!
//! spilink talks to a peripheral that answers requests over a full-duplex
//! SPI bus and raises a GPIO line when its response is ready.
//!
//! # Crate Structure
//!
//! - [`transport`]: Transfer port and interrupt gate traits, Linux spidev/GPIO adapters
//! - [`frame`]: Wire framing and the CRC-32 check byte
//! - [`engine`]: The request/response engine and its outcomes
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(target_os = "linux")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use spilink::engine::{Outcome, RequestEngine};
//! use spilink::transport::{EdgeGate, GpioConfig, SpiConfig, SpidevPort};
//!
//! let port = SpidevPort::open(SpiConfig::default())?;
//! let gate = EdgeGate::open(GpioConfig::default())?;
//! let mut engine = RequestEngine::new(port, gate);
//!
//! engine.send_request(0x01, &[0xAA, 0xBB], |outcome| match outcome {
//!     Outcome::Success(response) => println!("{:?}", response.payload),
//!     failure => eprintln!("{failure}"),
//! });
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "linux"))]
//! # fn main() {}
//! ```

/// Re-export transport types.
pub mod transport {
    pub use spilink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use spilink_frame::*;
}

/// Re-export engine types.
pub mod engine {
    pub use spilink_engine::*;
}

//! Request/response engine for spilink.
//!
//! One exchange is: encode, transfer the request, block until the peer
//! raises its ready line, transfer a full-size read, decode. The result is
//! always delivered as an [`Outcome`]; the engine never retries and never
//! panics on bad input from the wire.

pub mod config;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod shared;

pub use config::EngineConfig;
pub use engine::RequestEngine;
pub use error::EngineError;
pub use outcome::{Outcome, OutcomeKind, Response};
pub use shared::SharedEngine;

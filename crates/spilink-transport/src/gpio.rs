use std::path::PathBuf;
use std::time::Duration;

use gpiocdev::line::{EdgeDetection, EdgeKind};
use gpiocdev::Request;
use tracing::{debug, trace};

use crate::error::Result;
use crate::traits::InterruptGate;

/// GPIO line settings for the peer's ready signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpioConfig {
    /// Chip device node, e.g. `/dev/gpiochip3`.
    pub chip: PathBuf,
    /// Line offset on the chip.
    pub line: u32,
    /// Consumer label shown by `gpioinfo`.
    pub consumer: String,
}

impl GpioConfig {
    pub const DEFAULT_CHIP: &'static str = "/dev/gpiochip3";
    pub const DEFAULT_LINE: u32 = 15;
    pub const DEFAULT_CONSUMER: &'static str = "spilink";

    /// Default consumer label for `line` on `chip`.
    pub fn new(chip: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            chip: chip.into(),
            line,
            consumer: Self::DEFAULT_CONSUMER.to_string(),
        }
    }
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHIP, Self::DEFAULT_LINE)
    }
}

/// An [`InterruptGate`] backed by a GPIO character device line requested
/// for rising-edge detection.
///
/// The line is released when the gate is dropped.
pub struct EdgeGate {
    request: Request,
    config: GpioConfig,
}

impl EdgeGate {
    /// Request the line as an input with rising-edge events.
    pub fn open(config: GpioConfig) -> Result<Self> {
        let request = Request::builder()
            .on_chip(config.chip.clone())
            .with_consumer(config.consumer.clone())
            .with_line(config.line)
            .with_edge_detection(EdgeDetection::RisingEdge)
            .request()?;
        debug!(chip = ?config.chip, line = config.line, "gpio line requested for rising edges");

        Ok(Self { request, config })
    }

    /// Whether an edge event is already queued, waiting at most `timeout`.
    ///
    /// Callers that need a bounded wait poll this before calling
    /// [`InterruptGate::wait_for_rising_edge`].
    pub fn wait_for_event(&self, timeout: Duration) -> Result<bool> {
        Ok(self.request.wait_edge_event(timeout)?)
    }

    /// Active line settings.
    pub fn config(&self) -> &GpioConfig {
        &self.config
    }
}

impl InterruptGate for EdgeGate {
    fn wait_for_rising_edge(&mut self) -> Result<()> {
        loop {
            let event = self.request.read_edge_event()?;
            if event.kind == EdgeKind::Rising {
                trace!(line = event.offset, timestamp_ns = event.timestamp_ns, "rising edge");
                return Ok(());
            }
            trace!(line = event.offset, "ignoring non-rising edge");
        }
    }
}

impl std::fmt::Debug for EdgeGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeGate")
            .field("chip", &self.config.chip)
            .field("line", &self.config.line)
            .finish()
    }
}

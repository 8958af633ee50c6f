use crate::cmd::SendArgs;
use crate::exit::CliResult;
use crate::output::OutputFormat;

#[cfg(target_os = "linux")]
pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    use spilink_engine::{EngineConfig, RequestEngine};
    use spilink_transport::{EdgeGate, GpioConfig, SpiConfig, SpidevPort};

    use crate::exit::transport_error;

    let timeout = args
        .timeout
        .as_deref()
        .map(link::parse_duration)
        .transpose()?;
    let payload = args.payload.resolve()?;

    tracing::debug!(
        device = %args.device.display(),
        gpio_chip = %args.gpio_chip.display(),
        gpio_line = args.gpio_line,
        function_id = args.function_id,
        payload_size = payload.len(),
        "opening link"
    );
    let port = SpidevPort::open(SpiConfig {
        path: args.device.clone(),
        mode: args.mode,
        speed_hz: args.speed_hz,
        ..SpiConfig::default()
    })
    .map_err(|err| transport_error("failed to open spi device", err))?;
    let gate = EdgeGate::open(GpioConfig::new(args.gpio_chip.clone(), args.gpio_line))
        .map_err(|err| transport_error("failed to request gpio line", err))?;

    let config = EngineConfig {
        max_payload_size: usize::from(args.max_payload),
        ..EngineConfig::default()
    };
    let gate = link::TimeoutGate::new(gate, timeout);
    let mut engine = RequestEngine::with_config(port, gate, config);

    link::exchange(&mut engine, args.function_id, &payload, format)
}

#[cfg(not(target_os = "linux"))]
pub fn run(_args: SendArgs, _format: OutputFormat) -> CliResult<i32> {
    Err(crate::exit::CliError::new(
        crate::exit::FAILURE,
        "send requires Linux spidev and gpio character devices",
    ))
}

#[cfg(any(target_os = "linux", test))]
mod link {
    use std::io;
    use std::time::Duration;

    use spilink_engine::{Outcome, RequestEngine};
    use spilink_transport::{InterruptGate, Result, TransferPort, TransportError};

    use crate::exit::{outcome_error, CliError, CliResult, SUCCESS, USAGE};
    use crate::output::{print_frame, OutputFormat};

    /// An interrupt gate that can also report whether an edge is queued
    /// within a deadline.
    pub trait PolledGate: InterruptGate {
        fn poll_edge(&mut self, timeout: Duration) -> Result<bool>;
    }

    #[cfg(target_os = "linux")]
    impl PolledGate for spilink_transport::EdgeGate {
        fn poll_edge(&mut self, timeout: Duration) -> Result<bool> {
            self.wait_for_event(timeout)
        }
    }

    /// Bounds the ready-line wait by polling for a queued edge first.
    pub struct TimeoutGate<G> {
        inner: G,
        timeout: Option<Duration>,
    }

    impl<G> TimeoutGate<G> {
        pub fn new(inner: G, timeout: Option<Duration>) -> Self {
            Self { inner, timeout }
        }
    }

    impl<G: PolledGate> InterruptGate for TimeoutGate<G> {
        fn wait_for_rising_edge(&mut self) -> Result<()> {
            if let Some(timeout) = self.timeout {
                if !self.inner.poll_edge(timeout)? {
                    return Err(TransportError::Io(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("no ready signal within {timeout:?}"),
                    )));
                }
            }
            self.inner.wait_for_rising_edge()
        }
    }

    /// Run one exchange and print the response.
    pub fn exchange<P, G>(
        engine: &mut RequestEngine<P, G>,
        function_id: u8,
        payload: &[u8],
        format: OutputFormat,
    ) -> CliResult<i32>
    where
        P: TransferPort,
        G: InterruptGate,
    {
        let mut result = Ok(SUCCESS);
        engine.send_request(function_id, payload, |outcome| match outcome {
            Outcome::Success(response) => {
                print_frame(response.function_id, response.payload, format);
            }
            failure => result = Err(outcome_error("request failed", failure)),
        });
        result
    }

    pub fn parse_duration(input: &str) -> CliResult<Duration> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CliError::new(USAGE, "duration must not be empty"));
        }

        let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
            (num, "ms")
        } else if let Some(num) = input.strip_suffix('s') {
            (num, "s")
        } else {
            (input, "s")
        };

        let value: u64 = number
            .parse()
            .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

        if value == 0 {
            return Err(CliError::new(USAGE, "duration must be greater than zero"));
        }

        match unit {
            "ms" => Ok(Duration::from_millis(value)),
            _ => Ok(Duration::from_secs(value)),
        }
    }

}

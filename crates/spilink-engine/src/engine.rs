use bytes::BytesMut;
use spilink_frame::{decode_frame, encode_frame, HexBytes};
use spilink_transport::{InterruptGate, TransferPort};
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::outcome::{Outcome, Response};

/// Drives request/response exchanges over a [`TransferPort`], using an
/// [`InterruptGate`] to learn when the peer's response is ready.
///
/// The engine owns a single receive buffer sized for the largest frame.
/// Every exchange overwrites it, and `&mut self` keeps exchanges from
/// overlapping. Wrap the engine in a [`SharedEngine`](crate::SharedEngine)
/// to issue requests from several threads.
pub struct RequestEngine<P, G> {
    port: P,
    gate: G,
    config: EngineConfig,
    tx_buf: BytesMut,
    scratch: Vec<u8>,
    filler: Box<[u8]>,
    rx_buf: Box<[u8]>,
}

impl<P: TransferPort, G: InterruptGate> RequestEngine<P, G> {
    /// Create an engine with default configuration.
    pub fn new(port: P, gate: G) -> Self {
        Self::with_config(port, gate, EngineConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(port: P, gate: G, config: EngineConfig) -> Self {
        let frame_size = config.max_frame_size();
        Self {
            port,
            gate,
            config,
            tx_buf: BytesMut::with_capacity(frame_size),
            scratch: Vec::with_capacity(frame_size),
            filler: vec![config.filler_byte; frame_size].into_boxed_slice(),
            rx_buf: vec![0u8; frame_size].into_boxed_slice(),
        }
    }

    /// Send a request and deliver the response to `callback`.
    ///
    /// `callback` runs exactly once, before this call returns. The response
    /// payload it receives borrows the engine's receive buffer.
    pub fn send_request<F>(&mut self, function_id: u8, payload: &[u8], callback: F)
    where
        F: FnOnce(Outcome<'_>),
    {
        let outcome = self.request(function_id, payload);
        callback(outcome);
    }

    /// Send a request and wait for its response.
    ///
    /// The interrupt wait has no timeout. Any failure ends the exchange; no
    /// step is retried.
    pub fn request(&mut self, function_id: u8, payload: &[u8]) -> Outcome<'_> {
        if let Err(outcome) = self.transmit(function_id, payload) {
            return outcome;
        }
        self.receive()
    }

    /// Wait for the peer's ready signal, then read and decode one frame.
    ///
    /// This is the second half of [`request`](Self::request), for callers
    /// that trigger the peer by other means.
    pub fn receive(&mut self) -> Outcome<'_> {
        trace!("waiting for rising edge");
        if let Err(err) = self.gate.wait_for_rising_edge() {
            warn!(error = %err, "interrupt wait failed");
            return EngineError::InterruptWait(err).into();
        }

        let received = match self.port.transfer(&self.filler, &mut self.rx_buf) {
            Ok(n) => n.min(self.rx_buf.len()),
            Err(err) => {
                warn!(error = %err, "response transfer failed");
                return EngineError::ResponseTransfer(err).into();
            }
        };
        trace!(bytes = received, frame = %HexBytes(&self.rx_buf[..received]), "response read");

        match decode_frame(&self.rx_buf[..received], self.config.max_payload_size) {
            Ok(frame) => {
                debug!(
                    function_id = frame.function_id,
                    payload_len = frame.payload.len(),
                    "response received"
                );
                Outcome::Success(Response::from(frame))
            }
            Err(err) => {
                warn!(error = %err, "response rejected");
                err.into()
            }
        }
    }

    fn transmit(&mut self, function_id: u8, payload: &[u8]) -> Result<(), Outcome<'static>> {
        self.tx_buf.clear();
        encode_frame(
            function_id,
            payload,
            &mut self.tx_buf,
            self.config.max_payload_size,
        )
        .map_err(|err| {
            warn!(function_id, error = %err, "request not sent");
            Outcome::InvalidFormat(err)
        })?;

        self.scratch.clear();
        self.scratch.resize(self.tx_buf.len(), 0);
        let sent = self
            .port
            .transfer(&self.tx_buf, &mut self.scratch)
            .map_err(|err| {
                warn!(function_id, error = %err, "request transfer failed");
                Outcome::TransportOrWaitFailure(EngineError::RequestTransfer(err))
            })?;

        debug!(function_id, payload_len = payload.len(), bytes = sent, "request sent");
        Ok(())
    }
}

impl<P, G> RequestEngine<P, G> {
    /// Active engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Borrow the transfer port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutably borrow the transfer port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Borrow the interrupt gate.
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Mutably borrow the interrupt gate.
    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    /// Consume the engine and return its collaborators.
    pub fn into_parts(self) -> (P, G) {
        (self.port, self.gate)
    }
}

impl<P, G> std::fmt::Debug for RequestEngine<P, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

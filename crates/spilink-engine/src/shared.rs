use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use spilink_transport::{InterruptGate, TransferPort};

use crate::engine::RequestEngine;
use crate::outcome::Outcome;

/// A cloneable handle that serialises exchanges on one [`RequestEngine`].
///
/// Each call holds the engine for the whole exchange, callback included, so
/// two callers never share the receive buffer or interleave transfers.
pub struct SharedEngine<P, G> {
    inner: Arc<Mutex<RequestEngine<P, G>>>,
}

impl<P, G> Clone for SharedEngine<P, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: TransferPort, G: InterruptGate> SharedEngine<P, G> {
    pub fn new(engine: RequestEngine<P, G>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run one exchange and deliver its outcome to `callback`.
    ///
    /// Blocks while another exchange is in flight.
    pub fn send_request<F>(&self, function_id: u8, payload: &[u8], callback: F)
    where
        F: FnOnce(Outcome<'_>),
    {
        self.lock().send_request(function_id, payload, callback);
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut RequestEngine<P, G>) -> R) -> R {
        f(&mut self.lock())
    }

    // A panicking callback cannot leave the engine half-updated: every
    // exchange rewrites the buffers from scratch.
    fn lock(&self) -> MutexGuard<'_, RequestEngine<P, G>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P, G> std::fmt::Debug for SharedEngine<P, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use spilink_transport::Result as TransportResult;

    use super::*;
    use crate::outcome::OutcomeKind;

    struct IdlePort;

    impl TransferPort for IdlePort {
        fn transfer(&mut self, _tx: &[u8], rx: &mut [u8]) -> TransportResult<usize> {
            rx.fill(0xFF);
            Ok(rx.len())
        }
    }

    struct ReadyGate;

    impl InterruptGate for ReadyGate {
        fn wait_for_rising_edge(&mut self) -> TransportResult<()> {
            Ok(())
        }
    }

    #[test]
    fn clones_share_one_engine() {
        let shared = SharedEngine::new(RequestEngine::new(IdlePort, ReadyGate));
        let other = shared.clone();

        let mut kind = None;
        other.send_request(1, b"", |outcome| kind = Some(outcome.kind()));
        assert_eq!(kind, Some(OutcomeKind::InvalidFormat));

        let max = shared.with_engine(|engine| engine.config().max_payload_size);
        assert_eq!(max, 1024);
    }

    #[test]
    fn survives_panicking_callback() {
        let shared = SharedEngine::new(RequestEngine::new(IdlePort, ReadyGate));
        let clone = shared.clone();
        let result = std::thread::spawn(move || {
            clone.send_request(1, b"", |_| panic!("callback failed"));
        })
        .join();
        assert!(result.is_err());

        let mut calls = 0;
        shared.send_request(1, b"", |_| calls += 1);
        assert_eq!(calls, 1);
    }
}

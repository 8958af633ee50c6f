use crate::error::Result;

/// A synchronous full-duplex byte exchange.
///
/// Every call clocks out all of `tx` while clocking the same number of bytes
/// into `rx`. Implementations must reject `tx.len() != rx.len()` with
/// [`TransportError::LengthMismatch`](crate::TransportError::LengthMismatch)
/// rather than shortening the transfer.
pub trait TransferPort {
    /// Exchange `tx.len()` bytes. Returns the number of bytes transferred.
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize>;
}

/// A blocking, single-shot wait for the peer's ready signal.
pub trait InterruptGate {
    /// Block until the next rising edge arrives on the line.
    fn wait_for_rising_edge(&mut self) -> Result<()>;
}

impl<T: TransferPort + ?Sized> TransferPort for &mut T {
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize> {
        (**self).transfer(tx, rx)
    }
}

impl<T: TransferPort + ?Sized> TransferPort for Box<T> {
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize> {
        (**self).transfer(tx, rx)
    }
}

impl<T: InterruptGate + ?Sized> InterruptGate for &mut T {
    fn wait_for_rising_edge(&mut self) -> Result<()> {
        (**self).wait_for_rising_edge()
    }
}

impl<T: InterruptGate + ?Sized> InterruptGate for Box<T> {
    fn wait_for_rising_edge(&mut self) -> Result<()> {
        (**self).wait_for_rising_edge()
    }
}

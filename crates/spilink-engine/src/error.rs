use spilink_transport::TransportError;

/// Collaborator failures, tagged with the step of the exchange that failed.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Clocking out the request frame failed.
    #[error("request transfer failed: {0}")]
    RequestTransfer(#[source] TransportError),

    /// Waiting for the peer's ready signal failed.
    #[error("interrupt wait failed: {0}")]
    InterruptWait(#[source] TransportError),

    /// Reading the response failed.
    #[error("response transfer failed: {0}")]
    ResponseTransfer(#[source] TransportError),
}

impl EngineError {
    /// The underlying transport error.
    pub fn transport(&self) -> &TransportError {
        match self {
            EngineError::RequestTransfer(err)
            | EngineError::InterruptWait(err)
            | EngineError::ResponseTransfer(err) => err,
        }
    }
}

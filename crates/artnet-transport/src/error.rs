use artnet_core::{EncodeError, ValidationError};
use thiserror::Error;

/// Errors surfaced to callers of [`Receiver`](crate::Receiver) and
/// [`Sender`](crate::Sender).
///
/// Problems with inbound datagrams never show up here; the receive loop
/// discards those frames and keeps listening.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("invalid value: {0}")]
    Validation(#[from] ValidationError),
    #[error("transport closed")]
    Closed,
    #[error("no address found for {0}")]
    NoAddress(String),
}

//! Error taxonomy for the transport layer.
//!
//! Timeouts are ordinary negative outcomes of bounded waits, surfaced to
//! the immediate caller and never retried internally. There is no fatal or
//! abort path anywhere in the crate: the device is assumed to be able to
//! wait indefinitely for traffic.

/// Errors returned by transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A bounded wait exceeded its deadline before data arrived.
    ///
    /// Returned by
    /// [`UsartTransport::read_wait`](crate::transport::UsartTransport::read_wait).
    /// Recoverable; the caller decides whether to retry.
    #[error("timed out waiting for receive data")]
    Timeout,

    /// [`read_byte`](crate::transport::UsartTransport::read_byte) was
    /// called with no unread bytes in the receive buffer.
    ///
    /// The underlying hardware would have handed back whatever stale byte
    /// occupied the slot; the driver fails loudly instead.
    #[error("receive buffer empty")]
    RxEmpty,

    /// The transmit queue is full.
    ///
    /// The default blocking
    /// [`write_byte`](crate::transport::UsartTransport::write_byte) never
    /// reports this (it suspends until the background drain frees space);
    /// the variant exists for callers that build bounded writes on top of
    /// [`try_write_byte`](crate::transport::UsartTransport::try_write_byte).
    #[error("transmit buffer full")]
    BufferFull,

    /// Formatted output exceeded the fixed scratch capacity
    /// ([`FMT_SCRATCH_LEN`](crate::consts::FMT_SCRATCH_LEN)).
    ///
    /// Nothing is transmitted when this is returned.
    #[error("formatted output exceeded scratch buffer capacity")]
    FormatOverflow,
}

//! Constants used across the transport and the command console.
//!
//! This module collects the fixed protocol- and sizing-related values:
//! the tick quantum, default line settings, buffer capacities, and the
//! framing limits of the servo command grammar.
//!
//! Buffer capacities are powers of two so that ring arithmetic compiles to
//! a bitmask instead of a modulo; [`crate::transport::UsartTransport`]
//! asserts this at compile time for whatever capacity it is instantiated
//! with.

/// The fixed periodic interval, in milliseconds, at which
/// [`SysClock::tick`](crate::clock::SysClock::tick) must be invoked.
///
/// Every time bound in the crate (countdowns, elapsed checks, read
/// timeouts) is expressed in multiples of this quantum.
pub const TICK_MSEC: u32 = 1;

/// Default baud rate for [`LineConfig`](crate::hal::LineConfig).
///
/// The line format itself is fixed at 8 data bits, one stop bit, no parity.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Recommended circular-buffer capacity per direction, in bytes.
///
/// Any power of two ≥ 2 works as the `N` parameter of
/// [`UsartTransport`](crate::transport::UsartTransport); this is the size
/// the driver was originally tuned with.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Capacity, in bytes, of the bounded scratch buffer behind
/// [`UsartTransport::write_fmt`](crate::transport::UsartTransport::write_fmt).
///
/// Formatted output longer than this fails with
/// [`Error::FormatOverflow`](crate::error::Error::FormatOverflow) and
/// transmits nothing.
pub const FMT_SCRATCH_LEN: usize = 128;

/// Per-byte bounded-wait deadline, in milliseconds, used by the command
/// console while reading the remainder of a partially received command.
pub const DIGIT_TIMEOUT_MSEC: u32 = 10;

/// Number of servo channels addressable by the command grammar
/// (channel selector digits `'0'` through `'3'`).
pub const SERVO_CHANNEL_COUNT: u8 = 4;

/// Number of decimal digits in the value field of a servo command.
pub const SERVO_VALUE_DIGITS: u32 = 4;

/// Largest value expressible by the four-digit value field.
pub const SERVO_VALUE_MAX: u16 = 9_999;

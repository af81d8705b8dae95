//! Servo-PWM command interpreter.
//!
//! A trivial line-free console on top of the transport: a command is the
//! literal byte `'s'`, one channel-selector digit `'0'`–`'3'`, then exactly
//! four decimal digits forming a zero-padded value in `[0, 9999]`, e.g.
//! `s01500` to center servo 0. On success the value lands in the PWM
//! compare register through the [`ServoBank`] seam.
//!
//! Error policy is abandon-and-rescan: any non-digit byte at a digit
//! position, an out-of-range channel selector, or a per-byte timeout
//! (10 ms, [`DIGIT_TIMEOUT_MSEC`]) aborts the partially read command
//! silently, with no error echoed, and the caller's loop goes back to
//! scanning for the next `'s'`.
//!
//! ```rust,ignore
//! loop {
//!     if let Some(cmd) = poll_command(&mut uart, &CLOCK, &mut pwm) {
//!         // cmd.channel / cmd.value already applied to the bank
//!     }
//! }
//! ```

use crate::clock::SysClock;
use crate::consts::{DIGIT_TIMEOUT_MSEC, SERVO_CHANNEL_COUNT, SERVO_VALUE_DIGITS, SERVO_VALUE_MAX};
use crate::hal::{RxEngine, TxEngine, WaitForInterrupt};
use crate::transport::UsartTransport;

/// PWM duty-cycle seam: the one call the interpreter makes into the
/// timer/PWM layer. `channel` is in `[0, 3]`, `value` in `[0, 9999]`,
/// applied to the channel's compare register.
pub trait ServoBank {
    /// Set the compare (duty) value for `channel`.
    fn set_compare(&mut self, channel: u8, value: u16);
}

/// A successfully decoded and applied servo command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoCommand {
    /// Channel selector, `0..=3`.
    pub channel: u8,
    /// Compare value, `0..=9999`.
    pub value: u16,
}

/// Run one iteration of the command scanner.
///
/// Returns immediately with `None` when no byte is pending. Otherwise
/// reads the command bytes one at a time, each under a
/// [`DIGIT_TIMEOUT_MSEC`] bounded wait, and on a complete well-formed
/// command invokes [`ServoBank::set_compare`] and reports what was
/// applied. Malformed or timed-out commands are dropped silently.
pub fn poll_command<RXE, TXE, W, S, const N: usize>(
    uart: &mut UsartTransport<RXE, TXE, W, N>,
    clock: &SysClock,
    servos: &mut S,
) -> Option<ServoCommand>
where
    RXE: RxEngine,
    TXE: TxEngine,
    W: WaitForInterrupt,
    S: ServoBank,
{
    if !uart.available() {
        return None;
    }

    if uart.read_wait(clock, DIGIT_TIMEOUT_MSEC).ok()? != b's' {
        return None;
    }

    let selector = uart.read_wait(clock, DIGIT_TIMEOUT_MSEC).ok()?;
    if !selector.is_ascii_digit() {
        return None;
    }
    let channel = selector - b'0';
    if channel >= SERVO_CHANNEL_COUNT {
        return None;
    }

    let mut value: u16 = 0;
    for _ in 0..SERVO_VALUE_DIGITS {
        let digit = uart.read_wait(clock, DIGIT_TIMEOUT_MSEC).ok()?;
        if !digit.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u16::from(digit - b'0');
    }
    debug_assert!(value <= SERVO_VALUE_MAX);

    servos.set_compare(channel, value);
    Some(ServoCommand { channel, value })
}

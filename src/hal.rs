//! Hardware seams consumed by the transport.
//!
//! The driver never touches registers, pins, or peripheral clocks
//! directly. Everything hardware-specific sits behind four small traits:
//!
//! - [`RxEngine`] / [`TxEngine`]: the two background transfer-engine
//!   endpoints (DMA channels on real silicon). Each endpoint *owns* the
//!   memory the engine moves bytes through, because that memory is shared
//!   with hardware and must not be treated as plain software state.
//! - [`SerialLine`]: one-shot line configuration (baud, enable).
//! - [`WaitForInterrupt`]: the low-power suspension primitive used by
//!   every blocking loop in the crate.
//!
//! Board bring-up (pin modes, peripheral clock gating, NVIC priorities) is
//! an external collaborator and happens before these traits are handed to
//! [`UsartTransport::new`](crate::transport::UsartTransport::new).

use crate::consts::DEFAULT_BAUD_RATE;
use embedded_hal::delay::DelayNs;

/// Receive-side transfer engine endpoint.
///
/// Models a DMA channel configured in *circular mode* against an N-byte
/// buffer: the engine fills the buffer from index 0 upward while its
/// remaining-count register counts down from N toward 0, wrapping back to
/// N when the buffer wraps. The engine runs entirely independently of
/// software; from the driver's side the counter is read-only and no
/// interrupt masking is needed to sample it.
///
/// The implementor owns the buffer (on hardware, a `&'static mut [u8; N]`
/// handed to the DMA controller) and must use volatile reads in
/// [`read`](RxEngine::read), since hardware writes the memory behind the
/// compiler's back.
pub trait RxEngine {
    /// Start the engine in circular mode over its whole buffer.
    ///
    /// Called once from transport init. Immediately afterwards the
    /// remaining-count must read as the full buffer capacity.
    fn start_circular(&mut self);

    /// The live remaining-count register.
    ///
    /// Invariant: while armed in circular mode this is always in `[1, N]`;
    /// a full wrap re-arms at N, it is never observed as 0.
    fn remaining(&self) -> u32;

    /// Read the byte at `index` in the engine's circular buffer.
    fn read(&self, index: usize) -> u8;
}

/// Transmit-side transfer engine endpoint.
///
/// Models a DMA channel in normal (one-shot) mode draining a contiguous
/// region of its N-byte buffer per burst. The engine requires a contiguous
/// source, which is why the transport splits wrap-straddling data into
/// multiple bursts.
pub trait TxEngine {
    /// Leave the engine idle (zero transfer length) with its completion
    /// interrupt enabled. Called once from transport init.
    fn prime(&mut self);

    /// Store a byte into the engine's buffer at `index`.
    ///
    /// Callers guarantee `index` is outside any region currently armed.
    fn write(&mut self, index: usize, byte: u8);

    /// Configure the source region `[offset, offset + len)` and start the
    /// burst. `len` is never 0 and the region never crosses the physical
    /// end of the buffer.
    fn arm(&mut self, offset: usize, len: u32);

    /// Disable the channel. Called from the completion handler before any
    /// re-arm.
    fn stop(&mut self);

    /// Acknowledge (clear) the pending completion signal.
    fn ack(&mut self);

    /// Bytes left in the burst currently in flight; 0 when idle.
    fn remaining(&self) -> u32;

    /// Whether the channel enable bit is set (a burst is armed).
    fn is_armed(&self) -> bool;
}

/// One-shot serial line configuration.
///
/// The word format is fixed by the driver at 8 data bits, one stop bit, no
/// parity; only the baud rate (and the placeholder flow-control setting)
/// come from [`LineConfig`].
pub trait SerialLine {
    /// Apply the line configuration. Called before the engines start.
    fn configure(&mut self, config: &LineConfig);

    /// Enable the transmitter and receiver. Called last during init.
    fn enable(&mut self);
}

/// Hardware flow control selector.
///
/// Currently a placeholder with no effect: the driver always runs the line
/// without flow control. The parameter is kept on [`LineConfig`] so the
/// init signature does not change when RTS/CTS support lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowControl {
    /// No hardware flow control (the only supported mode).
    #[default]
    None,
}

/// Serial line parameters handed to [`SerialLine::configure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineConfig {
    /// Baud rate in bits per second.
    pub baud_rate: u32,
    /// Hardware flow control; see [`FlowControl`].
    pub flow_control: FlowControl,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            flow_control: FlowControl::None,
        }
    }
}

/// The suspension primitive behind every blocking loop in the crate.
///
/// The contract: [`wait`](WaitForInterrupt::wait) suspends the execution
/// context until any interrupt fires, then returns so the caller can
/// re-evaluate its condition. On Cortex-M this is the `wfi` instruction;
/// hosted implementations may sleep, spin, or pump a simulated interrupt
/// source. Liveness of `write_byte`, `block_for`, and `read_wait` depends
/// on the tick or completion interrupt eventually firing after `wait`
/// returns.
pub trait WaitForInterrupt {
    /// Suspend until an interrupt (or the host equivalent) occurs.
    fn wait(&mut self);
}

/// Busy-spin waiter for targets or tests without a low-power instruction.
///
/// Satisfies the [`WaitForInterrupt`] contract degenerately: it yields to
/// the CPU via [`core::hint::spin_loop`] and returns immediately, so the
/// surrounding loop re-evaluates its condition at full speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinWait;

impl WaitForInterrupt for SpinWait {
    fn wait(&mut self) {
        core::hint::spin_loop();
    }
}

/// Delay-backed waiter for integrations driving the driver by polling.
///
/// Wraps any [`embedded_hal::delay::DelayNs`] provider and sleeps one tick
/// quantum per `wait`, which keeps a polled foreground loop from spinning
/// flat-out while still re-checking its condition every millisecond.
#[derive(Debug)]
pub struct DelayWait<D: DelayNs> {
    delay: D,
}

impl<D: DelayNs> DelayWait<D> {
    /// Wrap a delay provider.
    pub fn new(delay: D) -> Self {
        Self { delay }
    }
}

impl<D: DelayNs> WaitForInterrupt for DelayWait<D> {
    fn wait(&mut self) {
        self.delay.delay_ms(crate::consts::TICK_MSEC);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn spin_wait_returns() {
        let mut w = SpinWait;
        w.wait();
    }

    #[test]
    fn delay_wait_forwards_to_delay_provider() {
        let mut w = DelayWait::new(NoopDelay::new());
        w.wait();
        w.wait();
    }

    #[test]
    fn line_config_defaults() {
        let cfg = LineConfig::default();
        assert_eq!(cfg.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(cfg.flow_control, FlowControl::None);
    }
}

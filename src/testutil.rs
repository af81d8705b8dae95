//! Hand-rolled hardware mocks shared by the in-module test suites.
//!
//! The transfer engines, the serial line, and the servo bank are
//! crate-defined seams with no `embedded-hal` counterpart, so the tests
//! model them directly: `MockRx` plays the circular-mode receive channel
//! (a `feed` writes bytes the way the hardware would and counts its
//! remaining-count down), `MockTx` snapshots each armed burst and
//! `complete` moves it to the simulated wire.

use crate::clock::SysClock;
use crate::hal::{LineConfig, RxEngine, SerialLine, TxEngine, WaitForInterrupt};

/// Receive engine mock: owns the circular buffer and a countdown counter
/// that behaves exactly like the hardware register (N down to 1, wrapping
/// back to N).
#[derive(Debug)]
pub(crate) struct MockRx<const N: usize> {
    pub buf: [u8; N],
    pub remaining: u32,
    pub started: bool,
}

impl<const N: usize> MockRx<N> {
    pub fn new() -> Self {
        Self {
            buf: [0; N],
            remaining: 0,
            started: false,
        }
    }

    /// Deliver bytes the way the engine would: write at the engine's
    /// current index, count the remaining-count down, wrap `0 -> N`.
    pub fn feed(&mut self, bytes: &[u8]) {
        assert!(self.started, "feed before start_circular");
        for &byte in bytes {
            self.buf[N - self.remaining as usize] = byte;
            self.remaining -= 1;
            if self.remaining == 0 {
                self.remaining = N as u32;
            }
        }
    }
}

impl<const N: usize> RxEngine for MockRx<N> {
    fn start_circular(&mut self) {
        self.started = true;
        self.remaining = N as u32;
    }

    fn remaining(&self) -> u32 {
        self.remaining
    }

    fn read(&self, index: usize) -> u8 {
        self.buf[index]
    }
}

/// Transmit engine mock: records each armed region's bounds and, when the
/// test calls [`complete`](MockTx::complete), reads that region out of
/// the buffer the way the hardware does during flight. A foreground write
/// landing inside an armed region therefore shows up as corruption on
/// `wire`. `bursts` additionally keeps an at-arm snapshot of every burst
/// for boundary assertions.
#[derive(Debug)]
pub(crate) struct MockTx<const N: usize> {
    pub buf: [u8; N],
    pub primed: bool,
    /// Bounds `(offset, len)` of the burst in flight.
    pub in_flight: Option<(usize, usize)>,
    pub in_flight_left: u32,
    pub pending: bool,
    /// Every burst ever armed, in order, with its exact bounds.
    pub bursts: Vec<Vec<u8>>,
    /// Everything delivered to the simulated wire, in order.
    pub wire: Vec<u8>,
}

impl<const N: usize> MockTx<N> {
    pub fn new() -> Self {
        Self {
            buf: [0; N],
            primed: false,
            in_flight: None,
            in_flight_left: 0,
            pending: false,
            bursts: Vec::new(),
            wire: Vec::new(),
        }
    }

    /// Finish the burst in flight: deliver the armed region's *current*
    /// buffer contents to the wire, zero the remaining length, raise the
    /// completion flag. The driver's completion handler does the rest.
    pub fn complete(&mut self) {
        let (offset, len) = self.in_flight.expect("no burst in flight");
        self.wire.extend_from_slice(&self.buf[offset..offset + len]);
        self.in_flight_left = 0;
        self.pending = true;
    }
}

impl<const N: usize> TxEngine for MockTx<N> {
    fn prime(&mut self) {
        self.primed = true;
        self.in_flight_left = 0;
    }

    fn write(&mut self, index: usize, byte: u8) {
        self.buf[index] = byte;
    }

    fn arm(&mut self, offset: usize, len: u32) {
        assert!(len > 0, "armed an empty burst");
        let end = offset + len as usize;
        assert!(end <= N, "burst crosses the physical wrap point");
        self.bursts.push(self.buf[offset..end].to_vec());
        self.in_flight = Some((offset, len as usize));
        self.in_flight_left = len;
    }

    fn stop(&mut self) {
        self.in_flight = None;
    }

    fn ack(&mut self) {
        self.pending = false;
    }

    fn remaining(&self) -> u32 {
        self.in_flight_left
    }

    fn is_armed(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Serial line mock: records that configure/enable happened.
#[derive(Debug, Default)]
pub(crate) struct MockLine {
    pub configured: bool,
    pub enabled: bool,
    pub baud_rate: u32,
}

impl SerialLine for MockLine {
    fn configure(&mut self, config: &LineConfig) {
        self.configured = true;
        self.baud_rate = config.baud_rate;
    }

    fn enable(&mut self) {
        assert!(self.configured, "enabled before configure");
        self.enabled = true;
    }
}

/// Waiter that stands in for the tick interrupt: each suspension advances
/// the clock by one quantum, which is exactly what WFI resuming on the
/// SysTick interrupt looks like from the foreground.
#[derive(Debug)]
pub(crate) struct TickWaiter<'a>(pub &'a SysClock);

impl WaitForInterrupt for TickWaiter<'_> {
    fn wait(&mut self) {
        self.0.tick();
    }
}

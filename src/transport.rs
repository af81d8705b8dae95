//! Interrupt/DMA-driven serial transport facade.
//!
//! [`UsartTransport`] is the per-device handle: init, byte and buffer read
//! and write, availability queries, timeout-bounded reads, flush, and
//! statistics. One instance exists per logical serial device, statically
//! sized by the const generic capacity `N` (a power of two).
//!
//! ## Receive path
//!
//! The receive engine runs in circular mode and fills its buffer with no
//! software involvement; the transport only tracks how far behind the
//! engine it is, through [`RxCursor`]. Reads copy nothing; bytes are
//! consumed in place, in arrival order.
//!
//! ## Transmit path
//!
//! Foreground writes land in the engine-owned transmit ring at `tx_head`;
//! the engine drains `[tx_tail, ...)` in contiguous bursts, each as large
//! as possible without crossing the physical wrap point. The completion
//! interrupt ([`handle_tx_complete`](UsartTransport::handle_tx_complete))
//! re-arms follow-on bursts, so a wrap-straddling message goes out in two
//! (or more) bursts with no foreground involvement.
//!
//! ## Concurrency
//!
//! One cooperative foreground context plus two preemptive interrupt
//! contexts (tick, transfer completion). The transmit queue fields
//! and the receive cursor during flush are mutated only inside
//! `critical_section::with` spans of minimal extent; the receive cursor on
//! the normal read path is unmasked because only the foreground mutates it
//! and the engine's counter is read-only from software.

use core::convert::Infallible;
use core::fmt;

use crate::clock::SysClock;
use crate::consts::FMT_SCRATCH_LEN;
use crate::cursor::RxCursor;
use crate::error::Error;
use crate::hal::{LineConfig, RxEngine, SerialLine, TxEngine, WaitForInterrupt};

/// Running transfer counters for one device.
///
/// All fields are monotonically non-decreasing except across
/// [`flush`](UsartTransport::flush), which clears them. The view returned
/// by [`stats`](UsartTransport::stats) is aliasable; callers must not
/// assume atomicity across multiple fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsartStats {
    /// Total bytes consumed from the receive buffer.
    pub rx_bytes: u32,
    /// Total bytes queued for transmission.
    pub tx_bytes: u32,
    /// High-water mark of the receive backlog observed at read time.
    pub max_rx_fifo: u32,
    /// Largest single burst handed to the transmit engine.
    pub max_tx_fifo: u32,
}

/// Per-device serial transport over two background transfer engines.
///
/// ## Type parameters
///
/// - `RXE`: the receive engine endpoint ([`RxEngine`])
/// - `TXE`: the transmit engine endpoint ([`TxEngine`])
/// - `W`: the suspension primitive used by blocking operations
///   ([`WaitForInterrupt`])
/// - `N`: buffer capacity per direction, compile-time asserted to be a
///   power of two ≥ 2 so index arithmetic uses bitmasks
///
/// ## Invariants
///
/// - `tx_head - tx_tail ≡ tx_count (mod N)`: `tx_count` is the bytes
///   written but not yet handed to the engine.
/// - `0 <= tx_count + tx_armed <= N`: in-flight bytes stay part of the
///   occupancy until the completion interrupt retires them, so a
///   foreground write can never land inside an armed region.
/// - The receive cursor's remaining-count stays in `[1, N]` while the
///   engine is armed (see [`RxCursor`]).
///
/// The engine and waiter fields are public the way the reference stack
/// exposes its pin fields: interrupt glue and tests need direct access to
/// the endpoints.
#[derive(Debug)]
pub struct UsartTransport<RXE, TXE, W, const N: usize>
where
    RXE: RxEngine,
    TXE: TxEngine,
    W: WaitForInterrupt,
{
    /// Receive engine endpoint.
    pub rx: RXE,
    /// Transmit engine endpoint.
    pub tx: TXE,
    /// Suspension primitive used by `write_byte` and `read_wait`.
    pub waiter: W,
    rx_cursor: RxCursor<N>,
    /// Next free slot for a foreground write.
    tx_head: usize,
    /// Start of the next engine-armed run.
    tx_tail: usize,
    /// Bytes queued but not yet armed.
    tx_count: usize,
    /// Length of the burst in flight, 0 when the engine is idle.
    tx_armed: usize,
    stats: UsartStats,
}

impl<RXE, TXE, W, const N: usize> UsartTransport<RXE, TXE, W, N>
where
    RXE: RxEngine,
    TXE: TxEngine,
    W: WaitForInterrupt,
{
    /// Initialize the device and return the transport handle.
    ///
    /// Configures the line (8 data bits, one stop bit, no parity; baud and
    /// the placeholder flow-control setting from `config`), starts the
    /// receive engine in circular mode and captures the initial cursor,
    /// primes the transmit engine idle with its completion interrupt
    /// enabled, then enables the line.
    ///
    /// Queue pointers and statistics start zeroed. Board bring-up (pins,
    /// peripheral clocks, interrupt priorities) must already have happened.
    pub fn new(
        mut rx: RXE,
        mut tx: TXE,
        waiter: W,
        line: &mut impl SerialLine,
        config: &LineConfig,
    ) -> Self {
        const {
            assert!(
                N.is_power_of_two() && N >= 2,
                "buffer capacity must be a power of two"
            )
        };

        line.configure(config);

        rx.start_circular();
        let rx_cursor = RxCursor::new(rx.remaining());

        tx.prime();
        line.enable();

        #[cfg(feature = "log")]
        log::debug!("usart line up: {} baud, 8N1", config.baud_rate);

        Self {
            rx,
            tx,
            waiter,
            rx_cursor,
            tx_head: 0,
            tx_tail: 0,
            tx_count: 0,
            tx_armed: 0,
            stats: UsartStats::default(),
        }
    }

    /// Whether unread bytes exist in the receive buffer.
    ///
    /// Compares the engine's *live* remaining-count against the last-known
    /// cursor, not a cached snapshot, so no interrupt masking is required:
    /// the engine advances independently of software and its counter is
    /// read-only from this side.
    pub fn available(&self) -> bool {
        self.rx_cursor.has_pending(self.rx.remaining())
    }

    /// The engine's live remaining-count, verbatim.
    ///
    /// A proxy for how far the engine's write cursor has progressed, not a
    /// byte count; callers needing the exact unread count should use
    /// [`rx_backlog`](UsartTransport::rx_backlog).
    pub fn num_available(&self) -> u32 {
        self.rx.remaining()
    }

    /// Exact number of unread bytes, `(cursor - live) mod N`.
    pub fn rx_backlog(&self) -> u32 {
        self.rx_cursor.backlog(self.rx.remaining())
    }

    /// Consume one byte from the receive buffer.
    ///
    /// Fails with [`Error::RxEmpty`] when nothing is available: the
    /// hardware would hand back whatever stale byte occupies the slot, and
    /// the driver refuses to. Otherwise reads the byte at the cursor's
    /// logical index, advances the cursor (wrapping `0 -> N` exactly as
    /// the engine's counter does), and bumps the receive counters.
    pub fn read_byte(&mut self) -> Result<u8, Error> {
        let live = self.rx.remaining();
        if !self.rx_cursor.has_pending(live) {
            return Err(Error::RxEmpty);
        }

        let backlog = self.rx_cursor.backlog(live);
        if backlog > self.stats.max_rx_fifo {
            self.stats.max_rx_fifo = backlog;
        }

        let byte = self.rx.read(self.rx_cursor.index());
        self.rx_cursor.advance();
        self.stats.rx_bytes += 1;
        Ok(byte)
    }

    /// Blocking read of one byte with a deadline.
    ///
    /// Loops until a byte arrives or `timeout_msec` quanta elapse,
    /// suspending through the waiter between polls. The elapsed check runs
    /// *before* the availability check on every iteration, which bounds
    /// the overshoot to one quantum even under heavy interrupt load; and
    /// because [`SysClock::has_elapsed_since`] rearms only on expiry, the
    /// window is never restarted spuriously.
    ///
    /// Returns [`Error::Timeout`] when the deadline passes with no data.
    /// Never blocks forever. `timeout_msec` must be at least 1: the
    /// deadline check precedes the availability check, so a zero timeout
    /// expires immediately even with data pending.
    pub fn read_wait(&mut self, clock: &SysClock, timeout_msec: u32) -> Result<u8, Error> {
        let mut start = clock.now();
        loop {
            if clock.has_elapsed_since(&mut start, timeout_msec) {
                #[cfg(feature = "log")]
                log::trace!("read_wait: no data within {} ms", timeout_msec);
                return Err(Error::Timeout);
            }
            if self.available() {
                return self.read_byte();
            }
            self.waiter.wait();
        }
    }

    /// Queue one byte for transmission without blocking.
    ///
    /// Returns `nb::Error::WouldBlock` while the buffer is fully occupied
    /// (`tx_count + tx_armed == N`; bytes the engine is still draining
    /// count, since their slots cannot be reused until the burst
    /// completes). Otherwise stores the byte at `tx_head` and
    /// advances the queue inside a critical section (the completion
    /// handler mutates the same fields), then arms a transfer if `is_last`
    /// is set and no burst is currently armed.
    ///
    /// The `is_last` flag lets a multi-byte caller defer arming until the
    /// final byte of a logical message, cutting transfer-start overhead;
    /// [`write_buf`](UsartTransport::write_buf) and
    /// [`print_str`](UsartTransport::print_str) set it only on their final
    /// byte.
    pub fn try_write_byte(&mut self, byte: u8, is_last: bool) -> nb::Result<(), Infallible> {
        let full = critical_section::with(|_cs| self.tx_count + self.tx_armed == N);
        if full {
            return Err(nb::Error::WouldBlock);
        }

        critical_section::with(|_cs| {
            self.tx.write(self.tx_head, byte);
            self.tx_head = (self.tx_head + 1) & (N - 1);
            self.tx_count += 1;
            self.stats.tx_bytes += 1;
        });

        if is_last && !self.tx.is_armed() {
            critical_section::with(|_cs| self.arm_tx());
        }

        Ok(())
    }

    /// Queue one byte for transmission, blocking while the queue is full.
    ///
    /// Suspends through the waiter until the background drain frees space.
    /// There is no deadline and no `BufferFull` report: if the drain
    /// stalls, this blocks indefinitely (callers needing back-pressure
    /// build it on
    /// [`try_write_byte`](UsartTransport::try_write_byte)).
    pub fn write_byte(&mut self, byte: u8, is_last: bool) {
        loop {
            match self.try_write_byte(byte, is_last) {
                Ok(()) => return,
                Err(nb::Error::WouldBlock) => self.waiter.wait(),
            }
        }
    }

    /// Queue a byte slice, arming the engine only at the final byte.
    pub fn write_buf(&mut self, bytes: &[u8]) {
        let last = bytes.len().wrapping_sub(1);
        for (i, &byte) in bytes.iter().enumerate() {
            self.write_byte(byte, i == last);
        }
    }

    /// Queue a string, arming the engine only at the final byte.
    pub fn print_str(&mut self, s: &str) {
        self.write_buf(s.as_bytes());
    }

    /// Render formatted output into a bounded scratch buffer and queue it.
    ///
    /// The scratch buffer holds [`FMT_SCRATCH_LEN`] bytes; output that
    /// does not fit fails with [`Error::FormatOverflow`] and nothing is
    /// transmitted. Named `write_fmt` so `core::write!` works directly on
    /// the transport:
    ///
    /// ```rust,ignore
    /// write!(uart, "servo {} -> {}\r\n", channel, value)?;
    /// ```
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Error> {
        let mut scratch: heapless::String<FMT_SCRATCH_LEN> = heapless::String::new();
        fmt::write(&mut scratch, args).map_err(|_| Error::FormatOverflow)?;
        self.print_str(&scratch);
        Ok(())
    }

    /// Whether the transmit engine is idle (no burst in flight).
    pub fn tx_empty(&self) -> bool {
        self.tx.remaining() == 0
    }

    /// Drop all queued state on both directions.
    ///
    /// Resets the transmit queue pointers and resynchronizes the receive
    /// cursor to the engine's current counter, discarding any backlog, in
    /// one critical section so the snapshot is consistent with respect to
    /// the completion handler. Statistics are cleared. Hardware
    /// configuration is untouched; a burst already in flight completes on
    /// the wire.
    pub fn flush(&mut self) {
        critical_section::with(|_cs| {
            self.tx_head = 0;
            self.tx_tail = 0;
            self.tx_count = 0;
            self.tx_armed = 0;
            self.rx_cursor.resync(self.rx.remaining());
            self.stats = UsartStats::default();
        });

        #[cfg(feature = "log")]
        log::debug!("flushed queues and stats");
    }

    /// Transfer-completion interrupt entry point.
    ///
    /// Call from the transmit engine's completion ISR: acknowledges the
    /// completion signal, disables the channel, retires the completed
    /// burst from the occupancy (its slots become reusable here, not at
    /// arm time), and arms the next burst if bytes are still queued (the
    /// wrap remainder, or bytes written while the burst was in flight).
    /// This handler is the sole mechanism by which wrapped multi-burst
    /// transmissions progress without foreground involvement.
    ///
    /// The re-arm condition is `tx_count != 0` rather than
    /// `tx_head != tx_tail`: a completely full queue has head == tail and
    /// must still drain.
    pub fn handle_tx_complete(&mut self) {
        self.tx.ack();
        self.tx.stop();
        self.tx_armed = 0;
        if self.tx_count != 0 {
            self.arm_tx();
        }
    }

    /// View of the running counters. Not atomic across fields.
    pub fn stats(&self) -> &UsartStats {
        &self.stats
    }

    /// Hand the engine the largest contiguous run starting at `tx_tail`.
    ///
    /// `[tx_tail, tx_head)` when the data does not wrap, otherwise
    /// `[tx_tail, N)`; the remainder past the wrap is picked up by the
    /// follow-on arm out of the completion handler. Advances `tx_tail` to
    /// the run's end (masked, so N wraps to 0) and moves the run from
    /// `tx_count` into `tx_armed`, maintaining
    /// `head - tail ≡ count (mod N)` and leaving the total occupancy
    /// `tx_count + tx_armed` unchanged: the armed region stays reserved
    /// until the engine is done with it.
    ///
    /// Callers hold the critical section (or run in the completion ISR),
    /// and the engine is idle.
    fn arm_tx(&mut self) {
        let burst = if self.tx_head > self.tx_tail {
            self.tx_head - self.tx_tail
        } else {
            N - self.tx_tail
        };

        self.tx.arm(self.tx_tail, burst as u32);
        self.tx_tail = (self.tx_tail + burst) & (N - 1);
        self.tx_count -= burst;
        self.tx_armed = burst;

        if burst as u32 > self.stats.max_tx_fifo {
            self.stats.max_tx_fifo = burst as u32;
        }
    }
}

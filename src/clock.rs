//! Monotonic millisecond tick clock.
//!
//! [`SysClock`] is the timing primitive the transport's timeout logic is
//! built on: a free-running 32-bit tick counter advanced once per 1 ms
//! quantum by the highest-priority periodic interrupt, plus a countdown
//! register for bounded blocking delays.
//!
//! The clock is an explicit state object rather than a hidden static. Both
//! counters live behind `critical_section::Mutex<Cell<u32>>`, so a single
//! `&SysClock` can be shared freely between the tick interrupt (the only
//! writer of `ticks`) and any number of foreground readers:
//!
//! ```rust,ignore
//! static CLOCK: SysClock = SysClock::new();
//!
//! #[exception]
//! fn SysTick() {
//!     CLOCK.tick(); // 1 ms exactly
//! }
//! ```
//!
//! For targets without a spare periodic interrupt, [`run_tick_loop`]
//! drives the clock from a blocking `DelayNs` provider instead.

use core::cell::Cell;
use core::fmt;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::consts::TICK_MSEC;
use crate::hal::WaitForInterrupt;

/// Process-wide monotonic clock state.
///
/// `ticks` wraps silently at 2³²; all elapsed-time math in
/// [`has_elapsed_since`](SysClock::has_elapsed_since) uses unsigned
/// wraparound arithmetic and stays correct across the rollover.
pub struct SysClock {
    /// Free-running tick counter, +1 per quantum, wraps silently.
    ticks: Mutex<Cell<u32>>,
    /// Countdown register, decremented toward zero by [`tick`](SysClock::tick).
    countdown: Mutex<Cell<u32>>,
}

impl SysClock {
    /// A clock with both counters at zero.
    ///
    /// `const` so the integrator can place the clock in a `static`.
    pub const fn new() -> Self {
        Self {
            ticks: Mutex::new(Cell::new(0)),
            countdown: Mutex::new(Cell::new(0)),
        }
    }

    /// Advance the clock by one quantum.
    ///
    /// Invoke exactly once per 1 ms from the highest-priority periodic
    /// interrupt. Increments `ticks` unconditionally (wrapping) and, if the
    /// countdown is non-zero, decrements it.
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let ticks = self.ticks.borrow(cs);
            ticks.set(ticks.get().wrapping_add(1));

            let countdown = self.countdown.borrow(cs);
            let left = countdown.get();
            if left != 0 {
                countdown.set(left - 1);
            }
        });
    }

    /// Current tick count.
    pub fn now(&self) -> u32 {
        critical_section::with(|cs| self.ticks.borrow(cs).get())
    }

    /// Load the countdown register with `msec` quanta.
    pub fn arm_countdown(&self, msec: u32) {
        critical_section::with(|cs| self.countdown.borrow(cs).set(msec));
    }

    /// Whether the countdown register has reached zero.
    pub fn countdown_expired(&self) -> bool {
        critical_section::with(|cs| self.countdown.borrow(cs).get() == 0)
    }

    /// Block for `msec` quanta.
    ///
    /// Arms the countdown, then repeatedly suspends through `waiter` until
    /// the tick interrupt has counted it down to zero. Cooperative:
    /// interrupts keep running throughout.
    pub fn block_for(&self, msec: u32, waiter: &mut impl WaitForInterrupt) {
        self.arm_countdown(msec);
        while !self.countdown_expired() {
            waiter.wait();
        }
    }

    /// Check-and-rearm elapsed test: has `msec` passed since `*checkpoint`?
    ///
    /// Computes `now() - *checkpoint` in wrapping arithmetic, so the result
    /// is correct even across a rollover of the tick counter. If the
    /// difference is `>= msec`, the checkpoint is reset to `now()` and the
    /// call returns `true`; otherwise the checkpoint is left untouched.
    ///
    /// The rearm-on-expiry semantics is deliberate: each positive detection
    /// restarts the window from the current instant, which makes this both
    /// a recurring periodic-poll primitive and the building block of
    /// [`read_wait`](crate::transport::UsartTransport::read_wait).
    pub fn has_elapsed_since(&self, checkpoint: &mut u32, msec: u32) -> bool {
        let now = self.now();
        if now.wrapping_sub(*checkpoint) >= msec {
            *checkpoint = now;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    fn set_ticks(&self, value: u32) {
        critical_section::with(|cs| self.ticks.borrow(cs).set(value));
    }
}

impl Default for SysClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SysClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        critical_section::with(|cs| {
            f.debug_struct("SysClock")
                .field("ticks", &self.ticks.borrow(cs).get())
                .field("countdown", &self.countdown.borrow(cs).get())
                .finish()
        })
    }
}

/// Drive the clock from a blocking delay provider.
///
/// For integrations without a hardware tick interrupt: calls
/// [`SysClock::tick`] once per [`TICK_MSEC`] using `delay`, forever. Timing
/// accuracy is whatever the delay provider offers; a hardware interrupt is
/// preferred wherever one is available.
pub fn run_tick_loop<D: DelayNs>(clock: &SysClock, delay: &mut D) -> ! {
    loop {
        clock.tick();
        delay.delay_ms(TICK_MSEC);
    }
}

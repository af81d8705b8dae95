//! Remaining-count to read-position adapter for the receive path.
//!
//! The receive transfer engine exposes no write pointer, only a
//! *remaining-count* register that counts down from N to 1 as it fills its
//! circular buffer from index 0 upward, re-arming at N on a full wrap.
//! [`RxCursor`] turns that countdown into a logical read position so the
//! wraparound behavior is contained in one type and independently
//! testable, instead of being inlined arithmetic scattered through the
//! transport.
//!
//! The cursor is mutated only by the foreground context; the engine's live
//! counter is read-only from software. Comparing the two therefore needs
//! no interrupt masking.

/// Software read cursor over an N-byte engine-filled circular buffer.
///
/// Invariants:
/// - the stored remaining-count is always in `[1, N]` (never 0; a full
///   wrap re-arms at N, mirroring the engine's own counter);
/// - the logical read index is `N - remaining`;
/// - `N` is a power of two, checked by the owning transport, so backlog
///   arithmetic can mask instead of taking a modulo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxCursor<const N: usize> {
    /// Last-known remaining-count, trailing the engine's live register by
    /// exactly the number of unread bytes (mod N).
    remaining: u32,
}

impl<const N: usize> RxCursor<N> {
    /// Cursor synchronized to the remaining-count `initial`.
    ///
    /// Captured from the engine right after starting circular mode, when
    /// the counter reads the full capacity N.
    pub fn new(initial: u32) -> Self {
        debug_assert!(initial >= 1 && initial <= N as u32);
        Self { remaining: initial }
    }

    /// The last-known remaining-count, in `[1, N]`.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Logical index of the next unread byte, in `[0, N)`.
    pub fn index(&self) -> usize {
        N - self.remaining as usize
    }

    /// Consume one byte: decrement the remaining-count, wrapping `0 -> N`
    /// exactly as the engine's own counter does.
    pub fn advance(&mut self) {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = N as u32;
        }
    }

    /// Whether the engine has written bytes the cursor has not consumed.
    ///
    /// True iff `live` (the engine's current counter) differs from the
    /// last-known count.
    pub fn has_pending(&self, live: u32) -> bool {
        live != self.remaining
    }

    /// Exact number of unread bytes given the engine's current counter.
    ///
    /// `(remaining - live) mod N`. A backlog of exactly N (the engine
    /// lapped the cursor completely, overwriting unread data) is
    /// indistinguishable from 0; consumers are expected to drain well
    /// before that point.
    pub fn backlog(&self, live: u32) -> u32 {
        self.remaining.wrapping_sub(live) & (N as u32 - 1)
    }

    /// Discard any backlog by snapping the cursor to the engine's current
    /// counter. Used by flush.
    pub fn resync(&mut self, live: u32) {
        debug_assert!(live >= 1 && live <= N as u32);
        self.remaining = live;
    }
}

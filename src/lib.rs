//! # usart-dma
//!
//! A portable, no_std driver layer for an interrupt/DMA-driven serial
//! transport: fixed-capacity circular buffers fed and drained by background
//! transfer engines, a monotonic millisecond tick clock, and a tiny
//! servo-PWM command console layered on top.
//!
//! The transport models the classic firmware arrangement where a receive
//! DMA channel fills a wrap-around buffer continuously (circular mode) and
//! a transmit DMA channel drains a software ring in contiguous bursts,
//! re-armed from its completion interrupt. Foreground code, the tick
//! interrupt, and the completion interrupt share buffer state; every
//! read-modify-write of that state happens inside a
//! [`critical_section`](https://docs.rs/critical-section) span.
//!
//! ## Crate features
//! | Feature | Description |
//! |---------|-------------|
//! | `std`   | Disables `#![no_std]` and pulls in the `critical-section` std implementation (host testing) |
//! | `log`   | Sparse `log` tracing on init, flush, and timeout paths |
//!
//! ## Layout
//!
//! - [`clock`]: [`SysClock`](clock::SysClock), the 1 ms tick clock with a
//!   wrap-safe elapsed-time primitive and a blocking countdown
//! - [`cursor`]: [`RxCursor`](cursor::RxCursor), the adapter from the
//!   receive engine's remaining-count register to a logical read position
//! - [`transport`]: [`UsartTransport`](transport::UsartTransport), the
//!   per-device facade: init, byte/buffer read and write, availability,
//!   timeout-bounded reads, flush, statistics
//! - [`hal`]: the hardware seams [`RxEngine`](hal::RxEngine),
//!   [`TxEngine`](hal::TxEngine), [`SerialLine`](hal::SerialLine), and
//!   [`WaitForInterrupt`](hal::WaitForInterrupt)
//! - [`registry`]: an explicit, index-addressed table of transports
//! - [`console`]: the `s<channel><4 digits>` servo command interpreter
//!
//! ## Usage
//!
//! ```rust,ignore
//! use usart_dma::clock::SysClock;
//! use usart_dma::hal::LineConfig;
//! use usart_dma::transport::UsartTransport;
//!
//! static CLOCK: SysClock = SysClock::new();
//!
//! // SysTick interrupt, 1 ms period:
//! //   CLOCK.tick();
//! // DMA TX completion interrupt:
//! //   uart.handle_tx_complete();
//!
//! let mut uart: UsartTransport<_, _, _, 1024> =
//!     UsartTransport::new(rx_engine, tx_engine, waiter, &mut line, &LineConfig::default());
//! uart.print_str("ready\r\n");
//! let byte = uart.read_wait(&CLOCK, 10)?;
//! ```
//!
//! ## Integration notes
//!
//! - The crate holds no statics. The clock is `const`-constructible so the
//!   integrator can place it in a `static`; transports live in an owned
//!   [`Registry`](registry::Registry) (or a
//!   `critical_section::Mutex<RefCell<...>>` when an ISR needs access).
//! - Buffer capacity `N` is a const generic and must be a power of two, so
//!   index arithmetic is a bitmask rather than a modulo.
//! - Liveness of every blocking operation depends on interrupts still
//!   firing; see [`hal::WaitForInterrupt`] for the suspension contract.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use critical_section;
pub use heapless;

pub mod clock;
pub mod console;
pub mod consts;
pub mod cursor;
pub mod error;
pub mod hal;
pub mod registry;
pub mod transport;

#[cfg(test)]
mod testutil;

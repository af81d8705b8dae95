//! Explicit, index-addressed table of transport instances.
//!
//! Firmware of this shape traditionally keeps its device table in a
//! file-scope static array indexed by a device-number enum. [`Registry`]
//! replaces that with an owned value: constructed once at startup from the
//! already-initialized transports, passed by reference to every operation,
//! no hidden process-wide mutable state. Integrators whose interrupt
//! handlers need a transport wrap the registry (or the single transport
//! the ISR touches) in a `critical_section::Mutex<RefCell<...>>` at the
//! binary level; the library itself holds no statics.

use crate::hal::{RxEngine, TxEngine, WaitForInterrupt};
use crate::transport::UsartTransport;

/// Logical device number, an index into a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dev(
    /// Zero-based device index.
    pub usize,
);

/// Owned, fixed-count table of transports, index-addressed by [`Dev`].
#[derive(Debug)]
pub struct Registry<RXE, TXE, W, const N: usize, const COUNT: usize>
where
    RXE: RxEngine,
    TXE: TxEngine,
    W: WaitForInterrupt,
{
    devices: [UsartTransport<RXE, TXE, W, N>; COUNT],
}

impl<RXE, TXE, W, const N: usize, const COUNT: usize> Registry<RXE, TXE, W, N, COUNT>
where
    RXE: RxEngine,
    TXE: TxEngine,
    W: WaitForInterrupt,
{
    /// Build the table from transports initialized at startup.
    pub fn new(devices: [UsartTransport<RXE, TXE, W, N>; COUNT]) -> Self {
        Self { devices }
    }

    /// Shared access to a device, `None` if the index is out of range.
    pub fn get(&self, dev: Dev) -> Option<&UsartTransport<RXE, TXE, W, N>> {
        self.devices.get(dev.0)
    }

    /// Exclusive access to a device, `None` if the index is out of range.
    pub fn get_mut(&mut self, dev: Dev) -> Option<&mut UsartTransport<RXE, TXE, W, N>> {
        self.devices.get_mut(dev.0)
    }

    /// Number of devices in the table.
    pub fn len(&self) -> usize {
        COUNT
    }

    /// Whether the table holds no devices.
    pub fn is_empty(&self) -> bool {
        COUNT == 0
    }
}

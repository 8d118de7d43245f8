/*++

Licensed under the Apache-2.0 license.

File Name:

    mcycle.rs

Abstract:

    Poll source reading the RISC-V mcycle CSR pair.

    The cycle counter is free running, so a tick source built on it is
    polled and never advanced by software.

--*/

use swtimer::{TickSource, TickSourceConfig, TickSourceResult};
use swtimer_hil::PollTicks;

/// Default CPU clock frequency in Hz; 1 tick = 1 µs.
pub const DEFAULT_CPU_CLOCK_HZ: u64 = 1_000_000;

/// The combined mcycle/mcycleh counter is 64 bits wide.
pub const MCYCLE_WIDTH_BITS: u8 = 64;

/// Poll source over the RISC-V `mcycle` / `mcycleh` CSRs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McycleTicks {
    clock_freq: u64,
}

impl McycleTicks {
    /// Create a poll source with the default clock frequency.
    pub const fn new() -> Self {
        Self {
            clock_freq: DEFAULT_CPU_CLOCK_HZ,
        }
    }

    /// Create a poll source with a specific clock frequency.
    pub const fn with_freq(clock_freq_hz: u64) -> Self {
        Self {
            clock_freq: clock_freq_hz,
        }
    }

    pub const fn clock_freq_hz(&self) -> u64 {
        self.clock_freq
    }

    /// Configure a polled 64-bit tick source reading this counter.
    ///
    /// Fails if the clock frequency is zero or above 1 GHz.
    pub fn tick_source(&self) -> TickSourceResult<TickSource<'_>> {
        let config = TickSourceConfig::with_freq_hz(self.clock_freq, MCYCLE_WIDTH_BITS)?;
        TickSource::configure(config, Some(self))
    }
}

impl Default for McycleTicks {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the current cycle count using the RISC-V mcycle CSRs.
///
/// The high half is read on both sides of the low half so a carry between
/// the two reads cannot produce a torn value.
#[cfg(target_arch = "riscv32")]
fn mcycle() -> u64 {
    use riscv_csr::csr::{ReadWriteRiscvCsr, MCYCLE, MCYCLEH};
    use tock_registers::interfaces::Readable;
    use tock_registers::register_bitfields;
    register_bitfields![usize,
        value [
            value OFFSET(0) NUMBITS(32) [],
        ],
    ];
    let mcycle: ReadWriteRiscvCsr<usize, value::Register, { MCYCLE }> =
        ReadWriteRiscvCsr::new();
    let mcycleh: ReadWriteRiscvCsr<usize, value::Register, { MCYCLEH }> =
        ReadWriteRiscvCsr::new();
    loop {
        let hi = mcycleh.get();
        let lo = mcycle.get();
        if mcycleh.get() == hi {
            return (hi as u64) << 32 | (lo as u64);
        }
    }
}

/// Placeholder for non-RISC-V targets. The counter never advances, so a
/// tracking timer on top of it reports starvation.
#[cfg(not(target_arch = "riscv32"))]
fn mcycle() -> u64 {
    0
}

impl PollTicks for McycleTicks {
    fn poll(&self) -> u64 {
        mcycle()
    }
}

// Licensed under the Apache-2.0 license

use crate::error::{TickSourceError, TickSourceResult};

/// Minimum bits in a timer.
pub const TIMER_BITS_MIN: u8 = 2;
/// Maximum bits in a timer.
pub const TIMER_BITS_MAX: u8 = 64;

/// Nanoseconds in one microsecond.
pub const NS_PER_US: u64 = 1_000;
/// Nanoseconds in one millisecond.
pub const NS_PER_MS: u64 = 1_000_000;
/// Nanoseconds in one second.
pub const NS_PER_SECOND: u64 = 1_000_000_000;

/// Returns the mask selecting the low `bits` bits of a counter.
///
/// A 64-bit width yields `u64::MAX`.
pub const fn width_mask(bits: u8) -> TickSourceResult<u64> {
    if bits < TIMER_BITS_MIN || bits > TIMER_BITS_MAX {
        return Err(TickSourceError::InvalidWidth(bits));
    }
    Ok(u64::MAX >> (64 - bits as u32))
}

/// Static configuration of a tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSourceConfig {
    /// Duration of one timer tick in nanoseconds.
    pub tick_duration_ns: u64,
    /// Timer width in bits from 2 to 64.
    pub width_bits: u8,
}

impl TickSourceConfig {
    pub const fn new(tick_duration_ns: u64, width_bits: u8) -> Self {
        Self {
            tick_duration_ns,
            width_bits,
        }
    }

    /// Derives the tick duration from a counter clock frequency.
    ///
    /// The duration is rounded down to whole nanoseconds, so clocks that do
    /// not divide 1 GHz evenly accumulate a small error.
    pub const fn with_freq_hz(clock_freq_hz: u64, width_bits: u8) -> TickSourceResult<Self> {
        if clock_freq_hz == 0 {
            return Err(TickSourceError::ZeroClockFrequency);
        }
        let tick_duration_ns = NS_PER_SECOND / clock_freq_hz;
        if tick_duration_ns == 0 {
            return Err(TickSourceError::ClockTooFast(clock_freq_hz));
        }
        Ok(Self::new(tick_duration_ns, width_bits))
    }

    /// Checks the configuration and returns the width mask.
    pub const fn validate(&self) -> TickSourceResult<u64> {
        if self.tick_duration_ns == 0 {
            return Err(TickSourceError::ZeroTickDuration);
        }
        width_mask(self.width_bits)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_width_mask_all_widths() {
        for bits in TIMER_BITS_MIN..=TIMER_BITS_MAX {
            let mask = width_mask(bits).unwrap();
            assert_eq!(mask.count_ones(), bits as u32);
            assert_eq!(mask.trailing_ones(), bits as u32);
            assert_eq!(mask as u128, (1u128 << bits) - 1);
        }
    }

    #[test]
    fn test_width_mask_edges() {
        assert_eq!(width_mask(2), Ok(0b11));
        assert_eq!(width_mask(8), Ok(0xff));
        assert_eq!(width_mask(32), Ok(0xffff_ffff));
        assert_eq!(width_mask(64), Ok(u64::MAX));
    }

    #[test]
    fn test_width_mask_out_of_range() {
        for bits in [0u8, 1, 65, 128, u8::MAX] {
            assert_eq!(width_mask(bits), Err(TickSourceError::InvalidWidth(bits)));
        }
    }

    #[test]
    fn test_validate() {
        assert_eq!(TickSourceConfig::new(1000, 8).validate(), Ok(0xff));
        assert_eq!(
            TickSourceConfig::new(0, 8).validate(),
            Err(TickSourceError::ZeroTickDuration)
        );
        assert_eq!(
            TickSourceConfig::new(1000, 1).validate(),
            Err(TickSourceError::InvalidWidth(1))
        );
    }

    #[test]
    fn test_with_freq_hz() {
        let config = TickSourceConfig::with_freq_hz(1_000_000, 32).unwrap();
        assert_eq!(config.tick_duration_ns, 1000);
        assert_eq!(config.width_bits, 32);

        // 3 MHz rounds 333.33 ns down.
        let config = TickSourceConfig::with_freq_hz(3_000_000, 64).unwrap();
        assert_eq!(config.tick_duration_ns, 333);

        assert_eq!(
            TickSourceConfig::with_freq_hz(0, 32),
            Err(TickSourceError::ZeroClockFrequency)
        );
        assert_eq!(
            TickSourceConfig::with_freq_hz(2_000_000_000, 32),
            Err(TickSourceError::ClockTooFast(2_000_000_000))
        );
    }
}

// Licensed under the Apache-2.0 license

use crate::config::{NS_PER_MS, NS_PER_SECOND, NS_PER_US};

/// Resolution of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    /// Timer ticks (raw counter).
    #[default]
    Ticks,
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
}

impl Resolution {
    /// Nanoseconds in one unit of this resolution, `None` for raw ticks.
    pub const fn ns_per_unit(self) -> Option<u64> {
        match self {
            Resolution::Ticks => None,
            Resolution::Nanoseconds => Some(1),
            Resolution::Microseconds => Some(NS_PER_US),
            Resolution::Milliseconds => Some(NS_PER_MS),
            Resolution::Seconds => Some(NS_PER_SECOND),
        }
    }
}

/// Get elapsed ticks from `start` to `current` on a counter wrapping at
/// `width_mask`.
///
/// At most one wraparound is assumed. A measurement spanning more than one
/// full counter period undercounts by a multiple of the period.
pub const fn elapsed_ticks(width_mask: u64, start: u64, current: u64) -> u64 {
    if start <= current {
        current - start
    } else {
        width_mask
            .wrapping_sub(start)
            .wrapping_add(current)
            .wrapping_add(1)
    }
}

/// Convert a tick count to time in the given resolution.
///
/// The product is formed in 128 bits and truncated toward zero by the
/// division. Results that do not fit in 64 bits saturate.
pub fn ticks_to_resolution(tick_duration_ns: u64, ticks: u64, resolution: Resolution) -> u64 {
    let Some(ns_per_unit) = resolution.ns_per_unit() else {
        return ticks;
    };
    let time = (ticks as u128 * tick_duration_ns as u128) / ns_per_unit as u128;
    u64::try_from(time).unwrap_or(u64::MAX)
}

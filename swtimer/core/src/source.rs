/*++

Licensed under the Apache-2.0 license.

File Name:

    source.rs

Abstract:

    Tick source shared by software timers.

    A tick source is either an internal counter advanced by `advance()`
    (typically from a periodic interrupt handler) or a free-running hardware
    counter read through a `PollTicks` implementation.

--*/

use core::fmt;
use core::sync::atomic::Ordering;

use log::debug;
use portable_atomic::AtomicU64;
use swtimer_hil::PollTicks;

use crate::config::TickSourceConfig;
use crate::error::{TickSourceError, TickSourceResult};

enum Counter<'a> {
    /// Emulated counter, advanced by `TickSource::advance`.
    Internal(AtomicU64),
    /// External hardware counter.
    Polled(&'a (dyn PollTicks + Sync)),
}

/// A wrapping, fixed-width tick counter shared by any number of timers.
///
/// Timers borrow the source, so a source in tick-advance mode is usually a
/// `static` that the interrupt handler advances while timers read it.
pub struct TickSource<'a> {
    counter: Counter<'a>,
    tick_duration_ns: u64,
    width_mask: u64,
}

impl<'a> TickSource<'a> {
    /// Create a tick source backed by an internal counter starting at 0.
    pub const fn new(tick_duration_ns: u64, width_bits: u8) -> TickSourceResult<Self> {
        let width_mask = match TickSourceConfig::new(tick_duration_ns, width_bits).validate() {
            Ok(mask) => mask,
            Err(err) => return Err(err),
        };
        Ok(Self {
            counter: Counter::Internal(AtomicU64::new(0)),
            tick_duration_ns,
            width_mask,
        })
    }

    /// Create a tick source that reads a free-running hardware counter.
    pub const fn polled(
        tick_duration_ns: u64,
        width_bits: u8,
        poll: &'a (dyn PollTicks + Sync),
    ) -> TickSourceResult<Self> {
        let width_mask = match TickSourceConfig::new(tick_duration_ns, width_bits).validate() {
            Ok(mask) => mask,
            Err(err) => return Err(err),
        };
        Ok(Self {
            counter: Counter::Polled(poll),
            tick_duration_ns,
            width_mask,
        })
    }

    /// Create a tick source from a configuration, polling `poll` if given.
    pub fn configure(
        config: TickSourceConfig,
        poll: Option<&'a (dyn PollTicks + Sync)>,
    ) -> TickSourceResult<Self> {
        let source = match poll {
            Some(poll) => Self::polled(config.tick_duration_ns, config.width_bits, poll)?,
            None => Self::new(config.tick_duration_ns, config.width_bits)?,
        };
        debug!(
            "swtimer: tick source configured: {} ns/tick, mask {:#x}, {}",
            source.tick_duration_ns,
            source.width_mask,
            if source.is_polled() { "polled" } else { "internal counter" }
        );
        Ok(source)
    }

    /// Advance the internal counter by `ticks`, wrapping at the timer width.
    ///
    /// Polled sources ignore the call.
    pub fn advance(&self, ticks: u64) -> TickSourceResult<()> {
        if ticks == 0 {
            return Err(TickSourceError::ZeroAdvance);
        }
        match &self.counter {
            Counter::Internal(counter) => {
                let mask = self.width_mask;
                // The closure never rejects, so the update always lands.
                let _ = counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                    Some(count.wrapping_add(ticks) & mask)
                });
            }
            Counter::Polled(_) => debug!("swtimer: advance ignored on polled tick source"),
        }
        Ok(())
    }

    /// Read the current tick value, masked to the timer width.
    pub fn read(&self) -> u64 {
        match &self.counter {
            Counter::Internal(counter) => counter.load(Ordering::Acquire),
            Counter::Polled(poll) => poll.poll() & self.width_mask,
        }
    }

    /// Duration of one tick in nanoseconds.
    pub fn tick_duration_ns(&self) -> u64 {
        self.tick_duration_ns
    }

    pub fn width_mask(&self) -> u64 {
        self.width_mask
    }

    pub fn is_polled(&self) -> bool {
        matches!(self.counter, Counter::Polled(_))
    }
}

impl fmt::Debug for TickSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TickSource");
        match &self.counter {
            Counter::Internal(counter) => s.field("counter", &counter.load(Ordering::Relaxed)),
            Counter::Polled(_) => s.field("counter", &"<polled>"),
        };
        s.field("tick_duration_ns", &self.tick_duration_ns)
            .field("width_mask", &self.width_mask)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static ISR_SOURCE: TickSource<'static> = match TickSource::new(1_000, 16) {
        Ok(source) => source,
        Err(_) => panic!("invalid tick source"),
    };

    #[test]
    fn test_internal_counter_starts_at_zero() {
        let source = TickSource::new(100, 8).unwrap();
        assert_eq!(source.read(), 0);
        assert_eq!(source.tick_duration_ns(), 100);
        assert_eq!(source.width_mask(), 0xff);
        assert!(!source.is_polled());
    }

    #[test]
    fn test_advance_wraps_at_width() {
        let source = TickSource::new(1_000, 8).unwrap();
        source.advance(250).unwrap();
        assert_eq!(source.read(), 250);
        source.advance(8).unwrap();
        assert_eq!(source.read(), 2);
        source.advance(256).unwrap();
        assert_eq!(source.read(), 2);
    }

    #[test]
    fn test_advance_wraps_at_64_bits() {
        let source = TickSource::new(1, 64).unwrap();
        source.advance(u64::MAX).unwrap();
        assert_eq!(source.read(), u64::MAX);
        source.advance(2).unwrap();
        assert_eq!(source.read(), 1);
    }

    #[test]
    fn test_advance_zero_rejected() {
        let source = TickSource::new(1_000, 32).unwrap();
        source.advance(5).unwrap();
        assert_eq!(source.advance(0), Err(TickSourceError::ZeroAdvance));
        assert_eq!(source.read(), 5);
    }

    #[test]
    fn test_invalid_configuration() {
        assert_eq!(
            TickSource::new(0, 32).unwrap_err(),
            TickSourceError::ZeroTickDuration
        );
        assert_eq!(
            TickSource::new(10, 65).unwrap_err(),
            TickSourceError::InvalidWidth(65)
        );
        let poll = || 0u64;
        assert_eq!(
            TickSource::polled(10, 1, &poll).unwrap_err(),
            TickSourceError::InvalidWidth(1)
        );
    }

    #[test]
    fn test_polled_read_is_masked() {
        let poll = || 0x1_2345u64;
        let source = TickSource::polled(10, 16, &poll).unwrap();
        assert!(source.is_polled());
        assert_eq!(source.read(), 0x2345);
    }

    #[test]
    fn test_polled_ignores_advance() {
        let poll = || 42u64;
        let source = TickSource::polled(10, 32, &poll).unwrap();
        assert_eq!(source.advance(10), Ok(()));
        assert_eq!(source.read(), 42);
        assert_eq!(source.advance(0), Err(TickSourceError::ZeroAdvance));
    }

    #[test]
    fn test_configure() {
        let source = TickSource::configure(TickSourceConfig::new(500, 12), None).unwrap();
        assert!(!source.is_polled());
        assert_eq!(source.width_mask(), 0xfff);

        let poll = || 0xffffu64;
        let source = TickSource::configure(TickSourceConfig::new(500, 12), Some(&poll)).unwrap();
        assert!(source.is_polled());
        assert_eq!(source.read(), 0xfff);
    }

    #[test]
    fn test_static_source() {
        let before = ISR_SOURCE.read();
        ISR_SOURCE.advance(3).unwrap();
        assert_eq!(ISR_SOURCE.read(), (before + 3) & 0xffff);
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    timer.rs

Abstract:

    Elapsed-time software timer bound to a shared tick source.

--*/

use core::time::Duration;

use log::{debug, trace, warn};

use crate::error::{TimerError, TimerResult};
use crate::resolution::{elapsed_ticks, ticks_to_resolution, Resolution};
use crate::source::TickSource;
use crate::starvation::StarvationPolicy;
use crate::DefaultStarvation;

/// Lifecycle of an elapsed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Bound to a source but never started.
    Unstarted,
    Running,
    /// The source stopped advancing. Sticky until the next `start()`.
    Starving { tick: u64, invocations: u64 },
}

/// A software timer measuring time elapsed since its last start.
///
/// The timer borrows its tick source and reads it on every query, so it sees
/// `advance()` calls made through other references to the same source. Tick
/// duration and width mask are copied at bind time.
///
/// A measurement longer than one full counter period silently undercounts;
/// the wraparound correction assumes at most one wrap between `start()` and
/// a query.
#[derive(Debug)]
pub struct ElapsedTimer<'a, S: StarvationPolicy = DefaultStarvation> {
    source: &'a TickSource<'a>,
    start_tick: u64,
    tick_duration_ns: u64,
    width_mask: u64,
    state: TimerState,
    starvation: S,
}

impl<'a, S: StarvationPolicy> ElapsedTimer<'a, S> {
    /// Bind a timer to `source`.
    ///
    /// `invocation_limit` is the number of consecutive queries observing an
    /// unchanged tick that marks the source as stalled. 0 disables the check.
    /// The limit is ignored when `S` does not track starvation.
    pub fn bind(source: &'a TickSource<'a>, invocation_limit: u64) -> Self {
        let starvation = S::with_limit(invocation_limit);
        debug!(
            "swtimer: timer bound: {} ns/tick, mask {:#x}, invocation limit {}",
            source.tick_duration_ns(),
            source.width_mask(),
            starvation.invocation_limit()
        );
        Self {
            source,
            start_tick: 0,
            tick_duration_ns: source.tick_duration_ns(),
            width_mask: source.width_mask(),
            state: TimerState::Unstarted,
            starvation,
        }
    }

    /// Start, or restart, the measurement.
    pub fn start(&mut self) {
        self.start_tick = self.source.read();
        self.starvation.reset(self.start_tick);
        self.state = TimerState::Running;
        trace!("swtimer: timer started at tick {:#x}", self.start_tick);
    }

    /// Get the time elapsed since the last start in the given resolution.
    ///
    /// Reports `TimerError::Starved` once the source has returned the same
    /// tick for the configured number of queries, and keeps reporting it
    /// until the timer is restarted.
    pub fn elapsed(&mut self, resolution: Resolution) -> TimerResult<u64> {
        match self.state {
            TimerState::Unstarted => return Err(TimerError::NotStarted),
            TimerState::Starving { tick, invocations } => {
                return Err(TimerError::Starved { tick, invocations })
            }
            TimerState::Running => {}
        }

        let current = self.source.read();
        let ticks = elapsed_ticks(self.width_mask, self.start_tick, current);

        if self.starvation.observe(current) {
            let invocations = self.starvation.invocation_count();
            warn!(
                "swtimer: tick source stalled at tick {:#x} for {} queries",
                current, invocations
            );
            self.state = TimerState::Starving {
                tick: current,
                invocations,
            };
            return Err(TimerError::Starved {
                tick: current,
                invocations,
            });
        }

        Ok(ticks_to_resolution(self.tick_duration_ns, ticks, resolution))
    }

    /// Elapsed time as a `Duration`, saturating at `u64::MAX` nanoseconds.
    pub fn elapsed_duration(&mut self) -> TimerResult<Duration> {
        self.elapsed(Resolution::Nanoseconds)
            .map(Duration::from_nanos)
    }

    /// Checks whether at least `amount` units of `resolution` have elapsed.
    pub fn has_elapsed(&mut self, amount: u64, resolution: Resolution) -> TimerResult<bool> {
        Ok(self.elapsed(resolution)? >= amount)
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Tick value sampled by the last `start()`.
    pub fn start_tick(&self) -> u64 {
        self.start_tick
    }

    pub fn tick_duration_ns(&self) -> u64 {
        self.tick_duration_ns
    }

    pub fn width_mask(&self) -> u64 {
        self.width_mask
    }

    pub fn invocation_limit(&self) -> u64 {
        self.starvation.invocation_limit()
    }

    pub fn source(&self) -> &'a TickSource<'a> {
        self.source
    }
}

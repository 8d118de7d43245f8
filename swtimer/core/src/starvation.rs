/*++

Licensed under the Apache-2.0 license.

File Name:

    starvation.rs

Abstract:

    Starvation awareness for software timers.

    Starvation tracking detects a tick source that stops advancing while
    software keeps querying it. Each query that observes the same tick value
    as the previous one counts as one invocation; reaching the invocation
    limit marks the timer as starving.

--*/

/// Starvation policy of an elapsed timer.
///
/// The policy is a type parameter of `ElapsedTimer`, so disabling tracking
/// removes both the state and the check at compile time.
pub trait StarvationPolicy {
    /// Create the policy. `invocation_limit == 0` disables tracking.
    fn with_limit(invocation_limit: u64) -> Self;

    /// Reset tracking at timer start.
    fn reset(&mut self, start_tick: u64);

    /// Record one query that observed `tick`.
    ///
    /// Returns true if the timer is starving.
    fn observe(&mut self, tick: u64) -> bool;

    /// Consecutive queries that observed an unchanged tick value.
    fn invocation_count(&self) -> u64;

    fn invocation_limit(&self) -> u64;
}

/// Starvation tracking data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarvationTracking {
    invocation_limit: u64,
    invocation_count: u64,
    last_tick: u64,
}

impl StarvationTracking {
    pub fn is_enabled(&self) -> bool {
        self.invocation_limit != 0
    }

    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }
}

impl StarvationPolicy for StarvationTracking {
    fn with_limit(invocation_limit: u64) -> Self {
        Self {
            invocation_limit,
            ..Default::default()
        }
    }

    fn reset(&mut self, start_tick: u64) {
        self.last_tick = start_tick;
        self.invocation_count = 0;
    }

    fn observe(&mut self, tick: u64) -> bool {
        if !self.is_enabled() {
            return false;
        }

        // An advancing tick means the source is alive.
        if self.last_tick == tick {
            self.invocation_count = self.invocation_count.saturating_add(1);
        } else {
            self.invocation_count = 0;
        }
        self.last_tick = tick;

        self.invocation_count >= self.invocation_limit
    }

    fn invocation_count(&self) -> u64 {
        self.invocation_count
    }

    fn invocation_limit(&self) -> u64 {
        self.invocation_limit
    }
}

/// Tracking compiled out: no state, never starving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoStarvationTracking;

impl StarvationPolicy for NoStarvationTracking {
    fn with_limit(_invocation_limit: u64) -> Self {
        NoStarvationTracking
    }

    fn reset(&mut self, _start_tick: u64) {}

    fn observe(&mut self, _tick: u64) -> bool {
        false
    }

    fn invocation_count(&self) -> u64 {
        0
    }

    fn invocation_limit(&self) -> u64 {
        0
    }
}

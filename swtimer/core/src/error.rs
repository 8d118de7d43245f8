// Licensed under the Apache-2.0 license

use thiserror::Error;

pub type TickSourceResult<T> = Result<T, TickSourceError>;
pub type TimerResult<T> = Result<T, TimerError>;

/// Misuse of a tick source detected at configuration or call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TickSourceError {
    #[error("tick duration must be nonzero")]
    ZeroTickDuration,
    #[error("timer width of {0} bits is outside 2..=64")]
    InvalidWidth(u8),
    #[error("advance delta must be nonzero")]
    ZeroAdvance,
    #[error("clock frequency must be nonzero")]
    ZeroClockFrequency,
    #[error("clock frequency of {0} Hz is shorter than one nanosecond per tick")]
    ClockTooFast(u64),
}

/// Failures reported by an elapsed timer query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer queried before start")]
    NotStarted,
    /// The tick source returned the same value for `invocations` consecutive
    /// queries, reaching the configured invocation limit.
    #[error("tick source stalled at tick {tick} for {invocations} queries")]
    Starved { tick: u64, invocations: u64 },
}

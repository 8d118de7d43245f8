/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Software timers sharing one wrapping, fixed-width hardware tick counter.

    A `TickSource` wraps the counter, either emulated (advanced from an
    interrupt handler) or polled from hardware. Any number of `ElapsedTimer`s
    bind to one source and measure elapsed time with wraparound correction,
    optionally detecting a source that stopped advancing.

--*/

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod resolution;
pub mod source;
pub mod starvation;
pub mod timer;

pub use config::{width_mask, TickSourceConfig, TIMER_BITS_MAX, TIMER_BITS_MIN};
pub use error::{TickSourceError, TickSourceResult, TimerError, TimerResult};
pub use resolution::{elapsed_ticks, ticks_to_resolution, Resolution};
pub use source::TickSource;
pub use starvation::{NoStarvationTracking, StarvationPolicy, StarvationTracking};
pub use swtimer_hil::PollTicks;
pub use timer::{ElapsedTimer, TimerState};

/// Starvation policy selected by the `starvation-tracking` feature.
#[cfg(feature = "starvation-tracking")]
pub type DefaultStarvation = StarvationTracking;
#[cfg(not(feature = "starvation-tracking"))]
pub type DefaultStarvation = NoStarvationTracking;

/// Elapsed timer using the feature-selected starvation policy.
pub type SwTimer<'a> = ElapsedTimer<'a, DefaultStarvation>;

/*++

Licensed under the Apache-2.0 license.

File Name:

    poll.rs

Abstract:

    Hardware Interface Layer trait for free-running tick counters.
--*/

// Hardware Interface Layer trait for free-running tick counters
//
// A poll source is read by a tick source every time a software timer samples
// the time. Any context the read needs (register base, peripheral handle,
// a shared emulated counter) lives in the implementor.
pub trait PollTicks {
    // Read the current raw counter value
    //
    // The value may be wider than the configured timer width; the tick
    // source masks it before handing it to timers. Hardware side effects of
    // the read are the implementor's concern.
    //
    // # Returns
    // The current counter value.
    fn poll(&self) -> u64;
}

impl<F> PollTicks for F
where
    F: Fn() -> u64,
{
    fn poll(&self) -> u64 {
        self()
    }
}

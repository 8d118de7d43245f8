/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Hardware Interface Layer (HIL) for software timer tick sources.
--*/

#![no_std]

pub mod poll;

pub use poll::PollTicks;

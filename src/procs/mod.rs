//! Built-in process implementations.
//!
//! This module contains pre-built testbench processes that can be used
//! directly or as references for implementing custom processes.
//!
//! # Available Processes
//!
//! ## Stimulus Drivers
//! - [`ClockDriver`] - Free-running clock with configurable period
//! - [`PullUpDriver`] - Holds a signal low, releases it high after a delay
//! - [`PullDownDriver`] - Holds a signal high, releases it low after a delay
//!
//! ## Test Instrumentation (mock)
//! - [`EdgeCounter`] - Records the time of every matching edge
//! - [`EventRecorder`] - Records every firing of a rendezvous

pub mod clock;
pub mod mock;
pub mod reset;

pub use clock::ClockDriver;
pub use mock::{EdgeCounter, EventRecorder};
pub use reset::{PullDownDriver, PullUpDriver};

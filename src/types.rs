//! Core type definitions for the simulation kernel.
//!
//! This module defines the fundamental scalar types used throughout the
//! kernel. Compound types such as [`crate::time::SimTime`] build on these.

/// Macro simulation time unit (e.g., nanoseconds).
///
/// All scheduled events, clock periods, and the external engine's time
/// reports use the same `Time` representation, giving the kernel and the
/// RTL simulator a unified timeline.
pub type Time = u64;

/// Value carried by a signal.
///
/// Single-bit signals use `0`/`1`; buses pack their bits into the low end.
/// Edge predicates treat zero as low and any nonzero value as high.
pub type Value = u64;

/// Unique identifier for a signal.
///
/// Allocated sequentially by the kernel's signal store; the same id space
/// is shared with the attached RTL engine.
pub type SignalId = u32;

/// Unique identifier for a simulation process.
pub type ProcessId = u64;

/// Event priority. Lower values fire earlier within the same time slot.
pub type Priority = i8;

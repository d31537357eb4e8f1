//! # Cosim Verification Kernel
//!
//! A delta-cycle-accurate discrete-event simulation kernel for
//! hardware-verification testbenches, designed to run in lockstep with an
//! external RTL simulator.
//!
//! ## Design Principles
//!
//! - **Two-Level Time**: Every instant is a `(macro time, micro-step)`
//!   pair. Micro-steps (delta cycles) order same-time activity without
//!   advancing the clock; signal writes only become observable at
//!   micro-step boundaries.
//! - **Cooperative Processes**: Testbench behaviors are processes that run
//!   one at a time and suspend by yielding a wait condition (a time, a
//!   signal edge, a rendezvous, or one micro-step). There is no preemption
//!   and no shared-memory racing.
//! - **External Lockstep**: A bridge advances the RTL engine only up to
//!   the kernel's next internal wake time, so neither side ever runs ahead
//!   of the other. A built-in fallback engine stands in when no external
//!   simulator is attached.
//! - **Deterministic Replay**: Same-slot events fire in schedule order,
//!   buffered writes apply in signal-id order, and the run loop consults
//!   the engine at fixed points, so a fixed stimulus yields an identical
//!   trace on every run.
//!
//! ## Quick Start
//!
//! ```rust
//! use cosim::{ClockDriver, EdgeKind, Kernel, Wait};
//!
//! let mut kernel = Kernel::new();
//! let clk = kernel.add_signal("clk", 0).unwrap();
//! let count = kernel.add_signal("count", 0).unwrap();
//!
//! // 10-unit clock: rising edges at t = 5, 15, 25, ...
//! kernel.spawn("clk_drv", Box::new(ClockDriver::new(clk, 10)));
//!
//! // Count rising edges.
//! let mut armed = false;
//! kernel.spawn_fn("counter", move |ctx| {
//!     if armed {
//!         let count = ctx.signal("count").unwrap();
//!         let n = ctx.read(count)?;
//!         ctx.write(count, n + 1)?;
//!     }
//!     armed = true;
//!     Ok(Wait::rising(ctx.signal("clk").unwrap()))
//! });
//!
//! kernel.run(30).unwrap();
//! assert_eq!(kernel.read_signal(count), Some(3));
//! ```
//!
//! ## Co-Simulation
//!
//! Implement [`RtlEngine`] for your simulator's control interface and
//! attach it before the run:
//!
//! ```rust,ignore
//! let mut kernel = cosim::SimConfig::from_yaml_file("tb.yaml")?.build_kernel()?;
//! kernel.attach_engine(Box::new(MyVpiEngine::connect(addr)?));
//! kernel.run(1_000_000)?;
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod fallback;
pub mod process;
pub mod procs;
pub mod queue;
pub mod scheduler;
pub mod signal;
pub mod stats;
pub mod sync;
pub mod time;
pub mod trace;
pub mod types;

// Re-export commonly used types
pub use bridge::{Bridge, BridgeStats, RtlEngine};
pub use config::{ConfigError, ConfigResult, SimConfig, SignalConfig, SimulationParams};
pub use error::{EngineError, FaultRecord, ProcessError, SimError};
pub use event::{EventHandle, Wake, PRI_EXTERNAL, PRI_NORMAL};
pub use fallback::FallbackEngine;
pub use process::{FnProcess, Process, Wait};
pub use procs::{ClockDriver, EdgeCounter, EventRecorder, PullDownDriver, PullUpDriver};
pub use scheduler::{Kernel, ProcessState, SimContext};
pub use signal::{EdgeKind, SignalChange};
pub use stats::KernelStats;
pub use sync::EventKey;
pub use time::SimTime;
pub use trace::{ChangeObserver, ChangeTrace, TraceRecord};
pub use types::{Priority, ProcessId, SignalId, Time, Value};

/// Initialize the tracing subscriber for logging.
///
/// Call this at the start of your testbench binary to enable logging.
///
/// # Example
///
/// ```rust,ignore
/// cosim::init_logging("debug");
/// ```
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

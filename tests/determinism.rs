//! Replay determinism: the same testbench yields an identical trace and
//! identical counters on every run, including kernel-driven stimulus,
//! rendezvous fan-out, and fallback-engine combinational logic.

use cosim::{ClockDriver, FallbackEngine, Kernel, PullUpDriver, Wait};

/// Builds and runs one instance of a small mixed testbench and returns
/// everything observable about the run.
fn run_testbench() -> (serde_json::Value, serde_json::Value, u64) {
    let mut kernel = Kernel::new();
    let clk = kernel.add_external_signal("clk", 0).unwrap();
    let clk_n = kernel.add_external_signal("clk_n", 1).unwrap();
    let rst_n = kernel.add_signal("rst_n", 1).unwrap();
    let count = kernel.add_signal("count", 0).unwrap();
    kernel.declare_event("phase_done");
    kernel.enable_trace();

    // Inverted clock derived inside the engine.
    let mut engine = FallbackEngine::new();
    engine.set(clk, 0);
    engine.set(clk_n, 1);
    engine.add_rule([clk], clk_n, |v| if v[0] == 0 { 1 } else { 0 });
    kernel.attach_engine(Box::new(engine));

    kernel.spawn("clk_drv", Box::new(ClockDriver::new(clk, 10)));
    kernel.spawn("rst_drv", Box::new(PullUpDriver::new(rst_n, 12)));

    // Counts rising clock edges after reset release; fires a rendezvous
    // at every fourth edge.
    let mut armed = false;
    kernel.spawn_fn("counter", move |ctx| {
        let clk = ctx.signal("clk").unwrap();
        if armed {
            let rst_n = ctx.signal("rst_n").unwrap();
            if ctx.read(rst_n)? != 0 {
                let count = ctx.signal("count").unwrap();
                let n = ctx.read(count)? + 1;
                ctx.write(count, n)?;
                if n % 4 == 0 {
                    let ev = ctx.event("phase_done").unwrap();
                    ctx.fire_with(ev, serde_json::json!({ "count": n }))?;
                }
            }
        }
        armed = true;
        Ok(Wait::rising(clk))
    });

    // Consumes the rendezvous.
    let mut phases = 0u64;
    let mut armed = false;
    kernel.spawn_fn("phase_watcher", move |ctx| {
        if armed {
            phases += 1;
        }
        armed = true;
        let ev = ctx.event("phase_done").unwrap();
        Ok(Wait::event(ev))
    });

    kernel.run(200).unwrap();

    let trace = kernel.trace().unwrap().to_json();
    let stats = kernel.stats().export();
    let final_count = kernel.read_signal(count).unwrap();
    (trace, stats, final_count)
}

#[test]
fn test_identical_runs_produce_identical_traces() {
    let (trace_a, stats_a, count_a) = run_testbench();
    let (trace_b, stats_b, count_b) = run_testbench();

    assert_eq!(trace_a, trace_b);
    assert_eq!(stats_a, stats_b);
    assert_eq!(count_a, count_b);
}

#[test]
fn test_testbench_reaches_expected_state() {
    let (trace, _stats, count) = run_testbench();

    // Rising edges at 5, 15, ..., 195 (20 edges); the edge at t=5 is
    // masked by reset, which releases at t=12.
    assert_eq!(count, 19);

    // The trace is ordered by simulation time.
    let records = trace.as_array().unwrap();
    assert!(!records.is_empty());
    let times: Vec<u64> = records
        .iter()
        .map(|r| r["time"]["time"].as_u64().unwrap())
        .collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

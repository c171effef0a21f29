//! downtown: compares every allocation strategy on one task stream.
//!
//! Three vehicles start near the centre of an 800 × 600 area.  Twenty
//! random pickup/drop-off requests arrive in batches of five, one batch
//! every ten simulated seconds.  Each strategy gets an identical copy of the
//! stream and the same starting fleet; the table at the end shows how long
//! the fleet needed to clear it and how far it drove.
//!
//! Set `RUST_LOG=debug` to see every commitment and delivery.

use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fa_core::{AgentId, EngineConfig, StrategyKind, Tick};
use fa_fleet::Task;
use fa_sim::{RandomTaskSource, RunStats, ScriptedTaskSource, SimBuilder, SimObserver, TaskBatch, TaskSource};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize = 3;
const TASK_COUNT:  usize = 20;
const BATCH_SIZE:  usize = 5;
const SEED:        u64   = 42;
const MAX_TICKS:   u64   = 60 * 60 * 60; // one simulated hour at 60 ticks/s

// ── Observer ──────────────────────────────────────────────────────────────────

/// Records when the last task was delivered.
#[derive(Default)]
struct DeliveryLog {
    last_delivery: Option<Tick>,
    deliveries:    usize,
}

impl SimObserver for DeliveryLog {
    fn on_task_completed(&mut self, tick: Tick, _agent: AgentId, _task: &Task) {
        self.last_delivery = Some(tick);
        self.deliveries += 1;
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let base = EngineConfig {
        agent_count: AGENT_COUNT,
        batch_size:  BATCH_SIZE,
        seed:        SEED,
        max_ticks:   Some(MAX_TICKS),
        ..EngineConfig::default()
    };
    base.validate()?;

    let tasks = draw_tasks(&base, TASK_COUNT);
    info!(tasks = tasks.len(), agents = AGENT_COUNT, "task stream drawn");

    println!("=== downtown: fleet allocation comparison ===");
    println!(
        "Agents: {AGENT_COUNT}  |  Tasks: {}  |  Batch: {BATCH_SIZE} every {} s  |  Seed: {SEED}",
        tasks.len(),
        base.allocation_interval_ticks as f64 * base.tick_duration_secs,
    );
    println!();

    let mut rows = Vec::new();
    for kind in StrategyKind::ALL {
        let config = EngineConfig { strategy: kind, ..base.clone() };
        let mut sim = SimBuilder::new(config, ScriptedTaskSource::new(tasks.clone())).build()?;

        let mut log = DeliveryLog::default();
        let t0 = Instant::now();
        let stats = sim.run(&mut log)?;
        let wall = t0.elapsed();

        let last = log
            .last_delivery
            .map(|t| sim.clock.tick_duration_secs * (t.0 + 1) as f64)
            .unwrap_or(0.0);
        rows.push((kind, stats, last, log.deliveries, wall.as_secs_f64() * 1e3));
    }

    println!(
        "{:<8} {:>14} {:>14} {:>12} {:>10} {:>9}",
        "Strategy", "Makespan (s)", "Distance", "Max agent", "Completed", "Wall ms"
    );
    println!("{}", "-".repeat(72));
    for (kind, stats, last, deliveries, wall_ms) in &rows {
        print_row(*kind, stats, *last, *deliveries, *wall_ms);
    }
    Ok(())
}

/// Pull `count` tasks from a seeded random source so every strategy sees the
/// same stream.
fn draw_tasks(config: &EngineConfig, count: usize) -> Vec<Task> {
    let mut source = RandomTaskSource::from_config(config).with_limit(count);
    match source.request_batch(count) {
        TaskBatch::Ready(tasks) => tasks,
        TaskBatch::Exhausted => Vec::new(),
    }
}

fn print_row(kind: StrategyKind, stats: &RunStats, makespan: f64, completed: usize, wall_ms: f64) {
    println!(
        "{:<8} {:>14.1} {:>14.1} {:>12.1} {:>10} {:>9.1}",
        kind.as_str(),
        makespan,
        stats.total_distance(),
        stats.max_agent_distance(),
        format!("{completed}/{}", stats.tasks_received),
        wall_ms,
    );
}

//! Where new tasks come from.
//!
//! The sim asks its [`TaskSource`] for a batch on every allocation tick until
//! the source reports exhaustion.  After that no further batches are
//! requested; agents finish what they already hold.

use std::collections::VecDeque;

use fa_core::{EngineConfig, Point, SimRng, TaskId};
use fa_fleet::Task;

/// Answer to one [`TaskSource::request_batch`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskBatch {
    /// New tasks; may be empty.
    Ready(Vec<Task>),
    /// No task will ever be produced again.
    Exhausted,
}

/// Producer of task batches.
pub trait TaskSource {
    /// Up to `max` new tasks.
    fn request_batch(&mut self, max: usize) -> TaskBatch;

    /// `true` once the next `request_batch` would return
    /// [`TaskBatch::Exhausted`].
    fn is_exhausted(&self) -> bool;
}

// ── RandomTaskSource ──────────────────────────────────────────────────────────

/// Uniformly random tasks with integer coordinates in
/// `[0, width] × [0, height]` and sequential ids from 0.
///
/// The same seed always yields the same task stream.
pub struct RandomTaskSource {
    width:   i64,
    height:  i64,
    rng:     SimRng,
    next_id: u32,
    limit:   Option<usize>,
}

impl RandomTaskSource {
    /// Unlimited source; coordinates are truncated to whole units.
    pub fn new(width: f64, height: f64, seed: u64) -> Self {
        Self {
            width:   width.max(0.0) as i64,
            height:  height.max(0.0) as i64,
            rng:     SimRng::new(seed),
            next_id: 0,
            limit:   None,
        }
    }

    /// Area and seed from `config`, no limit.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.width, config.height, config.seed)
    }

    /// Stop after `total` tasks.
    pub fn with_limit(mut self, total: usize) -> Self {
        self.limit = Some(total);
        self
    }

    /// Tasks produced so far.
    pub fn produced(&self) -> usize {
        self.next_id as usize
    }

    fn point(&mut self) -> Point {
        let x = self.rng.gen_range(0..=self.width);
        let y = self.rng.gen_range(0..=self.height);
        Point::new(x as f64, y as f64)
    }
}

impl TaskSource for RandomTaskSource {
    fn request_batch(&mut self, max: usize) -> TaskBatch {
        if self.is_exhausted() {
            return TaskBatch::Exhausted;
        }
        let count = match self.limit {
            Some(limit) => max.min(limit - self.produced()),
            None => max,
        };
        let tasks = (0..count)
            .map(|_| {
                let start = self.point();
                let destination = self.point();
                let id = TaskId(self.next_id);
                self.next_id += 1;
                Task::new(id, start, destination)
            })
            .collect();
        TaskBatch::Ready(tasks)
    }

    fn is_exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.produced() >= limit)
    }
}

// ── ScriptedTaskSource ────────────────────────────────────────────────────────

/// Hands out a fixed task list in order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTaskSource {
    tasks: VecDeque<Task>,
}

impl ScriptedTaskSource {
    pub fn new(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self { tasks: tasks.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.tasks.len()
    }
}

impl TaskSource for ScriptedTaskSource {
    fn request_batch(&mut self, max: usize) -> TaskBatch {
        if self.tasks.is_empty() {
            return TaskBatch::Exhausted;
        }
        let n = max.min(self.tasks.len());
        TaskBatch::Ready(self.tasks.drain(..n).collect())
    }

    fn is_exhausted(&self) -> bool {
        self.tasks.is_empty()
    }
}

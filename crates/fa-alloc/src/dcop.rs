//! Declarative DCOP form of one allocation problem, and an in-process solver
//! for it.
//!
//! # Problem shape
//!
//! - one variable per batch task; every variable shares the domain of agent
//!   ids;
//! - `unary[t][a]`: the FIFO append cost of task `t` on agent `a`, i.e. the
//!   cost of the agent's whole current queue followed by `t`;
//! - one [`PairLink`] per task pair `i < j`: `dist(t_i.destination,
//!   t_j.start)`, charged only when both tasks pick the same agent;
//! - the objective is to minimise the total.

use std::collections::BTreeMap;

use fa_core::{AgentId, TaskId};
use fa_fleet::{Agent, Task};

use crate::{ExternalSolver, ProblemHandle, SolverError, SolverResult};

/// Soft constraint between two variables that applies when they take the
/// same value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairLink {
    pub first:  usize,
    pub second: usize,
    pub cost:   f64,
}

/// In-memory DCOP export of one batch against one fleet.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DcopProblem {
    /// The shared domain.
    pub agents: Vec<AgentId>,
    /// One variable per task.
    pub tasks:  Vec<TaskId>,
    /// `unary[t][a]`, indexed by variable then domain position.
    pub unary:  Vec<Vec<f64>>,
    pub links:  Vec<PairLink>,
}

impl DcopProblem {
    pub fn build(agents: &[Agent], tasks: &[Task]) -> Self {
        let unary = tasks
            .iter()
            .map(|task| {
                agents
                    .iter()
                    .map(|a| a.queue_cost() + a.fifo_tail().dist(task.start()) + task.length())
                    .collect()
            })
            .collect();

        let mut links = Vec::new();
        for (i, a) in tasks.iter().enumerate() {
            for (j, b) in tasks.iter().enumerate().skip(i + 1) {
                links.push(PairLink { first: i, second: j, cost: a.destination().dist(b.start()) });
            }
        }

        Self {
            agents: agents.iter().map(Agent::id).collect(),
            tasks: tasks.iter().map(Task::id).collect(),
            unary,
            links,
        }
    }

    pub fn variable_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn domain_size(&self) -> usize {
        self.agents.len()
    }

    /// Total cost of `assignment`, where `assignment[t]` is a domain
    /// position.  Returns `None` if the assignment has the wrong length or
    /// an out-of-domain value.
    pub fn cost(&self, assignment: &[usize]) -> Option<f64> {
        if assignment.len() != self.variable_count()
            || assignment.iter().any(|&a| a >= self.domain_size())
        {
            return None;
        }
        let unary: f64 = assignment.iter().enumerate().map(|(t, &a)| self.unary[t][a]).sum();
        let pairwise: f64 = self
            .links
            .iter()
            .filter(|l| assignment[l.first] == assignment[l.second])
            .map(|l| l.cost)
            .sum();
        Some(unary + pairwise)
    }

    /// Links touching each variable, as `(other, cost)`.
    fn neighbours(&self) -> Vec<Vec<(usize, f64)>> {
        let mut out = vec![Vec::new(); self.variable_count()];
        for l in &self.links {
            out[l.first].push((l.second, l.cost));
            out[l.second].push((l.first, l.cost));
        }
        out
    }
}

/// First `(value, cost)` pair with the lowest cost.
fn argmin(costs: impl Iterator<Item = (usize, f64)>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (a, c) in costs {
        if c < best.1 {
            best = (a, c);
        }
    }
    best
}

// ── LocalSearchSolver ─────────────────────────────────────────────────────────

/// In-process stand-in for an external DCOP solver.
///
/// Starts from each variable's cheapest unary value, then sweeps the
/// variables in order, moving one at a time to the value with the lowest
/// local cost.  A move is only taken when it strictly lowers the total, so
/// the search terminates; `max_rounds` bounds the number of sweeps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LocalSearchSolver {
    pub max_rounds: usize,
}

impl Default for LocalSearchSolver {
    fn default() -> Self {
        Self { max_rounds: 50 }
    }
}

impl LocalSearchSolver {
    pub fn new(max_rounds: usize) -> Self {
        Self { max_rounds }
    }

    /// Domain positions for every variable.
    pub fn solve(&self, problem: &DcopProblem) -> SolverResult<Vec<usize>> {
        if problem.variable_count() == 0 {
            return Ok(Vec::new());
        }
        if problem.domain_size() == 0 {
            return Err(SolverError::Failed("empty domain".into()));
        }

        let mut values: Vec<usize> = problem
            .unary
            .iter()
            .map(|row| argmin(row.iter().copied().enumerate()).0)
            .collect();

        let neighbours = problem.neighbours();
        let local = |values: &[usize], t: usize, a: usize| -> f64 {
            problem.unary[t][a]
                + neighbours[t]
                    .iter()
                    .filter(|&&(other, _)| values[other] == a)
                    .map(|&(_, c)| c)
                    .sum::<f64>()
        };

        for _ in 0..self.max_rounds {
            let mut moved = false;
            for t in 0..problem.variable_count() {
                let current = local(&values, t, values[t]);
                let (a, cost) = argmin((0..problem.domain_size()).map(|a| (a, local(&values, t, a))));
                if cost < current {
                    values[t] = a;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }
        Ok(values)
    }
}

impl ExternalSolver for LocalSearchSolver {
    fn name(&self) -> &str {
        "local-search"
    }

    fn import_solution(&mut self, handle: &ProblemHandle) -> SolverResult<BTreeMap<TaskId, AgentId>> {
        let problem = &handle.problem;
        let values = self.solve(problem)?;
        Ok(problem
            .tasks
            .iter()
            .zip(values)
            .map(|(&task, a)| (task, problem.agents[a]))
            .collect())
    }
}

//! Unit tests for fa-alloc.

#[cfg(test)]
mod helpers {
    use fa_core::{Point, TaskId};
    use fa_fleet::{Agent, FleetBuilder, Task};

    pub const EPS: f64 = 1e-9;

    pub fn task(id: u32, start: (f64, f64), dest: (f64, f64)) -> Task {
        Task::new(TaskId(id), start.into(), dest.into())
    }

    pub fn fleet(positions: &[(f64, f64)]) -> Vec<Agent> {
        positions
            .iter()
            .fold(FleetBuilder::new(), |b, &p| b.agent_at(Point::from(p)))
            .build()
    }

    pub fn ids(agent: &Agent) -> Vec<TaskId> {
        agent.queue().iter().map(Task::id).collect()
    }

    pub fn scattered_batch() -> Vec<Task> {
        vec![
            task(0, (5.0, 0.0), (5.0, 5.0)),
            task(1, (0.0, 1.0), (2.0, 1.0)),
            task(2, (9.0, 9.0), (1.0, 1.0)),
            task(3, (8.0, 2.0), (3.0, 7.0)),
        ]
    }
}

#[cfg(test)]
mod scenarios {
    use fa_core::{AgentId, EngineConfig, StrategyKind, TaskId};

    use super::helpers::{fleet, task};
    use crate::Allocator;

    #[test]
    fn nearest_agent_wins_under_every_strategy() {
        for kind in StrategyKind::ALL {
            let cfg = EngineConfig { strategy: kind, ..EngineConfig::default() };
            let mut alloc = Allocator::from_config(&cfg);
            let mut agents = fleet(&[(0.0, 0.0), (10.0, 10.0)]);
            let batch = [task(0, (0.0, 1.0), (0.0, 2.0))];

            let outcome = alloc.assign(&mut agents, &batch).unwrap();
            assert_eq!(outcome.agent_for(TaskId(0)), Some(AgentId(0)), "strategy {kind:?}");
            assert_eq!(agents[0].queue().len(), 1, "strategy {kind:?}");
            assert!(agents[1].is_idle(), "strategy {kind:?}");
        }
    }

    #[test]
    fn empty_fleet_is_a_noop() {
        for kind in StrategyKind::ALL {
            let cfg = EngineConfig { strategy: kind, ..EngineConfig::default() };
            let mut alloc = Allocator::from_config(&cfg);
            let batch = [task(0, (0.0, 1.0), (0.0, 2.0))];
            let outcome = alloc.assign(&mut [], &batch).unwrap();
            assert!(outcome.commitments.is_empty());
            assert_eq!(outcome.unassigned, batch.to_vec());
        }
    }

    #[test]
    fn empty_batch_is_a_noop() {
        for kind in StrategyKind::ALL {
            let cfg = EngineConfig { strategy: kind, ..EngineConfig::default() };
            let mut alloc = Allocator::from_config(&cfg);
            let mut agents = fleet(&[(0.0, 0.0)]);
            let outcome = alloc.assign(&mut agents, &[]).unwrap();
            assert!(outcome.is_complete());
            assert_eq!(outcome.committed_count(), 0);
            assert!(agents[0].is_idle());
        }
    }
}

#[cfg(test)]
mod greedy {
    use fa_core::Point;
    use fa_fleet::{sequence_cost, Permutations, RebuildPolicy};

    use super::helpers::{fleet, ids, scattered_batch, task, EPS};
    use crate::greedy::{assign, search};

    #[test]
    fn single_agent_matches_brute_force() {
        let batch = &scattered_batch()[..3];
        let brute = Permutations::new(3)
            .map(|p| sequence_cost(Point::ORIGIN, p.iter().map(|&i| &batch[i])))
            .fold(f64::INFINITY, f64::min);

        let mut agents = fleet(&[(0.0, 0.0)]);
        let outcome = assign(&mut agents, batch);

        assert_eq!(outcome.committed_count(), 3);
        assert!((agents[0].route_cost() - brute).abs() < EPS);
        assert!((outcome.bottleneck.unwrap() - brute).abs() < EPS);
    }

    #[test]
    fn winner_bottleneck_is_minimal() {
        let agents = fleet(&[(0.0, 0.0), (10.0, 10.0)]);
        let batch = scattered_batch();
        let found = search(&agents, &batch).unwrap();
        assert_eq!(found.tried.len(), 24);
        assert!(found.tried.iter().all(|&c| found.bottleneck <= c));
    }

    #[test]
    fn replay_reaches_reported_bottleneck() {
        let mut agents = fleet(&[(0.0, 0.0), (10.0, 10.0)]);
        let outcome = assign(&mut agents, &scattered_batch());
        let worst = agents.iter().map(|a| a.route_cost()).fold(0.0, f64::max);
        assert!((worst - outcome.bottleneck.unwrap()).abs() < EPS);
    }

    #[test]
    fn appends_without_reordering() {
        let mut agents = fleet(&[(0.0, 0.0)]);
        // Committed in a deliberately poor order.
        agents[0].append_task(task(10, (50.0, 0.0), (60.0, 0.0)));
        agents[0].append_task(task(11, (1.0, 0.0), (2.0, 0.0)));

        let outcome = assign(&mut agents, &[task(0, (3.0, 0.0), (4.0, 0.0))]);
        let queue = ids(&agents[0]);
        assert_eq!(&queue[..2], &ids_of(&[10, 11]));
        assert_eq!(outcome.commitments[0].index, 2);
        assert_eq!(agents[0].policy(), RebuildPolicy::Reorder);
    }

    fn ids_of(raw: &[u32]) -> Vec<fa_core::TaskId> {
        raw.iter().map(|&i| fa_core::TaskId(i)).collect()
    }

    #[test]
    fn search_on_empty_inputs() {
        assert!(search(&[], &scattered_batch()).is_none());
        assert!(search(&fleet(&[(0.0, 0.0)]), &[]).is_none());
    }
}

#[cfg(test)]
mod auction {
    use fa_core::{AgentId, TaskId};
    use fa_fleet::{evaluate_insertion, InsertionEvaluator, RebuildPolicy};

    use super::helpers::{fleet, ids, scattered_batch, task, EPS};
    use crate::auction::{parallel, regret, regret_order, sequential};

    #[test]
    fn parallel_bids_from_unperturbed_fleet() {
        let mut agents = fleet(&[(0.0, 0.0), (100.0, 100.0)]);
        let snapshot = agents.clone();
        let batch = [task(0, (1.0, 0.0), (2.0, 0.0)), task(1, (0.0, 1.0), (0.0, 2.0))];

        let outcome = parallel(&mut agents, &batch, &InsertionEvaluator::default());

        for (c, t) in outcome.commitments.iter().zip(&batch) {
            assert_eq!(c.agent, AgentId(0));
            let fresh = evaluate_insertion(&snapshot[0], t).marginal_cost;
            assert!((c.cost - fresh).abs() < EPS);
        }
        assert_eq!(agents[0].queue().len(), 2);
    }

    #[test]
    fn sequential_rebids_after_each_award() {
        let mut agents = fleet(&[(0.0, 0.0), (100.0, 100.0)]);
        let batch = [task(0, (1.0, 0.0), (2.0, 0.0)), task(1, (0.0, 1.0), (0.0, 2.0))];
        let eval = InsertionEvaluator::default();

        let mut expected = agents.clone();
        expected[0].insert_task(0, batch[0].clone());
        let second_bid = evaluate_insertion(&expected[0], &batch[1]).marginal_cost;

        let outcome = sequential(&mut agents, &batch, &eval);
        assert!((outcome.commitments[1].cost - second_bid).abs() < EPS);
    }

    #[test]
    fn winners_switch_to_preserve_order() {
        let mut agents = fleet(&[(0.0, 0.0), (100.0, 100.0)]);
        sequential(&mut agents, &[task(0, (1.0, 0.0), (2.0, 0.0))], &InsertionEvaluator::default());
        assert_eq!(agents[0].policy(), RebuildPolicy::PreserveOrder);
        assert_eq!(agents[1].policy(), RebuildPolicy::Reorder);
    }

    #[test]
    fn committed_order_survives() {
        let mut agents = fleet(&[(0.0, 0.0)]);
        agents[0].append_task(task(10, (50.0, 0.0), (60.0, 0.0)));
        agents[0].append_task(task(11, (1.0, 0.0), (2.0, 0.0)));

        sequential(&mut agents, &scattered_batch(), &InsertionEvaluator::default());

        let queue = ids(&agents[0]);
        let a = queue.iter().position(|&t| t == TaskId(10)).unwrap();
        let b = queue.iter().position(|&t| t == TaskId(11)).unwrap();
        assert!(a < b);
        assert_eq!(queue.len(), 6);
    }

    #[test]
    fn regret_order_is_non_increasing() {
        let agents = fleet(&[(0.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let order = regret_order(&agents, &scattered_batch(), &InsertionEvaluator::default());
        assert_eq!(order.len(), 4);
        assert!(order.windows(2).all(|w| w[0].regret >= w[1].regret));
    }

    #[test]
    fn single_agent_regret_is_unbounded() {
        let agents = fleet(&[(0.0, 0.0)]);
        let order = regret_order(&agents, &scattered_batch(), &InsertionEvaluator::default());
        assert!(order.iter().all(|r| r.regret == f64::INFINITY));
        let indices: Vec<usize> = order.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn regret_awards_in_regret_order() {
        let mut agents = fleet(&[(0.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let batch = scattered_batch();
        let eval = InsertionEvaluator::default();
        let order = regret_order(&agents, &batch, &eval);

        let outcome = regret(&mut agents, &batch, &eval);
        let awarded: Vec<TaskId> = outcome.commitments.iter().map(|c| c.task).collect();
        let expected: Vec<TaskId> = order.iter().map(|r| batch[r.index].id()).collect();
        assert_eq!(awarded, expected);
    }
}

#[cfg(test)]
mod external {
    use std::collections::BTreeMap;
    use std::time::{Duration, Instant};

    use fa_core::{AgentId, TaskId};

    use super::helpers::{fleet, task};
    use crate::{
        AllocError, ExternalSolver, ExternalStrategy, ProblemHandle, SolverError, SolverResult,
        UnresolvedEntry,
    };

    struct Failing;

    impl ExternalSolver for Failing {
        fn import_solution(&mut self, _: &ProblemHandle) -> SolverResult<BTreeMap<TaskId, AgentId>> {
            Err(SolverError::Failed("exit status 1".into()))
        }
    }

    struct Fixed(BTreeMap<TaskId, AgentId>);

    impl ExternalSolver for Fixed {
        fn import_solution(&mut self, _: &ProblemHandle) -> SolverResult<BTreeMap<TaskId, AgentId>> {
            Ok(self.0.clone())
        }
    }

    /// Sleeps for `delay` on its first solve only, then maps every task to A0.
    struct Slow {
        delay: Duration,
        calls: u32,
    }

    impl Slow {
        fn new(delay: Duration) -> Self {
            Slow { delay, calls: 0 }
        }
    }

    impl ExternalSolver for Slow {
        fn import_solution(&mut self, h: &ProblemHandle) -> SolverResult<BTreeMap<TaskId, AgentId>> {
            self.calls += 1;
            if self.calls == 1 {
                std::thread::sleep(self.delay);
            }
            Ok(h.problem.tasks.iter().map(|&t| (t, AgentId(0))).collect())
        }
    }

    fn batch() -> Vec<fa_fleet::Task> {
        vec![
            task(0, (0.0, 1.0), (0.0, 2.0)),
            task(1, (5.0, 1.0), (5.0, 2.0)),
            task(2, (9.0, 1.0), (9.0, 2.0)),
        ]
    }

    #[test]
    fn failed_solve_commits_nothing() {
        let mut agents = fleet(&[(0.0, 0.0), (10.0, 10.0)]);
        let before = agents.clone();
        let mut ext = ExternalStrategy::new(Failing, Duration::from_secs(1));

        let err = ext.assign(&mut agents, &batch()).unwrap_err();
        assert!(matches!(err, AllocError::Solver(SolverError::Failed(_))));
        assert_eq!(agents, before);
    }

    #[test]
    fn late_solution_is_rejected() {
        let mut agents = fleet(&[(0.0, 0.0)]);
        let mut ext = ExternalStrategy::new(Slow::new(Duration::from_millis(20)), Duration::from_millis(1));
        let err = ext.assign(&mut agents, &batch()).unwrap_err();
        assert!(matches!(err, AllocError::Solver(SolverError::Timeout { .. })));
        assert!(agents[0].is_idle());
    }

    #[test]
    fn hung_solver_does_not_block_the_caller() {
        let mut agents = fleet(&[(0.0, 0.0)]);
        let limit = Duration::from_millis(100);
        let mut ext = ExternalStrategy::new(Slow::new(Duration::from_millis(1500)), limit);

        let started = Instant::now();
        let err = ext.assign(&mut agents, &batch()).unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(1));
        let AllocError::Solver(SolverError::Timeout { elapsed, limit: reported }) = err else {
            panic!("expected a timeout");
        };
        assert!(elapsed >= limit);
        assert_eq!(reported, limit);
        assert!(agents[0].is_idle());
    }

    #[test]
    fn solver_comes_back_after_timed_out_worker_finishes() {
        let mut agents = fleet(&[(0.0, 0.0)]);
        let mut ext = ExternalStrategy::new(Slow::new(Duration::from_millis(150)), Duration::from_millis(10));

        let err = ext.assign(&mut agents, &batch()).unwrap_err();
        assert!(matches!(err, AllocError::Solver(SolverError::Timeout { .. })));
        let err = ext.assign(&mut agents, &batch()).unwrap_err();
        assert_eq!(err, AllocError::Solver(SolverError::Busy));
        assert!(agents[0].is_idle());

        std::thread::sleep(Duration::from_millis(600));
        let outcome = ext.assign(&mut agents, &batch()).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(agents[0].queue().len(), 3);
    }

    #[test]
    fn unknown_ids_reported_individually() {
        let mapping = BTreeMap::from([
            (TaskId(0), AgentId(0)),
            (TaskId(1), AgentId(9)),
            (TaskId(99), AgentId(1)),
        ]);
        let mut agents = fleet(&[(0.0, 0.0), (10.0, 10.0)]);
        let mut ext = ExternalStrategy::new(Fixed(mapping), Duration::from_secs(1));

        let Err(AllocError::PartialAllocation { outcome, unresolved }) =
            ext.assign(&mut agents, &batch())
        else {
            panic!("expected a partial allocation");
        };

        assert_eq!(outcome.agent_for(TaskId(0)), Some(AgentId(0)));
        let pending: Vec<TaskId> = outcome.unassigned.iter().map(|t| t.id()).collect();
        assert_eq!(pending, vec![TaskId(1), TaskId(2)]);
        assert_eq!(
            unresolved,
            vec![
                UnresolvedEntry::UnknownAgent { task: TaskId(1), agent: AgentId(9) },
                UnresolvedEntry::UnknownTask { task: TaskId(99), agent: AgentId(1) },
                UnresolvedEntry::Unmapped { task: TaskId(2) },
            ]
        );
        assert_eq!(agents[0].queue().len(), 1);
        assert!(agents[1].is_idle());
    }

    #[test]
    fn empty_mapping_reports_every_task() {
        let mut agents = fleet(&[(0.0, 0.0), (10.0, 10.0)]);
        let before = agents.clone();
        let mut ext = ExternalStrategy::new(Fixed(BTreeMap::new()), Duration::from_secs(1));

        let Err(AllocError::PartialAllocation { outcome, unresolved }) =
            ext.assign(&mut agents, &batch())
        else {
            panic!("expected a partial allocation");
        };

        assert_eq!(outcome.committed_count(), 0);
        assert_eq!(outcome.unassigned.len(), 3);
        let missing: Vec<TaskId> = unresolved.iter().map(UnresolvedEntry::task).collect();
        assert_eq!(missing, vec![TaskId(0), TaskId(1), TaskId(2)]);
        assert!(unresolved.iter().all(|e| matches!(e, UnresolvedEntry::Unmapped { .. })));
        assert_eq!(agents, before);
    }

    #[test]
    fn valid_mapping_appends_in_batch_order() {
        let mapping = BTreeMap::from([
            (TaskId(2), AgentId(1)),
            (TaskId(0), AgentId(1)),
            (TaskId(1), AgentId(0)),
        ]);
        let mut agents = fleet(&[(0.0, 0.0), (10.0, 10.0)]);
        let mut ext = ExternalStrategy::new(Fixed(mapping), Duration::from_secs(1));
        let outcome = ext.assign(&mut agents, &batch()).unwrap();

        assert!(outcome.is_complete());
        let queue: Vec<TaskId> = agents[1].queue().iter().map(|t| t.id()).collect();
        assert_eq!(queue, vec![TaskId(0), TaskId(2)]);
    }
}

#[cfg(test)]
mod dcop {
    use fa_fleet::Agent;

    use super::helpers::{fleet, scattered_batch, task, EPS};
    use crate::{DcopProblem, LocalSearchSolver};

    #[test]
    fn unary_is_fifo_append_cost() {
        let mut agents = fleet(&[(0.0, 0.0), (10.0, 0.0)]);
        agents[0].append_task(task(9, (0.0, 0.0), (4.0, 0.0)));
        let problem = DcopProblem::build(&agents, &[task(0, (4.0, 3.0), (4.0, 5.0))]);

        assert_eq!(problem.agents, agents.iter().map(Agent::id).collect::<Vec<_>>());
        // queue 4 + approach 3 + load 2
        assert!((problem.unary[0][0] - 9.0).abs() < EPS);
        // approach 6.7082 + load 2
        assert!((problem.unary[0][1] - (45f64.sqrt() + 2.0)).abs() < EPS);
    }

    #[test]
    fn pair_links_cover_every_pair() {
        let agents = fleet(&[(0.0, 0.0)]);
        let problem = DcopProblem::build(&agents, &scattered_batch());
        assert_eq!(problem.links.len(), 6);
        assert!(problem.links.iter().all(|l| l.first < l.second));
    }

    #[test]
    fn cost_charges_links_only_on_shared_agent() {
        let agents = fleet(&[(0.0, 0.0), (0.0, 0.0)]);
        let batch = [task(0, (0.0, 0.0), (3.0, 4.0)), task(1, (0.0, 0.0), (1.0, 0.0))];
        let problem = DcopProblem::build(&agents, &batch);

        let split = problem.cost(&[0, 1]).unwrap();
        let shared = problem.cost(&[0, 0]).unwrap();
        assert!((split - 6.0).abs() < EPS);
        assert!((shared - 11.0).abs() < EPS);
        assert!(problem.cost(&[0]).is_none());
        assert!(problem.cost(&[0, 2]).is_none());
    }

    #[test]
    fn local_search_never_worse_than_start() {
        let agents = fleet(&[(0.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let problem = DcopProblem::build(&agents, &scattered_batch());

        let start: Vec<usize> = problem
            .unary
            .iter()
            .map(|row| {
                let mut best = 0;
                for (a, &c) in row.iter().enumerate() {
                    if c < row[best] {
                        best = a;
                    }
                }
                best
            })
            .collect();

        let solved = LocalSearchSolver::default().solve(&problem).unwrap();
        assert_eq!(solved.len(), 4);
        assert!(problem.cost(&solved).unwrap() <= problem.cost(&start).unwrap() + EPS);
    }

    #[test]
    fn shared_agent_split_when_links_dominate() {
        // Both tasks are cheapest on agent 0, but chaining them there costs
        // more than sending the second to agent 1.
        let agents = fleet(&[(0.0, 0.0), (0.0, 1.0)]);
        let batch = [task(0, (0.0, 0.0), (100.0, 0.0)), task(1, (0.0, 0.0), (0.0, 0.5))];
        let problem = DcopProblem::build(&agents, &batch);
        let solved = LocalSearchSolver::default().solve(&problem).unwrap();
        assert_ne!(solved[0], solved[1]);
    }
}

#[cfg(test)]
mod allocator {
    use fa_core::{EngineConfig, StrategyKind};

    use crate::{Allocator, Strategy};

    #[test]
    fn from_config_selects_strategy() {
        for kind in StrategyKind::ALL {
            let cfg = EngineConfig { strategy: kind, ..EngineConfig::default() };
            assert_eq!(Allocator::from_config(&cfg).kind(), kind);
        }
    }

    #[test]
    fn penalty_reaches_evaluator() {
        let cfg = EngineConfig { insertion_penalty: Some(50.0), ..EngineConfig::default() };
        assert_eq!(Allocator::from_config(&cfg).evaluator().penalty_per_task, 50.0);
        let plain = Allocator::new(Strategy::Greedy, Default::default());
        assert_eq!(plain.evaluator().penalty_per_task, 0.0);
    }
}

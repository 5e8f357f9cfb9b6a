//! End-to-end solver scenarios on small levels.

use glam::Vec2;
use ricochet::solver::{Solver, SolverPhase};
use ricochet::{LevelSnapshot, PlacedSurface, SolveMode, SolverConfig, SurfaceSpec};

fn scenario_level() -> LevelSnapshot {
    LevelSnapshot::new(
        Vec2::new(150.0, 100.0),
        vec![Vec2::new(650.0, 350.0)],
        Vec2::new(800.0, 600.0),
        vec![
            SurfaceSpec::new(400.0, 590.0, 200.0, 0.0).locked(),
            SurfaceSpec::new(150.0, 400.0, 140.0, 0.0),
        ],
    )
}

#[test]
fn explore_run_ends_solved_or_with_argmin_best() {
    for seed in [1_u64, 2, 3] {
        let mut solver = Solver::new(scenario_level(), SolverConfig::default(), seed).unwrap();
        solver.start(SolveMode::Explore, None).unwrap();
        let phase = solver.run_to_end().unwrap();
        let state = solver.state();

        match phase {
            SolverPhase::Solved => {
                assert!(state.found_solution);
                assert!(state.attempts.len() <= 50);
                let last = state.attempts.last().unwrap();
                assert!(last.success);
                assert_eq!(state.best_config.as_ref(), Some(&last.config));
            }
            SolverPhase::Exhausted => {
                assert!(!state.found_solution);
                assert_eq!(state.attempts.len(), 50);
                let argmin = state.attempts.closest().unwrap();
                assert_eq!(
                    state.best_config.as_ref(),
                    Some(&state.attempts.get(argmin).unwrap().config)
                );
            }
            other => panic!("unexpected terminal phase {other:?}"),
        }

        // Only the final attempt may be a success
        let successes = state.attempts.iter().filter(|a| a.success).count();
        assert!(successes <= 1);
        for attempt in state.attempts.iter() {
            if attempt.success {
                assert!(attempt.closest_distance < 30.0);
            }
            // Locked slot never moves
            assert_eq!(attempt.config[0], scenario_level().surfaces[0]);
            assert_eq!(attempt.config.len(), 2);
        }
    }
}

#[test]
fn refine_first_attempt_stays_near_player_layout() {
    let placed = [
        PlacedSurface { pos: Vec2::new(400.0, 590.0), angle: 0.0, width: 200.0, locked: true },
        PlacedSurface { pos: Vec2::new(170.0, 390.0), angle: 0.6, width: 140.0, locked: false },
    ];
    let user = LevelSnapshot::capture_layout(&placed);

    for seed in 0..20_u64 {
        let mut solver = Solver::new(scenario_level(), SolverConfig::default(), seed).unwrap();
        solver.start(SolveMode::Refine, Some(user.clone())).unwrap();

        let first = &solver.state().attempts.get(0).unwrap().config;
        let (orig, got) = (&user[1], &first[1]);
        assert!((got.x - orig.x).abs() <= 64.0 + 1e-3);
        assert!((got.y - orig.y).abs() <= 64.0 + 1e-3);
        assert!((got.angle_degrees - orig.angle_degrees).abs() <= 28.0 + 1e-3);
        assert_eq!(first[0], user[0]);
    }
}

#[test]
fn same_seed_same_attempts() {
    let run = |seed| {
        let config = SolverConfig::default().with_max_attempts(8, 8);
        let mut solver = Solver::new(scenario_level(), config, seed).unwrap();
        solver.start(SolveMode::Explore, None).unwrap();
        solver.run_to_end().unwrap();
        solver
            .state()
            .attempts
            .iter()
            .map(|a| a.config.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn attempt_log_exports_for_replay() {
    let config = SolverConfig::default().with_max_attempts(3, 3);
    let mut solver = Solver::new(scenario_level(), config, 9).unwrap();
    solver.start(SolveMode::Explore, None).unwrap();
    solver.run_to_end().unwrap();

    let json = solver.state().attempts.to_json().unwrap();
    assert!(json.contains("closestDistance"));
    assert!(json.contains("trajectory"));
    assert!(solver.state().attempts.replay_position(0, 10_000).is_some());
}

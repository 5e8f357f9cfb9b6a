//! Annealing controller
//!
//! Owns the solver state for one level session and advances the search one
//! attempt at a time. Scheduling between attempts lives in `schedule`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generator::{ErrorVector, GenerationContext, generate_config};
use super::store::AttemptLog;
use crate::error::SolverResult;
use crate::level::{Configuration, LevelSnapshot};
use crate::settings::{SolveMode, SolverConfig};
use crate::sim::{TrialResult, run_trial};

/// Lifecycle of a solver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverPhase {
    /// Not started, stopped, or aborted
    #[default]
    Idle,
    /// Attempts in progress
    Running,
    /// An attempt reached a target
    Solved,
    /// Budget spent without reaching a target
    Exhausted,
}

/// Everything the host may poll between frames
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverState {
    pub phase: SolverPhase,
    pub mode: SolveMode,
    pub attempts: AttemptLog,
    /// Solving layout, or the closest miss so far
    pub best_config: Option<Configuration>,
    pub best_distance: f32,
    pub current_attempt_index: usize,
    pub found_solution: bool,
    pub temperature: f32,
    pub error_vectors: Vec<ErrorVector>,
    /// Player layout captured for refine mode
    pub user_config: Option<Configuration>,
    /// Bumped on every `start()`; stale continuations compare against it
    pub run_id: u64,
}

impl Default for SolverState {
    fn default() -> Self {
        Self {
            phase: SolverPhase::Idle,
            mode: SolveMode::Explore,
            attempts: AttemptLog::new(),
            best_config: None,
            best_distance: f32::INFINITY,
            current_attempt_index: 0,
            found_solution: false,
            temperature: 0.0,
            error_vectors: Vec::new(),
            user_config: None,
            run_id: 0,
        }
    }
}

impl SolverState {
    pub fn is_running(&self) -> bool {
        self.phase == SolverPhase::Running
    }

    /// Compact HUD snapshot
    pub fn progress(&self, max_attempts: usize) -> Progress {
        Progress {
            phase: self.phase,
            mode: self.mode,
            attempt: self.current_attempt_index,
            max_attempts,
            temperature: self.temperature,
            best_distance: self.best_distance.is_finite().then_some(self.best_distance),
            found_solution: self.found_solution,
        }
    }
}

/// Solver progress for status displays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub phase: SolverPhase,
    pub mode: SolveMode,
    pub attempt: usize,
    pub max_attempts: usize,
    pub temperature: f32,
    pub best_distance: Option<f32>,
    pub found_solution: bool,
}

/// Level solver: one per level session, recreated on level load
#[derive(Debug)]
pub struct Solver {
    level: LevelSnapshot,
    config: SolverConfig,
    rng: Pcg32,
    state: SolverState,
}

impl Solver {
    /// Create an idle solver for `level`
    pub fn new(level: LevelSnapshot, config: SolverConfig, seed: u64) -> SolverResult<Self> {
        config.validate()?;
        Ok(Self {
            level,
            config,
            rng: Pcg32::seed_from_u64(seed),
            state: SolverState::default(),
        })
    }

    pub fn level(&self) -> &LevelSnapshot {
        &self.level
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    /// Attempt budget of the current run
    pub fn max_attempts(&self) -> usize {
        self.config.max_attempts(self.state.mode)
    }

    pub fn progress(&self) -> Progress {
        self.state.progress(self.max_attempts())
    }

    pub fn attempt_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.config.attempt_delay_ms)
    }

    /// True while run `run_id` is still the live, running one
    pub fn is_current(&self, run_id: u64) -> bool {
        self.state.is_running() && self.state.run_id == run_id
    }

    /// Reset and begin a new run, executing the first attempt immediately
    ///
    /// In refine mode `user_config` is the layout to search around; without
    /// one the level defaults are used.
    pub fn start(
        &mut self,
        mode: SolveMode,
        user_config: Option<Configuration>,
    ) -> SolverResult<SolverPhase> {
        let run_id = self.state.run_id + 1;
        self.state = SolverState {
            phase: SolverPhase::Running,
            mode,
            temperature: self.config.initial_temperature(mode),
            user_config,
            run_id,
            ..SolverState::default()
        };
        log::info!(
            "Solver run {} started in {} mode ({} attempts, T={:.2})",
            run_id,
            mode.as_str(),
            self.max_attempts(),
            self.state.temperature
        );
        self.iterate()
    }

    /// Cancel the current run; already scheduled attempts become no-ops
    pub fn stop(&mut self) {
        if self.state.is_running() {
            log::info!(
                "Solver run {} stopped after {} attempts",
                self.state.run_id,
                self.state.current_attempt_index
            );
            self.state.phase = SolverPhase::Idle;
        }
    }

    /// Execute one attempt if a run is active
    ///
    /// A fatal error stops the run and is handed back to the caller.
    pub fn iterate(&mut self) -> SolverResult<SolverPhase> {
        if !self.state.is_running() {
            return Ok(self.state.phase);
        }
        if let Err(err) = self.run_attempt() {
            log::warn!("Solver run {} aborted: {err}", self.state.run_id);
            self.state.phase = SolverPhase::Idle;
            return Err(err);
        }
        Ok(self.state.phase)
    }

    /// Run attempts back to back until the run ends (no yielding)
    pub fn run_to_end(&mut self) -> SolverResult<SolverPhase> {
        while self.state.is_running() {
            self.iterate()?;
        }
        Ok(self.state.phase)
    }

    fn run_attempt(&mut self) -> SolverResult<()> {
        let max_attempts = self.max_attempts();
        let state = &mut self.state;

        if state.mode == SolveMode::Explore {
            let progress = state.current_attempt_index as f32 / max_attempts as f32;
            state.temperature = (self.config.explore_temperature * (1.0 - progress)).max(0.0);
        }

        let template = match (state.mode, state.user_config.as_deref()) {
            (SolveMode::Refine, Some(user)) => user,
            _ => self.level.surfaces.as_slice(),
        };
        let ctx = GenerationContext {
            template,
            mode: state.mode,
            temperature: state.temperature,
            error_vectors: &state.error_vectors,
            ball_start: self.level.ball_start,
            target_centroid: self.level.target_centroid(),
        };
        let candidate = generate_config(&ctx, &self.config, &mut self.rng);
        let result = run_trial(&candidate, &self.level, &self.config)?;

        self.record(result, max_attempts);
        Ok(())
    }

    fn record(&mut self, result: TrialResult, max_attempts: usize) {
        let state = &mut self.state;
        let success = result.success;
        let distance = result.closest_distance;

        if !success {
            let miss = result
                .final_position()
                .and_then(|end| self.level.nearest_target(end).map(|(t, _)| ErrorVector::between(end, t)));
            if let Some(miss) = miss {
                state.error_vectors.push(miss);
            }
        }
        let config = result.config.clone();
        state.attempts.push(result);
        state.current_attempt_index += 1;

        log::debug!(
            "Attempt {}/{}: success={} distance={:.1} T={:.2}",
            state.current_attempt_index,
            max_attempts,
            success,
            distance,
            state.temperature
        );

        if success {
            state.best_config = Some(config);
            state.best_distance = state.best_distance.min(distance);
            state.found_solution = true;
            state.phase = SolverPhase::Solved;
            log::info!(
                "Solver run {} solved on attempt {}",
                state.run_id,
                state.current_attempt_index
            );
            return;
        }

        if state.best_config.is_none() || distance < state.best_distance {
            state.best_config = Some(config);
            state.best_distance = state.best_distance.min(distance);
        }

        if state.current_attempt_index >= max_attempts {
            state.phase = SolverPhase::Exhausted;
            log::info!(
                "Solver run {} exhausted {} attempts, best distance {:.1}",
                state.run_id,
                max_attempts,
                state.best_distance
            );
        }
    }
}

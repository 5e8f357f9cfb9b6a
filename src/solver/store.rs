//! Attempt log for replay and visualization
//!
//! Append-only during a run; the renderer reads it to draw past attempts
//! and to scrub through a single attempt's trajectory.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SolverResult;
use crate::sim::TrialResult;

/// Every trial of the current run, in the order they ran
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttemptLog {
    attempts: Vec<TrialResult>,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    pub fn push(&mut self, result: TrialResult) {
        self.attempts.push(result);
    }

    pub fn clear(&mut self) {
        self.attempts.clear();
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrialResult> {
        self.attempts.get(index)
    }

    pub fn last(&self) -> Option<&TrialResult> {
        self.attempts.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrialResult> {
        self.attempts.iter()
    }

    pub fn as_slice(&self) -> &[TrialResult] {
        &self.attempts
    }

    /// Index of the attempt that came closest to a target (first wins ties)
    pub fn closest(&self) -> Option<usize> {
        self.attempts
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, a)| match best {
                Some((_, d)) if d <= a.closest_distance => best,
                _ => Some((i, a.closest_distance)),
            })
            .map(|(i, _)| i)
    }

    /// Index of the first attempt that reached a target
    pub fn first_success(&self) -> Option<usize> {
        self.attempts.iter().position(|a| a.success)
    }

    /// Ball position of `attempt` at replay frame `frame`
    ///
    /// Frames past the end hold the final position.
    pub fn replay_position(&self, attempt: usize, frame: usize) -> Option<Vec2> {
        let trajectory = &self.attempts.get(attempt)?.trajectory;
        trajectory
            .get(frame)
            .or_else(|| trajectory.last())
            .copied()
    }

    /// Export for offline replay
    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SolverResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

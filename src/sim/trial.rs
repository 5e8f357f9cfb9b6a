//! Single trial rollout
//!
//! Runs one surface configuration through a fresh world and reports how
//! close the ball came to any target.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::{BodyKind, World};
use crate::error::{SolverError, SolverResult};
use crate::level::{Configuration, LevelSnapshot};
use crate::settings::SolverConfig;

/// A ball-vs-surface impact recorded during a trial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionEvent {
    pub point: Vec2,
    /// Unit normal from the surface toward the ball
    pub normal: Vec2,
    pub velocity_before: Vec2,
    pub impact_speed: f32,
    /// Angle of the surface that was hit (degrees)
    pub surface_angle: f32,
}

/// Outcome of one trial. Never mutated after the rollout returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialResult {
    pub config: Configuration,
    /// Ball center, one sample per simulated step
    pub trajectory: Vec<Vec2>,
    pub success: bool,
    /// Closest ball-to-target distance seen during the rollout
    pub closest_distance: f32,
    pub collisions: Vec<CollisionEvent>,
}

impl TrialResult {
    /// Where the ball ended up
    pub fn final_position(&self) -> Option<Vec2> {
        self.trajectory.last().copied()
    }
}

/// Roll out `config` on `level` until a target is reached or steps run out
///
/// Targets are always treated as uncollected. The world is disposed before
/// returning on the normal path; on error it is dropped with the frame.
pub fn run_trial(
    config: &Configuration,
    level: &LevelSnapshot,
    settings: &SolverConfig,
) -> SolverResult<TrialResult> {
    let mut world = World::new(level.canvas.x, level.canvas.y);
    let ball = world.spawn_ball(level.ball_start.x, level.ball_start.y);
    for (slot, spec) in config.iter().enumerate() {
        world.spawn_surface(spec, slot);
    }

    let steps = settings.steps_per_trial;
    let mut trajectory = Vec::with_capacity(steps as usize);
    let mut collisions = Vec::new();
    let mut contacts = Vec::new();
    let mut closest_distance = f32::INFINITY;
    let mut success = false;

    for step in 0..steps {
        let velocity_before = world.ball(ball).map(|b| b.vel).unwrap_or(Vec2::ZERO);

        contacts.clear();
        world.step(settings.step_ms, &mut contacts);

        let Some(body) = world.ball_mut(ball) else {
            break;
        };

        // Cap speed so stacked impulses cannot blow up the integration
        let speed = body.vel.length();
        if speed > settings.max_ball_speed {
            body.vel *= settings.max_ball_speed / speed;
        }

        if !body.pos.is_finite() || !body.vel.is_finite() {
            log::warn!("Trial aborted: non-finite ball state at step {step}");
            return Err(SolverError::NonFiniteState { step });
        }
        let pos = body.pos;

        for contact in contacts.iter().filter(|c| c.ball == ball) {
            let BodyKind::Surface { slot } = contact.kind else {
                continue;
            };
            let point = if contact.point.is_finite() { contact.point } else { pos };
            collisions.push(CollisionEvent {
                point,
                normal: contact.normal,
                velocity_before,
                impact_speed: velocity_before.length(),
                surface_angle: config.get(slot).map(|s| s.angle_degrees).unwrap_or(0.0),
            });
        }

        trajectory.push(pos);

        for target in &level.targets {
            let dist = pos.distance(*target);
            closest_distance = closest_distance.min(dist);
            if dist < settings.capture_radius {
                success = true;
            }
        }
        if success {
            break;
        }
    }

    world.dispose();

    Ok(TrialResult {
        config: config.clone(),
        trajectory,
        success,
        closest_distance,
        collisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::SurfaceSpec;

    fn open_level(target: Vec2) -> LevelSnapshot {
        LevelSnapshot::new(Vec2::new(400.0, 100.0), vec![target], Vec2::new(800.0, 600.0), Vec::new())
    }

    #[test]
    fn test_trial_runs_full_length_on_miss() {
        let level = open_level(Vec2::new(50.0, 50.0));
        let settings = SolverConfig::default();
        let result = run_trial(&Vec::new(), &level, &settings).unwrap();

        assert!(!result.success);
        assert_eq!(result.trajectory.len(), 300);
        assert!(result.closest_distance >= settings.capture_radius);
        // No surfaces: wall bounces are not surface collisions
        assert!(result.collisions.is_empty());
    }

    #[test]
    fn test_trial_stops_on_capture() {
        // Target straight below the ball: a free fall reaches it
        let level = open_level(Vec2::new(400.0, 400.0));
        let result = run_trial(&Vec::new(), &level, &SolverConfig::default()).unwrap();

        assert!(result.success);
        assert!(result.closest_distance < 30.0);
        assert!(result.trajectory.len() < 300);
        let last = result.final_position().unwrap();
        assert!(last.distance(Vec2::new(400.0, 400.0)) < 30.0);
    }

    #[test]
    fn test_surface_deflects_ball_and_records_collision() {
        let level = open_level(Vec2::new(700.0, 150.0));
        // 30° ramp under the ball tips it to the right
        let config = vec![SurfaceSpec::new(400.0, 300.0, 200.0, 30.0)];
        let result = run_trial(&config, &level, &SolverConfig::default()).unwrap();

        let first = result.collisions.first().expect("ball should hit the ramp");
        assert_eq!(first.surface_angle, 30.0);
        assert!((first.normal.length() - 1.0).abs() < 1e-4);
        assert!((first.impact_speed - first.velocity_before.length()).abs() < 1e-5);
        // Ball moves right after the first bounce
        let idx = result.trajectory.iter().position(|p| p.x > 420.0);
        assert!(idx.is_some());
    }

    #[test]
    fn test_speed_is_capped() {
        let level = open_level(Vec2::new(50.0, 50.0));
        let settings = SolverConfig {
            max_ball_speed: 2.0,
            ..SolverConfig::default()
        };
        let result = run_trial(&Vec::new(), &level, &settings).unwrap();
        // One step of gravity lands on top of the capped speed
        for w in result.trajectory.windows(2) {
            assert!(w[0].distance(w[1]) <= 2.0 + 0.2);
        }
    }

    #[test]
    fn test_success_implies_capture_distance() {
        let level = open_level(Vec2::new(400.0, 400.0));
        let settings = SolverConfig::default();
        let result = run_trial(&Vec::new(), &level, &settings).unwrap();
        if result.success {
            assert!(result.trajectory.iter().any(|p| p.distance(level.targets[0]) < settings.capture_radius));
        }
    }
}

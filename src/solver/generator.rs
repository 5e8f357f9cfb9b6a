//! Candidate configuration generation
//!
//! Builds one randomized layout per attempt: a geometric guess for where
//! each free surface should go, temperature-scaled jitter on top, and a
//! nudge toward where recent misses ended up.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::level::{Configuration, SurfaceSpec};
use crate::settings::{SolveMode, SolverConfig};

/// Miss offset of a failed trial: from the ball's final position to the
/// nearest target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorVector {
    pub dx: f32,
    pub dy: f32,
    pub magnitude: f32,
}

impl ErrorVector {
    pub fn between(ball_end: Vec2, target: Vec2) -> Self {
        let d = target - ball_end;
        Self {
            dx: d.x,
            dy: d.y,
            magnitude: d.length(),
        }
    }
}

/// Inputs for one generation call
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Layout to vary: the level defaults, or the player's layout when refining
    pub template: &'a [SurfaceSpec],
    pub mode: SolveMode,
    pub temperature: f32,
    pub error_vectors: &'a [ErrorVector],
    pub ball_start: Vec2,
    pub target_centroid: Vec2,
}

/// Produce the next candidate layout
///
/// The output has exactly one entry per template slot, in template order.
/// Locked slots are copied unchanged.
pub fn generate_config<R: Rng>(
    ctx: &GenerationContext<'_>,
    settings: &SolverConfig,
    rng: &mut R,
) -> Configuration {
    let temperature = ctx.temperature.clamp(0.0, 1.0);
    let pos_jitter = settings.position_jitter(temperature);
    let angle_jitter = settings.angle_jitter(temperature);
    let bias = error_bias(ctx.error_vectors, settings, temperature);

    let mut first_free = true;
    ctx.template
        .iter()
        .map(|spec| {
            if spec.locked {
                return *spec;
            }

            let is_first = std::mem::replace(&mut first_free, false);
            let mut out = match ctx.mode {
                SolveMode::Refine => *spec,
                SolveMode::Explore if is_first => intercept_placement(spec, ctx, settings, rng),
                SolveMode::Explore => side_placement(spec, ctx, settings, rng),
            };

            out.x += symmetric(rng, pos_jitter) + bias.x;
            out.y += symmetric(rng, pos_jitter) + bias.y;
            out.angle_degrees += symmetric(rng, angle_jitter);

            // Keep the intercept reachable from a falling ball
            if ctx.mode == SolveMode::Explore && is_first {
                out.y = out.y.max(ctx.ball_start.y - settings.first_surface_headroom);
            }
            out
        })
        .collect()
}

/// Mean of the recent miss offsets, weighted up as the search cools
pub fn error_bias(vectors: &[ErrorVector], settings: &SolverConfig, temperature: f32) -> Vec2 {
    let recent = &vectors[vectors.len().saturating_sub(settings.error_window)..];
    if recent.is_empty() {
        return Vec2::ZERO;
    }
    let n = recent.len() as f32;
    let mean = Vec2::new(
        recent.iter().map(|e| e.dx).sum::<f32>() / n,
        recent.iter().map(|e| e.dy).sum::<f32>() / n,
    );
    mean * settings.error_bias_gain * (1.0 - temperature)
}

/// First free surface in explore mode: straight under the ball, far enough
/// down to redirect it toward the targets
fn intercept_placement<R: Rng>(
    spec: &SurfaceSpec,
    ctx: &GenerationContext<'_>,
    settings: &SolverConfig,
    rng: &mut R,
) -> SurfaceSpec {
    let dx = ctx.target_centroid.x - ctx.ball_start.x;
    let horizontal = dx.abs();

    let (base, spread) = if horizontal > settings.intercept_far_threshold {
        settings.intercept_far
    } else if horizontal > settings.intercept_mid_threshold {
        settings.intercept_mid
    } else {
        settings.intercept_near
    };
    let mut intercept = base + rng.random::<f32>() * spread;
    if ctx.target_centroid.y < ctx.ball_start.y {
        intercept *= settings.intercept_rising_factor;
    }

    SurfaceSpec {
        x: ctx.ball_start.x,
        y: ctx.ball_start.y + intercept,
        angle_degrees: tilt_toward(dx, settings.tilt_band, rng),
        ..*spec
    }
}

/// Other free surfaces in explore mode: stay put, tilt toward the targets
fn side_placement<R: Rng>(
    spec: &SurfaceSpec,
    ctx: &GenerationContext<'_>,
    settings: &SolverConfig,
    rng: &mut R,
) -> SurfaceSpec {
    let dx = ctx.target_centroid.x - spec.x;
    if dx.abs() < settings.centroid_proximity {
        return *spec;
    }
    SurfaceSpec {
        angle_degrees: tilt_toward(dx, settings.tilt_band, rng),
        ..*spec
    }
}

/// Uniform angle in the tilt band, mirrored when the targets are to the left
///
/// Positive angles rotate clockwise on screen, which sends a falling ball right.
fn tilt_toward<R: Rng>(dx: f32, band: (f32, f32), rng: &mut R) -> f32 {
    let angle = band.0 + rng.random::<f32>() * (band.1 - band.0);
    if dx >= 0.0 { angle } else { -angle }
}

#[inline]
fn symmetric<R: Rng>(rng: &mut R, half_range: f32) -> f32 {
    if !(half_range > 0.0 && half_range.is_finite()) {
        return 0.0;
    }
    rng.random_range(-half_range..=half_range)
}

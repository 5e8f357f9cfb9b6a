//! Ricochet - automatic level solver for a bouncing-ball puzzle game
//!
//! Core modules:
//! - `sim`: Headless physics (disposable worlds, collisions, single trials)
//! - `solver`: Annealing search (generator, controller, attempt log, scheduling)
//! - `level`: Host-facing level snapshot and surface layout types
//! - `settings`: Tunable solver constants
//! - `platform`: Browser host binding

pub mod error;
pub mod level;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod solver;

pub use error::{SolverError, SolverResult};
pub use level::{Configuration, LevelSnapshot, PlacedSurface, SurfaceSpec};
pub use settings::{SolveMode, SolverConfig};
pub use solver::{Solver, SolverPhase, SolverState};

/// Physics body constants shared by every trial world
pub mod consts {
    /// Boundary wall thickness (walls sit just outside the canvas)
    pub const WALL_THICKNESS: f32 = 50.0;
    pub const WALL_RESTITUTION: f32 = 0.99;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    pub const BALL_RESTITUTION: f32 = 0.95;
    pub const BALL_DENSITY: f32 = 0.001;

    /// Placeable surface defaults
    pub const SURFACE_THICKNESS: f32 = 20.0;
    pub const SURFACE_RESTITUTION: f32 = 0.99;

    /// Gravity direction and scale (soft gameplay pull, not real units)
    pub const GRAVITY_X: f32 = 0.0;
    pub const GRAVITY_Y: f32 = 0.5;
    pub const GRAVITY_SCALE: f32 = 0.001;

    /// Most collision substeps a single world step may take
    pub const MAX_SUBSTEPS: u32 = 16;
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_radian_round_trip() {
        for deg in [-170.0_f32, -45.0, 0.0, 12.5, 90.0, 179.0] {
            assert!((rad_to_deg(deg_to_rad(deg)) - deg).abs() < 1e-3);
        }
    }
}

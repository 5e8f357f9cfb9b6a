//! Level snapshot and surface layout types
//!
//! Everything the solver reads from the host game lives here. The host owns
//! the live level; the solver only ever sees copies taken at `start()`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{deg_to_rad, rad_to_deg};

/// One placeable reflective segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSpec {
    /// Center x
    pub x: f32,
    /// Center y (canvas coordinates, y grows downward)
    pub y: f32,
    /// Length of the segment
    pub width: f32,
    /// Rotation in degrees (positive = clockwise on screen)
    pub angle_degrees: f32,
    /// Locked surfaces are never moved by the solver
    pub locked: bool,
}

impl SurfaceSpec {
    pub fn new(x: f32, y: f32, width: f32, angle_degrees: f32) -> Self {
        Self {
            x,
            y,
            width,
            angle_degrees,
            locked: false,
        }
    }

    /// Same surface, marked immovable
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn angle_radians(&self) -> f32 {
        deg_to_rad(self.angle_degrees)
    }

    /// Capture an in-game surface into solver form
    pub fn from_placed(placed: &PlacedSurface) -> Self {
        Self {
            x: placed.pos.x,
            y: placed.pos.y,
            width: placed.width,
            angle_degrees: rad_to_deg(placed.angle),
            locked: placed.locked,
        }
    }

    /// Convert back to in-game form (for applying a found solution)
    pub fn to_placed(&self) -> PlacedSurface {
        PlacedSurface {
            pos: self.position(),
            angle: self.angle_radians(),
            width: self.width,
            locked: self.locked,
        }
    }
}

/// Ordered surface layout, aligned 1:1 with the level's surface slots
pub type Configuration = Vec<SurfaceSpec>;

/// A surface as the live game stores it (angle in radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedSurface {
    pub pos: Vec2,
    /// Rotation in radians
    pub angle: f32,
    pub width: f32,
    pub locked: bool,
}

/// Read-only view of a level, taken when the solver is created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSnapshot {
    /// Where the ball spawns
    pub ball_start: Vec2,
    /// Target centers (collected state is irrelevant to the solver)
    pub targets: Vec<Vec2>,
    /// Canvas width and height
    pub canvas: Vec2,
    /// Default surface layout: locked fixtures plus the movable pieces
    pub surfaces: Configuration,
}

impl LevelSnapshot {
    pub fn new(ball_start: Vec2, targets: Vec<Vec2>, canvas: Vec2, surfaces: Configuration) -> Self {
        Self {
            ball_start,
            targets,
            canvas,
            surfaces,
        }
    }

    /// Mean of all target positions.
    ///
    /// Callers must supply at least one target; with none this returns the
    /// ball start so generation still has a reference point.
    pub fn target_centroid(&self) -> Vec2 {
        if self.targets.is_empty() {
            return self.ball_start;
        }
        let sum: Vec2 = self.targets.iter().copied().sum();
        sum / self.targets.len() as f32
    }

    /// Nearest target to `point` and its distance
    pub fn nearest_target(&self, point: Vec2) -> Option<(Vec2, f32)> {
        self.targets
            .iter()
            .map(|&t| (t, t.distance(point)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Snapshot the player's current layout for refine mode
    pub fn capture_layout(placed: &[PlacedSurface]) -> Configuration {
        placed.iter().map(SurfaceSpec::from_placed).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn level() -> LevelSnapshot {
        LevelSnapshot::new(
            Vec2::new(150.0, 100.0),
            vec![Vec2::new(600.0, 300.0), Vec2::new(700.0, 500.0)],
            Vec2::new(800.0, 600.0),
            vec![SurfaceSpec::new(200.0, 300.0, 120.0, 0.0)],
        )
    }

    #[test]
    fn test_target_centroid() {
        let c = level().target_centroid();
        assert!((c.x - 650.0).abs() < 1e-4);
        assert!((c.y - 400.0).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_target() {
        let (t, d) = level().nearest_target(Vec2::new(700.0, 480.0)).unwrap();
        assert_eq!(t, Vec2::new(700.0, 500.0));
        assert!((d - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_target_none_without_targets() {
        let mut lvl = level();
        lvl.targets.clear();
        assert!(lvl.nearest_target(Vec2::ZERO).is_none());
        assert_eq!(lvl.target_centroid(), lvl.ball_start);
    }

    #[test]
    fn test_placed_round_trip() {
        for angle in [-PI / 3.0, 0.0, 0.25, PI / 2.0, 2.9] {
            let placed = PlacedSurface {
                pos: Vec2::new(320.0, 240.0),
                angle,
                width: 140.0,
                locked: false,
            };
            let spec = SurfaceSpec::from_placed(&placed);
            let back = spec.to_placed();
            assert!((back.angle - angle).abs() < 1e-5, "{} vs {}", back.angle, angle);
            assert_eq!(back.pos, placed.pos);
            assert_eq!(back.width, placed.width);
        }
    }

    #[test]
    fn test_capture_layout_keeps_order() {
        let placed = [
            PlacedSurface { pos: Vec2::new(1.0, 2.0), angle: 0.0, width: 50.0, locked: true },
            PlacedSurface { pos: Vec2::new(3.0, 4.0), angle: PI, width: 60.0, locked: false },
        ];
        let layout = LevelSnapshot::capture_layout(&placed);
        assert_eq!(layout.len(), 2);
        assert!(layout[0].locked);
        assert!((layout[1].angle_degrees - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_surface_json_uses_host_field_names() {
        let json = serde_json::to_string(&SurfaceSpec::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert!(json.contains("angleDegrees"));
    }
}

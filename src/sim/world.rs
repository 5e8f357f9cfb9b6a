//! Disposable physics world for a single trial
//!
//! Each trial builds its own world, steps it in a tight loop and throws it
//! away. Nothing is shared between worlds, so trials can never disturb each
//! other or the live game.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{OrientedBox, ball_box_collision, bounce_velocity};
use crate::consts::*;
use crate::level::SurfaceSpec;

/// Stable body identifier within one world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// What a static body represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Canvas boundary
    Wall,
    /// Placed surface, by slot index in the configuration
    Surface { slot: usize },
}

/// The dynamic circular ball
#[derive(Debug, Clone)]
pub struct BallBody {
    pub id: BodyId,
    pub pos: Vec2,
    /// Velocity in units per step
    pub vel: Vec2,
    pub radius: f32,
    pub restitution: f32,
    pub friction: f32,
    pub friction_air: f32,
    pub density: f32,
}

/// An immovable rectangle
#[derive(Debug, Clone)]
pub struct StaticBody {
    pub id: BodyId,
    pub kind: BodyKind,
    pub shape: OrientedBox,
    pub restitution: f32,
    pub friction: f32,
}

/// A ball starting to touch a static body
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    pub ball: BodyId,
    pub other: BodyId,
    pub kind: BodyKind,
    /// Contact point on the static body
    pub point: Vec2,
    /// Unit normal from the static body toward the ball
    pub normal: Vec2,
}

/// Isolated 2D world: one set of walls, any number of balls and surfaces
#[derive(Debug)]
pub struct World {
    pub gravity: Vec2,
    pub gravity_scale: f32,
    pub size: Vec2,
    balls: Vec<BallBody>,
    statics: Vec<StaticBody>,
    /// Ball/static pairs in contact at the end of the previous step
    touching: Vec<(BodyId, BodyId)>,
    next_id: u32,
}

impl World {
    /// Build a world with four boundary walls around a canvas
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        let mut world = Self {
            gravity: Vec2::new(GRAVITY_X, GRAVITY_Y),
            gravity_scale: GRAVITY_SCALE,
            size: Vec2::new(canvas_width, canvas_height),
            balls: Vec::new(),
            statics: Vec::with_capacity(8),
            touching: Vec::new(),
            next_id: 1,
        };

        let (w, h, t) = (canvas_width, canvas_height, WALL_THICKNESS);
        let walls = [
            // top, bottom
            (Vec2::new(w / 2.0, -t / 2.0), Vec2::new(w + 2.0 * t, t)),
            (Vec2::new(w / 2.0, h + t / 2.0), Vec2::new(w + 2.0 * t, t)),
            // left, right
            (Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t, h + 2.0 * t)),
            (Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t, h + 2.0 * t)),
        ];
        for (center, size) in walls {
            world.add_static(BodyKind::Wall, OrientedBox::new(center, size, 0.0), WALL_RESTITUTION);
        }

        world
    }

    fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    fn add_static(&mut self, kind: BodyKind, shape: OrientedBox, restitution: f32) -> BodyId {
        let id = self.next_body_id();
        self.statics.push(StaticBody {
            id,
            kind,
            shape,
            restitution,
            friction: 0.0,
        });
        id
    }

    /// Spawn the ball at rest
    pub fn spawn_ball(&mut self, x: f32, y: f32) -> BodyId {
        let id = self.next_body_id();
        self.balls.push(BallBody {
            id,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            restitution: BALL_RESTITUTION,
            friction: 0.0,
            friction_air: 0.0,
            density: BALL_DENSITY,
        });
        id
    }

    /// Spawn a placed surface for configuration slot `slot`
    pub fn spawn_surface(&mut self, spec: &SurfaceSpec, slot: usize) -> BodyId {
        let shape = OrientedBox::new(
            spec.position(),
            Vec2::new(spec.width, SURFACE_THICKNESS),
            spec.angle_radians(),
        );
        self.add_static(BodyKind::Surface { slot }, shape, SURFACE_RESTITUTION)
    }

    pub fn ball(&self, id: BodyId) -> Option<&BallBody> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: BodyId) -> Option<&mut BallBody> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn statics(&self) -> &[StaticBody] {
        &self.statics
    }

    pub fn body_count(&self) -> usize {
        self.balls.len() + self.statics.len()
    }

    /// Advance by one fixed step of `dt_ms` milliseconds
    ///
    /// Contacts that begin during this step are appended to `contacts`.
    pub fn step(&mut self, dt_ms: f32, contacts: &mut Vec<ContactEvent>) {
        let accel = self.gravity * self.gravity_scale * dt_ms * dt_ms;
        let mut now_touching = Vec::with_capacity(self.touching.len());

        for ball in &mut self.balls {
            ball.vel = (ball.vel + accel) * (1.0 - ball.friction_air);

            // Substep so a fast ball cannot skip through a thin surface
            let travel = ball.vel.length();
            let substeps = ((travel / (ball.radius * 0.5)).ceil() as u32).clamp(1, MAX_SUBSTEPS);
            let inv = 1.0 / substeps as f32;

            for _ in 0..substeps {
                ball.pos += ball.vel * inv;

                for body in &self.statics {
                    let hit = ball_box_collision(ball.pos, ball.radius, &body.shape);
                    if !hit.hit {
                        continue;
                    }

                    ball.pos += hit.normal * hit.penetration;
                    let restitution = ball.restitution.max(body.restitution);
                    ball.vel = bounce_velocity(ball.vel, hit.normal, restitution);

                    let pair = (ball.id, body.id);
                    if now_touching.contains(&pair) {
                        continue;
                    }
                    now_touching.push(pair);
                    if !self.touching.contains(&pair) {
                        contacts.push(ContactEvent {
                            ball: ball.id,
                            other: body.id,
                            kind: body.kind,
                            point: hit.point,
                            normal: hit.normal,
                        });
                    }
                }
            }
        }

        self.touching = now_touching;
    }

    /// Release every body
    pub fn dispose(mut self) {
        log::trace!("Disposing world with {} bodies", self.body_count());
        self.balls.clear();
        self.statics.clear();
        self.touching.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1000.0 / 60.0;

    #[test]
    fn test_new_world_has_four_walls() {
        let world = World::new(800.0, 600.0);
        assert_eq!(world.statics().len(), 4);
        assert!(world.statics().iter().all(|b| b.kind == BodyKind::Wall));
        assert!(world.statics().iter().all(|b| b.friction == 0.0));
    }

    #[test]
    fn test_ball_falls_under_gravity() {
        let mut world = World::new(800.0, 600.0);
        let ball = world.spawn_ball(400.0, 100.0);
        let mut contacts = Vec::new();

        world.step(DT, &mut contacts);
        let b = world.ball(ball).unwrap();
        // 0.5 * 0.001 * (1000/60)^2 per step
        assert!((b.vel.y - 0.1389).abs() < 1e-3);
        assert!(b.pos.y > 100.0);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_ball_bounces_on_floor_wall() {
        let mut world = World::new(800.0, 600.0);
        let ball = world.spawn_ball(400.0, 560.0);
        world.ball_mut(ball).unwrap().vel = Vec2::new(0.0, 30.0);

        let mut contacts = Vec::new();
        world.step(DT, &mut contacts);

        let b = world.ball(ball).unwrap();
        assert!(b.vel.y < 0.0, "ball should rebound, vel {:?}", b.vel);
        assert!(b.pos.y <= 600.0 - b.radius + 1e-3);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].kind, BodyKind::Wall);
    }

    #[test]
    fn test_surface_contact_reported_once_while_touching() {
        let mut world = World::new(800.0, 600.0);
        let spec = SurfaceSpec::new(400.0, 300.0, 200.0, 0.0);
        world.spawn_surface(&spec, 0);
        let ball = world.spawn_ball(400.0, 250.0);
        world.ball_mut(ball).unwrap().vel = Vec2::new(0.0, 25.0);

        let mut contacts = Vec::new();
        world.step(DT, &mut contacts);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].kind, BodyKind::Surface { slot: 0 });
        assert!((contacts[0].normal - Vec2::new(0.0, -1.0)).length() < 1e-4);
    }

    #[test]
    fn test_fast_ball_does_not_tunnel_through_surface() {
        let mut world = World::new(800.0, 600.0);
        world.spawn_surface(&SurfaceSpec::new(400.0, 300.0, 300.0, 0.0), 0);
        let ball = world.spawn_ball(400.0, 230.0);
        world.ball_mut(ball).unwrap().vel = Vec2::new(0.0, 100.0);

        let mut contacts = Vec::new();
        world.step(DT, &mut contacts);
        let b = world.ball(ball).unwrap();
        assert!(b.pos.y < 300.0, "ball tunneled to {:?}", b.pos);
        assert!(b.vel.y < 0.0);
    }

    #[test]
    fn test_dispose_consumes_world() {
        let mut world = World::new(100.0, 100.0);
        world.spawn_ball(50.0, 50.0);
        assert_eq!(world.body_count(), 5);
        world.dispose();
    }
}

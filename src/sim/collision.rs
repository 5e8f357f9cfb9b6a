//! Collision detection and response for rotated boxes
//!
//! Every static body in a trial world (walls and placed surfaces) is an
//! oriented rectangle; the only dynamic body is the circular ball.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point on the box surface (if hit)
    pub point: Vec2,
    /// Unit surface normal, pointing from the box toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// An oriented rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Rotation in radians
    pub angle: f32,
}

impl OrientedBox {
    pub fn new(center: Vec2, size: Vec2, angle: f32) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
            angle,
        }
    }

    /// World point into box-local coordinates
    #[inline]
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        Vec2::from_angle(-self.angle).rotate(point - self.center)
    }

    /// Box-local direction into world coordinates
    #[inline]
    pub fn rotate_to_world(&self, local: Vec2) -> Vec2 {
        Vec2::from_angle(self.angle).rotate(local)
    }

    /// Box-local point into world coordinates
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.center + self.rotate_to_world(local)
    }
}

/// Check collision between a ball and an oriented box
pub fn ball_box_collision(ball_pos: Vec2, ball_radius: f32, obb: &OrientedBox) -> CollisionResult {
    let local = obb.to_local(ball_pos);
    let he = obb.half_extents;

    // Early out on the expanded box
    if local.x.abs() > he.x + ball_radius || local.y.abs() > he.y + ball_radius {
        return CollisionResult::miss();
    }

    let closest = local.clamp(-he, he);
    let offset = local - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > 1e-8 {
        // Center is outside the box
        let dist = dist_sq.sqrt();
        if dist >= ball_radius {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            point: obb.to_world(closest),
            normal: obb.rotate_to_world(offset / dist),
            penetration: ball_radius - dist,
        };
    }

    // Center is inside the box (tunneling): push out along the shallowest face
    let depth_x = he.x - local.x.abs();
    let depth_y = he.y - local.y.abs();
    let (local_normal, face_point, depth) = if depth_x < depth_y {
        let sign = if local.x >= 0.0 { 1.0 } else { -1.0 };
        (Vec2::new(sign, 0.0), Vec2::new(sign * he.x, local.y), depth_x)
    } else {
        let sign = if local.y >= 0.0 { 1.0 } else { -1.0 };
        (Vec2::new(0.0, sign), Vec2::new(local.x, sign * he.y), depth_y)
    };

    CollisionResult {
        hit: true,
        point: obb.to_world(face_point),
        normal: obb.rotate_to_world(local_normal),
        penetration: ball_radius + depth,
    }
}

/// Bounce off a static surface, keeping tangential speed (frictionless)
///
/// Only the approaching normal component is reversed and scaled by
/// `restitution`; a ball already separating is left alone.
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * vn * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_ball_resting_on_flat_box() {
        let floor = OrientedBox::new(Vec2::new(0.0, 100.0), Vec2::new(200.0, 20.0), 0.0);

        // Box top edge at y = 90; ball of radius 20 centered at y = 75
        let result = ball_box_collision(Vec2::new(10.0, 75.0), 20.0, &floor);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(0.0, -1.0)).length() < 1e-5);
        assert!((result.penetration - 5.0).abs() < 1e-4);
        assert!((result.point - Vec2::new(10.0, 90.0)).length() < 1e-4);
    }

    #[test]
    fn test_ball_misses_box() {
        let floor = OrientedBox::new(Vec2::new(0.0, 100.0), Vec2::new(200.0, 20.0), 0.0);
        assert!(!ball_box_collision(Vec2::new(0.0, 60.0), 20.0, &floor).hit);
        assert!(!ball_box_collision(Vec2::new(300.0, 100.0), 20.0, &floor).hit);
    }

    #[test]
    fn test_rotated_box_normal() {
        // 45° clockwise ramp; a ball above its center should be pushed up-right
        let ramp = OrientedBox::new(Vec2::ZERO, Vec2::new(200.0, 20.0), FRAC_PI_4);
        let up = ramp.rotate_to_world(Vec2::new(0.0, -1.0));
        let ball = up * 25.0;

        let result = ball_box_collision(ball, 20.0, &ramp);
        assert!(result.hit);
        assert!((result.normal - up).length() < 1e-4);
        assert!(result.normal.x > 0.0 && result.normal.y < 0.0);
    }

    #[test]
    fn test_center_inside_box() {
        let slab = OrientedBox::new(Vec2::ZERO, Vec2::new(200.0, 20.0), 0.0);
        let result = ball_box_collision(Vec2::new(0.0, 4.0), 20.0, &slab);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, 1.0));
        assert!((result.penetration - 26.0).abs() < 1e-4);
    }

    #[test]
    fn test_corner_contact() {
        let slab = OrientedBox::new(Vec2::ZERO, Vec2::new(100.0, 20.0), 0.0);
        // Just past the right-bottom corner (50, 10)
        let result = ball_box_collision(Vec2::new(60.0, 20.0), 20.0, &slab);
        assert!(result.hit);
        assert!((result.point - Vec2::new(50.0, 10.0)).length() < 1e-4);
        assert!((result.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_keeps_tangent_and_scales_normal() {
        let v = bounce_velocity(Vec2::new(3.0, 10.0), Vec2::new(0.0, -1.0), 0.5);
        assert!((v.x - 3.0).abs() < 1e-5);
        assert!((v.y - (-5.0)).abs() < 1e-5);

        // Separating ball is untouched
        let v = bounce_velocity(Vec2::new(3.0, -10.0), Vec2::new(0.0, -1.0), 0.5);
        assert_eq!(v, Vec2::new(3.0, -10.0));
    }
}

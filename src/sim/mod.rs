//! Headless physics for solver trials
//!
//! Trials must be isolated and reproducible:
//! - Fixed timestep only
//! - One fresh world per trial, disposed when the trial ends
//! - No rendering or platform dependencies

pub mod collision;
pub mod trial;
pub mod world;

pub use collision::{CollisionResult, OrientedBox, ball_box_collision, bounce_velocity};
pub use trial::{CollisionEvent, TrialResult, run_trial};
pub use world::{BallBody, BodyId, BodyKind, ContactEvent, StaticBody, World};

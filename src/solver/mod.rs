//! Level solver
//!
//! Simulated-annealing search over surface layouts. The controller asks the
//! generator for a candidate, rolls it out in a fresh physics world, records
//! the result and cools the temperature, one attempt per scheduled step.

pub mod controller;
pub mod generator;
pub mod schedule;
pub mod store;

pub use controller::{Progress, Solver, SolverPhase, SolverState};
pub use generator::{ErrorVector, GenerationContext, error_bias, generate_config};
pub use schedule::drive;
#[cfg(not(target_arch = "wasm32"))]
pub use schedule::drive_with_tokio;
pub use store::AttemptLog;

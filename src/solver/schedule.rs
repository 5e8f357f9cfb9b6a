//! Cooperative attempt scheduling
//!
//! After each attempt the driver yields to the host for the configured delay,
//! then runs the next one. Only the live run may advance: a continuation
//! whose run was stopped or restarted while it slept returns without
//! touching the solver.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use super::controller::{Solver, SolverPhase};
use crate::error::SolverResult;

/// Keep advancing the current run until it solves, exhausts, or is cancelled
///
/// `sleep` supplies the host's timer (tokio natively, `setTimeout` in the
/// browser). The solver is never borrowed across an await, so the host can
/// poll or stop it while the driver sleeps.
///
/// Returns the phase the run ended in, or `Idle` if it was stopped or
/// replaced by a newer run.
pub async fn drive<S, F>(solver: Rc<RefCell<Solver>>, mut sleep: S) -> SolverResult<SolverPhase>
where
    S: FnMut(Duration) -> F,
    F: Future<Output = ()>,
{
    let (run_id, delay) = {
        let s = solver.borrow();
        (s.state().run_id, s.attempt_delay())
    };

    loop {
        {
            let s = solver.borrow();
            if !s.is_current(run_id) {
                return Ok(finished_phase(&s, run_id));
            }
        }

        sleep(delay).await;

        let mut s = solver.borrow_mut();
        if !s.is_current(run_id) {
            log::debug!("Dropping continuation of run {run_id}");
            return Ok(finished_phase(&s, run_id));
        }
        s.iterate()?;
    }
}

fn finished_phase(solver: &Solver, run_id: u64) -> SolverPhase {
    if solver.state().run_id == run_id {
        solver.state().phase
    } else {
        SolverPhase::Idle
    }
}

/// Drive the current run using tokio's timer
#[cfg(not(target_arch = "wasm32"))]
pub async fn drive_with_tokio(solver: Rc<RefCell<Solver>>) -> SolverResult<SolverPhase> {
    drive(solver, tokio::time::sleep).await
}

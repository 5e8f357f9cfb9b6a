//! Browser binding for the solver
//!
//! The game page creates one `WebSolver` per loaded level, starts it from a
//! button handler and polls `progress()` / `state()` every frame.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::level::{Configuration, LevelSnapshot, PlacedSurface};
use crate::settings::{SolveMode, SolverConfig};
use crate::solver::{Solver, drive};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Set up console logging and panic reporting (call once at page load)
#[wasm_bindgen]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Resolve after `delay` using `setTimeout`
///
/// Outside a window (e.g. in a worker) there is no timer to wait on, so the
/// next attempt runs right away instead of stalling the run forever.
async fn sleep(delay: Duration) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window available, running next attempt without delay");
        return;
    };
    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms) {
            let _ = reject.call1(&JsValue::NULL, &err);
        }
    });
    if JsFuture::from(promise).await.is_err() {
        log::warn!("setTimeout failed, running next attempt without delay");
    }
}

/// JS handle owning one level's solver
#[wasm_bindgen]
pub struct WebSolver {
    inner: Rc<RefCell<Solver>>,
}

#[wasm_bindgen]
impl WebSolver {
    /// `level_json` is a serialized `LevelSnapshot`; `config_json` may be empty
    #[wasm_bindgen(constructor)]
    pub fn new(level_json: &str, config_json: &str, seed: u64) -> Result<WebSolver, JsValue> {
        let level: LevelSnapshot = serde_json::from_str(level_json).map_err(to_js)?;
        let config = if config_json.trim().is_empty() {
            SolverConfig::default()
        } else {
            SolverConfig::from_json(config_json).map_err(to_js)?
        };
        let solver = Solver::new(level, config, seed).map_err(to_js)?;
        Ok(WebSolver {
            inner: Rc::new(RefCell::new(solver)),
        })
    }

    /// Start a run; `layout_json` is the player's `PlacedSurface[]` for refine mode
    pub fn start(&self, mode: &str, layout_json: Option<String>) -> Result<(), JsValue> {
        let mode = SolveMode::from_str(mode).ok_or_else(|| to_js(format!("unknown mode {mode}")))?;
        let user_config: Option<Configuration> = match layout_json {
            Some(json) => {
                let placed: Vec<PlacedSurface> = serde_json::from_str(&json).map_err(to_js)?;
                Some(LevelSnapshot::capture_layout(&placed))
            }
            None => None,
        };

        self.inner.borrow_mut().start(mode, user_config).map_err(to_js)?;

        let inner = self.inner.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = drive(inner, sleep).await {
                log::error!("Solver aborted: {err}");
            }
        });
        Ok(())
    }

    pub fn stop(&self) {
        self.inner.borrow_mut().stop();
    }

    pub fn running(&self) -> bool {
        self.inner.borrow().state().is_running()
    }

    /// Compact progress snapshot as JSON
    pub fn progress(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.borrow().progress()).map_err(to_js)
    }

    /// Full solver state (attempts included) as JSON
    pub fn state(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.borrow().state()).map_err(to_js)
    }

    /// Best layout so far in game form (radians), or null
    pub fn best_layout(&self) -> Result<Option<String>, JsValue> {
        let solver = self.inner.borrow();
        let Some(best) = solver.state().best_config.as_ref() else {
            return Ok(None);
        };
        let placed: Vec<PlacedSurface> = best.iter().map(|s| s.to_placed()).collect();
        serde_json::to_string(&placed).map(Some).map_err(to_js)
    }
}

//! Ricochet entry point
//!
//! Native builds run the solver headless on a demo level and print the
//! outcome. The browser build goes through `platform::web` instead.
//!
//! Usage: `ricochet [seed] [explore|refine] [--json] [--fast]`

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ricochet::platform::init_logging;
    use ricochet::solver::{Solver, drive_with_tokio};
    use ricochet::{SolveMode, SolverConfig};

    init_logging();

    let mut seed: u64 = rand::random();
    let mut mode = SolveMode::Explore;
    let mut json = false;
    let mut fast = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else if arg == "--fast" {
            fast = true;
        } else if let Some(m) = SolveMode::from_str(&arg) {
            mode = m;
        } else if let Ok(s) = arg.parse() {
            seed = s;
        } else {
            log::warn!("Ignoring unknown argument {arg}");
        }
    }

    let level = demo::level();
    let mut config = SolverConfig::default();
    if fast {
        config = config.with_attempt_delay_ms(0);
    }
    log::info!("Ricochet (native) solving demo level, seed {seed}");

    let user_config = (mode == SolveMode::Refine).then(demo::player_layout);
    let solver = Rc::new(RefCell::new(Solver::new(level, config, seed)?));
    solver.borrow_mut().start(mode, user_config)?;
    let phase = drive_with_tokio(solver.clone()).await?;

    let solver = solver.borrow();
    let state = solver.state();
    if json {
        println!("{}", state.attempts.to_json()?);
        return Ok(());
    }

    println!("Finished: {phase:?} after {} attempts", state.current_attempt_index);
    println!("Best distance: {:.1}", state.best_distance);
    if let Some(best) = &state.best_config {
        for (slot, s) in best.iter().enumerate() {
            let lock = if s.locked { " (locked)" } else { "" };
            println!(
                "  slot {slot}: x={:.1} y={:.1} w={:.0} angle={:.1}°{lock}",
                s.x, s.y, s.width, s.angle_degrees
            );
        }
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use ricochet::{Configuration, LevelSnapshot, PlacedSurface, SurfaceSpec};

    /// Ball top-left, one target lower right, one free surface
    pub fn level() -> LevelSnapshot {
        LevelSnapshot::new(
            Vec2::new(150.0, 100.0),
            vec![Vec2::new(650.0, 350.0)],
            Vec2::new(800.0, 600.0),
            vec![
                SurfaceSpec::new(400.0, 590.0, 200.0, 0.0).locked(),
                SurfaceSpec::new(150.0, 400.0, 140.0, 0.0),
            ],
        )
    }

    /// A hand-placed layout close to a solution, as the game would capture it
    pub fn player_layout() -> Configuration {
        let placed = [
            PlacedSurface {
                pos: Vec2::new(400.0, 590.0),
                angle: 0.0,
                width: 200.0,
                locked: true,
            },
            PlacedSurface {
                pos: Vec2::new(160.0, 380.0),
                angle: 35.0_f32.to_radians(),
                width: 140.0,
                locked: false,
            },
        ];
        LevelSnapshot::capture_layout(&placed)
    }
}

//! Solver settings
//!
//! Every tunable constant of the search lives here. Defaults reproduce the
//! shipped game's feel; hosts may load overrides from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// Search mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SolveMode {
    /// Search from the level's default layout
    #[default]
    Explore,
    /// Search around the player's current layout
    Refine,
}

impl SolveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveMode::Explore => "explore",
            SolveMode::Refine => "refine",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "explore" | "solve" => Some(SolveMode::Explore),
            "refine" => Some(SolveMode::Refine),
            _ => None,
        }
    }
}

/// Tunable solver constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    // === Budget ===
    /// Attempt budget in explore mode
    pub explore_max_attempts: usize,
    /// Attempt budget in refine mode
    pub refine_max_attempts: usize,
    /// Starting temperature in explore mode
    pub explore_temperature: f32,
    /// Starting (and held) temperature in refine mode
    pub refine_temperature: f32,
    /// Pause between attempts (milliseconds)
    pub attempt_delay_ms: u64,

    // === Trial ===
    /// Physics steps per trial
    pub steps_per_trial: u32,
    /// Length of one physics step (milliseconds)
    pub step_ms: f32,
    /// Ball-to-target distance that counts as a hit
    pub capture_radius: f32,
    /// Ball speed cap (units per step)
    pub max_ball_speed: f32,

    // === Generation ===
    /// Position jitter at temperature 0
    pub position_jitter_base: f32,
    /// Extra position jitter at temperature 1
    pub position_jitter_span: f32,
    /// Angle jitter at temperature 0 (degrees)
    pub angle_jitter_base: f32,
    /// Extra angle jitter at temperature 1 (degrees)
    pub angle_jitter_span: f32,
    /// How many recent error vectors feed the bias
    pub error_window: usize,
    /// Error bias strength at temperature 0
    pub error_bias_gain: f32,
    /// Surfaces this close (horizontally) to the target centroid keep their angle
    pub centroid_proximity: f32,
    /// The first free surface may sit at most this far above the ball start
    pub first_surface_headroom: f32,
    /// Tilt band toward the target side: (min, max) degrees
    pub tilt_band: (f32, f32),
    /// Intercept distance tiers below the ball: far, mid, near (base, spread)
    pub intercept_far: (f32, f32),
    pub intercept_mid: (f32, f32),
    pub intercept_near: (f32, f32),
    /// Horizontal distance thresholds for the far and mid tiers
    pub intercept_far_threshold: f32,
    pub intercept_mid_threshold: f32,
    /// Intercept shrink when targets sit above the ball
    pub intercept_rising_factor: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            // Budget
            explore_max_attempts: 50,
            refine_max_attempts: 30,
            explore_temperature: 1.0,
            refine_temperature: 0.2,
            attempt_delay_ms: 100,

            // Trial: ~5 simulated seconds at 60 Hz
            steps_per_trial: 300,
            step_ms: 1000.0 / 60.0,
            capture_radius: 30.0,
            max_ball_speed: 100.0,

            // Generation
            position_jitter_base: 30.0,
            position_jitter_span: 170.0,
            angle_jitter_base: 15.0,
            angle_jitter_span: 65.0,
            error_window: 10,
            error_bias_gain: 0.3,
            centroid_proximity: 50.0,
            first_surface_headroom: 20.0,
            tilt_band: (10.0, 70.0),
            intercept_far: (250.0, 100.0),
            intercept_mid: (180.0, 80.0),
            intercept_near: (120.0, 60.0),
            intercept_far_threshold: 400.0,
            intercept_mid_threshold: 200.0,
            intercept_rising_factor: 0.6,
        }
    }
}

impl SolverConfig {
    /// Attempt budget for a mode
    pub fn max_attempts(&self, mode: SolveMode) -> usize {
        match mode {
            SolveMode::Explore => self.explore_max_attempts,
            SolveMode::Refine => self.refine_max_attempts,
        }
    }

    /// Temperature a run starts at
    pub fn initial_temperature(&self, mode: SolveMode) -> f32 {
        match mode {
            SolveMode::Explore => self.explore_temperature,
            SolveMode::Refine => self.refine_temperature,
        }
    }

    /// Position jitter half-range at `temperature`
    pub fn position_jitter(&self, temperature: f32) -> f32 {
        self.position_jitter_base + self.position_jitter_span * temperature
    }

    /// Angle jitter half-range (degrees) at `temperature`
    pub fn angle_jitter(&self, temperature: f32) -> f32 {
        self.angle_jitter_base + self.angle_jitter_span * temperature
    }

    pub fn with_max_attempts(mut self, explore: usize, refine: usize) -> Self {
        self.explore_max_attempts = explore;
        self.refine_max_attempts = refine;
        self
    }

    pub fn with_steps_per_trial(mut self, steps: u32) -> Self {
        self.steps_per_trial = steps;
        self
    }

    pub fn with_attempt_delay_ms(mut self, ms: u64) -> Self {
        self.attempt_delay_ms = ms;
        self
    }

    pub fn with_capture_radius(mut self, radius: f32) -> Self {
        self.capture_radius = radius;
        self
    }

    /// Reject values the search cannot run with
    pub fn validate(&self) -> SolverResult<()> {
        let fail = |msg: String| Err(SolverError::InvalidConfig(msg));

        if self.explore_max_attempts == 0 || self.refine_max_attempts == 0 {
            return fail("attempt budgets must be at least 1".into());
        }
        for (name, t) in [
            ("explore_temperature", self.explore_temperature),
            ("refine_temperature", self.refine_temperature),
        ] {
            if !(0.0..=1.0).contains(&t) {
                return fail(format!("{name} must be in [0, 1], got {t}"));
            }
        }
        if self.steps_per_trial == 0 {
            return fail("steps_per_trial must be at least 1".into());
        }
        if !(self.step_ms > 0.0) {
            return fail(format!("step_ms must be positive, got {}", self.step_ms));
        }
        if !(self.capture_radius > 0.0) {
            return fail(format!("capture_radius must be positive, got {}", self.capture_radius));
        }
        if !(self.max_ball_speed > 0.0) {
            return fail(format!("max_ball_speed must be positive, got {}", self.max_ball_speed));
        }
        for (name, v) in [
            ("position_jitter_base", self.position_jitter_base),
            ("position_jitter_span", self.position_jitter_span),
            ("angle_jitter_base", self.angle_jitter_base),
            ("angle_jitter_span", self.angle_jitter_span),
            ("error_bias_gain", self.error_bias_gain),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return fail(format!("{name} must be finite and non-negative, got {v}"));
            }
        }
        // Base + span can still overflow at full temperature
        if !self.position_jitter(1.0).is_finite() || !self.angle_jitter(1.0).is_finite() {
            return fail("jitter overflows at temperature 1".into());
        }
        for (name, (a, b)) in [
            ("tilt_band", self.tilt_band),
            ("intercept_far", self.intercept_far),
            ("intercept_mid", self.intercept_mid),
            ("intercept_near", self.intercept_near),
        ] {
            if !a.is_finite() || !b.is_finite() {
                return fail(format!("{name} must be finite, got ({a}, {b})"));
            }
        }
        if self.tilt_band.0 > self.tilt_band.1 {
            return fail(format!("tilt_band is inverted: {:?}", self.tilt_band));
        }
        Ok(())
    }

    /// Load settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> SolverResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!("Loaded solver config from JSON");
        Ok(config)
    }

    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! Hourglass Flip - an hourglass-flipping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic particle simulation (sand, gold, hourglass collision)
//! - `session`: Score, timer, levels and the flip/pause/restart commands
//! - `renderer`: Frame building and the WebGPU pipeline
//! - `settings`: Data-driven configuration

pub mod error;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, RenderError};
pub use session::{GameEvent, Session};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration defaults
pub mod consts {
    /// Canvas size the defaults are laid out for
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Hourglass defaults
    pub const HOURGLASS_WIDTH: f32 = 120.0;
    pub const HOURGLASS_HEIGHT: f32 = 200.0;
    /// Vertical half-thickness of the neck band
    pub const NECK_HALF_HEIGHT: f32 = 10.0;

    /// Sand defaults
    pub const MAX_SAND: usize = 200;
    /// Largest accepted particle cap
    pub const MAX_SAND_LIMIT: usize = 100_000;
    pub const FLOW_RATE: f32 = 0.001;
    pub const GRAVITY: f32 = 0.5;
    /// 1.0 = full top bulb at start
    pub const SAND_LEVEL: f32 = 1.0;

    /// Velocity tuned per frame; delta (seconds) is multiplied by this
    pub const FRAMES_PER_SECOND: f32 = 60.0;
    /// Per-frame drag
    pub const DRAG_X: f32 = 0.99;
    pub const DRAG_Y: f32 = 0.995;
    /// Restitution on bulb walls and on the neck
    pub const BULB_RESTITUTION: f32 = -0.3;
    pub const NECK_RESTITUTION: f32 = -0.5;
    /// Particles this far above or below the canvas are dropped
    pub const CULL_MARGIN: f32 = 50.0;

    /// Gold particles
    pub const GOLD_CHANCE: f32 = 0.3;
    pub const GOLD_GRAVITY: f32 = 0.2;
    pub const SPARKLE_SPEED: f32 = 0.1;
    pub const PICKUP_RADIUS: f32 = 30.0;

    /// Collection effect burst
    pub const BURST_SIZE: usize = 5;
    pub const EFFECT_FADE: f32 = 0.05;
    pub const EFFECT_SHRINK: f32 = 0.98;

    /// Session rules
    pub const SESSION_SECONDS: i32 = 30;
    pub const FLIP_COOLDOWN_MS: f64 = 500.0;
    pub const FLIP_SCORE: u64 = 10;
    pub const GOLD_SCORE: u64 = 50;
    pub const GOLD_BONUS_SECONDS: i32 = 2;
    pub const LEVEL_UP_EVERY: i32 = 10;
    pub const LEVEL_UP_BONUS_SECONDS: i32 = 5;
    pub const FLOW_RATE_STEP: f32 = 0.0005;
    pub const GRAVITY_STEP: f32 = 0.1;

    /// Flip animation settle
    pub const FLIP_SETTLE: f32 = 0.9;
    pub const FLIP_SNAP: f32 = 0.01;
}

/// Number of 60 Hz frames `delta` seconds represent
#[inline]
pub fn frame_scale(delta: f32) -> f32 {
    delta * consts::FRAMES_PER_SECOND
}

/// Rotate `point` around `pivot` by `angle` radians
#[inline]
pub fn rotate_about(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(point - pivot)
}

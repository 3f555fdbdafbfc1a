//! Bubble Pop - A timed arcade game about popping floating bubbles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, combos, session state)
//! - `config`: Data-driven game balance
//! - `settings`: Player preferences (audio, screen shake)
//! - `highscore`: Persisted best score
//! - `feedback`: Audio/screen-shake reactions to game events

pub mod config;
pub mod feedback;
pub mod highscore;
pub mod settings;
pub mod sim;

pub use config::{GameConfig, Viewport};
pub use highscore::{HighScoreStore, MemoryStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Round length in seconds
    pub const GAME_DURATION_SECS: u32 = 30;
    /// Countdown granularity (ms)
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;

    /// Pixels moved per velocity unit per millisecond
    pub const KINEMATICS_SCALE: f32 = 0.05;
    /// How many entity sizes past an edge before vertical recycling kicks in
    pub const RECYCLE_MARGIN: f32 = 2.0;

    /// Bubble defaults
    pub const MIN_SIZE: f32 = 30.0;
    pub const MAX_SIZE: f32 = 80.0;
    pub const SPAWN_INTERVAL_MS: u64 = 150;
    pub const MIN_COUNT: usize = 10;
    pub const MAX_COUNT: usize = 50;
    pub const SPECIAL_CHANCE: f64 = 0.15;
    pub const SPECIAL_POINTS: u64 = 5;
    pub const REGULAR_POINTS: u64 = 1;
    pub const VELOCITY_MIN: f32 = 0.5;
    pub const VELOCITY_MAX: f32 = 1.4;

    /// Combo window (ms) - a pop within this of the previous one continues the chain
    pub const COMBO_TIMEOUT_MS: u64 = 1500;
    /// How long a combo message stays on screen (ms)
    pub const COMBO_MESSAGE_DURATION_MS: u64 = 1500;

    /// Screen shake defaults
    pub const SCREEN_SHAKE_DURATION_MS: u64 = 300;
    pub const SCREEN_SHAKE_DEFAULT_INTENSITY: f32 = 2.0;

    /// Default viewport (used by the headless binary and tests)
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;
}

/// Wrap a coordinate around a torus of `[-size, extent]`
#[inline]
pub fn wrap_coordinate(value: f32, size: f32, extent: f32) -> f32 {
    if value > extent {
        -size
    } else if value < -size {
        extent
    } else {
        value
    }
}

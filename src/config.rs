//! Data-driven game balance
//!
//! Everything tunable about a round lives here. `Default` reproduces the
//! shipped values from `consts`; a JSON file can override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Visible play area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Inclusive `[min, max]` range for velocity magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityRange {
    pub min: f32,
    pub max: f32,
}

/// Bubble spawning and scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub min_size: f32,
    pub max_size: f32,
    /// Spawn tick period (ms)
    pub spawn_interval_ms: u64,
    /// Spawn floor: top up to this many in a single tick
    pub min_count: usize,
    /// Spawn cap: never exceed this many live bubbles
    pub max_count: usize,
    /// Regular palette (0xRRGGBB)
    pub colors: Vec<u32>,
    /// Special palette (0xRRGGBB)
    pub special_colors: Vec<u32>,
    pub special_chance: f64,
    pub special_points: u64,
    pub regular_points: u64,
    pub velocity: VelocityRange,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE,
            max_size: MAX_SIZE,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            min_count: MIN_COUNT,
            max_count: MAX_COUNT,
            colors: vec![
                0xF472B6, // pink
                0xA78BFA, // purple
                0x60A5FA, // blue
                0x34D399, // green
                0xFBBF24, // yellow
                0x818CF8, // indigo
                0x2DD4BF, // teal
            ],
            special_colors: vec![
                0xE11D48, // rose
                0xEA580C, // amber
                0x16A34A, // emerald
            ],
            special_chance: SPECIAL_CHANCE,
            special_points: SPECIAL_POINTS,
            regular_points: REGULAR_POINTS,
            velocity: VelocityRange {
                min: VELOCITY_MIN,
                max: VELOCITY_MAX,
            },
        }
    }
}

/// One rung of the combo ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboThreshold {
    pub count: u32,
    pub label: String,
    /// Screen shake / audio intensity for this rung
    pub intensity: f32,
}

impl ComboThreshold {
    pub fn new(count: u32, label: &str, intensity: f32) -> Self {
        Self {
            count,
            label: label.to_string(),
            intensity,
        }
    }
}

/// Combo timing and threshold ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    pub timeout_ms: u64,
    pub message_duration_ms: u64,
    /// Ascending by `count`
    pub thresholds: Vec<ComboThreshold>,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            timeout_ms: COMBO_TIMEOUT_MS,
            message_duration_ms: COMBO_MESSAGE_DURATION_MS,
            thresholds: vec![
                ComboThreshold::new(2, "×2 Combo!", 2.0),
                ComboThreshold::new(4, "×3 Combo!", 3.0),
                ComboThreshold::new(6, "×4 Combo!", 4.0),
                ComboThreshold::new(8, "×5 Combo!", 5.0),
                ComboThreshold::new(10, "Super Combo!", 7.0),
                ComboThreshold::new(15, "Ultra Combo!", 10.0),
                ComboThreshold::new(20, "INFINITY COMBO!", 15.0),
            ],
        }
    }
}

impl ComboConfig {
    /// Exact-match lookup; a skipped count never produces a message
    pub fn threshold_for(&self, count: u32) -> Option<&ComboThreshold> {
        self.thresholds.iter().find(|t| t.count == count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenShakeConfig {
    pub duration_ms: u64,
    pub default_intensity: f32,
}

impl Default for ScreenShakeConfig {
    fn default() -> Self {
        Self {
            duration_ms: SCREEN_SHAKE_DURATION_MS,
            default_intensity: SCREEN_SHAKE_DEFAULT_INTENSITY,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Round length (seconds)
    pub duration_secs: u32,
    pub viewport: Viewport,
    pub bubble: BubbleConfig,
    pub combo: ComboConfig,
    pub screen_shake: ScreenShakeConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            duration_secs: GAME_DURATION_SECS,
            viewport: Viewport::default(),
            bubble: BubbleConfig::default(),
            combo: ComboConfig::default(),
            screen_shake: ScreenShakeConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded game config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid game config {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read game config {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

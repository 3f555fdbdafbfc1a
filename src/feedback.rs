//! Audio and screen-shake reactions to game events
//!
//! Fire-and-forget: nothing here feeds back into the simulation. The actual
//! sound backend sits behind `AudioSink`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::ScreenShakeConfig;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Regular bubble popped
    Pop,
    /// Special bubble popped
    SpecialPop,
    /// Combo threshold crossed
    Combo,
    /// Previous best beaten
    HighScore,
    /// Time's up
    GameOver,
}

impl SoundEffect {
    /// Per-effect mix level before settings are applied
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Pop | SoundEffect::SpecialPop => 0.5,
            SoundEffect::Combo => 0.6,
            SoundEffect::HighScore | SoundEffect::GameOver => 0.7,
        }
    }
}

/// Sound backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend for headless runs: just logs
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("play {:?} at {:.2}", effect, volume);
    }
}

/// Linear-decay shake envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenShake {
    intensity: f32,
    started_at: u64,
    duration_ms: u64,
    active: bool,
}

impl ScreenShake {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            intensity: 0.0,
            started_at: 0,
            duration_ms,
            active: false,
        }
    }

    /// Start (or restart) a shake; the newest trigger wins
    pub fn trigger(&mut self, intensity: f32, now: u64) {
        self.intensity = intensity;
        self.started_at = now;
        self.active = true;
    }

    /// Current amplitude in pixels
    pub fn magnitude(&self, now: u64) -> f32 {
        if !self.active || self.duration_ms == 0 {
            return 0.0;
        }
        let elapsed = now.saturating_sub(self.started_at) as f32;
        let progress = (elapsed / self.duration_ms as f32).min(1.0);
        self.intensity * (1.0 - progress)
    }
}

pub struct FeedbackDispatcher<A: AudioSink> {
    audio: A,
    settings: Settings,
    shake: ScreenShake,
    default_intensity: f32,
    rng: Pcg32,
}

impl<A: AudioSink> FeedbackDispatcher<A> {
    pub fn new(audio: A, settings: Settings, config: &ScreenShakeConfig, seed: u64) -> Self {
        Self {
            audio,
            settings,
            shake: ScreenShake::new(config.duration_ms),
            default_intensity: config.default_intensity,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn shake(&self) -> &ScreenShake {
        &self.shake
    }

    pub fn dispatch_all(&mut self, events: &[GameEvent], now: u64) {
        for event in events {
            self.dispatch(event, now);
        }
    }

    pub fn dispatch(&mut self, event: &GameEvent, now: u64) {
        match event {
            GameEvent::Popped { special, .. } => {
                let effect = if *special {
                    SoundEffect::SpecialPop
                } else {
                    SoundEffect::Pop
                };
                self.play(effect);
                self.trigger_shake(self.default_intensity, now);
            }
            GameEvent::ComboThreshold { intensity, .. } => {
                self.play(SoundEffect::Combo);
                self.trigger_shake(*intensity, now);
            }
            GameEvent::NewHighScore { .. } => self.play(SoundEffect::HighScore),
            GameEvent::RoundEnded { .. } => self.play(SoundEffect::GameOver),
            GameEvent::ComboReset => {}
        }
    }

    /// Jittered screen offset for this frame
    pub fn shake_offset(&mut self, now: u64) -> Vec2 {
        let magnitude = self.shake.magnitude(now);
        if magnitude <= 0.0 {
            return Vec2::ZERO;
        }
        let x = (self.rng.random::<f32>() - 0.5) * 2.0 * magnitude;
        let y = (self.rng.random::<f32>() - 0.5) * 2.0 * magnitude;
        Vec2::new(x, y)
    }

    fn play(&mut self, effect: SoundEffect) {
        let volume = self.settings.effective_volume() * effect.base_volume();
        if volume <= 0.0 {
            return;
        }
        self.audio.play(effect, volume);
    }

    fn trigger_shake(&mut self, intensity: f32, now: u64) {
        if self.settings.effective_screen_shake() {
            self.shake.trigger(intensity, now);
        }
    }
}

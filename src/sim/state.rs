//! Session state machine
//!
//! `GameSession` is the only place score, high score, countdown, phase and
//! the live bubble set are mutated. Every transition is total: events that
//! make no sense in the current phase (a pop after the round ended, a frame
//! tick while paused) are dropped without error, because input, timers and
//! animation callbacks are never synchronized with phase changes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::RoundClock;
use super::combo::{ComboStep, ComboTracker};
use super::entity::{Bubble, EntityId};
use super::{kinematics, spawner};
use crate::config::{GameConfig, Viewport};
use crate::highscore::HighScoreStore;

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen: no motion, no spawning, no countdown
    Paused,
    /// Time ran out (terminal)
    Ended,
}

/// Transient "Super Combo!" style banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboMessage {
    pub id: u32,
    pub pos: Vec2,
    pub text: String,
    pub intensity: f32,
    pub created_at: u64,
}

/// Things the feedback layer reacts to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Popped {
        id: EntityId,
        pos: Vec2,
        points: u64,
        special: bool,
        combo: u32,
    },
    ComboThreshold {
        count: u32,
        label: String,
        intensity: f32,
        pos: Vec2,
    },
    /// Combo lapsed from inactivity
    ComboReset,
    /// First time this round that the stored best was beaten
    NewHighScore { score: u64 },
    RoundEnded {
        score: u64,
        high_score: u64,
        new_best: bool,
    },
}

/// Read-only view for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub high_score: u64,
    pub combo: u32,
    pub time_remaining: u32,
    pub phase: GamePhase,
    pub bubbles: Vec<Bubble>,
    pub combo_messages: Vec<ComboMessage>,
}

pub struct GameSession {
    config: GameConfig,
    /// Seed of the current round
    seed: u64,
    rng: Pcg32,
    phase: GamePhase,
    score: u64,
    high_score: u64,
    /// Best score when this round began
    starting_high_score: u64,
    time_remaining: u32,
    clock: RoundClock,
    combo: ComboTracker,
    /// Live bubbles (sorted by id)
    bubbles: Vec<Bubble>,
    combo_messages: Vec<ComboMessage>,
    events: Vec<GameEvent>,
    store: Box<dyn HighScoreStore>,
    last_frame: Option<u64>,
    next_id: u32,
}

impl GameSession {
    /// Start a running round. Reads the persisted high score once.
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>, seed: u64, now: u64) -> Self {
        let high_score = store.read();
        log::info!("New round (seed {seed}, high score {high_score})");
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            score: 0,
            high_score,
            starting_high_score: high_score,
            time_remaining: config.duration_secs,
            clock: RoundClock::new(config.duration_secs, now),
            combo: ComboTracker::new(config.combo.timeout_ms),
            bubbles: Vec::new(),
            combo_messages: Vec::new(),
            events: Vec::new(),
            store,
            last_frame: Some(now),
            next_id: 1,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn combo_count(&self) -> u32 {
        self.combo.count()
    }

    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn clock(&self) -> &RoundClock {
        &self.clock
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubble(&self, id: EntityId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn combo_messages(&self) -> &[ComboMessage] {
        &self.combo_messages
    }

    pub fn viewport(&self) -> &Viewport {
        &self.config.viewport
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            high_score: self.high_score,
            combo: self.combo.count(),
            time_remaining: self.time_remaining,
            phase: self.phase,
            bubbles: self.bubbles.clone(),
            combo_messages: self.combo_messages.clone(),
        }
    }

    /// Spawn tick: top up to the floor, else add one below the cap.
    /// Returns how many bubbles were created.
    pub fn spawn_tick(&mut self) -> usize {
        if !self.is_running() {
            return 0;
        }
        let count = spawner::spawn_count(self.bubbles.len(), &self.config.bubble);
        for _ in 0..count {
            let id = self.next_entity_id();
            let bubble =
                spawner::synthesize(id, &mut self.rng, &self.config.bubble, &self.config.viewport);
            self.bubbles.push(bubble);
        }
        count
    }

    /// Pop a bubble at `pos` (where the player hit it).
    ///
    /// Points come from the bubble itself. Unknown ids (already popped,
    /// cleared at round end) and pops outside `Running` are ignored.
    /// Returns the points awarded.
    pub fn pop(&mut self, id: EntityId, pos: Vec2, now: u64) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        let index = self.bubbles.iter().position(|b| b.id == id)?;
        let bubble = self.bubbles.remove(index);

        self.score += bubble.points;
        if self.score > self.high_score {
            if self.high_score == self.starting_high_score {
                self.events.push(GameEvent::NewHighScore { score: self.score });
            }
            self.high_score = self.score;
            self.store.write(self.high_score);
        }

        let step = self.combo.record_pop(now);
        self.events.push(GameEvent::Popped {
            id,
            pos,
            points: bubble.points,
            special: bubble.special,
            combo: step.count,
        });
        self.emit_threshold(step, pos, now);

        Some(bubble.points)
    }

    fn emit_threshold(&mut self, step: ComboStep, pos: Vec2, now: u64) {
        let Some(threshold) = self.config.combo.threshold_for(step.count).cloned() else {
            return;
        };
        log::debug!("Combo x{}: {}", step.count, threshold.label);
        let id = self.next_entity_id();
        self.combo_messages.push(ComboMessage {
            id,
            pos,
            text: threshold.label.clone(),
            intensity: threshold.intensity,
            created_at: now,
        });
        self.events.push(GameEvent::ComboThreshold {
            count: step.count,
            label: threshold.label,
            intensity: threshold.intensity,
            pos,
        });
    }

    /// Combo idle timer fired. Stale generations do nothing.
    pub fn expire_combo(&mut self, generation: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        let reset = self.combo.fire_reset(generation);
        if reset {
            self.events.push(GameEvent::ComboReset);
        }
        reset
    }

    /// Advance all bubbles by `dt` ms
    pub fn tick(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }
        kinematics::advance_all(&mut self.bubbles, dt, &self.config.viewport);
    }

    /// Frame callback: move bubbles by the time since the previous frame and
    /// retire expired combo messages
    pub fn frame(&mut self, now: u64) {
        let dt = self
            .last_frame
            .map(|last| now.saturating_sub(last))
            .unwrap_or(0);
        self.last_frame = Some(now);
        // Messages are frozen with everything else while paused
        if self.phase != GamePhase::Paused {
            self.expire_messages(now);
        }
        self.tick(dt as f32);
    }

    fn expire_messages(&mut self, now: u64) {
        let duration = self.config.combo.message_duration_ms;
        self.combo_messages
            .retain(|m| now.saturating_sub(m.created_at) < duration);
    }

    /// Set the countdown. Hitting zero ends the round and clears the board
    /// in the same step.
    pub fn advance_clock(&mut self, remaining: u32) {
        if !self.is_running() {
            return;
        }
        self.time_remaining = remaining;
        if remaining == 0 {
            self.end_round();
        }
    }

    /// Countdown tick: derive the remaining time from the round clock
    pub fn countdown_tick(&mut self, now: u64) {
        if !self.is_running() {
            return;
        }
        let remaining = self.clock.remaining_secs(now);
        self.advance_clock(remaining);
    }

    fn end_round(&mut self) {
        self.phase = GamePhase::Ended;
        self.time_remaining = 0;
        self.bubbles.clear();
        self.combo.cancel();
        let new_best = self.score > self.starting_high_score;
        log::info!(
            "Round over: score {} (high score {}{})",
            self.score,
            self.high_score,
            if new_best { ", new best" } else { "" }
        );
        self.events.push(GameEvent::RoundEnded {
            score: self.score,
            high_score: self.high_score,
            new_best,
        });
    }

    pub fn pause(&mut self, now: u64) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.clock.pause(now);
        self.combo.cancel();
        self.phase = GamePhase::Paused;
        log::info!("Paused with {}s left", self.time_remaining);
        true
    }

    pub fn resume(&mut self, now: u64) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        let paused_for = self.clock.resume(now).unwrap_or(0);
        self.combo.shift(paused_for);
        for message in &mut self.combo_messages {
            message.created_at += paused_for;
        }
        self.last_frame = Some(now);
        self.phase = GamePhase::Running;
        log::info!("Resumed after {paused_for}ms");
        true
    }

    pub fn toggle_pause(&mut self, now: u64) -> bool {
        match self.phase {
            GamePhase::Running => self.pause(now),
            GamePhase::Paused => self.resume(now),
            GamePhase::Ended => false,
        }
    }

    /// Throw away the round and start fresh, keeping the best score
    pub fn restart(&mut self, now: u64) {
        let seed = self.rng.random::<u64>();
        log::info!("Restarting (seed {seed}, high score {})", self.high_score);
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.phase = GamePhase::Running;
        self.score = 0;
        self.starting_high_score = self.high_score;
        self.time_remaining = self.config.duration_secs;
        self.clock = RoundClock::new(self.config.duration_secs, now);
        self.combo.clear();
        self.bubbles.clear();
        self.combo_messages.clear();
        self.last_frame = Some(now);
    }

    /// Viewport changed; existing bubbles keep their positions and wrap
    /// into the new bounds as they move
    pub fn resize(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
    }
}

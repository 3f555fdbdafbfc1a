//! Game loop driver
//!
//! Four periodic sources (spawn, frame, countdown, combo idle) plus player
//! input all feed one FIFO of `Command`s. Commands are applied to the session
//! one at a time, in arrival order, so no transition ever observes another
//! half-applied.
//!
//! Timers are plain deadlines owned here. They are dropped when the round
//! pauses or ends and re-armed on resume/restart, so a callback scheduled
//! for a superseded round can never reach the session.

use std::collections::VecDeque;

use glam::Vec2;

use super::combo::IdleReset;
use super::entity::EntityId;
use super::state::{GameEvent, GamePhase, GameSession};
use crate::config::Viewport;

/// Everything that can mutate a session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Display refresh
    Frame { now: u64 },
    /// Spawn interval elapsed
    SpawnTick,
    /// One second of active time elapsed
    CountdownTick { now: u64 },
    /// Combo idle deadline reached
    ComboIdle { generation: u64 },
    /// Player hit a bubble
    Pop { id: EntityId, pos: Vec2, now: u64 },
    Pause { now: u64 },
    Resume { now: u64 },
    TogglePause { now: u64 },
    Restart { now: u64 },
    Resize(Viewport),
}

impl Command {
    /// When the command happened, for commands that carry a time
    fn timestamp(&self) -> Option<u64> {
        match self {
            Command::Frame { now }
            | Command::CountdownTick { now }
            | Command::Pop { now, .. }
            | Command::Pause { now }
            | Command::Resume { now }
            | Command::TogglePause { now }
            | Command::Restart { now } => Some(*now),
            Command::SpawnTick | Command::ComboIdle { .. } | Command::Resize(_) => None,
        }
    }
}

/// Pending periodic deadlines (ms)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Timers {
    spawn: Option<u64>,
    countdown: Option<u64>,
    combo: Option<IdleReset>,
}

impl Timers {
    fn arm(&mut self, session: &GameSession, now: u64) {
        self.spawn = Some(now + session.config().bubble.spawn_interval_ms);
        self.countdown = Some(session.clock().next_tick_at(now));
        self.combo = session.combo().pending_reset();
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Earliest deadline at or before `now`
    fn next_due(&self, now: u64) -> Option<(u64, Command)> {
        let candidates = [
            self.spawn.map(|due| (due, Command::SpawnTick)),
            self.countdown.map(|due| (due, Command::CountdownTick { now: due })),
            self.combo.map(|reset| {
                (
                    reset.due,
                    Command::ComboIdle {
                        generation: reset.generation,
                    },
                )
            }),
        ];
        // min_by_key keeps the first on ties: spawn, then countdown, then combo
        candidates
            .into_iter()
            .flatten()
            .filter(|(due, _)| *due <= now)
            .min_by_key(|(due, _)| *due)
    }
}

pub struct GameLoop {
    session: GameSession,
    queue: VecDeque<Command>,
    timers: Timers,
}

impl GameLoop {
    pub fn new(session: GameSession, now: u64) -> Self {
        let mut timers = Timers::default();
        if session.is_running() {
            timers.arm(&session, now);
        }
        Self {
            session,
            queue: VecDeque::new(),
            timers,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Queue a command; it runs on the next `pump`/`advance_to`
    pub fn submit(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Queue a pop from the presentation layer
    pub fn pop(&mut self, id: EntityId, pos: Vec2, now: u64) {
        self.submit(Command::Pop { id, pos, now });
    }

    /// Apply every queued command in order. Timers that came due at or
    /// before a command's timestamp fire ahead of it.
    pub fn pump(&mut self) {
        while let Some(command) = self.queue.pop_front() {
            if let Some(at) = command.timestamp() {
                self.fire_timers(at);
            }
            self.apply(command);
        }
    }

    /// Fire every timer due at or before `now`, oldest first
    fn fire_timers(&mut self, now: u64) {
        while let Some((_, command)) = self.timers.next_due(now) {
            self.apply(command);
        }
    }

    /// Run everything up to `now`: queued input (interleaved with the timers
    /// it comes after), the remaining due timers, then one frame. Returns the
    /// events produced.
    pub fn advance_to(&mut self, now: u64) -> Vec<GameEvent> {
        self.submit(Command::Frame { now });
        self.pump();
        self.session.drain_events()
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Frame { now } => self.session.frame(now),
            Command::SpawnTick => {
                self.session.spawn_tick();
                if let Some(due) = self.timers.spawn {
                    self.timers.spawn = Some(due + self.session.config().bubble.spawn_interval_ms);
                }
            }
            Command::CountdownTick { now } => {
                self.session.countdown_tick(now);
                if self.timers.countdown.is_some() {
                    self.timers.countdown = Some(self.session.clock().next_tick_at(now));
                }
            }
            Command::ComboIdle { generation } => {
                self.session.expire_combo(generation);
            }
            Command::Pop { id, pos, now } => {
                self.session.pop(id, pos, now);
            }
            Command::Pause { now } => {
                self.session.pause(now);
            }
            Command::Resume { now } => {
                if self.session.resume(now) {
                    self.timers.arm(&self.session, now);
                }
            }
            Command::TogglePause { now } => {
                if self.session.toggle_pause(now) && self.session.is_running() {
                    self.timers.arm(&self.session, now);
                }
            }
            Command::Restart { now } => {
                self.session.restart(now);
                self.timers.arm(&self.session, now);
            }
            Command::Resize(viewport) => self.session.resize(viewport),
        }

        match self.session.phase() {
            GamePhase::Running => self.timers.combo = self.session.combo().pending_reset(),
            GamePhase::Paused | GamePhase::Ended => self.timers.clear(),
        }
    }
}

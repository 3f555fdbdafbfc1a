//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as millisecond timestamps, never read from the system
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod combo;
pub mod driver;
pub mod entity;
pub mod kinematics;
pub mod spawner;
pub mod state;

pub use clock::RoundClock;
pub use combo::{ComboStep, ComboTracker, IdleReset};
pub use driver::{Command, GameLoop};
pub use entity::{Bubble, BubbleKind, EntityId};
pub use state::{ComboMessage, GameEvent, GamePhase, GameSession, Snapshot};

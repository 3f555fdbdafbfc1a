//! Pop-able entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable entity identifier (never reused within a session)
pub type EntityId = u32;

/// Entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleKind {
    /// Drifts along its velocity, recycled to mid-screen when it strays off
    Regular,
    /// Always rises, loops back in from below
    Balloon,
}

/// A bubble or balloon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: EntityId,
    /// Top-left corner in viewport coordinates
    pub pos: Vec2,
    /// Diameter (px)
    pub size: f32,
    pub kind: BubbleKind,
    /// Signed horizontal, non-negative vertical at spawn time
    pub vel: Vec2,
    pub special: bool,
    pub points: u64,
    /// 0xRRGGBB
    pub color: u32,
}

impl Bubble {
    pub fn is_balloon(&self) -> bool {
        self.kind == BubbleKind::Balloon
    }
}

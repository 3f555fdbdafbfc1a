//! Per-frame bubble motion
//!
//! Horizontal motion wraps around the viewport like a torus. Vertical motion
//! never destroys anything: balloons loop back in from below and regular
//! bubbles that stray too far are dropped back at mid-screen. Recycling keeps
//! the same id and slot.

use super::entity::{Bubble, BubbleKind};
use crate::config::Viewport;
use crate::consts::{KINEMATICS_SCALE, RECYCLE_MARGIN};
use crate::wrap_coordinate;

/// Advance a bubble by `dt` milliseconds
pub fn advance(bubble: &mut Bubble, dt: f32, viewport: &Viewport) {
    // Negative or NaN deltas come from clock hiccups; ignore them
    if dt.is_nan() || dt <= 0.0 {
        return;
    }
    let step = dt * KINEMATICS_SCALE;
    let size = bubble.size;

    let x = bubble.pos.x + bubble.vel.x * step;
    bubble.pos.x = wrap_coordinate(x, size, viewport.width);

    let margin = size * RECYCLE_MARGIN;
    bubble.pos.y = match bubble.kind {
        BubbleKind::Balloon => {
            let y = bubble.pos.y - bubble.vel.y.abs() * step;
            if y < -margin {
                viewport.height + size
            } else {
                y
            }
        }
        BubbleKind::Regular => {
            let y = bubble.pos.y + bubble.vel.y * step;
            if y > viewport.height + margin || y < -margin {
                viewport.height / 2.0
            } else {
                y
            }
        }
    };
}

/// Advance every bubble in the set
pub fn advance_all(bubbles: &mut [Bubble], dt: f32, viewport: &Viewport) {
    for bubble in bubbles {
        advance(bubble, dt, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn bubble(kind: BubbleKind, pos: Vec2, vel: Vec2) -> Bubble {
        Bubble {
            id: 1,
            pos,
            size: 40.0,
            kind,
            vel,
            special: false,
            points: 1,
            color: 0,
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_regular_moves_along_velocity() {
        let mut b = bubble(BubbleKind::Regular, Vec2::new(100.0, 100.0), Vec2::new(1.0, 1.0));
        advance(&mut b, 100.0, &viewport());
        assert!((b.pos.x - 105.0).abs() < 1e-4);
        assert!((b.pos.y - 105.0).abs() < 1e-4);
    }

    #[test]
    fn test_balloon_always_rises() {
        let mut b = bubble(BubbleKind::Balloon, Vec2::new(100.0, 300.0), Vec2::new(0.0, 1.0));
        advance(&mut b, 100.0, &viewport());
        assert!((b.pos.y - 295.0).abs() < 1e-4);

        // Sign of vy doesn't matter for balloons
        b.vel.y = -1.0;
        advance(&mut b, 100.0, &viewport());
        assert!((b.pos.y - 290.0).abs() < 1e-4);
    }

    #[test]
    fn test_horizontal_wraps_both_ways() {
        let vp = viewport();
        let mut b = bubble(BubbleKind::Regular, Vec2::new(799.0, 300.0), Vec2::new(1.0, 0.0));
        advance(&mut b, 100.0, &vp);
        assert_eq!(b.pos.x, -40.0);

        let mut b = bubble(BubbleKind::Regular, Vec2::new(-39.0, 300.0), Vec2::new(-1.0, 0.0));
        advance(&mut b, 100.0, &vp);
        assert_eq!(b.pos.x, 800.0);
    }

    #[test]
    fn test_balloon_loops_from_below() {
        let mut b = bubble(BubbleKind::Balloon, Vec2::new(120.0, -79.0), Vec2::new(0.0, 1.0));
        advance(&mut b, 100.0, &viewport());
        assert_eq!(b.pos.y, 640.0);
        assert_eq!(b.pos.x, 120.0);
        assert_eq!(b.size, 40.0);
        assert_eq!(b.id, 1);
    }

    #[test]
    fn test_regular_recycles_to_middle() {
        let vp = viewport();
        let mut b = bubble(BubbleKind::Regular, Vec2::new(0.0, 679.0), Vec2::new(0.0, 1.0));
        advance(&mut b, 100.0, &vp);
        assert_eq!(b.pos.y, 300.0);

        // Just past the bottom edge is still in play
        let mut b = bubble(BubbleKind::Regular, Vec2::new(0.0, 610.0), Vec2::new(0.0, 1.0));
        advance(&mut b, 100.0, &vp);
        assert!((b.pos.y - 615.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_positive_dt_is_noop() {
        let start = Vec2::new(100.0, 100.0);
        let mut b = bubble(BubbleKind::Regular, start, Vec2::new(1.0, 1.0));
        advance(&mut b, 0.0, &viewport());
        advance(&mut b, -16.0, &viewport());
        advance(&mut b, f32::NAN, &viewport());
        assert_eq!(b.pos, start);
    }
}

//! Bubble spawning
//!
//! Keeps the live set between the configured floor and cap. Spawning above
//! the cap is suppressed, never queued.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Bubble, BubbleKind, EntityId};
use crate::config::{BubbleConfig, Viewport};

/// How many bubbles a spawn tick should create given the live count
pub fn spawn_count(live: usize, config: &BubbleConfig) -> usize {
    if live < config.min_count {
        config.min_count - live
    } else if live < config.max_count {
        1
    } else {
        0
    }
}

/// Roll a fresh bubble
pub fn synthesize(
    id: EntityId,
    rng: &mut Pcg32,
    config: &BubbleConfig,
    viewport: &Viewport,
) -> Bubble {
    let size = if config.max_size > config.min_size {
        rng.random_range(config.min_size..=config.max_size)
    } else {
        config.min_size
    };
    let kind = if rng.random_bool(0.5) {
        BubbleKind::Regular
    } else {
        BubbleKind::Balloon
    };
    let special = rng.random_bool(config.special_chance);
    let (points, palette) = if special {
        (config.special_points, &config.special_colors)
    } else {
        (config.regular_points, &config.colors)
    };
    let color = if palette.is_empty() {
        0xFFFFFF
    } else {
        palette[rng.random_range(0..palette.len())]
    };

    let speed_x = roll_speed(rng, config);
    let speed_y = roll_speed(rng, config);
    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let vel = Vec2::new(speed_x * direction, speed_y);

    let x_span = (viewport.width - size).max(0.0);
    let x = rng.random::<f32>() * x_span;
    let y = match kind {
        BubbleKind::Balloon => viewport.height + size,
        BubbleKind::Regular => rng.random::<f32>() * viewport.height,
    };

    Bubble {
        id,
        pos: Vec2::new(x, y),
        size,
        kind,
        vel,
        special,
        points,
        color,
    }
}

fn roll_speed(rng: &mut Pcg32, config: &BubbleConfig) -> f32 {
    let range = config.velocity;
    if range.max > range.min {
        rng.random_range(range.min..=range.max)
    } else {
        range.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_count_floor_cap() {
        let config = BubbleConfig::default();
        assert_eq!(spawn_count(0, &config), 10);
        assert_eq!(spawn_count(7, &config), 3);
        assert_eq!(spawn_count(10, &config), 1);
        assert_eq!(spawn_count(49, &config), 1);
        assert_eq!(spawn_count(50, &config), 0);
        assert_eq!(spawn_count(60, &config), 0);
    }

    #[test]
    fn test_synthesized_bubbles_respect_config() {
        let config = BubbleConfig::default();
        let viewport = Viewport::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(7);

        for id in 0..500 {
            let b = synthesize(id, &mut rng, &config, &viewport);
            assert!(b.size >= config.min_size && b.size <= config.max_size);
            assert!(b.vel.y >= config.velocity.min && b.vel.y <= config.velocity.max);
            assert!(b.vel.x.abs() >= config.velocity.min && b.vel.x.abs() <= config.velocity.max);
            assert!(b.pos.x >= 0.0 && b.pos.x <= viewport.width - b.size);
            match b.kind {
                BubbleKind::Balloon => assert_eq!(b.pos.y, viewport.height + b.size),
                BubbleKind::Regular => assert!(b.pos.y >= 0.0 && b.pos.y <= viewport.height),
            }
            if b.special {
                assert_eq!(b.points, config.special_points);
                assert!(config.special_colors.contains(&b.color));
            } else {
                assert_eq!(b.points, config.regular_points);
                assert!(config.colors.contains(&b.color));
            }
        }
    }

    #[test]
    fn test_special_rate_is_roughly_configured() {
        let config = BubbleConfig::default();
        let viewport = Viewport::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let specials = (0..10_000)
            .filter(|&id| synthesize(id, &mut rng, &config, &viewport).special)
            .count();
        assert!((1200..1800).contains(&specials), "specials = {specials}");
    }

    #[test]
    fn test_same_seed_same_bubbles() {
        let config = BubbleConfig::default();
        let viewport = Viewport::default();
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for id in 0..20 {
            assert_eq!(
                synthesize(id, &mut a, &config, &viewport),
                synthesize(id, &mut b, &config, &viewport)
            );
        }
    }
}

//! Bubble Pop entry point
//!
//! Native builds run a headless round: a simulated 60 Hz clock drives the
//! game loop while a simple auto-popper plays, then the result is logged.
//! Configuration comes from `BUBBLE_POP_CONFIG` (JSON) and the best score is
//! kept in `BUBBLE_POP_DATA` (defaults to the working directory).

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use bubble_pop::feedback::{FeedbackDispatcher, LogAudio};
    use bubble_pop::highscore::JsonFileStore;
    use bubble_pop::sim::{Command, GameEvent, GameLoop, GamePhase, GameSession};
    use bubble_pop::{GameConfig, Settings};

    /// Simulated frame period (ms)
    const FRAME_MS: u64 = 16;
    /// Chance per frame that the auto-popper hits something
    const POP_CHANCE: f64 = 0.12;

    fn data_dir() -> PathBuf {
        std::env::var_os("BUBBLE_POP_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        log::info!("Bubble Pop starting...");

        let config = match std::env::var_os("BUBBLE_POP_CONFIG") {
            Some(path) => GameConfig::load_or_default(&PathBuf::from(path)),
            None => GameConfig::default(),
        };
        let dir = data_dir();
        let settings = Settings::load(&dir.join("bubble_pop_settings.json"));
        let store = JsonFileStore::open(dir.join("bubble_pop_high_score.json"));

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut fx = FeedbackDispatcher::new(LogAudio, settings, &config.screen_shake, seed);
        let session = GameSession::new(config, Box::new(store), seed, 0);
        let mut game = GameLoop::new(session, 0);
        let mut player = Pcg32::seed_from_u64(seed ^ 0x5EED);

        let mut now = 0;
        let mut best_combo = 0;
        let mut paused_once = false;
        while game.session().phase() != GamePhase::Ended {
            now += FRAME_MS;

            // Take a short breather halfway through
            if !paused_once && game.session().time_remaining() == 15 {
                paused_once = true;
                game.submit(Command::Pause { now });
                game.submit(Command::Resume { now: now + 2_000 });
                now += 2_000;
            }

            if player.random_bool(POP_CHANCE) {
                let bubbles = game.session().bubbles();
                let target = (!bubbles.is_empty()).then(|| {
                    let bubble = &bubbles[player.random_range(0..bubbles.len())];
                    (bubble.id, bubble.pos)
                });
                if let Some((id, pos)) = target {
                    game.pop(id, pos, now);
                }
            }

            let events = game.advance_to(now);
            for event in &events {
                if let GameEvent::ComboThreshold { count, label, .. } = event {
                    log::info!("{label} ({count} in a row)");
                    best_combo = best_combo.max(*count);
                }
            }
            fx.dispatch_all(&events, now);
        }

        let snapshot = game.session().snapshot();
        log::info!(
            "Time's up! Score: {} | High score: {} | Best combo milestone: {}",
            snapshot.score,
            snapshot.high_score,
            best_combo
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

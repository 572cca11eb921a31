//! Neon Strike headless runner
//!
//! Drives a session at a simulated 60 Hz with scripted input and a logging
//! renderer. Useful for balance checks: `neon-strike [tuning.json] [seed]`.

use neon_strike::Tuning;
use neon_strike::platform::{Control, InputQueue};
use neon_strike::renderer::{EntityKey, EntityKind, Renderer, Sprite};
use neon_strike::sim::{FrameOutcome, GameEvent, GameLoop};

/// Simulated display refresh
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten simulated minutes
const MAX_FRAMES: u64 = 60 * 60 * 10;

/// Logs entity churn, ignoring particles
struct LogRenderer;

impl Renderer for LogRenderer {
    fn create(&mut self, sprite: &Sprite) {
        if sprite.key.kind != EntityKind::Particle {
            log::trace!("create {:?} at {:?}", sprite.key, sprite.pos);
        }
    }

    fn update(&mut self, _sprite: &Sprite) {}

    fn destroy(&mut self, key: EntityKey) {
        if key.kind != EntityKind::Particle {
            log::trace!("destroy {key:?}");
        }
    }
}

/// Sweep left and right across the bottom, firing constantly
fn script_input(queue: &InputQueue, frame: u64) {
    const SWEEP: u64 = 120;
    match frame % (SWEEP * 2) {
        0 => {
            queue.release(Control::Right);
            queue.press(Control::Left);
        }
        f if f == SWEEP => {
            queue.release(Control::Left);
            queue.press(Control::Right);
        }
        _ => {}
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Strike (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);

    let input = InputQueue::new();
    let mut game = match GameLoop::builder()
        .tuning(tuning)
        .seed(seed)
        .renderer(LogRenderer)
        .input(input.clone())
        .start(0.0)
    {
        Ok(game) => game,
        Err(e) => {
            log::error!("Could not start session: {e}");
            std::process::exit(1);
        }
    };

    input.press(Control::Fire);
    let mut kills = 0u32;
    let mut frames = 0u64;
    while frames < MAX_FRAMES {
        script_input(&input, frames);
        frames += 1;
        let outcome = game.frame(frames as f64 * FRAME_MS);

        for event in game.drain_events() {
            match event {
                GameEvent::EnemyDestroyed { .. } => kills += 1,
                GameEvent::PlayerHit { health, .. } => log::info!("Hit! health {health}"),
                _ => {}
            }
        }
        if outcome == FrameOutcome::Halt {
            break;
        }
    }

    // Let the final bursts fade out of the renderer
    let mut tail = frames;
    while game.is_game_over() {
        tail += 1;
        if !game.advance_effects(tail as f64 * FRAME_MS) {
            break;
        }
    }

    log::info!(
        "Finished after {:.1}s: score {}, health {}, {} kills, phase {:?}",
        frames as f64 * FRAME_MS / 1000.0,
        game.score(),
        game.health(),
        kills,
        game.phase()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `GameLoop` directly
}

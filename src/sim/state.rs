//! Game state and core simulation types
//!
//! `GameState` is the session context: every component's collection plus the
//! score/health/phase triple, owned by the game loop and handed to each
//! update by reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::particles::ParticleSystem;
use super::player::PlayerController;
use super::projectile::ProjectileManager;
use super::schedule::{Scheduler, TimerHandle};
use super::spawner::EnemySpawner;
use crate::consts::{MAX_PENDING_EVENTS, PLAYER_MAX_HEALTH};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Health ran out; only a restart leaves this phase
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub acceleration: f32,
    pub deceleration: f32,
    pub max_speed: f32,
}

impl Player {
    /// Centered horizontally, resting on the bottom edge
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.player_width, tuning.player_height);
        Self {
            pos: Vec2::new(
                (tuning.playfield_width - size.x) / 2.0,
                tuning.playfield_height - size.y,
            ),
            vel: Vec2::ZERO,
            size,
            acceleration: tuning.player_acceleration,
            deceleration: tuning.player_deceleration,
            max_speed: tuning.player_max_speed,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A laser bolt; ownership is given by which collection holds it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame along the owner's fixed direction
    pub speed: f32,
}

impl Laser {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A descending enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame, downward
    pub speed: f32,
    /// Pending fire timer; `None` once cancelled
    pub fire_timer: Option<TimerHandle>,
}

impl Enemy {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Where this enemy's shots leave the hull (horizontal center, bottom edge)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }
}

/// A short-lived spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB of whatever emitted it
    pub color: u32,
    pub created_at: f64,
    pub lifetime: f64,
    /// 1 at creation, 0 at end of life
    pub fade: f32,
}

/// Expanding flash left by a ship-to-ship collision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionMarker {
    pub id: u32,
    pub center: Vec2,
    pub created_at: f64,
    pub lifetime: f64,
    pub radius: f32,
    pub fade: f32,
}

/// Score, health and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifecycle {
    pub score: u64,
    pub health: u32,
    pub phase: GamePhase,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            score: 0,
            health: PLAYER_MAX_HEALTH,
            phase: GamePhase::Playing,
        }
    }
}

impl Lifecycle {
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Apply damage, saturating at zero; returns remaining health
    pub fn damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub fn is_depleted(&self) -> bool {
        self.health == 0
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Enter GameOver; true only on the actual transition
    pub fn enter_game_over(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::GameOver;
        true
    }
}

/// How an enemy died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillCause {
    /// Shot by a player laser
    Laser,
    /// Rammed the player
    Contact,
}

/// Something the host may want to react to (sound, HUD flash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { seed: u64 },
    ShotFired { laser_id: u32 },
    EnemySpawned { enemy_id: u32 },
    EnemyFired { enemy_id: u32, laser_id: u32 },
    EnemyDestroyed { enemy_id: u32, cause: KillCause },
    PlayerHit { damage: u32, health: u32 },
    ParticleBurst { origin: Vec2, color: u32, count: usize },
    Explosion { center: Vec2 },
    GameOver { score: u64 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub seed: u64,
    pub rng: Pcg32,
    /// Frames simulated this session
    pub frame: u64,
    /// Timestamp of the latest frame
    pub now_ms: f64,
    pub lifecycle: Lifecycle,
    pub player: PlayerController,
    pub projectiles: ProjectileManager,
    pub spawner: EnemySpawner,
    pub particles: ParticleSystem,
    pub scheduler: Scheduler,
    /// Undrained events, oldest first
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session in the Playing phase with nothing scheduled yet
    pub fn new(tuning: Tuning, seed: u64, now_ms: f64) -> Self {
        Self {
            player: PlayerController::new(&tuning),
            projectiles: ProjectileManager::new(&tuning),
            spawner: EnemySpawner::new(&tuning),
            particles: ParticleSystem::new(&tuning),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            seed,
            frame: 0,
            now_ms,
            lifecycle: Lifecycle::default(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drop the oldest events beyond [`MAX_PENDING_EVENTS`]; returns how many
    pub fn trim_events(&mut self) -> usize {
        let excess = self.events.len().saturating_sub(MAX_PENDING_EVENTS);
        if excess > 0 {
            self.events.drain(..excess);
            log::debug!("Event log full; dropped {excess} undrained events");
        }
        excess
    }

    pub fn phase(&self) -> GamePhase {
        self.lifecycle.phase
    }

    /// End the session: GameOver plus every schedule cancelled.
    ///
    /// Idempotent; returns true only the first time.
    pub fn end_session(&mut self) -> bool {
        if !self.lifecycle.enter_game_over() {
            return false;
        }
        self.spawner.stop(&mut self.scheduler);
        let score = self.lifecycle.score;
        log::info!("Game over (score {score}, frame {})", self.frame);
        self.emit(GameEvent::GameOver { score });
        true
    }

    /// Total live entities across every collection (player included)
    pub fn entity_count(&self) -> usize {
        1 + self.projectiles.player_lasers().len()
            + self.projectiles.enemy_lasers().len()
            + self.spawner.enemies().len()
            + self.particles.particles().len()
            + self.particles.explosions().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_saturates() {
        let mut life = Lifecycle::default();
        assert_eq!(life.damage(30), 70);
        assert_eq!(life.damage(90), 0);
        assert!(life.is_depleted());
        assert_eq!(life.damage(10), 0);
    }

    #[test]
    fn test_game_over_transition_once() {
        let mut life = Lifecycle::default();
        assert!(life.enter_game_over());
        assert!(!life.enter_game_over());
        assert!(life.is_game_over());
    }

    #[test]
    fn test_end_session_idempotent() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        state.spawner.start(0.0, &mut state.scheduler, &mut state.rng);
        assert_eq!(state.scheduler.active(), 1);

        assert!(state.end_session());
        assert!(!state.end_session());
        assert_eq!(state.scheduler.active(), 0);
        assert!(!state.spawner.is_running());
        let overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_trim_events_keeps_newest() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        let total = MAX_PENDING_EVENTS + 10;
        for laser_id in 0..total as u32 {
            state.emit(GameEvent::ShotFired { laser_id });
        }
        assert_eq!(state.trim_events(), 10);
        assert_eq!(state.events.len(), MAX_PENDING_EVENTS);
        assert_eq!(state.events[0], GameEvent::ShotFired { laser_id: 10 });
        assert_eq!(state.trim_events(), 0);
    }

    #[test]
    fn test_player_starts_bottom_center() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert_eq!(player.pos.x + player.size.x / 2.0, tuning.playfield_width / 2.0);
        assert_eq!(player.pos.y + player.size.y, tuning.playfield_height);
    }
}

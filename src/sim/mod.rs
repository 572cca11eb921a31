//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host timestamps and a seeded RNG only
//! - Timers are explicit handles, cancelled by whoever armed them
//! - Stable iteration order (creation order within each collection)
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod player;
pub mod projectile;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, Rect, is_colliding, resolve};
pub use particles::ParticleSystem;
pub use player::PlayerController;
pub use projectile::ProjectileManager;
pub use schedule::{Due, Scheduler, TimerHandle, TimerTask};
pub use spawner::{EnemySpawner, SpawnerState};
pub use state::{
    Enemy, ExplosionMarker, GameEvent, GamePhase, GameState, KillCause, Laser, Lifecycle,
    Particle, Player,
};
pub use tick::{FrameOutcome, GameLoop, GameLoopBuilder};

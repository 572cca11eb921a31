//! Neon Strike - simulation core for a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `renderer`: Boundary to the external renderer (create/update/destroy by key)
//! - `platform`: Host input boundary
//! - `tuning`: Data-driven game balance
//! - `error`: Setup and configuration errors

pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{SetupError, TuningError};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Playfield dimensions (pixels, origin top-left, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    /// Velocity gained per frame while a direction is held
    pub const PLAYER_ACCELERATION: f32 = 0.5;
    /// Velocity multiplier per frame while no direction is held
    pub const PLAYER_DECELERATION: f32 = 0.92;
    pub const PLAYER_MAX_SPEED: f32 = 8.0;
    /// Fraction of velocity kept (and inverted) when bouncing off an edge
    pub const PLAYER_BOUNCE_DAMPING: f32 = 0.5;
    /// Below this magnitude a decaying velocity component snaps to zero
    pub const PLAYER_STOP_EPSILON: f32 = 0.01;
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    pub const SHOT_COOLDOWN_MS: f64 = 250.0;

    /// Lasers
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 20.0;
    pub const PLAYER_LASER_SPEED: f32 = 10.0;
    pub const ENEMY_LASER_SPEED: f32 = 5.0;
    /// Lasers are retired this far past the visible edge
    pub const LASER_OFFSCREEN_MARGIN: f32 = 10.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    pub const ENEMY_MIN_SPEED: f32 = 1.0;
    pub const ENEMY_MAX_SPEED: f32 = 3.0;
    pub const SPAWN_DELAY_MIN_MS: f64 = 1000.0;
    pub const SPAWN_DELAY_MAX_MS: f64 = 3000.0;
    pub const FIRE_INTERVAL_MIN_MS: f64 = 2000.0;
    pub const FIRE_INTERVAL_MAX_MS: f64 = 4000.0;

    /// Scoring and damage
    pub const KILL_SCORE: u64 = 100;
    pub const LASER_DAMAGE: u32 = 10;
    pub const CONTACT_DAMAGE: u32 = 30;

    /// Effects
    pub const DESTRUCTION_BURST: usize = 20;
    pub const LASER_HIT_BURST: usize = 8;
    pub const CONTACT_BURST: usize = 30;
    pub const PARTICLE_LIFETIME_MS: f64 = 1000.0;
    pub const PARTICLE_MIN_SPEED: f32 = 1.0;
    pub const PARTICLE_MAX_SPEED: f32 = 4.0;
    pub const PARTICLE_SIZE: f32 = 3.0;
    pub const EXPLOSION_LIFETIME_MS: f64 = 500.0;
    pub const EXPLOSION_MAX_RADIUS: f32 = 40.0;

    /// Longest host gap a single frame catches up on; schedules are
    /// postponed by anything beyond it
    pub const MAX_FRAME_GAP_MS: f64 = 100.0;
    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 4096;

    /// Colors (0xRRGGBB)
    pub const PLAYER_COLOR: u32 = 0x00e5ff;
    pub const PLAYER_LASER_COLOR: u32 = 0x76ff03;
    pub const ENEMY_COLOR: u32 = 0xff1744;
    pub const ENEMY_LASER_COLOR: u32 = 0xff9100;
    pub const EXPLOSION_COLOR: u32 = 0xffea00;
}

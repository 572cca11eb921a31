//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a session can be retuned
//! from JSON without recompiling. Missing fields fall back to [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Balance and layout values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_acceleration: f32,
    /// Per-frame velocity multiplier when coasting, must be in (0, 1)
    pub player_deceleration: f32,
    pub player_max_speed: f32,
    pub bounce_damping: f32,
    pub stop_epsilon: f32,
    pub shot_cooldown_ms: f64,

    // === Lasers ===
    pub laser_width: f32,
    pub laser_height: f32,
    pub player_laser_speed: f32,
    pub enemy_laser_speed: f32,
    pub laser_margin: f32,

    // === Enemies ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,
    pub spawn_delay_min_ms: f64,
    pub spawn_delay_max_ms: f64,
    pub fire_interval_min_ms: f64,
    pub fire_interval_max_ms: f64,

    // === Scoring ===
    pub kill_score: u64,
    pub laser_damage: u32,
    pub contact_damage: u32,

    // === Effects ===
    pub destruction_burst: usize,
    pub laser_hit_burst: usize,
    pub contact_burst: usize,
    pub particle_lifetime_ms: f64,
    pub particle_min_speed: f32,
    pub particle_max_speed: f32,
    pub explosion_lifetime_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_acceleration: PLAYER_ACCELERATION,
            player_deceleration: PLAYER_DECELERATION,
            player_max_speed: PLAYER_MAX_SPEED,
            bounce_damping: PLAYER_BOUNCE_DAMPING,
            stop_epsilon: PLAYER_STOP_EPSILON,
            shot_cooldown_ms: SHOT_COOLDOWN_MS,

            laser_width: LASER_WIDTH,
            laser_height: LASER_HEIGHT,
            player_laser_speed: PLAYER_LASER_SPEED,
            enemy_laser_speed: ENEMY_LASER_SPEED,
            laser_margin: LASER_OFFSCREEN_MARGIN,

            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_min_speed: ENEMY_MIN_SPEED,
            enemy_max_speed: ENEMY_MAX_SPEED,
            spawn_delay_min_ms: SPAWN_DELAY_MIN_MS,
            spawn_delay_max_ms: SPAWN_DELAY_MAX_MS,
            fire_interval_min_ms: FIRE_INTERVAL_MIN_MS,
            fire_interval_max_ms: FIRE_INTERVAL_MAX_MS,

            kill_score: KILL_SCORE,
            laser_damage: LASER_DAMAGE,
            contact_damage: CONTACT_DAMAGE,

            destruction_burst: DESTRUCTION_BURST,
            laser_hit_burst: LASER_HIT_BURST,
            contact_burst: CONTACT_BURST,
            particle_lifetime_ms: PARTICLE_LIFETIME_MS,
            particle_min_speed: PARTICLE_MIN_SPEED,
            particle_max_speed: PARTICLE_MAX_SPEED,
            explosion_lifetime_ms: EXPLOSION_LIFETIME_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("playfield_width", self.playfield_width)?;
        positive("playfield_height", self.playfield_height)?;
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        positive("player_acceleration", self.player_acceleration)?;
        positive("player_max_speed", self.player_max_speed)?;
        positive("laser_width", self.laser_width)?;
        positive("laser_height", self.laser_height)?;
        positive("player_laser_speed", self.player_laser_speed)?;
        positive("enemy_laser_speed", self.enemy_laser_speed)?;
        positive("enemy_width", self.enemy_width)?;
        positive("enemy_height", self.enemy_height)?;

        if !(self.player_deceleration > 0.0 && self.player_deceleration < 1.0) {
            return Err(invalid("player_deceleration", "must be in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.bounce_damping) {
            return Err(invalid("bounce_damping", "must be in [0, 1]"));
        }
        non_negative("stop_epsilon", self.stop_epsilon)?;
        non_negative("shot_cooldown_ms", self.shot_cooldown_ms)?;
        non_negative("laser_margin", self.laser_margin)?;
        if self.player_width > self.playfield_width || self.player_height > self.playfield_height {
            return Err(invalid("player_width", "player does not fit in the playfield"));
        }
        if self.enemy_width >= self.playfield_width {
            return Err(invalid("enemy_width", "enemy does not fit in the playfield"));
        }

        range("enemy_speed", self.enemy_min_speed as f64, self.enemy_max_speed as f64)?;
        range("spawn_delay", self.spawn_delay_min_ms, self.spawn_delay_max_ms)?;
        range("fire_interval", self.fire_interval_min_ms, self.fire_interval_max_ms)?;
        range(
            "particle_speed",
            self.particle_min_speed as f64,
            self.particle_max_speed as f64,
        )?;
        if self.spawn_delay_min_ms <= 0.0 || self.fire_interval_min_ms <= 0.0 {
            return Err(invalid("spawn_delay", "schedule delays must be positive"));
        }

        positive("particle_lifetime_ms", self.particle_lifetime_ms)?;
        positive("explosion_lifetime_ms", self.explosion_lifetime_ms)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: impl Into<f64>) -> Result<(), TuningError> {
    let value = value.into();
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: impl Into<f64>) -> Result<(), TuningError> {
    let value = value.into();
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and not negative, got {value}")))
    }
}

/// Half-open sampling ranges need min < max
fn range(field: &'static str, min: f64, max: f64) -> Result<(), TuningError> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min < max {
        Ok(())
    } else {
        Err(invalid(field, format!("expected 0 <= min < max, got [{min}, {max})")))
    }
}

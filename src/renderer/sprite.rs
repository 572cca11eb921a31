//! Renderable view of simulation entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::GameState;

/// What an entity is, for the renderer to pick a visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    PlayerLaser,
    EnemyLaser,
    Enemy,
    Particle,
    ExplosionMarker,
}

/// Unique key of a live entity; ids are only unique within a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: u32,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: u32) -> Self {
        Self { kind, id }
    }
}

/// Position, size and look of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub key: EntityKey,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// Opacity, 1 unless fading out
    pub alpha: f32,
}

/// Every visible entity, player first then each collection in creation order
pub fn snapshot(state: &GameState) -> Vec<Sprite> {
    let mut sprites = Vec::with_capacity(state.entity_count());

    let player = &state.player.player;
    sprites.push(Sprite {
        key: EntityKey::new(EntityKind::Player, 0),
        pos: player.pos,
        size: player.size,
        color: PLAYER_COLOR,
        alpha: 1.0,
    });

    for laser in state.projectiles.player_lasers() {
        sprites.push(Sprite {
            key: EntityKey::new(EntityKind::PlayerLaser, laser.id),
            pos: laser.pos,
            size: laser.size,
            color: PLAYER_LASER_COLOR,
            alpha: 1.0,
        });
    }
    for laser in state.projectiles.enemy_lasers() {
        sprites.push(Sprite {
            key: EntityKey::new(EntityKind::EnemyLaser, laser.id),
            pos: laser.pos,
            size: laser.size,
            color: ENEMY_LASER_COLOR,
            alpha: 1.0,
        });
    }
    for enemy in state.spawner.enemies() {
        sprites.push(Sprite {
            key: EntityKey::new(EntityKind::Enemy, enemy.id),
            pos: enemy.pos,
            size: enemy.size,
            color: ENEMY_COLOR,
            alpha: 1.0,
        });
    }

    let particle_size = Vec2::splat(PARTICLE_SIZE);
    for p in state.particles.particles() {
        sprites.push(Sprite {
            key: EntityKey::new(EntityKind::Particle, p.id),
            pos: p.pos - particle_size / 2.0,
            size: particle_size,
            color: p.color,
            alpha: p.fade,
        });
    }
    for e in state.particles.explosions() {
        sprites.push(Sprite {
            key: EntityKey::new(EntityKind::ExplosionMarker, e.id),
            pos: e.center - Vec2::splat(e.radius),
            size: Vec2::splat(e.radius * 2.0),
            color: EXPLOSION_COLOR,
            alpha: e.fade,
        });
    }

    sprites
}

//! Collision detection and response
//!
//! Everything collides as an axis-aligned box. Resolution marks entities for
//! removal while testing and sweeps every collection once at the end, so an
//! entity taken out by an earlier check can never be matched again in the
//! same pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, KillCause};
use crate::consts::{ENEMY_COLOR, ENEMY_LASER_COLOR, EXPLOSION_COLOR};

/// Axis-aligned box, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Strict AABB overlap; boxes that only touch do not collide
#[inline]
pub fn is_colliding(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}

/// What a resolve pass did, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub enemies_shot: usize,
    pub laser_hits: usize,
    pub rams: usize,
    pub game_over: bool,
}

/// Resolve every collision for this frame.
///
/// Order is fixed: player lasers vs enemies, enemy lasers vs player, then
/// enemies vs player. Health reaching zero ends the session once.
pub fn resolve(state: &mut GameState, now_ms: f64) -> CollisionReport {
    let mut report = CollisionReport::default();
    let GameState {
        tuning,
        rng,
        lifecycle,
        player,
        projectiles,
        spawner,
        particles,
        scheduler,
        events,
        ..
    } = state;

    let player_box = player.player.bounds();
    let enemies = spawner.enemies();
    let mut dead_enemies = vec![false; enemies.len()];

    // Player lasers vs enemies
    let player_lasers = projectiles.player_lasers();
    let mut dead_player_lasers = vec![false; player_lasers.len()];
    for (li, laser) in player_lasers.iter().enumerate() {
        let laser_box = laser.bounds();
        let hit = enemies
            .iter()
            .enumerate()
            .find(|(ei, enemy)| !dead_enemies[*ei] && is_colliding(&laser_box, &enemy.bounds()));
        if let Some((ei, enemy)) = hit {
            dead_player_lasers[li] = true;
            dead_enemies[ei] = true;
            lifecycle.add_score(tuning.kill_score);
            let center = enemy.center();
            particles.burst(center, ENEMY_COLOR, tuning.destruction_burst, now_ms, rng);
            log::debug!("Enemy {} shot down (score {})", enemy.id, lifecycle.score);
            events.push(GameEvent::EnemyDestroyed {
                enemy_id: enemy.id,
                cause: KillCause::Laser,
            });
            events.push(GameEvent::ParticleBurst {
                origin: center,
                color: ENEMY_COLOR,
                count: tuning.destruction_burst,
            });
            report.enemies_shot += 1;
        }
    }

    // Enemy lasers vs player
    let enemy_lasers = projectiles.enemy_lasers();
    let mut dead_enemy_lasers = vec![false; enemy_lasers.len()];
    for (li, laser) in enemy_lasers.iter().enumerate() {
        if !is_colliding(&laser.bounds(), &player_box) {
            continue;
        }
        dead_enemy_lasers[li] = true;
        let health = lifecycle.damage(tuning.laser_damage);
        particles.burst(laser.pos, ENEMY_LASER_COLOR, tuning.laser_hit_burst, now_ms, rng);
        log::debug!("Player hit by laser (health {health})");
        events.push(GameEvent::PlayerHit {
            damage: tuning.laser_damage,
            health,
        });
        events.push(GameEvent::ParticleBurst {
            origin: laser.pos,
            color: ENEMY_LASER_COLOR,
            count: tuning.laser_hit_burst,
        });
        report.laser_hits += 1;
    }

    // Enemies vs player (ramming); enemies already shot this frame are skipped
    for (ei, enemy) in enemies.iter().enumerate() {
        if dead_enemies[ei] || !is_colliding(&enemy.bounds(), &player_box) {
            continue;
        }
        dead_enemies[ei] = true;
        let health = lifecycle.damage(tuning.contact_damage);
        let center = enemy.center();
        particles.burst(center, EXPLOSION_COLOR, tuning.contact_burst, now_ms, rng);
        particles.explosion(center, now_ms);
        log::debug!("Enemy {} rammed the player (health {health})", enemy.id);
        events.push(GameEvent::EnemyDestroyed {
            enemy_id: enemy.id,
            cause: KillCause::Contact,
        });
        events.push(GameEvent::PlayerHit {
            damage: tuning.contact_damage,
            health,
        });
        events.push(GameEvent::ParticleBurst {
            origin: center,
            color: EXPLOSION_COLOR,
            count: tuning.contact_burst,
        });
        events.push(GameEvent::Explosion { center });
        report.rams += 1;
    }

    // Sweep
    projectiles.remove_player_lasers(&dead_player_lasers);
    projectiles.remove_enemy_lasers(&dead_enemy_lasers);
    spawner.remove_marked(&dead_enemies, scheduler);

    if lifecycle.is_depleted() {
        report.game_over = state.end_session();
    }
    report
}

//! Particle bursts and explosion markers
//!
//! Pure visual feedback: nothing here affects gameplay, and expiry depends
//! only on age.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::state::{ExplosionMarker, Particle};
use crate::consts::EXPLOSION_MAX_RADIUS;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    explosions: Vec<ExplosionMarker>,
    next_id: u32,
    lifetime_ms: f64,
    speed_range: (f32, f32),
    explosion_lifetime_ms: f64,
}

impl ParticleSystem {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            particles: Vec::new(),
            explosions: Vec::new(),
            next_id: 1,
            lifetime_ms: tuning.particle_lifetime_ms,
            speed_range: (tuning.particle_min_speed, tuning.particle_max_speed),
            explosion_lifetime_ms: tuning.explosion_lifetime_ms,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spray `count` particles from `origin`, each with its own random
    /// heading and speed
    pub fn burst(&mut self, origin: Vec2, color: u32, count: usize, now_ms: f64, rng: &mut Pcg32) {
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(self.speed_range.0..self.speed_range.1);
            let id = self.next_entity_id();
            self.particles.push(Particle {
                id,
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                color,
                created_at: now_ms,
                lifetime: self.lifetime_ms,
                fade: 1.0,
            });
        }
    }

    /// Drop an explosion marker centered on `center`
    pub fn explosion(&mut self, center: Vec2, now_ms: f64) {
        let id = self.next_entity_id();
        self.explosions.push(ExplosionMarker {
            id,
            center,
            created_at: now_ms,
            lifetime: self.explosion_lifetime_ms,
            radius: 0.0,
            fade: 1.0,
        });
    }

    /// Move particles, update fades, retire anything older than its lifetime
    pub fn advance(&mut self, now_ms: f64) {
        self.particles.retain_mut(|p| {
            let age = now_ms - p.created_at;
            if age > p.lifetime {
                return false;
            }
            p.pos += p.vel;
            p.fade = (1.0 - age / p.lifetime).clamp(0.0, 1.0) as f32;
            true
        });

        self.explosions.retain_mut(|e| {
            let age = now_ms - e.created_at;
            if age > e.lifetime {
                return false;
            }
            let progress = (age / e.lifetime).clamp(0.0, 1.0) as f32;
            e.radius = EXPLOSION_MAX_RADIUS * progress;
            e.fade = 1.0 - progress;
            true
        });
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn explosions(&self) -> &[ExplosionMarker] {
        &self.explosions
    }

    /// Drop particles with corrupted coordinates; returns how many
    pub fn sanitize(&mut self) -> usize {
        let before = self.particles.len();
        self.particles
            .retain(|p| p.pos.is_finite() && p.vel.is_finite());
        before - self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.explosions.clear();
    }
}

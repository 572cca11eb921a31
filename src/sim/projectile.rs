//! Laser collections for both sides
//!
//! Player lasers travel up, enemy lasers travel down. Which side fired a laser
//! is given only by the collection it lives in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Laser;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileManager {
    player_lasers: Vec<Laser>,
    enemy_lasers: Vec<Laser>,
    next_id: u32,
    laser_size: Vec2,
    player_speed: f32,
    enemy_speed: f32,
    margin: f32,
    playfield_height: f32,
}

impl ProjectileManager {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            player_lasers: Vec::new(),
            enemy_lasers: Vec::new(),
            next_id: 1,
            laser_size: Vec2::new(tuning.laser_width, tuning.laser_height),
            player_speed: tuning.player_laser_speed,
            enemy_speed: tuning.enemy_laser_speed,
            margin: tuning.laser_margin,
            playfield_height: tuning.playfield_height,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fire upward from a muzzle point (horizontal center, top edge of the
    /// shooter); the laser sits just above it
    pub fn spawn_player_laser(&mut self, origin_x: f32, origin_y: f32) -> u32 {
        let id = self.next_entity_id();
        let pos = Vec2::new(origin_x - self.laser_size.x / 2.0, origin_y - self.laser_size.y);
        self.player_lasers.push(Laser {
            id,
            pos,
            size: self.laser_size,
            speed: self.player_speed,
        });
        id
    }

    /// Fire downward from a muzzle point (horizontal center, bottom edge of
    /// the shooter)
    pub fn spawn_enemy_laser(&mut self, origin_x: f32, origin_y: f32) -> u32 {
        let id = self.next_entity_id();
        let pos = Vec2::new(origin_x - self.laser_size.x / 2.0, origin_y);
        self.enemy_lasers.push(Laser {
            id,
            pos,
            size: self.laser_size,
            speed: self.enemy_speed,
        });
        id
    }

    /// Move every laser and retire those past the edge they travel toward
    pub fn advance(&mut self) {
        for laser in &mut self.player_lasers {
            laser.pos.y -= laser.speed;
        }
        for laser in &mut self.enemy_lasers {
            laser.pos.y += laser.speed;
        }

        let top = -self.margin;
        self.player_lasers.retain(|l| l.pos.y + l.size.y >= top);
        let bottom = self.playfield_height + self.margin;
        self.enemy_lasers.retain(|l| l.pos.y <= bottom);
    }

    pub fn player_lasers(&self) -> &[Laser] {
        &self.player_lasers
    }

    pub fn enemy_lasers(&self) -> &[Laser] {
        &self.enemy_lasers
    }

    /// Sweep player lasers flagged during collision testing
    pub fn remove_player_lasers(&mut self, dead: &[bool]) {
        sweep(&mut self.player_lasers, dead);
    }

    /// Sweep enemy lasers flagged during collision testing
    pub fn remove_enemy_lasers(&mut self, dead: &[bool]) {
        sweep(&mut self.enemy_lasers, dead);
    }

    /// Drop lasers with corrupted coordinates; returns how many
    pub fn sanitize(&mut self) -> usize {
        let before = self.player_lasers.len() + self.enemy_lasers.len();
        self.player_lasers.retain(|l| l.pos.is_finite());
        self.enemy_lasers.retain(|l| l.pos.is_finite());
        before - self.player_lasers.len() - self.enemy_lasers.len()
    }

    pub fn clear(&mut self) {
        self.player_lasers.clear();
        self.enemy_lasers.clear();
    }

    /// Test hook: place a laser with an explicit rectangle
    #[cfg(test)]
    pub(crate) fn insert_player_laser(&mut self, pos: Vec2, size: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.player_lasers.push(Laser {
            id,
            pos,
            size,
            speed: self.player_speed,
        });
        id
    }

    #[cfg(test)]
    pub(crate) fn insert_enemy_laser(&mut self, pos: Vec2, size: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemy_lasers.push(Laser {
            id,
            pos,
            size,
            speed: self.enemy_speed,
        });
        id
    }
}

/// Remove entries whose flag is set, keeping order
pub(crate) fn sweep<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut flags = dead.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}

//! Enemy spawning and per-enemy fire schedules
//!
//! Spawning and firing are timer driven and irregular: every cycle samples a
//! fresh delay. Every handle is kept next to its owner so stopping the
//! spawner, or removing an enemy, cancels exactly what it armed.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::projectile::ProjectileManager;
use super::schedule::{Scheduler, TimerHandle, TimerTask};
use super::state::Enemy;
use crate::tuning::Tuning;

/// Whether the spawn schedule is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerState {
    Idle,
    Running { next_spawn: TimerHandle },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawner {
    enemies: Vec<Enemy>,
    state: SpawnerState,
    next_id: u32,
    enemy_size: Vec2,
    speed_range: (f32, f32),
    spawn_delay_ms: (f64, f64),
    fire_interval_ms: (f64, f64),
    playfield: Vec2,
}

impl EnemySpawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            enemies: Vec::new(),
            state: SpawnerState::Idle,
            next_id: 1,
            enemy_size: Vec2::new(tuning.enemy_width, tuning.enemy_height),
            speed_range: (tuning.enemy_min_speed, tuning.enemy_max_speed),
            spawn_delay_ms: (tuning.spawn_delay_min_ms, tuning.spawn_delay_max_ms),
            fire_interval_ms: (tuning.fire_interval_min_ms, tuning.fire_interval_max_ms),
            playfield: Vec2::new(tuning.playfield_width, tuning.playfield_height),
        }
    }

    pub fn state(&self) -> SpawnerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SpawnerState::Running { .. })
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Arm the first spawn; a no-op if already running
    pub fn start(&mut self, now_ms: f64, sched: &mut Scheduler, rng: &mut Pcg32) {
        if self.is_running() {
            log::debug!("Spawner already running");
            return;
        }
        let next_spawn = self.arm_spawn(now_ms, sched, rng);
        self.state = SpawnerState::Running { next_spawn };
    }

    /// Cancel the pending spawn and every live enemy's fire schedule
    pub fn stop(&mut self, sched: &mut Scheduler) {
        if let SpawnerState::Running { next_spawn } = self.state {
            sched.cancel(next_spawn);
        }
        self.state = SpawnerState::Idle;
        for enemy in &mut self.enemies {
            if let Some(handle) = enemy.fire_timer.take() {
                sched.cancel(handle);
            }
        }
    }

    /// Stop and forget every enemy
    pub fn clear(&mut self, sched: &mut Scheduler) {
        self.stop(sched);
        self.enemies.clear();
    }

    fn arm_spawn(&self, from_ms: f64, sched: &mut Scheduler, rng: &mut Pcg32) -> TimerHandle {
        let delay = rng.random_range(self.spawn_delay_ms.0..self.spawn_delay_ms.1);
        sched.schedule_at(from_ms + delay, TimerTask::SpawnEnemy)
    }

    fn arm_fire(
        &self,
        enemy_id: u32,
        from_ms: f64,
        sched: &mut Scheduler,
        rng: &mut Pcg32,
    ) -> TimerHandle {
        let interval = rng.random_range(self.fire_interval_ms.0..self.fire_interval_ms.1);
        sched.schedule_at(from_ms + interval, TimerTask::EnemyFire { enemy_id })
    }

    /// Spawn timer callback: one enemy along the top edge, then re-arm.
    ///
    /// Returns the new enemy's id, or `None` if the spawner was stopped.
    pub fn on_spawn_due(
        &mut self,
        at_ms: f64,
        sched: &mut Scheduler,
        rng: &mut Pcg32,
    ) -> Option<u32> {
        if !self.is_running() {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        let x = rng.random_range(0.0..self.playfield.x - self.enemy_size.x);
        let speed = rng.random_range(self.speed_range.0..self.speed_range.1);
        let fire_timer = self.arm_fire(id, at_ms, sched, rng);
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, -self.enemy_size.y),
            size: self.enemy_size,
            speed,
            fire_timer: Some(fire_timer),
        });

        let next_spawn = self.arm_spawn(at_ms, sched, rng);
        self.state = SpawnerState::Running { next_spawn };
        Some(id)
    }

    /// Fire timer callback: shoot from the enemy's current muzzle, then re-arm.
    ///
    /// Returns the new laser's id, or `None` if the enemy is gone.
    pub fn on_fire_due(
        &mut self,
        enemy_id: u32,
        at_ms: f64,
        sched: &mut Scheduler,
        rng: &mut Pcg32,
        projectiles: &mut ProjectileManager,
    ) -> Option<u32> {
        let idx = self.enemies.iter().position(|e| e.id == enemy_id)?;
        let muzzle = self.enemies[idx].muzzle();
        let laser_id = projectiles.spawn_enemy_laser(muzzle.x, muzzle.y);
        let handle = self.arm_fire(enemy_id, at_ms, sched, rng);
        self.enemies[idx].fire_timer = Some(handle);
        Some(laser_id)
    }

    /// Move every enemy down; enemies fully past the bottom are removed and
    /// their schedules cancelled. Returns how many left.
    pub fn advance(&mut self, sched: &mut Scheduler) -> usize {
        for enemy in &mut self.enemies {
            enemy.pos.y += enemy.speed;
        }
        let bottom = self.playfield.y;
        let before = self.enemies.len();
        self.enemies.retain_mut(|enemy| {
            if enemy.pos.y > bottom {
                cancel_fire(enemy, sched);
                false
            } else {
                true
            }
        });
        before - self.enemies.len()
    }

    /// Sweep enemies flagged during collision testing, cancelling their
    /// schedules
    pub fn remove_marked(&mut self, dead: &[bool], sched: &mut Scheduler) {
        let mut flags = dead.iter();
        self.enemies.retain_mut(|enemy| {
            if flags.next().copied().unwrap_or(false) {
                cancel_fire(enemy, sched);
                false
            } else {
                true
            }
        });
    }

    /// Drop enemies with corrupted coordinates; returns how many
    pub fn sanitize(&mut self, sched: &mut Scheduler) -> usize {
        let before = self.enemies.len();
        self.enemies.retain_mut(|enemy| {
            if enemy.pos.is_finite() && enemy.speed.is_finite() {
                true
            } else {
                cancel_fire(enemy, sched);
                false
            }
        });
        before - self.enemies.len()
    }

    /// Test hook: place an enemy with an explicit rectangle and its own
    /// fire schedule
    #[cfg(test)]
    pub(crate) fn insert_enemy(
        &mut self,
        pos: Vec2,
        size: Vec2,
        now_ms: f64,
        sched: &mut Scheduler,
        rng: &mut Pcg32,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let fire_timer = self.arm_fire(id, now_ms, sched, rng);
        self.enemies.push(Enemy {
            id,
            pos,
            size,
            speed: 0.0,
            fire_timer: Some(fire_timer),
        });
        id
    }

    #[cfg(test)]
    pub(crate) fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }
}

fn cancel_fire(enemy: &mut Enemy, sched: &mut Scheduler) {
    if let Some(handle) = enemy.fire_timer.take() {
        sched.cancel(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn setup() -> (EnemySpawner, Scheduler, Pcg32, ProjectileManager) {
        let tuning = Tuning::default();
        (
            EnemySpawner::new(&tuning),
            Scheduler::new(),
            Pcg32::seed_from_u64(42),
            ProjectileManager::new(&tuning),
        )
    }

    #[test]
    fn test_start_arms_one_spawn_in_range() {
        let (mut sp, mut sched, mut rng, _) = setup();
        sp.start(0.0, &mut sched, &mut rng);
        assert!(sp.is_running());
        assert_eq!(sched.active(), 1);
        let due = sched.next_due().unwrap();
        assert!((1000.0..3000.0).contains(&due));

        // Starting twice does not double the schedule
        sp.start(0.0, &mut sched, &mut rng);
        assert_eq!(sched.active(), 1);
    }

    #[test]
    fn test_spawn_cycle_spawns_one_and_rearms() {
        let (mut sp, mut sched, mut rng, _) = setup();
        sp.start(0.0, &mut sched, &mut rng);
        let due = sched.pop_due(f64::MAX).unwrap();
        let id = sp.on_spawn_due(due.at_ms, &mut sched, &mut rng).unwrap();

        assert_eq!(sp.enemies().len(), 1);
        let enemy = &sp.enemies()[0];
        assert_eq!(enemy.id, id);
        assert!(enemy.pos.x >= 0.0 && enemy.pos.x < 760.0);
        assert!(enemy.speed >= 1.0 && enemy.speed < 3.0);
        assert!(sched.is_pending(enemy.fire_timer.unwrap()));
        // Next spawn + this enemy's fire
        assert_eq!(sched.active(), 2);

        let SpawnerState::Running { next_spawn } = sp.state() else {
            panic!("spawner should still be running");
        };
        assert!(sched.is_pending(next_spawn));
    }

    #[test]
    fn test_spawn_delays_are_resampled() {
        let (mut sp, mut sched, mut rng, _) = setup();
        sp.start(0.0, &mut sched, &mut rng);
        let mut gaps = Vec::new();
        let mut last = 0.0;
        while gaps.len() < 20 {
            let due = sched.pop_due(f64::MAX).unwrap();
            if due.task == TimerTask::SpawnEnemy {
                gaps.push(due.at_ms - last);
                last = due.at_ms;
                sp.on_spawn_due(due.at_ms, &mut sched, &mut rng);
            }
        }
        assert!(gaps.iter().all(|g| (1000.0..3000.0).contains(g)));
        assert!(gaps.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_fire_anchors_at_muzzle_and_rearms() {
        let (mut sp, mut sched, mut rng, mut pm) = setup();
        let id = sp.insert_enemy(
            Vec2::new(100.0, 50.0),
            Vec2::new(40.0, 40.0),
            0.0,
            &mut sched,
            &mut rng,
        );
        let first = sp.enemies()[0].fire_timer.unwrap();
        let due = sched.pop_due(f64::MAX).unwrap();
        assert_eq!(due.handle, first);
        assert!((2000.0..4000.0).contains(&due.at_ms));

        sp.on_fire_due(id, due.at_ms, &mut sched, &mut rng, &mut pm)
            .unwrap();
        let laser = &pm.enemy_lasers()[0];
        assert_eq!(laser.pos.x + laser.size.x / 2.0, 120.0);
        assert_eq!(laser.pos.y, 90.0);

        let second = sp.enemies()[0].fire_timer.unwrap();
        assert_ne!(first, second);
        assert!(sched.is_pending(second));
    }

    #[test]
    fn test_fire_for_missing_enemy_is_ignored() {
        let (mut sp, mut sched, mut rng, mut pm) = setup();
        assert!(sp.on_fire_due(99, 0.0, &mut sched, &mut rng, &mut pm).is_none());
        assert!(pm.enemy_lasers().is_empty());
        assert_eq!(sched.active(), 0);
    }

    #[test]
    fn test_exit_bottom_cancels_fire() {
        let (mut sp, mut sched, mut rng, _) = setup();
        sp.insert_enemy(
            Vec2::new(10.0, 598.0),
            Vec2::new(40.0, 40.0),
            0.0,
            &mut sched,
            &mut rng,
        );
        sp.enemies_mut()[0].speed = 3.0;
        assert_eq!(sched.active(), 1);
        assert_eq!(sp.advance(&mut sched), 1);
        assert!(sp.enemies().is_empty());
        assert_eq!(sched.active(), 0);
    }

    #[test]
    fn test_stop_cancels_everything() {
        let (mut sp, mut sched, mut rng, mut pm) = setup();
        sp.start(0.0, &mut sched, &mut rng);
        while sp.enemies().len() < 4 {
            let due = sched.pop_due(f64::MAX).unwrap();
            match due.task {
                TimerTask::SpawnEnemy => {
                    sp.on_spawn_due(due.at_ms, &mut sched, &mut rng);
                }
                TimerTask::EnemyFire { enemy_id } => {
                    sp.on_fire_due(enemy_id, due.at_ms, &mut sched, &mut rng, &mut pm);
                }
            }
        }
        // One pending spawn plus one fire per enemy
        assert_eq!(sched.active(), 5);

        sp.stop(&mut sched);
        assert!(!sp.is_running());
        assert_eq!(sched.active(), 0);
        assert_eq!(sp.enemies().len(), 4);
        assert!(sp.enemies().iter().all(|e| e.fire_timer.is_none()));
        assert!(sp.on_spawn_due(0.0, &mut sched, &mut rng).is_none());
    }

    #[test]
    fn test_remove_marked_cancels_only_marked() {
        let (mut sp, mut sched, mut rng, _) = setup();
        for x in [0.0, 100.0, 200.0] {
            sp.insert_enemy(
                Vec2::new(x, 0.0),
                Vec2::new(40.0, 40.0),
                0.0,
                &mut sched,
                &mut rng,
            );
        }
        let kept = sp.enemies()[0].fire_timer.unwrap();
        sp.remove_marked(&[false, true, true], &mut sched);
        assert_eq!(sp.enemies().len(), 1);
        assert_eq!(sched.active(), 1);
        assert!(sched.is_pending(kept));
    }
}

//! Per-frame game loop
//!
//! The host calls [`GameLoop::frame`] once per display refresh with its
//! timestamp. Due timers fire first (spawns, enemy shots), then the fixed
//! update order runs: player, lasers, enemies, collisions, particles.

use rand::Rng;

use super::collision;
use super::schedule::TimerTask;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_FRAME_GAP_MS;
use crate::error::SetupError;
use crate::platform::{Control, InputSource, InputState};
use crate::renderer::{RenderSync, Renderer, snapshot};
use crate::tuning::Tuning;

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Still playing, call `frame` again next refresh
    Rearm,
    /// Session over, stop the frame callback
    Halt,
}

/// Collects the hooks a session needs before it may start
#[derive(Default)]
pub struct GameLoopBuilder {
    tuning: Tuning,
    seed: u64,
    renderer: Option<Box<dyn Renderer>>,
    input: Option<Box<dyn InputSource>>,
}

impl GameLoopBuilder {
    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Start the first session; refuses without both hooks or with bad tuning
    pub fn start(self, now_ms: f64) -> Result<GameLoop, SetupError> {
        let renderer = self.renderer.ok_or(SetupError::MissingRenderer)?;
        let input_source = self.input.ok_or(SetupError::MissingInput)?;
        self.tuning.validate()?;

        let mut game = GameLoop {
            state: GameState::new(self.tuning, self.seed, now_ms),
            input: InputState::new(),
            input_source,
            renderer,
            sync: RenderSync::new(),
        };
        game.restart(now_ms, self.seed);
        Ok(game)
    }
}

/// Owns the session and drives it frame by frame
pub struct GameLoop {
    state: GameState,
    input: InputState,
    input_source: Box<dyn InputSource>,
    renderer: Box<dyn Renderer>,
    sync: RenderSync,
}

impl GameLoop {
    pub fn builder() -> GameLoopBuilder {
        GameLoopBuilder::default()
    }

    /// Begin a new session seeded from the current one
    pub fn start_game(&mut self, now_ms: f64) {
        let seed = self.state.rng.random::<u64>();
        self.restart(now_ms, seed);
    }

    /// Begin a new session with an explicit seed.
    ///
    /// Cancels every schedule of the old session, clears all collections,
    /// resets score and health, and arms the spawner.
    pub fn restart(&mut self, now_ms: f64, seed: u64) {
        self.state.spawner.clear(&mut self.state.scheduler);
        // Keep the scheduler so handles are never reused across sessions
        let mut scheduler = std::mem::take(&mut self.state.scheduler);
        scheduler.clear();
        let events = std::mem::take(&mut self.state.events);
        self.sync.reset(self.renderer.as_mut());

        let tuning = self.state.tuning.clone();
        self.state = GameState::new(tuning, seed, now_ms);
        self.state.scheduler = scheduler;
        self.state.events = events;
        self.input.clear();

        let s = &mut self.state;
        s.spawner.start(now_ms, &mut s.scheduler, &mut s.rng);
        s.emit(GameEvent::SessionStarted { seed });
        s.trim_events();
        log::info!("Session started (seed {seed})");

        self.sync.apply(&snapshot(&self.state), self.renderer.as_mut());
    }

    /// Run one frame at host time `now_ms`.
    ///
    /// After GameOver only effect expiry runs (see [`GameLoop::advance_effects`]).
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if self.state.lifecycle.is_game_over() {
            self.advance_effects(now_ms);
            return FrameOutcome::Halt;
        }

        while let Some(event) = self.input_source.poll() {
            self.input.apply(event);
        }

        let now = self.clock(now_ms);
        self.state.frame += 1;

        self.run_timers(now);
        self.step(now);
        sanitize(&mut self.state);
        self.state.trim_events();

        self.sync.apply(&snapshot(&self.state), self.renderer.as_mut());

        if self.state.lifecycle.is_game_over() {
            FrameOutcome::Halt
        } else {
            FrameOutcome::Rearm
        }
    }

    /// Age out particles and explosion markers without touching gameplay.
    ///
    /// Hosts keep calling this after GameOver until it returns false so the
    /// last bursts fade out and leave the renderer.
    pub fn advance_effects(&mut self, now_ms: f64) -> bool {
        let now = self.clock(now_ms);
        self.state.particles.advance(now);
        self.sync.apply(&snapshot(&self.state), self.renderer.as_mut());
        let effects = &self.state.particles;
        !effects.particles().is_empty() || !effects.explosions().is_empty()
    }

    /// Move the session clock to the host time.
    ///
    /// Time never runs backwards. A gap longer than [`MAX_FRAME_GAP_MS`]
    /// (stalled tab, late first frame) postpones every schedule by the
    /// excess, so one frame never replays the missed spawns and shots.
    fn clock(&mut self, now_ms: f64) -> f64 {
        let prev = self.state.now_ms;
        if !now_ms.is_finite() || now_ms <= prev {
            return prev;
        }
        let gap = now_ms - prev;
        if gap > MAX_FRAME_GAP_MS && !self.state.lifecycle.is_game_over() {
            let stalled = gap - MAX_FRAME_GAP_MS;
            log::debug!("Host stalled {gap:.0}ms; postponing schedules by {stalled:.0}ms");
            self.state.scheduler.postpone(stalled);
        }
        self.state.now_ms = now_ms;
        now_ms
    }

    /// Fire every timer due by `now`, each to completion, in due order
    fn run_timers(&mut self, now: f64) {
        while let Some(due) = self.state.scheduler.pop_due(now) {
            let s = &mut self.state;
            log::trace!("Timer {:?} due at {:.1}ms", due.task, due.at_ms);
            match due.task {
                TimerTask::SpawnEnemy => {
                    if let Some(enemy_id) =
                        s.spawner.on_spawn_due(due.at_ms, &mut s.scheduler, &mut s.rng)
                    {
                        log::debug!("Enemy {enemy_id} spawned");
                        s.emit(GameEvent::EnemySpawned { enemy_id });
                    }
                }
                TimerTask::EnemyFire { enemy_id } => {
                    match s.spawner.on_fire_due(
                        enemy_id,
                        due.at_ms,
                        &mut s.scheduler,
                        &mut s.rng,
                        &mut s.projectiles,
                    ) {
                        Some(laser_id) => s.emit(GameEvent::EnemyFired { enemy_id, laser_id }),
                        None => log::warn!("Fire timer outlived enemy {enemy_id}"),
                    }
                }
            }
        }
    }

    /// The fixed per-frame update order
    fn step(&mut self, now: f64) {
        let s = &mut self.state;

        s.player.update(&self.input);
        if self.input.is_pressed(Control::Fire) && s.player.request_shot(now) {
            let muzzle = s.player.muzzle();
            let laser_id = s.projectiles.spawn_player_laser(muzzle.x, muzzle.y);
            s.emit(GameEvent::ShotFired { laser_id });
        }

        s.projectiles.advance();
        s.spawner.advance(&mut s.scheduler);
        collision::resolve(s, now);
        s.particles.advance(now);
    }

    // === Read-only surface for the host UI ===

    pub fn score(&self) -> u64 {
        self.state.lifecycle.score
    }

    pub fn health(&self) -> u32 {
        self.state.lifecycle.health
    }

    pub fn phase(&self) -> GamePhase {
        self.state.lifecycle.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.lifecycle.is_game_over()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts that script scenarios (tests, replays)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Pending timers across the whole session
    pub fn active_timers(&self) -> usize {
        self.state.scheduler.active()
    }

    /// Take every event since the last drain.
    ///
    /// Hosts should drain every frame; past
    /// [`MAX_PENDING_EVENTS`](crate::consts::MAX_PENDING_EVENTS) the
    /// oldest undrained events are dropped.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}

/// Remove or repair anything whose coordinates stopped being finite
fn sanitize(state: &mut GameState) {
    if state.player.sanitize() {
        log::warn!("Player state was non-finite; reset into bounds");
    }
    let lasers = state.projectiles.sanitize();
    let enemies = state.spawner.sanitize(&mut state.scheduler);
    let particles = state.particles.sanitize();
    if lasers + enemies + particles > 0 {
        log::warn!(
            "Dropped non-finite entities: {lasers} lasers, {enemies} enemies, {particles} particles"
        );
    }
}

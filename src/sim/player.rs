//! Player movement and shot gating

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::platform::InputState;
use crate::tuning::Tuning;

/// Owns the player ship and integrates it from input each frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerController {
    pub player: Player,
    /// Playfield size the ship is confined to
    bounds: Vec2,
    bounce_damping: f32,
    stop_epsilon: f32,
    shot_cooldown_ms: f64,
    /// Time of the last accepted shot
    last_shot_ms: Option<f64>,
}

impl PlayerController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            player: Player::new(tuning),
            bounds: Vec2::new(tuning.playfield_width, tuning.playfield_height),
            bounce_damping: tuning.bounce_damping,
            stop_epsilon: tuning.stop_epsilon,
            shot_cooldown_ms: tuning.shot_cooldown_ms,
            last_shot_ms: None,
        }
    }

    /// Advance the ship one frame from the held controls
    pub fn update(&mut self, input: &InputState) {
        let p = &mut self.player;

        p.vel.x = step_axis(p.vel.x, input.horizontal(), p, self.stop_epsilon);
        p.vel.y = step_axis(p.vel.y, input.vertical(), p, self.stop_epsilon);
        // Per-axis clamping still lets diagonals exceed max speed
        p.vel = p.vel.clamp_length_max(p.max_speed);

        p.pos += p.vel;

        let max = self.bounds - p.size;
        if p.pos.x < 0.0 {
            p.pos.x = 0.0;
            p.vel.x = -p.vel.x * self.bounce_damping;
        } else if p.pos.x > max.x {
            p.pos.x = max.x;
            p.vel.x = -p.vel.x * self.bounce_damping;
        }
        if p.pos.y < 0.0 {
            p.pos.y = 0.0;
            p.vel.y = -p.vel.y * self.bounce_damping;
        } else if p.pos.y > max.y {
            p.pos.y = max.y;
            p.vel.y = -p.vel.y * self.bounce_damping;
        }
    }

    /// Ask to fire at `now_ms`; true if the cooldown has elapsed.
    ///
    /// Rejected requests leave the cooldown untouched.
    pub fn request_shot(&mut self, now_ms: f64) -> bool {
        let ready = match self.last_shot_ms {
            Some(last) => now_ms - last >= self.shot_cooldown_ms,
            None => true,
        };
        if ready {
            self.last_shot_ms = Some(now_ms);
        }
        ready
    }

    /// Current speed, for effects only
    pub fn speed(&self) -> f32 {
        self.player.vel.length()
    }

    /// Anchor for player lasers: horizontal center of the top edge
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.player.pos.x + self.player.size.x / 2.0, self.player.pos.y)
    }

    /// Put a ship with a corrupted position back in bounds, at rest
    pub fn sanitize(&mut self) -> bool {
        let p = &mut self.player;
        if p.pos.is_finite() && p.vel.is_finite() {
            return false;
        }
        let max = self.bounds - p.size;
        p.pos = if p.pos.is_finite() {
            p.pos.clamp(Vec2::ZERO, max)
        } else {
            Vec2::new(max.x / 2.0, max.y)
        };
        p.vel = Vec2::ZERO;
        true
    }
}

/// One axis of the velocity update
fn step_axis(v: f32, dir: f32, p: &Player, epsilon: f32) -> f32 {
    if dir > 0.0 {
        (v + p.acceleration).min(p.max_speed)
    } else if dir < 0.0 {
        (v - p.acceleration).max(-p.max_speed)
    } else {
        let v = v * p.deceleration;
        if v.abs() < epsilon { 0.0 } else { v }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Control;
    use proptest::prelude::*;

    fn held(controls: &[Control]) -> InputState {
        let mut input = InputState::new();
        for c in controls {
            input.press(*c);
        }
        input
    }

    #[test]
    fn test_accelerates_to_max_speed() {
        let mut ctl = PlayerController::new(&Tuning::default());
        let input = held(&[Control::Left]);
        ctl.update(&input);
        assert_eq!(ctl.player.vel.x, -0.5);
        for _ in 0..40 {
            ctl.update(&input);
            if ctl.player.pos.x == 0.0 {
                break;
            }
            assert!(ctl.player.vel.x >= -8.0);
        }
    }

    #[test]
    fn test_coasting_decays_to_exact_zero() {
        let mut ctl = PlayerController::new(&Tuning::default());
        ctl.player.vel = Vec2::new(4.0, 0.0);
        ctl.update(&InputState::new());
        assert!((ctl.player.vel.x - 4.0 * 0.92).abs() < 1e-6);
        for _ in 0..200 {
            ctl.update(&InputState::new());
        }
        assert_eq!(ctl.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_bounces_off_left_edge_with_damping() {
        let mut ctl = PlayerController::new(&Tuning::default());
        ctl.player.pos.x = 2.0;
        ctl.player.vel = Vec2::new(-6.0, 0.0);
        ctl.update(&held(&[Control::Left]));
        assert_eq!(ctl.player.pos.x, 0.0);
        // -6.5 after acceleration, inverted and halved
        assert!((ctl.player.vel.x - 3.25).abs() < 1e-6);
    }

    #[test]
    fn test_bounces_off_bottom_edge() {
        let tuning = Tuning::default();
        let mut ctl = PlayerController::new(&tuning);
        ctl.player.vel = Vec2::new(0.0, 4.0);
        ctl.update(&held(&[Control::Down]));
        assert_eq!(ctl.player.pos.y, tuning.playfield_height - tuning.player_height);
        assert!(ctl.player.vel.y < 0.0);
    }

    #[test]
    fn test_diagonal_respects_max_speed() {
        let mut ctl = PlayerController::new(&Tuning::default());
        ctl.player.pos = Vec2::new(400.0, 300.0);
        let input = held(&[Control::Up, Control::Right]);
        for _ in 0..12 {
            ctl.update(&input);
            assert!(ctl.speed() <= 8.0 + 1e-4);
        }
    }

    #[test]
    fn test_shot_cooldown() {
        let mut ctl = PlayerController::new(&Tuning::default());
        assert!(ctl.request_shot(1000.0));
        assert!(!ctl.request_shot(1100.0));

        let mut ctl = PlayerController::new(&Tuning::default());
        assert!(ctl.request_shot(1000.0));
        assert!(ctl.request_shot(1300.0));
    }

    #[test]
    fn test_rejected_shot_does_not_reset_cooldown() {
        let mut ctl = PlayerController::new(&Tuning::default());
        assert!(ctl.request_shot(0.0));
        assert!(!ctl.request_shot(200.0));
        assert!(ctl.request_shot(250.0));
    }

    #[test]
    fn test_sanitize_non_finite() {
        let tuning = Tuning::default();
        let mut ctl = PlayerController::new(&tuning);
        assert!(!ctl.sanitize());
        ctl.player.pos.x = f32::NAN;
        ctl.player.vel.y = f32::INFINITY;
        assert!(ctl.sanitize());
        assert!(ctl.player.pos.is_finite());
        assert_eq!(ctl.player.vel, Vec2::ZERO);
        assert!(ctl.player.pos.x <= tuning.playfield_width - tuning.player_width);
    }

    fn control_strategy() -> impl Strategy<Value = Vec<Control>> {
        prop::collection::vec(
            prop::sample::select(vec![
                Control::Up,
                Control::Down,
                Control::Left,
                Control::Right,
            ]),
            0..3,
        )
    }

    proptest! {
        #[test]
        fn prop_speed_and_position_bounded(
            frames in prop::collection::vec(control_strategy(), 1..300),
        ) {
            let tuning = Tuning::default();
            let mut ctl = PlayerController::new(&tuning);
            let max = Vec2::new(
                tuning.playfield_width - tuning.player_width,
                tuning.playfield_height - tuning.player_height,
            );
            for controls in frames {
                ctl.update(&held(&controls));
                prop_assert!(ctl.speed() <= tuning.player_max_speed + 1e-4);
                prop_assert!(ctl.player.pos.x >= 0.0 && ctl.player.pos.x <= max.x);
                prop_assert!(ctl.player.pos.y >= 0.0 && ctl.player.pos.y <= max.y);
            }
        }
    }
}

//! Input controls and the live pressed-set

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// The fixed control vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl Control {
    const ALL: [Control; 5] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::Fire,
    ];

    /// Map a host key name (`KeyboardEvent.key` style) to a control
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Control::Up),
            "ArrowDown" | "s" | "S" => Some(Control::Down),
            "ArrowLeft" | "a" | "A" => Some(Control::Left),
            "ArrowRight" | "d" | "D" => Some(Control::Right),
            " " | "Space" | "Spacebar" => Some(Control::Fire),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Control::Up => 1 << 0,
            Control::Down => 1 << 1,
            Control::Left => 1 << 2,
            Control::Right => 1 << 3,
            Control::Fire => 1 << 4,
        }
    }
}

/// A single edge reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Pressed(Control),
    Released(Control),
}

/// Set of currently held controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    bits: u8,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        self.bits |= control.bit();
    }

    pub fn release(&mut self, control: Control) {
        self.bits &= !control.bit();
    }

    #[inline]
    pub fn is_pressed(&self, control: Control) -> bool {
        self.bits & control.bit() != 0
    }

    /// Release everything (session restart, focus loss)
    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Fold one host event into the set
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(control) => self.press(control),
            InputEvent::Released(control) => self.release(control),
        }
    }

    /// Controls currently held, in a stable order
    pub fn pressed(&self) -> impl Iterator<Item = Control> + '_ {
        Control::ALL.into_iter().filter(|c| self.is_pressed(*c))
    }

    /// -1, 0 or +1 along x from Left/Right
    pub fn horizontal(&self) -> f32 {
        axis(self.is_pressed(Control::Left), self.is_pressed(Control::Right))
    }

    /// -1, 0 or +1 along y from Up/Down (y grows downward)
    pub fn vertical(&self) -> f32 {
        axis(self.is_pressed(Control::Up), self.is_pressed(Control::Down))
    }
}

fn axis(decrease: bool, increase: bool) -> f32 {
    match (decrease, increase) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Source of host input edges, drained once per frame
pub trait InputSource {
    fn poll(&mut self) -> Option<InputEvent>;
}

/// Shared in-memory event queue
///
/// Clones share the same queue, so the host keeps one handle for pushing
/// while the game loop owns another for draining.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: Rc<RefCell<VecDeque<InputEvent>>>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: InputEvent) {
        self.events.borrow_mut().push_back(event);
    }

    pub fn press(&self, control: Control) {
        self.push(InputEvent::Pressed(control));
    }

    pub fn release(&self, control: Control) {
        self.push(InputEvent::Released(control));
    }

    /// Push a keydown by host key name; unknown keys are ignored
    pub fn key_down(&self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.press(control);
        }
    }

    /// Push a keyup by host key name; unknown keys are ignored
    pub fn key_up(&self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.release(control);
        }
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl InputSource for InputQueue {
    fn poll(&mut self) -> Option<InputEvent> {
        self.events.borrow_mut().pop_front()
    }
}

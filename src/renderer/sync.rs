//! Keeps a renderer's entity set in step with the simulation

use std::collections::BTreeSet;

use super::{EntityKey, Renderer, Sprite};

/// Remembers which keys the renderer currently holds
#[derive(Debug, Default)]
pub struct RenderSync {
    live: BTreeSet<EntityKey>,
}

impl RenderSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff this frame's sprites against the last frame's
    pub fn apply(&mut self, sprites: &[Sprite], renderer: &mut dyn Renderer) {
        let mut seen = BTreeSet::new();
        for sprite in sprites {
            seen.insert(sprite.key);
            if self.live.contains(&sprite.key) {
                renderer.update(sprite);
            } else {
                renderer.create(sprite);
            }
        }
        for key in self.live.difference(&seen) {
            renderer.destroy(*key);
        }
        self.live = seen;
    }

    /// Destroy everything the renderer holds
    pub fn reset(&mut self, renderer: &mut dyn Renderer) {
        for key in std::mem::take(&mut self.live) {
            renderer.destroy(key);
        }
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }
}

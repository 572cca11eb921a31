//! Renderer boundary
//!
//! The simulation never draws. Each frame it publishes a snapshot of sprites
//! and `RenderSync` turns that into create/update/destroy calls on whatever
//! renderer the host plugged in.

pub mod sprite;
pub mod sync;

pub use sprite::{EntityKey, EntityKind, Sprite, snapshot};
pub use sync::RenderSync;

/// Host-side presentation hooks, keyed by entity
pub trait Renderer {
    /// A new entity appeared
    fn create(&mut self, sprite: &Sprite);
    /// An existing entity moved or faded
    fn update(&mut self, sprite: &Sprite);
    /// The entity is gone
    fn destroy(&mut self, key: EntityKey);
}

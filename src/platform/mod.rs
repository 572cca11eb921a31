//! Platform abstraction layer
//!
//! The host owns key capture; the core only sees a stream of
//! pressed/released controls folded into a live pressed-set.

pub mod input;

pub use input::{Control, InputEvent, InputQueue, InputSource, InputState};

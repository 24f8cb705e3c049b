//! Input management
//!
//! Window events land in [`SharedInput`] on the event thread. The render thread
//! turns those levels into per-frame edges with [`InputTracker`].

mod codes;
mod shared;
mod tracker;

pub use codes::{KeyCode, MouseButton};
pub use shared::{RawInput, SharedInput};
pub use tracker::{ButtonState, InputTracker, ScrollDirection};

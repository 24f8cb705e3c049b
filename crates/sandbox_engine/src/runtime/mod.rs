//! Render loop runtime
//!
//! [`RenderLoop`] drives a scene's [`FrameHooks`] on a dedicated render thread
//! while the calling thread services window events. The two threads share a
//! [`LoopToken`] and the raw input state; nothing else crosses between them.

mod hooks;
mod platform;
mod render_loop;
mod token;

pub use hooks::{Frame, FrameHooks};
pub use platform::{EventPump, Presenter, PumpStatus};
pub use render_loop::{ExitReason, LoopError, LoopOutcome, RenderLoop};
pub use token::{LoopState, LoopToken};

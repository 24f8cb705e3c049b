//! What the render loop needs from the windowing layer

use std::time::Duration;

use crate::input::SharedInput;
use crate::render::gpu::GraphicsDevice;

/// The graphics context, owned by the render thread while the loop runs
pub trait Presenter: Send {
    /// Make the context current on the calling thread
    fn make_current(&mut self);

    /// Detach the context from the calling thread
    fn release_current(&mut self);

    /// Present the back buffer
    fn swap_buffers(&mut self);

    /// Ask for the window title to change
    fn set_title(&mut self, title: &str);

    /// Driver for this context
    fn device(&mut self) -> &mut dyn GraphicsDevice;
}

/// Result of one round of event handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpStatus {
    /// The user asked to close (window close button or Escape)
    pub close_requested: bool,
}

/// Window events, serviced on the controlling thread
pub trait EventPump {
    /// Wait up to `timeout` for events and record them in `input`
    fn pump(&mut self, input: &SharedInput, timeout: Duration) -> PumpStatus;

    /// Framebuffer size in pixels
    fn framebuffer_size(&self) -> (u32, u32);
}

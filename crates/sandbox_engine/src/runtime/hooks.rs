//! Scene callbacks driven by the render loop

use crate::foundation::time::FrameClock;
use crate::input::InputTracker;
use crate::render::camera::{Camera, Projection};
use crate::render::controls::FreeFlyControls;
use crate::render::gpu::GraphicsDevice;

/// Everything a hook can reach during one call
///
/// Borrowed from the render thread's loop state for the duration of the call.
pub struct Frame<'a> {
    /// Driver for the current context
    pub device: &'a mut dyn GraphicsDevice,
    /// This frame's input edges
    pub input: &'a InputTracker,
    /// Loop-owned camera
    pub camera: &'a mut Camera,
    /// Loop-owned projection
    pub projection: &'a mut Projection,
    /// Default input mapping
    pub controls: &'a FreeFlyControls,
    /// Frame timing
    pub clock: &'a FrameClock,
    /// Framebuffer size in pixels
    pub viewport: (u32, u32),
}

impl Frame<'_> {
    /// Apply the default free-fly controls for this frame
    pub fn apply_default_controls(&mut self, delta_time: f32) {
        self.controls.apply(
            self.input,
            self.camera,
            self.projection,
            self.viewport,
            delta_time,
        );
    }
}

/// Callbacks a scene plugs into [`RenderLoop`](super::RenderLoop)
///
/// All methods run on the render thread with the graphics context current.
pub trait FrameHooks: Send {
    /// Create GPU resources; returning false stops the loop before any frame
    fn setup(&mut self, frame: &mut Frame<'_>) -> bool;

    /// React to this frame's input; defaults to the free-fly controls
    fn handle_input(&mut self, frame: &mut Frame<'_>, delta_time: f32) {
        frame.apply_default_controls(delta_time);
    }

    /// Advance and draw one frame; returning false requests a stop
    fn update(&mut self, frame: &mut Frame<'_>, delta_time: f32) -> bool;

    /// Release GPU resources after the last frame
    fn teardown(&mut self, _frame: &mut Frame<'_>) {}
}

//! Two-thread render loop
//!
//! The calling thread becomes the controller: it services window events and
//! never touches the GPU. A scoped "renderer" thread takes the graphics
//! context, runs setup, then renders frames until the [`LoopToken`] leaves
//! `Running`:
//!
//! 1. tick the frame clock
//! 2. sample input edges
//! 3. `handle_input` hook
//! 4. `update` hook (false requests a stop)
//! 5. FPS title every `title_refresh_interval` seconds
//! 6. swap buffers
//!
//! After the last frame the renderer runs `teardown`, releases the context
//! and exits; the controller joins it and marks the token `Stopped`.

use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::config::{CameraSettings, ControlSettings, LoopSettings, SandboxConfig};
use crate::foundation::math::Vec3;
use crate::foundation::time::{FpsCounter, FrameClock};
use crate::input::{InputTracker, SharedInput};
use crate::render::camera::{Camera, Projection};
use crate::render::controls::FreeFlyControls;
use crate::render::gpu::GraphicsDevice;

use super::hooks::{Frame, FrameHooks};
use super::platform::{EventPump, Presenter};
use super::token::{LoopState, LoopToken};

/// Render loop errors
#[derive(Error, Debug)]
pub enum LoopError {
    /// The loop's token has already left `NotStarted`
    #[error("render loop has already been run")]
    AlreadyRun,

    /// The renderer thread could not be created
    #[error("failed to spawn renderer thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A hook panicked on the renderer thread
    #[error("renderer thread panicked: {0}")]
    RendererPanicked(String),
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `setup` returned false; no frame was rendered
    SetupFailed,
    /// `update` returned false
    UpdateRequestedStop,
    /// The window was closed or Escape was pressed
    CloseRequested,
    /// Someone else called [`LoopToken::request_stop`]
    StopRequested,
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopOutcome {
    /// Frames rendered (= buffer swaps)
    pub frames: u64,
    /// Seconds of frame time rendered
    pub elapsed: f32,
    /// Why the loop ended
    pub exit: ExitReason,
}

impl LoopOutcome {
    /// Whether the run ended without a failure
    pub const fn is_success(&self) -> bool {
        !matches!(self.exit, ExitReason::SetupFailed)
    }
}

struct RendererReport {
    frames: u64,
    elapsed: f32,
    update_stopped: bool,
    setup_failed: bool,
}

/// Requests a stop if the renderer unwinds, so the controller stops waiting
struct StopOnPanic<'a>(&'a LoopToken);

impl Drop for StopOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            log::error!("Renderer thread panicked, stopping the loop");
            self.0.request_stop();
        }
    }
}

/// State the renderer owns between hook calls
struct FrameState {
    tracker: InputTracker,
    camera: Camera,
    projection: Projection,
    controls: FreeFlyControls,
    clock: FrameClock,
    viewport: (u32, u32),
}

impl FrameState {
    fn new(camera: &CameraSettings, controls: &ControlSettings, viewport: (u32, u32)) -> Self {
        let mut view = Camera::new(Vec3::from(camera.position), Vec3::from(camera.front));
        view.speed = camera.normal_speed;
        view.sensitivity = camera.sensitivity;

        Self {
            tracker: InputTracker::new(),
            camera: view,
            projection: Projection::for_viewport(
                camera.fov,
                viewport.0,
                viewport.1,
                camera.near,
                camera.far,
            ),
            controls: FreeFlyControls::from_settings(camera, controls),
            clock: FrameClock::new(),
            viewport,
        }
    }

    fn frame<'a>(&'a mut self, device: &'a mut dyn GraphicsDevice) -> Frame<'a> {
        Frame {
            device,
            input: &self.tracker,
            camera: &mut self.camera,
            projection: &mut self.projection,
            controls: &self.controls,
            clock: &self.clock,
            viewport: self.viewport,
        }
    }
}

/// Runs scene hooks on a dedicated render thread
pub struct RenderLoop {
    name: String,
    camera: CameraSettings,
    controls: ControlSettings,
    settings: LoopSettings,
    token: LoopToken,
    input: SharedInput,
}

impl RenderLoop {
    /// Create a loop from the sandbox configuration
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            name: config.window.title.clone(),
            camera: config.camera.clone(),
            controls: config.controls.clone(),
            settings: config.render_loop.clone(),
            token: LoopToken::new(),
            input: SharedInput::new(),
        }
    }

    /// Token shared by both threads; request a stop through it
    pub const fn token(&self) -> &LoopToken {
        &self.token
    }

    /// Raw input written by the event pump
    pub const fn input(&self) -> &SharedInput {
        &self.input
    }

    /// Current state of the loop
    pub fn state(&self) -> LoopState {
        self.token.state()
    }

    /// Run until the scene, the user or the token stops the loop
    ///
    /// The graphics context must not be current on the calling thread.
    pub fn run<H, P, E>(
        &self,
        hooks: &mut H,
        presenter: P,
        pump: &mut E,
    ) -> Result<LoopOutcome, LoopError>
    where
        H: FrameHooks,
        P: Presenter,
        E: EventPump,
    {
        if self.token.state() != LoopState::NotStarted {
            return Err(LoopError::AlreadyRun);
        }

        let viewport = pump.framebuffer_size();
        let timeout = Duration::from_secs_f64(self.settings.event_wait_timeout.max(0.0));
        log::info!("Starting render loop '{}' at {}x{}", self.name, viewport.0, viewport.1);

        let (joined, close_requested) = thread::scope(|scope| {
            let renderer = thread::Builder::new()
                .name("renderer".into())
                .spawn_scoped(scope, move || self.render_thread(hooks, presenter, viewport))?;

            let mut close_requested = false;
            while !self.token.is_stopping() && !renderer.is_finished() {
                if pump.pump(&self.input, timeout).close_requested {
                    log::info!("Close requested");
                    close_requested = true;
                    self.token.request_stop();
                }
            }

            Ok::<_, LoopError>((renderer.join(), close_requested))
        })?;

        self.token.finish();

        let report = joined.map_err(|payload| LoopError::RendererPanicked(panic_message(&*payload)))?;
        let exit = if report.setup_failed {
            ExitReason::SetupFailed
        } else if report.update_stopped {
            ExitReason::UpdateRequestedStop
        } else if close_requested {
            ExitReason::CloseRequested
        } else {
            ExitReason::StopRequested
        };

        log::info!(
            "Render loop finished after {} frames ({:?})",
            report.frames,
            exit
        );
        Ok(LoopOutcome {
            frames: report.frames,
            elapsed: report.elapsed,
            exit,
        })
    }

    fn render_thread<H, P>(&self, hooks: &mut H, mut presenter: P, viewport: (u32, u32)) -> RendererReport
    where
        H: FrameHooks,
        P: Presenter,
    {
        let _guard = StopOnPanic(&self.token);
        presenter.make_current();

        {
            let device = presenter.device();
            let info = device.device_info();
            log::info!("Renderer: {}", info.renderer);
            log::info!("Vendor: {}", info.vendor);
            log::info!("OpenGL version: {}", info.version);
            log::info!("GLSL version: {}", info.shading_language);
            device.set_viewport(viewport.0, viewport.1);
            device.enable_depth_test();
        }

        let mut state = FrameState::new(&self.camera, &self.controls, viewport);
        let mut report = RendererReport {
            frames: 0,
            elapsed: 0.0,
            update_stopped: false,
            setup_failed: false,
        };

        if !hooks.setup(&mut state.frame(presenter.device())) {
            log::error!("Scene setup failed, stopping");
            self.token.abort();
            report.setup_failed = true;
            presenter.release_current();
            return report;
        }
        if !self.token.start() {
            log::debug!("Stop requested during setup");
        }

        let mut fps = FpsCounter::new(self.settings.title_refresh_interval);
        // Setup time is not part of the first frame
        state.clock = FrameClock::new();

        while self.token.is_running() {
            let delta_time = state.clock.tick();
            state.tracker.update(&self.input);

            {
                let mut frame = state.frame(presenter.device());
                hooks.handle_input(&mut frame, delta_time);
                if !hooks.update(&mut frame, delta_time) {
                    log::debug!("Update requested stop");
                    report.update_stopped = true;
                    self.token.request_stop();
                }
            }

            if let Some(rate) = fps.record_frame(delta_time) {
                presenter.set_title(&format!("{} : {} FPS", self.name, rate));
            }

            presenter.swap_buffers();
            report.frames += 1;
            log::trace!("Frame {} took {:.4}s", report.frames, delta_time);
        }

        hooks.teardown(&mut state.frame(presenter.device()));
        presenter.release_current();
        report.elapsed = state.clock.time_since_start();
        report
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

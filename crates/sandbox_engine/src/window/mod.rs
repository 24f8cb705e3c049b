//! Window management using GLFW
//!
//! Creates the window with an OpenGL 3.3 core context and splits it for the
//! render loop: the [`Window`] stays on the controlling thread as the
//! [`EventPump`], while a [`GlfwPresenter`] carries the context to the render
//! thread. Title changes travel back over a channel because GLFW windows may
//! only be touched from the thread that created them.

mod keys;

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use glfw::{Action, Context, WindowEvent};
use thiserror::Error;

use crate::config::WindowSettings;
use crate::input::{KeyCode, SharedInput};
use crate::render::gpu::{GlDevice, GraphicsDevice};
use crate::runtime::{EventPump, Presenter, PumpStatus};

pub use keys::{key_code, mouse_button};

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialised
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The window or its context could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// OpenGL entry points could not be resolved
    #[error("Failed to load OpenGL function pointers")]
    FunctionLoadFailed,
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window with an OpenGL context
pub struct Window {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    titles: Receiver<String>,
    title_sender: Sender<String>,
}

impl Window {
    /// Create the window, make its context current and load OpenGL
    pub fn new(settings: &WindowSettings) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|err| WindowError::InitializationFailed(err.to_string()))?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::DepthBits(Some(24)));
        glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = glfw
            .create_window(
                settings.width,
                settings.height,
                &settings.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(WindowError::CreationFailed)?;

        let (x, y) = settings.position;
        window.set_pos(x, y);
        window.make_current();

        if settings.capture_cursor {
            window.set_cursor_pos(
                f64::from(settings.width) / 2.0,
                f64::from(settings.height) / 2.0,
            );
            window.set_cursor_mode(glfw::CursorMode::Disabled);
        }
        glfw.set_swap_interval(if settings.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        GlDevice::load_with(|symbol| window.get_proc_address(symbol) as *const _);
        if !GlDevice::is_loaded() {
            return Err(WindowError::FunctionLoadFailed);
        }

        window.set_key_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_mouse_button_polling(true);
        window.set_close_polling(true);
        window.set_focus_polling(true);

        log::info!(
            "Created {}x{} window '{}'",
            settings.width,
            settings.height,
            settings.title
        );

        let (title_sender, titles) = mpsc::channel();
        Ok(Self {
            glfw,
            window,
            events,
            titles,
            title_sender,
        })
    }

    /// Hand the context over to a presenter for the render thread
    ///
    /// The context is released from the calling thread.
    pub fn presenter(&mut self) -> GlfwPresenter {
        let context = self.window.render_context();
        glfw::make_context_current(None);
        GlfwPresenter {
            context,
            device: GlDevice::new(),
            titles: self.title_sender.clone(),
        }
    }

    /// Whether the window has been asked to close
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Framebuffer size in pixels
    pub fn get_framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (
            u32::try_from(width).unwrap_or(0),
            u32::try_from(height).unwrap_or(0),
        )
    }

    fn apply_pending_titles(&mut self) {
        if let Some(title) = self.titles.try_iter().last() {
            self.window.set_title(&title);
        }
    }
}

/// Record one window event in the shared input state
///
/// Returns true if the event asks the application to close.
pub fn apply_event(event: &WindowEvent, input: &SharedInput) -> bool {
    match *event {
        WindowEvent::Key(key, _, action, _) => {
            let Some(code) = key_code(key) else {
                return false;
            };
            let down = action != Action::Release;
            input.set_key(code, down);
            code == KeyCode::Escape && action == Action::Press
        }
        WindowEvent::MouseButton(button, action, _) => {
            if let Some(button) = mouse_button(button) {
                input.set_button(button, action != Action::Release);
            }
            false
        }
        #[allow(clippy::cast_possible_truncation)]
        WindowEvent::CursorPos(x, y) => {
            input.set_cursor(x as f32, y as f32);
            false
        }
        #[allow(clippy::cast_possible_truncation)]
        WindowEvent::Scroll(dx, dy) => {
            input.add_scroll(dx as f32, dy as f32);
            false
        }
        WindowEvent::Focus(false) => {
            input.release_all();
            false
        }
        WindowEvent::Close => true,
        _ => false,
    }
}

impl EventPump for Window {
    fn pump(&mut self, input: &SharedInput, timeout: Duration) -> PumpStatus {
        self.glfw.wait_events_timeout(timeout.as_secs_f64());

        let mut close_requested = false;
        for (_, event) in glfw::flush_messages(&self.events) {
            close_requested |= apply_event(&event, input);
        }
        if close_requested {
            self.window.set_should_close(true);
        }
        self.apply_pending_titles();

        PumpStatus {
            close_requested: close_requested || self.window.should_close(),
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.get_framebuffer_size()
    }
}

/// The window's OpenGL context, movable to the render thread
pub struct GlfwPresenter {
    context: glfw::PRenderContext,
    device: GlDevice,
    titles: Sender<String>,
}

impl Presenter for GlfwPresenter {
    fn make_current(&mut self) {
        self.context.make_current();
    }

    fn release_current(&mut self) {
        glfw::make_context_current(None);
    }

    fn swap_buffers(&mut self) {
        self.context.swap_buffers();
    }

    fn set_title(&mut self, title: &str) {
        if self.titles.send(title.to_owned()).is_err() {
            log::debug!("Window is gone, dropping title update");
        }
    }

    fn device(&mut self) -> &mut dyn GraphicsDevice {
        &mut self.device
    }
}

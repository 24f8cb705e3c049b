//! # Sandbox Engine
//!
//! A small OpenGL rendering sandbox built on GLFW.
//!
//! ## Features
//!
//! - **GPU wrappers**: vertex arrays, vertex/index buffers, shaders, textures
//! - **Attribute layouts**: declare interleaved vertex attributes slot by slot
//! - **Free-fly camera**: WASD movement, mouse look, zoom and reset
//! - **Threaded render loop**: events on the calling thread, drawing on a render thread
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sandbox_engine::prelude::*;
//!
//! struct Clear;
//!
//! impl FrameHooks for Clear {
//!     fn setup(&mut self, _frame: &mut Frame<'_>) -> bool {
//!         true
//!     }
//!
//!     fn update(&mut self, frame: &mut Frame<'_>, _delta_time: f32) -> bool {
//!         frame.device.clear([0.1, 0.1, 0.1, 1.0]);
//!         true
//!     }
//! }
//!
//! fn main() -> Result<(), SandboxError> {
//!     let config = SandboxConfig::default();
//!     let mut window = Window::new(&config.window)?;
//!     let presenter = window.presenter();
//!     RenderLoop::new(&config).run(&mut Clear, presenter, &mut window)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod runtime;
pub mod window;

use thiserror::Error;

/// Any error the sandbox can report to an application
#[derive(Error, Debug)]
pub enum SandboxError {
    /// Window or context creation failed
    #[error(transparent)]
    Window(#[from] window::WindowError),

    /// Configuration could not be read or written
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// A shader failed to load, compile or link
    #[error(transparent)]
    Shader(#[from] render::ShaderError),

    /// A texture failed to load
    #[error(transparent)]
    Texture(#[from] render::TextureError),

    /// A model failed to load
    #[error(transparent)]
    Model(#[from] render::ModelError),

    /// An OBJ file could not be parsed
    #[error(transparent)]
    Obj(#[from] assets::ObjError),

    /// The render loop could not run to completion
    #[error(transparent)]
    Loop(#[from] runtime::LoopError),
}

/// Common imports for sandbox users
pub mod prelude {
    pub use crate::{
        config::{Config, SandboxConfig},
        foundation::math::{Mat4, Vec3},
        input::{ButtonState, InputTracker, KeyCode, MouseButton},
        render::{
            Camera, CameraMovement, CameraUniforms, GraphicsDevice, Projection, Renderer, Shader,
            SimpleModel, Texture2D,
        },
        runtime::{ExitReason, Frame, FrameHooks, LoopOutcome, RenderLoop},
        window::Window,
        SandboxError,
    };
}

//! # Rendering
//!
//! Thin wrappers over OpenGL objects plus the camera.
//!
//! ## Architecture
//!
//! - **gpu**: the [`GraphicsDevice`](gpu::GraphicsDevice) trait every wrapper talks to, and its OpenGL implementation
//! - **buffer / layout**: vertex arrays, vertex and index buffers, attribute layout binder
//! - **shader / texture / model**: GPU resources built from files
//! - **renderer / uniforms**: drawing registered models and sharing camera matrices
//! - **camera / controls**: free-fly camera, projection and the default input mapping
//!
//! GPU objects are released with explicit `destroy(device)` calls; nothing
//! here owns the device.

pub mod buffer;
pub mod camera;
pub mod controls;
pub mod gpu;
pub mod layout;
pub mod model;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod uniforms;

pub use buffer::{IndexBuffer, VertexArray, VertexBuffer};
pub use camera::{Camera, CameraMovement, Projection};
pub use controls::FreeFlyControls;
pub use gpu::{DeviceInfo, GlDevice, GraphicsDevice};
pub use layout::{AttributeSlot, BufferLayout, ElementType};
pub use model::{ModelError, SimpleModel};
pub use renderer::{ModelHandle, Renderer, ShaderHandle};
pub use shader::{Shader, ShaderError, ShaderSources};
pub use texture::{Texture2D, TextureError};
pub use uniforms::CameraUniforms;

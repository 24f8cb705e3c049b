//! Camera matrices shared between programs through a uniform block
//!
//! Layout (std140) of the `Matrices` block at binding 0:
//!
//! ```glsl
//! layout(std140) uniform Matrices {
//!     mat4 projection;   // offset 0
//!     mat4 view;         // offset 64
//! };
//! ```

use crate::foundation::math::Mat4;
use crate::render::camera::{Camera, Projection};
use crate::render::gpu::{BufferId, BufferTarget, BufferUsage, GraphicsDevice};
use crate::render::shader::Shader;

/// Name of the block in shader source
pub const CAMERA_BLOCK_NAME: &str = "Matrices";
/// Binding point the block is attached to
pub const CAMERA_BLOCK_BINDING: u32 = 0;

const MAT4_BYTES: usize = std::mem::size_of::<[f32; 16]>();
const PROJECTION_OFFSET: usize = 0;
const VIEW_OFFSET: usize = MAT4_BYTES;

/// Uniform buffer holding projection and view matrices
#[derive(Debug)]
pub struct CameraUniforms {
    buffer: BufferId,
}

impl CameraUniforms {
    /// Total block size in bytes
    pub const SIZE: usize = 2 * MAT4_BYTES;

    /// Allocate the block and attach it to its binding point
    pub fn new(device: &mut dyn GraphicsDevice) -> Self {
        let buffer = device.create_buffer();
        device.bind_buffer(BufferTarget::Uniform, Some(buffer));
        device.buffer_data(BufferTarget::Uniform, &[0u8; Self::SIZE], BufferUsage::Dynamic);
        device.bind_buffer(BufferTarget::Uniform, None);
        device.bind_buffer_base(BufferTarget::Uniform, CAMERA_BLOCK_BINDING, buffer);
        Self { buffer }
    }

    /// Route a program's `Matrices` block to this buffer
    pub fn attach(&self, device: &mut dyn GraphicsDevice, shader: &Shader) {
        shader.bind_uniform_block(device, CAMERA_BLOCK_NAME, CAMERA_BLOCK_BINDING);
    }

    /// Write the projection matrix
    pub fn set_projection(&self, device: &mut dyn GraphicsDevice, projection: &Mat4) {
        self.write(device, PROJECTION_OFFSET, projection);
    }

    /// Write the view matrix
    pub fn set_view(&self, device: &mut dyn GraphicsDevice, view: &Mat4) {
        self.write(device, VIEW_OFFSET, view);
    }

    /// Write both matrices from the camera state
    pub fn upload(&self, device: &mut dyn GraphicsDevice, camera: &Camera, projection: &Projection) {
        self.set_projection(device, projection.matrix());
        self.set_view(device, camera.view_matrix());
    }

    fn write(&self, device: &mut dyn GraphicsDevice, offset: usize, matrix: &Mat4) {
        device.bind_buffer(BufferTarget::Uniform, Some(self.buffer));
        device.buffer_sub_data(
            BufferTarget::Uniform,
            offset,
            bytemuck::cast_slice(matrix.as_slice()),
        );
        device.bind_buffer(BufferTarget::Uniform, None);
    }

    /// Release the buffer
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        device.delete_buffer(self.buffer);
    }
}

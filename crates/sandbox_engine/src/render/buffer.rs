//! Vertex array, vertex buffer and index buffer wrappers
//!
//! The wrappers hold driver handles only. GPU objects are released with an
//! explicit `destroy` because the device is passed into every call rather
//! than stored.

use std::marker::PhantomData;

use bytemuck::Pod;

use crate::render::gpu::{BufferId, BufferTarget, BufferUsage, GraphicsDevice, VertexArrayId};

/// Vertex array object: the attribute configuration of one model
#[derive(Debug)]
pub struct VertexArray {
    id: VertexArrayId,
}

impl VertexArray {
    /// Create a vertex array
    pub fn new(device: &mut dyn GraphicsDevice) -> Self {
        Self {
            id: device.create_vertex_array(),
        }
    }

    /// Driver handle
    pub const fn id(&self) -> VertexArrayId {
        self.id
    }

    /// Make this the current vertex array
    pub fn bind(&self, device: &mut dyn GraphicsDevice) {
        device.bind_vertex_array(Some(self.id));
    }

    /// Unbind any vertex array
    pub fn unbind(device: &mut dyn GraphicsDevice) {
        device.bind_vertex_array(None);
    }

    /// Release the GPU object
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        device.delete_vertex_array(self.id);
    }
}

/// Interleaved per-vertex data of element type `T`
///
/// `components_per_vertex` is the number of `T` values making up one vertex
/// (8 for position + normal + uv as floats) and fixes the buffer's stride.
#[derive(Debug)]
pub struct VertexBuffer<T: Pod = f32> {
    id: BufferId,
    components_per_vertex: usize,
    bytes: usize,
    _element: PhantomData<T>,
}

impl<T: Pod> VertexBuffer<T> {
    /// Create an empty buffer holding `components_per_vertex` values per vertex
    pub fn new(device: &mut dyn GraphicsDevice, components_per_vertex: usize) -> Self {
        Self {
            id: device.create_buffer(),
            components_per_vertex,
            bytes: 0,
            _element: PhantomData,
        }
    }

    /// Create a buffer and upload `data` with static usage
    pub fn with_data(
        device: &mut dyn GraphicsDevice,
        components_per_vertex: usize,
        data: &[T],
    ) -> Self {
        let mut buffer = Self::new(device, components_per_vertex);
        buffer.set_data(device, data);
        buffer
    }

    /// Driver handle
    pub const fn id(&self) -> BufferId {
        self.id
    }

    /// Bind to the array target
    pub fn bind(&self, device: &mut dyn GraphicsDevice) {
        device.bind_buffer(BufferTarget::Array, Some(self.id));
    }

    /// Unbind the array target
    pub fn unbind(device: &mut dyn GraphicsDevice) {
        device.bind_buffer(BufferTarget::Array, None);
    }

    /// Replace the buffer contents
    pub fn set_data(&mut self, device: &mut dyn GraphicsDevice, data: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.bind(device);
        device.buffer_data(BufferTarget::Array, bytes, BufferUsage::Static);
        self.bytes = bytes.len();
    }

    /// Number of `T` values per vertex
    pub const fn components_per_vertex(&self) -> usize {
        self.components_per_vertex
    }

    /// Size of one element in bytes
    pub const fn element_size(&self) -> usize {
        std::mem::size_of::<T>()
    }

    /// Byte distance between consecutive vertices
    pub const fn stride(&self) -> usize {
        self.components_per_vertex * std::mem::size_of::<T>()
    }

    /// Uploaded size in bytes
    pub const fn byte_len(&self) -> usize {
        self.bytes
    }

    /// Number of whole vertices uploaded
    pub const fn vertex_count(&self) -> usize {
        match self.stride() {
            0 => 0,
            stride => self.bytes / stride,
        }
    }

    /// Release the GPU object
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        device.delete_buffer(self.id);
    }
}

/// `u32` index data for indexed draws
#[derive(Debug)]
pub struct IndexBuffer {
    id: BufferId,
    count: usize,
}

impl IndexBuffer {
    /// Create an empty index buffer
    pub fn new(device: &mut dyn GraphicsDevice) -> Self {
        Self {
            id: device.create_buffer(),
            count: 0,
        }
    }

    /// Create an index buffer and upload `indices`
    pub fn with_indices(device: &mut dyn GraphicsDevice, indices: &[u32]) -> Self {
        let mut buffer = Self::new(device);
        buffer.set_indices(device, indices);
        buffer
    }

    /// Driver handle
    pub const fn id(&self) -> BufferId {
        self.id
    }

    /// Bind to the element array target
    ///
    /// The binding is recorded by whichever vertex array is current.
    pub fn bind(&self, device: &mut dyn GraphicsDevice) {
        device.bind_buffer(BufferTarget::ElementArray, Some(self.id));
    }

    /// Unbind the element array target
    pub fn unbind(device: &mut dyn GraphicsDevice) {
        device.bind_buffer(BufferTarget::ElementArray, None);
    }

    /// Replace the indices
    pub fn set_indices(&mut self, device: &mut dyn GraphicsDevice, indices: &[u32]) {
        self.bind(device);
        device.buffer_data(
            BufferTarget::ElementArray,
            bytemuck::cast_slice(indices),
            BufferUsage::Static,
        );
        self.count = indices.len();
    }

    /// Number of indices uploaded
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Release the GPU object
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        device.delete_buffer(self.id);
    }
}

//! Vertex attribute layout binder
//!
//! A [`BufferLayout`] walks a model's attribute declarations in order, handing
//! out slot indices from 0 and tracking the running byte offset inside the
//! vertex. Every declaration names the vertex array and buffers it applies to
//! and binds them itself, so the result never depends on what an earlier call
//! left bound.
//!
//! One layout belongs to one model: slot indices restart at 0 for every new
//! `BufferLayout`.

use bytemuck::Pod;

use crate::render::buffer::{IndexBuffer, VertexArray, VertexBuffer};
pub use crate::render::gpu::ElementType;
use crate::render::gpu::GraphicsDevice;

/// One configured vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSlot {
    /// Shader input location
    pub index: u32,
    /// Components per vertex (1..=4)
    pub component_count: u32,
    /// Scalar type of each component
    pub element_type: ElementType,
    /// Offset from the start of the vertex in bytes
    pub byte_offset: usize,
}

/// Running attribute layout of one model
#[derive(Debug, Default, Clone)]
pub struct BufferLayout {
    slots: Vec<AttributeSlot>,
    next_index: u32,
    offset: usize,
}

impl BufferLayout {
    /// Start an empty layout at slot 0, offset 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the next attribute of `buffer`
    ///
    /// Binds `vertex_array` and `buffer`, points the next slot at the running
    /// offset with the buffer's per-vertex stride and enables it.
    pub fn declare<T: Pod>(
        &mut self,
        device: &mut dyn GraphicsDevice,
        vertex_array: &VertexArray,
        buffer: &VertexBuffer<T>,
        component_count: u32,
        element_type: ElementType,
    ) -> AttributeSlot {
        vertex_array.bind(device);
        buffer.bind(device);
        self.push_slot(device, buffer.stride(), component_count, element_type, false)
    }

    /// Declare the next attribute of `buffer` alongside an index buffer
    ///
    /// With `reset_stride` the running offset stays where it is, so the next
    /// declaration starts at the same offset while still taking a new slot.
    pub fn declare_with_indices<T: Pod>(
        &mut self,
        device: &mut dyn GraphicsDevice,
        vertex_array: &VertexArray,
        buffer: &VertexBuffer<T>,
        index_buffer: &IndexBuffer,
        component_count: u32,
        element_type: ElementType,
        reset_stride: bool,
    ) -> AttributeSlot {
        vertex_array.bind(device);
        buffer.bind(device);
        index_buffer.bind(device);
        self.push_slot(
            device,
            buffer.stride(),
            component_count,
            element_type,
            reset_stride,
        )
    }

    fn push_slot(
        &mut self,
        device: &mut dyn GraphicsDevice,
        stride: usize,
        component_count: u32,
        element_type: ElementType,
        reset_stride: bool,
    ) -> AttributeSlot {
        let slot = AttributeSlot {
            index: self.next_index,
            component_count,
            element_type,
            byte_offset: self.offset,
        };

        device.vertex_attrib_pointer(
            slot.index,
            component_count,
            element_type,
            stride,
            slot.byte_offset,
        );
        device.enable_vertex_attrib(slot.index);
        log::trace!(
            "Attribute {} -> {}x{:?} at offset {} (stride {})",
            slot.index,
            component_count,
            element_type,
            slot.byte_offset,
            stride
        );

        if !reset_stride {
            self.offset += component_count as usize * element_type.size_in_bytes();
        }
        self.next_index += 1;
        self.slots.push(slot);
        slot
    }

    /// Slots declared so far, in order
    pub fn slots(&self) -> &[AttributeSlot] {
        &self.slots
    }

    /// Index the next declaration will receive
    pub const fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Running byte offset
    pub const fn stride(&self) -> usize {
        self.offset
    }
}

//! Graphics driver interface
//!
//! Everything the sandbox asks of the GPU goes through [`GraphicsDevice`]. The
//! resource wrappers (`buffer`, `layout`, `shader`, `texture`, ...) only talk to
//! this trait, so they can be exercised in tests against a recording double
//! and run for real against [`GlDevice`].
//!
//! Handles are small typed ids. They are only meaningful to the device that
//! created them and must only be used on the thread that owns the context.

mod opengl;

#[cfg(test)]
pub(crate) mod recording;

pub use self::opengl::GlDevice;

use crate::foundation::math::{Mat4, Vec2, Vec3};

macro_rules! gpu_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Driver-side object name
            pub fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

gpu_handle!(
    /// Vertex array object
    VertexArrayId
);
gpu_handle!(
    /// Buffer object (vertex, index or uniform)
    BufferId
);
gpu_handle!(
    /// 2D texture object
    TextureId
);
gpu_handle!(
    /// Compiled shader stage
    ShaderId
);
gpu_handle!(
    /// Linked shader program
    ProgramId
);

/// Binding point for a buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data
    Array,
    /// Index data, captured by the bound vertex array
    ElementArray,
    /// Uniform block storage
    Uniform,
}

/// Expected update frequency of a buffer's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once, drawn many times
    Static,
    /// Rewritten often, e.g. per frame
    Dynamic,
}

/// Scalar type of one attribute component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 32-bit float
    Float,
    /// 32-bit signed integer
    Int,
}

impl ElementType {
    /// Size of one component in bytes
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::Float => std::mem::size_of::<f32>(),
            Self::Int => std::mem::size_of::<i32>(),
        }
    }
}

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
    /// Geometry shader
    Geometry,
}

impl ShaderStage {
    /// Lower-case name used in logs and errors
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Channel layout of uploaded pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One channel
    Red,
    /// Three channels
    Rgb,
    /// Four channels
    Rgba,
}

impl PixelFormat {
    /// Pick the format for a channel count, `None` for unsupported counts
    pub const fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::Red),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Bytes per pixel
    pub const fn channels(self) -> usize {
        match self {
            Self::Red => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    /// Tile
    Repeat,
    /// Stretch the edge texels
    ClampToEdge,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    /// Nearest texel
    Nearest,
    /// Bilinear
    Linear,
    /// Trilinear across mip levels (minification only)
    LinearMipmapLinear,
}

/// Sampler state for a 2D texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSampling {
    /// Wrap mode for both S and T
    pub wrap: TextureWrap,
    /// Minification filter
    pub min_filter: TextureFilter,
    /// Magnification filter
    pub mag_filter: TextureFilter,
}

/// Pixels ready for upload, rows bottom-up
#[derive(Debug, Clone, Copy)]
pub struct TextureImage<'a> {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Channel layout
    pub format: PixelFormat,
    /// Tightly packed pixel bytes
    pub pixels: &'a [u8],
}

/// Value for a named uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `bool` (uploaded as int)
    Bool(bool),
    /// `int` or sampler unit
    Int(i32),
    /// `float`
    Float(f32),
    /// `vec2`
    Vec2(Vec2),
    /// `vec3`
    Vec3(Vec3),
    /// `mat4`
    Mat4(Mat4),
}

/// Device description strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Renderer (GPU) name
    pub renderer: String,
    /// Driver vendor
    pub vendor: String,
    /// API version string
    pub version: String,
    /// Shading language version string
    pub shading_language: String,
}

/// The graphics driver, as seen by the sandbox
///
/// Binding calls take explicit handles; callers never rely on "whatever is
/// currently bound" from an earlier call.
pub trait GraphicsDevice {
    /// Query renderer/vendor/version strings
    fn device_info(&self) -> DeviceInfo;

    /// Set the viewport rectangle in pixels
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Enable depth testing with a less-than comparison
    fn enable_depth_test(&mut self);

    /// Clear colour and depth
    fn clear(&mut self, color: [f32; 4]);

    /// Create a vertex array object
    fn create_vertex_array(&mut self) -> VertexArrayId;

    /// Bind a vertex array, `None` unbinds
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>);

    /// Delete a vertex array object
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId);

    /// Create a buffer object
    fn create_buffer(&mut self) -> BufferId;

    /// Bind a buffer to a target, `None` unbinds
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);

    /// Replace the storage of the buffer bound to `target`
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    /// Overwrite part of the buffer bound to `target`
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]);

    /// Attach a buffer to an indexed binding point (uniform blocks)
    fn bind_buffer_base(&mut self, target: BufferTarget, binding: u32, buffer: BufferId);

    /// Delete a buffer object
    fn delete_buffer(&mut self, buffer: BufferId);

    /// Describe one attribute of the bound array buffer for the bound vertex array
    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        component_count: u32,
        element_type: ElementType,
        stride: usize,
        offset: usize,
    );

    /// Enable an attribute slot for the bound vertex array
    fn enable_vertex_attrib(&mut self, index: u32);

    /// Create a texture object
    fn create_texture(&mut self) -> TextureId;

    /// Bind a 2D texture to a texture unit, `None` unbinds
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>);

    /// Upload level 0 of the bound 2D texture
    fn upload_texture_2d(&mut self, image: &TextureImage<'_>);

    /// Configure wrap and filters of the bound 2D texture
    fn set_texture_sampling(&mut self, sampling: TextureSampling);

    /// Build the mip chain of the bound 2D texture
    fn generate_mipmap(&mut self);

    /// Delete a texture object
    fn delete_texture(&mut self, texture: TextureId);

    /// Compile one stage; the error is the driver's info log
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String>;

    /// Link stages into a program; the error is the driver's info log
    fn link_program(&mut self, shaders: &[ShaderId]) -> Result<ProgramId, String>;

    /// Delete a compiled stage
    fn delete_shader(&mut self, shader: ShaderId);

    /// Make a program current, `None` unbinds
    fn use_program(&mut self, program: Option<ProgramId>);

    /// Set a uniform on `program`, which must be current
    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue);

    /// Route a named uniform block of `program` to a binding point
    fn bind_uniform_block(&mut self, program: ProgramId, block: &str, binding: u32);

    /// Delete a program
    fn delete_program(&mut self, program: ProgramId);

    /// Draw non-indexed triangles from the bound vertex array
    fn draw_arrays(&mut self, first: usize, count: usize);

    /// Draw indexed triangles (u32 indices) from the bound vertex array
    fn draw_elements(&mut self, count: usize);
}

//! OpenGL 3.3 core implementation of [`GraphicsDevice`]
//!
//! Function pointers are process-global once loaded (see
//! [`GlDevice::load_with`]); every call still needs the context to be current
//! on the calling thread.

#![allow(unsafe_code)]

use std::ffi::{c_void, CStr, CString};
use std::ptr;

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLintptr, GLuint};

use super::{
    BufferId, BufferTarget, BufferUsage, DeviceInfo, ElementType, GraphicsDevice, PixelFormat,
    ProgramId, ShaderId, ShaderStage, TextureFilter, TextureId, TextureImage, TextureSampling,
    TextureWrap, UniformValue, VertexArrayId,
};

/// Handle to the OpenGL driver of the current context
#[derive(Debug, Default)]
pub struct GlDevice {
    _private: (),
}

impl GlDevice {
    /// Load OpenGL function pointers through the windowing library
    ///
    /// The context the loader belongs to must be current on this thread.
    pub fn load_with<F>(loader: F)
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
    }

    /// Whether the entry points the sandbox relies on were found
    pub fn is_loaded() -> bool {
        gl::GetString::is_loaded()
            && gl::Viewport::is_loaded()
            && gl::GenVertexArrays::is_loaded()
            && gl::CreateShader::is_loaded()
    }

    /// Device for the context that is current on this thread
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

const fn buffer_target(target: BufferTarget) -> GLenum {
    match target {
        BufferTarget::Array => gl::ARRAY_BUFFER,
        BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
        BufferTarget::Uniform => gl::UNIFORM_BUFFER,
    }
}

const fn buffer_usage(usage: BufferUsage) -> GLenum {
    match usage {
        BufferUsage::Static => gl::STATIC_DRAW,
        BufferUsage::Dynamic => gl::DYNAMIC_DRAW,
    }
}

const fn element_type(element: ElementType) -> GLenum {
    match element {
        ElementType::Float => gl::FLOAT,
        ElementType::Int => gl::INT,
    }
}

const fn shader_stage(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        ShaderStage::Geometry => gl::GEOMETRY_SHADER,
    }
}

const fn pixel_format(format: PixelFormat) -> GLenum {
    match format {
        PixelFormat::Red => gl::RED,
        PixelFormat::Rgb => gl::RGB,
        PixelFormat::Rgba => gl::RGBA,
    }
}

const fn texture_wrap(wrap: TextureWrap) -> GLenum {
    match wrap {
        TextureWrap::Repeat => gl::REPEAT,
        TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    }
}

const fn texture_filter(filter: TextureFilter) -> GLenum {
    match filter {
        TextureFilter::Nearest => gl::NEAREST,
        TextureFilter::Linear => gl::LINEAR,
        TextureFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
    }
}

fn gl_string(name: GLenum) -> String {
    let raw = unsafe { gl::GetString(name) };
    if raw.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(raw.cast()) }
        .to_string_lossy()
        .into_owned()
}

fn c_name(name: &str) -> Option<CString> {
    match CString::new(name) {
        Ok(name) => Some(name),
        Err(_) => {
            log::warn!("Identifier {name:?} contains a NUL byte");
            None
        }
    }
}

fn info_log(
    object: GLuint,
    get_iv: unsafe fn(GLuint, GLenum, *mut GLint),
    get_log: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let mut length: GLint = 0;
    unsafe { get_iv(object, gl::INFO_LOG_LENGTH, &mut length) };
    let mut buffer = vec![0u8; usize::try_from(length).unwrap_or(0).max(1)];
    let mut written: GLsizei = 0;
    unsafe {
        get_log(
            object,
            GLsizei::try_from(buffer.len()).unwrap_or(GLsizei::MAX),
            &mut written,
            buffer.as_mut_ptr().cast(),
        );
    }
    buffer.truncate(usize::try_from(written).unwrap_or(0));
    String::from_utf8_lossy(&buffer).trim_end().to_owned()
}

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const fn gl_size(value: usize) -> GLsizei {
    value as GLsizei
}

impl GraphicsDevice for GlDevice {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            renderer: gl_string(gl::RENDERER),
            vendor: gl_string(gl::VENDOR),
            version: gl_string(gl::VERSION),
            shading_language: gl_string(gl::SHADING_LANGUAGE_VERSION),
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn set_viewport(&mut self, width: u32, height: u32) {
        unsafe { gl::Viewport(0, 0, width as GLsizei, height as GLsizei) };
    }

    fn enable_depth_test(&mut self) {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::DepthFunc(gl::LESS);
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let mut id: GLuint = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        VertexArrayId(id)
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        unsafe { gl::BindVertexArray(vertex_array.map_or(0, VertexArrayId::raw)) };
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array.0) };
    }

    fn create_buffer(&mut self) -> BufferId {
        let mut id: GLuint = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        BufferId(id)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        unsafe { gl::BindBuffer(buffer_target(target), buffer.map_or(0, BufferId::raw)) };
    }

    #[allow(clippy::cast_possible_wrap)]
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let pointer = if data.is_empty() {
            ptr::null()
        } else {
            data.as_ptr().cast()
        };
        unsafe {
            gl::BufferData(
                buffer_target(target),
                data.len() as GLsizeiptr,
                pointer,
                buffer_usage(usage),
            );
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        unsafe {
            gl::BufferSubData(
                buffer_target(target),
                offset as GLintptr,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
            );
        }
    }

    fn bind_buffer_base(&mut self, target: BufferTarget, binding: u32, buffer: BufferId) {
        unsafe { gl::BindBufferBase(buffer_target(target), binding, buffer.0) };
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        unsafe { gl::DeleteBuffers(1, &buffer.0) };
    }

    #[allow(clippy::cast_possible_wrap)]
    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        component_count: u32,
        element: ElementType,
        stride: usize,
        offset: usize,
    ) {
        // Offsets into the bound buffer travel through the pointer argument.
        let pointer = offset as *const c_void;
        let size = component_count as GLint;
        unsafe {
            match element {
                ElementType::Float => gl::VertexAttribPointer(
                    index,
                    size,
                    element_type(element),
                    gl::FALSE,
                    gl_size(stride),
                    pointer,
                ),
                ElementType::Int => gl::VertexAttribIPointer(
                    index,
                    size,
                    element_type(element),
                    gl_size(stride),
                    pointer,
                ),
            }
        }
    }

    fn enable_vertex_attrib(&mut self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) };
    }

    fn create_texture(&mut self) -> TextureId {
        let mut id: GLuint = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        TextureId(id)
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, texture.map_or(0, TextureId::raw));
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn upload_texture_2d(&mut self, image: &TextureImage<'_>) {
        let format = pixel_format(image.format);
        unsafe {
            // Rows of one- and three-channel images are not 4-byte aligned.
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as GLint,
                image.width as GLsizei,
                image.height as GLsizei,
                0,
                format,
                gl::UNSIGNED_BYTE,
                image.pixels.as_ptr().cast(),
            );
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn set_texture_sampling(&mut self, sampling: TextureSampling) {
        let wrap = texture_wrap(sampling.wrap) as GLint;
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                texture_filter(sampling.min_filter) as GLint,
            );
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                texture_filter(sampling.mag_filter) as GLint,
            );
        }
    }

    fn generate_mipmap(&mut self) {
        unsafe { gl::GenerateMipmap(gl::TEXTURE_2D) };
    }

    fn delete_texture(&mut self, texture: TextureId) {
        unsafe { gl::DeleteTextures(1, &texture.0) };
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String> {
        let length = GLint::try_from(source.len())
            .map_err(|_| format!("{stage} source is too large"))?;
        let source_ptr: *const GLchar = source.as_ptr().cast();
        let shader = unsafe {
            let shader = gl::CreateShader(shader_stage(stage));
            gl::ShaderSource(shader, 1, &source_ptr, &length);
            gl::CompileShader(shader);
            shader
        };

        let mut status = GLint::from(gl::FALSE);
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        if status == GLint::from(gl::TRUE) {
            Ok(ShaderId(shader))
        } else {
            let log = info_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog);
            unsafe { gl::DeleteShader(shader) };
            Err(log)
        }
    }

    fn link_program(&mut self, shaders: &[ShaderId]) -> Result<ProgramId, String> {
        let program = unsafe { gl::CreateProgram() };
        unsafe {
            for shader in shaders {
                gl::AttachShader(program, shader.0);
            }
            gl::LinkProgram(program);
        }

        let mut status = GLint::from(gl::FALSE);
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        unsafe {
            for shader in shaders {
                gl::DetachShader(program, shader.0);
            }
        }
        if status == GLint::from(gl::TRUE) {
            Ok(ProgramId(program))
        } else {
            let log = info_log(program, gl::GetProgramiv, gl::GetProgramInfoLog);
            unsafe { gl::DeleteProgram(program) };
            Err(log)
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        unsafe { gl::DeleteShader(shader.0) };
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        unsafe { gl::UseProgram(program.map_or(0, ProgramId::raw)) };
    }

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue) {
        let Some(c_name) = c_name(name) else {
            return;
        };
        let location = unsafe { gl::GetUniformLocation(program.0, c_name.as_ptr()) };
        if location < 0 {
            log::trace!("Uniform '{name}' is not active in program {}", program.0);
            return;
        }
        unsafe {
            match value {
                UniformValue::Bool(v) => gl::Uniform1i(location, GLint::from(v)),
                UniformValue::Int(v) => gl::Uniform1i(location, v),
                UniformValue::Float(v) => gl::Uniform1f(location, v),
                UniformValue::Vec2(v) => gl::Uniform2f(location, v.x, v.y),
                UniformValue::Vec3(v) => gl::Uniform3f(location, v.x, v.y, v.z),
                // nalgebra stores column-major, as GL expects
                UniformValue::Mat4(m) => {
                    gl::UniformMatrix4fv(location, 1, gl::FALSE, m.as_slice().as_ptr());
                }
            }
        }
    }

    fn bind_uniform_block(&mut self, program: ProgramId, block: &str, binding: u32) {
        let Some(c_block) = c_name(block) else {
            return;
        };
        let index = unsafe { gl::GetUniformBlockIndex(program.0, c_block.as_ptr()) };
        if index == gl::INVALID_INDEX {
            log::debug!("Uniform block '{block}' is not used by program {}", program.0);
            return;
        }
        unsafe { gl::UniformBlockBinding(program.0, index, binding) };
    }

    fn delete_program(&mut self, program: ProgramId) {
        unsafe { gl::DeleteProgram(program.0) };
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn draw_arrays(&mut self, first: usize, count: usize) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first as GLint, gl_size(count)) };
    }

    fn draw_elements(&mut self, count: usize) {
        unsafe { gl::DrawElements(gl::TRIANGLES, gl_size(count), gl::UNSIGNED_INT, ptr::null()) };
    }
}

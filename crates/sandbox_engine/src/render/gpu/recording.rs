//! Test double that records every device call

use std::collections::HashMap;

use super::{
    BufferId, BufferTarget, BufferUsage, DeviceInfo, ElementType, GraphicsDevice, PixelFormat,
    ProgramId, ShaderId, ShaderStage, TextureId, TextureImage, TextureSampling, UniformValue,
    VertexArrayId,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SetViewport(u32, u32),
    EnableDepthTest,
    Clear,
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    CreateBuffer(BufferId),
    BindBuffer(BufferTarget, Option<BufferId>),
    BufferData(BufferTarget, usize, BufferUsage),
    BufferSubData(BufferTarget, usize, usize),
    BindBufferBase(BufferTarget, u32, BufferId),
    DeleteBuffer(BufferId),
    AttribPointer {
        index: u32,
        components: u32,
        element: ElementType,
        stride: usize,
        offset: usize,
    },
    EnableAttrib(u32),
    CreateTexture(TextureId),
    BindTexture(u32, Option<TextureId>),
    UploadTexture(u32, u32, PixelFormat),
    TextureSampling(TextureSampling),
    GenerateMipmap,
    DeleteTexture(TextureId),
    CompileShader(ShaderStage),
    LinkProgram(usize),
    DeleteShader(ShaderId),
    UseProgram(Option<ProgramId>),
    SetUniform(ProgramId, String, UniformValue),
    BindUniformBlock(ProgramId, String, u32),
    DeleteProgram(ProgramId),
    DrawArrays(usize, usize),
    DrawElements(usize),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingDevice {
    pub calls: Vec<Call>,
    pub sources: Vec<(ShaderStage, String)>,
    pub fail_compile: Option<ShaderStage>,
    pub fail_link: bool,
    pub buffer_contents: HashMap<BufferTarget, Vec<u8>>,
    next_id: u32,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn attrib_pointers(&self) -> Vec<(u32, u32, ElementType, usize, usize)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::AttribPointer { index, components, element, stride, offset } => {
                    Some((index, components, element, stride, offset))
                }
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            renderer: "recording".into(),
            vendor: "tests".into(),
            version: "3.3".into(),
            shading_language: "3.30".into(),
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::SetViewport(width, height));
    }

    fn enable_depth_test(&mut self) {
        self.calls.push(Call::EnableDepthTest);
    }

    fn clear(&mut self, _color: [f32; 4]) {
        self.calls.push(Call::Clear);
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let id = VertexArrayId(self.next());
        self.calls.push(Call::CreateVertexArray(id));
        id
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        self.calls.push(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.calls.push(Call::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = BufferId(self.next());
        self.calls.push(Call::CreateBuffer(id));
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        self.calls.push(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.buffer_contents.insert(target, data.to_vec());
        self.calls.push(Call::BufferData(target, data.len(), usage));
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        let contents = self.buffer_contents.entry(target).or_default();
        if contents.len() < offset + data.len() {
            contents.resize(offset + data.len(), 0);
        }
        contents[offset..offset + data.len()].copy_from_slice(data);
        self.calls.push(Call::BufferSubData(target, offset, data.len()));
    }

    fn bind_buffer_base(&mut self, target: BufferTarget, binding: u32, buffer: BufferId) {
        self.calls.push(Call::BindBufferBase(target, binding, buffer));
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        component_count: u32,
        element_type: ElementType,
        stride: usize,
        offset: usize,
    ) {
        self.calls.push(Call::AttribPointer {
            index,
            components: component_count,
            element: element_type,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib(&mut self, index: u32) {
        self.calls.push(Call::EnableAttrib(index));
    }

    fn create_texture(&mut self) -> TextureId {
        let id = TextureId(self.next());
        self.calls.push(Call::CreateTexture(id));
        id
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>) {
        self.calls.push(Call::BindTexture(unit, texture));
    }

    fn upload_texture_2d(&mut self, image: &TextureImage<'_>) {
        self.calls
            .push(Call::UploadTexture(image.width, image.height, image.format));
    }

    fn set_texture_sampling(&mut self, sampling: TextureSampling) {
        self.calls.push(Call::TextureSampling(sampling));
    }

    fn generate_mipmap(&mut self) {
        self.calls.push(Call::GenerateMipmap);
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.calls.push(Call::DeleteTexture(texture));
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String> {
        self.calls.push(Call::CompileShader(stage));
        self.sources.push((stage, source.to_owned()));
        if self.fail_compile == Some(stage) {
            return Err(format!("0:1: error: bad {stage} shader"));
        }
        Ok(ShaderId(self.next()))
    }

    fn link_program(&mut self, shaders: &[ShaderId]) -> Result<ProgramId, String> {
        self.calls.push(Call::LinkProgram(shaders.len()));
        if self.fail_link {
            return Err("link error: missing main".into());
        }
        Ok(ProgramId(self.next()))
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.calls.push(Call::DeleteShader(shader));
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.calls.push(Call::UseProgram(program));
    }

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue) {
        self.calls.push(Call::SetUniform(program, name.to_owned(), value));
    }

    fn bind_uniform_block(&mut self, program: ProgramId, block: &str, binding: u32) {
        self.calls
            .push(Call::BindUniformBlock(program, block.to_owned(), binding));
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.calls.push(Call::DeleteProgram(program));
    }

    fn draw_arrays(&mut self, first: usize, count: usize) {
        self.calls.push(Call::DrawArrays(first, count));
    }

    fn draw_elements(&mut self, count: usize) {
        self.calls.push(Call::DrawElements(count));
    }
}

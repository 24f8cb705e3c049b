//! Draws registered models, switching programs only when the shader changes

use crate::render::gpu::{GraphicsDevice, ProgramId};
use crate::render::model::SimpleModel;
use crate::render::shader::Shader;

/// Uniform the model transform is uploaded to
pub const MODEL_MATRIX_UNIFORM: &str = "matModel";

/// Index of a shader owned by a [`Renderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(usize);

/// Index of a model owned by a [`Renderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(usize);

#[derive(Debug)]
struct RenderItem {
    model: SimpleModel,
    shader: ShaderHandle,
}

/// Owns shaders and models and draws them in registration order
#[derive(Debug, Default)]
pub struct Renderer {
    shaders: Vec<Shader>,
    items: Vec<RenderItem>,
}

impl Renderer {
    /// Create an empty renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a shader
    pub fn add_shader(&mut self, shader: Shader) -> ShaderHandle {
        self.shaders.push(shader);
        ShaderHandle(self.shaders.len() - 1)
    }

    /// Take ownership of a model drawn with `shader`
    pub fn add_model(&mut self, model: SimpleModel, shader: ShaderHandle) -> ModelHandle {
        self.items.push(RenderItem { model, shader });
        ModelHandle(self.items.len() - 1)
    }

    /// Shader by handle
    pub fn shader(&self, handle: ShaderHandle) -> Option<&Shader> {
        self.shaders.get(handle.0)
    }

    /// Model by handle
    pub fn model(&self, handle: ModelHandle) -> Option<&SimpleModel> {
        self.items.get(handle.0).map(|item| &item.model)
    }

    /// Mutable model by handle, e.g. to move it
    pub fn model_mut(&mut self, handle: ModelHandle) -> Option<&mut SimpleModel> {
        self.items.get_mut(handle.0).map(|item| &mut item.model)
    }

    /// Shaders in registration order
    pub fn shaders(&self) -> &[Shader] {
        &self.shaders
    }

    /// Number of registered models
    pub fn model_count(&self) -> usize {
        self.items.len()
    }

    /// Draw every model
    pub fn render(&self, device: &mut dyn GraphicsDevice) {
        let mut current: Option<ProgramId> = None;

        for item in &self.items {
            let Some(shader) = self.shaders.get(item.shader.0) else {
                log::warn!("Model drawn with unknown shader {:?}", item.shader);
                continue;
            };
            if current != Some(shader.id()) {
                shader.use_program(device);
                current = Some(shader.id());
            }

            shader.set_mat4(device, MODEL_MATRIX_UNIFORM, &item.model.transform);
            item.model.bind_textures(device);
            item.model.draw(device);
        }
    }

    /// Release every model and shader
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        for item in self.items {
            item.model.destroy(device);
        }
        for shader in self.shaders {
            shader.destroy(device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::obj_loader::ObjLoader;
    use crate::render::gpu::recording::{Call, RecordingDevice};
    use crate::render::gpu::UniformValue;

    const SHADER: &str = "// SHADER VERTEX\nvoid main() {}\n// SHADER FRAGMENT\nvoid main() {}\n";
    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn model(device: &mut RecordingDevice) -> SimpleModel {
        SimpleModel::from_mesh(device, &ObjLoader::parse_str(TRIANGLE).unwrap())
    }

    #[test]
    fn test_program_switches_only_on_change() {
        let mut device = RecordingDevice::new();
        let mut renderer = Renderer::new();
        let lit = renderer.add_shader(Shader::from_source(&mut device, "lit", SHADER).unwrap());
        let flat = renderer.add_shader(Shader::from_source(&mut device, "flat", SHADER).unwrap());

        for shader in [lit, lit, flat, flat] {
            let model = model(&mut device);
            renderer.add_model(model, shader);
        }
        device.calls.clear();

        renderer.render(&mut device);

        assert_eq!(device.count(|call| matches!(call, Call::UseProgram(_))), 2);
        assert_eq!(device.count(|call| matches!(call, Call::DrawArrays(0, 3))), 4);
    }

    #[test]
    fn test_model_transform_is_uploaded() {
        let mut device = RecordingDevice::new();
        let mut renderer = Renderer::new();
        let shader = renderer.add_shader(Shader::from_source(&mut device, "lit", SHADER).unwrap());
        let model = model(&mut device);
        let handle = renderer.add_model(model, shader);

        let transform = crate::foundation::math::Mat4::new_translation(
            &crate::foundation::math::Vec3::new(1.0, 2.0, 3.0),
        );
        if let Some(model) = renderer.model_mut(handle) {
            model.transform = transform;
        }
        renderer.render(&mut device);

        let program = renderer.shader(shader).map(Shader::id).unwrap();
        assert!(device.calls.contains(&Call::SetUniform(
            program,
            MODEL_MATRIX_UNIFORM.to_string(),
            UniformValue::Mat4(transform)
        )));
    }

    #[test]
    fn test_empty_renderer_draws_nothing() {
        let mut device = RecordingDevice::new();
        Renderer::new().render(&mut device);
        assert!(device.calls.is_empty());
    }
}

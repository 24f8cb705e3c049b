//! Demo scene: two rotating cubes sharing one shader

use std::path::PathBuf;

use sandbox_engine::foundation::math::{Mat4, Vec3};
use sandbox_engine::prelude::*;
use sandbox_engine::render::{ModelHandle, ShaderHandle};

const CLEAR_COLOR: [f32; 4] = [0.08, 0.09, 0.12, 1.0];
const LIGHT_DIRECTION: [f32; 3] = [-0.4, -1.0, -0.3];
/// Radians per second
const SPIN_RATE: f32 = 0.6;

struct Cube {
    handle: ModelHandle,
    offset: Vec3,
    spin: f32,
}

struct SceneResources {
    uniforms: CameraUniforms,
    renderer: Renderer,
    cubes: Vec<Cube>,
}

/// Scene hooks for the demo binary
pub struct DemoScene {
    resources_dir: PathBuf,
    resources: Option<SceneResources>,
    error: Option<SandboxError>,
}

impl DemoScene {
    /// Scene loading its files from `resources_dir`
    pub const fn new(resources_dir: PathBuf) -> Self {
        Self {
            resources_dir,
            resources: None,
            error: None,
        }
    }

    /// Error that stopped setup, if any
    pub fn take_error(&mut self) -> Option<SandboxError> {
        self.error.take()
    }

    fn load(&self, device: &mut dyn GraphicsDevice) -> Result<SceneResources, SandboxError> {
        let shader = Shader::load(device, self.resources_dir.join("shaders/basic.shader"))?;
        shader.use_program(device);
        shader.set_vec3(device, "lightDir", Vec3::from(LIGHT_DIRECTION).normalize());

        let uniforms = CameraUniforms::new(device);
        uniforms.attach(device, &shader);

        let mut renderer = Renderer::new();
        let shader = renderer.add_shader(shader);
        let cubes = self.load_cubes(device, &mut renderer, shader);

        Ok(SceneResources {
            uniforms,
            renderer,
            cubes,
        })
    }

    fn load_cubes(
        &self,
        device: &mut dyn GraphicsDevice,
        renderer: &mut Renderer,
        shader: ShaderHandle,
    ) -> Vec<Cube> {
        let placements = [(Vec3::new(-1.2, 0.0, 0.0), 1.0), (Vec3::new(1.2, 0.0, -1.0), -0.5)];
        let path = self.resources_dir.join("models/cube.obj");

        let mut cubes = Vec::new();
        for (offset, spin) in placements {
            match SimpleModel::load::<_, PathBuf>(device, &path, &[]) {
                Ok(model) => cubes.push(Cube {
                    handle: renderer.add_model(model, shader),
                    offset,
                    spin,
                }),
                Err(e) => log::warn!("Skipping cube: {e}"),
            }
        }
        cubes
    }
}

impl FrameHooks for DemoScene {
    fn setup(&mut self, frame: &mut Frame<'_>) -> bool {
        match self.load(frame.device) {
            Ok(resources) => {
                log::info!("Scene ready with {} models", resources.renderer.model_count());
                self.resources = Some(resources);
                true
            }
            Err(e) => {
                log::error!("Scene setup failed: {e}");
                self.error = Some(e);
                false
            }
        }
    }

    fn update(&mut self, frame: &mut Frame<'_>, _delta_time: f32) -> bool {
        let Some(resources) = self.resources.as_mut() else {
            return false;
        };

        let time = frame.clock.time_since_start();
        for cube in &resources.cubes {
            if let Some(model) = resources.renderer.model_mut(cube.handle) {
                model.transform = Mat4::new_translation(&cube.offset)
                    * Mat4::from_axis_angle(&Vec3::y_axis(), time * SPIN_RATE * cube.spin);
            }
        }

        resources.uniforms.upload(frame.device, frame.camera, frame.projection);
        frame.device.clear(CLEAR_COLOR);
        resources.renderer.render(frame.device);
        true
    }

    fn teardown(&mut self, frame: &mut Frame<'_>) {
        if let Some(resources) = self.resources.take() {
            resources.renderer.destroy(frame.device);
            resources.uniforms.destroy(frame.device);
        }
    }
}

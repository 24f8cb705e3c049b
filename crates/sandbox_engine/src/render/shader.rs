//! Shader programs loaded from single-file sources
//!
//! One file holds every stage. A line containing `SHADER` together with
//! `VERTEX`, `FRAGMENT` or `GEOMETRY` starts that stage's section; the marker
//! line itself is dropped, as is anything before the first marker. Each stage
//! is compiled with a `#version 330 core` / `#define SHADER_<STAGE>` preamble.
//!
//! ```text
//! // SHADER VERTEX
//! layout(location = 0) in vec3 aPos;
//! void main() { gl_Position = vec4(aPos, 1.0); }
//! // SHADER FRAGMENT
//! out vec4 color;
//! void main() { color = vec4(1.0); }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::foundation::math::{Mat4, Vec2, Vec3};
use crate::render::gpu::{GraphicsDevice, ProgramId, ShaderId, ShaderStage, UniformValue};

/// Shader loading errors
#[derive(Error, Debug)]
pub enum ShaderError {
    /// The source file could not be read
    #[error("failed to read shader '{path}': {source}")]
    Io {
        /// Source file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A required stage has no section
    #[error("shader '{path}' has no {stage} section")]
    MissingStage {
        /// Source file
        path: PathBuf,
        /// Stage without a section
        stage: ShaderStage,
    },

    /// A stage failed to compile
    #[error("failed to compile {stage} shader in '{path}': {log}")]
    Compile {
        /// Source file
        path: PathBuf,
        /// Failing stage
        stage: ShaderStage,
        /// Driver info log
        log: String,
    },

    /// The program failed to link
    #[error("failed to link '{path}': {log}")]
    Link {
        /// Source file
        path: PathBuf,
        /// Driver info log
        log: String,
    },
}

/// Per-stage source text split out of one shader file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    /// Vertex section, without preamble
    pub vertex: Option<String>,
    /// Fragment section, without preamble
    pub fragment: Option<String>,
    /// Geometry section, without preamble
    pub geometry: Option<String>,
}

impl ShaderSources {
    /// Split `text` into stage sections
    pub fn parse(text: &str) -> Self {
        let mut sources = Self::default();
        let mut current: Option<ShaderStage> = None;

        for line in text.lines() {
            if line.contains("SHADER") {
                if let Some(stage) = marker_stage(line) {
                    current = Some(stage);
                    sources.section_mut(stage).get_or_insert_with(String::new);
                }
                continue;
            }
            if let Some(stage) = current {
                if let Some(section) = sources.section_mut(stage) {
                    section.push_str(line);
                    section.push('\n');
                }
            }
        }
        sources
    }

    /// Section text for a stage, if present
    pub fn section(&self, stage: ShaderStage) -> Option<&str> {
        match stage {
            ShaderStage::Vertex => self.vertex.as_deref(),
            ShaderStage::Fragment => self.fragment.as_deref(),
            ShaderStage::Geometry => self.geometry.as_deref(),
        }
    }

    fn section_mut(&mut self, stage: ShaderStage) -> &mut Option<String> {
        match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
            ShaderStage::Geometry => &mut self.geometry,
        }
    }

    /// Full source handed to the compiler for a stage
    pub fn compile_source(&self, stage: ShaderStage) -> Option<String> {
        self.section(stage)
            .map(|body| format!("{}{body}", preamble(stage)))
    }
}

fn marker_stage(line: &str) -> Option<ShaderStage> {
    if line.contains("VERTEX") {
        Some(ShaderStage::Vertex)
    } else if line.contains("FRAGMENT") {
        Some(ShaderStage::Fragment)
    } else if line.contains("GEOMETRY") {
        Some(ShaderStage::Geometry)
    } else {
        None
    }
}

fn preamble(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "#version 330 core\n#define SHADER_VERTEX\n",
        ShaderStage::Fragment => "#version 330 core\n#define SHADER_FRAGMENT\n",
        ShaderStage::Geometry => "#version 330 core\n#define SHADER_GEOMETRY\n",
    }
}

/// A linked shader program
#[derive(Debug)]
pub struct Shader {
    id: ProgramId,
    path: PathBuf,
}

impl Shader {
    /// Read, compile and link a shader file
    pub fn load(device: &mut dyn GraphicsDevice, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(device, path, &text)
    }

    /// Compile and link shader text; `path` only labels errors and logs
    pub fn from_source(
        device: &mut dyn GraphicsDevice,
        path: impl AsRef<Path>,
        text: &str,
    ) -> Result<Self, ShaderError> {
        let path = path.as_ref().to_path_buf();
        let sources = ShaderSources::parse(text);

        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            if sources.section(stage).is_none() {
                return Err(ShaderError::MissingStage { path, stage });
            }
        }

        let mut compiled: Vec<ShaderId> = Vec::with_capacity(3);
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment, ShaderStage::Geometry] {
            let Some(source) = sources.compile_source(stage) else {
                continue;
            };
            match device.compile_shader(stage, &source) {
                Ok(shader) => compiled.push(shader),
                Err(log) => {
                    delete_all(device, &compiled);
                    log::error!("Failed to compile {stage} shader in '{}'", path.display());
                    return Err(ShaderError::Compile { path, stage, log });
                }
            }
        }

        let linked = device.link_program(&compiled);
        delete_all(device, &compiled);
        match linked {
            Ok(id) => {
                log::debug!("Linked shader '{}' ({} stages)", path.display(), compiled.len());
                Ok(Self { id, path })
            }
            Err(log) => {
                log::error!("Failed to link '{}'", path.display());
                Err(ShaderError::Link { path, log })
            }
        }
    }

    /// Driver handle
    pub const fn id(&self) -> ProgramId {
        self.id
    }

    /// Source path the program was built from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make this the current program
    pub fn use_program(&self, device: &mut dyn GraphicsDevice) {
        device.use_program(Some(self.id));
    }

    /// Set a `bool` uniform; the program must be current
    pub fn set_bool(&self, device: &mut dyn GraphicsDevice, name: &str, value: bool) {
        device.set_uniform(self.id, name, UniformValue::Bool(value));
    }

    /// Set an `int` (or sampler) uniform
    pub fn set_int(&self, device: &mut dyn GraphicsDevice, name: &str, value: i32) {
        device.set_uniform(self.id, name, UniformValue::Int(value));
    }

    /// Set a `float` uniform
    pub fn set_float(&self, device: &mut dyn GraphicsDevice, name: &str, value: f32) {
        device.set_uniform(self.id, name, UniformValue::Float(value));
    }

    /// Set a `vec2` uniform
    pub fn set_vec2(&self, device: &mut dyn GraphicsDevice, name: &str, value: Vec2) {
        device.set_uniform(self.id, name, UniformValue::Vec2(value));
    }

    /// Set a `vec3` uniform
    pub fn set_vec3(&self, device: &mut dyn GraphicsDevice, name: &str, value: Vec3) {
        device.set_uniform(self.id, name, UniformValue::Vec3(value));
    }

    /// Set a `mat4` uniform
    pub fn set_mat4(&self, device: &mut dyn GraphicsDevice, name: &str, value: &Mat4) {
        device.set_uniform(self.id, name, UniformValue::Mat4(*value));
    }

    /// Route a uniform block to a binding point
    pub fn bind_uniform_block(&self, device: &mut dyn GraphicsDevice, block: &str, binding: u32) {
        device.bind_uniform_block(self.id, block, binding);
    }

    /// Release the program
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        device.delete_program(self.id);
    }
}

fn delete_all(device: &mut dyn GraphicsDevice, shaders: &[ShaderId]) {
    for &shader in shaders {
        device.delete_shader(shader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gpu::recording::{Call, RecordingDevice};

    const BASIC: &str = "\
// lit cube
// SHADER VERTEX
layout(location = 0) in vec3 aPos;
void main() { gl_Position = vec4(aPos, 1.0); }
// SHADER FRAGMENT
out vec4 color;
void main() { color = vec4(1.0); }
";

    #[test]
    fn test_parse_splits_sections() {
        let sources = ShaderSources::parse(BASIC);
        assert_eq!(
            sources.vertex.as_deref(),
            Some("layout(location = 0) in vec3 aPos;\nvoid main() { gl_Position = vec4(aPos, 1.0); }\n")
        );
        assert_eq!(
            sources.fragment.as_deref(),
            Some("out vec4 color;\nvoid main() { color = vec4(1.0); }\n")
        );
        assert!(sources.geometry.is_none());
    }

    #[test]
    fn test_lines_before_first_marker_are_ignored() {
        let sources = ShaderSources::parse(BASIC);
        assert!(!sources.vertex.unwrap_or_default().contains("lit cube"));
    }

    #[test]
    fn test_compile_source_has_preamble() {
        let sources = ShaderSources::parse(BASIC);
        let fragment = sources.compile_source(ShaderStage::Fragment).unwrap();
        assert!(fragment.starts_with("#version 330 core\n#define SHADER_FRAGMENT\n"));
        assert!(fragment.ends_with("color = vec4(1.0); }\n"));
    }

    #[test]
    fn test_geometry_section_is_compiled_when_present() {
        let text = format!("{BASIC}// SHADER GEOMETRY\nlayout(triangles) in;\n");
        let mut device = RecordingDevice::new();
        Shader::from_source(&mut device, "geo.shader", &text).unwrap();

        let stages: Vec<ShaderStage> = device.sources.iter().map(|(stage, _)| *stage).collect();
        assert_eq!(
            stages,
            vec![ShaderStage::Vertex, ShaderStage::Fragment, ShaderStage::Geometry]
        );
        assert!(device.calls.contains(&Call::LinkProgram(3)));
    }

    #[test]
    fn test_stages_deleted_after_link() {
        let mut device = RecordingDevice::new();
        Shader::from_source(&mut device, "basic.shader", BASIC).unwrap();
        assert_eq!(device.count(|call| matches!(call, Call::DeleteShader(_))), 2);
    }

    #[test]
    fn test_compile_failure_reports_stage() {
        let mut device = RecordingDevice::new();
        device.fail_compile = Some(ShaderStage::Fragment);

        let err = Shader::from_source(&mut device, "basic.shader", BASIC).unwrap_err();
        match err {
            ShaderError::Compile { stage, log, .. } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.contains("fragment"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // The vertex stage that did compile is cleaned up.
        assert_eq!(device.count(|call| matches!(call, Call::DeleteShader(_))), 1);
        assert_eq!(device.count(|call| matches!(call, Call::LinkProgram(_))), 0);
    }

    #[test]
    fn test_link_failure() {
        let mut device = RecordingDevice::new();
        device.fail_link = true;
        let err = Shader::from_source(&mut device, "basic.shader", BASIC).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }

    #[test]
    fn test_missing_fragment_section() {
        let mut device = RecordingDevice::new();
        let err = Shader::from_source(&mut device, "half.shader", "// SHADER VERTEX\nvoid main() {}\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ShaderError::MissingStage { stage: ShaderStage::Fragment, .. }
        ));
        assert!(device.calls.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let mut device = RecordingDevice::new();
        let err = Shader::load(&mut device, "does/not/exist.shader").unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }
}

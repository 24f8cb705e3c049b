//! OBJ-backed models drawn as plain triangle lists

use std::path::Path;

use thiserror::Error;

use crate::assets::obj_loader::{ObjError, ObjLoader, ObjMesh};
use crate::foundation::math::Mat4;
use crate::render::buffer::{VertexArray, VertexBuffer};
use crate::render::gpu::GraphicsDevice;
use crate::render::layout::{BufferLayout, ElementType};
use crate::render::texture::Texture2D;

/// Model loading errors
#[derive(Error, Debug)]
pub enum ModelError {
    /// The OBJ file could not be loaded
    #[error("failed to load model '{path}': {source}")]
    Obj {
        /// Model file
        path: String,
        /// Underlying error
        #[source]
        source: ObjError,
    },
}

/// Geometry, attribute layout and textures of one model
///
/// Positions go to slot 0, normals to slot 1 and texture coordinates (when
/// the OBJ has them) to slot 2.
#[derive(Debug)]
pub struct SimpleModel {
    vertex_array: VertexArray,
    vertex_buffer: VertexBuffer<f32>,
    layout: BufferLayout,
    textures: Vec<Texture2D>,
    vertex_count: usize,
    /// Model-to-world transform, uploaded as `matModel` by the renderer
    pub transform: Mat4,
}

impl SimpleModel {
    /// Load an OBJ file and any textures
    ///
    /// Textures that fail to load are logged and skipped.
    pub fn load<Q: AsRef<Path>, P: AsRef<Path>>(
        device: &mut dyn GraphicsDevice,
        obj_path: Q,
        texture_paths: &[P],
    ) -> Result<Self, ModelError> {
        let obj_path = obj_path.as_ref();
        let mesh = ObjLoader::load_obj(obj_path).map_err(|source| ModelError::Obj {
            path: obj_path.display().to_string(),
            source,
        })?;

        let mut model = Self::from_mesh(device, &mesh);
        model.add_textures(device, texture_paths);
        log::info!(
            "Loaded model {:?}: {} vertices, {} textures",
            obj_path,
            model.vertex_count,
            model.textures.len()
        );
        Ok(model)
    }

    /// Upload parsed geometry
    pub fn from_mesh(device: &mut dyn GraphicsDevice, mesh: &ObjMesh) -> Self {
        let vertex_array = VertexArray::new(device);
        vertex_array.bind(device);
        let vertex_buffer =
            VertexBuffer::with_data(device, mesh.components_per_vertex(), &mesh.interleaved());

        let mut layout = BufferLayout::new();
        for &width in mesh.attribute_sizes() {
            layout.declare(device, &vertex_array, &vertex_buffer, width, ElementType::Float);
        }
        VertexArray::unbind(device);

        Self {
            vertex_array,
            vertex_buffer,
            layout,
            textures: Vec::new(),
            vertex_count: mesh.vertex_count(),
            transform: Mat4::identity(),
        }
    }

    /// Load textures and append them to the next free units
    pub fn add_textures<P: AsRef<Path>>(&mut self, device: &mut dyn GraphicsDevice, paths: &[P]) {
        self.textures.extend(
            paths
                .iter()
                .filter_map(|path| Texture2D::load_or_warn(device, path)),
        );
    }

    /// Append an already uploaded texture
    pub fn push_texture(&mut self, texture: Texture2D) {
        self.textures.push(texture);
    }

    /// Bind the vertex array and texture `i` to unit `i`
    pub fn bind_textures(&self, device: &mut dyn GraphicsDevice) {
        self.vertex_array.bind(device);
        for (unit, texture) in (0u32..).zip(&self.textures) {
            texture.bind(device, unit);
        }
    }

    /// Draw every vertex as triangles; a program must be current
    pub fn draw(&self, device: &mut dyn GraphicsDevice) {
        self.vertex_array.bind(device);
        device.draw_arrays(0, self.vertex_count);
    }

    /// Number of vertices drawn
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Attribute layout of the vertex buffer
    pub const fn layout(&self) -> &BufferLayout {
        &self.layout
    }

    /// Loaded textures, in unit order
    pub fn textures(&self) -> &[Texture2D] {
        &self.textures
    }

    /// Release the vertex array, buffer and textures
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        for texture in self.textures {
            texture.destroy(device);
        }
        self.vertex_buffer.destroy(device);
        self.vertex_array.destroy(device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::image_loader::ImageData;
    use crate::render::gpu::recording::{Call, RecordingDevice};

    const TRIANGLE_UV: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn test_textured_mesh_uses_three_slots() {
        let mut device = RecordingDevice::new();
        let mesh = ObjLoader::parse_str(TRIANGLE_UV).unwrap();
        let model = SimpleModel::from_mesh(&mut device, &mesh);

        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.layout().stride(), 32);
        assert_eq!(
            device.attrib_pointers(),
            vec![
                (0, 3, ElementType::Float, 32, 0),
                (1, 3, ElementType::Float, 32, 12),
                (2, 2, ElementType::Float, 32, 24),
            ]
        );
    }

    #[test]
    fn test_untextured_mesh_uses_two_slots() {
        let mut device = RecordingDevice::new();
        let mesh = ObjLoader::parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n")
            .unwrap();
        let model = SimpleModel::from_mesh(&mut device, &mesh);
        assert_eq!(model.layout().slots().len(), 2);
        assert_eq!(model.layout().stride(), 24);
    }

    #[test]
    fn test_draw_issues_vertex_count() {
        let mut device = RecordingDevice::new();
        let mesh = ObjLoader::parse_str(TRIANGLE_UV).unwrap();
        let model = SimpleModel::from_mesh(&mut device, &mesh);
        model.draw(&mut device);
        assert_eq!(device.calls.last(), Some(&Call::DrawArrays(0, 3)));
    }

    #[test]
    fn test_textures_bound_to_consecutive_units() {
        let mut device = RecordingDevice::new();
        let mesh = ObjLoader::parse_str(TRIANGLE_UV).unwrap();
        let mut model = SimpleModel::from_mesh(&mut device, &mesh);
        for _ in 0..2 {
            let image = ImageData::solid_color(1, 1, [255; 4]);
            model.push_texture(Texture2D::from_image(&mut device, &image).unwrap());
        }
        device.calls.clear();

        model.bind_textures(&mut device);
        let ids: Vec<_> = model.textures().iter().map(Texture2D::id).collect();
        assert!(device.calls.contains(&Call::BindTexture(0, Some(ids[0]))));
        assert!(device.calls.contains(&Call::BindTexture(1, Some(ids[1]))));
    }

    #[test]
    fn test_missing_textures_are_skipped() {
        let mut device = RecordingDevice::new();
        let mesh = ObjLoader::parse_str(TRIANGLE_UV).unwrap();
        let mut model = SimpleModel::from_mesh(&mut device, &mesh);
        model.add_textures(&mut device, &["missing_diffuse.png"]);
        assert!(model.textures().is_empty());
    }

    #[test]
    fn test_missing_model_is_error() {
        let mut device = RecordingDevice::new();
        let result = SimpleModel::load::<_, &str>(&mut device, "missing.obj", &[]);
        assert!(matches!(result, Err(ModelError::Obj { .. })));
    }
}

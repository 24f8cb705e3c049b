//! OBJ file loader for 3D models
//!
//! Supports `v`, `vn`, `vt` and `f` records. Faces may use `v`, `v/t`, `v//n`
//! or `v/t/n` corners and any number of corners; polygons are fan
//! triangulated. The result is a flat triangle list (one vertex per corner)
//! ready for non-indexed drawing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// Reading the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be parsed
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// The file parsed but is not usable
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// One triangle corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjVertex {
    /// Position
    pub position: [f32; 3],
    /// Normal, `[0, 1, 0]` when the face gives none
    pub normal: [f32; 3],
    /// Texture coordinate, `[0, 0]` when the face gives none
    pub tex_coord: [f32; 2],
}

/// Triangulated OBJ geometry
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    /// Three vertices per triangle
    pub vertices: Vec<ObjVertex>,
    /// Whether faces referenced texture coordinates
    pub has_tex_coords: bool,
}

impl ObjMesh {
    /// Floats per vertex in [`Self::interleaved`]: 8 with texture coordinates, else 6
    pub const fn components_per_vertex(&self) -> usize {
        if self.has_tex_coords {
            8
        } else {
            6
        }
    }

    /// Attribute widths in declaration order
    pub fn attribute_sizes(&self) -> &'static [u32] {
        if self.has_tex_coords {
            &[3, 3, 2]
        } else {
            &[3, 3]
        }
    }

    /// Position, normal and (if present) uv per vertex, tightly packed
    pub fn interleaved(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertices.len() * self.components_per_vertex());
        for vertex in &self.vertices {
            data.extend_from_slice(&vertex.position);
            data.extend_from_slice(&vertex.normal);
            if self.has_tex_coords {
                data.extend_from_slice(&vertex.tex_coord);
            }
        }
        data
    }

    /// Number of vertices to draw
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// OBJ parser entry points
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<ObjMesh, ObjError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse OBJ text held in memory
    pub fn parse_str(text: &str) -> Result<ObjMesh, ObjError> {
        Self::parse(text.as_bytes())
    }

    /// Parse OBJ records from a reader
    pub fn parse<R: BufRead>(reader: R) -> Result<ObjMesh, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut mesh = ObjMesh::default();

        for (line_index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = line_index + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let values = &parts[1..];

            match parts[0] {
                "v" => positions.push(parse_floats(values, "vertex", line_number)?),
                "vn" => normals.push(parse_floats(values, "normal", line_number)?),
                "vt" => tex_coords.push(parse_floats(values, "texture coordinate", line_number)?),
                "f" => {
                    if values.len() < 3 {
                        return Err(parse_error(line_number, "face needs at least 3 corners"));
                    }

                    let mut corners = Vec::with_capacity(values.len());
                    for corner in values {
                        let refs = parse_corner(corner, line_number)?;
                        let position = *lookup(&positions, refs.position, "position", line_number)?;
                        let tex_coord = match refs.tex_coord {
                            Some(index) => {
                                mesh.has_tex_coords = true;
                                *lookup(&tex_coords, index, "texture coordinate", line_number)?
                            }
                            None => [0.0, 0.0],
                        };
                        let normal = match refs.normal {
                            Some(index) => *lookup(&normals, index, "normal", line_number)?,
                            None => [0.0, 1.0, 0.0],
                        };
                        corners.push(ObjVertex {
                            position,
                            normal,
                            tex_coord,
                        });
                    }

                    // Fan triangulation
                    for i in 1..(corners.len() - 1) {
                        mesh.vertices.push(corners[0]);
                        mesh.vertices.push(corners[i]);
                        mesh.vertices.push(corners[i + 1]);
                    }
                }
                _ => {
                    // o, g, s, usemtl, mtllib, ...
                }
            }
        }

        if mesh.vertices.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        Ok(mesh)
    }
}

struct CornerRefs {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

fn parse_error(line: usize, message: impl Into<String>) -> ObjError {
    ObjError::ParseError {
        line,
        message: message.into(),
    }
}

fn parse_floats<const N: usize>(
    values: &[&str],
    what: &str,
    line: usize,
) -> Result<[f32; N], ObjError> {
    if values.len() < N {
        return Err(parse_error(line, format!("{what} needs {N} components")));
    }
    let mut out = [0.0f32; N];
    for (slot, text) in out.iter_mut().zip(values) {
        *slot = text
            .parse()
            .map_err(|_| parse_error(line, format!("invalid {what} component '{text}'")))?;
    }
    Ok(out)
}

/// Parse a 1-based OBJ index into a 0-based one
fn parse_index(text: &str, line: usize) -> Result<usize, ObjError> {
    let index: i64 = text
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{text}'")))?;
    if index < 1 {
        return Err(parse_error(
            line,
            format!("unsupported index {index} (indices are 1-based, relative indices are not supported)"),
        ));
    }
    usize::try_from(index - 1).map_err(|_| parse_error(line, format!("index {index} out of range")))
}

fn parse_corner(corner: &str, line: usize) -> Result<CornerRefs, ObjError> {
    let mut fields = corner.split('/');
    let position = match fields.next() {
        Some(text) if !text.is_empty() => parse_index(text, line)?,
        _ => return Err(parse_error(line, format!("face corner '{corner}' has no position"))),
    };
    let tex_coord = match fields.next() {
        Some(text) if !text.is_empty() => Some(parse_index(text, line)?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(text) if !text.is_empty() => Some(parse_index(text, line)?),
        _ => None,
    };
    Ok(CornerRefs {
        position,
        tex_coord,
        normal,
    })
}

fn lookup<'a, T>(items: &'a [T], index: usize, what: &str, line: usize) -> Result<&'a T, ObjError> {
    items.get(index).ok_or_else(|| {
        parse_error(
            line,
            format!("{what} index {} out of bounds ({} defined)", index + 1, items.len()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXTURED_QUAD: &str = "\
# quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = ObjLoader::parse_str(TEXTURED_QUAD).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        let positions: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ]
        );
    }

    #[test]
    fn test_textured_layout_is_eight_floats() {
        let mesh = ObjLoader::parse_str(TEXTURED_QUAD).unwrap();
        assert!(mesh.has_tex_coords);
        assert_eq!(mesh.components_per_vertex(), 8);
        assert_eq!(mesh.attribute_sizes(), &[3, 3, 2]);

        let data = mesh.interleaved();
        assert_eq!(data.len(), 6 * 8);
        // Third corner: position (1,1,0), normal (0,0,1), uv (1,1)
        assert_eq!(&data[16..24], &[1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_position_normal_faces() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 -1\nf 1//1 2//1 3//1\n";
        let mesh = ObjLoader::parse_str(text).unwrap();
        assert!(!mesh.has_tex_coords);
        assert_eq!(mesh.components_per_vertex(), 6);
        assert_eq!(mesh.attribute_sizes(), &[3, 3]);
        assert_eq!(mesh.interleaved().len(), 3 * 6);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_missing_normal_defaults_up() {
        let mesh = ObjLoader::parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.vertices[2].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_out_of_bounds_index() {
        let err = ObjLoader::parse_str("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, ObjError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_relative_indices_rejected() {
        let err = ObjLoader::parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap_err();
        assert!(matches!(err, ObjError::ParseError { line: 4, .. }));
    }

    #[test]
    fn test_bad_float() {
        let err = ObjLoader::parse_str("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, ObjError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_no_faces() {
        let err = ObjLoader::parse_str("v 0 0 0\n").unwrap_err();
        assert!(matches!(err, ObjError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ObjLoader::load_obj("no/such/model.obj"),
            Err(ObjError::Io(_))
        ));
    }
}

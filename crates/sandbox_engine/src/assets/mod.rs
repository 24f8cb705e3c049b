//! Asset loading: OBJ geometry and image decoding

pub mod image_loader;
pub mod obj_loader;

pub use image_loader::{ImageData, ImageError};
pub use obj_loader::{ObjError, ObjLoader, ObjMesh, ObjVertex};

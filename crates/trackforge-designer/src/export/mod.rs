//! STL encoding and part packaging

pub mod mesh;
pub mod package;

pub use mesh::{Triangle, TriangleMesh};
pub use package::{pack, ExportFile, ExportPackage, MissingLayer, MANIFEST_FILE_NAME};

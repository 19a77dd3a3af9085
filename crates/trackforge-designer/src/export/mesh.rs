//! Triangle meshes and STL encoding

use nalgebra::{Point3, Vector3};
use std::io::Cursor;

use trackforge_core::ExportError;

use crate::csg::Solid;

/// A triangle with its outward normal
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
    pub normal: Vector3<f32>,
}

impl Triangle {
    pub fn new(v1: Point3<f32>, v2: Point3<f32>, v3: Point3<f32>) -> Self {
        let normal = (v2 - v1).cross(&(v3 - v1));
        let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        Self {
            vertices: [v1, v2, v3],
            normal,
        }
    }

    fn to_stl(&self) -> stl_io::Triangle {
        let [a, b, c] = self.vertices;
        stl_io::Triangle {
            normal: stl_io::Normal::new([self.normal.x, self.normal.y, self.normal.z]),
            vertices: [
                stl_io::Vertex::new([a.x, a.y, a.z]),
                stl_io::Vertex::new([b.x, b.y, b.z]),
                stl_io::Vertex::new([c.x, c.y, c.z]),
            ],
        }
    }
}

/// Flat triangle list, the form every part is exported in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn from_solid(solid: &Solid) -> Self {
        let triangles = solid
            .triangles()
            .into_iter()
            .map(|[a, b, c]| Triangle::new(a.cast::<f32>(), b.cast::<f32>(), c.cast::<f32>()))
            .collect();
        Self { triangles }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Axis-aligned bounds; `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut points = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        }))
    }

    /// Binary STL bytes
    pub fn to_stl_bytes(&self, name: &str) -> Result<Vec<u8>, ExportError> {
        if self.is_empty() {
            return Err(ExportError::EmptySolid {
                name: name.to_string(),
            });
        }
        let stl: Vec<stl_io::Triangle> = self.triangles.iter().map(Triangle::to_stl).collect();
        let mut bytes = Vec::new();
        stl_io::write_stl(&mut bytes, stl.iter()).map_err(|e| ExportError::Encoding {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(bytes)
    }

    /// Decode STL bytes (binary or ASCII)
    pub fn from_stl_bytes(bytes: &[u8]) -> std::io::Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let indexed = stl_io::read_stl(&mut cursor)?;
        let vertex = |i: usize| {
            let v = &indexed.vertices[i];
            Point3::new(v[0], v[1], v[2])
        };
        let triangles = indexed
            .faces
            .iter()
            .filter(|face| face.vertices.iter().all(|&i| i < indexed.vertices.len()))
            .map(|face| {
                Triangle::new(
                    vertex(face.vertices[0]),
                    vertex(face.vertices[1]),
                    vertex(face.vertices[2]),
                )
            })
            .collect();
        Ok(Self { triangles })
    }
}

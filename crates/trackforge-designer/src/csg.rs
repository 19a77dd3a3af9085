//! Solid modeling on top of csgrs
//!
//! Every primitive the board needs (boxes, cylinders, extruded outlines) is
//! produced by extruding a csgrs [`Sketch`]; booleans and rigid transforms go
//! through the [`CSG`] trait. Nothing outside this module touches csgrs types.

use csgrs::mesh::Mesh;
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use nalgebra::{Matrix4, Point3, Vector3};

/// Boolean combination applied to two solids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

/// Axis-aligned bounds of a solid in world millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds3 {
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// A closed triangulated solid
#[derive(Debug, Clone)]
pub struct Solid {
    mesh: Mesh<()>,
}

impl Default for Solid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Solid {
    pub fn empty() -> Self {
        Self { mesh: Mesh::new() }
    }

    /// Box of the given size centered on `center`
    pub fn cuboid(size: [f64; 3], center: [f64; 3]) -> Self {
        let [w, l, h] = size;
        let mesh = Sketch::<()>::rectangle(w, l, None).extrude(h);
        Self { mesh }.translated(center[0] - w / 2.0, center[1] - l / 2.0, center[2] - h / 2.0)
    }

    /// Box spanning `z_min..z_max`, centered on `(x, y)` and turned about Z by `angle_deg`
    pub fn slab_piece(width: f64, length: f64, z_min: f64, z_max: f64, x: f64, y: f64, angle_deg: f64) -> Self {
        let h = z_max - z_min;
        Self::cuboid([width, length, h], [0.0, 0.0, z_min + h / 2.0])
            .rotated_z(angle_deg)
            .translated(x, y, 0.0)
    }

    /// Upright cylinder with its axis through `(x, y)`, spanning `z_min..z_max`
    pub fn cylinder(radius: f64, z_min: f64, z_max: f64, x: f64, y: f64, segments: usize) -> Self {
        let mesh = Sketch::<()>::circle(radius, segments, None).extrude(z_max - z_min);
        Self { mesh }.translated(x, y, z_min)
    }

    /// Extrude planar rings along +Z starting at `z_min`
    ///
    /// Rings in the dominant winding are filled, rings wound the other way are
    /// cut back out, which matches nonzero filling for glyph outlines.
    pub fn extrude_rings(rings: &[Vec<[f64; 2]>], z_min: f64, depth: f64) -> Self {
        let usable: Vec<(&Vec<[f64; 2]>, f64)> = rings
            .iter()
            .filter(|ring| ring.len() >= 3)
            .map(|ring| (ring, signed_area(ring)))
            .filter(|(_, area)| area.abs() > f64::EPSILON)
            .collect();

        let Some(dominant) = usable
            .iter()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(_, area)| area.signum())
        else {
            return Self::empty();
        };

        let mut filled = Sketch::<()>::new();
        let mut holes = Sketch::<()>::new();
        let mut has_holes = false;

        for (ring, area) in usable {
            let mut points = ring.clone();
            if area < 0.0 {
                points.reverse();
            }
            let sketch = Sketch::polygon(&points, None);
            if area.signum() == dominant {
                filled = filled.union(&sketch);
            } else {
                holes = holes.union(&sketch);
                has_holes = true;
            }
        }

        if has_holes {
            filled = filled.difference(&holes);
        }

        Self { mesh: filled.extrude(depth) }.translated(0.0, 0.0, z_min)
    }

    pub fn translated(&self, dx: f64, dy: f64, dz: f64) -> Self {
        self.transformed(&Matrix4::new_translation(&Vector3::new(dx, dy, dz)))
    }

    /// Rotate about the world Z axis through the origin
    pub fn rotated_z(&self, angle_deg: f64) -> Self {
        if angle_deg == 0.0 {
            return self.clone();
        }
        self.transformed(&rotation_z(angle_deg))
    }

    pub fn transformed(&self, matrix: &Matrix4<f64>) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        Self {
            mesh: self.mesh.transform(matrix),
        }
    }

    pub fn union(&self, other: &Solid) -> Self {
        self.boolean(other, BooleanOp::Union)
    }

    pub fn difference(&self, other: &Solid) -> Self {
        self.boolean(other, BooleanOp::Difference)
    }

    pub fn intersection(&self, other: &Solid) -> Self {
        self.boolean(other, BooleanOp::Intersection)
    }

    pub fn boolean(&self, other: &Solid, op: BooleanOp) -> Self {
        match op {
            BooleanOp::Union if self.is_empty() => other.clone(),
            BooleanOp::Union | BooleanOp::Difference if other.is_empty() => self.clone(),
            BooleanOp::Difference | BooleanOp::Intersection if self.is_empty() => Self::empty(),
            BooleanOp::Intersection if other.is_empty() => Self::empty(),
            BooleanOp::Union => Self {
                mesh: self.mesh.union(&other.mesh),
            },
            BooleanOp::Difference => Self {
                mesh: self.mesh.difference(&other.mesh),
            },
            BooleanOp::Intersection => Self {
                mesh: self.mesh.intersection(&other.mesh),
            },
        }
    }

    /// Union of many solids
    pub fn union_all<'a>(solids: impl IntoIterator<Item = &'a Solid>) -> Self {
        solids
            .into_iter()
            .fold(Self::empty(), |acc, solid| acc.union(solid))
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.polygons.iter().all(|p| p.vertices.len() < 3)
    }

    pub fn polygon_count(&self) -> usize {
        self.mesh.polygons.len()
    }

    /// True when every vertex coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.mesh.polygons.iter().all(|polygon| {
            polygon
                .vertices
                .iter()
                .all(|v| v.pos.x.is_finite() && v.pos.y.is_finite() && v.pos.z.is_finite())
        })
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        let mut points = self.vertices();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(Bounds3 { min, max })
    }

    /// Fan-triangulated faces. Polygons out of the BSP are convex.
    pub fn triangles(&self) -> Vec<[Point3<f64>; 3]> {
        let mut triangles = Vec::new();
        for polygon in &self.mesh.polygons {
            let verts = &polygon.vertices;
            if verts.len() < 3 {
                continue;
            }
            let anchor = verts[0].pos;
            for pair in verts[1..].windows(2) {
                triangles.push([anchor, pair[0].pos, pair[1].pos]);
            }
        }
        triangles
    }

    fn vertices(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.mesh
            .polygons
            .iter()
            .flat_map(|polygon| polygon.vertices.iter().map(|v| v.pos))
    }
}

/// Rotation about world Z by `angle_deg`, counter-clockwise seen from above
pub fn rotation_z(angle_deg: f64) -> Matrix4<f64> {
    Matrix4::new_rotation(Vector3::new(0.0, 0.0, angle_deg.to_radians()))
}

/// Shoelace area; positive for counter-clockwise rings
pub fn signed_area(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let [x0, y0] = ring[i];
        let [x1, y1] = ring[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum / 2.0
}

//! Glyph outlines to solids
//!
//! Text is converted in its own plane: origin at the left end of the
//! baseline, X along the baseline, Y up. Extruding along +Z then rotating and
//! translating about Z drops it straight into the world frame.

use crate::csg::Solid;

use super::outline::{path_rings, OutlineSource};

/// Axis-aligned extent in the text plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PlaneBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Flattened glyph outlines of one string
#[derive(Debug, Clone, Default)]
pub struct PlanarText {
    rings: Vec<Vec<[f64; 2]>>,
    bounds: Option<PlaneBounds>,
}

impl PlanarText {
    pub fn from_rings(rings: Vec<Vec<[f64; 2]>>) -> Self {
        let mut points = rings.iter().flatten();
        let bounds = points.next().map(|first| {
            points.fold(
                PlaneBounds {
                    min_x: first[0],
                    min_y: first[1],
                    max_x: first[0],
                    max_y: first[1],
                },
                |b, p| PlaneBounds {
                    min_x: b.min_x.min(p[0]),
                    min_y: b.min_y.min(p[1]),
                    max_x: b.max_x.max(p[0]),
                    max_y: b.max_y.max(p[1]),
                },
            )
        });
        Self { rings, bounds }
    }

    /// True when the string produced no outline (blank text or no font)
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn bounds(&self) -> Option<PlaneBounds> {
        self.bounds
    }

    pub fn rings(&self) -> &[Vec<[f64; 2]>] {
        &self.rings
    }

    /// Stretch about the baseline origin so the outline measures exactly
    /// `width` by `height`
    pub fn scaled_to(&self, width: f64, height: f64) -> Self {
        let Some(bounds) = self.bounds else {
            return self.clone();
        };
        let sx = if bounds.width() > 0.0 { width / bounds.width() } else { 1.0 };
        let sy = if bounds.height() > 0.0 { height / bounds.height() } else { 1.0 };
        self.scaled(sx, sy)
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::from_rings(
            self.rings
                .iter()
                .map(|ring| ring.iter().map(|p| [p[0] * sx, p[1] * sy]).collect())
                .collect(),
        )
    }

    /// Solid text spanning `z_min..z_min + depth`
    pub fn extrude(&self, z_min: f64, depth: f64) -> Solid {
        Solid::extrude_rings(&self.rings, z_min, depth)
    }

    /// Box covering the outline's extent, spanning `z_min..z_max`
    pub fn footprint(&self, z_min: f64, z_max: f64) -> Solid {
        match self.bounds {
            Some(b) if b.width() > 0.0 && b.height() > 0.0 => {
                let (cx, cy) = b.center();
                Solid::slab_piece(b.width(), b.height(), z_min, z_max, cx, cy, 0.0)
            }
            _ => Solid::empty(),
        }
    }
}

/// Turns strings into planar glyph outlines
pub struct GlyphConverter<'a> {
    outlines: &'a dyn OutlineSource,
    tolerance: f64,
}

impl<'a> GlyphConverter<'a> {
    pub fn new(outlines: &'a dyn OutlineSource, tolerance: f64) -> Self {
        Self {
            outlines,
            tolerance,
        }
    }

    /// Outline `text` at `size` millimeters in the text plane
    pub fn planar(&self, text: &str, size: f64) -> PlanarText {
        let path = self.outlines.outline(text, 0.0, 0.0, size);
        let rings = path_rings(&path, self.tolerance)
            .into_iter()
            .map(|ring| ring.into_iter().map(|[x, y]| [x, -y]).collect())
            .collect();
        PlanarText::from_rings(rings)
    }
}

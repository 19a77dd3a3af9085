//! Text to vector outlines
//!
//! The layout engine needs two things from a typeface: how big a string will
//! be, and its glyph outlines as a path. Both are behind [`OutlineSource`] so
//! layouts can be produced without a font installed.

use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::Path;
use rusttype::{Font, OutlineBuilder, Scale};
use trackforge_core::{AssetError, FontSource};

use super::font_manager;

/// Extent of outlined text relative to its anchor, layout frame (Y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl TextExtent {
    pub fn zero() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_zero(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// Produces glyph outlines for strings
pub trait OutlineSource: Send + Sync {
    /// Outline of `text` at `size` millimeters with the baseline starting at
    /// `(x, y)`. Layout frame: Y grows downward, so glyphs extend to smaller Y.
    fn outline(&self, text: &str, x: f64, y: f64, size: f64) -> Path;

    /// Outline extent relative to the baseline origin
    fn measure(&self, text: &str, size: f64, tolerance: f64) -> TextExtent {
        path_extent(&self.outline(text, 0.0, 0.0, size), tolerance).unwrap_or_else(TextExtent::zero)
    }

    /// The load failure, when this source renders nothing
    fn failure(&self) -> Option<&AssetError> {
        None
    }
}

/// Outlines from a loaded TrueType/OpenType font
pub struct FontOutlines {
    font: Result<&'static Font<'static>, AssetError>,
}

impl FontOutlines {
    /// Resolve `source`; a failed load yields a source that renders nothing
    pub fn load(source: &FontSource) -> Self {
        Self {
            font: font_manager::load_font(source),
        }
    }

    pub async fn load_async(source: FontSource) -> Self {
        Self {
            font: font_manager::load_font_async(source).await,
        }
    }

    pub fn from_font(font: &'static Font<'static>) -> Self {
        Self { font: Ok(font) }
    }

    pub fn unavailable(error: AssetError) -> Self {
        Self { font: Err(error) }
    }

    pub fn is_available(&self) -> bool {
        self.font.is_ok()
    }
}

impl OutlineSource for FontOutlines {
    fn outline(&self, text: &str, x: f64, y: f64, size: f64) -> Path {
        let Ok(font) = &self.font else {
            return Path::new();
        };

        let mut sink = PathSink::new(x as f32, y as f32);
        let scale = Scale::uniform(size as f32);
        for glyph in font.layout(text, scale, rusttype::point(0.0, 0.0)) {
            let position = glyph.position();
            sink.offset = (x as f32 + position.x, y as f32 + position.y);
            glyph.unpositioned().build_outline(&mut sink);
        }
        sink.finish()
    }

    fn failure(&self) -> Option<&AssetError> {
        self.font.as_ref().err()
    }
}

/// Collects rusttype glyph outlines into a lyon path, offset to the pen
/// position. Scaled glyph outlines are already Y-down.
struct PathSink {
    builder: lyon::path::path::Builder,
    offset: (f32, f32),
    open: bool,
}

impl PathSink {
    fn new(x: f32, y: f32) -> Self {
        Self {
            builder: Path::builder(),
            offset: (x, y),
            open: false,
        }
    }

    fn at(&self, x: f32, y: f32) -> lyon::math::Point {
        point(self.offset.0 + x, self.offset.1 + y)
    }

    fn finish(mut self) -> Path {
        if self.open {
            self.builder.end(true);
        }
        self.builder.build()
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.builder.end(true);
        }
        let p = self.at(x, y);
        self.builder.begin(p);
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.at(x, y);
        self.builder.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let ctrl = self.at(x1, y1);
        let to = self.at(x, y);
        self.builder.quadratic_bezier_to(ctrl, to);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let ctrl1 = self.at(x1, y1);
        let ctrl2 = self.at(x2, y2);
        let to = self.at(x, y);
        self.builder.cubic_bezier_to(ctrl1, ctrl2, to);
    }

    fn close(&mut self) {
        if self.open {
            self.builder.end(true);
            self.open = false;
        }
    }
}

/// Flatten a path into closed rings of points
pub fn path_rings(path: &Path, tolerance: f64) -> Vec<Vec<[f64; 2]>> {
    let mut rings: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();

    for event in path.iter().flattened(tolerance as f32) {
        match event {
            lyon::path::Event::Begin { at } => {
                current.clear();
                current.push([at.x as f64, at.y as f64]);
            }
            lyon::path::Event::Line { to, .. } => {
                current.push([to.x as f64, to.y as f64]);
            }
            lyon::path::Event::End { .. } => {
                if current.len() > 1 && current.first() == current.last() {
                    current.pop();
                }
                if current.len() >= 3 {
                    rings.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            _ => {}
        }
    }

    rings
}

/// Extent of a flattened path; `None` when it has no points
pub fn path_extent(path: &Path, tolerance: f64) -> Option<TextExtent> {
    let rings = path_rings(path, tolerance);
    let mut points = rings.iter().flatten();
    let first = points.next()?;
    let mut extent = TextExtent {
        min_x: first[0],
        min_y: first[1],
        max_x: first[0],
        max_y: first[1],
    };
    for p in points {
        extent.min_x = extent.min_x.min(p[0]);
        extent.min_y = extent.min_y.min(p[1]);
        extent.max_x = extent.max_x.max(p[0]);
        extent.max_y = extent.max_y.max(p[1]);
    }
    Some(extent)
}

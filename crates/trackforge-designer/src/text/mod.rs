//! Text support: typefaces, glyph outlines, SVG path data and glyph solids

pub mod font_manager;
pub mod glyph;
pub mod outline;
pub mod svg_path;

pub use font_manager::{list_font_families, load_font, load_font_async};
pub use glyph::{GlyphConverter, PlanarText, PlaneBounds};
pub use outline::{path_extent, path_rings, FontOutlines, OutlineSource, TextExtent};
pub use svg_path::{parse_svg_path, to_svg_path};

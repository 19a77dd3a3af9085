//! Shared test fixtures

#![allow(dead_code)]

use lyon::math::point;
use lyon::path::Path;
use trackforge_core::{Configuration, DerivedDimensions};
use trackforge_designer::layers::BoardGeometry;
use trackforge_designer::OutlineSource;

/// Draws every non-space character as a solid block, so text geometry can be
/// tested without a system font
pub struct BlockOutlines;

pub const BLOCK_ADVANCE: f64 = 0.6;
pub const BLOCK_WIDTH: f64 = 0.5;
pub const BLOCK_HEIGHT: f64 = 0.7;

impl OutlineSource for BlockOutlines {
    fn outline(&self, text: &str, x: f64, y: f64, size: f64) -> Path {
        let mut builder = Path::builder();
        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let x0 = x + i as f64 * BLOCK_ADVANCE * size;
            let x1 = x0 + BLOCK_WIDTH * size;
            let top = y - BLOCK_HEIGHT * size;
            builder.begin(point(x0 as f32, y as f32));
            builder.line_to(point(x1 as f32, y as f32));
            builder.line_to(point(x1 as f32, top as f32));
            builder.line_to(point(x0 as f32, top as f32));
            builder.end(true);
        }
        builder.build()
    }
}

pub fn geometry() -> BoardGeometry {
    let config = Configuration::default();
    BoardGeometry::new(config, DerivedDimensions::derive(&config))
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

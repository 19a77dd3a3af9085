//! Module extents on the working surface

use trackforge_core::{BoundingBox, DerivedDimensions};

use crate::model::{LabelModule, Module, PathLabelModule, Rotation, SliderModule};
use crate::text::{parse_svg_path, path_extent};

fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
    BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

/// Rotate `(px, py)` about `(cx, cy)`; positive degrees turn clockwise on
/// the Y-down layout
pub fn rotate_about(px: f64, py: f64, cx: f64, cy: f64, degrees: f64) -> (f64, f64) {
    if degrees == 0.0 {
        return (px, py);
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (dx, dy) = (px - cx, py - cy);
    (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
}

fn rotated_rect(r: BoundingBox, cx: f64, cy: f64, degrees: f64) -> BoundingBox {
    if degrees == 0.0 {
        return r;
    }
    let corners = [
        (r.min_x, r.min_y),
        (r.max_x, r.min_y),
        (r.max_x, r.max_y),
        (r.min_x, r.max_y),
    ];
    // Seed from the first corner; a fresh BoundingBox always includes the origin.
    let (sx, sy) = rotate_about(corners[0].0, corners[0].1, cx, cy, degrees);
    let mut out = rect(sx, sy, sx, sy);
    for (x, y) in &corners[1..] {
        let (rx, ry) = rotate_about(*x, *y, cx, cy, degrees);
        out.check_extremes(rx, ry, rx, ry);
    }
    out
}

pub fn slider_extent(slider: &SliderModule, dims: &DerivedDimensions) -> BoundingBox {
    let across = dims.slider_width_view_box;
    let along = dims.slider_view_length(slider.length);
    match slider.rotation {
        Rotation::Vertical => rect(slider.x, slider.y, slider.x + across, slider.y + along),
        Rotation::Horizontal => rect(slider.x, slider.y, slider.x + along, slider.y + across),
    }
}

pub fn label_extent(label: &LabelModule) -> BoundingBox {
    let r = rect(label.x, label.y - label.height, label.x + label.width, label.y);
    rotated_rect(r, label.x, label.y, label.rotation)
}

/// Outline extent, or a zero-size box at the anchor when the outline is
/// empty or unparsable
pub fn path_label_extent(label: &PathLabelModule, tolerance: f64) -> BoundingBox {
    let extent = parse_svg_path(&label.outline)
        .ok()
        .and_then(|path| path_extent(&path, tolerance));
    let r = match extent {
        Some(e) => rect(e.min_x, e.min_y, e.max_x, e.max_y),
        None => rect(label.x, label.y, label.x, label.y),
    };
    rotated_rect(r, label.x, label.y, label.rotation)
}

/// Layout-space extent of any module
pub fn module_extent(module: &Module, dims: &DerivedDimensions, tolerance: f64) -> BoundingBox {
    match module {
        Module::Slider(s) => slider_extent(s, dims),
        Module::Dial(d) => rect(d.x, d.y, d.x + dims.dial_view_box, d.y + dims.dial_view_box),
        Module::Label(l) => label_extent(l),
        Module::PathLabel(p) => path_label_extent(p, tolerance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackforge_core::Configuration;

    fn dims() -> DerivedDimensions {
        DerivedDimensions::derive(&Configuration::default())
    }

    #[test]
    fn test_slider_extents_swap_with_rotation() {
        let mut slider = SliderModule {
            length: 4,
            rotation: Rotation::Vertical,
            x: 10.0,
            y: 20.0,
        };
        let v = slider_extent(&slider, &dims());
        assert!((v.width() - 7.9).abs() < 1e-9);
        assert!((v.height() - 26.8).abs() < 1e-9);

        slider.rotation = Rotation::Horizontal;
        let h = slider_extent(&slider, &dims());
        assert!((h.width() - v.height()).abs() < 1e-9);
        assert!((h.height() - v.width()).abs() < 1e-9);
        assert_eq!((h.min_x, h.min_y), (10.0, 20.0));
    }

    #[test]
    fn test_label_extent_above_baseline() {
        let label = LabelModule {
            rotation: 0.0,
            x: 5.0,
            y: 10.0,
            text: "AB".into(),
            width: 8.0,
            height: 3.0,
        };
        let e = label_extent(&label);
        assert_eq!((e.min_x, e.min_y, e.max_x, e.max_y), (5.0, 7.0, 13.0, 10.0));
    }

    #[test]
    fn test_rotated_label_extent() {
        let label = LabelModule {
            rotation: 90.0,
            x: 0.0,
            y: 0.0,
            text: "A".into(),
            width: 4.0,
            height: 2.0,
        };
        let e = label_extent(&label);
        assert!((e.width() - 2.0).abs() < 1e-9);
        assert!((e.height() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_label_extent() {
        let label = PathLabelModule {
            rotation: 0.0,
            x: 0.0,
            y: 0.0,
            outline: "M 2 -6 L 9 -6 L 9 0 L 2 0 Z".into(),
        };
        let e = path_label_extent(&label, 0.1);
        assert_eq!((e.min_x, e.min_y, e.max_x, e.max_y), (2.0, -6.0, 9.0, 0.0));
    }

    #[test]
    fn test_empty_path_label_collapses_to_anchor() {
        let label = PathLabelModule {
            rotation: 0.0,
            x: 4.0,
            y: 7.0,
            outline: String::new(),
        };
        let e = path_label_extent(&label, 0.1);
        assert_eq!((e.min_x, e.min_y, e.max_x, e.max_y), (4.0, 7.0, 4.0, 7.0));
    }

    #[test]
    fn test_rotate_about_quarter_turn() {
        let (x, y) = rotate_about(1.0, 0.0, 0.0, 0.0, 90.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
    }
}

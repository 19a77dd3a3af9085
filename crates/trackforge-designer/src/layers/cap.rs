//! Layer 3: the cap
//!
//! A thin slab over the board. Slider knobs and dial knobs poke through
//! windows cut into it, the current dial digit shows through a radial window,
//! labels are embossed into recesses and path labels are raised outlines.

use trackforge_core::{AssetError, GeometryError};

use super::geometry::{to_world, world_angle, BoardGeometry, LAYER3_TOP};
use super::{check_step, slab_solid};
use crate::csg::Solid;
use crate::layout::extent::rotate_about;
use crate::layout::Layout;
use crate::model::{DialModule, LabelModule, Module, PathLabelModule, Rotation, SliderModule};
use crate::text::{parse_svg_path, path_rings, GlyphConverter};

pub const LAYER_NAME: &str = "layer3";

/// Font size label text is outlined at before being fitted to its box
const LABEL_GLYPH_SIZE: f64 = 8.0;

/// Stadium-shaped window the slider knob travels in
pub fn slider_window(g: &BoardGeometry, slider: &SliderModule, segments: usize) -> Solid {
    let (z0, z1) = g.cap_cut_z();
    let r = g.knob_clearance_radius();
    let travel = g.dims.segment_length * f64::from(slider.length.saturating_sub(1));
    let (cx, cy) = g.channel_center(slider);
    let (wx, wy) = to_world(cx, cy);
    let (size_x, size_y) = match slider.rotation {
        Rotation::Vertical => (2.0 * r, travel),
        Rotation::Horizontal => (travel, 2.0 * r),
    };

    let positions = g.magnet_positions(slider);
    let ends: Vec<Solid> = match (positions.first(), positions.last()) {
        (Some(first), Some(last)) => [first, last]
            .into_iter()
            .map(|&(x, y)| {
                let (px, py) = to_world(x, y);
                Solid::cylinder(r, z0, z1, px, py, segments)
            })
            .collect(),
        _ => Vec::new(),
    };

    Solid::slab_piece(size_x, size_y, z0, z1, wx, wy, 0.0).union(&Solid::union_all(&ends))
}

/// Digit window and knob hole over a dial
pub fn dial_window(g: &BoardGeometry, dial: &DialModule, segments: usize) -> Solid {
    let (z0, z1) = g.cap_cut_z();
    let center = g.dial_center(dial);
    let (across, along) = g.digit_window();
    let w = BoardGeometry::polar(center, g.digit_window_radius(), 90.0);
    let (wx, wy) = to_world(w.0, w.1);
    let (cx, cy) = to_world(center.0, center.1);

    Solid::slab_piece(across, along, z0, z1, wx, wy, 0.0).union(&Solid::cylinder(
        g.knob_clearance_radius(),
        z0,
        z1,
        cx,
        cy,
        segments,
    ))
}

/// Embossed text plus the recess it sits in. The text stands on the recess
/// floor and rises `textDepth` above the cap. `None` when there is nothing to
/// draw.
pub fn label_solids(
    g: &BoardGeometry,
    label: &LabelModule,
    converter: &GlyphConverter<'_>,
) -> Option<(Solid, Solid)> {
    if label.width <= 0.0 || label.height <= 0.0 {
        return None;
    }
    let glyphs = converter.planar(&label.text, LABEL_GLYPH_SIZE);
    if glyphs.is_empty() {
        return None;
    }
    let fitted = glyphs.scaled_to(label.width, label.height);
    let t = g.config.text_depth;

    let (ax, ay) = to_world(label.x, label.y);
    let turn = world_angle(label.rotation);
    let place = |solid: Solid| solid.rotated_z(turn).translated(ax, ay, 0.0);

    let text = place(fitted.extrude(LAYER3_TOP - t, 2.0 * t));
    let recess = place(fitted.footprint(LAYER3_TOP - t, LAYER3_TOP + 1.0));
    Some((text, recess))
}

/// Raised outline of a path label
pub fn path_label_solid(
    g: &BoardGeometry,
    label: &PathLabelModule,
    tolerance: f64,
) -> Result<Solid, AssetError> {
    let path = parse_svg_path(&label.outline)?;
    let rings: Vec<Vec<[f64; 2]>> = path_rings(&path, tolerance)
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|[x, y]| {
                    let (rx, ry) = rotate_about(x, y, label.x, label.y, label.rotation);
                    let (wx, wy) = to_world(rx, ry);
                    [wx, wy]
                })
                .collect()
        })
        .collect();

    let t = g.config.text_depth;
    Ok(Solid::extrude_rings(&rings, LAYER3_TOP - t, 2.0 * t))
}

/// Build the cap layer in world coordinates. Path labels whose outline cannot
/// be parsed are skipped and reported.
pub fn build_cap_layer(
    layout: &Layout,
    g: &BoardGeometry,
    converter: &GlyphConverter<'_>,
    segments: usize,
    tolerance: f64,
) -> Result<(Solid, Vec<AssetError>), GeometryError> {
    let mut cap = slab_solid(layout, LAYER3_TOP - g.cap_height(), LAYER3_TOP);
    let mut warnings = Vec::new();

    for (index, placed) in layout.modules.iter().enumerate() {
        let module = &placed.module;
        cap = match module {
            Module::Slider(slider) => cap.difference(&slider_window(g, slider, segments)),
            Module::Dial(dial) => cap.difference(&dial_window(g, dial, segments)),
            Module::Label(label) => match label_solids(g, label, converter) {
                Some((text, recess)) => cap.difference(&recess).union(&text),
                None => continue,
            },
            Module::PathLabel(label) => match path_label_solid(g, label, tolerance) {
                Ok(outline) if !outline.is_empty() => cap.union(&outline),
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("Skipping path label {}: {}", index, e);
                    warnings.push(e);
                    continue;
                }
            },
        };
        cap = check_step(LAYER_NAME, index, module, cap)?;
    }

    Ok((cap, warnings))
}

//! Layer 2: moving pieces
//!
//! Every slider uses the same piece and every dial the same plate, so each is
//! built once at the origin and instanced with a [`Placement`].

use std::sync::Arc;

use trackforge_core::GeometryError;

use super::geometry::{to_world, world_angle, BoardGeometry, DIAL_POSITIONS, LAYER2_TOP};
use super::{check_step, NamedSolid, PartName, Placement};
use crate::csg::Solid;
use crate::layout::Layout;
use crate::model::{Module, Rotation};
use crate::text::GlyphConverter;

pub const LAYER_NAME: &str = "layer2";

/// Font size digits are outlined at before being fitted to their window
const DIGIT_GLYPH_SIZE: f64 = 8.0;

/// Slider piece at the origin, long axis along world Y
pub fn slider_piece(g: &BoardGeometry, segments: usize) -> Solid {
    let (across, along) = g.slider_piece_size();
    let bottom = g.piece_bottom();
    let body = Solid::slab_piece(across, along, bottom, LAYER2_TOP, 0.0, 0.0, 0.0);
    let knob = Solid::cylinder(g.knob_radius(), bottom, LAYER2_TOP + 5.0, 0.0, 0.0, segments);
    let (z0, z1) = g.piece_magnet_z();
    let magnet = Solid::cylinder(g.magnet_pocket_radius(), z0, z1, 0.0, 0.0, segments);

    body.union(&knob).difference(&magnet)
}

/// Digit plate at the origin: magnet ring underneath, knob on top, and the
/// digits 0-9 set into recesses around the rim
pub fn dial_piece(g: &BoardGeometry, converter: &GlyphConverter<'_>, segments: usize) -> Solid {
    let bottom = g.piece_bottom();
    let center = (0.0, 0.0);
    let mut plate = Solid::cylinder(g.plate_radius(), bottom, LAYER2_TOP, 0.0, 0.0, segments);

    let (z0, z1) = g.piece_magnet_z();
    let holes: Vec<Solid> = (0..DIAL_POSITIONS)
        .map(|i| {
            let p = BoardGeometry::polar(center, g.dial_magnet_radius(), BoardGeometry::dial_angle(i));
            let (x, y) = to_world(p.0, p.1);
            Solid::cylinder(g.magnet_pocket_radius(), z0, z1, x, y, segments)
        })
        .collect();
    plate = plate.difference(&Solid::union_all(&holes));

    let knob_height = g.config.magnet_height + g.piece_height() + 5.0;
    let knob_center = LAYER2_TOP - g.piece_height() / 2.0 + 2.5;
    let knob = Solid::cylinder(
        g.knob_radius(),
        knob_center - knob_height / 2.0,
        knob_center + knob_height / 2.0,
        0.0,
        0.0,
        segments,
    );
    plate = plate.union(&knob);

    let t = g.config.text_depth;
    let (window_across, window_along) = g.digit_window();
    let mut recesses = Vec::with_capacity(DIAL_POSITIONS);
    let mut digits = Vec::with_capacity(DIAL_POSITIONS);
    for i in 0..DIAL_POSITIONS {
        let theta = BoardGeometry::dial_angle(i);
        let turn = world_angle(theta - 90.0);

        let w = BoardGeometry::polar(center, g.digit_window_radius(), theta);
        let (wx, wy) = to_world(w.0, w.1);
        recesses.push(Solid::slab_piece(
            window_across,
            window_along,
            LAYER2_TOP - t,
            LAYER2_TOP + 1.0,
            wx,
            wy,
            turn,
        ));

        let label = i.to_string();
        let width = if label == "1" {
            window_across / 4.0
        } else {
            window_across / 2.0
        };
        let glyph = converter.planar(&label, DIGIT_GLYPH_SIZE);
        if glyph.is_empty() {
            continue;
        }
        let fitted = glyph.scaled_to(width, window_along / 2.0);
        let Some(bounds) = fitted.bounds() else {
            continue;
        };
        let a = BoardGeometry::polar(center, g.digit_text_radius(), theta);
        let (ax, ay) = to_world(a.0, a.1);
        // Center along the baseline; the glyph rises toward the knob.
        let shift = (bounds.min_x + bounds.max_x) / 2.0;
        digits.push(
            fitted
                .extrude(LAYER2_TOP - t, t)
                .translated(-shift, 0.0, 0.0)
                .rotated_z(turn)
                .translated(ax, ay, 0.0),
        );
    }

    plate = plate.difference(&Solid::union_all(&recesses));
    plate.union(&Solid::union_all(&digits))
}

/// Canonical pieces plus one instance per slider and dial
pub fn build_piece_layer(
    layout: &Layout,
    g: &BoardGeometry,
    converter: &GlyphConverter<'_>,
    segments: usize,
) -> Result<Vec<NamedSolid>, GeometryError> {
    let mut slider: Option<Arc<Solid>> = None;
    let mut dial: Option<Arc<Solid>> = None;
    let mut parts = Vec::new();

    for (index, placed) in layout.modules.iter().enumerate() {
        match &placed.module {
            Module::Slider(s) => {
                let piece = match slider.clone() {
                    Some(piece) => piece,
                    None => {
                        let solid = slider_piece(g, segments);
                        let piece = Arc::new(check_step(LAYER_NAME, index, &placed.module, solid)?);
                        slider = Some(piece.clone());
                        piece
                    }
                };
                let first = g.magnet_positions(s).first().copied().unwrap_or((s.x, s.y));
                let (dx, dy) = to_world(first.0, first.1);
                parts.push(NamedSolid::instance(
                    PartName::SliderLayer2,
                    piece,
                    Placement {
                        dx,
                        dy,
                        quarter_turn: s.rotation == Rotation::Horizontal,
                    },
                ));
            }
            Module::Dial(d) => {
                let piece = match dial.clone() {
                    Some(piece) => piece,
                    None => {
                        let solid = dial_piece(g, converter, segments);
                        let piece = Arc::new(check_step(LAYER_NAME, index, &placed.module, solid)?);
                        dial = Some(piece.clone());
                        piece
                    }
                };
                let c = g.dial_center(d);
                let (dx, dy) = to_world(c.0, c.1);
                parts.push(NamedSolid::instance(
                    PartName::DialLayer2,
                    piece,
                    Placement {
                        dx,
                        dy,
                        quarter_turn: false,
                    },
                ));
            }
            Module::Label(_) | Module::PathLabel(_) => {}
        }
    }

    Ok(parts)
}

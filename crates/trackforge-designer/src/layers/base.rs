//! Layer 1: the base slab
//!
//! A solid slab under the whole layout with a channel cut for every slider, a
//! round recess for every dial, and magnet pockets sunk below both.

use trackforge_core::GeometryError;

use super::geometry::{to_world, BoardGeometry, LAYER1_TOP};
use super::{check_step, slab_solid};
use crate::csg::Solid;
use crate::layout::Layout;
use crate::model::{DialModule, Module, Rotation, SliderModule};

pub const LAYER_NAME: &str = "layer1";

/// Channel plus magnet pockets for one slider
pub fn slider_channel(g: &BoardGeometry, slider: &SliderModule, segments: usize) -> Solid {
    let (cx, cy) = g.channel_center(slider);
    let (wx, wy) = to_world(cx, cy);
    let across = g.channel_width();
    let along = g.channel_length(slider.length);
    let (size_x, size_y) = match slider.rotation {
        Rotation::Vertical => (across, along),
        Rotation::Horizontal => (along, across),
    };

    let top = LAYER1_TOP + 1.0;
    let channel = Solid::slab_piece(size_x, size_y, g.base_cut_bottom(), top, wx, wy, 0.0);

    let (z0, z1) = g.base_magnet_z();
    let pockets: Vec<Solid> = g
        .magnet_positions(slider)
        .into_iter()
        .map(|(x, y)| {
            let (px, py) = to_world(x, y);
            Solid::cylinder(g.magnet_pocket_radius(), z0, z1, px, py, segments)
        })
        .collect();

    channel.union(&Solid::union_all(&pockets))
}

/// Recess, home magnet pocket and knob locator for one dial
pub fn dial_recess(g: &BoardGeometry, dial: &DialModule, segments: usize) -> Solid {
    let center = g.dial_center(dial);
    let (wx, wy) = to_world(center.0, center.1);

    let disc = Solid::cylinder(
        g.plate_radius() + g.config.part_gap_width,
        g.base_cut_bottom(),
        LAYER1_TOP + 1.0,
        wx,
        wy,
        segments,
    );

    let (z0, z1) = g.base_magnet_z();
    let (mx, my) = BoardGeometry::polar(center, g.dial_magnet_radius(), 90.0);
    let (mx, my) = to_world(mx, my);
    let magnet = Solid::cylinder(g.magnet_pocket_radius(), z0, z1, mx, my, segments);
    let locator = Solid::cylinder(g.knob_clearance_radius(), z0, z1, wx, wy, segments);

    disc.union(&magnet).union(&locator)
}

/// Build the base layer in world coordinates
pub fn build_base_layer(
    layout: &Layout,
    g: &BoardGeometry,
    segments: usize,
) -> Result<Solid, GeometryError> {
    let mut base = slab_solid(layout, LAYER1_TOP - g.base_height(), LAYER1_TOP);

    for (index, placed) in layout.modules.iter().enumerate() {
        let cutter = match &placed.module {
            Module::Slider(slider) => slider_channel(g, slider, segments),
            Module::Dial(dial) => dial_recess(g, dial, segments),
            Module::Label(_) | Module::PathLabel(_) => continue,
        };
        base = check_step(LAYER_NAME, index, &placed.module, base.difference(&cutter))?;
    }

    Ok(base)
}

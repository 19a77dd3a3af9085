use std::sync::Arc;

use trackforge_core::{Configuration, Tessellation};
use trackforge_designer::layers::base::slider_channel;
use trackforge_designer::layers::geometry::{to_world, LAYER1_TOP};
use trackforge_designer::{
    DialModule, LayerAssembler, Layout, Module, PartName, PlacedModule, Rotation, SliderModule,
    Solid, SLAB_MARGIN,
};

use crate::common::{assert_close, geometry, BlockOutlines};

fn slider(length: u32, rotation: Rotation, x: f64, y: f64) -> SliderModule {
    SliderModule {
        length,
        rotation,
        x,
        y,
    }
}

fn assembler(modules: Vec<Module>) -> LayerAssembler {
    let modules = modules.into_iter().map(PlacedModule::new).collect();
    let layout = Layout::from_modules(Configuration::default(), modules, 0.1).unwrap();
    LayerAssembler::new(
        Arc::new(layout),
        Arc::new(BlockOutlines),
        Tessellation {
            circular_segments: 16,
            curve_tolerance: 0.2,
        },
    )
}

#[test]
fn test_channel_footprint_vertical() {
    let g = geometry();
    let channel = slider_channel(&g, &slider(4, Rotation::Vertical, 20.0, 20.0), 16);
    let bounds = channel.bounds().unwrap();

    let width = g.dims.slider_radius * 2.0 + 2.0 + 2.0 * g.config.part_gap_width;
    let length = 4.0 * g.dims.segment_length + 2.0;

    // World Y is layout Y mirrored.
    assert_close(bounds.min.x, 20.0);
    assert_close(bounds.max.x, 20.0 + width);
    assert_close(bounds.max.y, -20.0);
    assert_close(bounds.min.y, -(20.0 + length));
    assert_close(bounds.max.z, LAYER1_TOP + 1.0);
}

#[test]
fn test_channel_footprint_horizontal_swaps_spans() {
    let g = geometry();
    let channel = slider_channel(&g, &slider(4, Rotation::Horizontal, 20.0, 20.0), 16);
    let bounds = channel.bounds().unwrap();

    let width = g.channel_width();
    let length = g.channel_length(4);
    assert_close(bounds.max.x - bounds.min.x, length);
    assert_close(bounds.max.y - bounds.min.y, width);
}

#[test]
fn test_magnet_pockets_sink_below_channel() {
    let g = geometry();
    let channel = slider_channel(&g, &slider(2, Rotation::Vertical, 0.0, 0.0), 16);
    let bounds = channel.bounds().unwrap();
    let (pocket_bottom, _) = g.base_magnet_z();
    assert_close(bounds.min.z, pocket_bottom);
    assert!(pocket_bottom < g.base_cut_bottom());
}

#[test]
fn test_base_layer_spans_slab() {
    let assembler = assembler(vec![
        Module::Slider(slider(3, Rotation::Vertical, 20.0, 20.0)),
        Module::Dial(DialModule { x: 50.0, y: 20.0 }),
    ]);
    let output = assembler.base_layer().unwrap();
    assert_eq!(output.parts.len(), 1);
    assert_eq!(output.parts[0].name, Some(PartName::Layer1));

    let slab = assembler.layout().slab();
    let bounds = output.parts[0].solid.bounds().unwrap();
    assert_close(bounds.min.x, slab.min_x);
    assert_close(bounds.max.x, slab.max_x);
    assert_close(bounds.max.y, -slab.min_y);
    assert_close(bounds.min.y, -slab.max_y);
    assert_close(bounds.max.z, LAYER1_TOP);
    assert_close(bounds.min.z, LAYER1_TOP - assembler.geometry().base_height());
    assert_close(slab.min_x, 20.0 - SLAB_MARGIN);
}

#[test]
fn test_base_layer_has_channel_removed() {
    let s = slider(4, Rotation::Vertical, 20.0, 20.0);
    let assembler = assembler(vec![Module::Slider(s.clone())]);
    let g = *assembler.geometry();
    let base = assembler.base_layer().unwrap().parts.remove(0).solid;

    let bottom = g.base_cut_bottom();
    let depth = LAYER1_TOP - bottom;
    let z = bottom + depth / 2.0;
    let cube = |x: f64, y: f64| Solid::cuboid([1.0, 1.0, depth / 2.0], [x, y, z]);

    let (cx, cy) = g.channel_center(&s);
    let (wx, wy) = to_world(cx, cy);
    assert!(base.intersection(&cube(wx, wy)).is_empty());

    // Beside the channel the slab is still solid.
    let (ox, oy) = to_world(cx - g.channel_width(), cy);
    assert!(!base.intersection(&cube(ox, oy)).is_empty());
}

#[test]
fn test_labels_do_not_cut_base() {
    let with_slider = assembler(vec![Module::Slider(slider(3, Rotation::Vertical, 20.0, 20.0))]);
    let plain = with_slider.base_layer().unwrap();

    let mut modules = vec![Module::Slider(slider(3, Rotation::Vertical, 20.0, 20.0))];
    modules.push(Module::Label(trackforge_designer::LabelModule {
        rotation: 0.0,
        x: 22.0,
        y: 30.0,
        text: "HP".to_string(),
        width: 4.0,
        height: 2.0,
    }));
    let labelled = assembler(modules).base_layer().unwrap();

    assert_eq!(
        plain.parts[0].solid.polygon_count(),
        labelled.parts[0].solid.polygon_count()
    );
}

use std::sync::Arc;

use trackforge_core::{AssetError, Configuration, Tessellation};
use trackforge_designer::layers::cap::{label_solids, path_label_solid, slider_window};
use trackforge_designer::layers::geometry::LAYER3_TOP;
use trackforge_designer::{
    GlyphConverter, LabelModule, LayerAssembler, Layout, Module, PartName, PathLabelModule,
    PlacedModule, Rotation, SliderModule, Solid,
};

use crate::common::{assert_close, geometry, BlockOutlines};

fn label(text: &str) -> LabelModule {
    LabelModule {
        rotation: 0.0,
        x: 30.0,
        y: 60.0,
        text: text.to_string(),
        width: 12.0,
        height: 4.0,
    }
}

fn slider() -> Module {
    Module::Slider(SliderModule {
        length: 3,
        rotation: Rotation::Vertical,
        x: 20.0,
        y: 20.0,
    })
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
fn test_slider_window_spans_travel() {
    let g = geometry();
    let s = SliderModule {
        length: 4,
        rotation: Rotation::Vertical,
        x: 0.0,
        y: 0.0,
    };
    let bounds = slider_window(&g, &s, 16).bounds().unwrap();
    let r = g.knob_clearance_radius();
    let travel = 3.0 * g.dims.segment_length;
    assert_close(bounds.max.y - bounds.min.y, travel + 2.0 * r);
    assert_close(bounds.max.x - bounds.min.x, 2.0 * r);
}

#[test]
fn test_label_fitted_to_measured_box() {
    let g = geometry();
    let outlines = BlockOutlines;
    let converter = GlyphConverter::new(&outlines, 0.2);
    let (text, recess) = label_solids(&g, &label("HP"), &converter).unwrap();

    let t = g.config.text_depth;
    let tb = text.bounds().unwrap();
    assert_close(tb.max.x - tb.min.x, 12.0);
    assert_close(tb.max.y - tb.min.y, 4.0);
    assert_close(tb.max.z, LAYER3_TOP + t);

    // The letters stand on the recess floor.
    let rb = recess.bounds().unwrap();
    assert_close(rb.min.z, LAYER3_TOP - t);
    assert_close(tb.min.z, rb.min.z);
    assert_close(rb.max.x - rb.min.x, 12.0);
}

#[test]
fn test_embossed_label_rests_on_cap_material() {
    let g = geometry();
    let outlines = BlockOutlines;
    let converter = GlyphConverter::new(&outlines, 0.2);
    let (text, recess) = label_solids(&g, &label("HP"), &converter).unwrap();

    let cap_bottom = LAYER3_TOP - g.cap_height();
    let cap = Solid::slab_piece(
        100.0,
        100.0,
        cap_bottom,
        LAYER3_TOP,
        36.0,
        -58.0,
        0.0,
    )
    .difference(&recess);

    // Material just under the emboss is the recess floor.
    let tb = text.bounds().unwrap();
    let below = Solid::slab_piece(
        tb.max.x - tb.min.x,
        tb.max.y - tb.min.y,
        tb.min.z - 0.2,
        tb.min.z,
        (tb.min.x + tb.max.x) / 2.0,
        (tb.min.y + tb.max.y) / 2.0,
        0.0,
    );
    assert!(!cap.intersection(&below).is_empty());

    // Nothing of the cap remains inside the recess above its floor.
    let above = Solid::slab_piece(
        tb.max.x - tb.min.x - 0.2,
        tb.max.y - tb.min.y - 0.2,
        tb.min.z + 0.05,
        LAYER3_TOP - 0.05,
        (tb.min.x + tb.max.x) / 2.0,
        (tb.min.y + tb.max.y) / 2.0,
        0.0,
    );
    assert!(cap.intersection(&above).is_empty());

    let board = cap.union(&text);
    let bb = board.bounds().unwrap();
    assert_close(bb.min.z, cap_bottom);
    assert_close(bb.max.z, LAYER3_TOP + g.config.text_depth);
}

#[test]
fn test_label_without_text_is_skipped() {
    let g = geometry();
    let outlines = BlockOutlines;
    let converter = GlyphConverter::new(&outlines, 0.2);
    assert!(label_solids(&g, &label("   "), &converter).is_none());

    let mut flat = label("HP");
    flat.height = 0.0;
    assert!(label_solids(&g, &flat, &converter).is_none());
}

#[test]
fn test_path_label_rises_two_text_depths() {
    let g = geometry();
    let path = PathLabelModule {
        rotation: 0.0,
        x: 10.0,
        y: 10.0,
        outline: "M10 10 L14 10 L14 6 L10 6 Z".to_string(),
    };
    let solid = path_label_solid(&g, &path, 0.1).unwrap();
    let bounds = solid.bounds().unwrap();
    let t = g.config.text_depth;
    assert_close(bounds.min.z, LAYER3_TOP - t);
    assert_close(bounds.max.z, LAYER3_TOP + t);
    assert_close(bounds.min.x, 10.0);
    assert_close(bounds.max.x, 14.0);
    assert_close(bounds.min.y, -10.0);
    assert_close(bounds.max.y, -6.0);
}

#[test]
fn test_cap_with_label_and_path_label() {
    let assembler = assembler(vec![
        slider(),
        Module::Label(label("HP")),
        Module::PathLabel(PathLabelModule {
            rotation: 0.0,
            x: 20.0,
            y: 15.0,
            outline: "M20 15 L24 15 L24 11 L20 11 Z".to_string(),
        }),
    ]);
    let output = assembler.cap_layer().unwrap();
    assert!(output.warnings.is_empty());
    assert_eq!(output.parts.len(), 1);
    assert_eq!(output.parts[0].name, Some(PartName::Layer3));

    let t = assembler.geometry().config.text_depth;
    let bounds = output.parts[0].solid.bounds().unwrap();
    assert_close(bounds.max.z, LAYER3_TOP + t);
    assert_close(bounds.min.z, LAYER3_TOP - assembler.geometry().cap_height());
}

#[test]
fn test_bad_path_label_is_skipped_with_warning() {
    let assembler = assembler(vec![
        slider(),
        Module::PathLabel(PathLabelModule {
            rotation: 0.0,
            x: 20.0,
            y: 15.0,
            outline: "M20 15 A5 5 0 0 1 30 15 Z".to_string(),
        }),
    ]);
    let output = assembler.cap_layer().unwrap();
    assert_eq!(output.parts.len(), 1);
    assert!(matches!(
        output.warnings.as_slice(),
        [AssetError::InvalidOutline(_)]
    ));

    let bounds = output.parts[0].solid.bounds().unwrap();
    assert_close(bounds.max.z, LAYER3_TOP);
}

use std::sync::Arc;

use trackforge_core::{AssetError, Configuration, Tessellation};
use trackforge_designer::layers::geometry::{to_world, LAYER2_TOP};
use trackforge_designer::layers::pieces::{dial_piece, slider_piece};
use trackforge_designer::text::FontOutlines;
use trackforge_designer::{
    DialModule, GlyphConverter, LayerAssembler, Layout, Module, OutlineSource, PartName,
    PlacedModule, Rotation, SliderModule,
};

use crate::common::{assert_close, geometry, BlockOutlines};

fn assembler(modules: Vec<Module>, outlines: Arc<dyn OutlineSource>) -> LayerAssembler {
    let modules = modules.into_iter().map(PlacedModule::new).collect();
    let layout = Layout::from_modules(Configuration::default(), modules, 0.1).unwrap();
    LayerAssembler::new(
        Arc::new(layout),
        outlines,
        Tessellation {
            circular_segments: 16,
            curve_tolerance: 0.2,
        },
    )
}

fn slider(rotation: Rotation, x: f64) -> Module {
    Module::Slider(SliderModule {
        length: 3,
        rotation,
        x,
        y: 20.0,
    })
}

#[test]
fn test_slider_piece_shape() {
    let g = geometry();
    let piece = slider_piece(&g, 16);
    let bounds = piece.bounds().unwrap();
    let (across, along) = g.slider_piece_size();

    assert_close(bounds.max.x - bounds.min.x, across);
    assert_close(bounds.max.y - bounds.min.y, along);
    assert_close(bounds.min.z, g.piece_bottom());
    // The knob stands 5 above the piece.
    assert_close(bounds.max.z, LAYER2_TOP + 5.0);
}

#[test]
fn test_dial_piece_without_font_has_no_digits() {
    let g = geometry();
    let blocks = BlockOutlines;
    let missing = FontOutlines::unavailable(AssetError::FontUnavailable {
        font: "test".to_string(),
        reason: "not installed".to_string(),
    });

    let with_digits = dial_piece(&g, &GlyphConverter::new(&blocks, 0.2), 16);
    let bare = dial_piece(&g, &GlyphConverter::new(&missing, 0.2), 16);

    assert!(!bare.is_empty());
    assert!(with_digits.polygon_count() > bare.polygon_count());

    let bounds = bare.bounds().unwrap();
    assert_close(bounds.max.x - bounds.min.x, g.dims.plate_width);
}

#[test]
fn test_dials_share_one_canonical_solid() {
    let assembler = assembler(
        vec![
            Module::Dial(DialModule { x: 20.0, y: 20.0 }),
            Module::Dial(DialModule { x: 80.0, y: 40.0 }),
        ],
        Arc::new(BlockOutlines),
    );
    let output = assembler.piece_layer().unwrap();
    assert_eq!(output.parts.len(), 2);
    assert!(output.warnings.is_empty());

    let (a, b) = (&output.parts[0], &output.parts[1]);
    assert_eq!(a.name, Some(PartName::DialLayer2));
    assert!(Arc::ptr_eq(&a.solid, &b.solid));

    // Placed instances are congruent up to translation.
    let (dx, dy) = (b.placement.dx - a.placement.dx, b.placement.dy - a.placement.dy);
    assert_close(dx, 60.0);
    assert_close(dy, -20.0);

    let placed_a = a.placed().triangles();
    let placed_b = b.placed().triangles();
    assert_eq!(placed_a.len(), placed_b.len());
    for (ta, tb) in placed_a.iter().zip(&placed_b) {
        for (pa, pb) in ta.iter().zip(tb) {
            assert!((pa.x + dx - pb.x).abs() < 1e-6);
            assert!((pa.y + dy - pb.y).abs() < 1e-6);
            assert!((pa.z - pb.z).abs() < 1e-6);
        }
    }
}

#[test]
fn test_slider_instances_sit_on_first_magnet() {
    let assembler = assembler(
        vec![
            slider(Rotation::Vertical, 20.0),
            slider(Rotation::Horizontal, 60.0),
        ],
        Arc::new(BlockOutlines),
    );
    let g = *assembler.geometry();
    let output = assembler.piece_layer().unwrap();
    assert_eq!(output.parts.len(), 2);

    for (part, placed) in output.parts.iter().zip(&assembler.layout().modules) {
        let Module::Slider(s) = &placed.module else {
            panic!("expected a slider");
        };
        let first = g.magnet_positions(s)[0];
        let (wx, wy) = to_world(first.0, first.1);
        assert_eq!(part.name, Some(PartName::SliderLayer2));
        assert_close(part.placement.dx, wx);
        assert_close(part.placement.dy, wy);
        assert_eq!(part.placement.quarter_turn, s.rotation == Rotation::Horizontal);
    }

    let turned = output.parts[1].placed().bounds().unwrap();
    let (across, along) = g.slider_piece_size();
    assert_close(turned.max.x - turned.min.x, along);
    assert_close(turned.max.y - turned.min.y, across);
}

#[test]
fn test_missing_font_warns_only_with_dials() {
    let missing: Arc<dyn OutlineSource> =
        Arc::new(FontOutlines::unavailable(AssetError::FontUnavailable {
            font: "test".to_string(),
            reason: "not installed".to_string(),
        }));

    let sliders_only = assembler(vec![slider(Rotation::Vertical, 20.0)], missing.clone());
    assert!(sliders_only.piece_layer().unwrap().warnings.is_empty());

    let with_dial = assembler(vec![Module::Dial(DialModule { x: 20.0, y: 20.0 })], missing);
    let output = with_dial.piece_layer().unwrap();
    assert_eq!(output.parts.len(), 1);
    assert_eq!(output.warnings.len(), 1);
}

use std::sync::Arc;

use trackforge_core::{Configuration, DerivedDimensions};
use trackforge_designer::layout::extent::module_extent;
use trackforge_designer::{validate_modules, LayoutEngine, Module, Rotation};

use crate::common::{assert_close, BlockOutlines, BLOCK_ADVANCE, BLOCK_HEIGHT, BLOCK_WIDTH};

fn engine() -> LayoutEngine {
    LayoutEngine::new(Configuration::default(), Arc::new(BlockOutlines)).unwrap()
}

#[test]
fn test_label_measured_from_outline() {
    let mut engine = engine();
    let index = engine.add_label(0.0, 10.0, 30.0, "HP", 10.0, false);
    let Module::Label(label) = &engine.modules()[index].module else {
        panic!("expected a label");
    };
    assert_close(label.width, (BLOCK_ADVANCE + BLOCK_WIDTH) * 10.0);
    assert_close(label.height, BLOCK_HEIGHT * 10.0);
    assert_close(label.y, 30.0);

    let bbox = engine.bounding_box();
    assert_close(bbox.min_x, 10.0);
    assert_close(bbox.max_y, 30.0);
    assert_close(bbox.min_y, 30.0 - BLOCK_HEIGHT * 10.0);
}

#[test]
fn test_centered_label_drops_baseline_by_a_third() {
    let mut engine = engine();
    let index = engine.add_label(0.0, 10.0, 30.0, "A", 9.0, true);
    let Module::Label(label) = &engine.modules()[index].module else {
        panic!("expected a label");
    };
    assert_close(label.y, 30.0 + BLOCK_HEIGHT * 9.0 / 3.0);
}

#[test]
fn test_path_label_extent_follows_outline() {
    let mut engine = engine();
    let index = engine.add_path_label(0.0, 50.0, 40.0, "7", 4.0, true);
    let placed = &engine.modules()[index];
    let dims = DerivedDimensions::derive(&Configuration::default());
    let extent = module_extent(&placed.module, &dims, 0.1);

    // Centered vertically on y = 40.
    assert_close(extent.min_y, 40.0 - BLOCK_HEIGHT * 4.0 / 2.0);
    assert_close(extent.max_y, 40.0 + BLOCK_HEIGHT * 4.0 / 2.0);
    assert_close(extent.min_x, 50.0);
    assert_close(extent.max_x, 50.0 + BLOCK_WIDTH * 4.0);
}

#[test]
fn test_snapshots_track_running_bounds() {
    let mut engine = engine();
    engine.add_slider(2, Rotation::Vertical, 0.0, 0.0);
    engine.add_dial(100.0, 100.0);

    let first = engine.modules()[0].editor_data.as_ref().unwrap();
    let second = engine.modules()[1].editor_data.as_ref().unwrap();
    assert!(first.bounding_box.max_x < second.bounding_box.max_x);
    assert_eq!(second.bounding_box, engine.bounding_box());
    assert_close(
        second.bounding_box.max_x,
        100.0 + engine.dimensions().dial_view_box,
    );
}

#[test]
fn test_finished_layout_validates() {
    let mut engine = engine();
    engine.add_slider(4, Rotation::Horizontal, 10.0, 10.0);
    engine.add_label(0.0, 10.0, 40.0, "Rage", 8.0, false);
    let (layout, warnings) = engine.finish();
    assert!(warnings.is_empty());
    assert_eq!(layout.modules.len(), 2);
    assert!(validate_modules(&layout, 0.1).is_ok());
}

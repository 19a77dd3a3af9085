use std::sync::Arc;

use trackforge_core::Configuration;
use trackforge_designer::layout::GridPlan;
use trackforge_designer::{LayoutEngine, Module, SlotGrid};

use crate::common::BlockOutlines;

fn expand(grid: &SlotGrid) -> LayoutEngine {
    let mut engine = LayoutEngine::new(Configuration::default(), Arc::new(BlockOutlines)).unwrap();
    engine.add_slot_grid(grid, 10.0, 90.0);
    engine
}

#[test]
fn test_grid_expansion_is_idempotent() {
    for grid in [SlotGrid::pathfinder_2e(), SlotGrid::dnd_5e()] {
        let a = expand(&grid);
        let b = expand(&grid);
        assert_eq!(a.modules(), b.modules());
        assert_eq!(a.bounding_box(), b.bounding_box());
    }
}

#[test]
fn test_pathfinder_grid_shape() {
    let grid = SlotGrid::pathfinder_2e();
    let engine = expand(&grid);

    let sliders: Vec<u32> = engine
        .modules()
        .iter()
        .filter_map(|m| match &m.module {
            Module::Slider(s) => Some(s.length),
            _ => None,
        })
        .collect();
    assert_eq!(sliders, vec![6, 5, 5, 5, 5, 5, 5, 5, 5, 5, 3]);

    // Sliders and headers, a ruler from 5 down to 0, and the title.
    assert_eq!(engine.modules().len(), 11 * 2 + 6 + 1);
}

#[test]
fn test_columns_bottom_aligned() {
    let config = Configuration::default();
    let dims = config.validated_dimensions().unwrap();
    let grid = SlotGrid::dnd_5e();
    let plan = GridPlan::new(&grid, &config, &dims, 10.0, 90.0);

    let bottoms: Vec<f64> = plan
        .sliders
        .iter()
        .map(|(length, _, y)| y + f64::from(*length) * dims.segment_length)
        .collect();
    for bottom in &bottoms {
        assert!((bottom - bottoms[0]).abs() < 1e-9);
    }
}

#[test]
fn test_custom_table_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ki.toml");
    std::fs::write(
        &path,
        "title = \"Ki Points\"\nlabels = [\"Ki\", \"Focus\"]\nmaxSlots = [3, 1]\n",
    )
    .unwrap();

    let grid = SlotGrid::load_from_file(&path).unwrap();
    assert_eq!(grid.largest_slot_number(), 3);
    let engine = expand(&grid);
    // Two columns, two headers, ruler 3..=0, title.
    assert_eq!(engine.modules().len(), 2 + 2 + 4 + 1);
}

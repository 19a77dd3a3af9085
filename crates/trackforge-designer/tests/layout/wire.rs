use std::sync::Arc;

use proptest::prelude::*;
use trackforge_core::Configuration;
use trackforge_designer::model::wire::{from_json, to_json};
use trackforge_designer::{
    decode_modules, encode_modules, DialModule, LabelModule, LayoutEngine, Module,
    PathLabelModule, PlacedModule, Rotation, SliderModule, SlotGrid,
};

use crate::common::BlockOutlines;

fn coordinate() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0
}

fn module() -> impl Strategy<Value = Module> {
    prop_oneof![
        (2u32..20, any::<bool>(), coordinate(), coordinate()).prop_map(|(length, turned, x, y)| {
            Module::Slider(SliderModule {
                length,
                rotation: if turned {
                    Rotation::Horizontal
                } else {
                    Rotation::Vertical
                },
                x,
                y,
            })
        }),
        (coordinate(), coordinate()).prop_map(|(x, y)| Module::Dial(DialModule { x, y })),
        (
            -360.0f64..360.0,
            coordinate(),
            coordinate(),
            "[A-Za-z ]{0,12}",
            0.0f64..100.0,
            0.0f64..20.0
        )
            .prop_map(|(rotation, x, y, text, width, height)| {
                Module::Label(LabelModule {
                    rotation,
                    x,
                    y,
                    text,
                    width,
                    height,
                })
            }),
        (-360.0f64..360.0, coordinate(), coordinate(), "[MLZ0-9 .]{0,24}").prop_map(
            |(rotation, x, y, outline)| {
                Module::PathLabel(PathLabelModule {
                    rotation,
                    x,
                    y,
                    outline,
                })
            }
        ),
    ]
}

proptest! {
    #[test]
    fn test_wire_round_trip(modules in prop::collection::vec(module(), 0..12)) {
        let placed: Vec<PlacedModule> = modules.into_iter().map(PlacedModule::new).collect();
        let json = to_json(&placed).unwrap();
        prop_assert_eq!(from_json(&json).unwrap(), placed.clone());
        prop_assert_eq!(decode_modules(&encode_modules(&placed)).unwrap(), placed);
    }
}

#[test]
fn test_engine_layout_round_trips_with_snapshots() {
    let mut engine = LayoutEngine::new(Configuration::default(), Arc::new(BlockOutlines)).unwrap();
    engine.add_slot_grid(&SlotGrid::dnd_5e(), 10.0, 90.0);
    engine.add_dial(150.0, 20.0);
    engine.add_label(0.0, 150.0, 80.0, "Luck", 8.0, true);

    let json = to_json(engine.modules()).unwrap();
    assert!(json.contains("\"editorData\""));
    assert!(json.contains("\"derivedVals\""));

    let decoded = from_json(&json).unwrap();
    assert_eq!(decoded.as_slice(), engine.modules());
}

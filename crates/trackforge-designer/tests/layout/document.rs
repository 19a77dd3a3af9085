use std::sync::Arc;

use trackforge_core::Configuration;
use trackforge_designer::layout::document::DocumentError;
use trackforge_designer::{LayoutDocument, LayoutEngine, LayoutIntent, Module};

use crate::common::BlockOutlines;

const BOARD: &str = r#"
[[modules]]
kind = "slotGrid"
ruleset = "dnd5e"
x = 10
y = 90

[[modules]]
kind = "dial"
x = 20
y = 20

[[modules]]
kind = "label"
text = "Inspiration"
x = 60
y = 30
fontSize = 6
"#;

#[test]
fn test_toml_document_replays_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.toml");
    std::fs::write(&path, BOARD).unwrap();

    let document = LayoutDocument::load_from_file(&path).unwrap();
    assert_eq!(document.modules.len(), 3);
    assert!(matches!(
        &document.modules[2],
        LayoutIntent::Label { font_size, .. } if *font_size == 6.0
    ));

    let mut engine = LayoutEngine::new(Configuration::default(), Arc::new(BlockOutlines)).unwrap();
    document.apply(&mut engine).unwrap();

    let modules = engine.modules();
    assert_eq!(modules.len(), 24 + 2);
    assert!(matches!(modules[24].module, Module::Dial(_)));
    assert!(matches!(&modules[25].module, Module::Label(l) if l.text == "Inspiration"));
}

#[test]
fn test_unknown_ruleset_is_rejected() {
    let document: LayoutDocument = serde_json::from_str(
        r#"{"modules": [{"kind": "slotGrid", "ruleset": "gurps", "x": 0, "y": 0}]}"#,
    )
    .unwrap();
    let mut engine = LayoutEngine::new(Configuration::default(), Arc::new(BlockOutlines)).unwrap();
    assert!(matches!(
        document.apply(&mut engine),
        Err(DocumentError::Grid(_))
    ));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.yaml");
    std::fs::write(&path, "modules: []").unwrap();
    assert!(matches!(
        LayoutDocument::load_from_file(&path),
        Err(DocumentError::UnsupportedFormat(_))
    ));
}

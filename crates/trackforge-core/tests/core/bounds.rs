use proptest::prelude::*;
use trackforge_core::BoundingBox;

fn extent() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-500.0f64..500.0, -500.0f64..500.0, 0.0f64..200.0, 0.0f64..200.0)
        .prop_map(|(x, y, w, h)| (x, y, x + w, y + h))
}

proptest! {
    #[test]
    fn test_check_extremes_is_monotone(extents in prop::collection::vec(extent(), 1..40)) {
        let mut bbox = BoundingBox::new();
        for (min_x, min_y, max_x, max_y) in extents.iter().copied() {
            let before = bbox;
            bbox.check_extremes(min_x, min_y, max_x, max_y);

            prop_assert!(bbox.min_x <= before.min_x);
            prop_assert!(bbox.min_y <= before.min_y);
            prop_assert!(bbox.max_x >= before.max_x);
            prop_assert!(bbox.max_y >= before.max_y);
        }

        for (min_x, min_y, max_x, max_y) in extents {
            prop_assert!(bbox.min_x <= min_x);
            prop_assert!(bbox.min_y <= min_y);
            prop_assert!(bbox.max_x >= max_x);
            prop_assert!(bbox.max_y >= max_y);
        }
    }
}

#[test]
fn test_expanded_margin() {
    let mut bbox = BoundingBox::new();
    bbox.check_extremes(20.0, 20.0, 141.8, 141.8);
    let slab = bbox.expanded(20.0);
    assert_eq!(slab.min_x, 0.0);
    assert_eq!(slab.min_y, 0.0);
    assert!((slab.width() - 161.8).abs() < 1e-9);
    assert!(slab.contains(&bbox));
}

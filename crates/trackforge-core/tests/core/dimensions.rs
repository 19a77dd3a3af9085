use proptest::prelude::*;
use trackforge_core::{ConfigError, Configuration, DerivedDimensions};

proptest! {
    #[test]
    fn test_clearance_invariant_holds(
        magnet_diameter in 0.5f64..20.0,
        magnet_height in 0.5f64..10.0,
        part_gap_width in 0.01f64..1.0,
        min_wall_width in 0.4f64..5.0,
        text_depth in 0.1f64..2.0,
    ) {
        let config = Configuration {
            magnet_diameter,
            magnet_height,
            part_gap_width,
            min_wall_width,
            text_depth,
            ..Configuration::default()
        };
        prop_assert!(config.validate().is_ok());

        let dims = DerivedDimensions::derive(&config);
        prop_assert!((dims.slider_knob_clearance() - 1.0).abs() < 1e-9);
        prop_assert_eq!(dims.segment_length, dims.knob_width);
        prop_assert!((dims.plate_width - 6.0 * dims.knob_width).abs() < 1e-9);
    }
}

#[test]
fn test_validated_dimensions_rejects_negative_wall() {
    let config = Configuration {
        min_wall_width: -1.5,
        ..Configuration::default()
    };
    assert!(matches!(
        config.validated_dimensions(),
        Err(ConfigError::NonPositive {
            field: "minWallWidth",
            ..
        })
    ));
}

#[test]
fn test_derive_tracks_magnet_size() {
    let small = DerivedDimensions::derive(&Configuration::default());
    let large = DerivedDimensions::derive(&Configuration::default().with_magnet(6.0, 2.0));
    assert!((large.knob_width - small.knob_width - 4.0).abs() < 1e-9);
    assert!((large.slider_radius - small.slider_radius - 2.0).abs() < 1e-9);
}

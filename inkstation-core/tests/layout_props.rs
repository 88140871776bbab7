//! Layout invariants over randomized panels, ratios and margins

use inkstation_core::config::{LayoutConfig, Margins};
use inkstation_core::layout::{compute, Layout, LayoutError, REGION_COUNT};
use proptest::prelude::*;

fn check_invariants(layout: &Layout) -> Result<(), TestCaseError> {
    let rects: Vec<_> = layout.iter().collect();
    prop_assert_eq!(rects.len(), REGION_COUNT);
    for (i, (name, a)) in rects.iter().enumerate() {
        prop_assert!(!a.is_empty(), "{} is empty", name);
        prop_assert!(
            layout.panel().contains_rect(a),
            "{} at {} leaves the panel",
            name,
            a
        );
        for (other, b) in &rects[i + 1..] {
            prop_assert!(!a.intersects(b), "{} overlaps {}", name, other);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_valid_layouts_are_disjoint_and_contained(
        width in 1u32..3000,
        height in 1u32..3000,
        split in 0.01f32..0.99,
        outer in 0u32..64,
        inter_cell in 0u32..32,
    ) {
        let margins = Margins { outer, inter_cell };
        match compute(width, height, split, margins) {
            Ok(layout) => check_invariants(&layout)?,
            Err(e) => prop_assert!(matches!(e, LayoutError::DegenerateRegion(_)), "{:?}", e),
        }
    }

    #[test]
    fn prop_reasonable_panels_always_fit(
        width in 200u32..2000,
        height in 200u32..2000,
        split in 0.2f32..0.8,
        outer in 0u32..20,
        inter_cell in 0u32..10,
    ) {
        let margins = Margins { outer, inter_cell };
        let layout = compute(width, height, split, margins);
        prop_assert!(layout.is_ok(), "{:?}", layout);
    }

    #[test]
    fn prop_compute_is_pure(
        width in 100u32..2000,
        height in 100u32..2000,
        split in 0.05f32..0.95,
        clock in 0.05f32..0.95,
        forecast in 0.05f32..0.95,
        outer in 0u32..16,
        inter_cell in 0u32..8,
    ) {
        let config = LayoutConfig {
            split_ratio: split,
            clock_ratio: clock,
            forecast_ratio: forecast,
            margins: Margins { outer, inter_cell },
            ..LayoutConfig::default()
        };
        // Interleave an unrelated computation to show no state carries over
        let first = Layout::compute(width, height, &config);
        let _ = Layout::compute(height, width, &LayoutConfig::default());
        let second = Layout::compute(width, height, &config);
        prop_assert_eq!(&first, &second);
        if let (Ok(a), Ok(b)) = (first, second) {
            prop_assert_eq!(a.fingerprint(), b.fingerprint());
            check_invariants(&a)?;
        }
    }

    #[test]
    fn prop_out_of_range_ratio_rejected(split in prop_oneof![-10.0f32..=0.0, 1.0f32..10.0]) {
        prop_assert_eq!(
            compute(800, 600, split, Margins::default()),
            Err(LayoutError::InvalidRatio("split_ratio"))
        );
    }
}

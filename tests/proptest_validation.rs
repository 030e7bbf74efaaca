use proptest::prelude::*;
use vocaug::ir::BBoxXYXY;
use vocaug::validation::{check_box, is_valid, IssueContext};

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn boxes_strictly_inside_are_valid(
        (width, height, bbox) in (2u32..=4096, 2u32..=4096)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), proptest_helpers::arb_bbox_within(w, h)))
    ) {
        prop_assert!(is_valid(&bbox, height, width));
        prop_assert!(check_box(&bbox, height, width, IssueContext::Image).is_empty());
    }

    #[test]
    fn touching_right_edge_is_invalid(
        (width, height, bbox) in (2u32..=4096, 2u32..=4096)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), proptest_helpers::arb_bbox_within(w, h)))
    ) {
        let touching = BBoxXYXY::from_xyxy(bbox.xmin(), bbox.ymin(), width as f64, bbox.ymax());
        prop_assert!(!is_valid(&touching, height, width));
    }

    #[test]
    fn touching_bottom_edge_is_invalid(
        (width, height, bbox) in (2u32..=4096, 2u32..=4096)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), proptest_helpers::arb_bbox_within(w, h)))
    ) {
        let touching = BBoxXYXY::from_xyxy(bbox.xmin(), bbox.ymin(), bbox.xmax(), height as f64);
        prop_assert!(!is_valid(&touching, height, width));
    }

    #[test]
    fn inverted_or_degenerate_boxes_are_invalid(
        (width, height, bbox) in (2u32..=4096, 2u32..=4096)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), proptest_helpers::arb_bbox_within(w, h)))
    ) {
        let flipped_x = BBoxXYXY::from_xyxy(bbox.xmax(), bbox.ymin(), bbox.xmin(), bbox.ymax());
        let flat_y = BBoxXYXY::from_xyxy(bbox.xmin(), bbox.ymin(), bbox.xmax(), bbox.ymin());
        prop_assert!(!is_valid(&flipped_x, height, width));
        prop_assert!(!is_valid(&flat_y, height, width));
    }

    #[test]
    fn is_valid_agrees_with_check_box(
        xmin in -50.0f64..150.0,
        ymin in -50.0f64..150.0,
        xmax in -50.0f64..150.0,
        ymax in -50.0f64..150.0,
    ) {
        let bbox = BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax);
        let issues = check_box(&bbox, 100, 100, IssueContext::Image);
        prop_assert_eq!(is_valid(&bbox, 100, 100), issues.is_empty());
    }
}

#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use vocaug::ir::{BBoxXYXY, LabeledBox, Pixel};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// An image size and boxes strictly inside it: `(height, width, boxes)`.
#[derive(Clone, Debug)]
pub struct Scene {
    pub height: u32,
    pub width: u32,
    pub boxes: Vec<LabeledBox>,
}

/// Integer-valued boxes that pass bounds validation.
pub fn arb_scene(max_boxes: usize) -> BoxedStrategy<Scene> {
    (2u32..=4096, 2u32..=4096, 0usize..=max_boxes)
        .prop_flat_map(|(height, width, count)| {
            proptest::collection::vec((box_seed_strategy(), label_strategy()), count..=count)
                .prop_map(move |seeds| Scene {
                    height,
                    width,
                    boxes: seeds
                        .into_iter()
                        .map(|(seed, label)| {
                            LabeledBox::new(bbox_from_seed(width, height, seed), label)
                        })
                        .collect(),
                })
        })
        .boxed()
}

/// Like [`arb_scene`] but with a fractional part in `[0, 1)` added to every
/// coordinate, so truncation gives back the integer scene.
pub fn arb_fractional_scene(max_boxes: usize) -> BoxedStrategy<(Scene, Scene)> {
    arb_scene(max_boxes)
        .prop_flat_map(|scene| {
            let count = scene.boxes.len();
            proptest::collection::vec(
                (0u16..1000, 0u16..1000, 0u16..1000, 0u16..1000),
                count..=count,
            )
            .prop_map(move |fractions| {
                let mut fractional = scene.clone();
                for (labeled, (fx0, fy0, fx1, fy1)) in fractional.boxes.iter_mut().zip(fractions) {
                    let b = labeled.bbox;
                    labeled.bbox = BBoxXYXY::from_xyxy(
                        b.xmin() + fx0 as f64 / 1000.0,
                        b.ymin() + fy0 as f64 / 1000.0,
                        b.xmax() + fx1 as f64 / 1000.0,
                        b.ymax() + fy1 as f64 / 1000.0,
                    );
                }
                (scene.clone(), fractional)
            })
        })
        .boxed()
}

/// A box strictly inside a `width` x `height` image.
pub fn arb_bbox_within(width: u32, height: u32) -> BoxedStrategy<BBoxXYXY<Pixel>> {
    box_seed_strategy()
        .prop_map(move |seed| bbox_from_seed(width, height, seed))
        .boxed()
}

pub fn label_strategy() -> BoxedStrategy<String> {
    proptest::string::string_regex("[a-z]{1,20}")
        .expect("valid label regex")
        .boxed()
}

type BoxSeed = (u32, u32, u32, u32);

fn box_seed_strategy() -> impl Strategy<Value = BoxSeed> {
    (any::<u32>(), any::<u32>(), any::<u32>(), any::<u32>())
}

/// Maps a seed to `0 <= xmin < xmax <= width - 1` (same for y).
fn bbox_from_seed(width: u32, height: u32, seed: BoxSeed) -> BBoxXYXY<Pixel> {
    let (sx, sy, sw, sh) = seed;
    let xmin = sx % (width - 1);
    let ymin = sy % (height - 1);
    let xmax = xmin + 1 + (sw % (width - 1 - xmin));
    let ymax = ymin + 1 + (sh % (height - 1 - ymin));

    BBoxXYXY::from_xyxy(xmin as f64, ymin as f64, xmax as f64, ymax as f64)
}

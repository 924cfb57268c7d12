//! Property tests for pipeline invariants.

use proptest::prelude::*;

use pdftag::{
    pipeline, JsonFormat, PageDetections, PageInfo, RawDetection, TagNode, TagOptions, Tagger,
};

fn page_detections(detections: Vec<RawDetection>) -> PageDetections {
    PageDetections {
        page: 0,
        width: 612.0,
        height: 792.0,
        detections,
    }
}

fn dump_json(detections: Vec<RawDetection>) -> Vec<u8> {
    serde_json::to_vec(&vec![page_detections(detections)]).unwrap()
}

/// A stack of full-width rows, one detection each; no two overlap.
fn row_detections() -> Vec<RawDetection> {
    let labels = [
        "Title",
        "Text",
        "Section-header",
        "Text",
        "Picture",
        "Text",
        "Footnote",
        "Text",
    ];
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let top = 50.0 + i as f32 * 80.0;
            RawDetection::new([50.0, top, 560.0, top + 60.0], *label, 0.9)
        })
        .collect()
}

fn assert_within(node: &TagNode, width: f32, height: f32) {
    node.walk(&mut |n| {
        assert!(n.bbox.left >= 0.0 && n.bbox.top >= 0.0);
        assert!(n.bbox.right <= width && n.bbox.bottom <= height);
    });
}

proptest! {
    /// The template is identical for any input permutation of the same
    /// detections (merged sources aside, which the template omits).
    #[test]
    fn template_independent_of_detection_order(
        detections in Just(row_detections()).prop_shuffle()
    ) {
        let baseline = Tagger::new()
            .with_zoom(1.0)
            .sequential()
            .tag_dump_bytes(&dump_json(row_detections()))
            .unwrap()
            .to_template_json(JsonFormat::Compact)
            .unwrap();

        let shuffled = Tagger::new()
            .with_zoom(1.0)
            .sequential()
            .tag_dump_bytes(&dump_json(detections))
            .unwrap()
            .to_template_json(JsonFormat::Compact)
            .unwrap();

        prop_assert_eq!(baseline, shuffled);
    }

    /// Non-overlapping detections are never dropped above the threshold,
    /// and a page with only low scores keeps exactly its best detection.
    #[test]
    fn threshold_keeps_expected_count(
        scores in prop::collection::vec(0.0f32..=1.0, 1..12)
    ) {
        let detections: Vec<RawDetection> = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let top = 10.0 + i as f32 * 60.0;
                RawDetection::new([50.0, top, 560.0, top + 40.0], "Text", score)
            })
            .collect();

        let surviving = scores.iter().filter(|&&s| s >= 0.3).count().max(1);

        let page = PageInfo::letter(0);
        let options = TagOptions::new().with_zoom(1.0).sequential();
        let tagged = pipeline::process_page(&page, &detections, &options);
        prop_assert_eq!(tagged.tag_count(), surviving);
    }

    /// Whatever the detector reports, every produced box lies inside the
    /// page and every source ordinal appears at most once.
    #[test]
    fn output_boxes_stay_on_page(
        coords in prop::collection::vec(
            (-1000.0f32..2000.0, -1000.0f32..2000.0, 1.0f32..900.0, 1.0f32..900.0),
            0..10
        )
    ) {
        let detections: Vec<RawDetection> = coords
            .iter()
            .map(|&(left, top, w, h)| {
                RawDetection::new([left, top, left + w, top + h], "Text", 0.9)
            })
            .collect();

        let page = PageInfo::letter(0);
        let options = TagOptions::new().with_zoom(1.0).sequential();
        let tagged = pipeline::process_page(&page, &detections, &options);

        assert_within(&tagged.root, page.width, page.height);

        let mut sources = tagged.root.all_sources();
        sources.sort_unstable();
        let before = sources.len();
        sources.dedup();
        prop_assert_eq!(before, sources.len());
    }
}

//! Confidence filtering.

use crate::model::{PageLayout, Region};

/// Drop regions whose score falls below the threshold.
///
/// A page must never be left entirely untagged when the detector saw
/// something: if nothing survives, the single highest-confidence region is
/// kept regardless of the threshold (ties broken by lowest ordinal, so the
/// pick is deterministic). Order is preserved; this stage never reorders.
pub fn filter_regions(layout: PageLayout, threshold: f32) -> PageLayout {
    let PageLayout { info, regions } = layout;
    if regions.is_empty() {
        return PageLayout::new(info, regions);
    }

    let kept: Vec<Region> = regions
        .iter()
        .filter(|r| r.score >= threshold)
        .cloned()
        .collect();

    if !kept.is_empty() {
        return PageLayout::new(info, kept);
    }

    let Some(best) = regions
        .iter()
        .max_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then(b.id.cmp(&a.id))
        })
        .cloned()
    else {
        return PageLayout::new(info, regions);
    };

    log::warn!(
        "page {}: all {} detections below threshold {:.2}, keeping best ({:?} at {:.2})",
        best.page_index,
        regions.len(),
        threshold,
        best.class,
        best.score
    );

    PageLayout::new(info, vec![best])
}

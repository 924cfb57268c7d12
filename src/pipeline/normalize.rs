//! Detection normalization: pixel space to page coordinate space.

use crate::detector::RawDetection;
use crate::error::Error;
use crate::model::{BBox, PageInfo, PageLayout, Region, RegionClass, GEOM_EPSILON};

/// Convert raw detector output for one page into a layout in page points.
///
/// The rendered image is `zoom` times the page size, so every pixel
/// coordinate is divided by `zoom`. Boxes that land slightly outside the
/// page (rendering and DPI rounding) are clamped silently; boxes further
/// out are still clamped but logged, and boxes that are non-finite or
/// degenerate after clamping are dropped.
pub fn normalize_detections(raw: &[RawDetection], page: &PageInfo, zoom: f32) -> PageLayout {
    let mut regions = Vec::with_capacity(raw.len());

    for (ordinal, detection) in raw.iter().enumerate() {
        let [l, t, r, b] = detection.bbox;
        let bbox = BBox::new(l / zoom, t / zoom, r / zoom, b / zoom);

        if !bbox.is_valid() {
            let err = Error::InvalidDetection(format!(
                "detection {} has a malformed box {:?}",
                ordinal, detection.bbox
            ));
            log::warn!("page {}: {}, dropping", page.index, err);
            continue;
        }

        let excess = bbox.out_of_bounds_by(page.width, page.height);
        if excess > GEOM_EPSILON {
            log::warn!(
                "page {}: detection {} extends {:.1}pt past the page, clamping",
                page.index,
                ordinal,
                excess
            );
        }

        let clamped = bbox.clamp_to(page.width, page.height);
        if !clamped.is_valid() {
            let err = Error::InvalidDetection(format!(
                "detection {} lies entirely outside the page",
                ordinal
            ));
            log::warn!("page {}: {}, dropping", page.index, err);
            continue;
        }

        let class = RegionClass::from_label(&detection.label);
        if class == RegionClass::Other {
            log::debug!(
                "page {}: unrecognized label {:?}, keeping as Other",
                page.index,
                detection.label
            );
        }

        regions.push(Region::new(
            ordinal,
            page.index,
            clamped,
            class,
            detection.score.clamp(0.0, 1.0),
        ));
    }

    PageLayout::new(*page, regions)
}

//! The detection-to-tag pipeline.
//!
//! Stages run strictly forward per page: normalize, filter, merge,
//! sequence, build hierarchy. Pages are independent of each other, so the
//! per-page work is mapped in parallel with rayon and the document is
//! reassembled by page index afterwards, never by completion order.

mod assemble;
mod filter;
mod hierarchy;
mod merge;
mod normalize;
mod options;
mod sequence;

pub use assemble::assemble_document;
pub use filter::filter_regions;
pub use hierarchy::{build_hierarchy, flat_tree};
pub use merge::merge_regions;
pub use normalize::normalize_detections;
pub use options::TagOptions;
pub use sequence::{order_regions, order_row_major};

use rayon::prelude::*;

use crate::detector::{LayoutDetector, RawDetection};
use crate::error::Result;
use crate::model::{PageInfo, TaggedDocument, TaggedPage};

/// Run the per-page stages on raw detector output.
///
/// This never fails: invalid detections are clamped or dropped during
/// normalization, an empty page yields a root with zero children, and a
/// structurally inconsistent hierarchy degrades to a flat tree.
pub fn process_page(page: &PageInfo, raw: &[RawDetection], options: &TagOptions) -> TaggedPage {
    let layout = normalize_detections(raw, page, options.zoom);
    let layout = filter_regions(layout, options.threshold);
    let layout = merge_regions(layout, options.merge_iou);
    let layout = order_regions(layout);

    let root = match build_hierarchy(&layout) {
        Ok(root) => root,
        Err(err) => {
            log::warn!(
                "page {}: {}, falling back to flat structure",
                page.index,
                err
            );
            flat_tree(&layout)
        }
    };

    TaggedPage::new(layout.info, root)
}

/// Process a whole document: detect every page, run the per-page stages,
/// and assemble the result in page order.
///
/// A detector failure on any page fails the whole document; per-page
/// structural problems never do.
pub fn process_document<D: LayoutDetector>(
    pages: &[PageInfo],
    detector: &D,
    options: &TagOptions,
) -> Result<TaggedDocument> {
    options.validate()?;

    let detect_and_process = |page: &PageInfo| -> Result<TaggedPage> {
        let raw = detector.detect(page, options.zoom)?;
        log::debug!("page {}: {} raw detections", page.index, raw.len());
        Ok(process_page(page, &raw, options))
    };

    let tagged: Vec<TaggedPage> = if options.parallel {
        pages
            .par_iter()
            .map(detect_and_process)
            .collect::<Result<_>>()?
    } else {
        pages
            .iter()
            .map(detect_and_process)
            .collect::<Result<_>>()?
    };

    Ok(assemble_document(tagged))
}

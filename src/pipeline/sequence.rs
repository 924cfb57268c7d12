//! Reading-order sequencing.
//!
//! Body regions are grouped into columns by transitive horizontal-range
//! overlap: two regions whose x-ranges share ground belong to the same
//! column band, and the bands are read left to right, top to bottom within
//! each band. Page headers always come first and page footers always come
//! last, wherever the detector placed them.

use std::cmp::Ordering;

use crate::model::{PageLayout, Region};

/// Assign a total reading order to the regions of one page.
///
/// The sort keys form a total order (coordinates, class, score, ordinal),
/// so the output is identical for any permutation of the input, and no
/// region is ever dropped.
pub fn order_regions(layout: PageLayout) -> PageLayout {
    let mut headers = Vec::new();
    let mut body = Vec::new();
    let mut footers = Vec::new();

    for region in layout.regions {
        if region.class.is_header() {
            headers.push(region);
        } else if region.class.is_footer() {
            footers.push(region);
        } else {
            body.push(region);
        }
    }

    headers.sort_by(top_left_order);
    footers.sort_by(top_left_order);

    let mut ordered = headers;
    ordered.extend(order_columns(body));
    ordered.extend(footers);
    PageLayout::new(layout.info, ordered)
}

/// Cluster body regions into columns and flatten them in reading order.
fn order_columns(body: Vec<Region>) -> Vec<Region> {
    if body.len() < 2 {
        return body;
    }

    // Transitive closure of x-range overlap. Pages are small; the quadratic
    // sweep is fine.
    let mut column_of: Vec<usize> = (0..body.len()).collect();
    for i in 0..body.len() {
        for j in (i + 1)..body.len() {
            if body[i].bbox.x_overlaps(&body[j].bbox) {
                let (a, b) = (column_of[i], column_of[j]);
                if a != b {
                    let target = a.min(b);
                    let from = a.max(b);
                    for slot in column_of.iter_mut() {
                        if *slot == from {
                            *slot = target;
                        }
                    }
                }
            }
        }
    }

    let mut columns: Vec<Vec<Region>> = Vec::new();
    let mut labels: Vec<usize> = Vec::new();
    for (region, label) in body.into_iter().zip(column_of) {
        match labels.iter().position(|&l| l == label) {
            Some(idx) => columns[idx].push(region),
            None => {
                labels.push(label);
                columns.push(vec![region]);
            }
        }
    }

    log::debug!("detected {} column band(s)", columns.len());

    // Columns left to right by their leftmost member.
    columns.sort_by(|a, b| {
        let left_a = a.iter().map(|r| r.bbox.left).fold(f32::INFINITY, f32::min);
        let left_b = b.iter().map(|r| r.bbox.left).fold(f32::INFINITY, f32::min);
        left_a.total_cmp(&left_b)
    });

    let mut ordered = Vec::new();
    for mut column in columns {
        column.sort_by(top_left_order);
        ordered.extend(column);
    }
    ordered
}

/// Order regions row-major: top to bottom, left to right, no column
/// detection. This is how cells inside a table box are read.
pub fn order_row_major(mut regions: Vec<Region>) -> Vec<Region> {
    regions.sort_by(top_left_order);
    regions
}

/// Top-to-bottom, then left-to-right, with full tie-breaks for stability.
fn top_left_order(a: &Region, b: &Region) -> Ordering {
    a.bbox
        .top
        .total_cmp(&b.bbox.top)
        .then(a.bbox.left.total_cmp(&b.bbox.left))
        .then(a.bbox.bottom.total_cmp(&b.bbox.bottom))
        .then(a.bbox.right.total_cmp(&b.bbox.right))
        .then(a.class.cmp(&b.class))
        .then(b.score.total_cmp(&a.score))
        .then(a.id.cmp(&b.id))
}

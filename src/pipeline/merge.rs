//! Duplicate-detection merging.
//!
//! Detectors routinely report the same element twice with slightly shifted
//! boxes. Candidate pairs (same class, high IoU or near-total containment)
//! are clustered with a disjoint set over region indices; each cluster then
//! reduces to a single region. Clustering the whole page at once keeps the
//! result independent of input order, unlike a greedy merge-while-iterating
//! pass.

use crate::model::{PageLayout, Region};

/// Containment fraction above which two same-class boxes are considered
/// one element even when their IoU is low (a small box swallowed by a
/// bigger one).
const CONTAINMENT_THRESHOLD: f32 = 0.9;

/// Disjoint-set forest over region indices.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Check whether two regions are duplicate detections of one element.
fn should_merge(a: &Region, b: &Region, merge_iou: f32) -> bool {
    // Different classes are never merged; cross-class consolidation is a
    // structural concern handled by the hierarchy builder.
    if a.class != b.class {
        return false;
    }
    a.bbox.iou(&b.bbox) > merge_iou || a.bbox.containment(&b.bbox) >= CONTAINMENT_THRESHOLD
}

/// Reduce one cluster of duplicate regions to a single region.
///
/// The box is the union of all members, the score is the maximum, and the
/// class comes from the highest-confidence member (ties by lowest ordinal).
fn reduce_cluster(mut members: Vec<Region>) -> Region {
    members.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));

    let mut merged = members[0].clone();
    for member in &members[1..] {
        merged.bbox = merged.bbox.union(&member.bbox);
        merged.sources.extend_from_slice(&member.sources);
    }
    merged.sources.sort_unstable();
    merged.sources.dedup();
    merged.id = merged.sources[0];
    merged
}

/// Merge duplicate detections on one page.
///
/// The output is canonically ordered (top, left, then class and score), so
/// any permutation of the input produces the identical region list. A merge
/// can produce a union box that newly satisfies the containment predicate
/// against a region that matched neither member alone, so the pass repeats
/// until it finds no more unions. The result is a fixpoint: running the
/// merger on its own output yields no further merges.
pub fn merge_regions(layout: PageLayout, merge_iou: f32) -> PageLayout {
    let PageLayout { info, mut regions } = layout;

    // Every merging pass shrinks the region list by at least one, so the
    // loop runs at most regions.len() times.
    loop {
        let before = regions.len();
        regions = merge_pass(regions, merge_iou);
        if regions.len() == before {
            return PageLayout::new(info, regions);
        }
    }
}

/// One cluster-and-reduce pass over the region list.
fn merge_pass(mut regions: Vec<Region>, merge_iou: f32) -> Vec<Region> {
    if regions.len() < 2 {
        return regions;
    }

    // Index into the disjoint set by position after a canonical sort, so
    // cluster shapes cannot depend on input order.
    regions.sort_by(canonical_order);

    let mut set = DisjointSet::new(regions.len());
    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            if should_merge(&regions[i], &regions[j], merge_iou) {
                log::debug!(
                    "page {}: merging {:?} (score {:.2}) with {:?} (score {:.2})",
                    regions[i].page_index,
                    regions[i].class,
                    regions[i].score,
                    regions[j].class,
                    regions[j].score
                );
                set.union(i, j);
            }
        }
    }

    let mut clusters: Vec<Vec<Region>> = vec![Vec::new(); regions.len()];
    for (i, region) in regions.into_iter().enumerate() {
        let root = set.find(i);
        clusters[root].push(region);
    }

    let mut merged: Vec<Region> = clusters
        .into_iter()
        .filter(|c| !c.is_empty())
        .map(reduce_cluster)
        .collect();

    merged.sort_by(canonical_order);
    merged
}

/// Total order over regions used to canonicalize stage output.
fn canonical_order(a: &Region, b: &Region) -> std::cmp::Ordering {
    a.bbox
        .top
        .total_cmp(&b.bbox.top)
        .then(a.bbox.left.total_cmp(&b.bbox.left))
        .then(a.bbox.right.total_cmp(&b.bbox.right))
        .then(a.bbox.bottom.total_cmp(&b.bbox.bottom))
        .then(a.class.cmp(&b.class))
        .then(b.score.total_cmp(&a.score))
        .then(a.id.cmp(&b.id))
}

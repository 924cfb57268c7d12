//! Hierarchy building: flat ordered regions into a nested tag tree.
//!
//! Grouping rules, first match wins:
//! 1. runs of consecutive ListItem regions are wrapped in a synthesized
//!    List node;
//! 2. TableCell regions attach to the table that contains them, re-ordered
//!    row-major within the table box (cells with no enclosing table stay at
//!    the root);
//! 3. a Caption adjacent in reading order to a Figure or Table becomes its
//!    child;
//! 4. everything else is a direct child of the page root.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{BBox, PageInfo, PageLayout, Region, RegionClass, TagNode};

use super::sequence::order_row_major;

/// Fraction of a cell's area that must fall inside a table box for the
/// cell to be adopted by that table.
const CELL_CONTAINMENT: f32 = 0.5;

/// Build the nested tag tree for one page from sequenced regions.
///
/// Fails with [`Error::StructuralInconsistency`] when the resulting tree
/// would have overlapping siblings; the caller degrades to [`flat_tree`]
/// in that case.
pub fn build_hierarchy(layout: &PageLayout) -> Result<TagNode> {
    let ordered = &layout.regions;
    let cell_owner = assign_cells(ordered);

    // Cells grouped per owning table, re-sequenced inside the table box.
    let mut table_cells: BTreeMap<usize, Vec<Region>> = BTreeMap::new();
    for (cell_idx, table_idx) in &cell_owner {
        table_cells
            .entry(*table_idx)
            .or_default()
            .push(ordered[*cell_idx].clone());
    }

    let mut root = page_root(&layout.info);
    let mut list_run: Vec<TagNode> = Vec::new();
    let mut pending_caption: Option<TagNode> = None;

    for (idx, region) in ordered.iter().enumerate() {
        // Adopted cells are emitted with their table, not at the root.
        if cell_owner.contains_key(&idx) {
            continue;
        }

        if region.class != RegionClass::ListItem && !list_run.is_empty() {
            root.adopt(TagNode::composite(
                RegionClass::List,
                std::mem::take(&mut list_run),
            ));
        }

        match region.class {
            RegionClass::ListItem => {
                list_run.push(TagNode::leaf(region));
            }
            RegionClass::Caption => {
                // Prefer the node just emitted; otherwise wait for the next
                // region in reading order.
                if let Some(prev) = root.children.last_mut() {
                    if matches!(prev.class, RegionClass::Figure | RegionClass::Table) {
                        prev.adopt(TagNode::leaf(region));
                        continue;
                    }
                }
                let next_is_anchor = ordered[idx + 1..]
                    .iter()
                    .find(|r| r.class != RegionClass::TableCell)
                    .is_some_and(|r| {
                        matches!(r.class, RegionClass::Figure | RegionClass::Table)
                    });
                if next_is_anchor {
                    pending_caption = Some(TagNode::leaf(region));
                } else {
                    root.adopt(TagNode::leaf(region));
                }
            }
            RegionClass::Table => {
                let mut table = TagNode::leaf(region);
                if let Some(cells) = table_cells.remove(&idx) {
                    for cell in order_row_major(cells) {
                        table.adopt(TagNode::leaf(&cell));
                    }
                }
                if let Some(caption) = pending_caption.take() {
                    table.adopt(caption);
                }
                root.adopt(table);
            }
            RegionClass::Figure => {
                let mut figure = TagNode::leaf(region);
                if let Some(caption) = pending_caption.take() {
                    figure.adopt(caption);
                }
                root.adopt(figure);
            }
            _ => {
                root.adopt(TagNode::leaf(region));
            }
        }
    }

    if !list_run.is_empty() {
        root.adopt(TagNode::composite(RegionClass::List, list_run));
    }
    if let Some(caption) = pending_caption.take() {
        root.adopt(caption);
    }

    check_sibling_overlap(&root)?;
    Ok(root)
}

/// Build a flat tree: every region a direct child of the page root.
///
/// Fallback shape when the nested tree violates its invariants; also the
/// shape of an empty page (root with zero children).
pub fn flat_tree(layout: &PageLayout) -> TagNode {
    let mut root = page_root(&layout.info);
    for region in &layout.regions {
        root.children.push(TagNode::leaf(region));
    }
    root
}

/// Synthetic page root covering the page box.
fn page_root(page: &PageInfo) -> TagNode {
    TagNode {
        id: String::new(),
        class: RegionClass::Other,
        bbox: BBox::new(0.0, 0.0, page.width, page.height),
        children: Vec::new(),
        sources: Vec::new(),
    }
}

/// Map each TableCell index to the table index that contains it best.
fn assign_cells(ordered: &[Region]) -> BTreeMap<usize, usize> {
    let tables: Vec<usize> = ordered
        .iter()
        .enumerate()
        .filter(|(_, r)| r.class == RegionClass::Table)
        .map(|(i, _)| i)
        .collect();

    let mut owner = BTreeMap::new();
    if tables.is_empty() {
        return owner;
    }

    for (idx, region) in ordered.iter().enumerate() {
        if region.class != RegionClass::TableCell {
            continue;
        }
        let cell_area = region.bbox.area();
        if cell_area <= 0.0 {
            continue;
        }
        let best = tables
            .iter()
            .map(|&t| {
                (
                    t,
                    ordered[t].bbox.intersection_area(&region.bbox) / cell_area,
                )
            })
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)));
        if let Some((table_idx, fraction)) = best {
            if fraction >= CELL_CONTAINMENT {
                owner.insert(idx, table_idx);
            }
        }
    }
    owner
}

/// Verify that no two siblings anywhere in the tree overlap beyond the
/// geometric tolerance.
fn check_sibling_overlap(node: &TagNode) -> Result<()> {
    for (i, a) in node.children.iter().enumerate() {
        for b in &node.children[i + 1..] {
            if a.bbox.overlaps(&b.bbox) {
                return Err(Error::StructuralInconsistency(format!(
                    "sibling {:?} and {:?} overlap ({:?} vs {:?})",
                    a.class, b.class, a.bbox, b.bbox
                )));
            }
        }
    }
    for child in &node.children {
        check_sibling_overlap(child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: usize, bbox: BBox, class: RegionClass) -> Region {
        Region::new(id, 0, bbox, class, 0.9)
    }

    fn layout(regions: Vec<Region>) -> PageLayout {
        PageLayout::new(PageInfo::letter(0), regions)
    }

    #[test]
    fn test_list_items_wrapped() {
        let ordered = vec![
            region(0, BBox::new(10.0, 10.0, 500.0, 30.0), RegionClass::Heading),
            region(1, BBox::new(20.0, 40.0, 500.0, 60.0), RegionClass::ListItem),
            region(2, BBox::new(20.0, 65.0, 500.0, 85.0), RegionClass::ListItem),
            region(3, BBox::new(10.0, 100.0, 500.0, 140.0), RegionClass::Paragraph),
        ];
        let root = build_hierarchy(&layout(ordered)).unwrap();

        assert_eq!(root.children.len(), 3);
        let list = &root.children[1];
        assert_eq!(list.class, RegionClass::List);
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.bbox, BBox::new(20.0, 40.0, 500.0, 85.0));
    }

    #[test]
    fn test_trailing_list_run_flushed() {
        let ordered = vec![
            region(0, BBox::new(20.0, 40.0, 500.0, 60.0), RegionClass::ListItem),
            region(1, BBox::new(20.0, 65.0, 500.0, 85.0), RegionClass::ListItem),
        ];
        let root = build_hierarchy(&layout(ordered)).unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].class, RegionClass::List);
    }

    #[test]
    fn test_cells_adopted_by_table() {
        let ordered = vec![
            region(0, BBox::new(50.0, 50.0, 400.0, 200.0), RegionClass::Table),
            region(1, BBox::new(60.0, 60.0, 200.0, 100.0), RegionClass::TableCell),
            region(2, BBox::new(210.0, 60.0, 390.0, 100.0), RegionClass::TableCell),
            region(3, BBox::new(60.0, 110.0, 200.0, 190.0), RegionClass::TableCell),
        ];
        let root = build_hierarchy(&layout(ordered)).unwrap();

        assert_eq!(root.children.len(), 1);
        let table = &root.children[0];
        assert_eq!(table.class, RegionClass::Table);
        assert_eq!(table.children.len(), 3);
        // Row-major: top row left to right, then second row.
        assert_eq!(table.children[0].sources, vec![1]);
        assert_eq!(table.children[1].sources, vec![2]);
        assert_eq!(table.children[2].sources, vec![3]);
    }

    #[test]
    fn test_orphan_cell_stays_at_root() {
        let ordered = vec![region(
            0,
            BBox::new(60.0, 60.0, 200.0, 100.0),
            RegionClass::TableCell,
        )];
        let root = build_hierarchy(&layout(ordered)).unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].class, RegionClass::TableCell);
    }

    #[test]
    fn test_caption_attaches_to_preceding_figure() {
        let ordered = vec![
            region(0, BBox::new(100.0, 100.0, 400.0, 300.0), RegionClass::Figure),
            region(1, BBox::new(120.0, 305.0, 380.0, 320.0), RegionClass::Caption),
        ];
        let root = build_hierarchy(&layout(ordered)).unwrap();
        assert_eq!(root.children.len(), 1);
        let figure = &root.children[0];
        assert_eq!(figure.children.len(), 1);
        assert_eq!(figure.children[0].class, RegionClass::Caption);
        // Figure box grew to contain the caption.
        assert!(figure.bbox.contains(&figure.children[0].bbox));
    }

    #[test]
    fn test_caption_attaches_to_following_table() {
        let ordered = vec![
            region(0, BBox::new(120.0, 80.0, 380.0, 95.0), RegionClass::Caption),
            region(1, BBox::new(100.0, 100.0, 400.0, 300.0), RegionClass::Table),
        ];
        let root = build_hierarchy(&layout(ordered)).unwrap();
        assert_eq!(root.children.len(), 1);
        let table = &root.children[0];
        assert_eq!(table.class, RegionClass::Table);
        assert_eq!(table.children.len(), 1);
        assert_eq!(table.children[0].class, RegionClass::Caption);
    }

    #[test]
    fn test_lone_caption_stays_at_root() {
        let ordered = vec![
            region(0, BBox::new(10.0, 10.0, 500.0, 40.0), RegionClass::Paragraph),
            region(1, BBox::new(120.0, 80.0, 380.0, 95.0), RegionClass::Caption),
        ];
        let root = build_hierarchy(&layout(ordered)).unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].class, RegionClass::Caption);
    }

    #[test]
    fn test_overlapping_siblings_rejected() {
        let ordered = vec![
            region(0, BBox::new(10.0, 10.0, 300.0, 200.0), RegionClass::Paragraph),
            region(1, BBox::new(100.0, 100.0, 400.0, 300.0), RegionClass::Figure),
        ];
        let result = build_hierarchy(&layout(ordered));
        assert!(matches!(result, Err(Error::StructuralInconsistency(_))));
    }

    #[test]
    fn test_flat_tree_keeps_everything() {
        let ordered = vec![
            region(0, BBox::new(10.0, 10.0, 300.0, 200.0), RegionClass::Paragraph),
            region(1, BBox::new(100.0, 100.0, 400.0, 300.0), RegionClass::Figure),
        ];
        let root = flat_tree(&layout(ordered));
        assert_eq!(root.children.len(), 2);
        assert!(root.children.iter().all(|c| c.is_leaf()));
    }

    #[test]
    fn test_empty_page_root() {
        let root = build_hierarchy(&layout(Vec::new())).unwrap();
        assert!(root.children.is_empty());
        assert_eq!(root.bbox, BBox::new(0.0, 0.0, 612.0, 792.0));
    }
}

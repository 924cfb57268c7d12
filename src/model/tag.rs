//! The output tag tree.

use super::{BBox, Region, RegionClass};
use serde::{Deserialize, Serialize};

/// A node in the structural tag tree.
///
/// Children are stored in reading order. A composite node's bounding box is
/// the union of its own region box and all of its descendants, so a parent
/// always contains its children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagNode {
    /// Document-unique identifier, assigned by the assembler
    /// (`p{page}-{ordinal}`, depth-first). Empty until assembly.
    #[serde(default)]
    pub id: String,

    /// Structural class of the node
    pub class: RegionClass,

    /// Bounding box in page points
    pub bbox: BBox,

    /// Child nodes in reading order
    pub children: Vec<TagNode>,

    /// Raw-detection ordinals this node traces back to. Empty for
    /// synthesized nodes (page roots, List wrappers).
    pub sources: Vec<usize>,
}

impl TagNode {
    /// Create a leaf node from a region.
    pub fn leaf(region: &Region) -> Self {
        Self {
            id: String::new(),
            class: region.class,
            bbox: region.bbox,
            children: Vec::new(),
            sources: region.sources.clone(),
        }
    }

    /// Create a synthesized node wrapping the given children.
    ///
    /// The bounding box is the union of the children's boxes.
    pub fn composite(class: RegionClass, children: Vec<TagNode>) -> Self {
        let bbox = children
            .iter()
            .map(|c| c.bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0));
        Self {
            id: String::new(),
            class,
            bbox,
            children,
            sources: Vec::new(),
        }
    }

    /// Adopt a child node, growing this node's box to keep containment.
    pub fn adopt(&mut self, child: TagNode) {
        self.bbox = self.bbox.union(&child.bbox);
        self.children.push(child);
    }

    /// Check if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// Visit every node in the subtree, depth-first, in reading order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TagNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Collect all raw-detection ordinals referenced in this subtree.
    pub fn all_sources(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.walk(&mut |node| out.extend_from_slice(&node.sources));
        out
    }
}

//! Detected layout regions and their geometry.

use serde::{Deserialize, Serialize};

/// Tolerance in points for clamping and overlap checks.
///
/// Image rendering and zoom division introduce sub-point rounding; anything
/// within this distance of a boundary is treated as touching it.
pub const GEOM_EPSILON: f32 = 0.5;

/// An axis-aligned bounding box in page coordinates (points).
///
/// The origin is the top-left corner of the page, so `top < bottom` for any
/// non-degenerate box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Area of the box (0 for degenerate boxes).
    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Check that the box has positive extent and finite coordinates.
    pub fn is_valid(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
            && self.left < self.right
            && self.top < self.bottom
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Area of the intersection of `self` and `other` (0 if disjoint).
    pub fn intersection_area(&self, other: &BBox) -> f32 {
        let x_overlap = (self.right.min(other.right) - self.left.max(other.left)).max(0.0);
        let y_overlap = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0);
        x_overlap * y_overlap
    }

    /// Intersection over union of the two boxes.
    pub fn iou(&self, other: &BBox) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;
        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }

    /// Fraction of the smaller box's area covered by the intersection.
    ///
    /// 1.0 means one box fully contains the other.
    pub fn containment(&self, other: &BBox) -> f32 {
        let smaller = self.area().min(other.area());
        if smaller > 0.0 {
            self.intersection_area(other) / smaller
        } else {
            0.0
        }
    }

    /// Check whether this box fully contains `other`, with tolerance.
    pub fn contains(&self, other: &BBox) -> bool {
        self.left - GEOM_EPSILON <= other.left
            && self.top - GEOM_EPSILON <= other.top
            && self.right + GEOM_EPSILON >= other.right
            && self.bottom + GEOM_EPSILON >= other.bottom
    }

    /// Check whether the two boxes overlap by more than the tolerance in
    /// both dimensions. Edge-touching boxes do not count as overlapping.
    pub fn overlaps(&self, other: &BBox) -> bool {
        let x_overlap = self.right.min(other.right) - self.left.max(other.left);
        let y_overlap = self.bottom.min(other.bottom) - self.top.max(other.top);
        x_overlap > GEOM_EPSILON && y_overlap > GEOM_EPSILON
    }

    /// Check whether the horizontal ranges of the two boxes overlap.
    pub fn x_overlaps(&self, other: &BBox) -> bool {
        self.right.min(other.right) - self.left.max(other.left) > GEOM_EPSILON
    }

    /// Clamp the box to `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: f32, height: f32) -> BBox {
        BBox {
            left: self.left.clamp(0.0, width),
            top: self.top.clamp(0.0, height),
            right: self.right.clamp(0.0, width),
            bottom: self.bottom.clamp(0.0, height),
        }
    }

    /// How far the box extends past the page bounds, in points.
    pub fn out_of_bounds_by(&self, width: f32, height: f32) -> f32 {
        let mut excess: f32 = 0.0;
        excess = excess.max(-self.left).max(-self.top);
        excess = excess.max(self.right - width).max(self.bottom - height);
        excess.max(0.0)
    }
}

/// Structural class of a detected layout region.
///
/// The set is closed: grouping behavior downstream dispatches on these
/// variants, and anything the detector reports outside this vocabulary maps
/// to [`RegionClass::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionClass {
    /// Document title
    Title,
    /// Section heading
    Heading,
    /// Body paragraph
    Paragraph,
    /// A list as a whole
    List,
    /// One item of a list
    ListItem,
    /// A table
    Table,
    /// One cell of a table
    TableCell,
    /// An image or drawing
    Figure,
    /// Caption attached to a figure or table
    Caption,
    /// Footnote text
    Footnote,
    /// Running page header
    PageHeader,
    /// Running page footer
    PageFooter,
    /// Anything else
    Other,
}

impl RegionClass {
    /// Parse a detector label string.
    ///
    /// Accepts both this crate's canonical names and the layout-model
    /// vocabulary ("Text", "Section-header", "Picture", "List-item", ...).
    /// Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Title" => RegionClass::Title,
            "Heading" | "Section-header" => RegionClass::Heading,
            "Paragraph" | "Text" => RegionClass::Paragraph,
            "List" => RegionClass::List,
            "ListItem" | "List-item" => RegionClass::ListItem,
            "Table" => RegionClass::Table,
            "TableCell" | "Table-cell" => RegionClass::TableCell,
            "Figure" | "Picture" => RegionClass::Figure,
            "Caption" => RegionClass::Caption,
            "Footnote" => RegionClass::Footnote,
            "PageHeader" | "Page-header" => RegionClass::PageHeader,
            "PageFooter" | "Page-footer" => RegionClass::PageFooter,
            _ => RegionClass::Other,
        }
    }

    /// Canonical label used in template output.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionClass::Title => "Title",
            RegionClass::Heading => "Heading",
            RegionClass::Paragraph => "Paragraph",
            RegionClass::List => "List",
            RegionClass::ListItem => "ListItem",
            RegionClass::Table => "Table",
            RegionClass::TableCell => "TableCell",
            RegionClass::Figure => "Figure",
            RegionClass::Caption => "Caption",
            RegionClass::Footnote => "Footnote",
            RegionClass::PageHeader => "PageHeader",
            RegionClass::PageFooter => "PageFooter",
            RegionClass::Other => "Other",
        }
    }

    /// Whether this class is pinned before the page body in reading order.
    pub fn is_header(&self) -> bool {
        matches!(self, RegionClass::PageHeader)
    }

    /// Whether this class is pinned after the page body in reading order.
    pub fn is_footer(&self) -> bool {
        matches!(self, RegionClass::PageFooter)
    }
}

/// One detected layout element in page coordinate space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Ordinal of the raw detection on its page (stable across stages)
    pub id: usize,

    /// 0-based page index
    pub page_index: usize,

    /// Bounding box in page points
    pub bbox: BBox,

    /// Structural class
    pub class: RegionClass,

    /// Detector confidence in [0, 1]
    pub score: f32,

    /// Raw-detection ordinals this region was merged from
    pub sources: Vec<usize>,
}

impl Region {
    /// Create a region from a single detection.
    pub fn new(id: usize, page_index: usize, bbox: BBox, class: RegionClass, score: f32) -> Self {
        Self {
            id,
            page_index,
            bbox,
            class,
            score,
            sources: vec![id],
        }
    }
}

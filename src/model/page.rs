//! Page-level types.

use super::Region;
use serde::{Deserialize, Serialize};

/// Physical geometry of one page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page index (0-based)
    pub index: usize,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,
}

impl PageInfo {
    /// Create page geometry for the given index and size.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
        }
    }

    /// Standard US Letter geometry (8.5 x 11 inches).
    pub fn letter(index: usize) -> Self {
        Self::new(index, 612.0, 792.0)
    }

    /// Standard A4 geometry (210 x 297 mm).
    pub fn a4(index: usize) -> Self {
        Self::new(index, 595.0, 842.0)
    }
}

/// The regions of one page as they move through the pipeline stages.
///
/// Each stage consumes a `PageLayout` and produces a new one; a layout is
/// never mutated after it has been handed downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page geometry
    pub info: PageInfo,

    /// Regions on the page, in whatever order the producing stage defined
    pub regions: Vec<Region>,
}

impl PageLayout {
    /// Create a layout for a page.
    pub fn new(info: PageInfo, regions: Vec<Region>) -> Self {
        Self { info, regions }
    }

    /// Check if the page has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of regions on the page.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, RegionClass};

    #[test]
    fn test_page_info_presets() {
        let letter = PageInfo::letter(0);
        assert_eq!(letter.width, 612.0);
        let a4 = PageInfo::a4(3);
        assert_eq!(a4.index, 3);
        assert_eq!(a4.height, 842.0);
    }

    #[test]
    fn test_page_layout() {
        let info = PageInfo::letter(0);
        let layout = PageLayout::new(info, Vec::new());
        assert!(layout.is_empty());

        let region = Region::new(
            0,
            0,
            BBox::new(0.0, 0.0, 100.0, 20.0),
            RegionClass::Paragraph,
            0.9,
        );
        let layout = PageLayout::new(info, vec![region]);
        assert_eq!(layout.region_count(), 1);
    }
}

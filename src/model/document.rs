//! Document-level types.

use super::{PageInfo, TagNode};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The finished tag structure for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedPage {
    /// Page geometry
    pub info: PageInfo,

    /// Root of the page's tag tree. The root itself is synthetic; its
    /// children are the page's top-level tags in reading order. A page with
    /// no surviving detections has a root with zero children.
    pub root: TagNode,
}

impl TaggedPage {
    /// Create a tagged page.
    pub fn new(info: PageInfo, root: TagNode) -> Self {
        Self { info, root }
    }

    /// Check if the page carries no tags.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Number of tags on the page, excluding the synthetic root.
    pub fn tag_count(&self) -> usize {
        self.root.node_count() - 1
    }
}

/// The finished tag structure for a whole document.
///
/// Pages are ordered strictly by page index regardless of the order they
/// finished processing in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaggedDocument {
    /// Per-page tag trees, ordered by page index
    pub pages: Vec<TaggedPage>,
}

impl TaggedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by index (0-based).
    pub fn get_page(&self, index: usize) -> Option<&TaggedPage> {
        self.pages.iter().find(|p| p.info.index == index)
    }

    /// Get a page by index, failing when the document has no such page.
    pub fn require_page(&self, index: usize) -> Result<&TaggedPage> {
        self.get_page(index)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }

    /// Total number of tags across all pages, excluding page roots.
    pub fn tag_count(&self) -> usize {
        self.pages.iter().map(|p| p.tag_count()).sum()
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

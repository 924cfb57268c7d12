//! Interface to the external layout detector.
//!
//! Rasterizing pages and running the detection model live outside this
//! crate. The engine only sees the detector through [`LayoutDetector`]:
//! a synchronous per-page call returning raw boxes in the pixel space of
//! the rendered image. [`PageDetections`] is the serialized form of one
//! page's detector output, so a detection run can be replayed from a file
//! (this is also what the CLI consumes).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PageInfo;

/// One raw detection as reported by the model for a rendered page image.
///
/// The box is in pixel coordinates of the rendered image, `[left, top,
/// right, bottom]` with the origin at the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection {
    /// Pixel-space bounding box `[l, t, r, b]`
    pub bbox: [f32; 4],

    /// Model label string (e.g. "Text", "Section-header", "Picture")
    pub label: String,

    /// Confidence score in [0, 1]
    pub score: f32,
}

impl RawDetection {
    /// Create a raw detection.
    pub fn new(bbox: [f32; 4], label: impl Into<String>, score: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            score,
        }
    }
}

/// The external detector, seen as an opaque synchronous function per page.
///
/// Implementations must be `Sync`: pages are detected and processed in
/// parallel unless the caller opts out.
pub trait LayoutDetector: Sync {
    /// Detect layout regions on one page, rendered at the given zoom.
    fn detect(&self, page: &PageInfo, zoom: f32) -> Result<Vec<RawDetection>>;
}

/// Serialized detector output for one page.
///
/// A dump file is a JSON array of these, one per page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDetections {
    /// 0-based page index
    pub page: usize,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Raw detections for the page
    pub detections: Vec<RawDetection>,
}

impl PageDetections {
    /// Page geometry carried by this dump entry.
    pub fn info(&self) -> PageInfo {
        PageInfo::new(self.page, self.width, self.height)
    }
}

/// Parse a detection dump from JSON bytes.
pub fn parse_dump(data: &[u8]) -> Result<Vec<PageDetections>> {
    serde_json::from_slice(data).map_err(|e| Error::Detector(format!("invalid dump: {}", e)))
}

/// A [`LayoutDetector`] backed by an in-memory detection dump.
///
/// Used to replay recorded detector output, and as the test harness
/// detector throughout this crate.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    pages: Vec<PageDetections>,
}

impl StaticDetector {
    /// Create a detector over recorded per-page output.
    pub fn new(pages: Vec<PageDetections>) -> Self {
        Self { pages }
    }

    /// Page geometries recorded in the dump, ordered by page index.
    pub fn page_infos(&self) -> Vec<PageInfo> {
        let mut infos: Vec<PageInfo> = self.pages.iter().map(|p| p.info()).collect();
        infos.sort_by_key(|info| info.index);
        infos
    }
}

impl LayoutDetector for StaticDetector {
    fn detect(&self, page: &PageInfo, _zoom: f32) -> Result<Vec<RawDetection>> {
        self.pages
            .iter()
            .find(|p| p.page == page.index)
            .map(|p| p.detections.clone())
            .ok_or_else(|| Error::Detector(format!("no recorded output for page {}", page.index)))
    }
}

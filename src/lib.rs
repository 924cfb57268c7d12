//! # pdftag
//!
//! Automatic tag-structure generation for PDF accessibility in Rust.
//!
//! This library turns the raw output of an AI layout-detection model into a
//! hierarchical, reading-ordered tag structure tree for each page, ready to
//! serialize as a tagging template.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftag::{tag_dump_file, template, template::JsonFormat};
//!
//! fn main() -> pdftag::Result<()> {
//!     // Process a layout detection dump
//!     let doc = tag_dump_file("detections.json")?;
//!
//!     // Export the tagging template
//!     let json = template::to_template_json(&doc, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Coordinate normalization**: Pixel-space detections mapped to page points
//! - **Region merging**: Duplicate and fragmented detections consolidated
//! - **Reading order**: Multi-column layouts sequenced top-to-bottom, left-to-right
//! - **Hierarchy building**: Lists, tables, and captions nested structurally
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod detector;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod template;
pub mod writer;

// Re-export commonly used types
pub use detector::{LayoutDetector, PageDetections, RawDetection, StaticDetector};
pub use error::{Error, Result};
pub use model::{
    BBox, PageInfo, PageLayout, Region, RegionClass, TagNode, TaggedDocument, TaggedPage,
};
pub use pipeline::TagOptions;
pub use template::JsonFormat;
pub use writer::{TagWriter, TemplateFileWriter};

use std::path::Path;

/// Tag a document using a layout detector.
///
/// # Arguments
///
/// * `pages` - Page geometry for every page to process
/// * `detector` - Source of layout detections
///
/// # Example
///
/// ```no_run
/// use pdftag::{tag_document, PageInfo, StaticDetector};
///
/// # let detector = StaticDetector::new(vec![]);
/// let pages = vec![PageInfo::letter(0)];
/// let doc = tag_document(&pages, &detector).unwrap();
/// println!("Tags: {}", doc.tag_count());
/// ```
pub fn tag_document<D: LayoutDetector>(pages: &[PageInfo], detector: &D) -> Result<TaggedDocument> {
    pipeline::process_document(pages, detector, &TagOptions::default())
}

/// Tag a document with custom options.
///
/// # Example
///
/// ```no_run
/// use pdftag::{tag_document_with_options, PageInfo, StaticDetector, TagOptions};
///
/// # let detector = StaticDetector::new(vec![]);
/// let pages = vec![PageInfo::letter(0)];
/// let options = TagOptions::new().with_threshold(0.5).sequential();
/// let doc = tag_document_with_options(&pages, &detector, &options).unwrap();
/// ```
pub fn tag_document_with_options<D: LayoutDetector>(
    pages: &[PageInfo],
    detector: &D,
    options: &TagOptions,
) -> Result<TaggedDocument> {
    pipeline::process_document(pages, detector, options)
}

/// Tag a document from a serialized detection dump.
///
/// The dump is a JSON array of per-page detection records as produced by a
/// layout-detection run (see [`detector::parse_dump`]).
pub fn tag_dump_bytes(data: &[u8]) -> Result<TaggedDocument> {
    tag_dump_bytes_with_options(data, &TagOptions::default())
}

/// Tag a document from a serialized detection dump with custom options.
pub fn tag_dump_bytes_with_options(data: &[u8], options: &TagOptions) -> Result<TaggedDocument> {
    let pages = detector::parse_dump(data)?;
    let detector = StaticDetector::new(pages);
    let infos = detector.page_infos();
    pipeline::process_document(&infos, &detector, options)
}

/// Tag a document from a detection dump file.
///
/// # Example
///
/// ```no_run
/// use pdftag::tag_dump_file;
///
/// let doc = tag_dump_file("detections.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn tag_dump_file<P: AsRef<Path>>(path: P) -> Result<TaggedDocument> {
    let data = std::fs::read(path)?;
    tag_dump_bytes(&data)
}

/// Tag a document from a detection dump file with custom options.
pub fn tag_dump_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &TagOptions,
) -> Result<TaggedDocument> {
    let data = std::fs::read(path)?;
    tag_dump_bytes_with_options(&data, options)
}

/// Builder for configuring and running the tagging pipeline.
///
/// # Example
///
/// ```no_run
/// use pdftag::{Tagger, JsonFormat};
///
/// let json = Tagger::new()
///     .with_threshold(0.4)
///     .with_zoom(2.0)
///     .sequential()
///     .tag_dump_file("detections.json")?
///     .to_template_json(JsonFormat::Pretty)?;
/// # Ok::<(), pdftag::Error>(())
/// ```
pub struct Tagger {
    options: TagOptions,
}

impl Tagger {
    /// Create a new Tagger builder.
    pub fn new() -> Self {
        Self {
            options: TagOptions::default(),
        }
    }

    /// Set the confidence threshold (clamped to `[0.0, 1.0]`).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.options = self.options.with_threshold(threshold);
        self
    }

    /// Set the zoom factor the detections were produced at.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.options = self.options.with_zoom(zoom);
        self
    }

    /// Set the IoU threshold for merging same-class regions.
    pub fn with_merge_iou(mut self, iou: f32) -> Self {
        self.options = self.options.with_merge_iou(iou);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Run the pipeline against a layout detector.
    pub fn tag<D: LayoutDetector>(self, pages: &[PageInfo], detector: &D) -> Result<TaggerResult> {
        let document = pipeline::process_document(pages, detector, &self.options)?;
        Ok(TaggerResult { document })
    }

    /// Run the pipeline against a detection dump.
    pub fn tag_dump_bytes(self, data: &[u8]) -> Result<TaggerResult> {
        let document = tag_dump_bytes_with_options(data, &self.options)?;
        Ok(TaggerResult { document })
    }

    /// Run the pipeline against a detection dump file.
    pub fn tag_dump_file<P: AsRef<Path>>(self, path: P) -> Result<TaggerResult> {
        let data = std::fs::read(path)?;
        self.tag_dump_bytes(&data)
    }
}

impl Default for Tagger {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of running the tagging pipeline.
pub struct TaggerResult {
    /// The tagged document
    pub document: TaggedDocument,
}

impl TaggerResult {
    /// Serialize as template JSON.
    pub fn to_template_json(&self, format: JsonFormat) -> Result<String> {
        template::to_template_json(&self.document, format)
    }

    /// Write the template to a file.
    pub fn write_template<P: AsRef<Path>>(&self, path: P, format: JsonFormat) -> Result<()> {
        TemplateFileWriter::new(path)
            .with_format(format)
            .write(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &TaggedDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagger_builder() {
        let tagger = Tagger::new()
            .with_threshold(0.4)
            .with_zoom(3.0)
            .sequential();

        assert_eq!(tagger.options.threshold, 0.4);
        assert_eq!(tagger.options.zoom, 3.0);
        assert!(!tagger.options.parallel);
    }

    #[test]
    fn test_tagger_builder_default() {
        let tagger = Tagger::default();
        assert_eq!(tagger.options.threshold, 0.3);
        assert!(tagger.options.parallel);
    }

    #[test]
    fn test_tag_dump_bytes_invalid_json() {
        let result = tag_dump_bytes(b"not json");
        assert!(result.is_err());
        assert!(matches!(result, Err(Error::Detector(_))));
    }

    #[test]
    fn test_tag_dump_bytes_empty_array() {
        let doc = tag_dump_bytes(b"[]").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_tag_dump_bytes_end_to_end() {
        let dump = r#"[
            {
                "page": 0,
                "width": 612.0,
                "height": 792.0,
                "detections": [
                    { "bbox": [100.0, 100.0, 1100.0, 200.0], "label": "Title", "score": 0.97 },
                    { "bbox": [100.0, 260.0, 1100.0, 700.0], "label": "Text", "score": 0.91 }
                ]
            }
        ]"#;
        let doc = tag_dump_bytes(dump.as_bytes()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.tag_count(), 2);

        let page = doc.get_page(0).unwrap();
        assert_eq!(page.root.children[0].class, RegionClass::Title);
        // pixel coordinates divided by the default zoom of 2.0
        assert_eq!(page.root.children[0].bbox.left, 50.0);
    }

    #[test]
    fn test_tagger_to_template_json() {
        let dump = r#"[
            {
                "page": 0,
                "width": 612.0,
                "height": 792.0,
                "detections": [
                    { "bbox": [100.0, 100.0, 1100.0, 200.0], "label": "Title", "score": 0.97 }
                ]
            }
        ]"#;
        let json = Tagger::new()
            .sequential()
            .tag_dump_bytes(dump.as_bytes())
            .unwrap()
            .to_template_json(JsonFormat::Compact)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["tags"][0]["label"], "Title");
        assert_eq!(value[0]["tags"][0]["id"], "p0-0");
    }
}

//! Pipeline options and configuration.

use crate::error::{Error, Result};

/// Options controlling the detection-to-tag pipeline.
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// Confidence threshold below which detections are dropped
    pub threshold: f32,

    /// Zoom factor the page images were rendered at; used only to map
    /// detector pixel coordinates back to page points
    pub zoom: f32,

    /// IoU above which same-class detections are merged
    pub merge_iou: f32,

    /// Whether to process pages in parallel
    pub parallel: bool,
}

impl TagOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence threshold (clamped to [0, 1]).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the render zoom factor.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the merge IoU threshold (clamped to [0, 1]).
    pub fn with_merge_iou(mut self, iou: f32) -> Self {
        self.merge_iou = iou.clamp(0.0, 1.0);
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Validate option ranges.
    ///
    /// Zoom must lie in [1.0, 10.0]; values outside produce images the
    /// detector was not trained on or pixel coordinates that no longer map
    /// cleanly to page points.
    pub fn validate(&self) -> Result<()> {
        if !(1.0..=10.0).contains(&self.zoom) {
            return Err(Error::InvalidOption(format!(
                "zoom must be between 1.0 and 10.0, got {}",
                self.zoom
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidOption(format!(
                "threshold must be between 0.0 and 1.0, got {}",
                self.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.merge_iou) {
            return Err(Error::InvalidOption(format!(
                "merge IoU must be between 0.0 and 1.0, got {}",
                self.merge_iou
            )));
        }
        Ok(())
    }
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            zoom: 2.0,
            merge_iou: 0.5,
            parallel: true,
        }
    }
}

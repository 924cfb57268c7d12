//! Error types for the pdftag library.

use std::io;
use thiserror::Error;

/// Result type alias for pdftag operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while mapping detections to a tag structure.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A detection box is malformed (non-finite coordinates, inverted, or
    /// degenerate after clamping to the page). Boxes slightly past the page
    /// edge are clamped instead; this only surfaces when a detection cannot
    /// be salvaged.
    #[error("Invalid detection: {0}")]
    InvalidDetection(String),

    /// The nested tag tree for a page violated a structural invariant
    /// (overlapping siblings). The page pipeline degrades to a flat tree
    /// when it sees this.
    #[error("Structural inconsistency: {0}")]
    StructuralInconsistency(String),

    /// The external detector failed for a page. Fatal for the document.
    #[error("Detector error: {0}")]
    Detector(String),

    /// Error serializing or writing the template.
    #[error("Template error: {0}")]
    Template(String),

    /// A configuration value is out of its valid range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::StructuralInconsistency("siblings overlap".to_string());
        assert_eq!(
            err.to_string(),
            "Structural inconsistency: siblings overlap"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

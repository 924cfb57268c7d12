//! Output writers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::TaggedDocument;
use crate::template::{to_template_json, JsonFormat};

/// A sink for finished tag structures.
pub trait TagWriter {
    /// Write the document to the sink.
    fn write(&self, doc: &TaggedDocument) -> Result<()>;
}

/// Writes the template JSON to a file.
///
/// The JSON is first written to a temporary sibling path and then renamed
/// into place, so the destination is never left half-written.
pub struct TemplateFileWriter {
    path: PathBuf,
    format: JsonFormat,
}

impl TemplateFileWriter {
    /// Create a writer targeting `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: JsonFormat::Pretty,
        }
    }

    /// Set the JSON format (default: pretty).
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TagWriter for TemplateFileWriter {
    fn write(&self, doc: &TaggedDocument) -> Result<()> {
        let json = to_template_json(doc, self.format)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json.as_bytes())?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, PageInfo, Region, RegionClass, TagNode, TaggedPage};
    use crate::pipeline::assemble_document;

    fn sample_document() -> TaggedDocument {
        let info = PageInfo::letter(0);
        let mut root = TagNode {
            id: String::new(),
            class: RegionClass::Other,
            bbox: BBox::new(0.0, 0.0, info.width, info.height),
            children: Vec::new(),
            sources: Vec::new(),
        };
        root.children.push(TagNode::leaf(&Region::new(
            0,
            0,
            BBox::new(72.0, 72.0, 540.0, 120.0),
            RegionClass::Title,
            0.99,
        )));
        assemble_document(vec![TaggedPage::new(info, root)])
    }

    #[test]
    fn test_write_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let writer = TemplateFileWriter::new(&path).with_format(JsonFormat::Compact);
        writer.write(&sample_document()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value[0]["tags"][0]["label"], "Title");

        // the temporary file is gone after the rename
        assert!(!path.with_file_name("out.json.tmp").exists());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let writer = TemplateFileWriter::new(&path);
        assert!(writer.write(&sample_document()).is_err());
    }
}

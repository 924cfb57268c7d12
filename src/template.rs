//! Template JSON export.
//!
//! The template is the serialized handoff format for an external tagging
//! engine: a JSON array with one object per page, each carrying the page's
//! top-level tags with nested children.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{TagNode, TaggedDocument};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// One tag entry in the template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateTag {
    /// Document-unique identifier
    pub id: String,

    /// Structural class label
    pub label: String,

    /// Bounding box `[left, top, right, bottom]` in page points
    pub bbox: [f32; 4],

    /// Nested tags in reading order
    pub children: Vec<TemplateTag>,
}

impl TemplateTag {
    fn from_node(node: &TagNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.class.as_str().to_string(),
            bbox: [
                node.bbox.left,
                node.bbox.top,
                node.bbox.right,
                node.bbox.bottom,
            ],
            children: node.children.iter().map(TemplateTag::from_node).collect(),
        }
    }
}

/// One page entry in the template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatePage {
    /// 0-based page index
    pub page: usize,

    /// Top-level tags on the page in reading order
    pub tags: Vec<TemplateTag>,
}

/// Build the template representation of a tagged document.
///
/// Page roots are synthetic and are not serialized; their children become
/// the page's `tags` array.
pub fn to_template(doc: &TaggedDocument) -> Vec<TemplatePage> {
    doc.pages
        .iter()
        .map(|page| TemplatePage {
            page: page.info.index,
            tags: page
                .root
                .children
                .iter()
                .map(TemplateTag::from_node)
                .collect(),
        })
        .collect()
}

/// Serialize a tagged document as template JSON.
pub fn to_template_json(doc: &TaggedDocument, format: JsonFormat) -> Result<String> {
    let template = to_template(doc);
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&template),
        JsonFormat::Compact => serde_json::to_string(&template),
    };
    result.map_err(|e| Error::Template(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, PageInfo, Region, RegionClass, TaggedPage};
    use crate::pipeline::assemble_document;

    fn one_page_two_regions() -> TaggedDocument {
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
            BBox::new(50.0, 50.0, 550.0, 80.0),
            RegionClass::Heading,
            0.95,
        )));
        root.children.push(TagNode::leaf(&Region::new(
            1,
            0,
            BBox::new(50.0, 100.0, 550.0, 300.0),
            RegionClass::Paragraph,
            0.9,
        )));
        assemble_document(vec![TaggedPage::new(info, root)])
    }

    #[test]
    fn test_template_shape() {
        let doc = one_page_two_regions();
        let template = to_template(&doc);
        assert_eq!(template.len(), 1);
        assert_eq!(template[0].page, 0);
        assert_eq!(template[0].tags.len(), 2);
        assert_eq!(template[0].tags[0].label, "Heading");
        assert_eq!(template[0].tags[0].bbox, [50.0, 50.0, 550.0, 80.0]);
        assert!(template[0].tags[0].children.is_empty());
    }

    #[test]
    fn test_template_json_fields_present() {
        let doc = one_page_two_regions();
        let json = to_template_json(&doc, JsonFormat::Compact).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let pages = value.as_array().unwrap();
        assert_eq!(pages.len(), 1);
        let tags = pages[0]["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 2);
        for tag in tags {
            assert!(tag.get("label").is_some());
            assert!(tag.get("bbox").is_some());
            assert!(tag.get("children").is_some());
        }
    }

    #[test]
    fn test_template_json_pretty_vs_compact() {
        let doc = one_page_two_regions();
        let pretty = to_template_json(&doc, JsonFormat::Pretty).unwrap();
        let compact = to_template_json(&doc, JsonFormat::Compact).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_template_roundtrip() {
        let doc = one_page_two_regions();
        let json = to_template_json(&doc, JsonFormat::Pretty).unwrap();
        let parsed: Vec<TemplatePage> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].tags[0].id, "p0-0");
        assert_eq!(parsed[0].tags[1].id, "p0-1");
    }
}

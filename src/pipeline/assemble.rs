//! Document assembly: per-page trees into one stable document structure.

use crate::model::{TagNode, TaggedDocument, TaggedPage};

/// Concatenate per-page trees into a document, ordered strictly by page
/// index, and assign document-unique identifiers.
///
/// Identifiers encode page index and depth-first position (`p2-5` is the
/// sixth node encountered on page 2), so re-running the pipeline on the
/// same input yields the same ids. Pure construction; no I/O.
pub fn assemble_document(mut pages: Vec<TaggedPage>) -> TaggedDocument {
    pages.sort_by_key(|page| page.info.index);

    for page in &mut pages {
        let page_index = page.info.index;
        page.root.id = format!("p{}", page_index);
        let mut ordinal = 0usize;
        for child in &mut page.root.children {
            assign_ids(child, page_index, &mut ordinal);
        }
    }

    TaggedDocument { pages }
}

fn assign_ids(node: &mut TagNode, page_index: usize, ordinal: &mut usize) {
    node.id = format!("p{}-{}", page_index, *ordinal);
    *ordinal += 1;
    for child in &mut node.children {
        assign_ids(child, page_index, ordinal);
    }
}

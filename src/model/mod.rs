//! Data model for the detection-to-tag-structure mapping.
//!
//! This module defines the intermediate representation that bridges raw
//! detector output and the final tag tree: regions in page coordinate
//! space, per-page layouts, and the nested tag structure handed to a tag
//! writer or serialized as a template.

mod document;
mod page;
mod region;
mod tag;

pub use document::{TaggedDocument, TaggedPage};
pub use page::{PageInfo, PageLayout};
pub use region::{BBox, Region, RegionClass, GEOM_EPSILON};
pub use tag::TagNode;

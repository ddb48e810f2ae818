//! Element snapshots: what the capture tool records about a selected DOM node.

pub mod extract;
pub mod snapshot;

pub use extract::{extract_from_html, tailwind_classes, ExtractError};
pub use snapshot::{BoundingBox, ChildElement, ElementSnapshot, ParentContext, RequestType};

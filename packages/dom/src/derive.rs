//! # Selector Derivation
//!
//! Computes the path used as the storage key for an editable element.
//!
//! ```text
//! <body>
//!   <section id="intro">          →  #intro
//!     <div class="card">
//!       <p>a</p>
//!       <p class="lead">b</p>     →  #intro > div.card > p.lead:nth-of-type(2)
//! ```
//!
//! An element with an id is keyed by the id alone. Otherwise the walk goes
//! up until it meets an ancestor with an id or the direct child of `<body>`.
//! Classes under the reserved UI prefix are left out so that Beacon's own
//! markers never leak into stored keys.

use crate::node::{Document, NodeId};

/// Class prefix owned by the overlay UI
pub const RESERVED_CLASS_PREFIX: &str = "beacon-";

/// Best-effort stable path for `node`; `None` when `node` is not an element
pub fn derive_selector(doc: &Document, node: NodeId, reserved_prefix: &str) -> Option<String> {
    if !doc.is_element(node) {
        return None;
    }
    if let Some(id) = doc.element_id(node) {
        return Some(format!("#{}", id));
    }

    let body = doc.body();
    let mut segments: Vec<String> = Vec::new();
    let mut current = Some(node);

    while let Some(element) = current.filter(|n| doc.is_element(*n)) {
        if let Some(id) = doc.element_id(element) {
            segments.push(format!("#{}", id));
            break;
        }
        segments.push(segment(doc, element, reserved_prefix));

        current = doc.parent(element);
        if current.is_some() && current == body {
            break;
        }
    }

    segments.reverse();
    Some(segments.join(" > "))
}

fn segment(doc: &Document, element: NodeId, reserved_prefix: &str) -> String {
    let mut segment = doc.tag_name(element).unwrap_or_default().to_string();

    for class in doc.classes(element) {
        if !class.starts_with(reserved_prefix) {
            segment.push('.');
            segment.push_str(class);
        }
    }

    let (position, count) = doc.type_position(element);
    if count > 1 {
        segment.push_str(&format!(":nth-of-type({})", position));
    }
    segment
}

//! # Editable Surface
//!
//! Everything the controller may do to a rendered page. A browser binding
//! and [`HtmlSurface`](crate::HtmlSurface) both implement it; the
//! controller, snapshot diff and content application see nothing else.

use crate::errors::EditorResult;
use std::fmt::Debug;
use std::hash::Hash;

pub trait EditableSurface {
    /// Handle to one element; only valid until the next [`reload`](Self::reload)
    type Node: Copy + Eq + Hash + Debug;

    /// Currently editable elements in document order, without duplicates
    fn editable_nodes(&self) -> Vec<Self::Node>;

    /// Inner HTML of `node`
    fn read_content(&self, node: Self::Node) -> String;

    /// Replace the inner HTML of `node`
    fn write_content(&mut self, node: Self::Node, html: &str);

    /// Storage key for `node`
    fn derive_key(&self, node: Self::Node) -> Option<String>;

    /// Element addressed by `selector`; `None` when nothing matches or the
    /// selector does not parse
    fn resolve(&self, selector: &str) -> Option<Self::Node>;

    /// Turn the editing affordances (editable marks, format toolbar) on or off
    fn set_editing(&mut self, enabled: bool);

    fn is_editing(&self) -> bool;

    /// Discard every local modification and restore the page from its source
    fn reload(&mut self) -> EditorResult<()>;
}

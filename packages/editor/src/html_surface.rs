//! # HTML Surface
//!
//! [`EditableSurface`] over a parsed HTML page.
//!
//! A surface can be:
//! - **Memory-backed**: built from markup, reloads from that markup
//! - **File-backed**: loaded from disk, reloads by re-reading the file
//!
//! Editable marks live on the surface, not in the markup, so the HTML that
//! gets serialized or diffed never carries overlay attributes.

use beacon_dom::{derive_selector, Document, NodeId};
use std::path::{Path, PathBuf};

use crate::config::EditorConfig;
use crate::errors::EditorResult;
use crate::surface::EditableSurface;

#[derive(Debug, Clone)]
enum SurfaceSource {
    Memory(String),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct HtmlSurface {
    source: SurfaceSource,
    document: Document,
    config: EditorConfig,
    editing: bool,
}

impl HtmlSurface {
    /// Surface over in-memory markup (memory-backed)
    pub fn from_source(source: impl Into<String>, config: EditorConfig) -> Self {
        let source = source.into();
        let document = Document::parse(&source);
        Self {
            source: SurfaceSource::Memory(source),
            document,
            config,
            editing: false,
        }
    }

    /// Surface over an HTML file (file-backed)
    pub fn load(path: impl AsRef<Path>, config: EditorConfig) -> EditorResult<Self> {
        let path = path.as_ref().to_path_buf();
        let source = std::fs::read_to_string(&path)?;
        Ok(Self {
            document: Document::parse(&source),
            source: SurfaceSource::File(path),
            config,
            editing: false,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// File the surface was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            SurfaceSource::File(path) => Some(path),
            SurfaceSource::Memory(_) => None,
        }
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }

    /// Type `html` into the editable element at `selector`.
    ///
    /// Returns false when editing is off or no editable element matches.
    pub fn edit(&mut self, selector: &str, html: &str) -> bool {
        if !self.editing {
            return false;
        }
        let Some(node) = self.resolve(selector) else {
            return false;
        };
        if !self.editable_nodes().contains(&node) {
            return false;
        }
        self.write_content(node, html);
        true
    }

    fn in_ui_container(&self, node: NodeId, containers: &[NodeId]) -> bool {
        containers.contains(&node)
            || self
                .document
                .ancestors(node)
                .any(|ancestor| containers.contains(&ancestor))
    }
}

impl EditableSurface for HtmlSurface {
    type Node = NodeId;

    fn editable_nodes(&self) -> Vec<NodeId> {
        let candidates = match self.document.query_selector_all(&self.config.editable_selector()) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!("editable allow-list does not parse: {}", e);
                return Vec::new();
            }
        };
        let containers = self
            .document
            .query_selector_all(&self.config.ui_container_selector())
            .unwrap_or_default();

        candidates
            .into_iter()
            .filter(|node| !self.in_ui_container(*node, &containers))
            .collect()
    }

    fn read_content(&self, node: NodeId) -> String {
        self.document.inner_html(node)
    }

    fn write_content(&mut self, node: NodeId, html: &str) {
        self.document.set_inner_html(node, html);
    }

    fn derive_key(&self, node: NodeId) -> Option<String> {
        derive_selector(&self.document, node, &self.config.reserved_prefix)
    }

    fn resolve(&self, selector: &str) -> Option<NodeId> {
        match self.document.query_selector(selector) {
            Ok(node) => node,
            Err(e) => {
                tracing::debug!(selector, "unparsable selector: {}", e);
                None
            }
        }
    }

    fn set_editing(&mut self, enabled: bool) {
        self.editing = enabled;
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn reload(&mut self) -> EditorResult<()> {
        let source = match &self.source {
            SurfaceSource::Memory(source) => source.clone(),
            SurfaceSource::File(path) => std::fs::read_to_string(path)?,
        };
        self.document = Document::parse(&source);
        self.editing = false;
        Ok(())
    }
}

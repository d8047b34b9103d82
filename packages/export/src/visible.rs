//! Visible page content, minus the overlay's own chrome.

use beacon_dom::{strip_tags, Document, NodeId, RESERVED_CLASS_PREFIX};

/// Tags never shown to a reader
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Tags that hold other blocks rather than text of their own
const CONTAINER_TAGS: &[&str] = &[
    "div", "section", "header", "footer", "main", "article", "nav", "aside", "ul", "ol",
    "blockquote", "figure", "form", "table", "p", "li", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// One readable unit of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
    Table(Vec<Vec<String>>),
}

/// `<title>` text, if the page has a non-empty one
pub fn page_title(doc: &Document) -> Option<String> {
    let title = doc.find_tag("title")?;
    let text = strip_tags(&doc.inner_html(title));
    (!text.is_empty()).then_some(text)
}

/// Copy of `doc` with UI containers and hidden elements removed
pub fn visible_document(doc: &Document, ui_containers: &[String]) -> Document {
    let mut visible = doc.clone();
    let containers = containers(doc, ui_containers);
    let hidden: Vec<NodeId> = doc
        .descendants(doc.root())
        .into_iter()
        .filter(|node| is_hidden(doc, *node, &containers))
        .collect();
    for node in hidden {
        visible.detach(node);
    }
    visible
}

/// Readable blocks of the page body in document order
pub fn visible_blocks(doc: &Document, ui_containers: &[String]) -> Vec<Block> {
    let containers = containers(doc, ui_containers);
    let start = doc.body().unwrap_or_else(|| doc.root());
    let mut blocks = Vec::new();
    collect(doc, start, &containers, &mut blocks);
    blocks
}

fn containers(doc: &Document, ui_containers: &[String]) -> Vec<NodeId> {
    if ui_containers.is_empty() {
        return Vec::new();
    }
    doc.query_selector_all(&ui_containers.join(", ")).unwrap_or_default()
}

fn is_hidden(doc: &Document, node: NodeId, containers: &[NodeId]) -> bool {
    if !doc.is_element(node) {
        return false;
    }
    containers.contains(&node)
        || doc.element_id(node).is_some_and(|id| id.starts_with(RESERVED_CLASS_PREFIX))
        || doc.tag_name(node).is_some_and(|tag| HIDDEN_TAGS.contains(&tag))
}

fn text_of(doc: &Document, node: NodeId) -> String {
    strip_tags(&doc.inner_html(node))
}

fn has_block_children(doc: &Document, node: NodeId) -> bool {
    doc.descendants(node)
        .into_iter()
        .any(|n| doc.tag_name(n).is_some_and(|tag| CONTAINER_TAGS.contains(&tag)))
}

fn collect(doc: &Document, node: NodeId, containers: &[NodeId], blocks: &mut Vec<Block>) {
    let children: Vec<NodeId> = doc.element_children(node).collect();

    for child in children {
        if is_hidden(doc, child, containers) {
            continue;
        }
        let tag = doc.tag_name(child).unwrap_or_default();

        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let text = text_of(doc, child);
                if !text.is_empty() {
                    let level = tag[1..].parse().unwrap_or(1);
                    blocks.push(Block::Heading { level, text });
                }
            }
            "p" => push_text(blocks, Block::Paragraph(text_of(doc, child))),
            "li" => push_text(blocks, Block::ListItem(text_of(doc, child))),
            "table" => {
                let rows: Vec<Vec<String>> = doc
                    .descendants(child)
                    .into_iter()
                    .filter(|n| doc.tag_name(*n) == Some("tr"))
                    .map(|tr| {
                        doc.element_children(tr)
                            .filter(|cell| matches!(doc.tag_name(*cell), Some("td" | "th")))
                            .map(|cell| text_of(doc, cell))
                            .collect()
                    })
                    .filter(|row: &Vec<String>| !row.is_empty())
                    .collect();
                if !rows.is_empty() {
                    blocks.push(Block::Table(rows));
                }
            }
            _ if has_block_children(doc, child) => collect(doc, child, containers, blocks),
            _ => push_text(blocks, Block::Paragraph(text_of(doc, child))),
        }
    }
}

fn push_text(blocks: &mut Vec<Block>, block: Block) {
    let empty = match &block {
        Block::Paragraph(text) | Block::ListItem(text) => text.is_empty(),
        _ => false,
    };
    if !empty {
        blocks.push(block);
    }
}

//! # HTML Parser
//!
//! Lenient scanner + tree builder. It understands the parts of HTML that
//! matter for round-tripping editable page content: void elements, raw text
//! elements, comments, doctypes and the common implied end tags (`p`, `li`,
//! table cells). Text and attribute values are kept verbatim so that
//! `parse → serialize` reproduces the input for well-formed markup.

use crate::node::{Document, NodeId, NodeKind};

/// Elements that never have children or an end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is read verbatim up to the matching end tag
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Start tags that close an open `<p>`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

const PARAGRAPH_SCOPE: &[&str] = &["button", "caption", "html", "table", "td", "th", "template"];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq)]
enum HtmlToken<'a> {
    Text(&'a str),
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Comment(&'a str),
    Doctype(&'a str),
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek_at(&self, index: usize) -> Option<u8> {
        self.bytes().get(index).copied()
    }

    fn next_token(&mut self) -> Option<HtmlToken<'a>> {
        if self.pos >= self.src.len() {
            return None;
        }
        let rest = &self.src[self.pos..];

        if let Some(body) = rest.strip_prefix("<!--") {
            let (content, consumed) = match body.find("-->") {
                Some(end) => (&body[..end], 4 + end + 3),
                None => (body, rest.len()),
            };
            self.pos += consumed;
            return Some(HtmlToken::Comment(content));
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            let (content, consumed) = match rest.find('>') {
                Some(end) => (&rest[2..end], end + 1),
                None => (&rest[2..], rest.len()),
            };
            self.pos += consumed;
            let is_doctype = rest.starts_with("<!")
                && content
                    .get(..7)
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case("doctype"));
            return Some(if is_doctype {
                HtmlToken::Doctype(content)
            } else {
                HtmlToken::Comment(content)
            });
        }

        let next = self.peek_at(self.pos + 1);
        if rest.starts_with("</") && self.peek_at(self.pos + 2).is_some_and(|b| b.is_ascii_alphabetic()) {
            return Some(self.end_tag());
        }
        if rest.starts_with('<') && next.is_some_and(|b| b.is_ascii_alphabetic()) {
            return Some(self.start_tag());
        }

        // Text up to the next '<' (a stray '<' is kept as text)
        let search_from = if rest.starts_with('<') { 1 } else { 0 };
        let end = rest[search_from..]
            .find('<')
            .map(|i| i + search_from)
            .unwrap_or(rest.len());
        self.pos += end;
        Some(HtmlToken::Text(&rest[..end]))
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek_at(self.pos) {
            if is_space(b) || b == b'/' || b == b'>' {
                break;
            }
            self.pos += 1;
        }
        self.src[start..self.pos].to_ascii_lowercase()
    }

    fn skip_space(&mut self) {
        while self.peek_at(self.pos).is_some_and(is_space) {
            self.pos += 1;
        }
    }

    fn end_tag(&mut self) -> HtmlToken<'a> {
        self.pos += 2;
        let name = self.read_name();
        match self.src[self.pos..].find('>') {
            Some(end) => self.pos += end + 1,
            None => self.pos = self.src.len(),
        }
        HtmlToken::EndTag { name }
    }

    fn start_tag(&mut self) -> HtmlToken<'a> {
        self.pos += 1;
        let name = self.read_name();
        let mut attributes: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_space();
            match self.peek_at(self.pos) {
                None => break,
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if self.peek_at(self.pos) == Some(b'>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                    continue;
                }
                Some(_) => {}
            }

            let start = self.pos;
            while let Some(b) = self.peek_at(self.pos) {
                if is_space(b) || b == b'=' || b == b'>' || b == b'/' {
                    break;
                }
                self.pos += 1;
            }
            let attr_name = self.src[start..self.pos].to_ascii_lowercase();
            if attr_name.is_empty() {
                // Stray '=' with no name
                self.pos += 1;
                continue;
            }

            self.skip_space();
            let mut value = String::new();
            if self.peek_at(self.pos) == Some(b'=') {
                self.pos += 1;
                self.skip_space();
                value = self.attribute_value();
            }

            if !attributes.iter().any(|(existing, _)| *existing == attr_name) {
                attributes.push((attr_name, value));
            }
        }

        HtmlToken::StartTag {
            name,
            attributes,
            self_closing,
        }
    }

    fn attribute_value(&mut self) -> String {
        match self.peek_at(self.pos) {
            Some(quote @ (b'"' | b'\'')) => {
                let start = self.pos + 1;
                let end = self.src[start..]
                    .bytes()
                    .position(|b| b == quote)
                    .map(|i| start + i)
                    .unwrap_or(self.src.len());
                self.pos = (end + 1).min(self.src.len());
                self.src[start..end].to_string()
            }
            _ => {
                let start = self.pos;
                while let Some(b) = self.peek_at(self.pos) {
                    if is_space(b) || b == b'>' {
                        break;
                    }
                    self.pos += 1;
                }
                self.src[start..self.pos].to_string()
            }
        }
    }

    /// Consume raw content up to (and including) `</tag ...>`
    fn raw_text(&mut self, tag: &str) -> &'a str {
        let rest = &self.src[self.pos..];
        let needle = format!("</{}", tag);
        match rest.to_ascii_lowercase().find(&needle) {
            Some(end) => {
                let text = &rest[..end];
                self.pos += end;
                match self.src[self.pos..].find('>') {
                    Some(close) => self.pos += close + 1,
                    None => self.pos = self.src.len(),
                }
                text
            }
            None => {
                self.pos = self.src.len();
                rest
            }
        }
    }
}

struct TreeBuilder<'d> {
    doc: &'d mut Document,
    /// Open elements; index 0 is the container and is never popped
    stack: Vec<NodeId>,
}

impl TreeBuilder<'_> {
    fn current(&self) -> NodeId {
        self.stack[self.stack.len() - 1]
    }

    fn open_tag(&self, index: usize) -> Option<&str> {
        self.doc.tag_name(self.stack[index])
    }

    /// Pop up to and including the nearest open element in `targets`,
    /// unless an element in `boundaries` is hit first
    fn close_within(&mut self, targets: &[&str], boundaries: &[&str]) {
        for index in (1..self.stack.len()).rev() {
            let Some(tag) = self.open_tag(index) else {
                continue;
            };
            if targets.contains(&tag) {
                self.stack.truncate(index);
                return;
            }
            if boundaries.contains(&tag) {
                return;
            }
        }
    }

    fn close_implied(&mut self, tag: &str) {
        if CLOSES_PARAGRAPH.contains(&tag) {
            self.close_within(&["p"], PARAGRAPH_SCOPE);
        }
        if HEADINGS.contains(&tag) {
            let current = self.current();
            if self.stack.len() > 1 && self.doc.tag_name(current).is_some_and(|t| HEADINGS.contains(&t)) {
                self.stack.pop();
            }
        }
        match tag {
            "li" => self.close_within(&["li"], &["ul", "ol", "table"]),
            "dt" | "dd" => self.close_within(&["dt", "dd"], &["dl", "table"]),
            "td" | "th" => self.close_within(&["td", "th"], &["tr", "table"]),
            "tr" => self.close_within(&["tr"], &["table", "tbody", "thead", "tfoot"]),
            "tbody" | "thead" | "tfoot" => {
                self.close_within(&["tbody", "thead", "tfoot"], &["table"])
            }
            "option" => self.close_within(&["option"], &["select", "datalist"]),
            _ => {}
        }
    }

    fn start_tag(
        &mut self,
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
        scanner: &mut Scanner<'_>,
    ) {
        self.close_implied(&name);
        let parent = self.current();
        let raw = is_raw_text(&name);
        let void = is_void(&name);
        let tag = name.clone();
        let id = self.doc.append(parent, NodeKind::Element { tag: name, attributes });

        if void || self_closing {
            return;
        }
        if raw {
            let text = scanner.raw_text(&tag);
            if !text.is_empty() {
                self.doc.append_text(id, text);
            }
            return;
        }
        self.stack.push(id);
    }

    fn end_tag(&mut self, name: &str) {
        for index in (1..self.stack.len()).rev() {
            if self.open_tag(index) == Some(name) {
                self.stack.truncate(index);
                return;
            }
        }
        // Unmatched end tags are dropped
    }
}

/// Parse `source` and append the resulting nodes under `container`
pub(crate) fn parse_into(doc: &mut Document, container: NodeId, source: &str) {
    let mut scanner = Scanner::new(source);
    let mut builder = TreeBuilder {
        doc,
        stack: vec![container],
    };

    while let Some(token) = scanner.next_token() {
        match token {
            HtmlToken::Text(text) => {
                let parent = builder.current();
                builder.doc.append_text(parent, text);
            }
            HtmlToken::StartTag {
                name,
                attributes,
                self_closing,
            } => builder.start_tag(name, attributes, self_closing, &mut scanner),
            HtmlToken::EndTag { name } => builder.end_tag(&name),
            HtmlToken::Comment(content) => {
                let parent = builder.current();
                builder.doc.append(
                    parent,
                    NodeKind::Comment {
                        content: content.to_string(),
                    },
                );
            }
            HtmlToken::Doctype(content) => {
                let parent = builder.current();
                builder.doc.append(
                    parent,
                    NodeKind::Doctype {
                        content: content.to_string(),
                    },
                );
            }
        }
    }
}

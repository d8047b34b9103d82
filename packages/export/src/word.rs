//! # Word Export
//!
//! Two renderings of the visible page for word processors:
//!
//! - [`compile_to_wordml`]: structured WordprocessingML 2003 XML
//! - [`compile_to_word_html`]: HTML with Office namespaces, saved as `.doc`

use beacon_dom::{escape_text, Document};

use crate::context::Context;
use crate::visible::{page_title, visible_blocks, visible_document, Block};

const DEFAULT_TITLE: &str = "Beacon Export";

#[derive(Debug, Clone)]
pub struct WordOptions {
    /// Document title; the page `<title>` when `None`
    pub title: Option<String>,

    /// Selectors of overlay containers to leave out
    pub ui_containers: Vec<String>,

    pub pretty: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            title: None,
            ui_containers: Vec::new(),
            pretty: true,
        }
    }
}

impl WordOptions {
    fn resolve_title(&self, doc: &Document) -> String {
        self.title
            .clone()
            .or_else(|| page_title(doc))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }
}

/// Page as a WordprocessingML 2003 document
pub fn compile_to_wordml(doc: &Document, options: &WordOptions) -> String {
    let mut ctx = Context::new(options.pretty);
    let title = options.resolve_title(doc);

    ctx.add_line(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    ctx.add_line(r#"<?mso-application progid="Word.Document"?>"#);
    ctx.add_line(
        r#"<w:wordDocument xmlns:w="http://schemas.microsoft.com/office/word/2003/wordml" xmlns:o="urn:schemas-microsoft-com:office:office">"#,
    );
    ctx.indent();

    ctx.add_line("<o:DocumentProperties>");
    ctx.indent();
    ctx.add_line(&format!("<o:Title>{}</o:Title>", escape_text(&title)));
    ctx.dedent();
    ctx.add_line("</o:DocumentProperties>");

    ctx.add_line("<w:body>");
    ctx.indent();
    for block in visible_blocks(doc, &options.ui_containers) {
        compile_block(&block, &mut ctx);
    }
    ctx.add_line("<w:sectPr/>");
    ctx.dedent();
    ctx.add_line("</w:body>");

    ctx.dedent();
    ctx.add_line("</w:wordDocument>");
    ctx.get_output()
}

fn compile_block(block: &Block, ctx: &mut Context) {
    match block {
        Block::Heading { level, text } => {
            let size = match level {
                1 => 48,
                2 => 36,
                3 => 28,
                _ => 24,
            };
            ctx.add_line(&format!(
                r#"<w:p><w:pPr><w:spacing w:before="240" w:after="120"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val="{}"/></w:rPr>{}</w:r></w:p>"#,
                size,
                text_run(text)
            ));
        }
        Block::Paragraph(text) => {
            ctx.add_line(&format!("<w:p><w:r>{}</w:r></w:p>", text_run(text)));
        }
        Block::ListItem(text) => {
            ctx.add_line(&format!(
                r#"<w:p><w:pPr><w:ind w:left="720"/></w:pPr><w:r>{}</w:r></w:p>"#,
                text_run(&format!("\u{2022} {}", text))
            ));
        }
        Block::Table(rows) => {
            ctx.add_line("<w:tbl>");
            ctx.indent();
            ctx.add_line(r#"<w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr>"#);
            for row in rows {
                ctx.add_line("<w:tr>");
                ctx.indent();
                for cell in row {
                    ctx.add_line(&format!("<w:tc><w:p><w:r>{}</w:r></w:p></w:tc>", text_run(cell)));
                }
                ctx.dedent();
                ctx.add_line("</w:tr>");
            }
            ctx.dedent();
            ctx.add_line("</w:tbl>");
        }
    }
}

fn text_run(text: &str) -> String {
    format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape_text(text))
}

/// Page as Word-flavoured HTML
pub fn compile_to_word_html(doc: &Document, options: &WordOptions) -> String {
    let mut ctx = Context::new(options.pretty);
    let title = options.resolve_title(doc);
    let visible = visible_document(doc, &options.ui_containers);
    let body = match visible.body() {
        Some(body) => visible.inner_html(body),
        None => visible.to_html(),
    };

    ctx.add_line(
        r#"<html xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:w="urn:schemas-microsoft-com:office:word" xmlns="http://www.w3.org/TR/REC-html40">"#,
    );
    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line(r#"<meta charset="utf-8">"#);
    ctx.add_line(&format!("<title>{}</title>", escape_text(&title)));
    ctx.add_line("<!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View><w:Zoom>100</w:Zoom></w:WordDocument></xml><![endif]-->");
    ctx.add_line("<style>body { font-family: Calibri, sans-serif; } table { border-collapse: collapse; } td, th { border: 1px solid #999; padding: 4px; }</style>");
    ctx.dedent();
    ctx.add_line("</head>");
    ctx.add_line("<body>");
    ctx.add(body.trim());
    ctx.add("\n");
    ctx.add_line("</body>");
    ctx.add_line("</html>");
    ctx.get_output()
}

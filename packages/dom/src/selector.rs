//! # CSS Selectors
//!
//! The subset of CSS selectors Beacon needs to find editable elements and to
//! resolve the paths produced by [`crate::derive_selector`]:
//!
//! - type, universal, `#id`, `.class`, `[attr]` and `[attr=value]`
//! - `:nth-of-type(n)`, `:first-of-type`, `:last-of-type`,
//!   `:first-child`, `:last-child`, `:nth-child(n)`
//! - descendant (whitespace) and child (`>`) combinators
//! - comma-separated lists
//!
//! Tokens come from a logos lexer; parsing is a small recursive descent
//! over the token vector, matching right to left.

use logos::Logos;
use std::ops::Range;

use crate::error::{SelectorError, SelectorResult};
use crate::node::{Document, NodeId};

#[derive(Logos, Debug, Clone, PartialEq)]
enum SelectorToken<'src> {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"-?[_a-zA-Z][_a-zA-Z0-9-]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"#[_a-zA-Z0-9-]+", |lex| &lex.slice()[1..])]
    Hash(&'src str),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<usize>().ok())]
    Number(usize),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    Str(&'src str),

    #[token(".")]
    Dot,
    #[token(">")]
    Child,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("*")]
    Star,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("=")]
    Equals,
}

fn describe(token: &SelectorToken<'_>) -> String {
    match token {
        SelectorToken::Whitespace => "whitespace".to_string(),
        SelectorToken::Ident(name) => format!("identifier '{}'", name),
        SelectorToken::Hash(id) => format!("'#{}'", id),
        SelectorToken::Number(n) => format!("number {}", n),
        SelectorToken::Str(s) => format!("string \"{}\"", s),
        SelectorToken::Dot => "'.'".to_string(),
        SelectorToken::Child => "'>'".to_string(),
        SelectorToken::Comma => "','".to_string(),
        SelectorToken::Colon => "':'".to_string(),
        SelectorToken::LParen => "'('".to_string(),
        SelectorToken::RParen => "')'".to_string(),
        SelectorToken::Star => "'*'".to_string(),
        SelectorToken::LBracket => "'['".to_string(),
        SelectorToken::RBracket => "']'".to_string(),
        SelectorToken::Equals => "'='".to_string(),
    }
}

/// Relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pseudo {
    NthOfType(usize),
    FirstOfType,
    LastOfType,
    NthChild(usize),
    FirstChild,
    LastChild,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    pub value: Option<String>,
}

/// Selector for a single element (`p.lead:nth-of-type(2)`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub ids: Vec<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttrSelector>,
    pub pseudos: Vec<Pseudo>,
}

/// Chain of compounds joined by combinators (`.card > p`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<Compound>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`
    pub combinators: Vec<Combinator>,
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn parse(source: &str) -> SelectorResult<Self> {
        SelectorParser::new(source)?.parse_list()
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(doc, node))
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag_name(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|wanted| wanted != tag) {
            return false;
        }
        if self.ids.iter().any(|id| doc.attr(node, "id") != Some(id.as_str())) {
            return false;
        }
        if !self.classes.iter().all(|class| doc.has_class(node, class)) {
            return false;
        }
        let attrs_match = self.attributes.iter().all(|attr| match (&attr.value, doc.attr(node, &attr.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        });
        if !attrs_match {
            return false;
        }
        self.pseudos.iter().all(|pseudo| pseudo_matches(doc, node, *pseudo))
    }
}

fn pseudo_matches(doc: &Document, node: NodeId, pseudo: Pseudo) -> bool {
    match pseudo {
        Pseudo::NthOfType(n) => doc.type_position(node).0 == n,
        Pseudo::FirstOfType => doc.type_position(node).0 == 1,
        Pseudo::LastOfType => {
            let (position, count) = doc.type_position(node);
            position == count
        }
        Pseudo::NthChild(n) => child_position(doc, node).0 == n,
        Pseudo::FirstChild => child_position(doc, node).0 == 1,
        Pseudo::LastChild => {
            let (position, count) = child_position(doc, node);
            position == count
        }
    }
}

fn child_position(doc: &Document, node: NodeId) -> (usize, usize) {
    let Some(parent) = doc.parent(node) else {
        return (1, 1);
    };
    let siblings: Vec<NodeId> = doc.element_children(parent).collect();
    let position = siblings.iter().position(|s| *s == node).map_or(1, |i| i + 1);
    (position, siblings.len().max(1))
}

impl ComplexSelector {
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            len => self.matches_at(doc, node, len - 1),
        }
    }

    fn matches_at(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent(node)
                .filter(|parent| doc.is_element(*parent))
                .is_some_and(|parent| self.matches_at(doc, parent, index - 1)),
            Combinator::Descendant => doc
                .ancestors(node)
                .filter(|ancestor| doc.is_element(*ancestor))
                .any(|ancestor| self.matches_at(doc, ancestor, index - 1)),
        }
    }
}

struct SelectorParser<'src> {
    tokens: Vec<(SelectorToken<'src>, Range<usize>)>,
    pos: usize,
    source: &'src str,
}

impl<'src> SelectorParser<'src> {
    fn new(source: &'src str) -> SelectorResult<Self> {
        let mut tokens = Vec::new();
        for (token, span) in SelectorToken::lexer(source).spanned() {
            match token {
                Ok(token) => tokens.push((token, span)),
                Err(()) => return Err(SelectorError::lexer(span.start, source)),
            }
        }
        Ok(Self { tokens, pos: 0, source })
    }

    fn peek(&self) -> Option<&SelectorToken<'src>> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len())
    }

    fn advance(&mut self) -> Option<SelectorToken<'src>> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        self.pos += 1;
        token
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while matches!(self.peek(), Some(SelectorToken::Whitespace)) {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }

    fn unexpected(&self, expected: &str) -> SelectorError {
        match self.peek() {
            Some(token) => SelectorError::unexpected_token(self.offset(), expected, describe(token)),
            None => SelectorError::unexpected_end(self.source.len(), expected),
        }
    }

    fn expect_ident(&mut self, expected: &str) -> SelectorResult<&'src str> {
        match self.peek() {
            Some(SelectorToken::Ident(name)) => {
                let name = *name;
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect(&mut self, wanted: SelectorToken<'src>, expected: &str) -> SelectorResult<()> {
        if self.peek() == Some(&wanted) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn parse_list(&mut self) -> SelectorResult<SelectorList> {
        let mut selectors = Vec::new();
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(SelectorToken::Comma) => {
                    self.pos += 1;
                }
                Some(_) => return Err(self.unexpected("',' or end of selector")),
            }
        }

        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> SelectorResult<ComplexSelector> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(SelectorToken::Comma) => break,
                Some(SelectorToken::Child) => {
                    self.pos += 1;
                    self.skip_whitespace();
                    combinators.push(Combinator::Child);
                }
                Some(_) if had_space => combinators.push(Combinator::Descendant),
                Some(_) => return Err(self.unexpected("combinator")),
            }
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> SelectorResult<Compound> {
        let mut compound = Compound::default();
        let mut seen_any = false;

        match self.peek() {
            Some(SelectorToken::Ident(name)) => {
                compound.tag = Some(name.to_ascii_lowercase());
                self.pos += 1;
                seen_any = true;
            }
            Some(SelectorToken::Star) => {
                self.pos += 1;
                seen_any = true;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some(SelectorToken::Hash(id)) => {
                    compound.ids.push(id.to_string());
                    self.pos += 1;
                }
                Some(SelectorToken::Dot) => {
                    self.pos += 1;
                    let class = self.expect_ident("class name")?;
                    compound.classes.push(class.to_string());
                }
                Some(SelectorToken::Colon) => {
                    self.pos += 1;
                    compound.pseudos.push(self.parse_pseudo()?);
                }
                Some(SelectorToken::LBracket) => {
                    self.pos += 1;
                    compound.attributes.push(self.parse_attribute()?);
                }
                _ => break,
            }
            seen_any = true;
        }

        if seen_any {
            Ok(compound)
        } else {
            Err(self.unexpected("selector"))
        }
    }

    fn parse_pseudo(&mut self) -> SelectorResult<Pseudo> {
        let name = self.expect_ident("pseudo-class name")?;
        match name {
            "nth-of-type" => Ok(Pseudo::NthOfType(self.parse_index_argument()?)),
            "nth-child" => Ok(Pseudo::NthChild(self.parse_index_argument()?)),
            "first-of-type" => Ok(Pseudo::FirstOfType),
            "last-of-type" => Ok(Pseudo::LastOfType),
            "first-child" => Ok(Pseudo::FirstChild),
            "last-child" => Ok(Pseudo::LastChild),
            other => Err(SelectorError::UnsupportedPseudo(other.to_string())),
        }
    }

    fn parse_index_argument(&mut self) -> SelectorResult<usize> {
        self.expect(SelectorToken::LParen, "'('")?;
        self.skip_whitespace();
        let index = match self.advance() {
            Some(SelectorToken::Number(n)) => n,
            _ => {
                self.pos -= 1;
                return Err(self.unexpected("index"));
            }
        };
        self.skip_whitespace();
        self.expect(SelectorToken::RParen, "')'")?;
        Ok(index)
    }

    fn parse_attribute(&mut self) -> SelectorResult<AttrSelector> {
        self.skip_whitespace();
        let name = self.expect_ident("attribute name")?.to_ascii_lowercase();
        self.skip_whitespace();

        let mut value = None;
        if self.peek() == Some(&SelectorToken::Equals) {
            self.pos += 1;
            self.skip_whitespace();
            value = Some(match self.advance() {
                Some(SelectorToken::Ident(v)) | Some(SelectorToken::Str(v)) => v.to_string(),
                Some(SelectorToken::Number(n)) => n.to_string(),
                _ => {
                    self.pos -= 1;
                    return Err(self.unexpected("attribute value"));
                }
            });
            self.skip_whitespace();
        }

        self.expect(SelectorToken::RBracket, "']'")?;
        Ok(AttrSelector { name, value })
    }
}

impl Document {
    /// All elements matching `list`, in document order
    pub fn select(&self, list: &SelectorList) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|node| list.matches(self, *node))
            .collect()
    }

    /// First element matching the selector text
    pub fn query_selector(&self, selector: &str) -> SelectorResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants(self.root())
            .into_iter()
            .find(|node| list.matches(self, *node)))
    }

    /// Every element matching the selector text, in document order
    pub fn query_selector_all(&self, selector: &str) -> SelectorResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self.select(&list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="hero">
            <div class="stat"><span class="num">42</span><span class="label">users</span></div>
        </div>
        <section id="intro">
            <p class="lead">First</p>
            <p>Second</p>
            <div class="card"><h2>Card</h2><p>Body</p></div>
        </section>
    </body></html>"#;

    fn texts(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
        nodes.iter().map(|n| doc.inner_html(*n)).collect()
    }

    #[test]
    fn test_parse_structure() {
        let list = SelectorList::parse("div.card > p:nth-of-type(2), #intro h2").unwrap();
        assert_eq!(list.selectors.len(), 2);

        let first = &list.selectors[0];
        assert_eq!(first.combinators, vec![Combinator::Child]);
        assert_eq!(first.compounds[0].tag.as_deref(), Some("div"));
        assert_eq!(first.compounds[0].classes, vec!["card"]);
        assert_eq!(first.compounds[1].pseudos, vec![Pseudo::NthOfType(2)]);

        let second = &list.selectors[1];
        assert_eq!(second.combinators, vec![Combinator::Descendant]);
        assert_eq!(second.compounds[0].ids, vec!["intro"]);
    }

    #[test]
    fn test_descendant_and_child() {
        let doc = Document::parse(PAGE);
        let nodes = doc.query_selector_all(".hero .stat .num").unwrap();
        assert_eq!(texts(&doc, &nodes), vec!["42"]);

        let nodes = doc.query_selector_all("section > p").unwrap();
        assert_eq!(texts(&doc, &nodes), vec!["First", "Second"]);

        let nodes = doc.query_selector_all(".card p").unwrap();
        assert_eq!(texts(&doc, &nodes), vec!["Body"]);
    }

    #[test]
    fn test_nth_of_type() {
        let doc = Document::parse(PAGE);
        let node = doc
            .query_selector("#intro > p:nth-of-type(2)")
            .unwrap()
            .unwrap();
        assert_eq!(doc.inner_html(node), "Second");

        let node = doc.query_selector("p:first-of-type").unwrap().unwrap();
        assert_eq!(doc.inner_html(node), "First");
    }

    #[test]
    fn test_list_keeps_document_order() {
        let doc = Document::parse(PAGE);
        let nodes = doc.query_selector_all("h2, .lead").unwrap();
        assert_eq!(texts(&doc, &nodes), vec!["First", "Card"]);
    }

    #[test]
    fn test_attribute_selectors() {
        let doc = Document::parse(r#"<p data-x="1">a</p><p data-x="2">b</p><p>c</p>"#);
        let nodes = doc.query_selector_all("[data-x]").unwrap();
        assert_eq!(nodes.len(), 2);
        let nodes = doc.query_selector_all("p[data-x=\"2\"]").unwrap();
        assert_eq!(texts(&doc, &nodes), vec!["b"]);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(matches!(SelectorList::parse(""), Err(SelectorError::Empty)));
        assert!(SelectorList::parse("p >").is_err());
        assert!(SelectorList::parse("p:hover").is_err());
        assert!(SelectorList::parse("p$").is_err());
        assert!(SelectorList::parse(".").is_err());
    }

    #[test]
    fn test_no_match_is_none() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.query_selector("#missing").unwrap(), None);
    }
}

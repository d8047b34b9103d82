//! # Beacon DOM
//!
//! Minimal HTML document model behind Beacon's editable surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ html: markup → arena tree (lenient)         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ node: Document / NodeId navigation          │
//! │  - inner/outer HTML, set_inner_html         │
//! │  - attributes, classes, sibling positions   │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ selector: CSS lookup │  │ derive: element →    │
//! │ (logos lexer)        │  │ stable selector path │
//! └──────────────────────┘  └──────────────────────┘
//! ```
//!
//! Text is stored as written, so a fragment assigned with
//! [`Document::set_inner_html`] reads back unchanged through
//! [`Document::inner_html`]. That byte-for-byte stability is what the
//! editor's snapshot diff relies on.

mod derive;
mod error;
mod html;
mod node;
mod selector;
mod serializer;

pub use derive::{derive_selector, RESERVED_CLASS_PREFIX};
pub use error::{SelectorError, SelectorResult};
pub use html::{is_void, VOID_ELEMENTS};
pub use node::{Ancestors, Document, NodeId, NodeKind};
pub use selector::{AttrSelector, Combinator, ComplexSelector, Compound, Pseudo, SelectorList};
pub use serializer::{decode_entities, escape_text, strip_tags};

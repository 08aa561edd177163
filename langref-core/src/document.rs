//! Compiled documents
//!
//!     A document body is either plain data (from a YAML file) or a markup tree (from a Markdown
//!     file). Both serialize to the exact JSON written to disk: data is emitted as-is, markup as
//!     an mdast-style tree rooted at `{"type": "root"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::slug::Slug;

/// Markup node tree.
///
/// Serialized with a camelCase `type` tag, e.g. `{"type": "inlineCode", "value": "x"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Root {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frontmatter: Option<Value>,
        children: Vec<Node>,
    },
    Heading {
        depth: u8,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Text {
        value: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Delete {
        children: Vec<Node>,
    },
    InlineCode {
        value: String,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<String>,
        value: String,
    },
    List {
        ordered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<usize>,
        spread: bool,
        children: Vec<Node>,
    },
    ListItem {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
        children: Vec<Node>,
    },
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Blockquote {
        children: Vec<Node>,
    },
    ThematicBreak,
    Break,
    Html {
        value: String,
    },
    Table {
        children: Vec<Node>,
    },
    TableRow {
        header: bool,
        children: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root { children, .. }
            | Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Delete { children }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Link { children, .. }
            | Node::Blockquote { children }
            | Node::Table { children }
            | Node::TableRow { children, .. }
            | Node::TableCell { children } => children,
            Node::Text { .. }
            | Node::InlineCode { .. }
            | Node::Code { .. }
            | Node::ThematicBreak
            | Node::Break
            | Node::Image { .. }
            | Node::Html { .. } => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { value } | Node::InlineCode { value } | Node::Code { value, .. } => {
                out.push_str(value)
            }
            Node::Image { alt, .. } => out.push_str(alt.as_deref().unwrap_or_default()),
            Node::Break => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Parsed content of one authored file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DocumentBody {
    Markup(Node),
    Data(Value),
}

impl DocumentBody {
    /// Interpret an artifact's JSON. A value is markup only if it decodes as a `root` node that
    /// re-encodes to exactly the same JSON; everything else, including data that merely has a
    /// `type: root` key, is kept as data.
    pub fn from_value(value: Value) -> Self {
        if value.get("type").and_then(Value::as_str) == Some("root") {
            if let Ok(node @ Node::Root { .. }) = Node::deserialize(&value) {
                if serde_json::to_value(&node).is_ok_and(|encoded| encoded == value) {
                    return DocumentBody::Markup(node);
                }
            }
        }
        DocumentBody::Data(value)
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            DocumentBody::Data(value) => Some(value),
            DocumentBody::Markup(_) => None,
        }
    }

    pub fn as_markup(&self) -> Option<&Node> {
        match self {
            DocumentBody::Markup(node) => Some(node),
            DocumentBody::Data(_) => None,
        }
    }
}

/// One compiled language or dialect document.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageDocument {
    pub slug: Slug,
    pub source: PathBuf,
    pub body: DocumentBody,
}

impl LanguageDocument {
    pub fn new(slug: Slug, source: impl Into<PathBuf>, body: DocumentBody) -> Self {
        Self {
            slug,
            source: source.into(),
            body,
        }
    }
}

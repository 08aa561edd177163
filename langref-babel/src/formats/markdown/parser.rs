//! Markdown parsing (Markdown → Node tree)
//!
//! Pipeline: Markdown string → Comrak AST → langref Node tree

use crate::error::FormatError;
use crate::formats::yaml::parse_yaml_value;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, Options};
use langref_core::Node;
use serde_json::Value;

const FRONT_MATTER_DELIMITER: &str = "---";

/// Parse Markdown string to a `root` node
pub fn parse_markdown(source: &str) -> Result<Node, FormatError> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut frontmatter = None;
    let mut children = Vec::new();
    for child in root.children() {
        let front = match &child.data.borrow().value {
            NodeValue::FrontMatter(raw) => Some(raw.clone()),
            _ => None,
        };
        match front {
            Some(raw) => frontmatter = parse_front_matter(&raw)?,
            None => push_node(&mut children, convert_node(child)?),
        }
    }

    Ok(Node::Root {
        frontmatter,
        children,
    })
}

fn default_comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.front_matter_delimiter = Some(FRONT_MATTER_DELIMITER.to_string());
    options
}

fn parse_front_matter(raw: &str) -> Result<Option<Value>, FormatError> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix(FRONT_MATTER_DELIMITER)
        .and_then(|rest| rest.strip_suffix(FRONT_MATTER_DELIMITER))
        .unwrap_or(trimmed);
    match parse_yaml_value(inner) {
        Ok(Value::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(e) => Err(FormatError::parse("markdown", format!("front matter: {}", e))),
    }
}

/// Convert the children of a comrak node, merging adjacent text runs
fn convert_children<'a>(node: &'a AstNode<'a>) -> Result<Vec<Node>, FormatError> {
    let mut children = Vec::new();
    for child in node.children() {
        push_node(&mut children, convert_node(child)?);
    }
    Ok(children)
}

fn push_node(nodes: &mut Vec<Node>, node: Option<Node>) {
    let Some(node) = node else {
        return;
    };
    if let (Some(Node::Text { value: last }), Node::Text { value }) = (nodes.last_mut(), &node) {
        last.push_str(value);
        return;
    }
    nodes.push(node);
}

/// Convert one comrak node. Node kinds with no counterpart are dropped.
fn convert_node<'a>(node: &'a AstNode<'a>) -> Result<Option<Node>, FormatError> {
    let node_data = node.data.borrow();

    let converted = match &node_data.value {
        NodeValue::Heading(heading) => Node::Heading {
            depth: heading.level,
            children: convert_children(node)?,
        },

        NodeValue::Paragraph => Node::Paragraph {
            children: convert_children(node)?,
        },

        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            Node::List {
                ordered,
                start: ordered.then_some(list.start),
                spread: !list.tight,
                children: convert_children(node)?,
            }
        }

        NodeValue::Item(_) => Node::ListItem {
            checked: None,
            children: convert_children(node)?,
        },

        // `[x]` and `[X]` are checked, `[ ]` is not.
        NodeValue::TaskItem(symbol) => Node::ListItem {
            checked: Some(symbol.is_some()),
            children: convert_children(node)?,
        },

        NodeValue::CodeBlock(code_block) => {
            let (lang, meta) = split_info_string(&code_block.info);
            let literal = &code_block.literal;
            Node::Code {
                lang,
                meta,
                value: literal.strip_suffix('\n').unwrap_or(literal).to_string(),
            }
        }

        NodeValue::BlockQuote => Node::Blockquote {
            children: convert_children(node)?,
        },

        NodeValue::ThematicBreak => Node::ThematicBreak,

        NodeValue::HtmlBlock(html) => Node::Html {
            value: html.literal.trim_end().to_string(),
        },

        NodeValue::Table(_) => Node::Table {
            children: convert_children(node)?,
        },

        NodeValue::TableRow(header) => Node::TableRow {
            header: *header,
            children: convert_children(node)?,
        },

        NodeValue::TableCell => Node::TableCell {
            children: convert_children(node)?,
        },

        NodeValue::Text(text) => Node::text(text.clone()),

        NodeValue::SoftBreak => Node::text("\n"),

        NodeValue::LineBreak => Node::Break,

        NodeValue::Emph => Node::Emphasis {
            children: convert_children(node)?,
        },

        NodeValue::Strong => Node::Strong {
            children: convert_children(node)?,
        },

        NodeValue::Strikethrough => Node::Delete {
            children: convert_children(node)?,
        },

        NodeValue::Code(code) => Node::InlineCode {
            value: code.literal.clone(),
        },

        NodeValue::HtmlInline(html) => Node::Html {
            value: html.clone(),
        },

        NodeValue::Link(link) => Node::Link {
            url: link.url.clone(),
            title: non_empty(&link.title),
            children: convert_children(node)?,
        },

        NodeValue::Image(link) => {
            let alt: String = convert_children(node)?.iter().map(Node::plain_text).collect();
            Node::Image {
                url: link.url.clone(),
                title: non_empty(&link.title),
                alt: non_empty(&alt),
            }
        }

        _ => return Ok(None),
    };

    Ok(Some(converted))
}

fn split_info_string(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => (non_empty(lang), non_empty(meta.trim())),
        None => (non_empty(info), None),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

//! Typed render tree
//!
//! Markup is built as a tree of elements and text nodes instead of templated
//! strings, so structure and escaping are type-checked: text and attribute
//! values are HTML-escaped at serialization time, and there is no way to
//! inject raw markup through a text node.

use std::fmt::Write;

/// A node of the render tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Node>,
    },
    Text(String),
}

/// Start an element node
pub fn el(tag: &'static str) -> Node {
    Node::Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

/// A text node; escaped when serialized
pub fn text(value: impl Into<String>) -> Node {
    Node::Text(value.into())
}

impl Node {
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Node::Element { ref mut attrs, .. } = self {
            attrs.push((name, value.into()));
        }
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: Node) -> Self {
        if let Node::Element { ref mut children, .. } = self {
            children.push(node);
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element { ref mut children, .. } = self {
            children.extend(nodes);
        }
        self
    }

    /// Shorthand for appending a single text child
    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(text(value))
    }

    /// Serialize to HTML, escaping all text and attribute values
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(value) => escape_into(value, out),
            Node::Element { tag, attrs, children } => {
                let _ = write!(out, "<{}", tag);
                for (name, value) in attrs {
                    let _ = write!(out, " {}=\"", name);
                    escape_into(value, out);
                    out.push('"');
                }
                if children.is_empty() && is_void(tag) {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "input")
}

fn escape_into(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

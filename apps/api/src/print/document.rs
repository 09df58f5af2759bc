//! Typed HTML document tree.
//!
//! Text and attribute values are escaped at serialization time; callers never
//! splice markup strings together. The only unescaped text is the content of
//! raw-text elements (`style`), which is generated internally.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Normal,
    /// HTML void element, e.g. `<meta>`.
    Void,
    /// Foreign (SVG) element written as `<line ... />`.
    SelfClosing,
    /// Children written verbatim, e.g. `<style>`.
    RawText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    kind: ElementKind,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self::with_kind(tag, ElementKind::Normal)
    }

    pub fn void(tag: &'static str) -> Self {
        Self::with_kind(tag, ElementKind::Void)
    }

    pub fn self_closing(tag: &'static str) -> Self {
        Self::with_kind(tag, ElementKind::SelfClosing)
    }

    pub fn raw_text(tag: &'static str, content: impl Into<String>) -> Self {
        let mut element = Self::with_kind(tag, ElementKind::RawText);
        element.children.push(Node::Text(content.into()));
        element
    }

    fn with_kind(tag: &'static str, kind: ElementKind) -> Self {
        Self {
            tag,
            kind,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// Children are ignored for void and self-closing elements.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Counts this element and its descendants carrying `class`.
    pub fn count_by_class(&self, class: &str) -> usize {
        let own = usize::from(self.has_class(class));
        own + self
            .children
            .iter()
            .map(|child| match child {
                Node::Element(e) => e.count_by_class(class),
                Node::Text(_) => 0,
            })
            .sum::<usize>()
    }

    /// This element and all descendants carrying `class`, in document order.
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(e) = child {
                e.collect_by_class(class, found);
            }
        }
    }

    /// Direct element children carrying `class`.
    pub fn children_by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter_map(move |child| match child {
            Node::Element(e) if e.has_class(class) => Some(e),
            _ => None,
        })
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
        }

        match self.kind {
            ElementKind::Void => {
                out.push('>');
                return;
            }
            ElementKind::SelfClosing => {
                out.push_str(" />");
                return;
            }
            ElementKind::Normal | ElementKind::RawText => out.push('>'),
        }

        for child in &self.children {
            match child {
                Node::Element(e) => e.write_to(out),
                Node::Text(t) if self.kind == ElementKind::RawText => out.push_str(t),
                Node::Text(t) => out.push_str(&escape_text(t)),
            }
        }

        let _ = write!(out, "</{}>", self.tag);
    }
}

/// A complete HTML document rooted at `<html>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        self.root.write_to(&mut out);
        out.push('\n');
        out
    }
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

//! Minimal owned element tree built from `quick-xml` events.
//!
//! Doxygen files are small enough to hold in memory, and the description
//! markup is much easier to convert from a tree than from a stream.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Trimmed text of the named child, empty when absent.
    pub fn child_text(&self, name: &str) -> String {
        self.child(name)
            .map(|el| el.text().trim().to_string())
            .unwrap_or_default()
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for node in &el.children {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

/// Parse `source` and return its document element. A document without any
/// element yields an unnamed, empty element.
pub fn parse(source: &str) -> Result<Element, quick_xml::Error> {
    let mut reader = Reader::from_str(source);
    // stack[0] collects top-level nodes
    let mut stack: Vec<Element> = vec![Element::default()];

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open(&start)?),
            Event::Empty(start) => {
                let el = open(&start)?;
                append(&mut stack, Node::Element(el));
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some(done) = stack.pop() {
                        append(&mut stack, Node::Element(done));
                    }
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?.into_owned();
                append(&mut stack, Node::Text(text));
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                append(&mut stack, Node::Text(text));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // unterminated elements are folded into their parents
    while stack.len() > 1 {
        if let Some(done) = stack.pop() {
            append(&mut stack, Node::Element(done));
        }
    }

    let document = stack.pop().unwrap_or_default();
    Ok(document
        .children
        .into_iter()
        .find_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
        .unwrap_or_default())
}

fn open(start: &BytesStart) -> Result<Element, quick_xml::Error> {
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((key, value));
    }
    Ok(Element {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        attrs,
        children: Vec::new(),
    })
}

fn append(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

//! Owned XML element tree
//!
//! A small read-modify-write tree on top of `quick-xml`. It keeps element
//! order and attribute order so a document can be loaded, edited in place
//! and written back without losing anything syndex doesn't understand.
//!
//! Comments, processing instructions and the doctype are not kept. CDATA
//! sections are read as plain text and written back escaped.

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Indentation used by [`to_pretty_string`]
const INDENT_WIDTH: usize = 2;

/// Errors from parsing or serializing a tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("{0}")]
    Syntax(String),

    #[error("no root element")]
    NoRoot,

    #[error("unexpected content after the root element")]
    TrailingContent,

    #[error("text outside the root element")]
    TextOutsideRoot,

    #[error("unclosed element <{0}>")]
    Unclosed(String),

    #[error("invalid UTF-8 in {0}")]
    Encoding(String),

    #[error("failed to write XML: {0}")]
    Write(String),
}

/// A child of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attribute`]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder form of [`Element::set_text`]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Builder form of [`Element::push_child`]
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(pos).1)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Iterate over child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Mutable form of [`Element::elements`]
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Iterate over child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.name == name)
    }

    /// Index (among all child nodes) of the first element with the given name
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.name == name))
    }

    /// Insert a child node, clamping `index` to the number of children
    pub fn insert_child(&mut self, index: usize, node: Node) {
        let index = index.min(self.children.len());
        self.children.insert(index, node);
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Remove the first child element with the given name
    ///
    /// Returns the element and the node index it was removed from.
    pub fn take_child(&mut self, name: &str) -> Option<(usize, Element)> {
        let index = self.position_of(name)?;
        match self.children.remove(index) {
            Node::Element(el) => Some((index, el)),
            Node::Text(_) => None,
        }
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Replace all direct text with `text`, keeping child elements
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.clear_text();
        self.children.insert(0, Node::Text(text.into()));
    }

    pub fn clear_text(&mut self) {
        self.children.retain(|node| matches!(node, Node::Element(_)));
    }
}

/// Parse a string holding exactly one root element
pub fn parse(input: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Syntax(format!("at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::TrailingContent);
                }
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                // quick-xml has already checked that the end tag matches
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Syntax("unexpected end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| XmlError::Syntax(e.to_string()))?;
                push_text(&mut stack, text)?;
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|_| XmlError::Encoding("CDATA section".to_string()))?
                    .to_string();
                push_text(&mut stack, Cow::Owned(text))?;
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|_| XmlError::Encoding("element name".to_string()))?
        .to_string();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Syntax(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| XmlError::Encoding("attribute name".to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Syntax(e.to_string()))?;
        element.set_attribute(key, value.into_owned());
    }

    Ok(element)
}

/// Attach a finished element to its parent, or make it the root
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_child(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(XmlError::TrailingContent),
    }
}

fn push_text(stack: &mut [Element], text: Cow<'_, str>) -> Result<(), XmlError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text.into_owned()));
            Ok(())
        }
        None => Err(XmlError::TextOutsideRoot),
    }
}

/// Serialize with an XML declaration and two-space indentation
///
/// Elements holding only text stay on one line, empty elements are
/// self-closed and blank lines are dropped.
pub fn to_pretty_string(root: &Element) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .map_err(|e| XmlError::Write(e.to_string()))?;
    write_element(&mut writer, root)?;

    let raw = String::from_utf8(writer.into_inner())
        .map_err(|_| XmlError::Encoding("serialized output".to_string()))?;
    Ok(raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Serialize without declaration or indentation
pub fn to_compact_string(root: &Element) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner())
        .map_err(|_| XmlError::Encoding("serialized output".to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| XmlError::Write(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| XmlError::Write(e.to_string()))?;

    for child in &element.children {
        match child {
            Node::Element(el) => write_element(writer, el)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| XmlError::Write(e.to_string()))?,
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| XmlError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let root = parse(r#"<rss version="2.0"><channel><title>Links</title></channel></rss>"#)
            .unwrap();

        assert_eq!(root.name(), "rss");
        assert_eq!(root.attribute("version"), Some("2.0"));
        let channel = root.child("channel").unwrap();
        assert_eq!(channel.child("title").unwrap().text(), "Links");
    }

    #[test]
    fn test_parse_drops_whitespace_between_elements() {
        let root = parse("<item>\n  <link>http://e.co</link>\n</item>\n").unwrap();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.child("link").unwrap().text(), "http://e.co");
    }

    #[test]
    fn test_parse_unescapes_text_and_attributes() {
        let root = parse(r#"<a note="x &amp; y">Tom &amp; Jerry</a>"#).unwrap();
        assert_eq!(root.text(), "Tom & Jerry");
        assert_eq!(root.attribute("note"), Some("x & y"));
    }

    #[test]
    fn test_parse_cdata_as_text() {
        let root = parse("<description><![CDATA[<b>bold</b>]]></description>").unwrap();
        assert_eq!(root.text(), "<b>bold</b>");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse("").is_err());
        assert!(parse("not xml at all").is_err());
        assert!(parse("<a><b></a>").is_err());
        assert!(parse("<a>").is_err());
        assert!(parse("<a/><b/>").is_err());
    }

    #[test]
    fn test_pretty_string_layout() {
        let root = Element::new("rss").with_attribute("version", "2.0").with_child(
            Element::new("channel")
                .with_child(Element::new("title").with_attribute("unspecified", "true"))
                .with_child(
                    Element::new("item").with_child(Element::new("link").with_text("http://e.co")),
                ),
        );

        let xml = to_pretty_string(&root).unwrap();
        let expected = [
            r#"<?xml version="1.0"?>"#,
            r#"<rss version="2.0">"#,
            r#"  <channel>"#,
            r#"    <title unspecified="true"/>"#,
            r#"    <item>"#,
            r#"      <link>http://e.co</link>"#,
            r#"    </item>"#,
            r#"  </channel>"#,
            r#"</rss>"#,
        ]
        .join("\n");
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_pretty_string_escapes_text() {
        let root = Element::new("title").with_text("a < b & c");
        let xml = to_pretty_string(&root).unwrap();
        assert!(xml.contains("<title>a &lt; b &amp; c</title>"));

        let reparsed = parse(&xml).unwrap();
        assert_eq!(reparsed.text(), "a < b & c");
    }

    #[test]
    fn test_compact_string() {
        let root = Element::new("a").with_child(Element::new("b").with_text("c"));
        assert_eq!(to_compact_string(&root).unwrap(), "<a><b>c</b></a>");
    }

    #[test]
    fn test_set_text_keeps_child_elements() {
        let mut el = Element::new("a").with_child(Element::new("b"));
        el.set_text("one");
        el.set_text("two");
        assert_eq!(el.text(), "two");
        assert!(el.child("b").is_some());

        el.clear_text();
        assert_eq!(el.text(), "");
        assert_eq!(el.children().len(), 1);
    }

    #[test]
    fn test_attribute_replace_and_remove() {
        let mut el = Element::new("title").with_attribute("unspecified", "true");
        el.set_attribute("unspecified", "false");
        assert_eq!(el.attribute("unspecified"), Some("false"));
        assert_eq!(el.remove_attribute("unspecified"), Some("false".to_string()));
        assert_eq!(el.remove_attribute("unspecified"), None);
    }

    #[test]
    fn test_take_child() {
        let mut root = Element::new("rss")
            .with_child(Element::new("meta"))
            .with_child(Element::new("channel"));

        let (index, channel) = root.take_child("channel").unwrap();
        assert_eq!(index, 1);
        assert_eq!(channel.name(), "channel");
        assert!(root.child("channel").is_none());
    }
}

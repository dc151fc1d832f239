//! Minimal mutable XML element tree for OOXML parts.
//!
//! Elements keep their qualified names (`w:p`, `w:rPr`) and attribute order
//! exactly as read, so untouched markup round-trips unchanged. Comments and
//! processing instructions are dropped; the XML declaration is regenerated
//! on save.

use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

fn xml_err(err: impl std::fmt::Display) -> Error {
    Error::Xml(err.to_string())
}

/// A child node of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Qualified name, e.g. `w:p`
    pub name: String,
    /// Attributes in document order
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder: add a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder: add a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Local part of the name (after the prefix).
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Get an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter().position(|(k, _)| *k == key) {
            Some(index) => self.attrs[index].1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(index).1)
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// First child element with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Whether a child element with the given name exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Append a child element and return it.
    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(Node::Element(child));
        let last = self.children.len() - 1;
        self.element_at_mut(last)
    }

    /// Append a text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Remove all child elements with the given name; returns how many were removed.
    pub fn remove_children(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, Node::Element(e) if e.name == name));
        before - self.children.len()
    }

    /// Get the named child, inserting it as the first child when absent.
    pub fn get_or_insert_first(&mut self, name: &str) -> &mut Element {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                self.children.insert(0, Node::Element(Element::new(name)));
                0
            }
        };
        self.element_at_mut(index)
    }

    /// Get the named child, inserting it at its schema position when absent.
    ///
    /// `order` lists sibling names in schema sequence; siblings not in the
    /// list are ignored when choosing the position.
    pub fn get_or_insert(&mut self, name: &str, order: &[&str]) -> &mut Element {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                let index = self.ordered_index(name, order);
                self.children.insert(index, Node::Element(Element::new(name)));
                index
            }
        };
        self.element_at_mut(index)
    }

    /// Insert `child` at its schema position, after any siblings of the same name.
    pub fn insert_ordered(&mut self, child: Element, order: &[&str]) -> &mut Element {
        let index = self.ordered_index(&child.name, order);
        self.children.insert(index, Node::Element(child));
        self.element_at_mut(index)
    }

    /// Replace every child with the same name by `child`, placed at its schema position.
    pub fn replace_child(&mut self, child: Element, order: &[&str]) -> &mut Element {
        self.remove_children(&child.name);
        let index = self.ordered_index(&child.name, order);
        self.children.insert(index, Node::Element(child));
        self.element_at_mut(index)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// All descendant elements with the given name, in document order.
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in self.elements() {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    /// Visit every descendant element (pre-order) mutably.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        for child in self.elements_mut() {
            f(child);
            child.walk_mut(f);
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.name == name))
    }

    fn ordered_index(&self, name: &str, order: &[&str]) -> usize {
        let Some(rank) = order.iter().position(|n| *n == name) else {
            return self.children.len();
        };
        self.children
            .iter()
            .position(|node| match node {
                Node::Element(e) => order
                    .iter()
                    .position(|n| *n == e.name)
                    .is_some_and(|r| r > rank),
                Node::Text(_) => false,
            })
            .unwrap_or(self.children.len())
    }

    fn element_at_mut(&mut self, index: usize) -> &mut Element {
        match &mut self.children[index] {
            Node::Element(e) => e,
            Node::Text(_) => unreachable!("index {} does not hold an element", index),
        }
    }

    /// Parse an XML document and return its root element.
    pub fn parse(bytes: &[u8]) -> Result<Element> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(xml_err)? {
                Event::Start(ref e) => stack.push(Self::from_start(e)?),
                Event::Empty(ref e) => {
                    let element = Self::from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => return Ok(element),
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("Unbalanced end tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => return Ok(element),
                    }
                }
                Event::Text(ref t) => {
                    if let Some(current) = stack.last_mut() {
                        let text = t.unescape().map_err(xml_err)?;
                        current.children.push(Node::Text(text.into_owned()));
                    }
                }
                Event::CData(ref c) => {
                    if let Some(current) = stack.last_mut() {
                        let text = String::from_utf8(c.to_vec())
                            .map_err(|_| Error::Xml("Invalid UTF-8 in CDATA".to_string()))?;
                        current.children.push(Node::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Err(Error::Xml("No root element found".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element> {
        let name = String::from_utf8(start.name().as_ref().to_vec())
            .map_err(|_| Error::Xml("Invalid UTF-8 in tag name".to_string()))?;
        let mut element = Element::new(name);
        for attr in start.attributes() {
            let attr = attr.map_err(xml_err)?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())
                .map_err(|_| Error::Xml("Invalid UTF-8 in attribute key".to_string()))?;
            let value = attr.unescape_value().map_err(xml_err)?.into_owned();
            element.attrs.push((key, value));
        }
        Ok(element)
    }

    /// Serialize as a standalone XML document.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;
        writer.get_mut().write_all(b"\r\n")?;
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(xml_err)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(xml_err)?;
        for node in &self.children {
            match node {
                Node::Element(e) => e.write_to(writer)?,
                Node::Text(t) => writer
                    .write_event(Event::Text(BytesText::new(t)))
                    .map_err(xml_err)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(xml_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">A &amp; B </w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;

    #[test]
    fn test_parse_structure() {
        let root = Element::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(root.name, "w:document");
        assert_eq!(root.local_name(), "document");
        let body = root.child("w:body").unwrap();
        assert_eq!(body.elements().count(), 2);
        assert_eq!(body.text(), "A & B ");
        assert!(body.has_child("w:sectPr"));
    }

    #[test]
    fn test_roundtrip_escapes() {
        let root = Element::parse(SAMPLE.as_bytes()).unwrap();
        let bytes = root.to_xml().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(text.contains("A &amp; B "));
        assert_eq!(Element::parse(&bytes).unwrap(), root);
    }

    #[test]
    fn test_attributes() {
        let mut el = Element::new("w:lang").with_attr("w:val", "en-US");
        el.set_attr("w:val", "fr-CA");
        el.set_attr("w:bidi", "fr-CA");
        assert_eq!(el.attr("w:val"), Some("fr-CA"));
        assert_eq!(el.attrs.len(), 2);
        assert_eq!(el.remove_attr("w:bidi").as_deref(), Some("fr-CA"));
        assert_eq!(el.attr("w:bidi"), None);
    }

    #[test]
    fn test_get_or_insert_respects_order() {
        let order = ["w:rFonts", "w:b", "w:color", "w:sz", "w:lang"];
        let mut rpr = Element::new("w:rPr")
            .with_child(Element::new("w:b"))
            .with_child(Element::new("w:lang"));

        rpr.get_or_insert("w:sz", &order);
        rpr.get_or_insert("w:rFonts", &order);
        rpr.get_or_insert("w:b", &order);

        let names: Vec<&str> = rpr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["w:rFonts", "w:b", "w:sz", "w:lang"]);
    }

    #[test]
    fn test_replace_child() {
        let order = ["w:spacing", "w:jc"];
        let mut ppr = Element::new("w:pPr")
            .with_child(Element::new("w:jc"))
            .with_child(Element::new("w:spacing").with_attr("w:before", "100"));

        ppr.replace_child(Element::new("w:spacing").with_attr("w:before", "0"), &order);

        let names: Vec<&str> = ppr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["w:spacing", "w:jc"]);
        assert_eq!(ppr.child("w:spacing").unwrap().attr("w:before"), Some("0"));
    }

    #[test]
    fn test_get_or_insert_first() {
        let mut p = Element::new("w:p").with_child(Element::new("w:r"));
        p.get_or_insert_first("w:pPr");
        assert_eq!(p.elements().next().unwrap().name, "w:pPr");
        p.get_or_insert_first("w:pPr");
        assert_eq!(p.elements().count(), 2);
    }

    #[test]
    fn test_descendants_and_walk() {
        let mut root = Element::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(root.descendants("w:t").len(), 1);

        let mut count = 0;
        root.walk_mut(&mut |e| {
            if e.name == "w:r" {
                e.push(Element::new("w:tab"));
                count += 1;
            }
        });
        assert_eq!(count, 1);
        assert_eq!(root.descendants("w:tab").len(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Element::parse(b"").is_err());
        assert!(Element::parse(b"<a><b></a>").is_err());
    }
}

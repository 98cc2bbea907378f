//! Layout document - element tree, wire tags and XML I/O
//!
//! The document is a plain element tree: a tag, ordered attributes and child
//! elements. Text content carries no meaning and is dropped while parsing.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{LayoutError, Result};

/// Tag of the document root
pub const ROOT_ELEMENT: &str = "DockStation";

/// Tag of the section listing floating leaves
pub const FLOATING_TAG: &str = "floating";

/// Attribute names
pub mod attr {
    pub const NAME: &str = "name";
    pub const INDEX: &str = "index";
    pub const DIVIDER_POSITIONS: &str = "dividerPositions";
    pub const ORIENTATION: &str = "orientation";
    pub const POSITION_X: &str = "position-x";
    pub const POSITION_Y: &str = "position-y";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
}

// ============================================================================
// Element kinds
// ============================================================================

/// Semantic element kinds and their fixed wire tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Splitter,
    Tabber,
    SubStation,
    Leaf,
}

impl ElementKind {
    pub const fn tag(&self) -> &'static str {
        match self {
            ElementKind::Splitter => "DockSplitterContainer",
            ElementKind::Tabber => "DockTabberContainer",
            ElementKind::SubStation => "DockSubStation",
            ElementKind::Leaf => "DockNode",
        }
    }

    pub fn from_tag(tag: &str) -> Option<ElementKind> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub const ALL: [ElementKind; 4] = [
        ElementKind::Splitter,
        ElementKind::Tabber,
        ElementKind::SubStation,
        ElementKind::Leaf,
    ];
}

// ============================================================================
// Elements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn of_kind(kind: ElementKind) -> Self {
        Self::new(kind.tag())
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn kind(&self) -> Option<ElementKind> {
        ElementKind::from_tag(&self.name)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attr(&self, key: &str) -> Result<&str> {
        self.attr(key).ok_or_else(|| {
            LayoutError::malformed(&self.name, format!("missing `{}` attribute", key))
        })
    }

    /// Parse a required floating-point attribute
    pub fn f64_attr(&self, key: &str) -> Result<f64> {
        let raw = self.required_attr(key)?;
        raw.trim().parse::<f64>().map_err(|_| {
            LayoutError::malformed(&self.name, format!("`{}` is not a number: {:?}", key, raw))
        })
    }

    /// Child elements with the given tag
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == tag)
    }
}

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDocument {
    pub root: Element,
}

impl LayoutDocument {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: Element::new(root_name),
        }
    }

    /// The outermost structural element: first root child that is not the
    /// floating section
    pub fn structural_root(&self) -> Option<&Element> {
        self.root.children.iter().find(|c| c.name != FLOATING_TAG)
    }

    pub fn floating(&self) -> Option<&Element> {
        self.root.children_named(FLOATING_TAG).next()
    }

    /// Leaf names referenced anywhere in the document, in document order
    pub fn leaf_names(&self) -> Vec<&str> {
        fn walk<'a>(element: &'a Element, out: &mut Vec<&'a str>) {
            if element.kind() == Some(ElementKind::Leaf) {
                if let Some(name) = element.attr(attr::NAME) {
                    out.push(name);
                }
            }
            for child in &element.children {
                walk(child, out);
            }
        }

        let mut names = Vec::new();
        walk(&self.root, &mut names);
        names
    }

    // =========================================================================
    // Reading
    // =========================================================================

    pub fn read(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => open.push(element_from(e)?),
                Event::Empty(ref e) => {
                    let element = element_from(e)?;
                    close_element(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = open.pop().ok_or_else(|| {
                        LayoutError::malformed(ROOT_ELEMENT, "unbalanced closing tag")
                    })?;
                    close_element(&mut open, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(LayoutError::malformed(&unclosed.name, "element is never closed"));
        }
        let root = root.ok_or(LayoutError::EmptyDocument)?;
        Ok(Self { root })
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Render as indented XML with a declaration
    pub fn to_xml(&self, indent: usize) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, &self.root)?;

        let mut xml = String::from_utf8_lossy(&writer.into_inner()).into_owned();
        xml.push('\n');
        Ok(xml)
    }

    /// Render fully in memory, then write the file in one go
    pub fn write(&self, path: &Path, indent: usize) -> Result<()> {
        let xml = self.to_xml(indent)?;
        std::fs::write(path, xml)?;
        Ok(())
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value: Cow<'_, str> = attribute.unescape_value()?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn close_element(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_some() {
        Err(LayoutError::malformed(
            &element.name,
            "document has more than one root element",
        ))
    } else {
        *root = Some(element);
        Ok(())
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
    } else {
        writer.write_event(Event::Start(start))?;
        for child in &element.children {
            write_element(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    }
    Ok(())
}

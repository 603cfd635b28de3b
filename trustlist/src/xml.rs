//! Decodes a trust list XML document into a generic ordered tree
//!
//! The ETSI trust list schema leans heavily on repeated siblings (`TSPService`, `Extension`,
//! `DigitalId`, ...), so the tree keeps an ordered list of children per tag rather than a single
//! slot. Namespace prefixes are dropped; the walk in [`crate::harvest`] addresses elements by
//! local name only.

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Error, Result};

/// A node in a decoded trust list document: either leaf text or an insertion-ordered mapping from
/// tag name to the list of child nodes carrying that tag.
///
/// An element with child elements discards any interior text; an element without child elements
/// becomes a [`TrustListNode::Leaf`] holding its text content verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TrustListNode {
    /// Text content of a childless element
    Leaf(String),
    /// Ordered children of an element, keyed by local tag name
    Children(IndexMap<String, Vec<TrustListNode>>),
}

impl TrustListNode {
    /// Returns the ordered list of children carrying the given local tag name, or an empty slice
    /// when there are none (including when `self` is a leaf).
    pub fn children_named(&self, tag: &str) -> &[TrustListNode] {
        match self {
            TrustListNode::Children(children) => {
                children.get(tag).map(Vec::as_slice).unwrap_or(&[])
            }
            TrustListNode::Leaf(_) => &[],
        }
    }

    /// Returns the first child carrying the given local tag name, if any.
    pub fn first_named(&self, tag: &str) -> Option<&TrustListNode> {
        self.children_named(tag).first()
    }

    /// Returns the text content of a leaf node and fails for nodes with element children.
    pub fn text_value(&self) -> Result<&str> {
        match self {
            TrustListNode::Leaf(text) => Ok(text),
            TrustListNode::Children(_) => Err(Error::MissingElement(
                "expected text content but found element children".to_string(),
            )),
        }
    }
}

/// `decode` parses a trust list XML document and returns the root element as a [`TrustListNode`],
/// failing with [`Error::MalformedXml`] when the input is not well-formed.
pub fn decode(xml: &str) -> Result<TrustListNode> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(_) => return read_element(&mut reader),
            Event::Empty(_) => return Ok(TrustListNode::Children(IndexMap::new())),
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Text(t) => {
                // whitespace is common ahead of the root element; anything else is not XML
                let text = t.unescape().map_err(malformed)?;
                if !text.trim().is_empty() {
                    return Err(Error::MalformedXml(
                        "text content before root element".to_string(),
                    ));
                }
            }
            Event::Eof => return Err(Error::MalformedXml("no root element".to_string())),
            _ => {
                return Err(Error::MalformedXml(
                    "unexpected content before root element".to_string(),
                ))
            }
        }
    }
}

/// Reads the children of the element whose `Start` event was just consumed, up to and including
/// the matching `End` event.
fn read_element(reader: &mut Reader<&[u8]>) -> Result<TrustListNode> {
    let mut children: IndexMap<String, Vec<TrustListNode>> = IndexMap::new();
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                let tag = local_name(&e);
                let child = read_element(reader)?;
                children.entry(tag).or_default().push(child);
            }
            Event::Empty(e) => {
                let tag = local_name(&e);
                children
                    .entry(tag)
                    .or_default()
                    .push(TrustListNode::Leaf(String::new()));
            }
            Event::Text(t) => {
                text.push_str(&t.unescape().map_err(malformed)?);
            }
            Event::CData(t) => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(Error::MalformedXml(
                    "unexpected end of document inside element".to_string(),
                ))
            }
            _ => {}
        }
    }
    if children.is_empty() {
        Ok(TrustListNode::Leaf(text))
    } else {
        Ok(TrustListNode::Children(children))
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned()
}

fn malformed(err: quick_xml::Error) -> Error {
    Error::MalformedXml(err.to_string())
}

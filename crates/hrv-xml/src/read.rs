//! Read-side helpers over `roxmltree` element nodes.
//!
//! The optional helpers turn "child element absent" into `None`; the required helpers turn it
//! into [`XmlError::Structure`]. Present-but-malformed text is always an error.

use crate::{ReadXml, XmlError, XmlResult, XmlText};
use roxmltree::{Document, Node};

/// Parse a complete XML document held in memory.
pub fn parse_document(xml: &str) -> XmlResult<Document<'_>> {
    Ok(Document::parse(xml)?)
}

/// Find the element named `name` that a record item is rooted at.
///
/// The document element itself is accepted, as is a direct child of a wrapper element (the
/// record store hands items over inside a `<data-xml>` envelope).
pub fn locate_root<'a, 'input>(
    document: &'a Document<'input>,
    name: &str,
) -> XmlResult<Node<'a, 'input>> {
    let root = document.root_element();
    if root.tag_name().name() == name {
        return Ok(root);
    }
    required_element(root, name)
}

/// First direct child element called `name`.
pub fn child<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn children_named<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
    parent
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == name)
        .collect()
}

/// First direct child element called `name`, or a structure error naming both elements.
pub fn required_element<'a, 'input>(
    parent: Node<'a, 'input>,
    name: &str,
) -> XmlResult<Node<'a, 'input>> {
    child(parent, name).ok_or_else(|| XmlError::Structure {
        parent: parent.tag_name().name().to_string(),
        element: name.to_string(),
    })
}

/// Concatenated text content directly under `node`. An empty element yields `""`.
pub fn text_content(node: Node<'_, '_>) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Convert the text content of `node` to `T`.
pub fn read_text<T: XmlText>(node: Node<'_, '_>) -> XmlResult<T> {
    let text = text_content(node);
    T::parse_text(&text).ok_or_else(|| XmlError::Format {
        field: node.tag_name().name().to_string(),
        expected: T::EXPECTED,
        text,
    })
}

/// Text of child `name` converted to `T`, or `None` when the child is absent.
pub fn optional_text<T: XmlText>(parent: Node<'_, '_>, name: &str) -> XmlResult<Option<T>> {
    child(parent, name).map(read_text).transpose()
}

/// Text of child `name` converted to `T`; absence is a structure error.
pub fn required_text<T: XmlText>(parent: Node<'_, '_>, name: &str) -> XmlResult<T> {
    read_text(required_element(parent, name)?)
}

/// Child `name` parsed as `T`, or `None` when the child is absent.
pub fn optional_child<T: ReadXml>(parent: Node<'_, '_>, name: &str) -> XmlResult<Option<T>> {
    child(parent, name).map(T::read_xml).transpose()
}

/// Child `name` parsed as `T`; absence is a structure error.
pub fn required_child<T: ReadXml>(parent: Node<'_, '_>, name: &str) -> XmlResult<T> {
    T::read_xml(required_element(parent, name)?)
}

/// Attribute `name` of `node` converted to `T`, or `None` when absent.
pub fn optional_attribute<T: XmlText>(node: Node<'_, '_>, name: &str) -> XmlResult<Option<T>> {
    node.attribute(name)
        .map(|text| {
            T::parse_text(text).ok_or_else(|| XmlError::Format {
                field: format!("{}@{}", node.tag_name().name(), name),
                expected: T::EXPECTED,
                text: text.to_string(),
            })
        })
        .transpose()
}

/// Resolve `path` (`item` or `wrapper/.../item`) to the matching item nodes in document order.
///
/// A missing wrapper yields no nodes: on the wire an absent list and an empty list look alike.
fn collection_nodes<'a, 'input>(parent: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let mut segments: Vec<&str> = path.split('/').collect();
    let item = segments.pop().unwrap_or(path);

    let mut container = parent;
    for segment in segments {
        match child(container, segment) {
            Some(next) => container = next,
            None => return Vec::new(),
        }
    }
    children_named(container, item)
}

/// Parse every element matching `path` as `T`.
///
/// Any element that fails to parse fails the whole collection; partial lists are never returned.
pub fn read_collection<T: ReadXml>(parent: Node<'_, '_>, path: &str) -> XmlResult<Vec<T>> {
    let nodes = collection_nodes(parent, path);
    tracing::trace!(path, count = nodes.len(), "reading collection");
    nodes.into_iter().map(T::read_xml).collect()
}

/// Convert the text of every element matching `path` to `T`.
pub fn read_text_collection<T: XmlText>(parent: Node<'_, '_>, path: &str) -> XmlResult<Vec<T>> {
    collection_nodes(parent, path)
        .into_iter()
        .map(read_text)
        .collect()
}

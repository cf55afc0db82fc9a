//! Write-side helpers: [`XmlWriter`] and the mandatory-field checks.

use crate::{WriteXml, XmlError, XmlResult, XmlText};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Streaming XML writer used by every [`WriteXml`] implementation.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    /// Compact writer: no whitespace between elements.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
        }
    }

    /// Writer that indents nested elements by `indent` spaces.
    pub fn with_indent(inner: W, indent: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', indent),
        }
    }

    /// Write the `<?xml version="1.0" encoding="UTF-8"?>` declaration.
    pub fn declaration(&mut self) -> XmlResult<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    pub fn start(&mut self, name: &str) -> XmlResult<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    /// Open `name` with attributes; `None` attribute values are skipped.
    pub fn start_with_attributes(
        &mut self,
        name: &str,
        attributes: &[(&str, Option<&str>)],
    ) -> XmlResult<()> {
        let mut element = BytesStart::new(name);
        for (key, value) in attributes {
            if let Some(value) = value {
                element.push_attribute((*key, *value));
            }
        }
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    pub fn end(&mut self, name: &str) -> XmlResult<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write escaped character data inside the currently open element.
    pub fn text(&mut self, text: &str) -> XmlResult<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// Write `<name>value</name>` using the value's invariant text form.
    pub fn element<T: XmlText>(&mut self, name: &str, value: &T) -> XmlResult<()> {
        self.start(name)?;
        self.text(&value.to_text())?;
        self.end(name)
    }

    /// Write `<name>value</name>` when `value` is set; do nothing otherwise.
    pub fn optional_text<T: XmlText>(&mut self, name: &str, value: Option<&T>) -> XmlResult<()> {
        match value {
            Some(value) => self.element(name, value),
            None => Ok(()),
        }
    }

    /// Write a nested value as element `name`.
    pub fn child<T: WriteXml>(&mut self, name: &str, value: &T) -> XmlResult<()> {
        value.write_xml(name, self)
    }

    /// Write a nested value as element `name` when it is set; do nothing otherwise.
    pub fn optional<T: WriteXml>(&mut self, name: &str, value: Option<&T>) -> XmlResult<()> {
        match value {
            Some(value) => value.write_xml(name, self),
            None => Ok(()),
        }
    }

    /// Write `items` as `<item_name>` elements inside a `<wrapper>` element.
    ///
    /// The wrapper is omitted entirely when `items` is empty.
    pub fn collection<T: WriteXml>(
        &mut self,
        wrapper: &str,
        items: &[T],
        item_name: &str,
    ) -> XmlResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        self.start(wrapper)?;
        self.repeated(items, item_name)?;
        self.end(wrapper)
    }

    /// Write `items` as sibling `<item_name>` elements, in list order.
    pub fn repeated<T: WriteXml>(&mut self, items: &[T], item_name: &str) -> XmlResult<()> {
        for item in items {
            item.write_xml(item_name, self)?;
        }
        Ok(())
    }

    /// Write primitive `items` as sibling `<name>` elements, in list order.
    pub fn repeated_text<T: XmlText>(&mut self, items: &[T], name: &str) -> XmlResult<()> {
        for item in items {
            self.element(name, item)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// Borrow a mandatory field, or fail naming it.
pub fn require<'a, T>(field: &'static str, value: &'a Option<T>) -> XmlResult<&'a T> {
    value.as_ref().ok_or(XmlError::MissingMandatory(field))
}

/// Borrow a mandatory nested value after running its own mandatory-field check.
pub fn require_checked<'a, T: WriteXml>(
    field: &'static str,
    value: &'a Option<T>,
) -> XmlResult<&'a T> {
    let value = require(field, value)?;
    value.check_mandatory()?;
    Ok(value)
}

/// Run the mandatory-field check of an optional nested value when it is set.
pub fn check_optional<T: WriteXml>(value: &Option<T>) -> XmlResult<()> {
    value.as_ref().map_or(Ok(()), WriteXml::check_mandatory)
}

/// Run the mandatory-field check of every value in a collection.
pub fn check_each<T: WriteXml>(items: &[T]) -> XmlResult<()> {
    items.iter().try_for_each(WriteXml::check_mandatory)
}

/// Fail naming `field` when mandatory text is empty or whitespace-only.
pub fn require_text(field: &'static str, value: &str) -> XmlResult<()> {
    if value.trim().is_empty() {
        return Err(XmlError::MissingMandatory(field));
    }
    Ok(())
}

/// Serialise `value` as element `element` into a compact string.
pub fn to_xml_string<T: WriteXml>(value: &T, element: &str) -> XmlResult<String> {
    let mut writer = XmlWriter::new(Vec::new());
    value.write_xml(element, &mut writer)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

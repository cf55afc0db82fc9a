//! Codable values: a human-readable label plus zero or more vocabulary codes.

use hrv_types::{non_blank, optional_non_blank, ValidationResult};
use hrv_xml::{
    check_each, optional_text, read_collection, require_text, required_text, Node, ReadXml, WriteXml,
    XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::ops::{Index, IndexMut};

/// One machine-resolvable code: `<value>`, `<family>`, `<type>`, `<version>`.
///
/// `type` is the vocabulary name (for example `icd9` or `RxNorm`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CodedValue {
    value: String,
    family: Option<String>,
    vocabulary_name: String,
    version: Option<String>,
}

impl CodedValue {
    pub fn new(
        value: impl Into<String>,
        vocabulary_name: impl Into<String>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            value: non_blank("value", value)?,
            family: None,
            vocabulary_name: non_blank("type", vocabulary_name)?,
            version: None,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn vocabulary_name(&self) -> &str {
        &self.vocabulary_name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> ValidationResult<()> {
        self.value = non_blank("value", value)?;
        Ok(())
    }

    pub fn set_family(&mut self, family: Option<String>) -> ValidationResult<()> {
        self.family = optional_non_blank("family", family)?;
        Ok(())
    }

    pub fn set_vocabulary_name(&mut self, name: impl Into<String>) -> ValidationResult<()> {
        self.vocabulary_name = non_blank("type", name)?;
        Ok(())
    }

    pub fn set_version(&mut self, version: Option<String>) -> ValidationResult<()> {
        self.version = optional_non_blank("version", version)?;
        Ok(())
    }
}

impl fmt::Display for CodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(family) = &self.family {
            write!(f, "{family}:")?;
        }
        write!(f, "{}:{}", self.vocabulary_name, self.value)?;
        if let Some(version) = &self.version {
            write!(f, " ({version})")?;
        }
        Ok(())
    }
}

impl ReadXml for CodedValue {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            value: required_text(node, "value")?,
            family: optional_text(node, "family")?,
            vocabulary_name: required_text(node, "type")?,
            version: optional_text(node, "version")?,
        })
    }
}

impl WriteXml for CodedValue {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start(element)?;
        writer.element("value", &self.value)?;
        writer.optional_text("family", self.family.as_ref())?;
        writer.element("type", &self.vocabulary_name)?;
        writer.optional_text("version", self.version.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("value", &self.value)?;
        require_text("type", &self.vocabulary_name)
    }
}

/// A vocabulary entry as returned by the vocabulary lookup service.
///
/// Only used as input when adding codes to a [`CodableValue`]; it is never persisted itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VocabularyItem {
    pub value: String,
    pub family: Option<String>,
    pub vocabulary_name: String,
    pub version: Option<String>,
    pub display_text: Option<String>,
    pub abbreviation: Option<String>,
}

impl VocabularyItem {
    pub fn to_coded_value(&self) -> CodedValue {
        CodedValue {
            value: self.value.clone(),
            family: self.family.clone(),
            vocabulary_name: self.vocabulary_name.clone(),
            version: self.version.clone(),
        }
    }
}

/// A term with a human label (`<text>`) and zero or more `<code>` elements.
///
/// The value is both a scalar, through [`CodableValue::text`], and an ordered sequence of
/// [`CodedValue`]s supporting indexing, insertion, removal and iteration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CodableValue {
    text: String,
    codes: Vec<CodedValue>,
}

impl CodableValue {
    /// Creates a value with a label and no codes.
    pub fn new(text: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            text: non_blank("text", text)?,
            codes: Vec::new(),
        })
    }

    pub fn with_code(text: impl Into<String>, code: CodedValue) -> ValidationResult<Self> {
        let mut value = Self::new(text)?;
        value.codes.push(code);
        Ok(value)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True once a label has been assigned.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> ValidationResult<()> {
        self.text = non_blank("text", text)?;
        Ok(())
    }

    /// Append the code for a vocabulary entry.
    ///
    /// The entry's display text becomes the label only when no label has been set yet; an
    /// existing label is never replaced.
    pub fn add_vocabulary_item(&mut self, item: &VocabularyItem) {
        if !self.has_text() {
            if let Some(display) = item.display_text.as_ref().filter(|t| !t.trim().is_empty()) {
                self.text = display.clone();
            }
        }
        self.codes.push(item.to_coded_value());
    }

    pub fn codes(&self) -> &[CodedValue] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CodedValue> {
        self.codes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, CodedValue> {
        self.codes.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&CodedValue> {
        self.codes.get(index)
    }

    pub fn push(&mut self, code: CodedValue) {
        self.codes.push(code);
    }

    /// Insert a code at `index`, shifting later codes along. Panics if `index > len`.
    pub fn insert(&mut self, index: usize, code: CodedValue) {
        self.codes.insert(index, code);
    }

    /// Remove and return the code at `index`. Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> CodedValue {
        self.codes.remove(index)
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }
}

impl Index<usize> for CodableValue {
    type Output = CodedValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.codes[index]
    }
}

impl IndexMut<usize> for CodableValue {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.codes[index]
    }
}

impl<'a> IntoIterator for &'a CodableValue {
    type Item = &'a CodedValue;
    type IntoIter = std::slice::Iter<'a, CodedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

impl IntoIterator for CodableValue {
    type Item = CodedValue;
    type IntoIter = std::vec::IntoIter<CodedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.into_iter()
    }
}

impl Extend<CodedValue> for CodableValue {
    fn extend<I: IntoIterator<Item = CodedValue>>(&mut self, iter: I) {
        self.codes.extend(iter);
    }
}

impl fmt::Display for CodableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_text() {
            return f.write_str(&self.text);
        }
        match self.codes.first() {
            Some(code) => f.write_str(code.value()),
            None => Ok(()),
        }
    }
}

impl ReadXml for CodableValue {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            text: required_text(node, "text")?,
            codes: read_collection(node, "code")?,
        })
    }
}

impl WriteXml for CodableValue {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start(element)?;
        writer.element("text", &self.text)?;
        writer.repeated(&self.codes, "code")?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("text", &self.text)?;
        check_each(&self.codes)
    }
}

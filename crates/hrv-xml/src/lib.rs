//! Typed XML (de)serialisation contract for health record data.
//!
//! Every value and record item in `hrv-model` follows the same convention:
//! - [`ReadXml`] populates a value from the element node that represents it. Child elements are
//!   looked up by literal name; unknown children are ignored.
//! - [`WriteXml`] emits the value as a named element, children in a fixed order, after checking
//!   that every mandatory field is set.
//!
//! This crate holds the shared pieces of that convention:
//! - [`read`]: optional/required child lookup and collection reads over `roxmltree` nodes.
//! - [`write`]: [`XmlWriter`], a thin layer over `quick_xml::Writer` with the write-side mirror of
//!   the read helpers.
//! - [`text`]: invariant text conversions for primitive field types.
//!
//! Numeric text is always produced and parsed in an invariant form (`1.83`, never `1,83`) so that
//! output is portable across machines.

pub mod read;
pub mod text;
pub mod write;

pub use hrv_types::ValidationError;
pub use read::{
    child, locate_root, optional_attribute, optional_child, optional_text, parse_document,
    read_collection, read_text, read_text_collection, required_child, required_element,
    required_text, text_content,
};
pub use roxmltree::{Document, Node};
pub use text::XmlText;
pub use write::{
    check_each, check_optional, require, require_checked, require_text, to_xml_string, XmlWriter,
};

use std::io::Write;

/// Errors raised while reading or writing typed XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Malformed(#[from] roxmltree::Error),

    /// An expected element is absent from otherwise parseable XML.
    #[error("expected element <{element}> inside <{parent}>")]
    Structure { parent: String, element: String },

    /// A present element's text cannot be converted to the field's primitive type.
    #[error("<{field}> does not hold a valid {expected}: '{text}'")]
    Format {
        field: String,
        expected: &'static str,
        text: String,
    },

    /// A parsed or assigned value breaks a field rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Serialisation was attempted while a mandatory field is unset.
    #[error("cannot serialise: mandatory field '{0}' is not set")]
    MissingMandatory(&'static str),

    #[error("unknown record item type: {0}")]
    UnknownType(String),

    #[error("I/O error while writing XML: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Type alias for Results that can fail with an [`XmlError`].
pub type XmlResult<T> = Result<T, XmlError>;

/// A value that can populate itself from the element node representing it.
pub trait ReadXml: Sized {
    /// Read the value from `node`, the element whose children hold the value's fields.
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self>;
}

/// A value that can emit itself as a named XML element.
pub trait WriteXml {
    /// Write the value as `<element>...</element>`.
    ///
    /// Implementations check mandatory fields before emitting anything, so a failed write never
    /// leaves a half-written element behind for that value.
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()>;

    /// Check every mandatory field of this value and of the values nested inside it, naming the
    /// first one that is unset.
    ///
    /// Record items run this before writing their root element, so a failed write emits nothing.
    fn check_mandatory(&self) -> XmlResult<()> {
        Ok(())
    }
}

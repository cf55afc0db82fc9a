//! Top-level record items.
//!
//! Each item is identified by a fixed type id that the record store uses to pick a parser, and
//! is rooted at a single named element. Items implement [`RecordItem`] on top of the
//! [`ReadXml`]/[`WriteXml`] pair; `write_xml` always runs [`RecordItem::validate`] first, which
//! walks every nested value through [`WriteXml::check_mandatory`], so a missing mandatory field
//! anywhere in the item is reported before any output is produced.

mod care_plan;
mod directive;
mod explanation_of_benefits;
mod height;
mod medication;
mod weight;

pub use care_plan::{CarePlan, CarePlanGoal, CarePlanGoalGroup, CarePlanTask};
pub use directive::Directive;
pub use explanation_of_benefits::{ExplanationOfBenefits, Service};
pub use height::Height;
pub use medication::{Medication, Prescription};
pub use weight::Weight;

use hrv_xml::{locate_root, parse_document, ReadXml, WriteXml, XmlResult, XmlWriter};
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// A record item: a typed root element with a fixed type identifier.
pub trait RecordItem: ReadXml + WriteXml + fmt::Display {
    /// The type identifier the record store routes on.
    const TYPE_ID: Uuid;
    /// Human-readable type name.
    const TYPE_NAME: &'static str;
    /// Name of the element the item is rooted at.
    const ROOT_ELEMENT: &'static str;

    /// Check that every mandatory field is set, including those of nested values, naming the
    /// first one that is not.
    fn validate(&self) -> XmlResult<()> {
        self.check_mandatory()
    }

    /// Parse an item from a complete XML document.
    ///
    /// The root element may be the document element or a direct child of a wrapper element.
    fn from_xml_str(xml: &str) -> XmlResult<Self> {
        let document = parse_document(xml)?;
        let root = locate_root(&document, Self::ROOT_ELEMENT)?;
        tracing::debug!(
            type_name = Self::TYPE_NAME,
            type_id = %Self::TYPE_ID,
            "parsing record item"
        );
        Self::read_xml(root)
    }

    /// Serialise the item as its root element into a compact string.
    fn to_xml_string(&self) -> XmlResult<String> {
        hrv_xml::to_xml_string(self, Self::ROOT_ELEMENT)
    }

    /// Write the item as its root element to an existing writer.
    fn write_document<W: Write>(&self, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.write_xml(Self::ROOT_ELEMENT, writer)
    }
}

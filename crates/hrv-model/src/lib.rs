//! Typed health record data with XML round-trip support.
//!
//! This crate provides:
//! - [`values`]: value types nested inside record items (dates, times, measurements, codable
//!   values, contact details, claim amounts).
//! - [`items`]: top-level record items, each with a fixed type id and root element.
//! - [`registry`]: dispatch of a stored document to the item type that parses it.
//!
//! Reading and writing follow the convention defined in `hrv-xml`: absent optional elements
//! become `None`, mandatory fields are checked when writing, and numeric text is invariant.

pub mod items;
pub mod registry;
pub mod values;

pub use items::{
    CarePlan, CarePlanGoal, CarePlanGoalGroup, CarePlanTask, Directive, ExplanationOfBenefits,
    Height, Medication, Prescription, RecordItem, Service, Weight,
};
pub use registry::{AnyItem, ItemRegistry, ItemType};

pub use hrv_xml::{ReadXml, WriteXml, XmlError, XmlResult};

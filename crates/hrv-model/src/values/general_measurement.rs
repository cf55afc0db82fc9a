//! Free-form measurements such as dosages and strengths ("2 tablets", "500 mg").

use super::CodableValue;
use hrv_types::{finite, non_blank, ValidationResult};
use hrv_xml::{
    check_each, read_collection, require, require_checked, require_text, required_child,
    required_text, Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// One numeric reading with coded units: `<value>`, `<units>`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StructuredMeasurement {
    value: Option<f64>,
    pub units: Option<CodableValue>,
}

impl StructuredMeasurement {
    pub fn new(value: f64, units: CodableValue) -> ValidationResult<Self> {
        Ok(Self {
            value: Some(finite("value", value)?),
            units: Some(units),
        })
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn set_value(&mut self, value: f64) -> ValidationResult<()> {
        self.value = Some(finite("value", value)?);
        Ok(())
    }
}

impl fmt::Display for StructuredMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.value, &self.units) {
            (Some(value), Some(units)) => write!(f, "{value} {units}"),
            (Some(value), None) => write!(f, "{value}"),
            _ => Ok(()),
        }
    }
}

impl ReadXml for StructuredMeasurement {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            value: Some(required_text(node, "value")?),
            units: Some(required_child(node, "units")?),
        })
    }
}

impl WriteXml for StructuredMeasurement {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let value = require("value", &self.value)?;
        let units = require("units", &self.units)?;

        writer.start(element)?;
        writer.element("value", value)?;
        writer.child("units", units)?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require("value", &self.value)?;
        require_checked("units", &self.units)?;
        Ok(())
    }
}

/// A measurement as the user described it (`<display>`) plus any structured readings.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GeneralMeasurement {
    display: String,
    pub structured: Vec<StructuredMeasurement>,
}

impl GeneralMeasurement {
    pub fn new(display: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            display: non_blank("display", display)?,
            structured: Vec::new(),
        })
    }

    /// A measurement with a single structured reading, displayed as `"{value} {units}"`.
    pub fn from_value(value: f64, units: CodableValue) -> ValidationResult<Self> {
        let reading = StructuredMeasurement::new(value, units)?;
        Ok(Self {
            display: reading.to_string(),
            structured: vec![reading],
        })
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn set_display(&mut self, display: impl Into<String>) -> ValidationResult<()> {
        self.display = non_blank("display", display)?;
        Ok(())
    }
}

impl fmt::Display for GeneralMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.display.trim().is_empty() {
            return f.write_str(&self.display);
        }
        match self.structured.first() {
            Some(reading) => write!(f, "{reading}"),
            None => Ok(()),
        }
    }
}

impl ReadXml for GeneralMeasurement {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            display: required_text(node, "display")?,
            structured: read_collection(node, "structured")?,
        })
    }
}

impl WriteXml for GeneralMeasurement {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start(element)?;
        writer.element("display", &self.display)?;
        writer.repeated(&self.structured, "structured")?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("display", &self.display)?;
        check_each(&self.structured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrv_xml::{parse_document, to_xml_string, XmlError};

    fn tablets() -> CodableValue {
        CodableValue::new("tablets").unwrap()
    }

    #[test]
    fn from_value_derives_the_display_text() {
        let dose = GeneralMeasurement::from_value(2.0, tablets()).unwrap();
        assert_eq!(dose.display(), "2 tablets");
        assert_eq!(dose.structured.len(), 1);
    }

    #[test]
    fn round_trips_structured_readings() {
        let mut strength = GeneralMeasurement::new("500 mg").unwrap();
        strength.structured.push(
            StructuredMeasurement::new(500.0, CodableValue::new("mg").unwrap()).unwrap(),
        );

        let xml = to_xml_string(&strength, "strength").unwrap();
        assert_eq!(
            xml,
            "<strength><display>500 mg</display><structured><value>500</value>\
             <units><text>mg</text></units></structured></strength>"
        );
        let doc = parse_document(&xml).unwrap();
        assert_eq!(
            GeneralMeasurement::read_xml(doc.root_element()).unwrap(),
            strength
        );
    }

    #[test]
    fn structured_reading_needs_units() {
        let reading = StructuredMeasurement {
            value: Some(1.0),
            units: None,
        };
        let err = to_xml_string(&reading, "structured").expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("units")));
    }

    #[test]
    fn unlabelled_units_fail_before_any_output() {
        let mut dose = GeneralMeasurement::new("2 tablets").unwrap();
        dose.structured.push(StructuredMeasurement {
            value: Some(2.0),
            units: Some(CodableValue::default()),
        });
        let mut writer = XmlWriter::new(Vec::new());
        let err = dose.write_xml("dose", &mut writer).expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("text")));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn non_numeric_value_is_a_format_error() {
        let doc = parse_document(
            "<dose><display>x</display><structured><value>two</value>\
             <units><text>tablets</text></units></structured></dose>",
        )
        .unwrap();
        assert!(matches!(
            GeneralMeasurement::read_xml(doc.root_element()),
            Err(XmlError::Format { .. })
        ));
    }
}

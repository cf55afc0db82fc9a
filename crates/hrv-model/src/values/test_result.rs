//! Reference ranges attached to lab test results.

use super::CodableValue;
use hrv_types::{finite, ValidationError, ValidationResult};
use hrv_xml::{
    optional_child, optional_text, require, require_checked, required_child, Node, ReadXml,
    WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// Numeric bounds of a range: `<minimum-range>`, `<maximum-range>`, both optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TestResultRangeValue {
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl TestResultRangeValue {
    /// # Errors
    ///
    /// Returns [`ValidationError::Argument`] when both bounds are set and `minimum > maximum`.
    pub fn new(minimum: Option<f64>, maximum: Option<f64>) -> ValidationResult<Self> {
        let minimum = minimum.map(|v| finite("minimum-range", v)).transpose()?;
        let maximum = maximum.map(|v| finite("maximum-range", v)).transpose()?;
        if let (Some(min), Some(max)) = (minimum, maximum) {
            if min > max {
                return Err(ValidationError::Argument {
                    field: "minimum-range",
                    reason: format!("{min} is greater than the maximum {max}"),
                });
            }
        }
        Ok(Self { minimum, maximum })
    }

    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    /// Whether `value` lies inside the bounds that are set.
    pub fn contains(&self, value: f64) -> bool {
        self.minimum.map_or(true, |min| value >= min)
            && self.maximum.map_or(true, |max| value <= max)
    }
}

impl fmt::Display for TestResultRangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) => write!(f, "{min} - {max}"),
            (Some(min), None) => write!(f, ">= {min}"),
            (None, Some(max)) => write!(f, "<= {max}"),
            (None, None) => Ok(()),
        }
    }
}

impl ReadXml for TestResultRangeValue {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            minimum: optional_text(node, "minimum-range")?,
            maximum: optional_text(node, "maximum-range")?,
        })
    }
}

impl WriteXml for TestResultRangeValue {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        writer.start(element)?;
        writer.optional_text("minimum-range", self.minimum.as_ref())?;
        writer.optional_text("maximum-range", self.maximum.as_ref())?;
        writer.end(element)
    }
}

/// A named reference range: `<type>` (for example "normal"), `<text>`, optional `<value>`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TestResultRange {
    pub range_type: Option<CodableValue>,
    pub text: Option<CodableValue>,
    pub value: Option<TestResultRangeValue>,
}

impl TestResultRange {
    pub fn new(range_type: CodableValue, text: CodableValue) -> Self {
        Self {
            range_type: Some(range_type),
            text: Some(text),
            value: None,
        }
    }
}

impl fmt::Display for TestResultRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(range_type) = &self.range_type {
            write!(f, "{range_type}: ")?;
        }
        match (&self.text, &self.value) {
            (Some(text), _) => write!(f, "{text}"),
            (None, Some(value)) => write!(f, "{value}"),
            (None, None) => Ok(()),
        }
    }
}

impl ReadXml for TestResultRange {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            range_type: Some(required_child(node, "type")?),
            text: Some(required_child(node, "text")?),
            value: optional_child(node, "value")?,
        })
    }
}

impl WriteXml for TestResultRange {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let range_type = require("type", &self.range_type)?;
        let text = require("text", &self.text)?;

        writer.start(element)?;
        writer.child("type", range_type)?;
        writer.child("text", text)?;
        writer.optional("value", self.value.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("type", &self.range_type)?;
        require_checked("text", &self.text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrv_xml::{parse_document, to_xml_string, XmlError};

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(matches!(
            TestResultRangeValue::new(Some(10.0), Some(1.0)),
            Err(ValidationError::Argument { field: "minimum-range", .. })
        ));
        assert!(TestResultRangeValue::new(Some(1.0), None).is_ok());
    }

    #[test]
    fn open_ended_ranges_contain_values_past_the_set_bound() {
        let at_least_four = TestResultRangeValue::new(Some(4.0), None).unwrap();
        assert!(at_least_four.contains(100.0));
        assert!(!at_least_four.contains(3.9));
        assert_eq!(at_least_four.to_string(), ">= 4");
    }

    #[test]
    fn round_trips_with_one_bound() {
        let mut range = TestResultRange::new(
            CodableValue::new("normal").unwrap(),
            CodableValue::new("3.5 to 5.0 mmol/L").unwrap(),
        );
        range.value = Some(TestResultRangeValue::new(Some(3.5), Some(5.0)).unwrap());

        let xml = to_xml_string(&range, "range").unwrap();
        assert_eq!(
            xml,
            "<range><type><text>normal</text></type><text><text>3.5 to 5.0 mmol/L</text></text>\
             <value><minimum-range>3.5</minimum-range><maximum-range>5</maximum-range></value>\
             </range>"
        );
        let doc = parse_document(&xml).unwrap();
        assert_eq!(TestResultRange::read_xml(doc.root_element()).unwrap(), range);
    }

    #[test]
    fn missing_type_is_named_on_write() {
        let range = TestResultRange {
            text: Some(CodableValue::new("high").unwrap()),
            ..TestResultRange::default()
        };
        let err = to_xml_string(&range, "range").expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("type")));
    }

    #[test]
    fn blank_range_text_is_named_on_write() {
        let range = TestResultRange::new(CodableValue::new("normal").unwrap(), CodableValue::default());
        let mut writer = XmlWriter::new(Vec::new());
        let err = range.write_xml("range", &mut writer).expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("text")));
        assert!(writer.into_inner().is_empty());
    }
}

//! Body weight in kilograms.

use super::RecordItem;
use crate::values::{HealthServiceDateTime, WeightValue};
use hrv_xml::{
    require, require_checked, required_child, Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// A person's weight: `<when>` and `<value>` (kilograms), both mandatory.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Weight {
    pub when: HealthServiceDateTime,
    pub value: Option<WeightValue>,
}

impl Weight {
    pub fn new(when: HealthServiceDateTime, value: WeightValue) -> Self {
        Self {
            when,
            value: Some(value),
        }
    }
}

impl RecordItem for Weight {
    const TYPE_ID: Uuid = Uuid::from_u128(0x3d34d87e_7fc1_4153_800f_f56592cb0d17);
    const TYPE_NAME: &'static str = "Weight";
    const ROOT_ELEMENT: &'static str = "weight";
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value} on {}", self.when.date),
            None => write!(f, "{}", self.when.date),
        }
    }
}

impl ReadXml for Weight {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            when: required_child(node, "when")?,
            value: Some(required_child(node, "value")?),
        })
    }
}

impl WriteXml for Weight {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.validate()?;
        let value = require("value", &self.value)?;

        writer.start(element)?;
        writer.child("when", &self.when)?;
        writer.child("value", value)?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        self.when.check_mandatory()?;
        require_checked("value", &self.value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{ApproximateTime, CodableValue, DisplayValue, HealthServiceDate};
    use hrv_types::ValidationError;
    use hrv_xml::XmlError;

    #[test]
    fn round_trips_with_time_and_display() {
        let when = HealthServiceDateTime::with_time(
            HealthServiceDate::new(2021, 11, 2).unwrap(),
            ApproximateTime::new(7, 45).unwrap(),
        );
        let display = DisplayValue::new(160.0, "lb").unwrap();
        let weight = Weight::new(when, WeightValue::with_display(72.57, display).unwrap());

        let xml = weight.to_xml_string().unwrap();
        assert_eq!(
            xml,
            "<weight><when><date><y>2021</y><m>11</m><d>2</d></date><time><h>7</h><m>45</m>\
             </time></when><value><kg>72.57</kg><display units=\"lb\">160</display></value>\
             </weight>"
        );
        assert_eq!(Weight::from_xml_str(&xml).unwrap(), weight);
        assert_eq!(weight.to_string(), "160 lb on 2021-11-02");
    }

    #[test]
    fn negative_kilograms_in_xml_are_rejected() {
        let xml = "<weight><when><date><y>2021</y><m>1</m><d>1</d></date></when>\
                   <value><kg>-3</kg></value></weight>";
        let err = Weight::from_xml_str(xml).expect_err("should fail");
        assert!(matches!(
            err,
            XmlError::Validation(ValidationError::Range { field: "weight", .. })
        ));
    }

    #[test]
    fn default_weight_cannot_be_written() {
        let err = Weight::default().to_xml_string().expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("value")));
    }

    #[test]
    fn unlabelled_time_zone_leaves_the_writer_empty() {
        let mut when = HealthServiceDateTime::new(HealthServiceDate::new(2021, 1, 1).unwrap());
        when.timezone = Some(CodableValue::default());
        let weight = Weight::new(when, WeightValue::new(70.0).unwrap());

        let mut writer = XmlWriter::new(Vec::new());
        let err = weight.write_document(&mut writer).expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("text")));
        assert!(writer.into_inner().is_empty());
    }
}

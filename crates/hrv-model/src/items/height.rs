//! Body height in metres.

use super::RecordItem;
use crate::values::{HealthServiceDateTime, Length};
use hrv_xml::{
    require, require_checked, required_child, Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// A person's height: `<when>` and `<value>` (metres), both mandatory.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Height {
    pub when: HealthServiceDateTime,
    pub value: Option<Length>,
}

impl Height {
    pub fn new(when: HealthServiceDateTime, value: Length) -> Self {
        Self {
            when,
            value: Some(value),
        }
    }
}

impl RecordItem for Height {
    const TYPE_ID: Uuid = Uuid::from_u128(0x40750a6a_89b2_455c_bd8d_b420a4cb500b);
    const TYPE_NAME: &'static str = "Height";
    const ROOT_ELEMENT: &'static str = "height";
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value} on {}", self.when.date),
            None => write!(f, "{}", self.when.date),
        }
    }
}

impl ReadXml for Height {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            when: required_child(node, "when")?,
            value: Some(required_child(node, "value")?),
        })
    }
}

impl WriteXml for Height {
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

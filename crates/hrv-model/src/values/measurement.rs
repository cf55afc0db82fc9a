//! Base-unit measurements paired with an optional display value.
//!
//! A measurement always stores its number in the SI base unit (metres, kilograms) so that
//! applications agree on the value regardless of what the user typed. What the user typed is kept
//! separately in a [`DisplayValue`] for faithful redisplay.
//!
//! Per-unit behaviour lives on zero-sized marker types implementing [`MeasurementUnit`]; the
//! shared [`Measurement`] wrapper handles the `display` child uniformly.

use hrv_types::{
    finite, non_blank, non_negative, optional_non_blank, positive, ValidationResult,
};
use hrv_xml::{
    check_optional, optional_attribute, optional_child, read_text, require_text, required_text,
    Node, ReadXml, WriteXml, XmlError, XmlResult, XmlText, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::marker::PhantomData;

/// Behaviour a unit supplies to [`Measurement`].
pub trait MeasurementUnit {
    /// Field name used in validation errors.
    const FIELD: &'static str;
    /// Child element holding the base-unit number.
    const VALUE_ELEMENT: &'static str;
    /// Base-unit symbol used when formatting without a display value.
    const SYMBOL: &'static str;

    /// Check that `value` is legal in this unit.
    fn validate(value: f64) -> ValidationResult<f64>;

    fn read_value(node: Node<'_, '_>) -> XmlResult<f64> {
        let value = required_text(node, Self::VALUE_ELEMENT)?;
        Ok(Self::validate(value)?)
    }

    fn write_value<W: Write>(value: f64, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        writer.element(Self::VALUE_ELEMENT, &value)
    }

    fn format_value(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{value} {}", Self::SYMBOL)
    }
}

/// Length in metres; must be strictly positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LengthUnit;

impl MeasurementUnit for LengthUnit {
    const FIELD: &'static str = "length";
    const VALUE_ELEMENT: &'static str = "m";
    const SYMBOL: &'static str = "m";

    fn validate(value: f64) -> ValidationResult<f64> {
        positive(Self::FIELD, value)
    }
}

/// Altitude in metres; negative values are below sea level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AltitudeUnit;

impl MeasurementUnit for AltitudeUnit {
    const FIELD: &'static str = "altitude";
    const VALUE_ELEMENT: &'static str = "m";
    const SYMBOL: &'static str = "m";

    fn validate(value: f64) -> ValidationResult<f64> {
        finite(Self::FIELD, value)
    }
}

/// Mass in kilograms; must not be negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeightUnit;

impl MeasurementUnit for WeightUnit {
    const FIELD: &'static str = "weight";
    const VALUE_ELEMENT: &'static str = "kg";
    const SYMBOL: &'static str = "kg";

    fn validate(value: f64) -> ValidationResult<f64> {
        non_negative(Self::FIELD, value)
    }
}

pub type Length = Measurement<LengthUnit>;
pub type Altitude = Measurement<AltitudeUnit>;
pub type WeightValue = Measurement<WeightUnit>;

/// The value as the user entered it: `<display units=".." units-code=".." text="..">1.83</display>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayValue {
    value: f64,
    units: String,
    units_code: Option<String>,
    text: Option<String>,
}

impl DisplayValue {
    pub fn new(value: f64, units: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            value: finite("display", value)?,
            units: non_blank("units", units)?,
            units_code: None,
            text: None,
        })
    }

    /// The value as the user entered it, in [`DisplayValue::units`].
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn units_code(&self) -> Option<&str> {
        self.units_code.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_value(&mut self, value: f64) -> ValidationResult<()> {
        self.value = finite("display", value)?;
        Ok(())
    }

    pub fn set_units(&mut self, units: impl Into<String>) -> ValidationResult<()> {
        self.units = non_blank("units", units)?;
        Ok(())
    }

    pub fn set_units_code(&mut self, code: Option<String>) -> ValidationResult<()> {
        self.units_code = optional_non_blank("units-code", code)?;
        Ok(())
    }

    pub fn set_text(&mut self, text: Option<String>) -> ValidationResult<()> {
        self.text = optional_non_blank("text", text)?;
        Ok(())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => f.write_str(text),
            None => write!(f, "{} {}", self.value, self.units),
        }
    }
}

impl ReadXml for DisplayValue {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        let units = optional_attribute(node, "units")?.ok_or_else(|| XmlError::Structure {
            parent: node.tag_name().name().to_string(),
            element: "@units".into(),
        })?;
        Ok(Self {
            value: finite("display", read_text(node)?)?,
            units,
            units_code: optional_attribute(node, "units-code")?,
            text: optional_attribute(node, "text")?,
        })
    }
}

impl WriteXml for DisplayValue {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start_with_attributes(
            element,
            &[
                ("units", Some(self.units.as_str())),
                ("units-code", self.units_code.as_deref()),
                ("text", self.text.as_deref()),
            ],
        )?;
        writer.text(&self.value.to_text())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("units", &self.units)
    }
}

/// A base-unit value plus an optional [`DisplayValue`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(bound = "")]
pub struct Measurement<U: MeasurementUnit> {
    value: f64,
    pub display: Option<DisplayValue>,
    #[serde(skip)]
    unit: PhantomData<U>,
}

impl<U: MeasurementUnit> Measurement<U> {
    /// # Errors
    ///
    /// Returns [`hrv_types::ValidationError::Range`] when the unit rejects `value`.
    pub fn new(value: f64) -> ValidationResult<Self> {
        Ok(Self {
            value: U::validate(value)?,
            display: None,
            unit: PhantomData,
        })
    }

    pub fn with_display(value: f64, display: DisplayValue) -> ValidationResult<Self> {
        let mut measurement = Self::new(value)?;
        measurement.display = Some(display);
        Ok(measurement)
    }

    /// The value in the base unit.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) -> ValidationResult<()> {
        self.value = U::validate(value)?;
        Ok(())
    }
}

impl Measurement<LengthUnit> {
    pub fn meters(&self) -> f64 {
        self.value
    }
}

impl Measurement<AltitudeUnit> {
    pub fn meters(&self) -> f64 {
        self.value
    }
}

impl Measurement<WeightUnit> {
    pub fn kilograms(&self) -> f64 {
        self.value
    }
}

impl<U: MeasurementUnit> fmt::Display for Measurement<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display {
            Some(display) => write!(f, "{display}"),
            None => U::format_value(self.value, f),
        }
    }
}

impl<U: MeasurementUnit> ReadXml for Measurement<U> {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            value: U::read_value(node)?,
            display: optional_child(node, "display")?,
            unit: PhantomData,
        })
    }
}

impl<U: MeasurementUnit> WriteXml for Measurement<U> {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        writer.start(element)?;
        U::write_value(self.value, writer)?;
        writer.optional("display", self.display.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        check_optional(&self.display)
    }
}

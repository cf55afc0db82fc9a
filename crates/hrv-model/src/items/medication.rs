//! Medications and the prescriptions behind them.

use super::RecordItem;
use crate::values::{
    ApproximateDateTime, CodableValue, GeneralMeasurement, HealthServiceDate, PersonItem,
};
use hrv_types::{in_range, ValidationResult};
use hrv_xml::{
    check_optional, optional_child, optional_text, require, require_checked, required_child,
    Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// Who prescribed a medication and on what terms. `<prescribed-by>` is mandatory.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Prescription {
    pub prescribed_by: Option<PersonItem>,
    pub date_prescribed: Option<ApproximateDateTime>,
    pub amount_prescribed: Option<GeneralMeasurement>,
    pub substitution: Option<CodableValue>,
    refills: Option<i32>,
    days_supply: Option<i32>,
    pub prescription_expiration: Option<HealthServiceDate>,
    pub instructions: Option<CodableValue>,
}

impl Prescription {
    pub fn new(prescribed_by: PersonItem) -> Self {
        Self {
            prescribed_by: Some(prescribed_by),
            ..Self::default()
        }
    }

    pub fn refills(&self) -> Option<i32> {
        self.refills
    }

    pub fn days_supply(&self) -> Option<i32> {
        self.days_supply
    }

    pub fn set_refills(&mut self, refills: Option<i32>) -> ValidationResult<()> {
        self.refills = refills
            .map(|r| in_range("refills", r, 0..=i32::MAX))
            .transpose()?;
        Ok(())
    }

    pub fn set_days_supply(&mut self, days: Option<i32>) -> ValidationResult<()> {
        self.days_supply = days
            .map(|d| in_range("days-supply", d, 1..=i32::MAX))
            .transpose()?;
        Ok(())
    }
}

impl ReadXml for Prescription {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        let mut prescription = Self {
            prescribed_by: Some(required_child(node, "prescribed-by")?),
            date_prescribed: optional_child(node, "date-prescribed")?,
            amount_prescribed: optional_child(node, "amount-prescribed")?,
            substitution: optional_child(node, "substitution")?,
            prescription_expiration: optional_child(node, "prescription-expiration")?,
            instructions: optional_child(node, "instructions")?,
            ..Self::default()
        };
        prescription.set_refills(optional_text(node, "refills")?)?;
        prescription.set_days_supply(optional_text(node, "days-supply")?)?;
        Ok(prescription)
    }
}

impl WriteXml for Prescription {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let prescribed_by = require("prescribed-by", &self.prescribed_by)?;

        writer.start(element)?;
        writer.child("prescribed-by", prescribed_by)?;
        writer.optional("date-prescribed", self.date_prescribed.as_ref())?;
        writer.optional("amount-prescribed", self.amount_prescribed.as_ref())?;
        writer.optional("substitution", self.substitution.as_ref())?;
        writer.optional_text("refills", self.refills.as_ref())?;
        writer.optional_text("days-supply", self.days_supply.as_ref())?;
        writer.optional(
            "prescription-expiration",
            self.prescription_expiration.as_ref(),
        )?;
        writer.optional("instructions", self.instructions.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("prescribed-by", &self.prescribed_by)?;
        check_optional(&self.date_prescribed)?;
        check_optional(&self.amount_prescribed)?;
        check_optional(&self.substitution)?;
        check_optional(&self.instructions)
    }
}

/// A medication the person takes or has taken. Only `<name>` is mandatory.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Medication {
    pub name: Option<CodableValue>,
    pub generic_name: Option<CodableValue>,
    pub dose: Option<GeneralMeasurement>,
    pub strength: Option<GeneralMeasurement>,
    pub frequency: Option<GeneralMeasurement>,
    pub route: Option<CodableValue>,
    pub indication: Option<CodableValue>,
    pub date_started: Option<ApproximateDateTime>,
    pub date_discontinued: Option<ApproximateDateTime>,
    pub prescribed: Option<CodableValue>,
    pub prescription: Option<Prescription>,
}

impl Medication {
    pub fn new(name: CodableValue) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }
}

impl RecordItem for Medication {
    const TYPE_ID: Uuid = Uuid::from_u128(0x30cafccc_047d_4288_94ef_643571f7919d);
    const TYPE_NAME: &'static str = "Medication";
    const ROOT_ELEMENT: &'static str = "medication";
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}")?;
        }
        if let Some(strength) = &self.strength {
            write!(f, " {strength}")?;
        }
        match (&self.dose, &self.frequency) {
            (Some(dose), Some(frequency)) => write!(f, ", {dose} {frequency}"),
            (Some(dose), None) => write!(f, ", {dose}"),
            (None, Some(frequency)) => write!(f, ", {frequency}"),
            (None, None) => Ok(()),
        }
    }
}

impl ReadXml for Medication {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            name: Some(required_child(node, "name")?),
            generic_name: optional_child(node, "generic-name")?,
            dose: optional_child(node, "dose")?,
            strength: optional_child(node, "strength")?,
            frequency: optional_child(node, "frequency")?,
            route: optional_child(node, "route")?,
            indication: optional_child(node, "indication")?,
            date_started: optional_child(node, "date-started")?,
            date_discontinued: optional_child(node, "date-discontinued")?,
            prescribed: optional_child(node, "prescribed")?,
            prescription: optional_child(node, "prescription")?,
        })
    }
}

impl WriteXml for Medication {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.validate()?;
        let name = require("name", &self.name)?;

        writer.start(element)?;
        writer.child("name", name)?;
        writer.optional("generic-name", self.generic_name.as_ref())?;
        writer.optional("dose", self.dose.as_ref())?;
        writer.optional("strength", self.strength.as_ref())?;
        writer.optional("frequency", self.frequency.as_ref())?;
        writer.optional("route", self.route.as_ref())?;
        writer.optional("indication", self.indication.as_ref())?;
        writer.optional("date-started", self.date_started.as_ref())?;
        writer.optional("date-discontinued", self.date_discontinued.as_ref())?;
        writer.optional("prescribed", self.prescribed.as_ref())?;
        writer.optional("prescription", self.prescription.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("name", &self.name)?;
        check_optional(&self.generic_name)?;
        check_optional(&self.dose)?;
        check_optional(&self.strength)?;
        check_optional(&self.frequency)?;
        check_optional(&self.route)?;
        check_optional(&self.indication)?;
        check_optional(&self.date_started)?;
        check_optional(&self.date_discontinued)?;
        check_optional(&self.prescribed)?;
        check_optional(&self.prescription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{ApproximateDate, CodedValue, Name};
    use hrv_types::ValidationError;
    use hrv_xml::XmlError;

    fn aspirin() -> Medication {
        let name = CodableValue::with_code(
            "Aspirin",
            CodedValue::new("1191", "RxNorm").unwrap(),
        )
        .unwrap();
        let mut medication = Medication::new(name);
        medication.strength = Some(GeneralMeasurement::new("81 mg").unwrap());
        medication.dose =
            Some(GeneralMeasurement::from_value(1.0, CodableValue::new("tablet").unwrap()).unwrap());
        medication.frequency = Some(GeneralMeasurement::new("daily").unwrap());
        medication.date_started = Some(ApproximateDate::new(2019).unwrap().into());
        medication
    }

    #[test]
    fn round_trips_through_xml() {
        let mut medication = aspirin();
        let mut prescription = Prescription::new(PersonItem::new(Name::new("Dr Who").unwrap()));
        prescription.set_refills(Some(0)).unwrap();
        prescription.set_days_supply(Some(30)).unwrap();
        prescription.prescription_expiration = Some(HealthServiceDate::new(2020, 6, 1).unwrap());
        medication.prescription = Some(prescription);

        let xml = medication.to_xml_string().unwrap();
        assert!(xml.starts_with(
            "<medication><name><text>Aspirin</text><code><value>1191</value><type>RxNorm</type>\
             </code></name>"
        ));
        assert!(xml.contains("<refills>0</refills><days-supply>30</days-supply>"));
        assert_eq!(Medication::from_xml_str(&xml).unwrap(), medication);
    }

    #[test]
    fn summary_lists_strength_dose_and_frequency() {
        assert_eq!(aspirin().to_string(), "Aspirin 81 mg, 1 tablet daily");
    }

    #[test]
    fn prescription_without_prescriber_is_named_before_writing() {
        let mut medication = aspirin();
        medication.prescription = Some(Prescription::default());
        let err = medication.to_xml_string().expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("prescribed-by")));
    }

    #[test]
    fn unlabelled_name_leaves_the_writer_empty() {
        let medication = Medication::new(CodableValue::default());
        let mut writer = XmlWriter::new(Vec::new());
        let err = medication.write_document(&mut writer).expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("text")));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn unnamed_prescriber_leaves_the_writer_empty() {
        let mut medication = aspirin();
        medication.prescription = Some(Prescription::new(PersonItem::default()));
        assert!(matches!(
            medication.validate(),
            Err(XmlError::MissingMandatory("name"))
        ));

        let mut writer = XmlWriter::new(Vec::new());
        assert!(medication.write_document(&mut writer).is_err());
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn days_supply_must_be_positive() {
        let mut prescription = Prescription::default();
        assert!(matches!(
            prescription.set_days_supply(Some(0)),
            Err(ValidationError::Range { field: "days-supply", .. })
        ));
        assert!(prescription.set_refills(Some(-1)).is_err());
    }

    #[test]
    fn missing_name_is_a_structure_error() {
        let err = Medication::from_xml_str("<medication><route><text>oral</text></route></medication>")
            .expect_err("should fail");
        assert!(matches!(err, XmlError::Structure { ref element, .. } if element == "name"));
    }
}

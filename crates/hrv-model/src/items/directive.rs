//! Advance directives and their endorsements.

use super::RecordItem;
use crate::values::{ApproximateDateTime, CodableValue, HealthServiceDateTime, PersonItem};
use hrv_types::{optional_non_blank, ValidationResult};
use hrv_xml::{
    check_each, check_optional, optional_child, optional_text, read_collection, require,
    require_checked, required_child, Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// An advance directive: what care the person does or does not want, and who witnessed it.
///
/// `<start-date>` and `<stop-date>` are mandatory. Endorsements and discontinuation details are
/// pairs of a person and the date-time they signed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Directive {
    pub start_date: Option<ApproximateDateTime>,
    pub stop_date: Option<ApproximateDateTime>,
    description: Option<String>,
    pub full_resuscitation: Option<bool>,
    pub prohibited_interventions: Vec<CodableValue>,
    additional_instructions: Option<String>,
    pub attending_physician: Option<PersonItem>,
    pub attending_physician_endorsement: Option<HealthServiceDateTime>,
    pub attending_nurse: Option<PersonItem>,
    pub attending_nurse_endorsement: Option<HealthServiceDateTime>,
    pub expiration_date: Option<HealthServiceDateTime>,
    pub discontinuation_date: Option<ApproximateDateTime>,
    pub discontinuation_physician: Option<PersonItem>,
    pub discontinuation_physician_endorsement: Option<HealthServiceDateTime>,
    pub discontinuation_nurse: Option<PersonItem>,
    pub discontinuation_nurse_endorsement: Option<HealthServiceDateTime>,
}

impl Directive {
    pub fn new(start_date: ApproximateDateTime, stop_date: ApproximateDateTime) -> Self {
        Self {
            start_date: Some(start_date),
            stop_date: Some(stop_date),
            ..Self::default()
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn additional_instructions(&self) -> Option<&str> {
        self.additional_instructions.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) -> ValidationResult<()> {
        self.description = optional_non_blank("description", description)?;
        Ok(())
    }

    pub fn set_additional_instructions(
        &mut self,
        instructions: Option<String>,
    ) -> ValidationResult<()> {
        self.additional_instructions = optional_non_blank("additional-instructions", instructions)?;
        Ok(())
    }

    /// True once a discontinuation date has been recorded.
    pub fn is_discontinued(&self) -> bool {
        self.discontinuation_date.is_some()
    }
}

impl RecordItem for Directive {
    const TYPE_ID: Uuid = Uuid::from_u128(0x822a5e5a_14f1_4d06_b92f_8f3f1b05218f);
    const TYPE_NAME: &'static str = "Advance Directive";
    const ROOT_ELEMENT: &'static str = "directive";
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => f.write_str(description)?,
            None => f.write_str("Advance directive")?,
        }
        if let (Some(start), Some(stop)) = (&self.start_date, &self.stop_date) {
            write!(f, " ({start} - {stop})")?;
        }
        Ok(())
    }
}

impl ReadXml for Directive {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            start_date: Some(required_child(node, "start-date")?),
            stop_date: Some(required_child(node, "stop-date")?),
            description: optional_text(node, "description")?,
            full_resuscitation: optional_text(node, "full-resuscitation")?,
            prohibited_interventions: read_collection(node, "prohibited-interventions")?,
            additional_instructions: optional_text(node, "additional-instructions")?,
            attending_physician: optional_child(node, "attending-physician")?,
            attending_physician_endorsement: optional_child(
                node,
                "attending-physician-endorsement",
            )?,
            attending_nurse: optional_child(node, "attending-nurse")?,
            attending_nurse_endorsement: optional_child(node, "attending-nurse-endorsement")?,
            expiration_date: optional_child(node, "expiration-date")?,
            discontinuation_date: optional_child(node, "discontinuation-date")?,
            discontinuation_physician: optional_child(node, "discontinuation-physician")?,
            discontinuation_physician_endorsement: optional_child(
                node,
                "discontinuation-physician-endorsement",
            )?,
            discontinuation_nurse: optional_child(node, "discontinuation-nurse")?,
            discontinuation_nurse_endorsement: optional_child(
                node,
                "discontinuation-nurse-endorsement",
            )?,
        })
    }
}

impl WriteXml for Directive {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.validate()?;
        let start_date = require("start-date", &self.start_date)?;
        let stop_date = require("stop-date", &self.stop_date)?;

        writer.start(element)?;
        writer.child("start-date", start_date)?;
        writer.child("stop-date", stop_date)?;
        writer.optional_text("description", self.description.as_ref())?;
        writer.optional_text("full-resuscitation", self.full_resuscitation.as_ref())?;
        writer.repeated(&self.prohibited_interventions, "prohibited-interventions")?;
        writer.optional_text(
            "additional-instructions",
            self.additional_instructions.as_ref(),
        )?;
        writer.optional("attending-physician", self.attending_physician.as_ref())?;
        writer.optional(
            "attending-physician-endorsement",
            self.attending_physician_endorsement.as_ref(),
        )?;
        writer.optional("attending-nurse", self.attending_nurse.as_ref())?;
        writer.optional(
            "attending-nurse-endorsement",
            self.attending_nurse_endorsement.as_ref(),
        )?;
        writer.optional("expiration-date", self.expiration_date.as_ref())?;
        writer.optional("discontinuation-date", self.discontinuation_date.as_ref())?;
        writer.optional(
            "discontinuation-physician",
            self.discontinuation_physician.as_ref(),
        )?;
        writer.optional(
            "discontinuation-physician-endorsement",
            self.discontinuation_physician_endorsement.as_ref(),
        )?;
        writer.optional("discontinuation-nurse", self.discontinuation_nurse.as_ref())?;
        writer.optional(
            "discontinuation-nurse-endorsement",
            self.discontinuation_nurse_endorsement.as_ref(),
        )?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("start-date", &self.start_date)?;
        require_checked("stop-date", &self.stop_date)?;
        check_each(&self.prohibited_interventions)?;
        check_optional(&self.attending_physician)?;
        check_optional(&self.attending_physician_endorsement)?;
        check_optional(&self.attending_nurse)?;
        check_optional(&self.attending_nurse_endorsement)?;
        check_optional(&self.expiration_date)?;
        check_optional(&self.discontinuation_date)?;
        check_optional(&self.discontinuation_physician)?;
        check_optional(&self.discontinuation_physician_endorsement)?;
        check_optional(&self.discontinuation_nurse)?;
        check_optional(&self.discontinuation_nurse_endorsement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{ApproximateDate, HealthServiceDate, Name};
    use hrv_xml::XmlError;

    fn directive() -> Directive {
        Directive::new(
            ApproximateDate::from_ymd(2022, 1, 10).unwrap().into(),
            ApproximateDateTime::descriptive("until revoked").unwrap(),
        )
    }

    #[test]
    fn round_trips_interventions_in_order() {
        let mut directive = directive();
        directive
            .set_description(Some("No ventilation".into()))
            .unwrap();
        directive.full_resuscitation = Some(false);
        directive.prohibited_interventions = vec![
            CodableValue::new("Mechanical ventilation").unwrap(),
            CodableValue::new("Tube feeding").unwrap(),
        ];
        directive.attending_physician = Some(PersonItem::new(Name::new("Dr Grey").unwrap()));
        directive.attending_physician_endorsement = Some(HealthServiceDateTime::new(
            HealthServiceDate::new(2022, 1, 10).unwrap(),
        ));

        let xml = directive.to_xml_string().unwrap();
        assert!(xml.contains(
            "<full-resuscitation>false</full-resuscitation>\
             <prohibited-interventions><text>Mechanical ventilation</text></prohibited-interventions>\
             <prohibited-interventions><text>Tube feeding</text></prohibited-interventions>"
        ));
        assert_eq!(Directive::from_xml_str(&xml).unwrap(), directive);
        assert_eq!(
            directive.to_string(),
            "No ventilation (2022-01-10 - until revoked)"
        );
    }

    #[test]
    fn stop_date_is_mandatory() {
        let mut directive = directive();
        directive.stop_date = None;
        let err = directive.to_xml_string().expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("stop-date")));
    }

    #[test]
    fn unnamed_nurse_leaves_the_writer_empty() {
        let mut directive = directive();
        directive.attending_nurse = Some(PersonItem::default());

        let mut writer = XmlWriter::new(Vec::new());
        let err = directive.write_document(&mut writer).expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("name")));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn blank_intervention_is_caught_before_writing() {
        let mut directive = directive();
        directive.prohibited_interventions = vec![CodableValue::default()];
        assert!(matches!(
            directive.validate(),
            Err(XmlError::MissingMandatory("text"))
        ));
    }

    #[test]
    fn discontinuation_is_detected() {
        let mut directive = directive();
        assert!(!directive.is_discontinued());
        directive.discontinuation_date = Some(ApproximateDate::new(2023).unwrap().into());
        assert!(directive.is_discontinued());
    }
}

//! Insurer explanations of what a claim cost and who pays it.

use super::RecordItem;
use crate::values::{
    ClaimAmounts, CodableValue, DurationValue, HealthServiceDateTime, Organization, PersonItem,
};
use hrv_types::{non_blank, optional_non_blank, ValidationResult};
use hrv_xml::{
    check_each, check_optional, optional_child, optional_text, read_collection, require,
    require_checked, require_text, required_child, required_text, Node, ReadXml, WriteXml, XmlError, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// One billed service on a claim. Everything except `<diagnosis>` and `<notes>` is mandatory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Service {
    pub service_type: Option<CodableValue>,
    pub diagnosis: Option<CodableValue>,
    pub service_dates: Option<DurationValue>,
    pub claim_amounts: Option<ClaimAmounts>,
    notes: Option<String>,
}

impl Service {
    pub fn new(
        service_type: CodableValue,
        service_dates: DurationValue,
        claim_amounts: ClaimAmounts,
    ) -> Self {
        Self {
            service_type: Some(service_type),
            diagnosis: None,
            service_dates: Some(service_dates),
            claim_amounts: Some(claim_amounts),
            notes: None,
        }
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_notes(&mut self, notes: Option<String>) -> ValidationResult<()> {
        self.notes = optional_non_blank("notes", notes)?;
        Ok(())
    }
}

impl ReadXml for Service {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            service_type: Some(required_child(node, "service-type")?),
            diagnosis: optional_child(node, "diagnosis")?,
            service_dates: Some(required_child(node, "service-dates")?),
            claim_amounts: Some(required_child(node, "claim-amounts")?),
            notes: optional_text(node, "notes")?,
        })
    }
}

impl WriteXml for Service {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let service_type = require("service-type", &self.service_type)?;
        let service_dates = require("service-dates", &self.service_dates)?;
        let claim_amounts = require("claim-amounts", &self.claim_amounts)?;

        writer.start(element)?;
        writer.child("service-type", service_type)?;
        writer.optional("diagnosis", self.diagnosis.as_ref())?;
        writer.child("service-dates", service_dates)?;
        writer.child("claim-amounts", claim_amounts)?;
        writer.optional_text("notes", self.notes.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("service-type", &self.service_type)?;
        check_optional(&self.diagnosis)?;
        require_checked("service-dates", &self.service_dates)?;
        require_checked("claim-amounts", &self.claim_amounts)?;
        Ok(())
    }
}

/// An insurer's explanation of what a claim cost and who pays what.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExplanationOfBenefits {
    pub date_submitted: Option<HealthServiceDateTime>,
    pub patient: Option<PersonItem>,
    pub relationship_to_member: Option<CodableValue>,
    pub plan: Option<Organization>,
    member_id: String,
    pub claim_type: Option<CodableValue>,
    claim_id: String,
    pub submitted_by: Option<Organization>,
    pub provider: Option<Organization>,
    pub currency: Option<CodableValue>,
    pub claim_totals: Option<ClaimAmounts>,
    pub services: Vec<Service>,
}

impl ExplanationOfBenefits {
    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn claim_id(&self) -> &str {
        &self.claim_id
    }

    pub fn set_member_id(&mut self, member_id: impl Into<String>) -> ValidationResult<()> {
        self.member_id = non_blank("member-id", member_id)?;
        Ok(())
    }

    pub fn set_claim_id(&mut self, claim_id: impl Into<String>) -> ValidationResult<()> {
        self.claim_id = non_blank("claim-id", claim_id)?;
        Ok(())
    }
}

impl RecordItem for ExplanationOfBenefits {
    const TYPE_ID: Uuid = Uuid::from_u128(0x356fbba9_e0c9_4f4f_b0d9_4594f2490d2f);
    const TYPE_NAME: &'static str = "Explanation of Benefits";
    const ROOT_ELEMENT: &'static str = "explanation-of-benefits";
}

impl fmt::Display for ExplanationOfBenefits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Claim {}", self.claim_id)?;
        if let Some(provider) = &self.provider {
            write!(f, " from {provider}")?;
        }
        if let Some(totals) = &self.claim_totals {
            write!(f, ": {totals}")?;
        }
        Ok(())
    }
}

impl ReadXml for ExplanationOfBenefits {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            date_submitted: Some(required_child(node, "date-submitted")?),
            patient: Some(required_child(node, "patient")?),
            relationship_to_member: optional_child(node, "relationship-to-member")?,
            plan: Some(required_child(node, "plan")?),
            member_id: required_text(node, "member-id")?,
            claim_type: Some(required_child(node, "claim-type")?),
            claim_id: required_text(node, "claim-id")?,
            submitted_by: Some(required_child(node, "submitted-by")?),
            provider: Some(required_child(node, "provider")?),
            currency: Some(required_child(node, "currency")?),
            claim_totals: Some(required_child(node, "claim-totals")?),
            services: read_collection(node, "services/service")?,
        })
    }
}

impl WriteXml for ExplanationOfBenefits {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.validate()?;

        writer.start(element)?;
        writer.child("date-submitted", require("date-submitted", &self.date_submitted)?)?;
        writer.child("patient", require("patient", &self.patient)?)?;
        writer.optional(
            "relationship-to-member",
            self.relationship_to_member.as_ref(),
        )?;
        writer.child("plan", require("plan", &self.plan)?)?;
        writer.element("member-id", &self.member_id)?;
        writer.child("claim-type", require("claim-type", &self.claim_type)?)?;
        writer.element("claim-id", &self.claim_id)?;
        writer.child("submitted-by", require("submitted-by", &self.submitted_by)?)?;
        writer.child("provider", require("provider", &self.provider)?)?;
        writer.child("currency", require("currency", &self.currency)?)?;
        writer.child("claim-totals", require("claim-totals", &self.claim_totals)?)?;
        writer.collection("services", &self.services, "service")?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("date-submitted", &self.date_submitted)?;
        require_checked("patient", &self.patient)?;
        check_optional(&self.relationship_to_member)?;
        require_checked("plan", &self.plan)?;
        require_text("member-id", &self.member_id)?;
        require_checked("claim-type", &self.claim_type)?;
        require_text("claim-id", &self.claim_id)?;
        require_checked("submitted-by", &self.submitted_by)?;
        require_checked("provider", &self.provider)?;
        require_checked("currency", &self.currency)?;
        require_checked("claim-totals", &self.claim_totals)?;
        if self.services.is_empty() {
            return Err(XmlError::MissingMandatory("services"));
        }
        check_each(&self.services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{ApproximateDate, HealthServiceDate, Name};
    use rust_decimal_macros::dec;

    fn amounts(charged: rust_decimal::Decimal) -> ClaimAmounts {
        let mut amounts = ClaimAmounts::default();
        amounts.charged_amount = Some(charged);
        amounts.negotiated_amount = Some(dec!(90.00));
        amounts.coinsurance = Some(dec!(0));
        amounts.copay = Some(dec!(10.00));
        amounts.deductible = Some(dec!(0));
        amounts.amount_not_covered = Some(dec!(0));
        amounts.eligible_for_benefits = Some(dec!(80.00));
        amounts.miscellaneous_adjustments = Some(dec!(0));
        amounts.benefits_paid = Some(dec!(80.00));
        amounts.patient_responsibility = Some(dec!(10.00));
        amounts
    }

    fn claim() -> ExplanationOfBenefits {
        let visit = DurationValue::new(
            ApproximateDate::from_ymd(2023, 4, 2).unwrap().into(),
            ApproximateDate::from_ymd(2023, 4, 2).unwrap().into(),
        );
        let mut eob = ExplanationOfBenefits {
            date_submitted: Some(HealthServiceDateTime::new(
                HealthServiceDate::new(2023, 4, 3).unwrap(),
            )),
            patient: Some(PersonItem::new(Name::new("Sam Taylor").unwrap())),
            plan: Some(Organization::new("Acme Health Plan").unwrap()),
            claim_type: Some(CodableValue::new("Medical").unwrap()),
            submitted_by: Some(Organization::new("Bath Clinic").unwrap()),
            provider: Some(Organization::new("Bath Clinic").unwrap()),
            currency: Some(CodableValue::new("USD").unwrap()),
            claim_totals: Some(amounts(dec!(100.00))),
            services: vec![Service::new(
                CodableValue::new("Office visit").unwrap(),
                visit,
                amounts(dec!(100.00)),
            )],
            ..ExplanationOfBenefits::default()
        };
        eob.set_member_id("M-1001").unwrap();
        eob.set_claim_id("C-77").unwrap();
        eob
    }

    #[test]
    fn round_trips_a_full_claim() {
        let eob = claim();
        let xml = eob.to_xml_string().unwrap();
        assert!(xml.contains("<member-id>M-1001</member-id>"));
        assert!(xml.contains("<services><service><service-type><text>Office visit</text>"));
        assert_eq!(ExplanationOfBenefits::from_xml_str(&xml).unwrap(), eob);
        assert_eq!(
            eob.to_string(),
            "Claim C-77 from Bath Clinic: charged 100.00, patient owes 10.00"
        );
    }

    #[test]
    fn at_least_one_service_is_required() {
        let mut eob = claim();
        eob.services.clear();
        let err = eob.to_xml_string().expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("services")));
    }

    #[test]
    fn incomplete_service_is_named() {
        let mut eob = claim();
        eob.services[0].claim_amounts = None;
        let err = eob.to_xml_string().expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("claim-amounts")));
    }

    #[test]
    fn incomplete_totals_leave_the_writer_empty() {
        let mut eob = claim();
        if let Some(totals) = eob.claim_totals.as_mut() {
            totals.copay = None;
        }
        let mut writer = XmlWriter::new(Vec::new());
        let err = eob.write_document(&mut writer).expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("copay")));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn nameless_service_type_leaves_the_writer_empty() {
        let mut eob = claim();
        eob.services[0].service_type = Some(CodableValue::default());
        let mut writer = XmlWriter::new(Vec::new());
        let err = eob.write_document(&mut writer).expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("text")));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn blank_claim_id_is_rejected() {
        let mut eob = claim();
        assert!(eob.set_claim_id(" ").is_err());
        assert_eq!(eob.claim_id(), "C-77");
    }
}

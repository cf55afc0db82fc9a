//! Monetary breakdown of an insurance claim.

use hrv_types::{in_range, ValidationResult};
use hrv_xml::{
    optional_text, require, required_text, Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// The amounts on one claim line. Every amount except `percentage_covered` is mandatory.
///
/// Amounts are [`Decimal`] so that `12.50` is written back as `12.50`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClaimAmounts {
    pub charged_amount: Option<Decimal>,
    pub negotiated_amount: Option<Decimal>,
    pub coinsurance: Option<Decimal>,
    pub copay: Option<Decimal>,
    pub deductible: Option<Decimal>,
    pub amount_not_covered: Option<Decimal>,
    pub eligible_for_benefits: Option<Decimal>,
    percentage_covered: Option<Decimal>,
    pub miscellaneous_adjustments: Option<Decimal>,
    pub benefits_paid: Option<Decimal>,
    pub patient_responsibility: Option<Decimal>,
}

impl ClaimAmounts {
    pub fn percentage_covered(&self) -> Option<Decimal> {
        self.percentage_covered
    }

    /// # Errors
    ///
    /// Returns [`hrv_types::ValidationError::Range`] outside `0..=100`.
    pub fn set_percentage_covered(&mut self, percentage: Option<Decimal>) -> ValidationResult<()> {
        self.percentage_covered = percentage
            .map(|p| in_range("percentage-covered", p, Decimal::ZERO..=Decimal::ONE_HUNDRED))
            .transpose()?;
        Ok(())
    }
}

impl fmt::Display for ClaimAmounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(charged) = self.charged_amount {
            write!(f, "charged {charged}")?;
        }
        if let Some(owed) = self.patient_responsibility {
            write!(f, ", patient owes {owed}")?;
        }
        Ok(())
    }
}

impl ReadXml for ClaimAmounts {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        let mut amounts = Self {
            charged_amount: Some(required_text(node, "charged-amount")?),
            negotiated_amount: Some(required_text(node, "negotiated-amount")?),
            coinsurance: Some(required_text(node, "coinsurance")?),
            copay: Some(required_text(node, "copay")?),
            deductible: Some(required_text(node, "deductible")?),
            amount_not_covered: Some(required_text(node, "amount-not-covered")?),
            eligible_for_benefits: Some(required_text(node, "eligible-for-benefits")?),
            percentage_covered: None,
            miscellaneous_adjustments: Some(required_text(node, "miscellaneous-adjustments")?),
            benefits_paid: Some(required_text(node, "benefits-paid")?),
            patient_responsibility: Some(required_text(node, "patient-responsibility")?),
        };
        amounts.set_percentage_covered(optional_text(node, "percentage-covered")?)?;
        Ok(amounts)
    }
}

impl ClaimAmounts {
    /// The mandatory amounts in document order, or the first one that is unset.
    fn mandatory_amounts(&self) -> XmlResult<[(&'static str, &Decimal); 10]> {
        Ok([
            ("charged-amount", require("charged-amount", &self.charged_amount)?),
            ("negotiated-amount", require("negotiated-amount", &self.negotiated_amount)?),
            ("coinsurance", require("coinsurance", &self.coinsurance)?),
            ("copay", require("copay", &self.copay)?),
            ("deductible", require("deductible", &self.deductible)?),
            ("amount-not-covered", require("amount-not-covered", &self.amount_not_covered)?),
            (
                "eligible-for-benefits",
                require("eligible-for-benefits", &self.eligible_for_benefits)?,
            ),
            (
                "miscellaneous-adjustments",
                require("miscellaneous-adjustments", &self.miscellaneous_adjustments)?,
            ),
            ("benefits-paid", require("benefits-paid", &self.benefits_paid)?),
            (
                "patient-responsibility",
                require("patient-responsibility", &self.patient_responsibility)?,
            ),
        ])
    }
}

impl WriteXml for ClaimAmounts {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        let amounts = self.mandatory_amounts()?;
        // `percentage-covered` sits between eligible-for-benefits and miscellaneous-adjustments.
        let (leading, trailing) = amounts.split_at(7);

        writer.start(element)?;
        for (name, amount) in leading {
            writer.element(name, *amount)?;
        }
        writer.optional_text("percentage-covered", self.percentage_covered.as_ref())?;
        for (name, amount) in trailing {
            writer.element(name, *amount)?;
        }
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        self.mandatory_amounts().map(|_| ())
    }
}

//! People and organizations referenced from record items (prescribers, payers, providers).

use super::{CodableValue, ContactInfo, Name};
use hrv_types::{non_blank, optional_non_blank, ValidationResult};
use hrv_xml::{
    check_each, check_optional, optional_child, optional_text, read_collection, require,
    require_checked, require_text, required_child, required_text, Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// `<name>`, `<contact>`, repeated `<type>`, `<website>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Organization {
    name: String,
    pub contact: Option<ContactInfo>,
    pub types: Vec<CodableValue>,
    website: Option<String>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            name: non_blank("name", name)?,
            ..Self::default()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ValidationResult<()> {
        self.name = non_blank("name", name)?;
        Ok(())
    }

    pub fn set_website(&mut self, website: Option<String>) -> ValidationResult<()> {
        self.website = optional_non_blank("website", website)?;
        Ok(())
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl ReadXml for Organization {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            name: required_text(node, "name")?,
            contact: optional_child(node, "contact")?,
            types: read_collection(node, "type")?,
            website: optional_text(node, "website")?,
        })
    }
}

impl WriteXml for Organization {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start(element)?;
        writer.element("name", &self.name)?;
        writer.optional("contact", self.contact.as_ref())?;
        writer.repeated(&self.types, "type")?;
        writer.optional_text("website", self.website.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("name", &self.name)?;
        check_optional(&self.contact)?;
        check_each(&self.types)
    }
}

/// A person in a clinical role: `<name>` is mandatory, the rest optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PersonItem {
    pub name: Option<Name>,
    organization: Option<String>,
    professional_training: Option<String>,
    id: Option<String>,
    pub contact: Option<ContactInfo>,
    pub person_type: Option<CodableValue>,
}

impl PersonItem {
    pub fn new(name: Name) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn professional_training(&self) -> Option<&str> {
        self.professional_training.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_organization(&mut self, organization: Option<String>) -> ValidationResult<()> {
        self.organization = optional_non_blank("organization", organization)?;
        Ok(())
    }

    pub fn set_professional_training(&mut self, training: Option<String>) -> ValidationResult<()> {
        self.professional_training = optional_non_blank("professional-training", training)?;
        Ok(())
    }

    pub fn set_id(&mut self, id: Option<String>) -> ValidationResult<()> {
        self.id = optional_non_blank("id", id)?;
        Ok(())
    }
}

impl fmt::Display for PersonItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}")?;
        }
        if let Some(organization) = &self.organization {
            write!(f, " ({organization})")?;
        }
        Ok(())
    }
}

impl ReadXml for PersonItem {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            name: Some(required_child(node, "name")?),
            organization: optional_text(node, "organization")?,
            professional_training: optional_text(node, "professional-training")?,
            id: optional_text(node, "id")?,
            contact: optional_child(node, "contact")?,
            person_type: optional_child(node, "type")?,
        })
    }
}

impl WriteXml for PersonItem {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let name = require("name", &self.name)?;

        writer.start(element)?;
        writer.child("name", name)?;
        writer.optional_text("organization", self.organization.as_ref())?;
        writer.optional_text("professional-training", self.professional_training.as_ref())?;
        writer.optional_text("id", self.id.as_ref())?;
        writer.optional("contact", self.contact.as_ref())?;
        writer.optional("type", self.person_type.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("name", &self.name)?;
        check_optional(&self.contact)?;
        check_optional(&self.person_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Phone;
    use hrv_xml::{parse_document, to_xml_string, XmlError};

    fn parse<T: ReadXml>(xml: &str) -> XmlResult<T> {
        let doc = parse_document(xml).unwrap();
        T::read_xml(doc.root_element())
    }

    #[test]
    fn person_requires_a_name_to_be_written() {
        let err = to_xml_string(&PersonItem::default(), "prescribed-by").expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("name")));
    }

    #[test]
    fn organization_checks_its_contact_details() {
        let mut organization = Organization::new("Bath Clinic").unwrap();
        organization.contact = Some(ContactInfo {
            phone: vec![Phone::default()],
            ..ContactInfo::default()
        });
        let mut writer = XmlWriter::new(Vec::new());
        let err = organization
            .write_xml("provider", &mut writer)
            .expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("number")));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn person_round_trips_with_contact() {
        let mut person = PersonItem::new(Name::new("Dr Jane Smith").unwrap());
        person.set_organization(Some("Bath Clinic".into())).unwrap();
        person.contact = Some(ContactInfo {
            phone: vec![Phone::new("01225 111111").unwrap()],
            ..ContactInfo::default()
        });
        person.person_type = Some(CodableValue::new("Provider").unwrap());

        let xml = to_xml_string(&person, "prescribed-by").unwrap();
        assert_eq!(
            xml,
            "<prescribed-by><name><full>Dr Jane Smith</full></name>\
             <organization>Bath Clinic</organization>\
             <contact><phone><number>01225 111111</number></phone></contact>\
             <type><text>Provider</text></type></prescribed-by>"
        );
        assert_eq!(parse::<PersonItem>(&xml).unwrap(), person);
        assert_eq!(person.to_string(), "Dr Jane Smith (Bath Clinic)");
    }

    #[test]
    fn person_without_name_element_is_a_structure_error() {
        let err = parse::<PersonItem>("<person><id>42</id></person>").expect_err("should fail");
        assert!(matches!(err, XmlError::Structure { ref element, .. } if element == "name"));
    }

    #[test]
    fn organization_keeps_repeated_types() {
        let mut org = Organization::new("Acme Health").unwrap();
        org.types = vec![
            CodableValue::new("Insurer").unwrap(),
            CodableValue::new("Payer").unwrap(),
        ];
        org.set_website(Some("https://acme.example".into())).unwrap();

        let xml = to_xml_string(&org, "payer").unwrap();
        let parsed = parse::<Organization>(&xml).unwrap();
        assert_eq!(parsed.types.len(), 2);
        assert_eq!(parsed.types[1].text(), "Payer");
        assert_eq!(parsed, org);
    }
}

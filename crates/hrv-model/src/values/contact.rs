//! Names and contact details: postal addresses, phone numbers and email addresses.

use super::CodableValue;
use hrv_types::{non_blank, optional_non_blank, ValidationResult};
use hrv_xml::{
    check_each, check_optional, optional_child, optional_text, read_collection,
    read_text_collection, require_text, required_text, Node, ReadXml, WriteXml, XmlError,
    XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// A person's name: `<full>` plus optional structured parts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Name {
    full: String,
    pub title: Option<CodableValue>,
    first: Option<String>,
    middle: Option<String>,
    last: Option<String>,
    pub suffix: Option<CodableValue>,
}

impl Name {
    pub fn new(full: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            full: non_blank("full", full)?,
            ..Self::default()
        })
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn first(&self) -> Option<&str> {
        self.first.as_deref()
    }

    pub fn middle(&self) -> Option<&str> {
        self.middle.as_deref()
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn set_full(&mut self, full: impl Into<String>) -> ValidationResult<()> {
        self.full = non_blank("full", full)?;
        Ok(())
    }

    pub fn set_first(&mut self, first: Option<String>) -> ValidationResult<()> {
        self.first = optional_non_blank("first", first)?;
        Ok(())
    }

    pub fn set_middle(&mut self, middle: Option<String>) -> ValidationResult<()> {
        self.middle = optional_non_blank("middle", middle)?;
        Ok(())
    }

    pub fn set_last(&mut self, last: Option<String>) -> ValidationResult<()> {
        self.last = optional_non_blank("last", last)?;
        Ok(())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl ReadXml for Name {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            full: required_text(node, "full")?,
            title: optional_child(node, "title")?,
            first: optional_text(node, "first")?,
            middle: optional_text(node, "middle")?,
            last: optional_text(node, "last")?,
            suffix: optional_child(node, "suffix")?,
        })
    }
}

impl WriteXml for Name {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start(element)?;
        writer.element("full", &self.full)?;
        writer.optional("title", self.title.as_ref())?;
        writer.optional_text("first", self.first.as_ref())?;
        writer.optional_text("middle", self.middle.as_ref())?;
        writer.optional_text("last", self.last.as_ref())?;
        writer.optional("suffix", self.suffix.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("full", &self.full)?;
        check_optional(&self.title)?;
        check_optional(&self.suffix)
    }
}

/// A postal address. At least one street line, the city, postcode and country are mandatory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    description: Option<String>,
    pub is_primary: Option<bool>,
    street: Vec<String>,
    city: String,
    state: Option<String>,
    postcode: String,
    country: String,
    county: Option<String>,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postcode: impl Into<String>,
        country: impl Into<String>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            street: vec![non_blank("street", street)?],
            city: non_blank("city", city)?,
            postcode: non_blank("postcode", postcode)?,
            country: non_blank("country", country)?,
            ..Self::default()
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn street(&self) -> &[String] {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn county(&self) -> Option<&str> {
        self.county.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) -> ValidationResult<()> {
        self.description = optional_non_blank("description", description)?;
        Ok(())
    }

    pub fn add_street(&mut self, line: impl Into<String>) -> ValidationResult<()> {
        self.street.push(non_blank("street", line)?);
        Ok(())
    }

    pub fn clear_street(&mut self) {
        self.street.clear();
    }

    pub fn set_city(&mut self, city: impl Into<String>) -> ValidationResult<()> {
        self.city = non_blank("city", city)?;
        Ok(())
    }

    pub fn set_state(&mut self, state: Option<String>) -> ValidationResult<()> {
        self.state = optional_non_blank("state", state)?;
        Ok(())
    }

    pub fn set_postcode(&mut self, postcode: impl Into<String>) -> ValidationResult<()> {
        self.postcode = non_blank("postcode", postcode)?;
        Ok(())
    }

    pub fn set_country(&mut self, country: impl Into<String>) -> ValidationResult<()> {
        self.country = non_blank("country", country)?;
        Ok(())
    }

    pub fn set_county(&mut self, county: Option<String>) -> ValidationResult<()> {
        self.county = optional_non_blank("county", county)?;
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = self.street.iter().map(String::as_str).collect();
        parts.push(&self.city);
        if let Some(state) = &self.state {
            parts.push(state);
        }
        parts.push(&self.postcode);
        parts.push(&self.country);
        let parts: Vec<&str> = parts.into_iter().filter(|p| !p.is_empty()).collect();
        f.write_str(&parts.join(", "))
    }
}

impl ReadXml for Address {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            description: optional_text(node, "description")?,
            is_primary: optional_text(node, "is-primary")?,
            street: read_text_collection(node, "street")?,
            city: required_text(node, "city")?,
            state: optional_text(node, "state")?,
            postcode: required_text(node, "postcode")?,
            country: required_text(node, "country")?,
            county: optional_text(node, "county")?,
        })
    }
}

impl WriteXml for Address {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start(element)?;
        writer.optional_text("description", self.description.as_ref())?;
        writer.optional_text("is-primary", self.is_primary.as_ref())?;
        writer.repeated_text(&self.street, "street")?;
        writer.element("city", &self.city)?;
        writer.optional_text("state", self.state.as_ref())?;
        writer.element("postcode", &self.postcode)?;
        writer.element("country", &self.country)?;
        writer.optional_text("county", self.county.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        if self.street.is_empty() {
            return Err(XmlError::MissingMandatory("street"));
        }
        require_text("city", &self.city)?;
        require_text("postcode", &self.postcode)?;
        require_text("country", &self.country)
    }
}

/// A telephone number: `<description>`, `<is-primary>`, `<number>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Phone {
    description: Option<String>,
    pub is_primary: Option<bool>,
    number: String,
}

impl Phone {
    pub fn new(number: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            number: non_blank("number", number)?,
            ..Self::default()
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn set_description(&mut self, description: Option<String>) -> ValidationResult<()> {
        self.description = optional_non_blank("description", description)?;
        Ok(())
    }

    pub fn set_number(&mut self, number: impl Into<String>) -> ValidationResult<()> {
        self.number = non_blank("number", number)?;
        Ok(())
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{} ({description})", self.number),
            None => f.write_str(&self.number),
        }
    }
}

impl ReadXml for Phone {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            description: optional_text(node, "description")?,
            is_primary: optional_text(node, "is-primary")?,
            number: required_text(node, "number")?,
        })
    }
}

impl WriteXml for Phone {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start(element)?;
        writer.optional_text("description", self.description.as_ref())?;
        writer.optional_text("is-primary", self.is_primary.as_ref())?;
        writer.element("number", &self.number)?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("number", &self.number)
    }
}

/// An email address: `<description>`, `<is-primary>`, `<address>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Email {
    description: Option<String>,
    pub is_primary: Option<bool>,
    address: String,
}

impl Email {
    pub fn new(address: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            address: non_blank("address", address)?,
            ..Self::default()
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_description(&mut self, description: Option<String>) -> ValidationResult<()> {
        self.description = optional_non_blank("description", description)?;
        Ok(())
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> ValidationResult<()> {
        self.address = non_blank("address", address)?;
        Ok(())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl ReadXml for Email {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            description: optional_text(node, "description")?,
            is_primary: optional_text(node, "is-primary")?,
            address: required_text(node, "address")?,
        })
    }
}

impl WriteXml for Email {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;

        writer.start(element)?;
        writer.optional_text("description", self.description.as_ref())?;
        writer.optional_text("is-primary", self.is_primary.as_ref())?;
        writer.element("address", &self.address)?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("address", &self.address)
    }
}

/// Every way of reaching someone, each as repeated unwrapped elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    pub address: Vec<Address>,
    pub phone: Vec<Phone>,
    pub email: Vec<Email>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.address.is_empty() && self.phone.is_empty() && self.email.is_empty()
    }

    /// The entry flagged primary, else the first one.
    pub fn primary_phone(&self) -> Option<&Phone> {
        self.phone
            .iter()
            .find(|p| p.is_primary == Some(true))
            .or_else(|| self.phone.first())
    }

    pub fn primary_email(&self) -> Option<&Email> {
        self.email
            .iter()
            .find(|e| e.is_primary == Some(true))
            .or_else(|| self.email.first())
    }
}

impl fmt::Display for ContactInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(address) = self.address.first() {
            parts.push(address.to_string());
        }
        if let Some(phone) = self.primary_phone() {
            parts.push(phone.to_string());
        }
        if let Some(email) = self.primary_email() {
            parts.push(email.to_string());
        }
        f.write_str(&parts.join("; "))
    }
}

impl ReadXml for ContactInfo {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            address: read_collection(node, "address")?,
            phone: read_collection(node, "phone")?,
            email: read_collection(node, "email")?,
        })
    }
}

impl WriteXml for ContactInfo {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        writer.start(element)?;
        writer.repeated(&self.address, "address")?;
        writer.repeated(&self.phone, "phone")?;
        writer.repeated(&self.email, "email")?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        check_each(&self.address)?;
        check_each(&self.phone)?;
        check_each(&self.email)
    }
}

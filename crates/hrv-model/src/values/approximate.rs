//! Partially known dates: year only, year and month, or a free-text description.

use super::date::{DAY_RANGE, MONTH_RANGE, YEAR_RANGE};
use super::{ApproximateTime, CodableValue};
use hrv_types::{in_range, non_blank, ValidationError, ValidationResult};
use hrv_xml::{
    check_optional, child, optional_child, optional_text, require, require_checked, require_text,
    required_child, required_text, Node, ReadXml, WriteXml, XmlError, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// A date where only the year is certain: `<y>`, optional `<m>`, optional `<d>`.
///
/// Orders by year, then month, then day, with an absent component sorting first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ApproximateDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

impl ApproximateDate {
    pub fn new(year: i32) -> ValidationResult<Self> {
        Ok(Self {
            year: in_range("year", year, YEAR_RANGE)?,
            month: None,
            day: None,
        })
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> ValidationResult<Self> {
        let mut date = Self::new(year)?;
        date.set_month(Some(month))?;
        date.set_day(Some(day))?;
        Ok(date)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn set_year(&mut self, year: i32) -> ValidationResult<()> {
        self.year = in_range("year", year, YEAR_RANGE)?;
        Ok(())
    }

    /// Clearing the month also clears the day.
    pub fn set_month(&mut self, month: Option<u32>) -> ValidationResult<()> {
        self.month = month.map(|m| in_range("month", m, MONTH_RANGE)).transpose()?;
        if self.month.is_none() {
            self.day = None;
        }
        Ok(())
    }

    pub fn set_day(&mut self, day: Option<u32>) -> ValidationResult<()> {
        if day.is_some() && self.month.is_none() {
            return Err(ValidationError::Argument {
                field: "day",
                reason: "a day cannot be set without a month".into(),
            });
        }
        self.day = day.map(|d| in_range("day", d, DAY_RANGE)).transpose()?;
        Ok(())
    }
}

impl fmt::Display for ApproximateDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
        }
        if let Some(day) = self.day {
            write!(f, "-{day:02}")?;
        }
        Ok(())
    }
}

impl ReadXml for ApproximateDate {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        let mut date = Self::new(required_text(node, "y")?)?;
        date.set_month(optional_text(node, "m")?)?;
        date.set_day(optional_text(node, "d")?)?;
        Ok(date)
    }
}

impl WriteXml for ApproximateDate {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        writer.start(element)?;
        writer.element("y", &self.year)?;
        writer.optional_text("m", self.month.as_ref())?;
        writer.optional_text("d", self.day.as_ref())?;
        writer.end(element)
    }
}

/// A date-time that is either structured (approximate date, optional time and zone) or only
/// described in words ("when I was a child").
///
/// Persisted as `<structured>` or `<descriptive>` inside the named element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproximateDateTime {
    Structured {
        date: ApproximateDate,
        time: Option<ApproximateTime>,
        timezone: Option<CodableValue>,
    },
    Descriptive(String),
}

impl ApproximateDateTime {
    pub fn from_date(date: ApproximateDate) -> Self {
        ApproximateDateTime::Structured {
            date,
            time: None,
            timezone: None,
        }
    }

    pub fn descriptive(text: impl Into<String>) -> ValidationResult<Self> {
        Ok(ApproximateDateTime::Descriptive(non_blank(
            "descriptive",
            text,
        )?))
    }

    pub fn date(&self) -> Option<&ApproximateDate> {
        match self {
            ApproximateDateTime::Structured { date, .. } => Some(date),
            ApproximateDateTime::Descriptive(_) => None,
        }
    }
}

impl From<ApproximateDate> for ApproximateDateTime {
    fn from(date: ApproximateDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for ApproximateDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApproximateDateTime::Structured {
                date,
                time,
                timezone,
            } => {
                write!(f, "{date}")?;
                if let Some(time) = time.as_ref().filter(|t| t.has_value()) {
                    write!(f, " {time}")?;
                }
                if let Some(tz) = timezone {
                    write!(f, " {tz}")?;
                }
                Ok(())
            }
            ApproximateDateTime::Descriptive(text) => f.write_str(text),
        }
    }
}

impl ReadXml for ApproximateDateTime {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        if let Some(structured) = child(node, "structured") {
            return Ok(ApproximateDateTime::Structured {
                date: required_child(structured, "date")?,
                time: optional_child(structured, "time")?,
                timezone: optional_child(structured, "tz")?,
            });
        }
        if let Some(text) = optional_text::<String>(node, "descriptive")? {
            return Ok(ApproximateDateTime::Descriptive(text));
        }
        Err(XmlError::Structure {
            parent: node.tag_name().name().to_string(),
            element: "structured".into(),
        })
    }
}

impl WriteXml for ApproximateDateTime {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        match self {
            ApproximateDateTime::Structured {
                date,
                time,
                timezone,
            } => {
                writer.start(element)?;
                writer.start("structured")?;
                writer.child("date", date)?;
                writer.optional("time", time.as_ref())?;
                writer.optional("tz", timezone.as_ref())?;
                writer.end("structured")?;
                writer.end(element)
            }
            ApproximateDateTime::Descriptive(text) => {
                writer.start(element)?;
                writer.element("descriptive", text)?;
                writer.end(element)
            }
        }
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        match self {
            ApproximateDateTime::Structured { time, timezone, .. } => {
                check_optional(time)?;
                check_optional(timezone)
            }
            ApproximateDateTime::Descriptive(text) => require_text("descriptive", text),
        }
    }
}

/// A span between two approximate date-times: `<start-date>`, `<end-date>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DurationValue {
    pub start_date: Option<ApproximateDateTime>,
    pub end_date: Option<ApproximateDateTime>,
}

impl DurationValue {
    pub fn new(start_date: ApproximateDateTime, end_date: ApproximateDateTime) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => write!(f, "{start} - {end}"),
            (Some(start), None) => write!(f, "{start} -"),
            (None, Some(end)) => write!(f, "- {end}"),
            (None, None) => Ok(()),
        }
    }
}

impl ReadXml for DurationValue {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            start_date: Some(required_child(node, "start-date")?),
            end_date: Some(required_child(node, "end-date")?),
        })
    }
}

impl WriteXml for DurationValue {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let start = require("start-date", &self.start_date)?;
        let end = require("end-date", &self.end_date)?;

        writer.start(element)?;
        writer.child("start-date", start)?;
        writer.child("end-date", end)?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("start-date", &self.start_date)?;
        require_checked("end-date", &self.end_date)?;
        Ok(())
    }
}

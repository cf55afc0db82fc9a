//! Calendar date with year, month and day always present.

use chrono::{Datelike, Local, NaiveDate};
use hrv_types::{in_range, ValidationError, ValidationResult};
use hrv_xml::{required_text, Node, ReadXml, WriteXml, XmlResult, XmlWriter};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::io::Write;
use std::ops::RangeInclusive;

pub const YEAR_RANGE: RangeInclusive<i32> = 1000..=9999;
pub const MONTH_RANGE: RangeInclusive<u32> = 1..=12;
pub const DAY_RANGE: RangeInclusive<u32> = 1..=31;

/// A date as recorded by the health service: `<y>`, `<m>`, `<d>`.
///
/// Ordering is lexicographic on (year, month, day). The day is only checked against `1..=31`,
/// not against the length of the month, which matches what the service accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HealthServiceDate {
    year: i32,
    month: u32,
    day: u32,
}

impl HealthServiceDate {
    /// Creates a date after checking each component's range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Range`] for a year outside `1000..=9999`, a month outside
    /// `1..=12` or a day outside `1..=31`.
    pub fn new(year: i32, month: u32, day: u32) -> ValidationResult<Self> {
        Ok(Self {
            year: in_range("year", year, YEAR_RANGE)?,
            month: in_range("month", month, MONTH_RANGE)?,
            day: in_range("day", day, DAY_RANGE)?,
        })
    }

    /// Today's date in the local time zone.
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
            day: today.day(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn set_year(&mut self, year: i32) -> ValidationResult<()> {
        self.year = in_range("year", year, YEAR_RANGE)?;
        Ok(())
    }

    pub fn set_month(&mut self, month: u32) -> ValidationResult<()> {
        self.month = in_range("month", month, MONTH_RANGE)?;
        Ok(())
    }

    pub fn set_day(&mut self, day: u32) -> ValidationResult<()> {
        self.day = in_range("day", day, DAY_RANGE)?;
        Ok(())
    }

    /// The same date as a chrono value, or `None` for a day the month does not have.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Compare against a native date or date-time; any time of day in `other` is ignored.
    pub fn compare_to_datetime<T: Datelike>(&self, other: &T) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year(), other.month(), other.day()))
    }
}

impl Default for HealthServiceDate {
    fn default() -> Self {
        Self::today()
    }
}

impl TryFrom<NaiveDate> for HealthServiceDate {
    type Error = ValidationError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        Self::new(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for HealthServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl ReadXml for HealthServiceDate {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        let year = required_text(node, "y")?;
        let month = required_text(node, "m")?;
        let day = required_text(node, "d")?;
        Ok(Self::new(year, month, day)?)
    }
}

impl WriteXml for HealthServiceDate {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        writer.start(element)?;
        writer.element("y", &self.year)?;
        writer.element("m", &self.month)?;
        writer.element("d", &self.day)?;
        writer.end(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrv_xml::{parse_document, to_xml_string, XmlError};

    #[test]
    fn year_range_is_inclusive() {
        assert!(HealthServiceDate::new(1000, 1, 1).is_ok());
        assert!(HealthServiceDate::new(9999, 12, 31).is_ok());

        let err = HealthServiceDate::new(999, 1, 1).expect_err("999 is out of range");
        assert!(matches!(err, ValidationError::Range { field: "year", .. }));
        assert!(HealthServiceDate::new(10000, 1, 1).is_err());
    }

    #[test]
    fn month_and_day_are_checked() {
        assert!(matches!(
            HealthServiceDate::new(2020, 13, 1),
            Err(ValidationError::Range { field: "month", .. })
        ));
        assert!(matches!(
            HealthServiceDate::new(2020, 1, 0),
            Err(ValidationError::Range { field: "day", .. })
        ));
    }

    #[test]
    fn failed_setter_leaves_value_unchanged() {
        let mut date = HealthServiceDate::new(2020, 3, 5).unwrap();
        assert!(date.set_month(0).is_err());
        assert_eq!(date.month(), 3);
        date.set_day(31).unwrap();
        assert_eq!(date.day(), 31);
    }

    #[test]
    fn orders_by_year_then_month_then_day() {
        let a = HealthServiceDate::new(2019, 12, 31).unwrap();
        let b = HealthServiceDate::new(2020, 1, 1).unwrap();
        let c = HealthServiceDate::new(2020, 1, 2).unwrap();
        assert!(a < b && b < c);
        assert_eq!(b.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn compares_against_native_datetime_ignoring_time() {
        let date = HealthServiceDate::new(2020, 3, 5).unwrap();
        let same_day = NaiveDate::from_ymd_opt(2020, 3, 5)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let next_day = NaiveDate::from_ymd_opt(2020, 3, 6).unwrap();

        assert_eq!(date.compare_to_datetime(&same_day), Ordering::Equal);
        assert_eq!(date.compare_to_datetime(&next_day), Ordering::Less);
    }

    #[test]
    fn impossible_day_has_no_native_equivalent() {
        let date = HealthServiceDate::new(2021, 2, 31).unwrap();
        assert!(date.to_naive_date().is_none());
        assert_eq!(date.to_string(), "2021-02-31");
    }

    #[test]
    fn round_trips_through_xml() {
        let date = HealthServiceDate::new(2020, 3, 5).unwrap();
        let xml = to_xml_string(&date, "date").unwrap();
        assert_eq!(xml, "<date><y>2020</y><m>3</m><d>5</d></date>");

        let doc = parse_document(&xml).unwrap();
        assert_eq!(HealthServiceDate::read_xml(doc.root_element()).unwrap(), date);
    }

    #[test]
    fn parse_rejects_missing_day_and_bad_year() {
        let doc = parse_document("<date><y>2020</y><m>3</m></date>").unwrap();
        assert!(matches!(
            HealthServiceDate::read_xml(doc.root_element()),
            Err(XmlError::Structure { .. })
        ));

        let doc = parse_document("<date><y>999</y><m>3</m><d>1</d></date>").unwrap();
        assert!(matches!(
            HealthServiceDate::read_xml(doc.root_element()),
            Err(XmlError::Validation(ValidationError::Range { field: "year", .. }))
        ));
    }
}

//! Date with optional time of day and time zone.

use super::{ApproximateTime, CodableValue, HealthServiceDate};
use chrono::{Local, NaiveDateTime};
use hrv_types::ValidationError;
use hrv_xml::{
    check_optional, optional_child, required_child, Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

/// A point in time as recorded by the health service: `<date>`, optional `<time>`, optional
/// `<tz>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HealthServiceDateTime {
    pub date: HealthServiceDate,
    pub time: Option<ApproximateTime>,
    pub timezone: Option<CodableValue>,
}

impl HealthServiceDateTime {
    pub fn new(date: HealthServiceDate) -> Self {
        Self {
            date,
            time: None,
            timezone: None,
        }
    }

    pub fn with_time(date: HealthServiceDate, time: ApproximateTime) -> Self {
        Self {
            date,
            time: Some(time),
            timezone: None,
        }
    }

    /// The current local date and time, to the millisecond.
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        Self {
            date: HealthServiceDate::today(),
            time: Some(ApproximateTime::from(now.time())),
            timezone: None,
        }
    }

    /// The time, if one is set and it is not the bare `00:00` sentinel.
    ///
    /// `00:00` without seconds is how clients historically stored "date only", so it does not
    /// take part in ordering. A midnight with seconds (`00:00:00`) does.
    fn meaningful_time(&self) -> Option<&ApproximateTime> {
        self.time
            .as_ref()
            .filter(|t| t.has_value() && !t.is_bare_midnight())
    }

    /// Order two date-times.
    ///
    /// Dates are compared first. Only when they are equal, and `self` carries a meaningful time
    /// (see above), are the times compared; a missing time on `other` sorts first.
    ///
    /// This is deliberately not an `Ord` implementation: the midnight rule makes the relation
    /// asymmetric when one side holds `00:00`.
    pub fn compare(&self, other: &Self) -> Ordering {
        let by_date = self.date.cmp(&other.date);
        if by_date != Ordering::Equal {
            return by_date;
        }
        match self.meaningful_time() {
            Some(time) => Some(time).cmp(&other.time.as_ref()),
            None => Ordering::Equal,
        }
    }

    /// Order against a native date-time using the same rule as [`Self::compare`].
    pub fn compare_to_datetime(&self, other: &NaiveDateTime) -> Ordering {
        let by_date = self.date.compare_to_datetime(other);
        if by_date != Ordering::Equal {
            return by_date;
        }
        match self.meaningful_time() {
            Some(time) => time.compare_to_time(other),
            None => Ordering::Equal,
        }
    }
}

impl TryFrom<NaiveDateTime> for HealthServiceDateTime {
    type Error = ValidationError;

    fn try_from(value: NaiveDateTime) -> Result<Self, Self::Error> {
        Ok(Self::with_time(
            HealthServiceDate::try_from(value.date())?,
            ApproximateTime::from(value.time()),
        ))
    }
}

impl fmt::Display for HealthServiceDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date)?;
        if let Some(time) = self.time.as_ref().filter(|t| t.has_value()) {
            write!(f, " {time}")?;
        }
        if let Some(tz) = &self.timezone {
            write!(f, " {tz}")?;
        }
        Ok(())
    }
}

impl ReadXml for HealthServiceDateTime {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            date: required_child(node, "date")?,
            time: optional_child(node, "time")?,
            timezone: optional_child(node, "tz")?,
        })
    }
}

impl WriteXml for HealthServiceDateTime {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        writer.start(element)?;
        writer.child("date", &self.date)?;
        writer.optional("time", self.time.as_ref())?;
        writer.optional("tz", self.timezone.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        check_optional(&self.time)?;
        check_optional(&self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hrv_xml::{parse_document, to_xml_string};

    fn date(y: i32, m: u32, d: u32) -> HealthServiceDate {
        HealthServiceDate::new(y, m, d).unwrap()
    }

    fn at(h: u32, m: u32) -> ApproximateTime {
        ApproximateTime::new(h, m).unwrap()
    }

    #[test]
    fn earlier_date_wins_regardless_of_time() {
        let a = HealthServiceDateTime::with_time(date(2020, 3, 4), at(23, 0));
        let b = HealthServiceDateTime::with_time(date(2020, 3, 5), at(1, 0));
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);
    }

    #[test]
    fn times_break_ties_on_the_same_date() {
        let a = HealthServiceDateTime::with_time(date(2020, 3, 5), at(9, 30));
        let b = HealthServiceDateTime::with_time(date(2020, 3, 5), at(10, 0));
        assert_eq!(a.compare(&b), Ordering::Less);

        let date_only = HealthServiceDateTime::new(date(2020, 3, 5));
        assert_eq!(b.compare(&date_only), Ordering::Greater);
        assert_eq!(date_only.compare(&b), Ordering::Equal);
    }

    #[test]
    fn bare_midnight_is_not_a_meaningful_time() {
        let midnight = HealthServiceDateTime::with_time(date(2020, 3, 5), at(0, 0));
        let morning = HealthServiceDateTime::with_time(date(2020, 3, 5), at(8, 0));
        assert_eq!(midnight.compare(&morning), Ordering::Equal);
        assert_eq!(morning.compare(&midnight), Ordering::Greater);

        let with_seconds = HealthServiceDateTime::with_time(
            date(2020, 3, 5),
            ApproximateTime::with_second(0, 0, 0).unwrap(),
        );
        assert_eq!(with_seconds.compare(&morning), Ordering::Less);
    }

    #[test]
    fn compares_against_native_datetime() {
        let value = HealthServiceDateTime::with_time(date(2020, 3, 5), at(9, 30));
        let native = NaiveDate::from_ymd_opt(2020, 3, 5)
            .unwrap()
            .and_hms_opt(9, 45, 0)
            .unwrap();
        assert_eq!(value.compare_to_datetime(&native), Ordering::Less);

        let converted = HealthServiceDateTime::try_from(native).unwrap();
        assert_eq!(converted.compare_to_datetime(&native), Ordering::Equal);
    }

    #[test]
    fn round_trips_with_time_and_zone() {
        let mut value = HealthServiceDateTime::with_time(date(2020, 3, 5), at(9, 30));
        value.timezone = Some(CodableValue::new("UTC").unwrap());

        let xml = to_xml_string(&value, "when").unwrap();
        assert_eq!(
            xml,
            "<when><date><y>2020</y><m>3</m><d>5</d></date>\
             <time><h>9</h><m>30</m></time><tz><text>UTC</text></tz></when>"
        );
        let doc = parse_document(&xml).unwrap();
        assert_eq!(HealthServiceDateTime::read_xml(doc.root_element()).unwrap(), value);
        assert_eq!(value.to_string(), "2020-03-05 09:30 UTC");
    }

    #[test]
    fn unset_time_is_reported_before_any_output() {
        let mut value = HealthServiceDateTime::new(date(2020, 3, 5));
        value.time = Some(ApproximateTime::default());

        let mut writer = XmlWriter::new(Vec::new());
        let err = value.write_xml("when", &mut writer).expect_err("should fail");
        assert!(matches!(err, hrv_xml::XmlError::MissingMandatory("hour")));
        assert!(writer.into_inner().is_empty());
    }
}

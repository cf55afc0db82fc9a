//! Time of day with optional second and millisecond precision.

use chrono::{NaiveTime, Timelike};
use hrv_types::{in_range, ValidationError, ValidationResult};
use hrv_xml::{optional_text, require, required_text, Node, ReadXml, WriteXml, XmlResult, XmlWriter};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

/// A time of day: `<h>`, `<m>`, optional `<s>` and `<f>` (milliseconds).
///
/// A default value is unset; [`ApproximateTime::has_value`] separates "no time recorded" from
/// midnight. Ordering is by hour, then minute, then second, then millisecond, where an absent
/// component sorts before any present one: 09:00 is earlier than 09:00:00.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ApproximateTime {
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    millisecond: Option<u32>,
}

impl ApproximateTime {
    pub fn new(hour: u32, minute: u32) -> ValidationResult<Self> {
        Ok(Self {
            hour: Some(in_range("hour", hour, 0..=23)?),
            minute: Some(in_range("minute", minute, 0..=59)?),
            second: None,
            millisecond: None,
        })
    }

    pub fn with_second(hour: u32, minute: u32, second: u32) -> ValidationResult<Self> {
        let mut time = Self::new(hour, minute)?;
        time.set_second(Some(second))?;
        Ok(time)
    }

    /// True only once both hour and minute have been set.
    pub fn has_value(&self) -> bool {
        self.hour.is_some() && self.minute.is_some()
    }

    pub fn hour(&self) -> Option<u32> {
        self.hour
    }

    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    pub fn second(&self) -> Option<u32> {
        self.second
    }

    pub fn millisecond(&self) -> Option<u32> {
        self.millisecond
    }

    pub fn set_hour(&mut self, hour: u32) -> ValidationResult<()> {
        self.hour = Some(in_range("hour", hour, 0..=23)?);
        Ok(())
    }

    pub fn set_minute(&mut self, minute: u32) -> ValidationResult<()> {
        self.minute = Some(in_range("minute", minute, 0..=59)?);
        Ok(())
    }

    /// Clearing the second also clears the millisecond.
    pub fn set_second(&mut self, second: Option<u32>) -> ValidationResult<()> {
        self.second = second.map(|s| in_range("second", s, 0..=59)).transpose()?;
        if self.second.is_none() {
            self.millisecond = None;
        }
        Ok(())
    }

    pub fn set_millisecond(&mut self, millisecond: Option<u32>) -> ValidationResult<()> {
        if millisecond.is_some() && self.second.is_none() {
            return Err(ValidationError::Argument {
                field: "millisecond",
                reason: "a millisecond cannot be set without a second".into(),
            });
        }
        self.millisecond = millisecond
            .map(|ms| in_range("millisecond", ms, 0..=999))
            .transpose()?;
        Ok(())
    }

    /// `00:00` with no seconds: treated as "no meaningful time" when ordering date-times.
    pub(crate) fn is_bare_midnight(&self) -> bool {
        self.hour == Some(0) && self.minute == Some(0) && self.second.is_none()
    }

    /// Compare against a native time, which always carries seconds and milliseconds.
    pub fn compare_to_time<T: Timelike>(&self, other: &T) -> Ordering {
        self.cmp(&Self::from_timelike(other))
    }

    fn from_timelike<T: Timelike>(time: &T) -> Self {
        Self {
            hour: Some(time.hour()),
            minute: Some(time.minute()),
            // Leap seconds are folded into the last representable millisecond.
            second: Some(time.second().min(59)),
            millisecond: Some((time.nanosecond() / 1_000_000).min(999)),
        }
    }
}

impl From<NaiveTime> for ApproximateTime {
    fn from(time: NaiveTime) -> Self {
        Self::from_timelike(&time)
    }
}

impl fmt::Display for ApproximateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(hour), Some(minute)) = (self.hour, self.minute) else {
            return Ok(());
        };
        write!(f, "{hour:02}:{minute:02}")?;
        if let Some(second) = self.second {
            write!(f, ":{second:02}")?;
        }
        if let Some(ms) = self.millisecond {
            write!(f, ".{ms:03}")?;
        }
        Ok(())
    }
}

impl ReadXml for ApproximateTime {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        let mut time = Self::new(required_text(node, "h")?, required_text(node, "m")?)?;
        time.set_second(optional_text(node, "s")?)?;
        time.set_millisecond(optional_text(node, "f")?)?;
        Ok(time)
    }
}

impl WriteXml for ApproximateTime {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let hour = require("hour", &self.hour)?;
        let minute = require("minute", &self.minute)?;

        writer.start(element)?;
        writer.element("h", hour)?;
        writer.element("m", minute)?;
        writer.optional_text("s", self.second.as_ref())?;
        writer.optional_text("f", self.millisecond.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require("hour", &self.hour)?;
        require("minute", &self.minute)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrv_types::ValidationError;
    use hrv_xml::{parse_document, to_xml_string, XmlError};

    fn parse(xml: &str) -> XmlResult<ApproximateTime> {
        let doc = parse_document(xml).unwrap();
        ApproximateTime::read_xml(doc.root_element())
    }

    #[test]
    fn default_has_no_value_but_midnight_does() {
        assert!(!ApproximateTime::default().has_value());
        assert!(ApproximateTime::new(0, 0).unwrap().has_value());

        let mut partial = ApproximateTime::default();
        partial.set_hour(7).unwrap();
        assert!(!partial.has_value());
    }

    #[test]
    fn absent_seconds_sort_before_zero_seconds() {
        let minute_only = ApproximateTime::new(9, 0).unwrap();
        let with_seconds = ApproximateTime::with_second(9, 0, 0).unwrap();
        assert!(minute_only < with_seconds);
        assert_ne!(minute_only, with_seconds);
    }

    #[test]
    fn orders_by_hour_then_minute() {
        let half_nine = ApproximateTime::new(9, 30).unwrap();
        let ten = ApproximateTime::new(10, 0).unwrap();
        assert!(half_nine < ten);
        assert_eq!(ten.cmp(&ApproximateTime::new(10, 0).unwrap()), Ordering::Equal);
    }

    #[test]
    fn milliseconds_break_ties_after_seconds() {
        let mut a = ApproximateTime::with_second(9, 0, 5).unwrap();
        let mut b = a;
        a.set_millisecond(Some(10)).unwrap();
        assert!(b < a);
        b.set_millisecond(Some(20)).unwrap();
        assert!(a < b);
    }

    #[test]
    fn ranges_are_enforced() {
        assert!(matches!(
            ApproximateTime::new(24, 0),
            Err(ValidationError::Range { field: "hour", .. })
        ));
        assert!(ApproximateTime::new(23, 60).is_err());
        assert!(ApproximateTime::with_second(1, 1, 60).is_err());
        let mut time = ApproximateTime::with_second(1, 1, 0).unwrap();
        assert!(time.set_millisecond(Some(1000)).is_err());
        assert_eq!(time.millisecond(), None);
    }

    #[test]
    fn millisecond_requires_second() {
        let mut time = ApproximateTime::new(9, 30).unwrap();
        assert!(matches!(
            time.set_millisecond(Some(5)),
            Err(ValidationError::Argument { field: "millisecond", .. })
        ));
        time.set_second(Some(1)).unwrap();
        time.set_millisecond(Some(5)).unwrap();
        time.set_second(None).unwrap();
        assert_eq!(time.millisecond(), None);
        assert_eq!(
            to_xml_string(&time, "time").unwrap(),
            "<time><h>9</h><m>30</m></time>"
        );
    }

    #[test]
    fn millisecond_without_second_in_xml_is_rejected() {
        let err = parse("<time><h>9</h><m>0</m><f>5</f></time>").expect_err("should fail");
        assert!(matches!(
            err,
            XmlError::Validation(ValidationError::Argument { field: "millisecond", .. })
        ));
    }

    #[test]
    fn partial_time_fails_the_mandatory_check() {
        let mut time = ApproximateTime::default();
        time.set_hour(7).unwrap();
        assert!(matches!(
            time.check_mandatory(),
            Err(XmlError::MissingMandatory("minute"))
        ));
        assert!(ApproximateTime::new(7, 0).unwrap().check_mandatory().is_ok());
    }

    #[test]
    fn absent_second_parses_as_none_and_zero_as_some() {
        let without = parse("<time><h>9</h><m>0</m></time>").unwrap();
        assert_eq!(without.second(), None);

        let with_zero = parse("<time><h>9</h><m>0</m><s>0</s></time>").unwrap();
        assert_eq!(with_zero.second(), Some(0));
        assert_ne!(without, with_zero);
    }

    #[test]
    fn out_of_range_hour_in_xml_is_a_range_error() {
        let err = parse("<time><h>25</h><m>0</m></time>").expect_err("should fail");
        assert!(matches!(err, XmlError::Validation(ValidationError::Range { .. })));
    }

    #[test]
    fn writing_unset_time_names_the_hour() {
        let err = to_xml_string(&ApproximateTime::default(), "time").expect_err("should fail");
        assert!(matches!(err, XmlError::MissingMandatory("hour")));
    }

    #[test]
    fn round_trips_full_precision() {
        let mut time = ApproximateTime::with_second(14, 5, 9).unwrap();
        time.set_millisecond(Some(250)).unwrap();
        let xml = to_xml_string(&time, "time").unwrap();
        assert_eq!(xml, "<time><h>14</h><m>5</m><s>9</s><f>250</f></time>");
        assert_eq!(parse(&xml).unwrap(), time);
        assert_eq!(time.to_string(), "14:05:09.250");
    }

    #[test]
    fn native_times_carry_seconds() {
        let native = NaiveTime::from_hms_milli_opt(9, 0, 0, 0).unwrap();
        let minute_only = ApproximateTime::new(9, 0).unwrap();
        assert_eq!(minute_only.compare_to_time(&native), Ordering::Less);
        assert_eq!(
            ApproximateTime::from(native).compare_to_time(&native),
            Ordering::Equal
        );
    }
}

//! Value types nested inside record items.
//!
//! Leaves first: dates and times, codable values and measurements; then the composites built
//! from them (names, contact details, people, claim amounts).

mod approximate;
mod claim;
mod codable;
mod contact;
pub(crate) mod date;
mod datetime;
mod general_measurement;
mod measurement;
mod person;
mod test_result;
mod time;

pub use approximate::{ApproximateDate, ApproximateDateTime, DurationValue};
pub use claim::ClaimAmounts;
pub use codable::{CodableValue, CodedValue, VocabularyItem};
pub use contact::{Address, ContactInfo, Email, Name, Phone};
pub use date::HealthServiceDate;
pub use datetime::HealthServiceDateTime;
pub use general_measurement::{GeneralMeasurement, StructuredMeasurement};
pub use measurement::{
    Altitude, AltitudeUnit, DisplayValue, Length, LengthUnit, Measurement, MeasurementUnit,
    WeightUnit, WeightValue,
};
pub use person::{Organization, PersonItem};
pub use test_result::{TestResultRange, TestResultRangeValue};
pub use time::ApproximateTime;
